use async_trait::async_trait;
use reqwest::header::ACCEPT_LANGUAGE;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::{error::AppError, models::location::GeoLocation};

/// Resolves free-text place names to coordinates. `Ok(None)` covers every
/// expected miss (blank input, no match, unreachable service); `Err` is
/// reserved for implementations that cannot degrade to absence.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, place: &str) -> anyhow::Result<Option<GeoLocation>>;
}

/// Client for the OpenStreetMap Nominatim search API.
#[derive(Clone)]
pub struct NominatimGeocoder {
    client: reqwest::Client,
    base: Url,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    lat: String,
    lon: String,
    display_name: String,
}

impl NominatimGeocoder {
    pub fn new(base: Url) -> Result<Self, AppError> {
        // Nominatim's usage policy wants an identifying user agent.
        let client = reqwest::Client::builder()
            .user_agent(concat!("roadtrip/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| AppError::Other(err.into()))?;
        Ok(Self { client, base })
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, place: &str) -> anyhow::Result<Option<GeoLocation>> {
        let query = place.trim();
        if query.is_empty() {
            return Ok(None);
        }

        let mut url = match self.base.join("search") {
            Ok(url) => url,
            Err(err) => {
                debug!("invalid geocoder endpoint: {err}");
                return Ok(None);
            }
        };
        url.query_pairs_mut()
            .append_pair("format", "json")
            .append_pair("limit", "1")
            .append_pair("q", query);

        let response = match self
            .client
            .get(url)
            .header(ACCEPT_LANGUAGE, "en")
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                debug!("geocoding request failed: {err}");
                return Ok(None);
            }
        };
        if !response.status().is_success() {
            debug!("geocoding returned {}", response.status());
            return Ok(None);
        }

        let results: Vec<SearchResult> = match response.json().await {
            Ok(results) => results,
            Err(err) => {
                debug!("geocoding response did not parse: {err}");
                return Ok(None);
            }
        };
        Ok(results.into_iter().next().and_then(into_location))
    }
}

fn into_location(result: SearchResult) -> Option<GeoLocation> {
    let lat = result.lat.parse::<f64>().ok()?;
    let lon = result.lon.parse::<f64>().ok()?;
    Some(GeoLocation {
        lat,
        lon,
        label: result.display_name,
    })
}
