use serde::{Deserialize, Serialize};

/// Continental-US fallback center used while nothing has resolved.
pub const DEFAULT_CENTER: [f64; 2] = [39.5, -98.35];
pub const DEFAULT_ZOOM: u8 = 4;
pub const FOCUSED_ZOOM: u8 = 6;

/// A geocoded place. Ephemeral render data, never persisted with a trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub lat: f64,
    pub lon: f64,
    pub label: String,
}

/// Snapshot of the map preview, as handed to the page script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewState {
    pub status: String,
    pub start: Option<GeoLocation>,
    pub end: Option<GeoLocation>,
    pub center: [f64; 2],
    pub zoom: u8,
}

impl PreviewState {
    pub fn idle() -> Self {
        Self::new(String::new(), None, None)
    }

    /// Center is the midpoint when both endpoints resolved, otherwise the
    /// one that did, otherwise the fallback; zoom tightens as soon as
    /// anything resolved.
    pub fn new(status: String, start: Option<GeoLocation>, end: Option<GeoLocation>) -> Self {
        let center = match (&start, &end) {
            (Some(s), Some(e)) => [(s.lat + e.lat) / 2.0, (s.lon + e.lon) / 2.0],
            (Some(s), None) => [s.lat, s.lon],
            (None, Some(e)) => [e.lat, e.lon],
            (None, None) => DEFAULT_CENTER,
        };
        let zoom = if start.is_some() || end.is_some() {
            FOCUSED_ZOOM
        } else {
            DEFAULT_ZOOM
        };
        Self {
            status,
            start,
            end,
            center,
            zoom,
        }
    }
}
