use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::{error::AppError, models::trip::Trip, services::store::TripStore};

/// Owns the in-memory trip list and writes the whole list back to the
/// store after every mutation.
#[derive(Clone)]
pub struct TripService {
    trips: Arc<RwLock<Vec<Trip>>>,
    store: Arc<dyn TripStore>,
}

impl TripService {
    /// Loads the list once and re-serializes it immediately, so a fresh
    /// store ends up holding the seed list it reported.
    pub async fn load(store: Arc<dyn TripStore>) -> Result<Self, AppError> {
        let trips = store.load().await;
        store.save(&trips).await?;
        Ok(Self {
            trips: Arc::new(RwLock::new(trips)),
            store,
        })
    }

    pub async fn trips(&self) -> Vec<Trip> {
        self.trips.read().await.clone()
    }

    /// Creates a trip from raw form input. Submissions missing either
    /// endpoint are dropped without an error, matching the form's
    /// longstanding behavior.
    pub async fn create(
        &self,
        name: &str,
        start: &str,
        end: &str,
        notes: &str,
    ) -> Result<Option<Trip>, AppError> {
        let start = start.trim();
        let end = end.trim();
        if start.is_empty() || end.is_empty() {
            debug!("ignoring trip submission without both endpoints");
            return Ok(None);
        }

        let mut trips = self.trips.write().await;
        let trip = Trip::new(next_id(&trips), name.trim(), start, end, notes.trim());
        trips.insert(0, trip.clone());
        self.store.save(&trips).await?;
        Ok(Some(trip))
    }

    pub async fn toggle_favorite(&self, id: i64) -> Result<bool, AppError> {
        let mut trips = self.trips.write().await;
        let Some(trip) = trips.iter_mut().find(|t| t.id == id) else {
            return Ok(false);
        };
        trip.is_favorite = !trip.is_favorite;
        self.store.save(&trips).await?;
        Ok(true)
    }

    pub async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let mut trips = self.trips.write().await;
        let before = trips.len();
        trips.retain(|t| t.id != id);
        if trips.len() == before {
            return Ok(false);
        }
        self.store.save(&trips).await?;
        Ok(true)
    }
}

/// Ids are creation timestamps in milliseconds, bumped past the current
/// maximum so two submissions landing in the same millisecond cannot
/// collide.
fn next_id(trips: &[Trip]) -> i64 {
    let max = trips.iter().map(|t| t.id).max().unwrap_or(0);
    Utc::now().timestamp_millis().max(max + 1)
}
