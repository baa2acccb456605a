use crate::domain::ports::TripStore;
use crate::domain::trip::{Trip, TripId};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory store for trip documents.
///
/// Uses `Arc<RwLock<HashMap<TripId, Trip>>>` so clones share the same trips.
/// Ideal for testing or single runs where persistence is not required.
#[derive(Default, Clone)]
pub struct InMemoryTripStore {
    trips: Arc<RwLock<HashMap<TripId, Trip>>>,
}

impl InMemoryTripStore {
    /// Creates a new, empty in-memory trip store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TripStore for InMemoryTripStore {
    async fn store(&self, trip: Trip) -> Result<()> {
        let mut trips = self.trips.write().await;
        trips.insert(trip.id.clone(), trip);
        Ok(())
    }

    async fn get(&self, trip_id: &TripId) -> Result<Option<Trip>> {
        let trips = self.trips.read().await;
        Ok(trips.get(trip_id).cloned())
    }

    async fn all_trips(&self) -> Result<Vec<Trip>> {
        let trips = self.trips.read().await;
        Ok(trips.values().cloned().collect())
    }

    async fn delete(&self, trip_id: &TripId) -> Result<bool> {
        let mut trips = self.trips.write().await;
        Ok(trips.remove(trip_id).is_some())
    }
}
