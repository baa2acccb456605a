use super::trip::{Trip, TripId};
use crate::error::Result;
use async_trait::async_trait;

/// Storage for trip documents.
#[async_trait]
pub trait TripStore: Send + Sync {
    /// Inserts or replaces the trip with the same id.
    async fn store(&self, trip: Trip) -> Result<()>;
    async fn get(&self, trip_id: &TripId) -> Result<Option<Trip>>;
    async fn all_trips(&self) -> Result<Vec<Trip>>;
    /// Removes the trip, returning `false` if there was none.
    async fn delete(&self, trip_id: &TripId) -> Result<bool>;
}

pub type TripStoreBox = Box<dyn TripStore>;
pub type TripStoreFactory = Box<dyn Fn() -> TripStoreBox + Send + Sync>;
