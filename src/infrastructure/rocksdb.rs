use crate::domain::ports::TripStore;
use crate::domain::trip::{Trip, TripId};
use crate::error::{Result, TripError};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, Options};
use std::path::Path;
use std::sync::Arc;

/// Column Family for storing trip documents.
pub const CF_TRIPS: &str = "trips";

/// A persistent store implementation using RocksDB.
///
/// Each trip is kept as one JSON document in the `trips` column family,
/// keyed by its id.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the `trips` column family exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_trips = ColumnFamilyDescriptor::new(CF_TRIPS, Options::default());
        let db = DB::open_cf_descriptors(&opts, path, vec![cf_trips])?;

        Ok(Self { db: Arc::new(db) })
    }

    fn trips_cf(&self) -> Result<&rocksdb::ColumnFamily> {
        self.db.cf_handle(CF_TRIPS).ok_or_else(|| {
            TripError::InternalError(Box::new(std::io::Error::other(
                "Trips column family not found",
            )))
        })
    }
}

#[async_trait]
impl TripStore for RocksDBStore {
    async fn store(&self, trip: Trip) -> Result<()> {
        let cf = self.trips_cf()?;
        let value = serde_json::to_vec(&trip)?;
        self.db.put_cf(cf, trip.id.as_str().as_bytes(), value)?;
        Ok(())
    }

    async fn get(&self, trip_id: &TripId) -> Result<Option<Trip>> {
        let cf = self.trips_cf()?;
        match self.db.get_cf(cf, trip_id.as_str().as_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn all_trips(&self) -> Result<Vec<Trip>> {
        let cf = self.trips_cf()?;
        let mut trips = Vec::new();
        for item in self.db.iterator_cf(cf, rocksdb::IteratorMode::Start) {
            let (_key, value) = item?;
            trips.push(serde_json::from_slice(&value)?);
        }
        Ok(trips)
    }

    async fn delete(&self, trip_id: &TripId) -> Result<bool> {
        let cf = self.trips_cf()?;
        let key = trip_id.as_str().as_bytes();
        if self.db.get_pinned_cf(cf, key)?.is_none() {
            return Ok(false);
        }
        self.db.delete_cf(cf, key)?;
        Ok(true)
    }
}
