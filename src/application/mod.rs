//! Application layer: the balance engine and the trip use cases built on it.
//!
//! [`engine::BalanceEngine`] is pure. [`ledger::TripLedger`] owns a
//! [`TripStore`](crate::domain::ports::TripStore), validates changes to trips
//! and hands consistent snapshots to the engine.

pub mod engine;
pub mod ledger;
