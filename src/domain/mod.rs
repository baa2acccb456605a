//! Domain types for trips, expenses and balances.
//!
//! Nothing in here performs I/O. Stores are reached through [`ports::TripStore`].

pub mod balance;
pub mod expense;
pub mod money;
pub mod participant;
pub mod ports;
pub mod trip;
