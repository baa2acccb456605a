//! Group-trip expense tracking: who paid, who shared, and who owes whom.
//!
//! The heart of the crate is [`application::engine::compute_balances`], a pure
//! function from a trip's members and expenses to per-member paid, owed and
//! balance totals. [`application::ledger::TripLedger`] wraps it with the trip,
//! member and expense use cases over a pluggable store.

pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod interfaces;
