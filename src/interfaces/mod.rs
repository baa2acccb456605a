//! Edges of the crate: reading expense files and rendering balances.

pub mod csv;
pub mod json;
