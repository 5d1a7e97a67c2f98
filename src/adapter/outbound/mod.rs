//! Outbound adapters (driven side).

pub mod csv;
pub mod xlsx;
pub mod yahoo;
