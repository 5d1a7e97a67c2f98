//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`market`] — In-memory [`MarketData`](crate::port::outbound::market::MarketData)
//!   with scripted failures and call counters.
//! - [`store`] — In-memory snapshot store.
//! - [`domain`] — Builders for dates, option quotes and records.
//! - [`config`] — Canonical test configurations.

pub mod config;
pub mod domain;
pub mod market;
pub mod store;
