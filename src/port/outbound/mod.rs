//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe the market-data provider and snapshot storage.

pub mod market;
pub mod store;
