//! Yahoo Finance-style market data provider.

pub mod client;
pub mod dto;
pub mod settings;

pub use client::YahooClient;
pub use settings::ProviderConfig;
