//! Factory modules for building infrastructure components.
//!
//! Provides factory functions that construct fully-configured services
//! from application configuration. These factories handle dependency
//! injection and wiring.
//!
//! # Submodules
//!
//! - [`market`] - Market-data provider construction
//! - [`service`] - Comparison, screener and portfolio service construction

pub mod market;
pub mod service;
