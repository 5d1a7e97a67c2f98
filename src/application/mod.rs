//! Application services (use cases).
//!
//! These services orchestrate domain logic and coordinate adapters
//! to implement the comparison, screening and portfolio jobs.

pub mod compare;
pub mod portfolio;
pub mod price;
pub mod screen;

pub use compare::{ComparisonReport, ComparisonSettings, StockComparison};
pub use portfolio::{PortfolioFixer, PortfolioReport};
pub use price::{PriceFetcher, RetryPolicy};
pub use screen::{OptionScreener, ScreenReport};
