//! stocklive - stock and option metrics in a refreshable spreadsheet.
//!
//! Fetches prices, fundamentals and sampled option premiums for a list of
//! tickers and keeps them in timestamped `.xlsx` snapshots. Rows younger
//! than the configured age are reused from the latest snapshot; the rest
//! are refetched and merged in.
//!
//! # Architecture
//!
//! - [`domain`] - Records, quotes, yield arithmetic, merging and screening
//! - [`port`] - Market-data and snapshot-store traits
//! - [`adapter`] - Yahoo-style HTTP client, xlsx and CSV files, the CLI
//! - [`application`] - Comparison, screening and portfolio jobs
//! - [`infrastructure`] - Configuration and service wiring
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```no_run
//! use stocklive::infrastructure::config::Config;
//! use stocklive::infrastructure::factory::market::build_market_data;
//! use stocklive::infrastructure::factory::service::build_comparison;
//!
//! # async fn run() -> stocklive::error::Result<()> {
//! let config = Config::load("stocklive.toml")?;
//! let market = build_market_data(&config);
//! let job = build_comparison(&config, market, ".".into(), 4);
//! let tickers = vec!["AMD".to_string(), "NVDA".to_string()];
//! let report = job.run(&tickers, chrono::Local::now().naive_local()).await?;
//! println!("saved {}", report.path.display());
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
