//! Command-line interface definitions.
//!
//! Defines the CLI structure for stocklive using `clap`: the comparison
//! spreadsheet, the call screener, the portfolio fixer and config helpers.

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;

/// Stock and option metrics in a refreshable spreadsheet
#[derive(Parser, Debug)]
#[command(name = "stocklive")]
#[command(version, about)]
pub struct Cli {
    /// Path to the configuration file [env: STOCKLIVE_CONFIG]
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the stocklive CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Refresh the comparison spreadsheet
    Compare(CompareArgs),

    /// Screen near-the-money calls by annualized time value
    Screen(ScreenArgs),

    /// Recommend covered-call trades for the latest portfolio export
    Portfolio(PortfolioArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Subcommands for `stocklive config`.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Write a documented configuration file.
    Init(ConfigInitArgs),
    /// Display the effective configuration with defaults applied.
    Show,
    /// Validate a configuration file for correctness.
    Validate,
}

/// Arguments for `config init`.
#[derive(Parser, Debug)]
pub struct ConfigInitArgs {
    /// Where to write the file (defaults to the config path)
    pub path: Option<PathBuf>,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the `compare` subcommand.
#[derive(Parser, Debug)]
pub struct CompareArgs {
    /// Tickers to compare (defaults to `comparison.tickers`)
    pub tickers: Vec<String>,

    /// Refetch records at least this many hours old
    #[arg(long)]
    pub max_age_hours: Option<i64>,

    /// Directory holding the snapshots
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
}

/// Arguments for the `screen` subcommand.
///
/// Every threshold defaults to the `[screen]` table.
#[derive(Parser, Debug)]
pub struct ScreenArgs {
    /// Symbols to screen
    #[arg(required = true)]
    pub symbols: Vec<String>,

    /// Minimum contract volume
    #[arg(long)]
    pub min_volume: Option<u64>,

    /// Number of expirations to sample
    #[arg(long)]
    pub max_expirations: Option<usize>,

    /// Minimum annualized time value, in percent
    #[arg(long)]
    pub min_annual_tv: Option<Decimal>,

    /// Highest strike as percent above spot
    #[arg(long)]
    pub max_otm: Option<Decimal>,

    /// Skip expirations this many days out or closer
    #[arg(long)]
    pub min_days: Option<i64>,

    /// Keep at most this many candidates per symbol (0 keeps all)
    #[arg(long)]
    pub max_results: Option<usize>,

    /// Also write all candidates to this CSV file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write `recommendations.<SYMBOL>.csv` per symbol in the current directory
    #[arg(long)]
    pub save: bool,
}

/// Arguments for the `portfolio` subcommand.
#[derive(Parser, Debug)]
pub struct PortfolioArgs {
    /// Directory holding `portfolio.<YYYYMMDD>.csv` exports
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Directory receiving the recommendations file
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
}
