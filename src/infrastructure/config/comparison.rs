//! Comparison job configuration.

use std::path::PathBuf;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::merge::DEFAULT_MAX_AGE_HOURS;
use crate::domain::sampler::DEFAULT_OTM_PCT;

/// Settings for the stock comparison spreadsheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonConfig {
    /// Tickers compared when none are given on the command line.
    #[serde(default = "default_tickers")]
    pub tickers: Vec<String>,
    /// Records at least this old are refetched.
    #[serde(default = "default_max_age_hours")]
    pub max_age_hours: i64,
    /// Distance out of the money for sampled calls and puts, in percent.
    #[serde(default = "default_otm_pct")]
    pub otm_pct: Decimal,
    /// Directory holding the timestamped snapshots.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Snapshot filename prefix, followed by `YYYYmmdd_HHMMSS.xlsx`.
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
}

fn default_tickers() -> Vec<String> {
    ["AMD", "MSFT", "NVDA", "AAPL"]
        .into_iter()
        .map(String::from)
        .collect()
}

const fn default_max_age_hours() -> i64 {
    DEFAULT_MAX_AGE_HOURS
}

const fn default_otm_pct() -> Decimal {
    DEFAULT_OTM_PCT
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_file_prefix() -> String {
    "AI_Stock_Live_Comparison_".to_string()
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            tickers: default_tickers(),
            max_age_hours: default_max_age_hours(),
            otm_pct: default_otm_pct(),
            output_dir: default_output_dir(),
            file_prefix: default_file_prefix(),
        }
    }
}
