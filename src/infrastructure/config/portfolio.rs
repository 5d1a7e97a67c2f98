//! Portfolio fixer configuration.

use std::path::PathBuf;

use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::domain::screen::ScreenCriteria;

/// Where broker exports live and how to screen replacement calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioConfig {
    /// Directory searched for `portfolio.<YYYYMMDD>.csv`.
    #[serde(default = "default_directory")]
    pub directory: PathBuf,
    /// Directory receiving `recommendations.<YYYYMMDD>.csv`.
    #[serde(default = "default_directory")]
    pub output_dir: PathBuf,
    /// Lines before the column header row of the export.
    #[serde(default = "default_skip_header_rows")]
    pub skip_header_rows: usize,
    /// Summary lines after the last position row.
    #[serde(default = "default_skip_footer_rows")]
    pub skip_footer_rows: usize,
    #[serde(default = "default_criteria")]
    pub criteria: ScreenCriteria,
}

fn default_directory() -> PathBuf {
    PathBuf::from(".")
}

const fn default_skip_header_rows() -> usize {
    1
}

const fn default_skip_footer_rows() -> usize {
    5
}

/// Covered-call screen: further out and stricter than the ad-hoc screen.
fn default_criteria() -> ScreenCriteria {
    ScreenCriteria {
        min_volume: 50,
        max_expirations: 6,
        min_annual_tv_pct: dec!(12.0),
        max_otm_pct: dec!(5.0),
        min_days: 10,
        max_results: 5,
        ..ScreenCriteria::default()
    }
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            output_dir: default_directory(),
            skip_header_rows: default_skip_header_rows(),
            skip_footer_rows: default_skip_footer_rows(),
            criteria: default_criteria(),
        }
    }
}
