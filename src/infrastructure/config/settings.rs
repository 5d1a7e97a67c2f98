//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application settings.
//! Configuration is loaded from a TOML file; every table is optional and
//! falls back to its defaults.
//!
//! # Example
//!
//! ```no_run
//! use stocklive::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("stocklive.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::comparison::ComparisonConfig;
use super::logging::LoggingConfig;
use super::portfolio::PortfolioConfig;
use crate::adapter::outbound::yahoo::settings::ProviderConfig;
use crate::application::price::RetryPolicy;
use crate::domain::screen::ScreenCriteria;
use crate::error::{ConfigError, Result};

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "STOCKLIVE_CONFIG";

/// Environment variable overriding `provider.base_url`.
pub const PROVIDER_URL_ENV: &str = "STOCKLIVE_PROVIDER_URL";

/// Main application configuration.
///
/// Load from a TOML file using [`Config::load`] or parse directly with
/// [`Config::parse_toml`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Market-data provider endpoint and HTTP settings.
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Quote lookup retry schedule.
    #[serde(default)]
    pub retry: RetryPolicy,

    /// Stock comparison spreadsheet settings.
    #[serde(default)]
    pub comparison: ComparisonConfig,

    /// Defaults for the `screen` command.
    #[serde(default)]
    pub screen: ScreenCriteria,

    /// Portfolio fixer settings.
    #[serde(default)]
    pub portfolio: PortfolioConfig,
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// `STOCKLIVE_PROVIDER_URL`, when set, replaces the provider base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;

        if let Ok(url) = std::env::var(PROVIDER_URL_ENV) {
            if !url.trim().is_empty() {
                config.provider.base_url = url.trim().to_string();
            }
        }

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Load `path` if it exists, otherwise start from defaults.
    ///
    /// Used for the implicit default location; an explicitly requested file
    /// goes through [`Config::load`] so a typo is reported.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but is invalid.
    #[allow(clippy::result_large_err)]
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Self::parse_toml("")
        }
    }

    /// Validate configuration values.
    ///
    /// Checks that all required fields are present and values are within
    /// acceptable ranges.
    #[allow(clippy::result_large_err)]
    pub fn validate(&self) -> Result<()> {
        if self.provider.base_url.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "base_url" }.into());
        }
        if !self.provider.base_url.starts_with("http://")
            && !self.provider.base_url.starts_with("https://")
        {
            return Err(ConfigError::InvalidValue {
                field: "base_url",
                reason: "must start with http:// or https://".to_string(),
            }
            .into());
        }
        if self.provider.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "timeout_ms",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if !self.logging.is_known_format() {
            return Err(ConfigError::InvalidValue {
                field: "format",
                reason: "must be \"pretty\" or \"json\"".to_string(),
            }
            .into());
        }

        if self.retry.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_attempts",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        if self.comparison.max_age_hours <= 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_age_hours",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.comparison.otm_pct < Decimal::ZERO || self.comparison.otm_pct >= Decimal::ONE_HUNDRED
        {
            return Err(ConfigError::InvalidValue {
                field: "otm_pct",
                reason: "must be between 0 and 100".to_string(),
            }
            .into());
        }
        if self.comparison.file_prefix.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "file_prefix",
            }
            .into());
        }

        validate_criteria(&self.screen)?;
        validate_criteria(&self.portfolio.criteria)?;

        Ok(())
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }

    /// Render the effective configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| {
            ConfigError::InvalidValue {
                field: "config",
                reason: e.to_string(),
            }
            .into()
        })
    }
}

#[allow(clippy::result_large_err)]
fn validate_criteria(criteria: &ScreenCriteria) -> Result<()> {
    if criteria.max_expirations == 0 {
        return Err(ConfigError::InvalidValue {
            field: "max_expirations",
            reason: "must be greater than 0".to_string(),
        }
        .into());
    }
    if criteria.max_otm_pct < Decimal::ZERO || criteria.max_itm_pct < Decimal::ZERO {
        return Err(ConfigError::InvalidValue {
            field: "max_otm_pct",
            reason: "strike window bounds must be 0 or greater".to_string(),
        }
        .into());
    }
    if criteria.max_itm_pct >= Decimal::ONE_HUNDRED {
        return Err(ConfigError::InvalidValue {
            field: "max_itm_pct",
            reason: "must be below 100".to_string(),
        }
        .into());
    }
    if criteria.min_days < 0 {
        return Err(ConfigError::InvalidValue {
            field: "min_days",
            reason: "must be 0 or greater".to_string(),
        }
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use rust_decimal_macros::dec;

    #[test]
    fn empty_file_yields_defaults() {
        let config = Config::parse_toml("").unwrap();

        assert_eq!(config.comparison.tickers, ["AMD", "MSFT", "NVDA", "AAPL"]);
        assert_eq!(config.comparison.max_age_hours, 4);
        assert_eq!(config.comparison.otm_pct, dec!(6));
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.screen.min_volume, 50);
        assert_eq!(config.portfolio.criteria.max_expirations, 6);
        assert_eq!(config.portfolio.skip_footer_rows, 5);
    }

    #[test]
    fn tables_override_defaults() {
        let toml = r#"
            [logging]
            level = "debug"
            format = "json"

            [retry]
            max_attempts = 5
            base_delay_ms = 0

            [comparison]
            tickers = ["TSLA"]
            otm_pct = 10

            [screen]
            min_volume = 10
            max_results = 0
        "#;
        let config = Config::parse_toml(toml).unwrap();

        assert_eq!(config.logging.format, "json");
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.step_delay_ms, 2000);
        assert_eq!(config.comparison.tickers, ["TSLA"]);
        assert_eq!(config.comparison.otm_pct, dec!(10));
        assert_eq!(config.screen.min_volume, 10);
        assert_eq!(config.screen.max_results, 0);
        assert_eq!(config.screen.max_expirations, 2);
    }

    #[test]
    fn zero_attempts_rejected() {
        let err = Config::parse_toml("[retry]\nmax_attempts = 0\n").unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidValue {
                field: "max_attempts",
                ..
            })
        ));
    }

    #[test]
    fn unknown_log_format_rejected() {
        let err = Config::parse_toml("[logging]\nformat = \"xml\"\n").unwrap_err();
        assert!(err.to_string().contains("format"));
    }

    #[test]
    fn out_of_range_otm_rejected() {
        assert!(Config::parse_toml("[comparison]\notm_pct = 100\n").is_err());
        assert!(Config::parse_toml("[comparison]\notm_pct = -1\n").is_err());
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let err = Config::parse_toml("[comparison\n").unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::Parse(_))));
    }

    #[test]
    fn effective_config_round_trips_through_toml() {
        let config = Config::default();
        let rendered = config.to_toml().unwrap();
        assert_eq!(Config::parse_toml(&rendered).unwrap(), config);
    }
}
