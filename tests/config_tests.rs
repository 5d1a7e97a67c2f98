use std::fs;
use std::path::PathBuf;

use rust_decimal_macros::dec;
use stocklive::error::{ConfigError, Error};
use stocklive::infrastructure::config::settings::Config;
use tempfile::TempDir;

fn write_temp_config(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("stocklive.toml");
    fs::write(&path, contents).expect("write temp config");
    path
}

#[test]
fn empty_file_loads_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_temp_config(&dir, "");

    let config = Config::load(&path).unwrap();

    assert_eq!(config.comparison.tickers, ["AMD", "MSFT", "NVDA", "AAPL"]);
    assert_eq!(config.comparison.max_age_hours, 4);
    assert_eq!(config.comparison.otm_pct, dec!(6));
    assert_eq!(config.retry.max_attempts, 3);
    assert_eq!(config.screen.min_volume, 50);
    assert_eq!(config.portfolio.criteria.max_expirations, 6);
}

#[test]
fn tables_override_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_temp_config(
        &dir,
        r#"
[comparison]
tickers = ["TSLA"]
max_age_hours = 12
otm_pct = 10.0
file_prefix = "Snap_"

[screen]
min_annual_tv_pct = 15.5
max_results = 0

[portfolio]
skip_footer_rows = 2
"#,
    );

    let config = Config::load(&path).unwrap();

    assert_eq!(config.comparison.tickers, ["TSLA"]);
    assert_eq!(config.comparison.max_age_hours, 12);
    assert_eq!(config.comparison.otm_pct, dec!(10));
    assert_eq!(config.comparison.file_prefix, "Snap_");
    assert_eq!(config.screen.min_annual_tv_pct, dec!(15.5));
    assert_eq!(config.screen.max_results, 0);
    assert_eq!(config.screen.min_days, 5);
    assert_eq!(config.portfolio.skip_footer_rows, 2);
    assert_eq!(config.portfolio.skip_header_rows, 1);
}

#[test]
fn config_rejects_zero_retry_attempts() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_temp_config(&dir, "[retry]\nmax_attempts = 0\n");

    match Config::load(&path) {
        Err(Error::Config(ConfigError::InvalidValue {
            field: "max_attempts",
            ..
        })) => {}
        Err(err) => panic!("Expected invalid max_attempts, got {err}"),
        Ok(_) => panic!("Expected zero attempts to be rejected"),
    }
}

#[test]
fn config_rejects_non_http_provider() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_temp_config(&dir, "[provider]\nbase_url = \"ftp://quotes\"\n");

    match Config::load(&path) {
        Err(Error::Config(ConfigError::InvalidValue {
            field: "base_url", ..
        })) => {}
        other => panic!("Expected invalid base_url, got {other:?}"),
    }
}

#[test]
fn config_rejects_zero_expirations() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_temp_config(&dir, "[portfolio.criteria]\nmax_expirations = 0\n");

    let err = Config::load(&path).unwrap_err();
    assert!(err.to_string().contains("max_expirations"), "{err}");
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_temp_config(&dir, "[comparison\n");

    assert!(matches!(
        Config::load(&path),
        Err(Error::Config(ConfigError::Parse(_)))
    ));
}

#[test]
fn missing_file_is_a_read_error_but_default_location_is_optional() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    assert!(matches!(
        Config::load(&path),
        Err(Error::Config(ConfigError::ReadFile(_)))
    ));
    assert_eq!(Config::load_or_default(&path).unwrap(), Config::default());
}

#[test]
fn shipped_example_is_valid() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("stocklive.toml.example");
    let config = Config::load(&path).unwrap();
    assert_eq!(config, Config::default());
}
