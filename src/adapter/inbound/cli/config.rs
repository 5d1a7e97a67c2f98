//! Handler for the `config` command group.

use std::fs;
use std::path::Path;

use crate::adapter::inbound::cli::output::Output;
use crate::error::{ConfigError, Result};
use crate::infrastructure::config::Config;

/// Default config template with documentation.
const CONFIG_TEMPLATE: &str = include_str!("../../../../stocklive.toml.example");

/// Execute `config init`.
pub fn execute_init(path: &Path, force: bool, out: Output) -> Result<()> {
    if path.exists() && !force {
        return Err(ConfigError::InvalidValue {
            field: "config",
            reason: "file already exists (use --force to overwrite)".to_string(),
        }
        .into());
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, CONFIG_TEMPLATE)?;
    out.section("Config Initialized");
    out.success("Created configuration file");
    out.field("Path", path.display());
    out.section("Next Steps");
    out.note(&format!("1. Edit {} with your tickers", path.display()));
    out.note(&format!("2. Run: stocklive compare -c {}", path.display()));
    Ok(())
}

/// Execute `config show`.
pub fn execute_show(config: &Config, out: Output) -> Result<()> {
    if out.is_json() {
        out.json_output(serde_json::to_value(config)?);
        return Ok(());
    }

    out.section("Effective Configuration");
    out.field("Log level", &config.logging.level);
    out.field("Log format", &config.logging.format);

    out.section("Provider");
    out.field("Base URL", &config.provider.base_url);
    out.field("Timeout", format!("{}ms", config.provider.timeout_ms));
    out.field("Pacing", format!("{}ms", config.provider.pacing_ms));
    out.field(
        "Retry",
        format!(
            "{} attempts, {}ms + {}ms/attempt",
            config.retry.max_attempts, config.retry.base_delay_ms, config.retry.step_delay_ms
        ),
    );

    out.section("Comparison");
    out.field("Tickers", config.comparison.tickers.join(", "));
    out.field("Max age", format!("{}h", config.comparison.max_age_hours));
    out.field("OTM", format!("{}%", config.comparison.otm_pct));
    out.field("Output", config.comparison.output_dir.display());

    out.section("Screen");
    out.field("Min volume", config.screen.min_volume);
    out.field("Expirations", config.screen.max_expirations);
    out.field("Min ann. TV", format!("{}%", config.screen.min_annual_tv_pct));
    out.field(
        "Strike window",
        format!("-{}% / +{}%", config.screen.max_itm_pct, config.screen.max_otm_pct),
    );

    out.section("Portfolio");
    out.field("Exports", config.portfolio.directory.display());
    out.field("Output", config.portfolio.output_dir.display());

    Ok(())
}

/// Execute `config validate`.
pub fn execute_validate(path: &Path, out: Output) -> Result<()> {
    out.section("Config Validation");
    out.field("Path", path.display());
    Config::load(path)?;
    out.success("Config file is valid");
    out.field("Next", format!("stocklive config show -c {}", path.display()));
    Ok(())
}
