//! Canonical test configurations.
//!
//! Single source of truth for config structs used across tests.

use crate::application::compare::ComparisonSettings;
use crate::application::price::RetryPolicy;
use crate::infrastructure::config::Config;

/// Three immediate attempts; no waiting in tests.
pub fn retry() -> RetryPolicy {
    RetryPolicy::immediate(3)
}

/// Comparison settings with default thresholds and no pacing.
pub fn comparison() -> ComparisonSettings {
    ComparisonSettings {
        pacing_ms: 0,
        ..ComparisonSettings::default()
    }
}

/// Default configuration with every delay zeroed.
pub fn config() -> Config {
    let mut config = Config::default();
    config.retry = retry();
    config.provider.pacing_ms = 0;
    config
}
