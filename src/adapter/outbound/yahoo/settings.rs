//! Market-data provider configuration.

use serde::{Deserialize, Serialize};

/// HTTP settings for the Yahoo-style quote provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL; endpoint paths such as `/v7/finance/quote` are appended.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Connect timeout in milliseconds.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// The provider rejects requests without a browser-like agent.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Pause between consecutive symbols or chain requests.
    #[serde(default = "default_pacing_ms")]
    pub pacing_ms: u64,
}

fn default_base_url() -> String {
    "https://query1.finance.yahoo.com".to_string()
}

const fn default_timeout_ms() -> u64 {
    10_000
}

const fn default_connect_timeout_ms() -> u64 {
    3000
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string()
}

const fn default_pacing_ms() -> u64 {
    1000
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
            user_agent: default_user_agent(),
            pacing_ms: default_pacing_ms(),
        }
    }
}
