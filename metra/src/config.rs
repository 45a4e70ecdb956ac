//! Engine configuration

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use metra_rates::DEFAULT_RATE_SOURCE_URL;
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetraConfig {
    /// URL template, `{base}` is replaced by the base currency code
    pub rate_source_url: String,
    pub currency_ttl_ms: u64,
    pub crypto_ttl_ms: u64,
    pub request_timeout_ms: u64,
    /// Directory holding favorites and history
    pub data_path: PathBuf,
    pub history_limit: usize,
    /// Never reach the network
    pub offline: bool,
}

impl Default for MetraConfig {
    fn default() -> Self {
        Self {
            rate_source_url: DEFAULT_RATE_SOURCE_URL.to_string(),
            currency_ttl_ms: 3_600_000,
            crypto_ttl_ms: 600_000,
            request_timeout_ms: 10_000,
            data_path: PathBuf::from("./metra-data"),
            history_limit: 20,
            offline: false,
        }
    }
}

impl MetraConfig {
    /// Defaults overridden by `METRA_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each `METRA_*` name
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup("METRA_RATE_SOURCE_URL").filter(|u| !u.trim().is_empty()) {
            config.rate_source_url = url;
        }
        if let Some(path) = lookup("METRA_DATA_PATH").filter(|p| !p.trim().is_empty()) {
            config.data_path = PathBuf::from(path);
        }

        parse_into(&lookup, "METRA_CURRENCY_TTL_MS", &mut config.currency_ttl_ms);
        parse_into(&lookup, "METRA_CRYPTO_TTL_MS", &mut config.crypto_ttl_ms);
        parse_into(&lookup, "METRA_REQUEST_TIMEOUT_MS", &mut config.request_timeout_ms);
        parse_into(&lookup, "METRA_HISTORY_LIMIT", &mut config.history_limit);

        if let Some(raw) = lookup("METRA_OFFLINE") {
            match raw.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" => config.offline = true,
                "0" | "false" | "no" | "" => config.offline = false,
                _ => warn!(var = "METRA_OFFLINE", value = %raw, "ignoring invalid value"),
            }
        }

        config
    }

    pub fn currency_ttl(&self) -> Duration {
        Duration::from_millis(self.currency_ttl_ms)
    }

    pub fn crypto_ttl(&self) -> Duration {
        Duration::from_millis(self.crypto_ttl_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

fn parse_into<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, name: &str, slot: &mut T) {
    let Some(raw) = lookup(name) else {
        return;
    };
    match raw.trim().parse() {
        Ok(value) => *slot = value,
        Err(_) => warn!(var = name, value = %raw, "ignoring invalid value, keeping default"),
    }
}
