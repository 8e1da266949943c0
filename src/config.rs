use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: General,
    pub search: SearchSettings,
    pub bid: BidSettings,
    pub history: HistorySettings,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct General {
    pub log_level: String,
}

impl Default for General {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Base URL of the product API (e.g., "https://shop.example/api")
    pub api_base: String,
    /// Idle time before a typed query is dispatched
    pub debounce_ms: u64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            api_base: "http://localhost:8080/api".to_string(),
            debounce_ms: 500,
        }
    }
}

impl SearchSettings {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct BidSettings {
    /// Added on top of price + minimum step when the bid dialog opens (đồng)
    pub seed_offset: u64,
    /// Simulated backend latency
    pub settle_delay_ms: u64,
}

impl Default for BidSettings {
    fn default() -> Self {
        Self {
            seed_offset: 10_000,
            settle_delay_ms: 1_000,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HistorySettings {
    pub page_size: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self { page_size: 5 }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Like [`Config::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::warn!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }
}
