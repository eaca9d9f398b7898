//! Configuration loading from TOML files
//!
//! Config file is selected via `--config <path>` (default: config/dev.toml).
//! Every section except `[venue]` may be omitted.

use crate::domain::pricing::PriceTable;
use crate::domain::types::Plan;
use anyhow::Context;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VenueConfig {
    #[serde(default = "default_venue_name")]
    pub name: String,
    #[serde(default = "default_rooms")]
    pub rooms: usize,
    #[serde(default = "default_lockers")]
    pub lockers: usize,
}

impl Default for VenueConfig {
    fn default() -> Self {
        Self { name: default_venue_name(), rooms: default_rooms(), lockers: default_lockers() }
    }
}

fn default_venue_name() -> String {
    "venue".to_string()
}

fn default_rooms() -> usize {
    25
}

fn default_lockers() -> usize {
    30
}

/// Fee per plan, in the smallest currency unit
#[derive(Debug, Clone, Deserialize)]
pub struct PricingConfig {
    #[serde(default = "default_standard_fee")]
    pub standard: u64,
    #[serde(default = "default_vip_fee")]
    pub vip: u64,
    #[serde(default = "default_vvip_fee")]
    pub vvip: u64,
    #[serde(default = "default_vvvip_fee")]
    pub vvvip: u64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            standard: default_standard_fee(),
            vip: default_vip_fee(),
            vvip: default_vvip_fee(),
            vvvip: default_vvvip_fee(),
        }
    }
}

fn default_standard_fee() -> u64 {
    5000
}

fn default_vip_fee() -> u64 {
    10000
}

fn default_vvip_fee() -> u64 {
    15000
}

fn default_vvvip_fee() -> u64 {
    20000
}

impl From<&PricingConfig> for PriceTable {
    fn from(pricing: &PricingConfig) -> Self {
        PriceTable::from_fees([
            (Plan::Standard, pricing.standard),
            (Plan::Vip, pricing.vip),
            (Plan::Vvip, pricing.vvip),
            (Plan::Vvvip, pricing.vvvip),
        ])
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReceiptsConfig {
    /// Append a JSONL receipt for every paid session
    #[serde(default = "default_receipts_enabled")]
    pub enabled: bool,
    #[serde(default = "default_receipts_file")]
    pub file: String,
}

impl Default for ReceiptsConfig {
    fn default() -> Self {
        Self { enabled: default_receipts_enabled(), file: default_receipts_file() }
    }
}

fn default_receipts_enabled() -> bool {
    true
}

fn default_receipts_file() -> String {
    "receipts.jsonl".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_interval")]
    pub interval_secs: u64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { interval_secs: default_metrics_interval() }
    }
}

fn default_metrics_interval() -> u64 {
    60
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    pub venue: VenueConfig,
    #[serde(default)]
    pub pricing: PricingConfig,
    #[serde(default)]
    pub receipts: ReceiptsConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Main configuration struct used throughout the application
#[derive(Debug, Clone)]
pub struct Config {
    venue_name: String,
    room_count: usize,
    locker_count: usize,
    prices: PriceTable,
    receipts_enabled: bool,
    receipts_file: String,
    metrics_interval_secs: u64,
    log_format: LogFormat,
    config_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            venue_name: default_venue_name(),
            room_count: default_rooms(),
            locker_count: default_lockers(),
            prices: PriceTable::default(),
            receipts_enabled: default_receipts_enabled(),
            receipts_file: default_receipts_file(),
            metrics_interval_secs: default_metrics_interval(),
            log_format: LogFormat::Text,
            config_file: "default".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let toml_config: TomlConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        if toml_config.metrics.interval_secs == 0 {
            anyhow::bail!("metrics.interval_secs must be positive in {}", path.display());
        }

        Ok(Self {
            venue_name: toml_config.venue.name,
            room_count: toml_config.venue.rooms,
            locker_count: toml_config.venue.lockers,
            prices: PriceTable::from(&toml_config.pricing),
            receipts_enabled: toml_config.receipts.enabled,
            receipts_file: toml_config.receipts.file,
            metrics_interval_secs: toml_config.metrics.interval_secs,
            log_format: toml_config.logging.format,
            config_file: path.display().to_string(),
        })
    }

    /// Override pool sizes (command-line flags take precedence over the file)
    pub fn with_pool_sizes(mut self, rooms: Option<usize>, lockers: Option<usize>) -> Self {
        if let Some(rooms) = rooms {
            self.room_count = rooms;
        }
        if let Some(lockers) = lockers {
            self.locker_count = lockers;
        }
        self
    }

    pub fn venue_name(&self) -> &str {
        &self.venue_name
    }

    pub fn room_count(&self) -> usize {
        self.room_count
    }

    pub fn locker_count(&self) -> usize {
        self.locker_count
    }

    pub fn prices(&self) -> &PriceTable {
        &self.prices
    }

    pub fn receipts_enabled(&self) -> bool {
        self.receipts_enabled
    }

    pub fn receipts_file(&self) -> &str {
        &self.receipts_file
    }

    pub fn metrics_interval_secs(&self) -> u64 {
        self.metrics_interval_secs
    }

    pub fn log_format(&self) -> LogFormat {
        self.log_format
    }

    pub fn config_file(&self) -> &str {
        &self.config_file
    }

    /// Builder method for tests to toggle the receipt log
    #[cfg(test)]
    pub fn with_receipts(mut self, enabled: bool, file: &str) -> Self {
        self.receipts_enabled = enabled;
        self.receipts_file = file.to_string();
        self
    }
}
