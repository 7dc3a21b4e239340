/*
[INPUT]:  YAML configuration file
[OUTPUT]: Parsed station configuration
[POS]:    Configuration layer - station setup
[UPDATE]: When adding new configuration options
*/

use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use tako_stall_engine::EngineConfig;

/// Top-level configuration for one stall station
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StationConfig {
    /// Menu, pricing and queue policy
    #[serde(default)]
    pub engine: EngineConfig,
    /// Tracing filter directive, e.g. "info" or "tako_stall_engine=debug"
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Period of one removal countdown tick
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    /// Period of the housekeeping tick (notice expiry, snapshot refresh)
    #[serde(default = "default_ui_tick_ms")]
    pub ui_tick_ms: u64,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            log_level: default_log_level(),
            tick_ms: default_tick_ms(),
            ui_tick_ms: default_ui_tick_ms(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_tick_ms() -> u64 {
    1000
}

fn default_ui_tick_ms() -> u64 {
    250
}

impl StationConfig {
    /// Load configuration from YAML file
    pub fn from_file(path: &str) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("read config file {path}"))?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content).context("parse station config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.engine.validate().context("invalid engine config")?;
        if self.tick_ms == 0 {
            bail!("tick_ms must be positive");
        }
        if self.ui_tick_ms == 0 {
            bail!("ui_tick_ms must be positive");
        }
        Ok(())
    }

    pub fn countdown_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn ui_tick(&self) -> Duration {
        Duration::from_millis(self.ui_tick_ms)
    }
}
