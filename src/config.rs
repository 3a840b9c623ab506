use serde::Deserialize;
use std::time::Duration;

use crate::backoff::BackoffConfig;

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    pub backoff: BackoffSection,
    #[serde(default)]
    pub schedule: ScheduleSection,
}

/// `[backoff]` table. Durations are whole milliseconds.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct BackoffSection {
    pub base_start_ms: u64,
    pub base_max_ms: u64,
    /// Left at 0.0, the calculator substitutes its default factor
    #[serde(default)]
    pub factor: f64,
    #[serde(default)]
    pub jitter_min_ms: u64,
    /// 0 disables jitter
    #[serde(default)]
    pub jitter_max_ms: u64,
}

/// `[schedule]` table, only read by the CLI.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ScheduleSection {
    #[serde(default = "default_attempts")]
    pub attempts: u32,
}

impl Default for ScheduleSection {
    fn default() -> Self {
        Self {
            attempts: default_attempts(),
        }
    }
}

fn default_attempts() -> u32 {
    8
}

impl BackoffSection {
    pub fn to_backoff_config(&self) -> BackoffConfig {
        BackoffConfig::new(
            Duration::from_millis(self.base_start_ms),
            Duration::from_millis(self.base_max_ms),
        )
        .with_factor(self.factor)
        .with_jitter(
            Duration::from_millis(self.jitter_min_ms),
            Duration::from_millis(self.jitter_max_ms),
        )
    }
}

impl Config {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parses TOML after expanding `${ENV_VAR}` references.
    /// Values are not validated here.
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let expanded = shellexpand::env(content)?;
        let config: Config = toml::from_str(&expanded)?;
        Ok(config)
    }
}
