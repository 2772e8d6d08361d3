//! Host configuration loaded from an optional TOML file

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use beacon_core::{ControllerConfig, Duration, StopGranularity, TimingPolicy};
use serde::Deserialize;

/// Where the loop checks for a stop request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StopSetting {
    /// Finish the whole message first
    #[default]
    Pass,
    /// Finish only the unit in flight
    Unit,
}

impl From<StopSetting> for StopGranularity {
    fn from(setting: StopSetting) -> Self {
        match setting {
            StopSetting::Pass => StopGranularity::Pass,
            StopSetting::Unit => StopGranularity::Unit,
        }
    }
}

/// Unit durations; `wpm` wins over the millisecond fields when set
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub wpm: Option<u32>,
    pub dot_ms: u64,
    pub dash_ms: u64,
    pub symbol_gap_ms: u64,
    pub letter_gap_ms: u64,
    pub word_gap_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        let timing = TimingPolicy::default();
        Self {
            wpm: None,
            dot_ms: timing.dot.as_millis(),
            dash_ms: timing.dash.as_millis(),
            symbol_gap_ms: timing.symbol_gap.as_millis(),
            letter_gap_ms: timing.letter_gap.as_millis(),
            word_gap_ms: timing.word_gap.as_millis(),
        }
    }
}

impl TimingConfig {
    /// Every duration must fit the hold primitive's `u32` milliseconds
    fn validate(&self) -> Result<()> {
        let fields = [
            ("dot_ms", self.dot_ms),
            ("dash_ms", self.dash_ms),
            ("symbol_gap_ms", self.symbol_gap_ms),
            ("letter_gap_ms", self.letter_gap_ms),
            ("word_gap_ms", self.word_gap_ms),
        ];
        for (name, ms) in fields {
            if ms > u64::from(u32::MAX) {
                return Err(anyhow!("timing.{} = {} exceeds {} ms", name, ms, u32::MAX));
            }
        }
        Ok(())
    }

    pub fn to_policy(&self) -> Result<TimingPolicy> {
        if let Some(wpm) = self.wpm {
            return TimingPolicy::from_wpm(wpm).map_err(|e| anyhow!(e));
        }
        Ok(TimingPolicy::new(
            Duration::from_millis(self.dot_ms),
            Duration::from_millis(self.dash_ms),
            Duration::from_millis(self.symbol_gap_ms),
            Duration::from_millis(self.letter_gap_ms),
            Duration::from_millis(self.word_gap_ms),
        ))
    }
}

/// Character display geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub columns: usize,
    pub rows: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        // 16x2 character LCD
        Self { columns: 16, rows: 2 }
    }
}

/// Longest accepted telemetry interval: one day
pub const MAX_TELEMETRY_INTERVAL_SECS: u64 = 86_400;

/// Top-level host settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Button ring; the first entry is sent at start
    pub messages: Vec<String>,
    pub timing: TimingConfig,
    pub stop_granularity: StopSetting,
    /// 0 disables the telemetry line
    pub telemetry_interval_secs: u64,
    pub display: DisplayConfig,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            messages: vec!["SOS".to_string(), "OK".to_string()],
            timing: TimingConfig::default(),
            stop_granularity: StopSetting::Pass,
            telemetry_interval_secs: 30,
            display: DisplayConfig::default(),
        }
    }
}

impl HostConfig {
    /// Parse TOML text; missing keys take their defaults
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: HostConfig = toml::from_str(text).context("invalid beacon configuration")?;
        if config.messages.is_empty() {
            return Err(anyhow!("at least one message is required"));
        }
        if config.display.columns == 0 || config.display.rows == 0 {
            return Err(anyhow!("display must have at least one row and one column"));
        }
        if config.telemetry_interval_secs > MAX_TELEMETRY_INTERVAL_SECS {
            return Err(anyhow!(
                "telemetry_interval_secs = {} exceeds {}",
                config.telemetry_interval_secs,
                MAX_TELEMETRY_INTERVAL_SECS
            ));
        }
        config.timing.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml_str(&text)
    }

    /// Core controller settings
    pub fn controller_config(&self) -> Result<ControllerConfig> {
        Ok(ControllerConfig {
            timing: self.timing.to_policy()?,
            stop_granularity: self.stop_granularity.into(),
        })
    }

    /// Message sent first
    pub fn initial_message(&self) -> &str {
        self.messages.first().map(String::as_str).unwrap_or_default()
    }
}
