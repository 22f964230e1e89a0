//! Configuration for the gateway.
//!
//! Configuration is a single TOML file. Every field has a default, so an
//! empty file (or no file at all) yields a working host setup.
//!
//! # Config Location
//!
//! Without an explicit path the file is looked up in the platform config
//! directory:
//! - **Linux**: `~/.config/marine-gateway/gateway.toml`
//! - **macOS**: `~/Library/Application Support/marine-gateway/gateway.toml`
//! - **Windows**: `%APPDATA%\marine-gateway\gateway.toml`
//!
//! # Example
//!
//! ```toml
//! [scheduler]
//! tick_rate_hz = 50
//!
//! [intervals]
//! adc_ms = 1000
//! imu_ms = 50
//! stats_ms = 10000
//!
//! [bus]
//! replay_file = "captures/harbour.log"
//!
//! [serial.port1]
//! enabled = true
//! baud_rate = 4800
//! protocol = "nmea0183"
//! replay_file = "captures/harbour.nmea"
//!
//! [log]
//! filter = "info,marine_gateway=debug"
//! directory = "logs"
//! ```

use crate::error::{GatewayError, Result};
use crate::model::SourceInput;
use crate::pipeline::nodes::{default_channels, AdcChannel};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application identifier for config directories
pub const APP_ID: &str = "marine-gateway";

/// Config filename
pub const CONFIG_FILE: &str = "gateway.toml";

/// Default tick rate in Hz
pub const DEFAULT_TICK_RATE_HZ: u32 = 100;

/// Default depth of the bridge queue
pub const DEFAULT_BRIDGE_QUEUE_DEPTH: usize = 256;

/// Get the platform config directory for the gateway
pub fn config_dir() -> Option<PathBuf> {
    dirs_next::config_dir().map(|p| p.join(APP_ID))
}

/// Get the path of the default config file
pub fn default_config_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join(CONFIG_FILE))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Ticks per second. `0` ticks as fast as possible.
    pub tick_rate_hz: u32,
    /// Frames the bus reader drains per tick.
    pub frames_per_tick: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: DEFAULT_TICK_RATE_HZ,
            frames_per_tick: crate::pipeline::nodes::DEFAULT_FRAMES_PER_TICK,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntervalConfig {
    /// ADC sampling interval.
    pub adc_ms: u64,
    pub imu_ms: u64,
    pub baro_ms: u64,
    /// Interval between stats log lines. `0` disables them.
    pub stats_ms: u64,
}

impl Default for IntervalConfig {
    fn default() -> Self {
        Self {
            adc_ms: 1_000,
            imu_ms: 50,
            baro_ms: 1_000,
            stats_ms: 10_000,
        }
    }
}

impl IntervalConfig {
    pub fn adc(&self) -> Duration {
        Duration::from_millis(self.adc_ms)
    }

    pub fn imu(&self) -> Duration {
        Duration::from_millis(self.imu_ms)
    }

    pub fn baro(&self) -> Duration {
        Duration::from_millis(self.baro_ms)
    }

    pub fn stats(&self) -> Option<Duration> {
        (self.stats_ms > 0).then(|| Duration::from_millis(self.stats_ms))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusConfig {
    /// candump capture to replay instead of a live bus.
    pub replay_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SerialProtocol {
    Nmea0183,
    Seatalk,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialLineConfig {
    pub enabled: bool,
    /// Line rate. Replayed captures are paced to it.
    pub baud_rate: u32,
    pub protocol: SerialProtocol,
    /// Byte capture to replay in place of the physical port.
    pub replay_file: Option<PathBuf>,
}

impl SerialLineConfig {
    /// Input tag for data read on serial line `line` (1-based).
    pub fn source_input(&self, line: u8) -> SourceInput {
        match self.protocol {
            SerialProtocol::Nmea0183 => SourceInput::Nmea0183(line),
            SerialProtocol::Seatalk => SourceInput::Seatalk(line),
        }
    }
}

impl Default for SerialLineConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            baud_rate: 4800,
            protocol: SerialProtocol::Nmea0183,
            replay_file: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    pub port1: SerialLineConfig,
    pub port2: SerialLineConfig,
}

impl SerialConfig {
    /// Enabled lines with their input tags, in line order.
    pub fn enabled_lines(&self) -> impl Iterator<Item = (SourceInput, &SerialLineConfig)> {
        [(1u8, &self.port1), (2, &self.port2)]
            .into_iter()
            .filter(|(_, line)| line.enabled)
            .map(|(n, line)| (line.source_input(n), line))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdcConfig {
    pub channels: Vec<AdcChannel>,
}

impl Default for AdcConfig {
    fn default() -> Self {
        Self {
            channels: default_channels(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    pub queue_depth: usize,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            queue_depth: DEFAULT_BRIDGE_QUEUE_DEPTH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `tracing` filter directive; `RUST_LOG` takes precedence.
    pub filter: String,
    /// Directory for daily-rotated diagnostic logs. Console only if unset.
    pub directory: Option<PathBuf>,
    pub file_prefix: String,
    /// Where the JSON-lines data log goes. Standard output if unset.
    pub data_log: Option<PathBuf>,
    /// Also log every raw NMEA 2000 frame, not just decoded updates.
    pub raw_frames: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info,marine_gateway=debug".to_string(),
            directory: None,
            file_prefix: "gateway.log".to_string(),
            data_log: None,
            raw_frames: false,
        }
    }
}

/// Complete gateway configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub scheduler: SchedulerConfig,
    pub intervals: IntervalConfig,
    pub bus: BusConfig,
    pub serial: SerialConfig,
    pub adc: AdcConfig,
    pub bridge: BridgeConfig,
    pub log: LogConfig,
}

impl GatewayConfig {
    /// Parse a TOML document
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)
            .map_err(|e| GatewayError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            GatewayError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    /// Load from `path`, or from the default location when `path` is `None`.
    /// Falls back to defaults when there is no file or it cannot be used.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match default_config_path() {
                Some(p) if p.exists() => p,
                _ => return Self::default(),
            },
        };
        Self::load(&path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config, using defaults: {}", e);
            Self::default()
        })
    }

    /// Save configuration to a file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                GatewayError::Config(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| GatewayError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)
            .map_err(|e| GatewayError::Config(format!("Failed to write {}: {}", path.display(), e)))
    }

    /// Reject values that would make the graph misbehave.
    pub fn validate(&self) -> Result<()> {
        if self.bridge.queue_depth == 0 {
            return Err(GatewayError::Config(
                "bridge.queue_depth must be at least 1".to_string(),
            ));
        }
        for (name, ms) in [
            ("adc_ms", self.intervals.adc_ms),
            ("imu_ms", self.intervals.imu_ms),
            ("baro_ms", self.intervals.baro_ms),
        ] {
            if ms == 0 {
                return Err(GatewayError::Config(format!(
                    "intervals.{} must be at least 1",
                    name
                )));
            }
        }
        for (source, line) in self.serial.enabled_lines() {
            if line.baud_rate == 0 {
                return Err(GatewayError::Config(format!(
                    "{}: baud_rate must be at least 1",
                    source
                )));
            }
        }
        if self.scheduler.frames_per_tick == 0 {
            return Err(GatewayError::Config(
                "scheduler.frames_per_tick must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
