//! Configuration management and validation.
//!
//! Provides configuration structures for the serial line, frame parsing
//! policy and the monitor's polling loop, plus layered loading from an
//! optional JSON file.

use crate::constants::{
    DEFAULT_BAUD_RATE, DEFAULT_DATA_BITS, DEFAULT_DEVICE_PATH, DEFAULT_MAX_DATA_AGE,
    DEFAULT_READ_TIMEOUT, DEFAULT_REOPEN_BACKOFF, DEFAULT_STATUS_INTERVAL, DEFAULT_STOP_BITS,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Parity setting of the serial line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Parity {
    #[default]
    None,
    Odd,
    Even,
}

/// Serial line configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    /// Device path, e.g. /dev/ttyUSB0
    pub device_path: String,

    /// Baud rate (the receiver uses 9600)
    pub baud_rate: u32,

    /// Data bits per character (5-8)
    pub data_bits: u8,

    /// Stop bits (1 or 2)
    pub stop_bits: u8,

    pub parity: Parity,

    /// Maximum time a single read may block before failing
    #[serde(with = "duration_secs")]
    pub read_timeout: Duration,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            device_path: DEFAULT_DEVICE_PATH.to_string(),
            baud_rate: DEFAULT_BAUD_RATE,
            data_bits: DEFAULT_DATA_BITS,
            stop_bits: DEFAULT_STOP_BITS,
            parity: Parity::None,
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }
}

impl SerialConfig {
    /// Validate line settings
    pub fn validate(&self) -> Result<()> {
        if self.device_path.trim().is_empty() {
            return Err(Error::configuration("Device path must not be empty"));
        }

        if self.baud_rate == 0 {
            return Err(Error::configuration("Baud rate must be greater than 0"));
        }

        if !(5..=8).contains(&self.data_bits) {
            return Err(Error::configuration(format!(
                "Invalid data bits {}: must be between 5 and 8",
                self.data_bits
            )));
        }

        if !matches!(self.stop_bits, 1 | 2) {
            return Err(Error::configuration(format!(
                "Invalid stop bits {}: must be 1 or 2",
                self.stop_bits
            )));
        }

        if self.read_timeout.is_zero() {
            return Err(Error::configuration("Read timeout must be greater than 0"));
        }

        Ok(())
    }
}

/// How blank integer/boolean hybrid fields (precipitation count, rain flag) are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptyFieldPolicy {
    /// Blank fields are a numeric parse error
    #[default]
    Reject,
    /// Blank fields become 0 / false, as sent by receivers without a hybrid sensor
    Zero,
}

/// Frame parsing configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    pub empty_hybrid_fields: EmptyFieldPolicy,
}

/// Polling loop configuration for the monitor command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Pause before reopening the device after a failure
    #[serde(with = "duration_secs")]
    pub reopen_backoff: Duration,

    /// Age after which the latest reading is reported as stale
    #[serde(with = "duration_secs")]
    pub max_data_age: Duration,

    /// Interval between status reports
    #[serde(with = "duration_secs")]
    pub status_interval: Duration,

    /// Include the hybrid sensor when judging completeness of readings
    pub include_hybrid_sensor: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            reopen_backoff: DEFAULT_REOPEN_BACKOFF,
            max_data_age: DEFAULT_MAX_DATA_AGE,
            status_interval: DEFAULT_STATUS_INTERVAL,
            include_hybrid_sensor: false,
        }
    }
}

impl MonitorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_data_age.is_zero() {
            return Err(Error::configuration("Max data age must be greater than 0"));
        }

        if self.status_interval.is_zero() {
            return Err(Error::configuration("Status interval must be greater than 0"));
        }

        Ok(())
    }
}

/// Global receiver configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub serial: SerialConfig,
    pub parser: ParserConfig,
    pub monitor: MonitorConfig,
}

impl Config {
    /// Load configuration from a JSON file, filling unspecified values with defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::io(
                format!("Failed to read config file {}", path.display()),
                e,
            )
        })?;

        let config: Config = serde_json::from_str(&content).map_err(|e| {
            Error::configuration(format!(
                "Invalid config file {}: {}",
                path.display(),
                e
            ))
        })?;

        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Use a different device path
    pub fn with_device_path(mut self, device_path: impl Into<String>) -> Self {
        self.serial.device_path = device_path.into();
        self
    }

    /// Set the policy for blank precipitation/rain fields
    pub fn with_empty_hybrid_fields(mut self, policy: EmptyFieldPolicy) -> Self {
        self.parser.empty_hybrid_fields = policy;
        self
    }

    /// Set the pause between reopen attempts
    pub fn with_reopen_backoff(mut self, backoff: Duration) -> Self {
        self.monitor.reopen_backoff = backoff;
        self
    }

    /// Set the age after which data counts as stale
    pub fn with_max_data_age(mut self, max_data_age: Duration) -> Self {
        self.monitor.max_data_age = max_data_age;
        self
    }

    /// Set the interval between status reports
    pub fn with_status_interval(mut self, interval: Duration) -> Self {
        self.monitor.status_interval = interval;
        self
    }

    /// Validate all sections
    pub fn validate(&self) -> Result<()> {
        self.serial.validate()?;
        self.monitor.validate()
    }
}

/// Durations are stored as whole seconds in config files
mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
