//! Command-line argument definitions for the receiver tool
//!
//! This module defines the CLI interface using the clap derive API and the
//! layering of CLI values over the loaded configuration.

use crate::config::{Config, EmptyFieldPolicy};
use crate::{Error, Result};
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

/// CLI arguments for the USB-WDE1 receiver tool
///
/// Reads frames from a serial weather-station receiver and logs, monitors or
/// parses them.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "usbwde",
    version,
    about = "Read and monitor ELV USB-WDE1 weather-station receivers",
    long_about = "Reads semicolon-separated frames from a USB-WDE1 style receiver on a serial \
                  port, normalizes the eight temperature/humidity probes and the hybrid sensor, \
                  and logs or monitors the resulting readings."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Device / socket path to connect to
    #[arg(short = 'd', long = "device", value_name = "PATH", global = true)]
    pub device: Option<String>,

    /// JSON configuration file
    #[arg(long = "config", value_name = "FILE", global = true)]
    pub config_file: Option<PathBuf>,

    /// Accept blank precipitation/rain fields as 0/false
    #[arg(long = "lenient-hybrid", global = true)]
    pub lenient_hybrid: bool,

    /// Increase verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short = 'q', long = "quiet", global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Log every reading from the receiver until the stream fails
    Log(LogArgs),
    /// Keep reading with reconnects and publish status as JSON lines
    Monitor(MonitorArgs),
    /// Parse recorded frames from a file or stdin
    Parse(ParseArgs),
}

/// Arguments for the log command
#[derive(Debug, Clone, Parser)]
pub struct LogArgs {
    /// Warn when the hybrid sensor looks absent
    #[arg(long = "include-hybrid")]
    pub include_hybrid: bool,
}

/// Arguments for the monitor command
#[derive(Debug, Clone, Parser)]
pub struct MonitorArgs {
    /// Seconds after which the latest reading counts as stale
    #[arg(long = "max-data-age", value_name = "SECS")]
    pub max_data_age: Option<u64>,

    /// Seconds to wait before reopening the device
    #[arg(long = "backoff", value_name = "SECS")]
    pub backoff: Option<u64>,

    /// Seconds between status lines
    #[arg(long = "status-interval", value_name = "SECS")]
    pub status_interval: Option<u64>,

    /// Include the hybrid sensor when judging completeness
    #[arg(long = "include-hybrid")]
    pub include_hybrid: bool,
}

/// Arguments for the parse command
#[derive(Debug, Clone, Parser)]
pub struct ParseArgs {
    /// File with one frame per line (stdin if omitted)
    #[arg(value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Include the hybrid sensor when judging completeness
    #[arg(long = "include-hybrid")]
    pub include_hybrid: bool,
}

impl Args {
    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "info",
                1 => "debug",
                _ => "trace",
            }
        }
    }

    /// Layer CLI values over a loaded configuration
    pub fn apply_to(&self, mut config: Config) -> Config {
        if let Some(device) = &self.device {
            config = config.with_device_path(device.clone());
        }

        if self.lenient_hybrid {
            config = config.with_empty_hybrid_fields(EmptyFieldPolicy::Zero);
        }

        if let Some(Commands::Monitor(monitor)) = &self.command {
            if let Some(secs) = monitor.max_data_age {
                config = config.with_max_data_age(Duration::from_secs(secs));
            }
            if let Some(secs) = monitor.backoff {
                config = config.with_reopen_backoff(Duration::from_secs(secs));
            }
            if let Some(secs) = monitor.status_interval {
                config = config.with_status_interval(Duration::from_secs(secs));
            }
            if monitor.include_hybrid {
                config.monitor.include_hybrid_sensor = true;
            }
        }

        config
    }

    /// Validate argument values that clap cannot check on its own
    pub fn validate(&self) -> Result<()> {
        if let Some(device) = &self.device {
            if device.trim().is_empty() {
                return Err(Error::configuration("Device path must not be empty"));
            }
        }

        if let Some(path) = &self.config_file {
            if !path.exists() {
                return Err(Error::configuration(format!(
                    "Config file does not exist: {}",
                    path.display()
                )));
            }
        }

        if let Some(Commands::Parse(parse)) = &self.command {
            if let Some(input) = &parse.input {
                if !input.exists() {
                    return Err(Error::configuration(format!(
                        "Input file does not exist: {}",
                        input.display()
                    )));
                }
            }
        }

        Ok(())
    }
}
