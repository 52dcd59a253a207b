//! USB-WDE1 Receiver Library
//!
//! A Rust library for reading telemetry from ELV USB-WDE1 style weather-station
//! receivers attached over a serial line.
//!
//! This library provides tools for:
//! - Reading newline-terminated ASCII frames from a serial transport
//! - Parsing the 25-field semicolon format with comma-decimal numbers
//! - Assembling fixed-shape readings for eight probes plus the hybrid sensor
//! - Judging whether a reading is complete and rendering it for logs
//! - Sharing the latest reading and health between a polling loop and reporters

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod device;
        pub mod frame_parser;
        pub mod frame_reader;
        pub mod status;
    }
    pub mod adapters {
        pub mod serial;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{HybridSensor, IncompleteReason, Reading, SensorGroup};
pub use app::services::device::Device;
pub use app::services::frame_parser::FrameParser;
pub use app::services::frame_reader::FrameReader;
pub use app::services::status::{Health, Status, StatusHolder};
pub use config::{Config, EmptyFieldPolicy};

/// Result type alias for receiver operations
pub type Result<T> = std::result::Result<T, Error>;

/// How a caller should react to an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorDisposition {
    /// The transport could not be opened; try again later
    RetryOpen,
    /// The stream broke; close the device and reopen it
    Reopen,
    /// The frame was malformed; log it and keep reading
    DiscardFrame,
    /// The reading is usable but looks partially absent
    Informational,
    /// Not recoverable by retrying
    Fatal,
}

/// Error types for receiver operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Serial transport could not be opened
    #[error("Failed to open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: serialport::Error,
    },

    /// I/O operation failed mid-stream
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Frame does not have the expected shape
    #[error("Invalid frame ({reason}): {frame}")]
    Format { frame: String, reason: String },

    /// A mapped field is non-empty but not parseable for its type
    #[error("Failed to parse {group} value from field {field_index} ('{fragment}'): {reason}")]
    NumericParse {
        group: SensorGroup,
        field_index: usize,
        fragment: String,
        reason: String,
    },

    /// Reading parsed but fails the completeness predicate
    #[error("Incomplete data: {reason}")]
    IncompleteData { reason: IncompleteReason },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl Error {
    /// Create an open error for a device path
    pub fn open(path: impl Into<String>, source: serialport::Error) -> Self {
        Self::Open {
            path: path.into(),
            source,
        }
    }

    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a frame format error
    pub fn format(frame: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Format {
            frame: frame.into(),
            reason: reason.into(),
        }
    }

    /// Create a numeric parse error for a mapped field
    pub fn numeric_parse(
        group: SensorGroup,
        field_index: usize,
        fragment: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::NumericParse {
            group,
            field_index,
            fragment: fragment.into(),
            reason: reason.into(),
        }
    }

    /// Create an incomplete data error
    pub fn incomplete_data(reason: IncompleteReason) -> Self {
        Self::IncompleteData { reason }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Classify the error into the action a polling loop should take
    pub fn disposition(&self) -> ErrorDisposition {
        match self {
            Self::Open { .. } => ErrorDisposition::RetryOpen,
            Self::Io { .. } => ErrorDisposition::Reopen,
            Self::Format { .. } | Self::NumericParse { .. } => ErrorDisposition::DiscardFrame,
            Self::IncompleteData { .. } => ErrorDisposition::Informational,
            Self::Configuration { .. } => ErrorDisposition::Fatal,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::Configuration {
            message: format!("Invalid JSON: {}", error),
        }
    }
}
