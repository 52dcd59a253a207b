//! Application constants for the USB-WDE1 receiver
//!
//! This module contains the wire format layout, serial defaults and
//! monitoring intervals used throughout the crate.

use std::time::Duration;

// =============================================================================
// Wire Format
// =============================================================================

/// Number of `;`-separated fields in every valid frame
pub const FIELD_COUNT: usize = 25;

/// Field separator within a frame
pub const FIELD_SEPARATOR: char = ';';

/// Byte that terminates a frame (line feed)
pub const FRAME_TERMINATOR: u8 = b'\n';

/// Upper bound on bytes read while waiting for a terminator
///
/// A full frame is well under 200 bytes; anything past this is line noise.
pub const MAX_FRAME_LEN: usize = 512;

/// Decimal separator emitted by the receiver
pub const DEVICE_DECIMAL_SEPARATOR: char = ',';

/// Number of independently numbered temperature/humidity probes
pub const PROBE_COUNT: usize = 8;

/// Field layout of a frame (0-indexed positions)
pub mod fields {
    /// First temperature field (probe 0)
    pub const TEMPERATURE_START: usize = 3;

    /// First humidity field (probe 0)
    pub const HUMIDITY_START: usize = 11;

    pub const HYBRID_TEMPERATURE: usize = 19;
    pub const HYBRID_HUMIDITY: usize = 20;
    pub const HYBRID_WIND_SPEED: usize = 21;
    pub const HYBRID_PRECIPITATION: usize = 22;
    pub const HYBRID_RAINING: usize = 23;
}

/// Threshold below which a measurement counts as absent
pub const VALUE_DELTA: f64 = 0.000001;

/// Timestamp format for rendered readings (RFC 1123, always UTC)
pub const READING_TIMESTAMP_FORMAT: &str = "%a, %d %b %Y %H:%M:%S UTC";

// =============================================================================
// Serial Defaults
// =============================================================================

/// Default device path of the receiver
pub const DEFAULT_DEVICE_PATH: &str = "/dev/ttyUSB0";

/// Line settings of the receiver (9600 8N1)
pub const DEFAULT_BAUD_RATE: u32 = 9600;
pub const DEFAULT_DATA_BITS: u8 = 8;
pub const DEFAULT_STOP_BITS: u8 = 1;

/// Read timeout; the receiver emits roughly every three minutes
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(300);

// =============================================================================
// Monitoring Defaults
// =============================================================================

/// Pause before reopening the device after a failure
pub const DEFAULT_REOPEN_BACKOFF: Duration = Duration::from_secs(10);

/// Age after which the latest reading is reported as stale
pub const DEFAULT_MAX_DATA_AGE: Duration = Duration::from_secs(120);

/// Interval between status reports from the monitor
pub const DEFAULT_STATUS_INTERVAL: Duration = Duration::from_secs(30);

/// Log filter target
pub const LOG_TARGET: &str = "usbwde";
