//! Data models for receiver readings
//!
//! This module contains the snapshot produced from one receiver frame: eight
//! numbered temperature/humidity probes plus the combined hybrid sensor, along
//! with the completeness heuristic and the diagnostic rendering.

use crate::constants::{PROBE_COUNT, READING_TIMESTAMP_FORMAT, VALUE_DELTA};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Sensor Groups
// =============================================================================

/// Logical group a frame field belongs to, used for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorGroup {
    /// Probe temperatures (fields 3-10)
    Temperature,
    /// Probe humidities (fields 11-18)
    Humidity,
    /// Hybrid sensor block (fields 19-23)
    Hybrid,
}

impl fmt::Display for SensorGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SensorGroup::Temperature => "temperature",
            SensorGroup::Humidity => "humidity",
            SensorGroup::Hybrid => "hybrid sensor",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Hybrid Sensor
// =============================================================================

/// Data from the combined secondary sensor (if present)
///
/// Every field is zero/false when the receiver reports the block as blank.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HybridSensor {
    /// Temperature in °C
    pub temperature: f64,

    /// Relative humidity in %
    pub humidity: f64,

    /// Wind speed in km/h
    pub wind_speed: f64,

    /// Precipitation tally since the device's last reset
    pub precipitation_count: u32,

    /// Rain sensor state
    pub is_raining: bool,
}

impl HybridSensor {
    /// Check whether the block is indistinguishable from an absent sensor
    pub fn looks_absent(&self) -> bool {
        self.temperature.abs() < VALUE_DELTA
            && self.humidity < VALUE_DELTA
            && self.wind_speed.abs() < VALUE_DELTA
            && !self.is_raining
            && self.precipitation_count == 0
    }
}

// =============================================================================
// Completeness
// =============================================================================

/// Why a reading failed the completeness check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IncompleteReason {
    /// Both temperature and humidity of this probe slot are zero
    Probe(usize),
    /// Every hybrid sensor value is zero and it is not raining
    HybridSensorAbsent,
}

impl fmt::Display for IncompleteReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IncompleteReason::Probe(index) => write!(
                f,
                "missing temperature and humidity data for index {}",
                index
            ),
            IncompleteReason::HybridSensorAbsent => write!(f, "missing hybrid sensor data"),
        }
    }
}

// =============================================================================
// Reading
// =============================================================================

/// A set of values taken from one receiver frame
///
/// Built once by the frame parser and never modified afterwards. Zero and
/// "not reported" are the same value here: a probe that measured exactly 0 °C
/// and 0 % cannot be told apart from an empty slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    captured_at: DateTime<Utc>,
    temperature: [f64; PROBE_COUNT],
    humidity: [f64; PROBE_COUNT],
    hybrid_sensor: HybridSensor,
}

impl Reading {
    /// Create a reading from already normalized values
    pub fn new(
        captured_at: DateTime<Utc>,
        temperature: [f64; PROBE_COUNT],
        humidity: [f64; PROBE_COUNT],
        hybrid_sensor: HybridSensor,
    ) -> Self {
        Self {
            captured_at,
            temperature,
            humidity,
            hybrid_sensor,
        }
    }

    /// Time the frame was parsed
    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    /// Probe temperatures in °C, indexed by probe number
    pub fn temperature(&self) -> &[f64; PROBE_COUNT] {
        &self.temperature
    }

    /// Probe humidities in %, indexed by probe number
    pub fn humidity(&self) -> &[f64; PROBE_COUNT] {
        &self.humidity
    }

    pub fn hybrid_sensor(&self) -> &HybridSensor {
        &self.hybrid_sensor
    }

    /// Check that every probe slot (and optionally the hybrid sensor) reports data
    ///
    /// A probe slot counts as present when its temperature or its humidity is
    /// distinguishable from zero. The first failing slot is reported.
    pub fn check_complete(&self, include_hybrid_sensor: bool) -> Result<()> {
        for index in 0..PROBE_COUNT {
            if self.temperature[index].abs() < VALUE_DELTA && self.humidity[index] < VALUE_DELTA {
                return Err(Error::incomplete_data(IncompleteReason::Probe(index)));
            }
        }

        if include_hybrid_sensor && self.hybrid_sensor.looks_absent() {
            return Err(Error::incomplete_data(IncompleteReason::HybridSensorAbsent));
        }

        Ok(())
    }

    /// Boolean form of [`Reading::check_complete`]
    pub fn is_complete(&self, include_hybrid_sensor: bool) -> bool {
        self.check_complete(include_hybrid_sensor).is_ok()
    }
}

fn write_series(f: &mut fmt::Formatter<'_>, values: &[f64], one_decimal: bool) -> fmt::Result {
    f.write_str("(")?;
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        if one_decimal {
            write!(f, "{:.1}", value)?;
        } else {
            write!(f, "{}", value)?;
        }
    }
    f.write_str(")")
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.captured_at.format(READING_TIMESTAMP_FORMAT))?;
        write_series(f, &self.temperature, true)?;
        f.write_str("°C ")?;
        write_series(f, &self.humidity, false)?;
        let hybrid = &self.hybrid_sensor;
        write!(
            f,
            "% - Hybrid Sensor: {:.1}°C, {}%, {:.1}km/h, isRaining: {} ({})",
            hybrid.temperature,
            hybrid.humidity,
            hybrid.wind_speed,
            hybrid.is_raining,
            hybrid.precipitation_count
        )
    }
}
