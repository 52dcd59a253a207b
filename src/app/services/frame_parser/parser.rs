//! Core frame parser implementation
//!
//! This module validates the shape of a frame, walks the field table and
//! assembles the resulting reading.

use chrono::{DateTime, Utc};
use tracing::debug;

use super::field_map::{FIELD_MAP, FieldSpec, FieldTarget, ParseKind};
use super::field_parsers::{parse_count, parse_decimal, parse_flag};
use crate::app::models::{HybridSensor, Reading};
use crate::config::ParserConfig;
use crate::constants::{FIELD_COUNT, FIELD_SEPARATOR, PROBE_COUNT};
use crate::{Error, Result};

/// A converted field value before it is placed in the reading
#[derive(Debug, Clone, Copy, PartialEq)]
enum FieldValue {
    Decimal(f64),
    Count(u32),
    Flag(bool),
}

/// Values collected while walking the field table
#[derive(Debug, Default)]
struct ReadingParts {
    temperature: [f64; PROBE_COUNT],
    humidity: [f64; PROBE_COUNT],
    hybrid_sensor: HybridSensor,
}

impl ReadingParts {
    fn assign(&mut self, spec: &FieldSpec, value: FieldValue) -> Result<()> {
        match (spec.target, value) {
            (FieldTarget::Temperature(slot), FieldValue::Decimal(v)) if slot < PROBE_COUNT => {
                self.temperature[slot] = v
            }
            (FieldTarget::Humidity(slot), FieldValue::Decimal(v)) if slot < PROBE_COUNT => {
                self.humidity[slot] = v
            }
            (FieldTarget::HybridTemperature, FieldValue::Decimal(v)) => {
                self.hybrid_sensor.temperature = v
            }
            (FieldTarget::HybridHumidity, FieldValue::Decimal(v)) => {
                self.hybrid_sensor.humidity = v
            }
            (FieldTarget::HybridWindSpeed, FieldValue::Decimal(v)) => {
                self.hybrid_sensor.wind_speed = v
            }
            (FieldTarget::HybridPrecipitation, FieldValue::Count(v)) => {
                self.hybrid_sensor.precipitation_count = v
            }
            (FieldTarget::HybridRaining, FieldValue::Flag(v)) => self.hybrid_sensor.is_raining = v,
            (target, value) => {
                return Err(Error::configuration(format!(
                    "Field {} cannot place {:?} into {:?}",
                    spec.index, value, target
                )));
            }
        }
        Ok(())
    }

    fn into_reading(self, captured_at: DateTime<Utc>) -> Reading {
        Reading::new(captured_at, self.temperature, self.humidity, self.hybrid_sensor)
    }
}

/// Parser for receiver frames
///
/// Stateless apart from its configuration; a single parser can be reused
/// for every frame from a device.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameParser {
    config: ParserConfig,
}

impl FrameParser {
    /// Create a new parser with the given field policy
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Field policy this parser was built with
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse a frame, stamping the reading with the current time
    pub fn parse(&self, frame: &[u8]) -> Result<Reading> {
        self.parse_at(frame, Utc::now())
    }

    /// Parse a frame with an explicit capture time
    pub fn parse_at(&self, frame: &[u8], captured_at: DateTime<Utc>) -> Result<Reading> {
        let fields = split_fields(frame)?;

        let mut parts = ReadingParts::default();
        for spec in FIELD_MAP.iter() {
            let fragment = fields[spec.index];
            let value = match spec.kind {
                ParseKind::Decimal => FieldValue::Decimal(parse_decimal(fragment, spec)?),
                ParseKind::Count => FieldValue::Count(parse_count(
                    fragment,
                    spec,
                    self.config.empty_hybrid_fields,
                )?),
                ParseKind::Flag => FieldValue::Flag(parse_flag(
                    fragment,
                    spec,
                    self.config.empty_hybrid_fields,
                )?),
            };
            parts.assign(spec, value)?;
        }

        debug!("Parsed frame with {} mapped fields", FIELD_MAP.len());
        Ok(parts.into_reading(captured_at))
    }
}

/// Decode a frame and split it into exactly [`FIELD_COUNT`] fields
///
/// The line terminator is stripped first; it never belongs to a mapped field.
pub fn split_fields(frame: &[u8]) -> Result<Vec<&str>> {
    let text = std::str::from_utf8(frame).map_err(|e| {
        Error::format(
            String::from_utf8_lossy(frame).trim_end(),
            format!("frame is not valid text: {}", e),
        )
    })?;

    let line = text.trim_end_matches(|c: char| c == '\r' || c == '\n');
    let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();

    if fields.len() != FIELD_COUNT {
        return Err(Error::format(
            line,
            format!("expected {} fields, found {}", FIELD_COUNT, fields.len()),
        ));
    }

    Ok(fields)
}
