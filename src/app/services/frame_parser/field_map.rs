//! Positional field table for receiver frames
//!
//! Each entry binds a field position to the value it fills in the reading
//! and the conversion used for it. Fields 0-2 and 24 carry receiver
//! bookkeeping and are deliberately absent from the table.

use crate::app::models::SensorGroup;
use crate::constants::fields::{
    HUMIDITY_START, HYBRID_HUMIDITY, HYBRID_PRECIPITATION, HYBRID_RAINING, HYBRID_TEMPERATURE,
    HYBRID_WIND_SPEED, TEMPERATURE_START,
};

/// Conversion applied to a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseKind {
    /// Comma-decimal float, blank means 0.0
    Decimal,
    /// Unsigned integer tally
    Count,
    /// Boolean token such as "0"/"1"
    Flag,
}

/// Value slot of a reading that a field fills
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldTarget {
    /// Temperature of the numbered probe
    Temperature(usize),
    /// Humidity of the numbered probe
    Humidity(usize),
    HybridTemperature,
    HybridHumidity,
    HybridWindSpeed,
    HybridPrecipitation,
    HybridRaining,
}

impl FieldTarget {
    /// Sensor group reported in parse errors
    pub const fn group(self) -> SensorGroup {
        match self {
            FieldTarget::Temperature(_) => SensorGroup::Temperature,
            FieldTarget::Humidity(_) => SensorGroup::Humidity,
            _ => SensorGroup::Hybrid,
        }
    }

    /// Conversion the target's type calls for
    pub const fn natural_kind(self) -> ParseKind {
        match self {
            FieldTarget::HybridPrecipitation => ParseKind::Count,
            FieldTarget::HybridRaining => ParseKind::Flag,
            _ => ParseKind::Decimal,
        }
    }
}

/// One row of the field table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// 0-indexed position within the frame
    pub index: usize,
    pub target: FieldTarget,
    pub kind: ParseKind,
}

impl FieldSpec {
    const fn decimal(index: usize, target: FieldTarget) -> Self {
        Self {
            index,
            target,
            kind: ParseKind::Decimal,
        }
    }

    const fn count(index: usize, target: FieldTarget) -> Self {
        Self {
            index,
            target,
            kind: ParseKind::Count,
        }
    }

    const fn flag(index: usize, target: FieldTarget) -> Self {
        Self {
            index,
            target,
            kind: ParseKind::Flag,
        }
    }

    pub const fn group(&self) -> SensorGroup {
        self.target.group()
    }
}

/// Field positions of a receiver frame
pub const FIELD_MAP: [FieldSpec; 21] = [
    FieldSpec::decimal(TEMPERATURE_START, FieldTarget::Temperature(0)),
    FieldSpec::decimal(TEMPERATURE_START + 1, FieldTarget::Temperature(1)),
    FieldSpec::decimal(TEMPERATURE_START + 2, FieldTarget::Temperature(2)),
    FieldSpec::decimal(TEMPERATURE_START + 3, FieldTarget::Temperature(3)),
    FieldSpec::decimal(TEMPERATURE_START + 4, FieldTarget::Temperature(4)),
    FieldSpec::decimal(TEMPERATURE_START + 5, FieldTarget::Temperature(5)),
    FieldSpec::decimal(TEMPERATURE_START + 6, FieldTarget::Temperature(6)),
    FieldSpec::decimal(TEMPERATURE_START + 7, FieldTarget::Temperature(7)),
    FieldSpec::decimal(HUMIDITY_START, FieldTarget::Humidity(0)),
    FieldSpec::decimal(HUMIDITY_START + 1, FieldTarget::Humidity(1)),
    FieldSpec::decimal(HUMIDITY_START + 2, FieldTarget::Humidity(2)),
    FieldSpec::decimal(HUMIDITY_START + 3, FieldTarget::Humidity(3)),
    FieldSpec::decimal(HUMIDITY_START + 4, FieldTarget::Humidity(4)),
    FieldSpec::decimal(HUMIDITY_START + 5, FieldTarget::Humidity(5)),
    FieldSpec::decimal(HUMIDITY_START + 6, FieldTarget::Humidity(6)),
    FieldSpec::decimal(HUMIDITY_START + 7, FieldTarget::Humidity(7)),
    FieldSpec::decimal(HYBRID_TEMPERATURE, FieldTarget::HybridTemperature),
    FieldSpec::decimal(HYBRID_HUMIDITY, FieldTarget::HybridHumidity),
    FieldSpec::decimal(HYBRID_WIND_SPEED, FieldTarget::HybridWindSpeed),
    FieldSpec::count(HYBRID_PRECIPITATION, FieldTarget::HybridPrecipitation),
    FieldSpec::flag(HYBRID_RAINING, FieldTarget::HybridRaining),
];
