//! Field parsing utilities for receiver frames
//!
//! This module converts single frame fields into typed values with errors
//! that name the sensor group, field position and offending fragment.

use super::field_map::FieldSpec;
use crate::config::EmptyFieldPolicy;
use crate::constants::DEVICE_DECIMAL_SEPARATOR;
use crate::{Error, Result};
use std::num::ParseFloatError;

/// Convert a comma-decimal fragment to a float; blank means 0.0
pub fn normalize(fragment: &str) -> std::result::Result<f64, ParseFloatError> {
    if fragment.is_empty() {
        return Ok(0.0);
    }
    fragment.replace(DEVICE_DECIMAL_SEPARATOR, ".").parse::<f64>()
}

/// Parse a decimal field (temperature, humidity, wind speed)
pub fn parse_decimal(fragment: &str, spec: &FieldSpec) -> Result<f64> {
    let value = normalize(fragment).map_err(|e| {
        Error::numeric_parse(spec.group(), spec.index, fragment, e.to_string())
    })?;

    if !value.is_finite() {
        return Err(Error::numeric_parse(
            spec.group(),
            spec.index,
            fragment,
            "value is not a finite number",
        ));
    }

    Ok(value)
}

/// Parse an unsigned integer field (precipitation tally)
pub fn parse_count(fragment: &str, spec: &FieldSpec, empty: EmptyFieldPolicy) -> Result<u32> {
    if fragment.is_empty() {
        return match empty {
            EmptyFieldPolicy::Zero => Ok(0),
            EmptyFieldPolicy::Reject => Err(Error::numeric_parse(
                spec.group(),
                spec.index,
                fragment,
                "empty integer field",
            )),
        };
    }

    fragment.parse::<u32>().map_err(|e| {
        Error::numeric_parse(spec.group(), spec.index, fragment, e.to_string())
    })
}

/// Parse a boolean token field (rain flag)
pub fn parse_flag(fragment: &str, spec: &FieldSpec, empty: EmptyFieldPolicy) -> Result<bool> {
    match fragment {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
        "" if empty == EmptyFieldPolicy::Zero => Ok(false),
        "" => Err(Error::numeric_parse(
            spec.group(),
            spec.index,
            fragment,
            "empty boolean field",
        )),
        _ => Err(Error::numeric_parse(
            spec.group(),
            spec.index,
            fragment,
            "invalid boolean token",
        )),
    }
}
