//! Test utilities for frame parser testing
//!
//! This module provides frame builders and fixed timestamps used across the
//! parser test modules.

use chrono::{DateTime, TimeZone, Utc};

use crate::constants::FIELD_COUNT;

// Test modules
mod field_map_tests;

/// Frame captured from a receiver with seven probes and a hybrid sensor
pub const RECEIVER_FRAME: &str =
    "$1;1;;21,1;21,2;20,8;18,4;21,6;21,2;20,8;;47;46;46;44;50;49;46;;3,1;30;8,0;455;1;0\r\n";

/// Frame from a receiver without a hybrid sensor (blank fields 19-23)
pub const NO_HYBRID_FRAME: &str =
    "$1;1;;;22,0;22,3;21,8;20,9;17,0;21,4;21,8;;50;50;47;48;60;52;47;;;;;;0\r\n";

/// Fixed capture time for deterministic assertions
pub fn create_test_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 20, 8, 15, 0).unwrap()
}

/// Build a frame with every field blank except the given overrides
pub fn create_frame(overrides: &[(usize, &str)]) -> String {
    let mut fields = vec![String::new(); FIELD_COUNT];
    fields[0] = "$1".to_string();
    fields[1] = "1".to_string();
    fields[24] = "0".to_string();
    for (index, value) in overrides {
        fields[*index] = value.to_string();
    }
    format!("{}\r\n", fields.join(";"))
}

/// Build a frame where every probe slot and hybrid value is populated
pub fn create_full_frame() -> String {
    create_frame(&[
        (3, "1,5"),
        (4, "2,5"),
        (5, "3,5"),
        (6, "4,5"),
        (7, "5,5"),
        (8, "6,5"),
        (9, "7,5"),
        (10, "8,5"),
        (11, "41"),
        (12, "42"),
        (13, "43"),
        (14, "44"),
        (15, "45"),
        (16, "46"),
        (17, "47"),
        (18, "48"),
        (19, "-2,4"),
        (20, "88"),
        (21, "12,6"),
        (22, "17"),
        (23, "0"),
    ])
}
