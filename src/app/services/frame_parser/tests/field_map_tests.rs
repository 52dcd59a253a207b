//! Consistency checks for the positional field table

use crate::app::models::SensorGroup;
use crate::app::services::frame_parser::{FIELD_MAP, FieldTarget};
use crate::constants::{FIELD_COUNT, PROBE_COUNT};
use std::collections::HashSet;

#[test]
fn test_indices_are_unique_and_within_frame() {
    let mut seen = HashSet::new();
    for spec in FIELD_MAP.iter() {
        assert!(spec.index < FIELD_COUNT, "index {} out of range", spec.index);
        assert!(seen.insert(spec.index), "index {} mapped twice", spec.index);
    }
}

#[test]
fn test_reserved_fields_are_unmapped() {
    for reserved in [0, 1, 2, 24] {
        assert!(
            FIELD_MAP.iter().all(|spec| spec.index != reserved),
            "field {} must stay unmapped",
            reserved
        );
    }
}

#[test]
fn test_kind_matches_target() {
    for spec in FIELD_MAP.iter() {
        assert_eq!(
            spec.kind,
            spec.target.natural_kind(),
            "field {} has mismatched parse kind",
            spec.index
        );
    }
}

#[test]
fn test_every_probe_slot_is_mapped_once() {
    for slot in 0..PROBE_COUNT {
        let temperature: Vec<usize> = FIELD_MAP
            .iter()
            .filter(|spec| spec.target == FieldTarget::Temperature(slot))
            .map(|spec| spec.index)
            .collect();
        let humidity: Vec<usize> = FIELD_MAP
            .iter()
            .filter(|spec| spec.target == FieldTarget::Humidity(slot))
            .map(|spec| spec.index)
            .collect();

        assert_eq!(temperature, vec![3 + slot]);
        assert_eq!(humidity, vec![11 + slot]);
    }
}

#[test]
fn test_hybrid_block_positions() {
    let hybrid: Vec<(usize, FieldTarget)> = FIELD_MAP
        .iter()
        .filter(|spec| spec.group() == SensorGroup::Hybrid)
        .map(|spec| (spec.index, spec.target))
        .collect();

    assert_eq!(
        hybrid,
        vec![
            (19, FieldTarget::HybridTemperature),
            (20, FieldTarget::HybridHumidity),
            (21, FieldTarget::HybridWindSpeed),
            (22, FieldTarget::HybridPrecipitation),
            (23, FieldTarget::HybridRaining),
        ]
    );
}
