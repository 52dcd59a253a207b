//! Shared components for CLI commands
//!
//! This module contains the run summary reported by every command and the
//! handling of per-reading completeness warnings.

use tracing::warn;

use crate::app::models::Reading;

/// Statistics for reporting across all commands
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of readings parsed successfully
    pub readings_parsed: usize,
    /// Number of frames discarded as malformed
    pub frames_discarded: usize,
    /// Number of readings that failed the completeness check
    pub incomplete_readings: usize,
    /// Number of times the device was opened
    pub connections: usize,
    /// Treat discarded frames as a failed run (offline parsing)
    pub discards_are_failures: bool,
}

impl RunSummary {
    /// Whether the run should exit with a success status
    pub fn is_success(&self) -> bool {
        !(self.discards_are_failures && self.frames_discarded > 0)
    }

    /// Count a parsed reading, warning when it looks incomplete
    pub fn record_reading(&mut self, source: &str, reading: &Reading, include_hybrid: bool) {
        self.readings_parsed += 1;
        if let Err(e) = reading.check_complete(include_hybrid) {
            self.incomplete_readings += 1;
            warn!("Reading from {} is incomplete: {}", source, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::HybridSensor;
    use chrono::Utc;

    #[test]
    fn test_record_reading_counts_incomplete() {
        let mut summary = RunSummary::default();
        let complete = Reading::new(Utc::now(), [20.0; 8], [50.0; 8], HybridSensor::default());
        let mut temperature = [20.0; 8];
        temperature[6] = 0.0;
        let mut humidity = [50.0; 8];
        humidity[6] = 0.0;
        let incomplete = Reading::new(Utc::now(), temperature, humidity, HybridSensor::default());

        summary.record_reading("test", &complete, false);
        summary.record_reading("test", &complete, true);
        summary.record_reading("test", &incomplete, false);

        assert_eq!(summary.readings_parsed, 3);
        assert_eq!(summary.incomplete_readings, 2);
    }

    #[test]
    fn test_success_depends_on_discard_policy() {
        let mut summary = RunSummary {
            frames_discarded: 2,
            ..RunSummary::default()
        };
        assert!(summary.is_success());

        summary.discards_are_failures = true;
        assert!(!summary.is_success());
    }
}
