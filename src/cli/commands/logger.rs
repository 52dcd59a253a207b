//! Log command: open the receiver once and log every reading

use std::io::Read;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use super::shared::RunSummary;
use crate::app::services::device::Device;
use crate::config::Config;
use crate::{Error, ErrorDisposition, Result};

/// Open the configured device and log readings until the stream fails
pub async fn run_log(
    config: Config,
    include_hybrid: bool,
    cancellation_token: CancellationToken,
) -> Result<RunSummary> {
    tokio::task::spawn_blocking(move || {
        let mut device = Device::open(&config.serial, config.parser)?;
        let mut summary = RunSummary {
            connections: 1,
            ..RunSummary::default()
        };

        let result = log_readings(&mut device, include_hybrid, &cancellation_token, &mut summary);
        device.close();
        result.map(|_| summary)
    })
    .await
    .map_err(|e| Error::io("Reader task failed", std::io::Error::other(e)))?
}

/// Read and log until cancelled or the transport fails
///
/// Malformed frames are logged and skipped; any other error ends the loop.
pub fn log_readings<T: Read>(
    device: &mut Device<T>,
    include_hybrid: bool,
    cancellation_token: &CancellationToken,
    summary: &mut RunSummary,
) -> Result<()> {
    while !cancellation_token.is_cancelled() {
        match device.read() {
            Ok(reading) => {
                info!("Read data from {}: {}", device.name(), reading);
                summary.record_reading(device.name(), &reading, include_hybrid);
            }
            Err(e) if e.disposition() == ErrorDisposition::DiscardFrame => {
                warn!("Discarding frame from {}: {}", device.name(), e);
                summary.frames_discarded += 1;
            }
            Err(e) => {
                error!("Error reading data from {}: {}", device.name(), e);
                return Err(e);
            }
        }
    }

    info!("Stopped reading from {}", device.name());
    Ok(())
}
