//! Monitor command: reconnecting polling loop with periodic status output
//!
//! The polling loop owns the device and writes into a [`StatusHolder`]; a
//! reporter task reads the holder and prints one JSON status line per
//! interval on stdout. Both stop when the cancellation token fires.

use chrono::{DateTime, Utc};
use std::io::Read;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::shared::RunSummary;
use crate::app::services::device::Device;
use crate::app::services::status::{Status, StatusHolder};
use crate::config::{Config, MonitorConfig};
use crate::{Error, ErrorDisposition, Result};

/// Run the monitor until cancelled
pub async fn run_monitor(
    config: Config,
    cancellation_token: CancellationToken,
) -> Result<RunSummary> {
    let holder = StatusHolder::new();

    let reporter = tokio::spawn(report_status(
        holder.clone(),
        config.monitor.clone(),
        cancellation_token.clone(),
    ));

    let serial = config.serial.clone();
    let parser = config.parser;
    let result = poll_device(
        &serial.device_path,
        || Device::open(&serial, parser),
        &holder,
        &config.monitor,
        &cancellation_token,
    )
    .await;

    cancellation_token.cancel();
    reporter
        .await
        .map_err(|e| Error::io("Status reporter failed", std::io::Error::other(e)))?;

    let summary = result?;
    info!(
        "Monitor stopped after {} connection(s), {} reading(s), {} discarded frame(s)",
        summary.connections, summary.readings_parsed, summary.frames_discarded
    );
    Ok(summary)
}

/// Open, read and reopen until the token is cancelled
///
/// `open` is called for every (re)connection attempt. Blocking reads run on
/// the blocking pool; on cancellation an in-flight read is abandoned and its
/// device dropped once the read returns. Errors are handled by their
/// [`ErrorDisposition`]; a fatal one ends the loop and is returned.
pub async fn poll_device<T, F>(
    name: &str,
    mut open: F,
    holder: &StatusHolder,
    monitor: &MonitorConfig,
    cancellation_token: &CancellationToken,
) -> Result<RunSummary>
where
    T: Read + Send + 'static,
    F: FnMut() -> Result<Device<T>>,
{
    let mut summary = RunSummary::default();

    while !cancellation_token.is_cancelled() {
        let mut device = match open() {
            Ok(device) => {
                summary.connections += 1;
                debug!("Connection {} to {} established", summary.connections, name);
                device
            }
            Err(e) => {
                error!("Error opening {}: {}", name, e);
                holder.record_error(format!("Error opening {}: {}", name, e));
                if e.disposition() == ErrorDisposition::Fatal {
                    return Err(e);
                }
                if !back_off(monitor.reopen_backoff, cancellation_token).await {
                    break;
                }
                continue;
            }
        };

        loop {
            let read = tokio::task::spawn_blocking(move || {
                let result = device.read();
                (device, result)
            });

            let joined = tokio::select! {
                _ = cancellation_token.cancelled() => {
                    debug!("Cancelled while waiting for a frame from {}", name);
                    return Ok(summary);
                }
                joined = read => joined,
            };

            let (returned, result) = match joined {
                Ok(pair) => pair,
                Err(e) => {
                    error!("Reader task for {} failed: {}", name, e);
                    holder.record_error(format!("Error reading data from {}: {}", name, e));
                    if !back_off(monitor.reopen_backoff, cancellation_token).await {
                        return Ok(summary);
                    }
                    break;
                }
            };
            device = returned;

            let e = match result {
                Ok(reading) => {
                    debug!("Read data from {}: {}", name, reading);
                    summary.record_reading(name, &reading, monitor.include_hybrid_sensor);
                    holder.record_reading(reading);
                    continue;
                }
                Err(e) => e,
            };

            holder.record_error(format!("Error reading data from {}: {}", name, e));
            match e.disposition() {
                ErrorDisposition::DiscardFrame | ErrorDisposition::Informational => {
                    warn!("Discarding frame from {}: {}", name, e);
                    summary.frames_discarded += 1;
                }
                ErrorDisposition::Reopen | ErrorDisposition::RetryOpen => {
                    error!("Error reading data from {}: {}", name, e);
                    device.close();
                    if !back_off(monitor.reopen_backoff, cancellation_token).await {
                        return Ok(summary);
                    }
                    break;
                }
                ErrorDisposition::Fatal => {
                    error!("Giving up on {}: {}", name, e);
                    device.close();
                    return Err(e);
                }
            }
        }
    }

    Ok(summary)
}

/// Sleep for `backoff`; returns false when cancelled first
async fn back_off(backoff: Duration, cancellation_token: &CancellationToken) -> bool {
    debug!("Backing off for {}s", backoff.as_secs());
    tokio::select! {
        _ = cancellation_token.cancelled() => false,
        _ = tokio::time::sleep(backoff) => true,
    }
}

/// Print a status line every interval until cancelled
async fn report_status(
    holder: StatusHolder,
    monitor: MonitorConfig,
    cancellation_token: CancellationToken,
) {
    let mut interval = tokio::time::interval(monitor.status_interval);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancellation_token.cancelled() => break,
            _ = interval.tick() => {
                let status = holder.snapshot();
                match render_status_line(&status, Utc::now(), monitor.max_data_age) {
                    Ok(line) => println!("{}", line),
                    Err(e) => error!("Failed to render status: {}", e),
                }
            }
        }
    }
}

/// Serialize the status as published at `now`
pub fn render_status_line(
    status: &Status,
    now: DateTime<Utc>,
    max_age: Duration,
) -> Result<String> {
    let report = status.report(now, max_age);
    if report.health.is_none() {
        debug!("No health data yet");
    }
    Ok(serde_json::to_string(&report)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::{HybridSensor, Reading};
    use crate::config::ParserConfig;
    use chrono::TimeZone;
    use std::io::Cursor;

    const FRAME: &str =
        "$1;1;;21,1;21,2;20,8;18,4;21,6;21,2;20,8;;47;46;46;44;50;49;46;;3,1;30;8,0;455;1;0\r\n";

    fn create_monitor_config() -> MonitorConfig {
        MonitorConfig {
            reopen_backoff: Duration::from_millis(10),
            ..MonitorConfig::default()
        }
    }

    fn missing_device(path: &str) -> Error {
        Error::open(
            path,
            serialport::Error::new(serialport::ErrorKind::NoDevice, "missing"),
        )
    }

    /// Transport whose driver blows up on the first read
    struct PanickingTransport;

    impl Read for PanickingTransport {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            panic!("driver bug");
        }
    }

    #[tokio::test]
    async fn test_reads_then_reconnects_after_stream_ends() {
        let holder = StatusHolder::new();
        let token = CancellationToken::new();
        let mut attempts = 0;

        let opener_token = token.clone();
        let summary = poll_device(
            "/dev/ttyTEST",
            || {
                attempts += 1;
                if attempts == 1 {
                    let stream = format!("{}$1;short\r\n{}", FRAME, FRAME);
                    Ok(Device::from_transport(
                        "/dev/ttyTEST",
                        Cursor::new(stream.into_bytes()),
                        ParserConfig::default(),
                    ))
                } else {
                    opener_token.cancel();
                    Err(missing_device("/dev/ttyTEST"))
                }
            },
            &holder,
            &create_monitor_config(),
            &token,
        )
        .await
        .unwrap();

        assert_eq!(summary.connections, 1);
        assert_eq!(summary.readings_parsed, 2);
        assert_eq!(summary.frames_discarded, 1);

        let status = holder.snapshot();
        assert!(status.latest.is_some());
        let health = status.health.unwrap();
        assert!(!health.ok);
        assert!(health.details.starts_with("Error opening /dev/ttyTEST"));
    }

    #[tokio::test]
    async fn test_open_failure_marks_unhealthy() {
        let holder = StatusHolder::new();
        let token = CancellationToken::new();

        let opener_token = token.clone();
        let summary = poll_device::<Cursor<Vec<u8>>, _>(
            "/dev/ttyMISSING",
            || {
                opener_token.cancel();
                Err(missing_device("/dev/ttyMISSING"))
            },
            &holder,
            &create_monitor_config(),
            &token,
        )
        .await
        .unwrap();

        assert_eq!(summary.connections, 0);
        let status = holder.snapshot();
        assert!(status.latest.is_none());
        assert!(!status.health.unwrap().ok);
    }

    #[tokio::test]
    async fn test_failed_reader_task_backs_off_before_reopening() {
        let holder = StatusHolder::new();
        let token = CancellationToken::new();
        let monitor = MonitorConfig {
            reopen_backoff: Duration::from_millis(50),
            ..MonitorConfig::default()
        };
        let mut opened_at = Vec::new();

        let opener_token = token.clone();
        let summary = poll_device(
            "/dev/ttyTEST",
            || {
                opened_at.push(std::time::Instant::now());
                if opened_at.len() == 1 {
                    Ok(Device::from_transport(
                        "/dev/ttyTEST",
                        PanickingTransport,
                        ParserConfig::default(),
                    ))
                } else {
                    opener_token.cancel();
                    Err(missing_device("/dev/ttyTEST"))
                }
            },
            &holder,
            &monitor,
            &token,
        )
        .await
        .unwrap();

        assert_eq!(summary.connections, 1);
        assert_eq!(opened_at.len(), 2);
        assert!(opened_at[1] - opened_at[0] >= monitor.reopen_backoff);
    }

    #[tokio::test]
    async fn test_fatal_open_error_ends_loop() {
        let holder = StatusHolder::new();
        let token = CancellationToken::new();
        let mut attempts = 0;

        let result = poll_device::<Cursor<Vec<u8>>, _>(
            "/dev/ttyTEST",
            || {
                attempts += 1;
                Err(Error::configuration("Baud rate must be greater than 0"))
            },
            &holder,
            &create_monitor_config(),
            &token,
        )
        .await;

        assert!(matches!(result, Err(Error::Configuration { .. })));
        assert_eq!(attempts, 1);
        assert!(!token.is_cancelled());
        let health = holder.snapshot().health.unwrap();
        assert!(health.details.contains("Baud rate must be greater than 0"));
    }

    #[test]
    fn test_status_line_before_first_event() {
        let status = Status::default();
        let line = render_status_line(&status, Utc::now(), Duration::from_secs(120)).unwrap();
        assert_eq!(line, r#"{"health":null,"reading":null}"#);
    }

    #[test]
    fn test_status_line_reports_stale_data() {
        let captured_at = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
        let holder = StatusHolder::new();
        holder.record_reading(Reading::new(
            captured_at,
            [20.0; 8],
            [50.0; 8],
            HybridSensor::default(),
        ));

        let line = render_status_line(
            &holder.snapshot(),
            captured_at + chrono::Duration::seconds(300),
            Duration::from_secs(120),
        )
        .unwrap();
        let json: serde_json::Value = serde_json::from_str(&line).unwrap();

        assert_eq!(json["health"]["ok"], false);
        assert_eq!(json["health"]["details"], "Data is older than 120s");
        assert_eq!(json["reading"]["humidity"][7], 50.0);
    }
}
