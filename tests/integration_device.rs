//! Integration tests for reading receiver streams through the public API
//!
//! Transports are in-memory byte streams shaped like what the receiver sends
//! over the serial line, so no hardware is needed.

use std::io::{Cursor, Read};
use std::time::Duration;
use usbwde::config::ParserConfig;
use usbwde::{Device, EmptyFieldPolicy, Error, ErrorDisposition, IncompleteReason, StatusHolder};

const RECEIVER_FRAME: &str =
    "$1;1;;21,1;21,2;20,8;18,4;21,6;21,2;20,8;;47;46;46;44;50;49;46;;3,1;30;8,0;455;1;0\r\n";
const NO_HYBRID_FRAME: &str =
    "$1;1;;;22,0;22,3;21,8;20,9;17,0;21,4;21,8;;50;50;47;48;60;52;47;;;;;;0\r\n";

/// Transport that hands out its data a few bytes at a time
struct TrickleTransport {
    data: Cursor<Vec<u8>>,
    chunk: usize,
}

impl Read for TrickleTransport {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let len = buf.len().min(self.chunk);
        self.data.read(&mut buf[..len])
    }
}

/// Session recorded from a receiver: a good frame, line noise, a good frame
///
/// Purpose: Validate that one stream yields successive readings across a bad frame
/// Benefit: A garbled line must cost one frame, not the connection
#[test]
fn test_recorded_session() {
    let session = format!("{}$1;1;;2\r\n{}", RECEIVER_FRAME, RECEIVER_FRAME);
    let mut device = Device::from_transport(
        "/dev/ttyUSB0",
        TrickleTransport {
            data: Cursor::new(session.into_bytes()),
            chunk: 7,
        },
        ParserConfig::default(),
    );

    let first = device.read().expect("first frame should parse");
    assert_eq!(
        first.temperature(),
        &[21.1, 21.2, 20.8, 18.4, 21.6, 21.2, 20.8, 0.0]
    );
    assert_eq!(
        first.humidity(),
        &[47.0, 46.0, 46.0, 44.0, 50.0, 49.0, 46.0, 0.0]
    );
    let hybrid = first.hybrid_sensor();
    assert_eq!(hybrid.temperature, 3.1);
    assert_eq!(hybrid.humidity, 30.0);
    assert_eq!(hybrid.wind_speed, 8.0);
    assert_eq!(hybrid.precipitation_count, 455);
    assert!(hybrid.is_raining);

    let error = device.read().expect_err("short frame should be rejected");
    assert_eq!(error.disposition(), ErrorDisposition::DiscardFrame);

    let second = device.read().expect("stream should resume after a bad frame");
    assert_eq!(second.temperature(), first.temperature());

    let error = device.read().expect_err("end of stream should surface");
    assert!(matches!(error, Error::Io { .. }));
    assert_eq!(error.disposition(), ErrorDisposition::Reopen);

    device.close();
}

/// Receivers without a hybrid sensor leave fields 19-23 blank
///
/// Purpose: Validate the empty-field policy end to end
/// Benefit: Operators can opt into accepting such receivers
#[test]
fn test_receiver_without_hybrid_sensor() {
    let mut strict = Device::from_transport(
        "strict",
        Cursor::new(NO_HYBRID_FRAME.as_bytes().to_vec()),
        ParserConfig::default(),
    );
    let error = strict.read().expect_err("blank count should be rejected by default");
    assert!(matches!(error, Error::NumericParse { field_index: 22, .. }));

    let mut lenient = Device::from_transport(
        "lenient",
        Cursor::new(NO_HYBRID_FRAME.as_bytes().to_vec()),
        ParserConfig {
            empty_hybrid_fields: EmptyFieldPolicy::Zero,
        },
    );
    let reading = lenient.read().expect("lenient policy should accept blank fields");

    assert!(reading.hybrid_sensor().looks_absent());
    match reading.check_complete(false) {
        Err(Error::IncompleteData { reason }) => assert_eq!(reason, IncompleteReason::Probe(0)),
        other => panic!("expected probe 0 to be missing, got {:?}", other),
    }
    assert!(matches!(
        reading.check_complete(true),
        Err(Error::IncompleteData {
            reason: IncompleteReason::Probe(0)
        })
    ));
}

/// Readings flow into the shared status and age out
///
/// Purpose: Validate the status holder with readings from a device
/// Benefit: Health reporting reflects what the loop actually read
#[test]
fn test_status_from_device_readings() {
    let holder = StatusHolder::new();
    let mut device = Device::from_transport(
        "/dev/ttyUSB0",
        Cursor::new(RECEIVER_FRAME.as_bytes().to_vec()),
        ParserConfig::default(),
    );

    let reading = device.read().unwrap();
    let captured_at = reading.captured_at();
    holder.record_reading(reading);

    let status = holder.snapshot();
    let fresh = status
        .health_at(captured_at + chrono::Duration::seconds(5), Duration::from_secs(120))
        .unwrap();
    assert!(fresh.ok);

    let stale = status
        .health_at(captured_at + chrono::Duration::seconds(600), Duration::from_secs(120))
        .unwrap();
    assert!(!stale.ok);
    assert_eq!(stale.details, "Data is older than 120s");

    if let Err(e) = device.read() {
        holder.record_error(format!("Error reading data from {}: {}", device.name(), e));
    }
    let status = holder.snapshot();
    assert!(status.latest.is_some());
    assert!(!status.health.unwrap().ok);
}
