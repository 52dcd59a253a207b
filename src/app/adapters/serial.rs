//! Serial port adapter for the receiver
//!
//! Maps [`SerialConfig`] onto the `serialport` builder and opens the port.

use serialport::{DataBits, SerialPort, StopBits};
use tracing::{debug, info};

use crate::config::{Parity, SerialConfig};
use crate::{Error, Result};

/// Open the serial port described by the configuration
pub fn open_port(config: &SerialConfig) -> Result<Box<dyn SerialPort>> {
    config.validate()?;

    debug!(
        "Opening {} at {} baud ({}{}{})",
        config.device_path,
        config.baud_rate,
        config.data_bits,
        parity_letter(config.parity),
        config.stop_bits
    );

    let port = serialport::new(&config.device_path, config.baud_rate)
        .data_bits(data_bits(config.data_bits)?)
        .stop_bits(stop_bits(config.stop_bits)?)
        .parity(parity(config.parity))
        .flow_control(serialport::FlowControl::None)
        .timeout(config.read_timeout)
        .open()
        .map_err(|e| Error::open(&config.device_path, e))?;

    info!("Opened receiver at {}", config.device_path);
    Ok(port)
}

fn data_bits(bits: u8) -> Result<DataBits> {
    match bits {
        5 => Ok(DataBits::Five),
        6 => Ok(DataBits::Six),
        7 => Ok(DataBits::Seven),
        8 => Ok(DataBits::Eight),
        other => Err(Error::configuration(format!(
            "Unsupported data bits: {}",
            other
        ))),
    }
}

fn stop_bits(bits: u8) -> Result<StopBits> {
    match bits {
        1 => Ok(StopBits::One),
        2 => Ok(StopBits::Two),
        other => Err(Error::configuration(format!(
            "Unsupported stop bits: {}",
            other
        ))),
    }
}

fn parity(parity: Parity) -> serialport::Parity {
    match parity {
        Parity::None => serialport::Parity::None,
        Parity::Odd => serialport::Parity::Odd,
        Parity::Even => serialport::Parity::Even,
    }
}

fn parity_letter(parity: Parity) -> char {
    match parity {
        Parity::None => 'N',
        Parity::Odd => 'O',
        Parity::Even => 'E',
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_settings_mapping() {
        assert_eq!(data_bits(8).unwrap(), DataBits::Eight);
        assert_eq!(data_bits(5).unwrap(), DataBits::Five);
        assert!(data_bits(9).is_err());

        assert_eq!(stop_bits(1).unwrap(), StopBits::One);
        assert_eq!(stop_bits(2).unwrap(), StopBits::Two);
        assert!(stop_bits(0).is_err());

        assert_eq!(parity(Parity::None), serialport::Parity::None);
        assert_eq!(parity(Parity::Even), serialport::Parity::Even);
    }

    #[test]
    fn test_missing_device_is_open_error() {
        let config = SerialConfig {
            device_path: "/dev/usbwde-does-not-exist".to_string(),
            ..SerialConfig::default()
        };

        match open_port(&config) {
            Err(Error::Open { path, .. }) => assert_eq!(path, "/dev/usbwde-does-not-exist"),
            Err(other) => panic!("expected open error, got {:?}", other),
            Ok(_) => panic!("nonexistent device must not open"),
        }
    }

    #[test]
    fn test_invalid_config_rejected_before_open() {
        let config = SerialConfig {
            baud_rate: 0,
            ..SerialConfig::default()
        };

        assert!(matches!(
            open_port(&config),
            Err(Error::Configuration { .. })
        ));
    }
}
