//! Device facade combining transport, frame reader and parser
//!
//! A [`Device`] owns its transport exclusively; `read` takes `&mut self`, so
//! two callers can never interleave reads on one handle. Dropping the device
//! releases the transport, which covers early returns after a failed read.

use serialport::SerialPort;
use std::io::Read;
use tracing::{debug, info};

use super::frame_parser::FrameParser;
use super::frame_reader::FrameReader;
use crate::Result;
use crate::app::adapters::serial::open_port;
use crate::app::models::Reading;
use crate::config::{ParserConfig, SerialConfig};

/// An opened receiver producing one reading per call to [`Device::read`]
#[derive(Debug)]
pub struct Device<T> {
    name: String,
    reader: FrameReader<T>,
    parser: FrameParser,
}

impl Device<Box<dyn SerialPort>> {
    /// Open the receiver on the configured serial port
    pub fn open(serial: &SerialConfig, parser: ParserConfig) -> Result<Self> {
        let port = open_port(serial)?;
        Ok(Self::from_transport(serial.device_path.clone(), port, parser))
    }
}

impl<T: Read> Device<T> {
    /// Wrap an already opened transport
    pub fn from_transport(name: impl Into<String>, transport: T, parser: ParserConfig) -> Self {
        Self {
            name: name.into(),
            reader: FrameReader::new(transport),
            parser: FrameParser::new(parser),
        }
    }

    /// Name the device was opened under (usually its path)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Block for the next frame and parse it
    pub fn read(&mut self) -> Result<Reading> {
        let frame = self.reader.read_frame()?;
        debug!(
            "Read frame from {}: {}",
            self.name,
            String::from_utf8_lossy(&frame).trim_end()
        );
        self.parser.parse(&frame)
    }

    /// Close the device, releasing the transport
    pub fn close(self) {
        info!("Closing receiver at {}", self.name);
        drop(self.reader.into_inner());
    }
}
