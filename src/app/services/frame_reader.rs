//! Line-oriented frame reader
//!
//! Pulls one newline-terminated frame at a time from a byte stream. Bytes are
//! taken one by one so nothing past the terminator is consumed; a call never
//! leaves read-ahead data behind for the next one.

use std::io::{ErrorKind, Read};
use tracing::trace;

use crate::constants::{FRAME_TERMINATOR, MAX_FRAME_LEN};
use crate::{Error, Result};

/// Reads terminated frames from a transport
#[derive(Debug)]
pub struct FrameReader<R> {
    transport: R,
}

impl<R: Read> FrameReader<R> {
    pub fn new(transport: R) -> Self {
        Self { transport }
    }

    /// Block until a full frame has arrived and return it, terminator included
    ///
    /// End of stream before the terminator, a timeout or any other transport
    /// failure is returned as [`Error::Io`]; the partial line is dropped. A
    /// line longer than [`MAX_FRAME_LEN`] is consumed through its terminator
    /// before the error is returned, so the next call starts on a fresh frame.
    pub fn read_frame(&mut self) -> Result<Vec<u8>> {
        let mut frame = Vec::with_capacity(128);
        let mut byte = [0u8; 1];

        loop {
            match self.transport.read(&mut byte) {
                Ok(0) => {
                    return Err(Error::io(
                        format!(
                            "Stream ended after {} bytes without a terminator",
                            frame.len()
                        ),
                        ErrorKind::UnexpectedEof.into(),
                    ));
                }
                Ok(_) => {
                    frame.push(byte[0]);
                    if byte[0] == FRAME_TERMINATOR {
                        trace!("Received frame of {} bytes", frame.len());
                        return Ok(frame);
                    }
                    if frame.len() >= MAX_FRAME_LEN {
                        let skipped = self.skip_line()?;
                        return Err(Error::io(
                            format!(
                                "No terminator within {} bytes, skipped {} more",
                                MAX_FRAME_LEN, skipped
                            ),
                            std::io::Error::new(ErrorKind::InvalidData, "frame too long"),
                        ));
                    }
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(Error::io("Failed to read from transport", e)),
            }
        }
    }

    /// Discard bytes up to and including the next terminator
    ///
    /// Leaves the transport at the start of the following frame. Returns the
    /// number of bytes dropped; end of stream or a transport failure is an error.
    fn skip_line(&mut self) -> Result<usize> {
        let mut skipped = 0;
        let mut byte = [0u8; 1];

        loop {
            match self.transport.read(&mut byte) {
                Ok(0) => {
                    return Err(Error::io(
                        format!(
                            "Stream ended inside an oversized frame after {} bytes",
                            skipped
                        ),
                        ErrorKind::UnexpectedEof.into(),
                    ));
                }
                Ok(_) => {
                    skipped += 1;
                    if byte[0] == FRAME_TERMINATOR {
                        return Ok(skipped);
                    }
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(Error::io("Failed to read from transport", e)),
            }
        }
    }

    pub fn get_ref(&self) -> &R {
        &self.transport
    }

    /// Release the underlying transport
    pub fn into_inner(self) -> R {
        self.transport
    }
}
