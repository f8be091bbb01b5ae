use alloc::vec::Vec;
use core::fmt::Debug;

use embedded_io::{Error as _, ErrorKind, Read, Write};
use log::{debug, warn};

use crate::config::Config;

/// A line-oriented, blocking channel to the sensor.
///
/// The read timeout belongs to the transport: the driver never overrides it.
pub trait Transport {
    /// Error type for communication failures.
    type Error: Debug;

    /// Writes all of `bytes`, terminator included.
    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Reads one line, without its terminator.
    ///
    /// Returns `Ok(None)` when nothing arrived before the read timeout, which
    /// also marks the end of a multi-line reply.
    fn read_line(&mut self) -> Result<Option<Vec<u8>>, Self::Error>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    type Error = T::Error;

    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        (**self).write(bytes)
    }

    fn read_line(&mut self) -> Result<Option<Vec<u8>>, Self::Error> {
        (**self).read_line()
    }
}

/// [`Transport`] over a blocking `embedded_io` byte stream, such as a UART
/// or a USB-TTL serial port.
///
/// The stream is expected to give up on reads after some timeout, either by
/// returning `Ok(0)` or an error of kind [`ErrorKind::TimedOut`].
#[derive(Debug)]
pub struct SerialTransport<S> {
    serial: S,
    config: Config,
    // First byte of the next line, read while cutting an overlong one.
    pending: Option<u8>,
}

impl<S> SerialTransport<S>
where
    S: Read + Write,
{
    /// Wraps `serial` with the default [`Config`].
    pub fn new(serial: S) -> Self {
        Self::with_config(serial, Config::default())
    }

    /// Wraps `serial` with the given [`Config`].
    pub fn with_config(serial: S, config: Config) -> Self {
        Self {
            serial,
            config,
            pending: None,
        }
    }

    // Returns the next byte, or `None` once the stream times out.
    fn next_byte(&mut self) -> Result<Option<u8>, S::Error> {
        if let Some(byte) = self.pending.take() {
            return Ok(Some(byte));
        }

        let mut byte = [0u8; 1];
        match self.serial.read(&mut byte) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(byte[0])),
            Err(e) if e.kind() == ErrorKind::TimedOut => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Gives back the underlying stream.
    pub fn release(self) -> S {
        self.serial
    }
}

impl<S> Transport for SerialTransport<S>
where
    S: Read + Write,
{
    type Error = S::Error;

    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self.serial.write_all(bytes)?;
        self.serial.flush()
    }

    fn read_line(&mut self) -> Result<Option<Vec<u8>>, Self::Error> {
        let max_line_len = self.config.max_line_len.max(1);
        let mut line = Vec::new();

        while let Some(byte) = self.next_byte()? {
            match byte {
                b'\n' => {
                    if line.last() == Some(&b'\r') {
                        line.pop();
                    }
                    return Ok(Some(line));
                }
                // Only counts once something other than `\n` follows it.
                b'\r' => line.push(byte),
                _ if line.len() >= max_line_len => {
                    warn!(
                        "Reply line exceeds {} bytes, cutting it: {:02X?}",
                        max_line_len, line
                    );
                    self.pending = Some(byte);
                    return Ok(Some(line));
                }
                _ => line.push(byte),
            }
        }

        if line.is_empty() {
            Ok(None)
        } else {
            // Same as a serial readline: whatever arrived before the timeout.
            debug!("Read timed out mid-line after {} bytes", line.len());
            Ok(Some(line))
        }
    }
}
