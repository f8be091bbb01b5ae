//! Driver for COZIR CO2 sensors speaking their serial text protocol.
//!
//! Every request is one command line terminated by CR LF, answered by one or
//! more reply lines that echo the command. The driver is blocking: each
//! method writes a command then waits on the [`Transport`] for the reply,
//! bounded only by the transport's own read timeout.
//!
//! ```ignore
//! let transport = SerialTransport::new(uart);
//! let mut sensor = Cozir::open(transport)?;
//! log::info!("{}", sensor.read_measurement()?);
//! ```
#![cfg_attr(not(test), no_std)]

extern crate alloc;

use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

use log::debug;

mod constants;
pub use constants::*;

mod error;
pub use error::*;

mod config;
pub use config::*;

mod transport;
pub use transport::*;

mod reply;

#[cfg(test)]
mod mock;

/// A single value read from the sensor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reading {
    /// CO2 concentration in ppm, filtered or raw.
    Co2(f32),
    /// Temperature in °C.
    Temperature(f32),
    /// Relative humidity in %.
    Humidity(f32),
}

impl Reading {
    /// Returns the bare value, without its unit.
    pub fn value(&self) -> f32 {
        match *self {
            Reading::Co2(v) | Reading::Temperature(v) | Reading::Humidity(v) => v,
        }
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Reading::Co2(v) => write!(f, "{:.0} ppm", v),
            Reading::Temperature(v) => write!(f, "{:.1} °C", v),
            Reading::Humidity(v) => write!(f, "{:.1} %", v),
        }
    }
}

/// One poll of the sensor: filtered CO2, temperature and humidity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    /// Filtered CO2 concentration in ppm.
    pub co2_ppm: f32,
    /// Temperature in °C.
    pub temperature_celsius: f32,
    /// Relative humidity in %.
    pub humidity_percent: f32,
}

impl Measurement {
    /// Returns the measurement as CO2, temperature and humidity readings.
    pub fn readings(&self) -> [Reading; 3] {
        [
            Reading::Co2(self.co2_ppm),
            Reading::Temperature(self.temperature_celsius),
            Reading::Humidity(self.humidity_percent),
        ]
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let [co2, temperature, humidity] = self.readings();
        write!(f, "{}, {}, {}", co2, temperature, humidity)
    }
}

/// Firmware version and serial number, as reported by the `Y` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirmwareInfo {
    /// Firmware build string, e.g. `Oct 18 2013,14:02:10,AL19`.
    pub version: String,
    /// Sensor serial number, e.g. `124584 00000`.
    pub serial_number: String,
}

/// Represents a COZIR CO2 sensor.
///
/// The sensor is kept in polling mode: every reading is an explicit
/// request/response exchange over the transport.
///
/// # Concurrency
///
/// The protocol is half-duplex with no request identifiers, so two requests
/// must never interleave. Every method takes `&mut self`; to share a sensor
/// between threads, wrap it in a mutex.
///
/// # Type Parameters
///
/// * `T`: The [`Transport`] used to talk to the sensor. The driver owns it
///   until [`Cozir::release`] is called.
#[derive(Debug)]
pub struct Cozir<T> {
    transport: T,
    mode: OperatingMode,
}

impl<T> Cozir<T>
where
    T: Transport,
{
    /// Opens the sensor and switches it to [`OperatingMode::Polling`].
    ///
    /// # Returns
    ///
    /// * `Ok(Cozir)` once the sensor acknowledged polling mode.
    /// * `Err(Error)` if the mode handshake failed; no driver is created.
    pub fn open(transport: T) -> Result<Self, Error<T::Error>> {
        let mut sensor = Self {
            transport,
            mode: OperatingMode::Polling,
        };

        sensor
            .set_mode(OperatingMode::Polling)
            .map_err(|e| {
                log::error!("Failed to set polling mode while opening sensor: {:?}", e);
                e
            })?;

        log::info!("COZIR sensor opened in polling mode");
        Ok(sensor)
    }

    /// Gives back the transport, consuming the driver.
    pub fn release(self) -> T {
        self.transport
    }

    /// Sets the sensor's operating mode.
    ///
    /// The sensor echoes the mode as five zero-padded digits, e.g. `K 00002`.
    ///
    /// # Arguments
    ///
    /// * `mode`: The `OperatingMode` to set.
    ///
    /// # Returns
    ///
    /// * `Ok(())` if the sensor echoed the mode back; the cached mode is updated.
    /// * `Err(Error::UnexpectedReply)` on any other echo; the cached mode is left as it was.
    /// * `Err(Error::Io)` or `Err(Error::Timeout)` for transport issues.
    pub fn set_mode(&mut self, mode: OperatingMode) -> Result<(), Error<T::Error>> {
        log::info!("Setting operating mode to {}", mode);
        let reply = self.query(&format!("{} {}", CMD_MODE, mode.value()))?;

        if reply == format!("{} {:05}", CMD_MODE, mode.value()) {
            self.mode = mode;
            Ok(())
        } else {
            Err(self.unexpected(reply))
        }
    }

    /// Returns the last operating mode successfully set.
    ///
    /// This is a cached value: the sensor is not queried. It goes stale if
    /// the sensor resets behind the driver's back, for example on a power cycle.
    pub fn mode(&self) -> OperatingMode {
        self.mode
    }

    /// Reads the CO2 concentration in ppm, with or without the digital
    /// smoothing filter (`Z` or `z` command).
    ///
    /// The CO2 multiplier is not applied: the value is returned as reported.
    /// Sensors with a multiplier other than 1 need the result scaled by
    /// [`Cozir::read_co2_multiplier`].
    pub fn read_co2(&mut self, filtered: bool) -> Result<f32, Error<T::Error>> {
        let command = if filtered {
            CMD_CO2_FILTERED
        } else {
            CMD_CO2_RAW
        };
        self.query_value(command)
    }

    /// Reads the temperature in °C (`T` command).
    pub fn read_temperature(&mut self) -> Result<f32, Error<T::Error>> {
        let raw: f32 = self.query_value(CMD_TEMPERATURE)?;
        Ok((raw - TEMPERATURE_OFFSET) / TENTHS)
    }

    /// Reads the relative humidity in % (`H` command).
    pub fn read_humidity(&mut self) -> Result<f32, Error<T::Error>> {
        let raw: f32 = self.query_value(CMD_HUMIDITY)?;
        Ok(raw / TENTHS)
    }

    /// Reads filtered CO2, temperature and humidity, in that order.
    pub fn read_measurement(&mut self) -> Result<Measurement, Error<T::Error>> {
        let measurement = Measurement {
            co2_ppm: self.read_co2(true)?,
            temperature_celsius: self.read_temperature()?,
            humidity_percent: self.read_humidity()?,
        };
        debug!("Measurement: {}", measurement);
        Ok(measurement)
    }

    /// Reads the firmware version and serial number (`Y` command).
    ///
    /// The sensor splits its answer over two lines:
    /// `Y,Oct 18 2013,14:02:10,AL19` then ` B 124584 00000`.
    pub fn read_firmware(&mut self) -> Result<FirmwareInfo, Error<T::Error>> {
        self.send(CMD_FIRMWARE)?;

        let mut lines = Vec::with_capacity(2);
        lines.push(self.read_line()?.ok_or(Error::Timeout)?);
        if let Some(line) = self.read_line()? {
            lines.push(line);
        }

        let text = reply::join(&lines);
        let (version, serial_number) = match reply::firmware(text.trim()) {
            Some(parts) => parts,
            None => return Err(self.unexpected(text)),
        };

        Ok(FirmwareInfo {
            version: version.to_string(),
            serial_number: serial_number.to_string(),
        })
    }

    /// Reads the sensor's configuration dump (`*` command).
    ///
    /// The dump spans a variable number of lines; reading stops when the
    /// transport times out. The text is returned as-is, without its ` * `
    /// prefix and surrounding whitespace.
    pub fn read_info(&mut self) -> Result<String, Error<T::Error>> {
        self.send(CMD_INFO)?;

        let mut lines = Vec::new();
        while let Some(line) = self.read_line()? {
            lines.push(line);
        }
        debug!("Info dump spans {} lines", lines.len());

        let text = reply::join(&lines);
        match text.strip_prefix(INFO_PREFIX) {
            Some(info) => Ok(info.trim().to_string()),
            None => Err(self.unexpected(text)),
        }
    }

    /// Reads the multiplier to apply to CO2 readings to get ppm (`.` command).
    pub fn read_co2_multiplier(&mut self) -> Result<f32, Error<T::Error>> {
        self.query_value(CMD_CO2_MULTIPLIER)
    }

    /// Reads the digital filter setting of the CO2 measurement (`a` command).
    pub fn read_filter(&mut self) -> Result<u16, Error<T::Error>> {
        self.query_value(CMD_READ_FILTER)
    }

    /// Sets the digital filter of the CO2 measurement (`A` command).
    ///
    /// # Arguments
    ///
    /// * `value`: The filter setting, between 0 and 65535.
    ///
    /// # Returns
    ///
    /// * `Ok(())` if the sensor acknowledged with an `A ` reply.
    /// * `Err(Error::FilterOutOfRange)` if `value` is out of range; nothing is sent.
    /// * `Err(Error::UnexpectedReply)` if the acknowledgement is missing.
    pub fn set_filter(&mut self, value: i32) -> Result<(), Error<T::Error>> {
        if !(0..=FILTER_MAX).contains(&value) {
            log::error!("Filter value {} out of range (0-{})", value, FILTER_MAX);
            return Err(Error::FilterOutOfRange(value));
        }
        log::info!("Setting filter to {}", value);

        let reply = self.query(&format!("{} {}", CMD_SET_FILTER, value))?;
        match reply::payload(&reply, CMD_SET_FILTER) {
            Some(_) => Ok(()),
            None => Err(self.unexpected(reply)),
        }
    }

    /// Reads the autocalibration settings of the CO2 measurement (`@` command).
    ///
    /// The sensor answers `@ 0` when autocalibration is off, or
    /// `@ {initial} {regular}` with both intervals in days.
    pub fn read_autocal(&mut self) -> Result<AutocalSetting, Error<T::Error>> {
        let reply = self.query(CMD_AUTOCAL)?;

        let setting = match reply::payload(&reply, CMD_AUTOCAL) {
            Some("0") => Some(AutocalSetting::disabled()),
            Some(payload) => reply::intervals(payload)
                .map(|(initial, regular)| AutocalSetting::enabled(initial, regular)),
            None => None,
        };

        setting.ok_or_else(|| self.unexpected(reply))
    }

    /// Sets the autocalibration settings of the CO2 measurement.
    ///
    /// When `setting.active` is set, missing intervals default to 1 day
    /// (initial) and 8 days (regular), and both are sent with one decimal.
    ///
    /// The acknowledgement is checked unevenly: disabling requires the exact
    /// echo `@ 0`, while enabling only requires a reply starting with `@ `.
    pub fn set_autocal(&mut self, setting: &AutocalSetting) -> Result<(), Error<T::Error>> {
        if !setting.active {
            log::info!("Disabling autocalibration");
            let reply = self.query(AUTOCAL_DISABLED)?;
            return if reply == AUTOCAL_DISABLED {
                Ok(())
            } else {
                Err(self.unexpected(reply))
            };
        }

        let initial = setting
            .initial_interval_days
            .unwrap_or(DEFAULT_AUTOCAL_INITIAL_DAYS);
        let regular = setting
            .regular_interval_days
            .unwrap_or(DEFAULT_AUTOCAL_REGULAR_DAYS);
        log::info!(
            "Enabling autocalibration: initial {:.1} days, regular {:.1} days",
            initial,
            regular
        );

        let reply = self.query(&format!("{} {:.1} {:.1}", CMD_AUTOCAL, initial, regular))?;
        match reply::payload(&reply, CMD_AUTOCAL) {
            Some(_) => Ok(()),
            None => Err(self.unexpected(reply)),
        }
    }

    // Sends a command and parses the number that follows its echo.
    fn query_value<V: FromStr>(&mut self, command: &str) -> Result<V, Error<T::Error>> {
        let reply = self.query(command)?;
        match reply::payload(&reply, command).and_then(reply::number::<V>) {
            Some(value) => Ok(value),
            None => Err(self.unexpected(reply)),
        }
    }

    // Sends a command and returns its single reply line, trimmed.
    fn query(&mut self, command: &str) -> Result<String, Error<T::Error>> {
        self.send(command)?;
        let line = self.read_line()?.ok_or_else(|| {
            log::error!("No reply to {:?} before timeout", command);
            Error::Timeout
        })?;
        Ok(reply::decode(&line).trim().to_string())
    }

    // Writes a command followed by the line terminator.
    fn send(&mut self, command: &str) -> Result<(), Error<T::Error>> {
        debug!("Writing command {:?}", command);
        let mut line = Vec::with_capacity(command.len() + TERMINATOR.len());
        line.extend_from_slice(command.as_bytes());
        line.extend_from_slice(TERMINATOR);
        self.transport.write(&line).map_err(|e| {
            log::error!("Failed to write command {:?}: {:?}", command, e);
            Error::Io(e)
        })
    }

    fn read_line(&mut self) -> Result<Option<Vec<u8>>, Error<T::Error>> {
        let line = self.transport.read_line().map_err(|e| {
            log::error!("Failed to read reply line: {:?}", e);
            Error::Io(e)
        })?;
        debug!("Read reply line: {:?}", line.as_deref().map(reply::decode));
        Ok(line)
    }

    fn unexpected(&self, reply: String) -> Error<T::Error> {
        log::error!("Unexpected reply from sensor: {:?}", reply);
        Error::UnexpectedReply(reply)
    }
}
