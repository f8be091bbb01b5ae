use core::fmt;

use crate::constants::{DEFAULT_AUTOCAL_INITIAL_DAYS, DEFAULT_AUTOCAL_REGULAR_DAYS};

/// Represents the operating mode of the COZIR sensor.
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub enum OperatingMode {
    /// The sensor only answers commands and takes no measurements.
    Command,
    /// The sensor streams measurements continuously.
    Streaming,
    /// The sensor measures continuously but only reports when queried.
    Polling,
}

impl OperatingMode {
    /// Returns the numeric value sent with the `K` command.
    pub fn value(self) -> u8 {
        match self {
            OperatingMode::Command => 0,
            OperatingMode::Streaming => 1,
            OperatingMode::Polling => 2,
        }
    }
}

impl fmt::Display for OperatingMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            OperatingMode::Command => "command",
            OperatingMode::Streaming => "streaming",
            OperatingMode::Polling => "polling",
        };
        f.write_str(name)
    }
}

/// Autocalibration settings of the CO2 measurement.
///
/// Both intervals are present when, and only when, autocalibration is active.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AutocalSetting {
    /// Whether autocalibration is enabled.
    pub active: bool,
    /// Initial autocalibration interval, in days.
    pub initial_interval_days: Option<f32>,
    /// Regular autocalibration interval, in days.
    pub regular_interval_days: Option<f32>,
}

impl AutocalSetting {
    /// Autocalibration switched off.
    pub fn disabled() -> AutocalSetting {
        AutocalSetting {
            active: false,
            initial_interval_days: None,
            regular_interval_days: None,
        }
    }

    /// Autocalibration switched on with the given intervals, in days.
    pub fn enabled(initial_days: f32, regular_days: f32) -> AutocalSetting {
        AutocalSetting {
            active: true,
            initial_interval_days: Some(initial_days),
            regular_interval_days: Some(regular_days),
        }
    }
}

/// Autocalibration enabled with a 1 day initial and 8 day regular interval.
impl Default for AutocalSetting {
    fn default() -> AutocalSetting {
        AutocalSetting::enabled(DEFAULT_AUTOCAL_INITIAL_DAYS, DEFAULT_AUTOCAL_REGULAR_DAYS)
    }
}

/// Configuration settings for [`SerialTransport`](crate::SerialTransport).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Config {
    /// Longest reply line kept in one piece. Longer lines are cut.
    pub max_line_len: usize,
}

impl Config {
    /// Creates a new `Config` instance.
    ///
    /// # Arguments
    ///
    /// * `max_line_len` - The longest line returned by a single read.
    pub fn new(max_line_len: usize) -> Config {
        Config { max_line_len }
    }

    /// Sets the longest line returned by a single read.
    pub fn max_line_len(mut self, max_line_len: usize) -> Self {
        self.max_line_len = max_line_len;
        self
    }
}

/// Provides default configuration values for the serial transport.
impl Default for Config {
    /// Returns the default configuration.
    ///
    /// 128 bytes comfortably holds every single-line reply and each line of the `*` dump.
    fn default() -> Config {
        Config { max_line_len: 128 }
    }
}
