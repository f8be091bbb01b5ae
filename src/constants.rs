// TERMINATOR ends every command line sent to the sensor and every reply line it sends back.
pub const TERMINATOR: &[u8] = b"\r\n";

// Measurement commands. The sensor echoes the command letter followed by a space.
pub const CMD_CO2_FILTERED: &str = "Z";
pub const CMD_CO2_RAW: &str = "z";
pub const CMD_TEMPERATURE: &str = "T";
pub const CMD_HUMIDITY: &str = "H";
pub const CMD_CO2_MULTIPLIER: &str = ".";

// Mode command, followed by the numeric mode value. Echoed as "K " plus five zero-padded digits.
pub const CMD_MODE: &str = "K";

// Identification commands.
pub const CMD_FIRMWARE: &str = "Y";
pub const CMD_INFO: &str = "*";

// Digital filter commands: lowercase reads, uppercase writes.
pub const CMD_READ_FILTER: &str = "a";
pub const CMD_SET_FILTER: &str = "A";

// Autocalibration command, used bare to read and with arguments to write.
pub const CMD_AUTOCAL: &str = "@";

// Reply prefixes that are not simply the command letter and a space.
pub const FIRMWARE_PREFIX: &str = "Y,";
pub const SERIAL_NUMBER_PREFIX: &str = " B ";
pub const INFO_PREFIX: &str = " * ";
pub const AUTOCAL_DISABLED: &str = "@ 0";

// Temperature is reported in tenths of a degree with a +1000 offset.
pub const TEMPERATURE_OFFSET: f32 = 1000.0;
// Temperature and humidity are both reported in tenths.
pub const TENTHS: f32 = 10.0;

// FILTER_MAX is the largest digital filter setting the sensor accepts.
pub const FILTER_MAX: i32 = u16::MAX as i32;

// Initial autocalibration interval, in days, used when enabling without one.
pub const DEFAULT_AUTOCAL_INITIAL_DAYS: f32 = 1.0;
// Regular autocalibration interval, in days, used when enabling without one.
pub const DEFAULT_AUTOCAL_REGULAR_DAYS: f32 = 8.0;
