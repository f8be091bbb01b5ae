//! Helpers for picking apart the sensor's text replies.

use alloc::string::String;
use alloc::vec::Vec;
use core::str::FromStr;

use crate::constants::{FIRMWARE_PREFIX, SERIAL_NUMBER_PREFIX};

/// Decodes a raw reply line. The sensor speaks ASCII; anything else is kept
/// lossily so it can still be shown in an error.
pub(crate) fn decode(line: &[u8]) -> String {
    String::from_utf8_lossy(line).into_owned()
}

/// Joins the lines of a multi-line reply with `\n`.
pub(crate) fn join(lines: &[Vec<u8>]) -> String {
    let mut text = String::new();
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            text.push('\n');
        }
        text.push_str(&String::from_utf8_lossy(line));
    }
    text
}

/// Returns the text after the echo of `command`, i.e. after `"{command} "`.
pub(crate) fn payload<'a>(reply: &'a str, command: &str) -> Option<&'a str> {
    reply.strip_prefix(command)?.strip_prefix(' ')
}

/// Parses a numeric payload, allowing the zero padding and surrounding
/// spaces the sensor emits.
pub(crate) fn number<V: FromStr>(payload: &str) -> Option<V> {
    payload.trim().parse().ok()
}

/// Splits the autocalibration payload into its two intervals, in days.
pub(crate) fn intervals(payload: &str) -> Option<(f32, f32)> {
    let mut fields = payload.split_whitespace();
    let initial = number(fields.next()?)?;
    let regular = number(fields.next()?)?;
    match fields.next() {
        Some(_) => None,
        None => Some((initial, regular)),
    }
}

/// Splits the joined `Y` reply into firmware version and serial number.
pub(crate) fn firmware(text: &str) -> Option<(&str, &str)> {
    let body = text.strip_prefix(FIRMWARE_PREFIX)?;
    let mut lines = body.lines();
    let version = lines.next()?;
    let serial = lines.next()?.strip_prefix(SERIAL_NUMBER_PREFIX)?;
    match lines.next() {
        Some(_) => None,
        None => Some((version, serial)),
    }
}
