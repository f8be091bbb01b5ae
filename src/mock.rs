use alloc::collections::VecDeque;
use alloc::string::String;
use alloc::vec::Vec;

use embedded_io::ErrorKind;

use crate::transport::Transport;

/// Byte stream that replays `rx` and times out once it runs dry.
pub struct MockSerial {
    pub rx: VecDeque<u8>,
    pub tx: Vec<u8>,
    pub flushes: usize,
    pub read_error: Option<ErrorKind>,
}

impl MockSerial {
    pub fn new(rx: &[u8]) -> Self {
        Self {
            rx: rx.iter().copied().collect(),
            tx: Vec::new(),
            flushes: 0,
            read_error: None,
        }
    }
}

impl embedded_io::ErrorType for MockSerial {
    type Error = ErrorKind;
}

impl embedded_io::Read for MockSerial {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if let Some(kind) = self.read_error {
            return Err(kind);
        }
        if buf.is_empty() {
            return Ok(0);
        }
        match self.rx.pop_front() {
            Some(byte) => {
                buf[0] = byte;
                Ok(1)
            }
            None => Err(ErrorKind::TimedOut),
        }
    }
}

impl embedded_io::Write for MockSerial {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.tx.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.flushes += 1;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockError;

/// Line transport that replays canned replies and records every command.
///
/// A `None` reply, or running out of replies, reads as a timeout.
pub struct MockTransport {
    pub replies: VecDeque<Option<String>>,
    pub written: Vec<String>,
    pub fail_writes: bool,
}

impl MockTransport {
    pub fn new(replies: &[&str]) -> Self {
        Self {
            replies: replies.iter().map(|r| Some(String::from(*r))).collect(),
            written: Vec::new(),
            fail_writes: false,
        }
    }

    pub fn push_reply(&mut self, reply: &str) {
        self.replies.push_back(Some(String::from(reply)));
    }

    pub fn push_timeout(&mut self) {
        self.replies.push_back(None);
    }
}

impl Transport for MockTransport {
    type Error = MockError;

    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        if self.fail_writes {
            return Err(MockError);
        }
        self.written.push(String::from_utf8_lossy(bytes).into_owned());
        Ok(())
    }

    fn read_line(&mut self) -> Result<Option<Vec<u8>>, Self::Error> {
        Ok(self.replies.pop_front().flatten().map(String::into_bytes))
    }
}
