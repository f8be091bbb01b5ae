use alloc::string::String;
use core::fmt::Debug;

/// Errors returned by the COZIR driver.
///
/// `E` is the error type of the underlying [`Transport`](crate::Transport).
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum Error<E: Debug> {
    /// The transport failed to write or read.
    #[error("transport error: {0:?}")]
    Io(E),
    /// No reply line arrived before the transport's read timeout.
    #[error("no reply from sensor before read timeout")]
    Timeout,
    /// A reply arrived but did not match the expected echo, prefix or shape.
    /// Carries the raw reply text.
    #[error("unexpected reply from sensor: {0:?}")]
    UnexpectedReply(String),
    /// Digital filter value outside `0..=65535`. Nothing was sent.
    #[error("filter value {0} out of range 0..=65535")]
    FilterOutOfRange(i32),
}

/// Broad classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Transport failure, including read timeouts.
    Io,
    /// The sensor answered with something the protocol does not allow.
    Protocol,
    /// A caller-supplied argument was rejected before any I/O.
    Validation,
}

impl<E: Debug> Error<E> {
    /// Classifies the error as an I/O, protocol or validation failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Io(_) | Error::Timeout => ErrorKind::Io,
            Error::UnexpectedReply(_) => ErrorKind::Protocol,
            Error::FilterOutOfRange(_) => ErrorKind::Validation,
        }
    }
}
