use thiserror::Error;

/// A failure reported by a card driver.
///
/// The message is whatever the driver said. No meaning is attached to it
/// beyond "the call failed".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct DriverError {
    pub message: String,
}

impl DriverError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Errors produced by a [`CardReader`](crate::CardReader).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CardError {
    /// Block access was requested with no open session.
    #[error("reader is not connected")]
    NotConnected,

    #[error("failed to connect to reader {reader:?}: {source}")]
    Connect { reader: String, source: DriverError },

    #[error("write to block {block} failed: {source}")]
    Write { block: u32, source: DriverError },

    #[error("read of block {block} failed: {source}")]
    Read { block: u32, source: DriverError },

    #[error("payload for block {block} is {len} bytes, block holds {max}")]
    PayloadTooLong { block: u32, len: usize, max: usize },

    #[error("failed to list readers: {0}")]
    ListReaders(DriverError),

    #[error("reader session lock poisoned")]
    Poisoned,
}

pub type CardResult<T> = Result<T, CardError>;
