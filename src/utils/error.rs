use std::io::Error as IoError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    #[error("Data not enough: {0}")]
    DataNotEnough(String),

    #[error("Illegal marker: {0}")]
    IllegalMarker(String),

    #[error("Unsupported: {0}")]
    Unsupported(String),

    #[error("Handshake error: {0}")]
    Handshake(String),

    #[error("Chunk error: {0}")]
    Chunk(String),

    #[error("Command error: {0}")]
    Command(String),

    #[error("No matched transaction: {0}")]
    NoTransaction(String),

    #[error("Protocol error: {0}")]
    Protocol(String),
}

impl Error {
    /// Create a short-input error
    pub fn data_not_enough(msg: impl Into<String>) -> Self {
        Error::DataNotEnough(msg.into())
    }

    /// Create an illegal-marker error
    pub fn illegal_marker(msg: impl Into<String>) -> Self {
        Error::IllegalMarker(msg.into())
    }

    /// Create an unsupported error
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Error::Unsupported(msg.into())
    }

    /// Create a handshake error
    pub fn handshake(msg: impl Into<String>) -> Self {
        Error::Handshake(msg.into())
    }

    /// Create a chunk error
    pub fn chunk(msg: impl Into<String>) -> Self {
        Error::Chunk(msg.into())
    }

    /// Create a command error
    pub fn command(msg: impl Into<String>) -> Self {
        Error::Command(msg.into())
    }

    /// Create a no-matched-transaction error
    pub fn no_transaction(msg: impl Into<String>) -> Self {
        Error::NoTransaction(msg.into())
    }

    /// Create a protocol error
    pub fn protocol(msg: impl Into<String>) -> Self {
        Error::Protocol(msg.into())
    }
}

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;
