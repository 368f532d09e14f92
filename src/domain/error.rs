//! Domain error types

use thiserror::Error;

/// Errors that can occur while driving a SYN6288
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Syn6288Error {
    /// A communicating or state-touching call was made before `init` or after `deinit`.
    #[error("Driver not initialized")]
    NotInitialized,

    /// A required binding was not linked before `init`.
    #[error("Missing binding: {0}")]
    MissingBinding(&'static str),

    /// The UART itself failed (open, close, flush, write or read).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The chip answered, but not with the expected acknowledgement.
    #[error("Device NAK: {0}")]
    Nack(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for SYN6288 operations
pub type Syn6288Result<T> = Result<T, Syn6288Error>;
