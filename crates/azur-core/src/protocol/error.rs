//! Protocol errors

use thiserror::Error;

/// Errors that can occur while talking to the player
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// Command code is not exactly three characters
    #[error("Invalid command code '{0}': must be exactly 3 characters")]
    InvalidCommand(String),

    /// Argument outside the operation's domain, or missing/unexpected
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// No operation with that name
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    /// Nothing resembling a reply frame arrived
    #[error("No response received")]
    NoResponse,

    /// The player answered with an `ER` result code
    #[error("Player returned error: {0}")]
    DeviceError(String),

    /// A frame started but never completed
    #[error("Malformed response from player: {0:?}")]
    InvalidResponse(String),

    /// The connection was closed
    #[error("Not connected to player")]
    NotConnected,

    /// Opening or configuring the serial port failed
    #[error("Serial port error: {0}")]
    SerialError(String),

    /// Transport read or write failed
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
