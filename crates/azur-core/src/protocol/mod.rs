//! Serial Protocol Communication
//!
//! Implements the Azur 751BD RS-232 control protocol.
//!
//! Requests are ASCII lines of the form `#CMD[ params]\r`; replies are
//! `@XXpayload\r` where `XX` is a two character result code (`ER` on failure).

mod connection;
mod error;
pub mod frame;
pub mod serial;
pub mod stream;

pub use connection::{Connection, ConnectionConfig};
pub use error::ProtocolError;
pub use frame::{Reply, Request};
pub use serial::{configure_port, list_ports, open_port, PortInfo};
pub use stream::{SerialChannel, TcpChannel, Transport};

/// Fixed baud rate of the player's serial port
pub const BAUD_RATE: u32 = 9600;

/// Steady-state read timeout in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 200;

/// Worst-case reply latency documented for the player, in milliseconds
pub const EXTENDED_TIMEOUT_MS: u64 = 10_000;

/// Maximum number of bytes consumed by a single read
pub const MAX_CHUNK_SIZE: usize = 25;

/// Length of every command code
pub const COMMAND_CODE_LEN: usize = 3;
