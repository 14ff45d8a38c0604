//! # Azur Core Library
//!
//! Serial control for the Cambridge Audio Azur 751BD Blu-ray player.

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//!
//! This library provides:
//! - Request/response framing for the player's RS-232 protocol
//! - A transport abstraction over serial ports, TCP bridges and a simulator
//! - The device's command catalog as a static operation table
//! - Typed setters for the parameterized commands
//!
//! ## Example
//!
//! ```rust,ignore
//! use azur_core::{player::Player, protocol::ConnectionConfig};
//!
//! let mut player = Player::open(&ConnectionConfig::new("/dev/ttyUSB0"))?;
//! player.invoke("play", None)?;
//! println!("Chapter: {}", player.invoke("query_chapter", None)?);
//! ```

pub mod demo;
pub mod player;
pub mod protocol;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::demo::DemoPlayer;
    pub use crate::player::{
        operation, HdmiResolution, Operation, OsdPosition, OutputSystem, Player, RepeatMode,
        SubtitleShift, VerboseMode, ZoomRatio, OPERATIONS,
    };
    pub use crate::protocol::{Connection, ConnectionConfig, ProtocolError, Transport};
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
