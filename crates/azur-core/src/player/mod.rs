//! Player control
//!
//! [`Player`] sits on top of a [`Connection`] and turns named operations from
//! the [`OPERATIONS`] table into dispatched commands.

pub mod operations;
pub mod settings;
pub mod status;

pub use operations::{
    operation, operation_by_code, Argument, Operation, OPERATIONS, POWER_OFF_SETTLE,
    POWER_ON_SETTLE,
};
pub use settings::{
    HdmiResolution, OsdPosition, OutputSystem, RepeatMode, SubtitleShift, VerboseMode, ZoomRatio,
};

use std::time::Duration;
use tracing::{debug, info};

use crate::protocol::{Connection, ConnectionConfig, ProtocolError};

/// High-level control of one player
pub struct Player {
    connection: Connection,
    /// Blocks for a settle delay; swapped out only by unit tests
    settle: fn(Duration),
}

impl Player {
    /// Wrap an open connection
    pub fn new(connection: Connection) -> Self {
        Self {
            connection,
            settle: std::thread::sleep,
        }
    }

    /// Open the configured port and wrap it
    pub fn open(config: &ConnectionConfig) -> Result<Self, ProtocolError> {
        Connection::open(config).map(Self::new)
    }

    /// Underlying connection
    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    /// Mutable access to the underlying connection, for raw dispatch
    pub fn connection_mut(&mut self) -> &mut Connection {
        &mut self.connection
    }

    /// Release the transport
    pub fn close(&mut self) {
        self.connection.close();
    }

    /// Run an operation by name.
    ///
    /// The argument is checked against the operation's domain before anything
    /// is written.
    pub fn invoke(&mut self, name: &str, argument: Option<&str>) -> Result<String, ProtocolError> {
        let op = operation(name).ok_or_else(|| ProtocolError::UnknownOperation(name.to_string()))?;
        self.execute(op, argument)
    }

    /// Run a table operation
    pub fn execute(
        &mut self,
        op: &Operation,
        argument: Option<&str>,
    ) -> Result<String, ProtocolError> {
        let parameters = op.argument.validate(argument)?;
        debug!("{} -> #{} {:?}", op.name, op.code, parameters);

        let reply = self.connection.dispatch(op.code, parameters.as_deref())?;

        if let Some(delay) = op.settle {
            info!("{}: waiting {:?} for the player to settle", op.name, delay);
            (self.settle)(delay);
        }

        Ok(reply)
    }

    fn run(&mut self, name: &str, parameter: String) -> Result<String, ProtocolError> {
        // Names below are fixed entries of OPERATIONS
        self.invoke(name, Some(parameter.as_str()))
    }

    /// Turn the player on and wait for it to boot
    pub fn power_on(&mut self) -> Result<String, ProtocolError> {
        self.invoke("power_on", None)
    }

    /// Turn the player off and wait for it to shut down
    pub fn power_off(&mut self) -> Result<String, ProtocolError> {
        self.invoke("power_off", None)
    }

    /// Set how chatty the player is on the serial line
    pub fn set_verbose_mode(&mut self, mode: VerboseMode) -> Result<String, ProtocolError> {
        self.run("set_verbose_mode", mode.to_string())
    }

    /// Set the HDMI output resolution
    pub fn set_hdmi_resolution(
        &mut self,
        resolution: HdmiResolution,
    ) -> Result<String, ProtocolError> {
        self.run("set_hdmi_resolution", resolution.to_string())
    }

    /// Set the TV output system
    pub fn set_output_system(&mut self, system: OutputSystem) -> Result<String, ProtocolError> {
        self.run("set_output_system", system.to_string())
    }

    /// Set the zoom ratio
    pub fn set_zoom_ratio(&mut self, ratio: ZoomRatio) -> Result<String, ProtocolError> {
        self.run("set_zoom_ratio", ratio.to_string())
    }

    /// Set the repeat mode
    pub fn set_repeat(&mut self, mode: RepeatMode) -> Result<String, ProtocolError> {
        self.run("set_repeat", mode.to_string())
    }

    /// Search to a title, chapter or time.
    ///
    /// Accepted forms include `T3` (title 3), `C10` (chapter 10), `C 0:00:34`
    /// (time within the chapter) and `T 0:12:13` or `0:12:13` (time within the
    /// title). The target is forwarded as-is.
    pub fn search(&mut self, target: &str) -> Result<String, ProtocolError> {
        self.run("search", target.to_string())
    }

    /// Set the subtitle shift
    pub fn set_subtitle_shift(&mut self, shift: SubtitleShift) -> Result<String, ProtocolError> {
        self.run("set_subtitle_shift", shift.to_string())
    }

    /// Set the on-screen display position
    pub fn set_osd_position(&mut self, position: OsdPosition) -> Result<String, ProtocolError> {
        self.run("set_osd_position", position.to_string())
    }
}
