//! Connection management
//!
//! Owns the transport to the player and runs the request/reply cycle for every
//! command.

use serde::{Deserialize, Serialize};
use std::io::{ErrorKind, Read};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::{
    frame::{has_terminator, is_well_formed, trim_leading_noise, REPLY_START, TERMINATOR},
    serial::{configure_port, open_port},
    ProtocolError, Reply, Request, SerialChannel, TcpChannel, Transport, DEFAULT_TIMEOUT_MS,
    EXTENDED_TIMEOUT_MS, MAX_CHUNK_SIZE,
};
use crate::demo::DemoPlayer;

/// Port name that selects the built-in simulator
pub const DEMO_PORT: &str = "demo";

/// Prefix that selects a TCP serial bridge, e.g. `tcp://10.0.0.5:4999`
pub const TCP_PREFIX: &str = "tcp://";

/// Connection configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Serial port name, `tcp://host:port`, or `demo`
    pub port_name: String,
    /// Steady-state read timeout in milliseconds
    pub timeout_ms: u64,
    /// Read timeout for the last-chance read when a reply is incomplete
    pub extended_timeout_ms: u64,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            port_name: "/dev/ttyS0".to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            extended_timeout_ms: EXTENDED_TIMEOUT_MS,
        }
    }
}

impl ConnectionConfig {
    /// Default timeouts for the given port
    pub fn new(port_name: impl Into<String>) -> Self {
        Self {
            port_name: port_name.into(),
            ..Self::default()
        }
    }

    /// Steady-state read timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Fallback read timeout
    pub fn extended_timeout(&self) -> Duration {
        Duration::from_millis(self.extended_timeout_ms)
    }
}

/// Raises the transport's read timeout for the lifetime of the guard and puts
/// the steady-state value back when dropped, whichever way the caller exits.
struct ExtendedTimeout<'a> {
    transport: &'a mut Box<dyn Transport>,
    active: &'a mut Duration,
    steady: Duration,
}

impl<'a> ExtendedTimeout<'a> {
    fn new(transport: &'a mut Box<dyn Transport>, active: &'a mut Duration, steady: Duration) -> Self {
        Self {
            transport,
            active,
            steady,
        }
    }

    fn engage(&mut self, extended: Duration) -> Result<(), ProtocolError> {
        *self.active = extended;
        self.transport.set_timeout(extended)?;
        Ok(())
    }
}

impl Drop for ExtendedTimeout<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.transport.set_timeout(self.steady) {
            warn!("failed to restore read timeout to {:?}: {}", self.steady, e);
        }
        *self.active = self.steady;
    }
}

/// Read up to `max` bytes, stopping early on a read timeout, end of stream,
/// or once the bytes read so far end with the terminator.
///
/// No read is started once `timeout` has elapsed, but a read already in
/// progress blocks for the transport's own timeout. A reply trickling in byte
/// by byte can therefore take up to one transport timeout past `timeout`.
fn read_chunk(
    transport: &mut dyn Transport,
    timeout: Duration,
    max: usize,
) -> Result<Vec<u8>, ProtocolError> {
    let mut chunk = Vec::with_capacity(max);
    let mut buf = vec![0u8; max];
    let deadline = Instant::now() + timeout;
    let mut first = true;

    while chunk.len() < max {
        if !first && Instant::now() >= deadline {
            break;
        }
        first = false;

        let want = max - chunk.len();
        match transport.read(&mut buf[..want]) {
            Ok(0) => break,
            Ok(n) => {
                chunk.extend_from_slice(&buf[..n]);
                if chunk.last() == Some(&TERMINATOR) {
                    break;
                }
            }
            Err(ref e) if matches!(e.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock) => {
                break
            }
            Err(ref e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(chunk)
}

/// Player connection
pub struct Connection {
    /// Transport handle, `None` once closed
    transport: Option<Box<dyn Transport>>,
    /// Connection configuration
    config: ConnectionConfig,
    /// Read timeout currently applied to the transport
    timeout: Duration,
    /// Metrics: cumulative bytes/frames sent & received
    tx_bytes: u64,
    rx_bytes: u64,
    tx_frames: u64,
    rx_frames: u64,
}

impl Connection {
    /// Open the transport named by `config.port_name`.
    ///
    /// `demo` starts the simulator, `tcp://host:port` connects to a serial
    /// bridge, anything else is treated as a local serial port.
    pub fn open(config: &ConnectionConfig) -> Result<Self, ProtocolError> {
        let name = config.port_name.as_str();
        let transport: Box<dyn Transport> = if name == DEMO_PORT {
            Box::new(DemoPlayer::new())
        } else if let Some(addr) = name.strip_prefix(TCP_PREFIX) {
            Box::new(TcpChannel::connect(addr, config.extended_timeout())?)
        } else {
            let mut port = open_port(name, config.timeout())?;
            configure_port(port.as_mut())?;
            Box::new(SerialChannel::new(port))
        };

        Self::with_transport(transport, config.clone())
    }

    /// Wrap an already-open transport, applying the steady-state timeout
    pub fn with_transport(
        mut transport: Box<dyn Transport>,
        config: ConnectionConfig,
    ) -> Result<Self, ProtocolError> {
        let timeout = config.timeout();
        transport.set_timeout(timeout)?;
        info!("opened {} (timeout {:?})", transport.describe(), timeout);

        Ok(Self {
            transport: Some(transport),
            config,
            timeout,
            tx_bytes: 0,
            rx_bytes: 0,
            tx_frames: 0,
            rx_frames: 0,
        })
    }

    /// Connection configuration
    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Read timeout currently applied to the transport
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Whether the transport is still held
    pub fn is_open(&self) -> bool {
        self.transport.is_some()
    }

    /// Get cumulative tx/rx bytes and frame counters
    pub fn get_counters(&self) -> (u64, u64, u64, u64) {
        (self.tx_bytes, self.rx_bytes, self.tx_frames, self.rx_frames)
    }

    /// Send one command and return the reply payload.
    ///
    /// The code must be exactly three characters; it is uppercased before
    /// transmission. A reply whose result code is `ER` becomes
    /// [`ProtocolError::DeviceError`]; otherwise the payload is returned with
    /// surrounding whitespace removed.
    pub fn dispatch(
        &mut self,
        code: &str,
        parameters: Option<&str>,
    ) -> Result<String, ProtocolError> {
        let request = Request::new(code, parameters)?;
        let steady = self.config.timeout();
        let extended = self.config.extended_timeout();
        let transport = self.transport.as_mut().ok_or(ProtocolError::NotConnected)?;

        let bytes = request.to_bytes();
        debug!("dispatch: sending {:?}", String::from_utf8_lossy(&bytes));
        transport.write_all(&bytes)?;
        transport.flush()?;
        self.tx_bytes = self.tx_bytes.saturating_add(bytes.len() as u64);
        self.tx_frames = self.tx_frames.saturating_add(1);

        let mut response = read_chunk(transport.as_mut(), steady, MAX_CHUNK_SIZE)?;

        // Stray bytes ahead of the frame; the tail may still be in flight
        if trim_leading_noise(&mut response) && !has_terminator(&response) {
            let tail = read_chunk(transport.as_mut(), steady, MAX_CHUNK_SIZE)?;
            response.extend_from_slice(&tail);
        }

        if !is_well_formed(&response) {
            warn!(
                "dispatch: incomplete reply to {} ({:?}), waiting up to {:?}",
                request.code(),
                String::from_utf8_lossy(&response),
                extended
            );
            let mut guard = ExtendedTimeout::new(transport, &mut self.timeout, steady);
            guard.engage(extended)?;
            let tail = read_chunk(guard.transport.as_mut(), extended, MAX_CHUNK_SIZE)?;
            drop(guard);

            response.extend_from_slice(&tail);
            trim_leading_noise(&mut response);
        }

        debug!(
            "dispatch: {} replied {:?}",
            request.code(),
            String::from_utf8_lossy(&response)
        );

        self.rx_bytes = self.rx_bytes.saturating_add(response.len() as u64);

        // Noise alone is not a frame
        if !response.contains(&REPLY_START) {
            return Err(ProtocolError::NoResponse);
        }

        let reply = Reply::from_bytes(&response)?;
        self.rx_frames = self.rx_frames.saturating_add(1);
        reply.into_result()
    }

    /// Release the transport. Calling this more than once is harmless.
    pub fn close(&mut self) {
        if let Some(transport) = self.transport.take() {
            info!("closed {}", transport.describe());
        }
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.close();
    }
}
