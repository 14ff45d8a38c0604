use azur_core::protocol::{Connection, ConnectionConfig, ProtocolError, Transport};
use pretty_assertions::assert_eq;
use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const STEADY: Duration = Duration::from_millis(200);
const EXTENDED: Duration = Duration::from_secs(10);

/// What the mock does on one read call
enum Scripted {
    /// Hand back these bytes
    Bytes(Vec<u8>),
    /// Let the read time out
    Silence,
    /// Fail the read outright
    Fail,
}

#[derive(Default)]
struct MockState {
    written: Vec<u8>,
    reads: VecDeque<Scripted>,
    /// Every timeout the connection asked for, in order
    timeouts: Vec<Duration>,
    fail_extended_timeout: bool,
}

/// Mock serial port for testing
#[derive(Clone, Default)]
struct MockSerial {
    state: Arc<Mutex<MockState>>,
}

impl MockSerial {
    fn with_reads(reads: Vec<Scripted>) -> Self {
        let mock = Self::default();
        mock.state.lock().unwrap().reads = reads.into();
        mock
    }

    fn written(&self) -> String {
        String::from_utf8(self.state.lock().unwrap().written.clone()).unwrap()
    }

    fn timeouts(&self) -> Vec<Duration> {
        self.state.lock().unwrap().timeouts.clone()
    }
}

impl Read for MockSerial {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut state = self.state.lock().unwrap();
        match state.reads.pop_front() {
            Some(Scripted::Bytes(data)) => {
                let n = data.len().min(buf.len());
                buf[..n].copy_from_slice(&data[..n]);
                if n < data.len() {
                    state.reads.push_front(Scripted::Bytes(data[n..].to_vec()));
                }
                Ok(n)
            }
            Some(Scripted::Fail) => Err(io::Error::new(io::ErrorKind::BrokenPipe, "unplugged")),
            Some(Scripted::Silence) | None => {
                Err(io::Error::new(io::ErrorKind::TimedOut, "timed out"))
            }
        }
    }
}

impl Write for MockSerial {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.state.lock().unwrap().written.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Transport for MockSerial {
    fn set_timeout(&mut self, timeout: Duration) -> io::Result<()> {
        let mut state = self.state.lock().unwrap();
        state.timeouts.push(timeout);
        if state.fail_extended_timeout && timeout == EXTENDED {
            return Err(io::Error::new(io::ErrorKind::Other, "ioctl failed"));
        }
        Ok(())
    }

    fn describe(&self) -> String {
        "mock".to_string()
    }
}

fn bytes(data: &[u8]) -> Scripted {
    Scripted::Bytes(data.to_vec())
}

fn connect(mock: &MockSerial) -> Connection {
    Connection::with_transport(Box::new(mock.clone()), ConnectionConfig::new("mock")).unwrap()
}

#[test]
fn test_success_payload_is_trimmed() {
    let mock = MockSerial::with_reads(vec![bytes(b"@OK  PLAY \r")]);
    let mut conn = connect(&mock);

    assert_eq!(conn.dispatch("PLA", None).unwrap(), "PLAY");
    assert_eq!(mock.written(), "#PLA\r");
    assert_eq!(conn.timeout(), STEADY);
    assert_eq!(mock.timeouts(), vec![STEADY]);
}

#[test]
fn test_code_is_uppercased_and_parameters_appended() {
    let mock = MockSerial::with_reads(vec![bytes(b"@OK\r")]);
    let mut conn = connect(&mock);

    assert_eq!(conn.dispatch("srh", Some("C 0:00:34")).unwrap(), "");
    assert_eq!(mock.written(), "#SRH C 0:00:34\r");
}

#[test]
fn test_error_reply_carries_payload() {
    let mock = MockSerial::with_reads(vec![bytes(b"@ER Invalid command \r")]);
    let mut conn = connect(&mock);

    match conn.dispatch("XYZ", None) {
        Err(ProtocolError::DeviceError(detail)) => assert_eq!(detail, " Invalid command "),
        other => panic!("expected DeviceError, got {:?}", other),
    }
    assert_eq!(conn.timeout(), STEADY);
}

#[test]
fn test_error_result_code_is_case_insensitive() {
    let mock = MockSerial::with_reads(vec![bytes(b"@eR busy\r")]);
    let mut conn = connect(&mock);

    assert!(matches!(
        conn.dispatch("PLA", None),
        Err(ProtocolError::DeviceError(detail)) if detail == " busy"
    ));
}

#[test]
fn test_invalid_command_writes_nothing() {
    let mock = MockSerial::with_reads(vec![bytes(b"@OK\r")]);
    let mut conn = connect(&mock);

    for code in ["P", "POWER", "", "PO"] {
        assert!(matches!(
            conn.dispatch(code, None),
            Err(ProtocolError::InvalidCommand(_))
        ));
    }
    assert_eq!(mock.written(), "");
}

#[test]
fn test_leading_noise_is_discarded() {
    let mock = MockSerial::with_reads(vec![bytes(b"\x00\x00@OK\r")]);
    let mut conn = connect(&mock);

    assert_eq!(conn.dispatch("QPW", None).unwrap(), "");
    assert_eq!(mock.timeouts(), vec![STEADY]);
}

#[test]
fn test_noise_then_late_tail_uses_second_read() {
    let mock = MockSerial::with_reads(vec![
        bytes(b"\x00@OK 1"),
        Scripted::Silence,
        bytes(b"2\r"),
    ]);
    let mut conn = connect(&mock);

    assert_eq!(conn.dispatch("QCH", None).unwrap(), "12");
    // Recovered without touching the timeout
    assert_eq!(mock.timeouts(), vec![STEADY]);
}

#[test]
fn test_no_response_restores_timeout() {
    let mock = MockSerial::with_reads(vec![Scripted::Silence, Scripted::Silence]);
    let mut conn = connect(&mock);

    assert!(matches!(
        conn.dispatch("QPW", None),
        Err(ProtocolError::NoResponse)
    ));
    assert_eq!(mock.timeouts(), vec![STEADY, EXTENDED, STEADY]);
    assert_eq!(conn.timeout(), STEADY);
}

#[test]
fn test_slow_reply_recovered_with_extended_timeout() {
    let mock = MockSerial::with_reads(vec![Scripted::Silence, bytes(b"@OK LATE\r")]);
    let mut conn = connect(&mock);

    assert_eq!(conn.dispatch("QVR", None).unwrap(), "LATE");
    assert_eq!(mock.timeouts(), vec![STEADY, EXTENDED, STEADY]);
    assert_eq!(conn.timeout(), STEADY);
}

#[test]
fn test_partial_frame_completed_by_extended_read() {
    let mock = MockSerial::with_reads(vec![
        bytes(b"@OK PAR"),
        Scripted::Silence,
        bytes(b"TIAL\r"),
    ]);
    let mut conn = connect(&mock);

    assert_eq!(conn.dispatch("QTK", None).unwrap(), "PARTIAL");
    assert_eq!(conn.timeout(), STEADY);
}

#[test]
fn test_extended_read_failure_still_restores_timeout() {
    let mock = MockSerial::with_reads(vec![Scripted::Silence, Scripted::Fail]);
    let mut conn = connect(&mock);

    assert!(matches!(
        conn.dispatch("QPW", None),
        Err(ProtocolError::IoError(_))
    ));
    assert_eq!(mock.timeouts().last(), Some(&STEADY));
    assert_eq!(conn.timeout(), STEADY);
}

#[test]
fn test_failing_to_extend_timeout_still_restores() {
    let mock = MockSerial::with_reads(vec![Scripted::Silence]);
    mock.state.lock().unwrap().fail_extended_timeout = true;
    let mut conn = connect(&mock);

    assert!(matches!(
        conn.dispatch("QPW", None),
        Err(ProtocolError::IoError(_))
    ));
    assert_eq!(mock.timeouts(), vec![STEADY, EXTENDED, STEADY]);
    assert_eq!(conn.timeout(), STEADY);
}

#[test]
fn test_unterminated_frame_never_becomes_a_payload() {
    let mock = MockSerial::with_reads(vec![bytes(b"@OK garb"), Scripted::Silence]);
    let mut conn = connect(&mock);

    assert!(matches!(
        conn.dispatch("QPW", None),
        Err(ProtocolError::InvalidResponse(text)) if text == "@OK garb"
    ));
    assert_eq!(conn.timeout(), STEADY);
}

#[test]
fn test_noise_without_frame_is_no_response() {
    let mock = MockSerial::with_reads(vec![bytes(b"\x00\x00"), Scripted::Silence]);
    let mut conn = connect(&mock);

    assert!(matches!(
        conn.dispatch("QPW", None),
        Err(ProtocolError::NoResponse)
    ));
    assert_eq!(mock.timeouts(), vec![STEADY, EXTENDED, STEADY]);
    assert_eq!(conn.timeout(), STEADY);
}

#[test]
fn test_garbage_without_frame_is_no_response() {
    let mock = MockSerial::with_reads(vec![bytes(b"garbage"), Scripted::Silence]);
    let mut conn = connect(&mock);

    assert!(matches!(
        conn.dispatch("QPW", None),
        Err(ProtocolError::NoResponse)
    ));
    assert_eq!(conn.get_counters().3, 0);
}

#[test]
fn test_consecutive_calls_are_independent() {
    let mock = MockSerial::with_reads(vec![bytes(b"@OK ON\r"), bytes(b"@OK 1\r")]);
    let mut conn = connect(&mock);

    assert_eq!(conn.dispatch("PON", None).unwrap(), "ON");
    assert_eq!(conn.dispatch("QPW", None).unwrap(), "1");
    assert_eq!(mock.written(), "#PON\r#QPW\r");
}

#[test]
fn test_config_roundtrip_defaults() {
    let config: ConnectionConfig =
        serde_json::from_str(r#"{ "port_name": "/dev/ttyUSB0" }"#).unwrap();
    assert_eq!(config.port_name, "/dev/ttyUSB0");
    assert_eq!(config.timeout(), STEADY);
    assert_eq!(config.extended_timeout(), EXTENDED);
}

#[test]
fn test_protocol_error_display() {
    assert_eq!(ProtocolError::NoResponse.to_string(), "No response received");
    assert!(ProtocolError::DeviceError("bad".into())
        .to_string()
        .contains("bad"));
}
