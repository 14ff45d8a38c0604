//! Demo Mode - Simulated Azur 751BD for testing without hardware
//!
//! [`DemoPlayer`] is a [`Transport`] that parses request frames as the player
//! would and queues matching replies. It keeps enough state (power, playback,
//! settings) for queries to reflect earlier commands, and can prepend line
//! noise to replies the way a real RS-232 link occasionally does.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::time::Duration;

use crate::player::{
    operation_by_code, Argument, HdmiResolution, OsdPosition, RepeatMode, SubtitleShift,
    VerboseMode, ZoomRatio,
};
use crate::protocol::frame::{REQUEST_START, TERMINATOR};
use crate::protocol::Transport;

/// Model number reported by `QMD`
pub const DEMO_MODEL: &str = "BD751";

/// Firmware version reported by `QVR`
pub const DEMO_FIRMWARE: &str = "DEMO-1.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Playback {
    Stop,
    Play,
    Pause,
    FastForward,
    FastReverse,
}

impl Playback {
    fn as_str(&self) -> &'static str {
        match self {
            Playback::Stop => "STOP",
            Playback::Play => "PLAY",
            Playback::Pause => "PAUSE",
            Playback::FastForward => "FWD",
            Playback::FastReverse => "REV",
        }
    }
}

/// Simulated player
pub struct DemoPlayer {
    powered: bool,
    tray_open: bool,
    playback: Playback,
    chapter: u32,
    verbose: VerboseMode,
    hdmi: HdmiResolution,
    repeat: RepeatMode,
    zoom: ZoomRatio,
    subtitle_shift: SubtitleShift,
    osd_position: OsdPosition,
    /// Bytes received but not yet forming a complete request
    inbox: Vec<u8>,
    /// Reply bytes waiting to be read
    outbox: VecDeque<u8>,
    /// Probability of prefixing a reply with noise bytes
    noise_rate: f64,
    rng: StdRng,
    timeout: Duration,
}

impl Default for DemoPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoPlayer {
    /// A powered-on, stopped player with no line noise
    pub fn new() -> Self {
        Self {
            powered: true,
            tray_open: false,
            playback: Playback::Stop,
            chapter: 1,
            verbose: VerboseMode::Off,
            hdmi: HdmiResolution::Auto,
            repeat: RepeatMode::Off,
            zoom: ZoomRatio::Normal,
            subtitle_shift: SubtitleShift::default(),
            osd_position: OsdPosition::default(),
            inbox: Vec::new(),
            outbox: VecDeque::new(),
            noise_rate: 0.0,
            rng: StdRng::seed_from_u64(751),
            timeout: Duration::ZERO,
        }
    }

    /// Prefix replies with stray bytes with probability `rate` (0.0..=1.0),
    /// using a seeded generator so runs are reproducible
    pub fn with_noise(mut self, rate: f64, seed: u64) -> Self {
        self.noise_rate = rate.clamp(0.0, 1.0);
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Start in standby
    pub fn in_standby(mut self) -> Self {
        self.powered = false;
        self
    }

    /// Whether the simulated player is on
    pub fn is_powered(&self) -> bool {
        self.powered
    }

    /// Last read timeout requested by the client
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn push_reply(&mut self, ok: bool, payload: &str) {
        if self.noise_rate > 0.0 && self.rng.gen_bool(self.noise_rate) {
            let count = self.rng.gen_range(1..=3);
            for _ in 0..count {
                self.outbox.push_back(0x00);
            }
        }

        let code = if ok { "OK" } else { "ER" };
        let frame = if payload.is_empty() {
            format!("@{}\r", code)
        } else {
            format!("@{} {}\r", code, payload)
        };
        self.outbox.extend(frame.bytes());
    }

    /// Handle one request line (without the terminator)
    fn handle_request(&mut self, line: &[u8]) {
        let line = String::from_utf8_lossy(line);
        let Some(body) = line.strip_prefix(REQUEST_START as char) else {
            self.push_reply(false, "INVALID FRAME");
            return;
        };

        let (code, parameters) = match body.split_once(' ') {
            Some((code, params)) => (code, Some(params)),
            None => (body, None),
        };

        match self.respond(code, parameters) {
            Ok(payload) => self.push_reply(true, &payload),
            Err(reason) => self.push_reply(false, reason),
        }
    }

    fn respond(&mut self, code: &str, parameters: Option<&str>) -> Result<String, &'static str> {
        let op = operation_by_code(code).ok_or("UNKNOWN COMMAND")?;
        let parameter = op
            .argument
            .validate(parameters)
            .map_err(|_| "INVALID PARAMETER")?;

        // Standby only answers power commands and queries
        if !self.powered && !op.is_query() && !matches!(op.code, "PON" | "POW") {
            return Err("STANDBY");
        }

        let value = parameter.as_deref().unwrap_or_default();
        let reply = match op.code {
            "POW" => {
                self.powered = !self.powered;
                on_off(self.powered)
            }
            "PON" => {
                self.powered = true;
                on_off(true)
            }
            "POF" => {
                self.powered = false;
                self.playback = Playback::Stop;
                on_off(false)
            }
            "EJT" => {
                self.tray_open = !self.tray_open;
                self.playback = Playback::Stop;
                (if self.tray_open { "OPEN" } else { "CLOSE" }).to_string()
            }
            "PLA" => self.set_playback(Playback::Play),
            "PAU" => self.set_playback(Playback::Pause),
            "STP" => self.set_playback(Playback::Stop),
            "FWD" => self.set_playback(Playback::FastForward),
            "REV" => self.set_playback(Playback::FastReverse),
            "NXT" => {
                self.chapter += 1;
                String::new()
            }
            "PRE" => {
                self.chapter = self.chapter.saturating_sub(1).max(1);
                String::new()
            }
            "SVM" => {
                self.verbose = value.parse().map_err(|_| "INVALID PARAMETER")?;
                self.verbose.to_string()
            }
            "SHD" => {
                self.hdmi = value.parse().map_err(|_| "INVALID PARAMETER")?;
                self.hdmi.to_string()
            }
            "SRP" => {
                self.repeat = value.parse().map_err(|_| "INVALID PARAMETER")?;
                self.repeat.to_string()
            }
            "SZM" => {
                self.zoom = value.parse().map_err(|_| "INVALID PARAMETER")?;
                self.zoom.to_string()
            }
            "SSH" => {
                self.subtitle_shift = value.parse().map_err(|_| "INVALID PARAMETER")?;
                self.subtitle_shift.to_string()
            }
            "SOP" => {
                self.osd_position = value.parse().map_err(|_| "INVALID PARAMETER")?;
                self.osd_position.to_string()
            }
            "SRH" => {
                if self.tray_open {
                    return Err("NO DISC");
                }
                value.to_string()
            }
            "QPW" => (if self.powered { "1" } else { "0" }).to_string(),
            "QPL" => {
                if self.tray_open {
                    "OPEN".to_string()
                } else {
                    self.playback.as_str().to_string()
                }
            }
            "QCH" => format!("{:02}", self.chapter),
            "QVM" => self.verbose.to_string(),
            "QHD" => self.hdmi.to_string(),
            "QRP" => repeat_status_code(self.repeat).to_string(),
            "QZM" => zoom_status_code(self.zoom).to_string(),
            "QSH" => self.subtitle_shift.to_string(),
            "QOP" => self.osd_position.to_string(),
            "QVR" => DEMO_FIRMWARE.to_string(),
            "QMD" => DEMO_MODEL.to_string(),
            "QDT" => "BD".to_string(),
            "QRG" => "A1".to_string(),
            "QTK" => "01".to_string(),
            "QTE" | "QTR" | "QCE" | "QCR" | "QEL" | "QRE" => "00:00:00".to_string(),
            _ if op.argument == Argument::None => String::new(),
            _ => value.to_string(),
        };

        Ok(reply)
    }

    fn set_playback(&mut self, playback: Playback) -> String {
        self.playback = playback;
        playback.as_str().to_string()
    }
}

fn on_off(on: bool) -> String {
    (if on { "ON" } else { "OFF" }).to_string()
}

/// Repeat mode as the two-digit status reported by `QRP`
fn repeat_status_code(mode: RepeatMode) -> &'static str {
    match mode {
        RepeatMode::Off => "00",
        RepeatMode::Chapter => "02",
        RepeatMode::All => "03",
        RepeatMode::Title => "04",
        RepeatMode::Shuffle => "05",
        RepeatMode::Random => "06",
    }
}

/// Zoom ratio as the two-digit status reported by `QZM`
fn zoom_status_code(ratio: ZoomRatio) -> &'static str {
    match ratio {
        ZoomRatio::Normal => "00",
        ZoomRatio::Stretch => "01",
        ZoomRatio::Full => "02",
        ZoomRatio::Underscan => "03",
        ZoomRatio::X1_2 => "04",
        ZoomRatio::X1_3 => "05",
        ZoomRatio::X1_5 => "06",
        ZoomRatio::X2 => "07",
        ZoomRatio::X3 => "08",
        ZoomRatio::X4 => "09",
        ZoomRatio::Half => "10",
        ZoomRatio::Third => "11",
        ZoomRatio::Quarter => "12",
    }
}

impl Read for DemoPlayer {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.outbox.is_empty() {
            return Err(io::Error::new(io::ErrorKind::TimedOut, "no reply pending"));
        }
        let n = buf.len().min(self.outbox.len());
        for (slot, byte) in buf.iter_mut().zip(self.outbox.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }
}

impl Write for DemoPlayer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inbox.extend_from_slice(buf);
        while let Some(end) = self.inbox.iter().position(|&b| b == TERMINATOR) {
            let line: Vec<u8> = self.inbox.drain(..=end).collect();
            self.handle_request(&line[..line.len() - 1]);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Transport for DemoPlayer {
    fn set_timeout(&mut self, timeout: Duration) -> io::Result<()> {
        self.timeout = timeout;
        Ok(())
    }

    fn describe(&self) -> String {
        "demo".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::OPERATIONS;

    fn exchange(demo: &mut DemoPlayer, request: &str) -> String {
        demo.write_all(request.as_bytes()).unwrap();
        let mut buf = [0u8; 64];
        let n = demo.read(&mut buf).unwrap();
        String::from_utf8_lossy(&buf[..n]).into_owned()
    }

    #[test]
    fn test_every_code_gets_a_frame() {
        let mut demo = DemoPlayer::new();
        for op in OPERATIONS {
            // Keep the player on and the tray closed so every command is accepted
            if matches!(op.code, "POF" | "POW" | "EJT") {
                continue;
            }
            let request = match op.argument {
                Argument::None => format!("#{}\r", op.code),
                Argument::Verbose => format!("#{} 1\r", op.code),
                Argument::HdmiResolution => format!("#{} AUTO\r", op.code),
                Argument::OutputSystem => format!("#{} PAL\r", op.code),
                Argument::ZoomRatio => format!("#{} 2\r", op.code),
                Argument::Repeat => format!("#{} CH\r", op.code),
                Argument::SubtitleShift => format!("#{} 1\r", op.code),
                Argument::OsdPosition => format!("#{} 1\r", op.code),
                Argument::Free => format!("#{} T1\r", op.code),
            };
            let reply = exchange(&mut demo, &request);
            assert!(reply.starts_with("@OK"), "{} -> {:?}", op.name, reply);
            assert!(reply.ends_with('\r'), "{} -> {:?}", op.name, reply);
        }
    }

    #[test]
    fn test_unknown_code_is_an_error() {
        let mut demo = DemoPlayer::new();
        assert_eq!(exchange(&mut demo, "#XYZ\r"), "@ER UNKNOWN COMMAND\r");
        assert_eq!(exchange(&mut demo, "PLA\r"), "@ER INVALID FRAME\r");
    }

    #[test]
    fn test_state_is_reported_back() {
        let mut demo = DemoPlayer::new();
        assert_eq!(exchange(&mut demo, "#SRP SHF\r"), "@OK SHF\r");
        assert_eq!(exchange(&mut demo, "#QRP\r"), "@OK 05\r");
        assert_eq!(exchange(&mut demo, "#PLA\r"), "@OK PLAY\r");
        assert_eq!(exchange(&mut demo, "#QPL\r"), "@OK PLAY\r");
        assert_eq!(exchange(&mut demo, "#SVM 9\r"), "@ER INVALID PARAMETER\r");
    }

    #[test]
    fn test_standby_rejects_commands() {
        let mut demo = DemoPlayer::new().in_standby();
        assert_eq!(exchange(&mut demo, "#PLA\r"), "@ER STANDBY\r");
        assert_eq!(exchange(&mut demo, "#QPW\r"), "@OK 0\r");
        assert_eq!(exchange(&mut demo, "#PON\r"), "@OK ON\r");
        assert!(demo.is_powered());
    }

    #[test]
    fn test_noise_prefix() {
        let mut demo = DemoPlayer::new().with_noise(1.0, 7);
        let reply = exchange(&mut demo, "#QMD\r");
        assert!(reply.starts_with('\0'));
        assert!(reply.ends_with("@OK BD751\r"));
    }

    #[test]
    fn test_empty_outbox_times_out() {
        let mut demo = DemoPlayer::new();
        let mut buf = [0u8; 4];
        let err = demo.read(&mut buf).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::TimedOut);
    }
}
