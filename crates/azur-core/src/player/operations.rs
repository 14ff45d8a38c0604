//! Operation catalog
//!
//! Maps each named player operation to its fixed 3-character command code,
//! together with the domain of its argument (if any) and the settle delay the
//! player needs after it (if any). This table is the compatibility contract
//! with the device and must match its command set exactly.

use std::time::Duration;

use super::settings::{
    HdmiResolution, OsdPosition, OutputSystem, RepeatMode, SubtitleShift, VerboseMode, ZoomRatio,
};
use crate::protocol::ProtocolError;

/// Time the player needs to boot after `PON`
pub const POWER_ON_SETTLE: Duration = Duration::from_secs(25);

/// Time until the player's lights go out after `POF`
pub const POWER_OFF_SETTLE: Duration = Duration::from_secs(10);

/// Argument domain of an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Argument {
    /// Takes no argument
    None,
    /// [`VerboseMode`] token
    Verbose,
    /// [`HdmiResolution`] token
    HdmiResolution,
    /// [`OutputSystem`] token
    OutputSystem,
    /// [`ZoomRatio`] token
    ZoomRatio,
    /// [`RepeatMode`] token
    Repeat,
    /// [`SubtitleShift`] integer
    SubtitleShift,
    /// [`OsdPosition`] integer
    OsdPosition,
    /// Free text forwarded untouched (search targets)
    Free,
}

impl Argument {
    /// Check a raw argument against the domain and return the wire parameter.
    ///
    /// Fails with [`ProtocolError::InvalidArgument`] when a value is missing,
    /// unexpected, or outside the domain.
    pub fn validate(&self, raw: Option<&str>) -> Result<Option<String>, ProtocolError> {
        let raw = match (self, raw) {
            (Argument::None, None) => return Ok(None),
            (Argument::None, Some(value)) => {
                return Err(ProtocolError::InvalidArgument(format!(
                    "operation takes no argument, got {:?}",
                    value
                )))
            }
            (_, None) => {
                return Err(ProtocolError::InvalidArgument(format!(
                    "missing {} argument",
                    self.label()
                )))
            }
            (_, Some(value)) => value,
        };

        let token = match self {
            Argument::None => unreachable!("handled above"),
            Argument::Verbose => raw.parse::<VerboseMode>()?.to_string(),
            Argument::HdmiResolution => raw.parse::<HdmiResolution>()?.to_string(),
            Argument::OutputSystem => raw.parse::<OutputSystem>()?.to_string(),
            Argument::ZoomRatio => raw.parse::<ZoomRatio>()?.to_string(),
            Argument::Repeat => raw.parse::<RepeatMode>()?.to_string(),
            Argument::SubtitleShift => raw.parse::<SubtitleShift>()?.to_string(),
            Argument::OsdPosition => raw.parse::<OsdPosition>()?.to_string(),
            Argument::Free => raw.to_string(),
        };

        Ok(Some(token))
    }

    /// Short name of the domain, used in messages and help output
    pub fn label(&self) -> &'static str {
        match self {
            Argument::None => "none",
            Argument::Verbose => "verbose mode (0-3)",
            Argument::HdmiResolution => "HDMI resolution (SDI|SDP|720P|1080I|1080P|SRC|AUTO)",
            Argument::OutputSystem => "output system (NTSC|PAL|AUTO)",
            Argument::ZoomRatio => "zoom ratio (1|AR|FS|US|1.2|1.3|1.5|2|1/2|3|4|1/3|1/4)",
            Argument::Repeat => "repeat mode (CH|TT|ALL|OFF|SHF|RND)",
            Argument::SubtitleShift => "subtitle shift (-5..5)",
            Argument::OsdPosition => "OSD position (0..5)",
            Argument::Free => "search target (e.g. T3, C10, C 0:00:34, 0:12:13)",
        }
    }
}

/// One named operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    /// Operation name, lower snake case
    pub name: &'static str,
    /// 3-character command code
    pub code: &'static str,
    /// One-line description
    pub summary: &'static str,
    /// Argument domain
    pub argument: Argument,
    /// Delay to wait after a successful reply
    pub settle: Option<Duration>,
}

impl Operation {
    /// True for `Q**` status reads
    pub fn is_query(&self) -> bool {
        self.code.starts_with('Q')
    }
}

const fn op(name: &'static str, code: &'static str, summary: &'static str) -> Operation {
    Operation {
        name,
        code,
        summary,
        argument: Argument::None,
        settle: None,
    }
}

const fn setter(
    name: &'static str,
    code: &'static str,
    summary: &'static str,
    argument: Argument,
) -> Operation {
    Operation {
        name,
        code,
        summary,
        argument,
        settle: None,
    }
}

const fn settled(
    name: &'static str,
    code: &'static str,
    summary: &'static str,
    settle: Duration,
) -> Operation {
    Operation {
        name,
        code,
        summary,
        argument: Argument::None,
        settle: Some(settle),
    }
}

/// Every operation the player understands
pub static OPERATIONS: &[Operation] = &[
    // Power and system
    op("power_toggle", "POW", "Toggle power"),
    settled("power_on", "PON", "Turn power on", POWER_ON_SETTLE),
    settled("power_off", "POF", "Turn power off", POWER_OFF_SETTLE),
    op("source", "SRC", "Go to the internet menu"),
    op("eject_toggle", "EJT", "Open/close the disc tray"),
    op("system_cycle", "SYS", "Cycle TV output systems (NTSC, PAL, MULTI)"),
    op("dim_cycle", "DIM", "Cycle front panel dimmer (ON, DIM, OFF)"),
    op("pureaudio_toggle", "PUR", "Toggle pure audio mode"),
    // Numeric keypad
    op("num1", "NU1", "Numeric key 1"),
    op("num2", "NU2", "Numeric key 2"),
    op("num3", "NU3", "Numeric key 3"),
    op("num4", "NU4", "Numeric key 4"),
    op("num5", "NU5", "Numeric key 5"),
    op("num6", "NU6", "Numeric key 6"),
    op("num7", "NU7", "Numeric key 7"),
    op("num8", "NU8", "Numeric key 8"),
    op("num9", "NU9", "Numeric key 9"),
    op("num0", "NU0", "Numeric key 0"),
    op("clr", "CLR", "Clear numeric input"),
    op("goto", "GOT", "Play from a specific location"),
    // Menus and navigation
    op("home", "HOM", "Go to the home menu"),
    op("page_up", "PUP", "Previous page"),
    op("page_down", "PDN", "Next page"),
    op("osd_toggle", "OSD", "Toggle on-screen display"),
    op("top_menu", "TTL", "Go to the disc top menu"),
    op("menu", "MNU", "BD pop-up or DVD main menu"),
    op("up", "NUP", "Up arrow"),
    op("left", "NLT", "Left arrow"),
    op("right", "NRT", "Right arrow"),
    op("down", "NDN", "Down arrow"),
    op("enter", "SEL", "Enter/select"),
    op("setup", "SET", "Player setup menu"),
    op("back", "RET", "Return to the previous menu"),
    op("red", "RED", "Red button"),
    op("green", "GRN", "Green button"),
    op("blue", "BLU", "Blue button"),
    op("yellow", "YLW", "Yellow button"),
    // Transport
    op("stop", "STP", "Stop playback"),
    op("play", "PLA", "Start/resume playback"),
    op("pause", "PAU", "Pause playback"),
    op("previous", "PRE", "Skip to previous track/chapter"),
    op("next", "NXT", "Skip to next track/chapter"),
    op("fast_reverse", "REV", "Fast reverse"),
    op("fast_forward", "FWD", "Fast forward"),
    op("audio_language_cycle", "AUD", "Cycle audio languages"),
    op("subtitle_language_cycle", "SUB", "Cycle subtitle languages"),
    op("angle_cycle", "ANG", "Cycle camera angles"),
    op("zoom_cycle", "ZOM", "Cycle zoom/aspect ratio"),
    op("toggle_sap", "SAP", "Toggle secondary audio program"),
    op("ab_repeat_cycle", "ATB", "Repeat the selected A-B section"),
    op("repeat_cycle", "RPT", "Cycle repeat modes"),
    op("pip_toggle", "PIP", "Show/hide picture-in-picture"),
    op("resolution_cycle", "HDM", "Cycle output resolutions"),
    op("subtitle_shift", "SUH", "Hold the subtitle button to shift subtitles"),
    op("direct_play", "DPL", "Direct play"),
    op("reset", "RST", "Clear the RS-232 command buffer"),
    // Status queries
    op("query_verbose_mode", "QVM", "Verbose mode"),
    op("query_power_status", "QPW", "Power status"),
    op("query_firmware_version", "QVR", "Firmware version"),
    op("query_hdmi_resolution", "QHD", "HDMI resolution"),
    op("query_playback_status", "QPL", "Playback status"),
    op("query_track_title", "QTK", "Current track/title"),
    op("query_chapter", "QCH", "Current chapter"),
    op("query_track_elapsed", "QTE", "Track/title elapsed time"),
    op("query_track_remaining", "QTR", "Track/title remaining time"),
    op("query_chapter_elapsed", "QCE", "Chapter elapsed time"),
    op("query_chapter_remaining", "QCR", "Chapter remaining time"),
    op("query_total_elapsed", "QEL", "Total elapsed time"),
    op("query_total_remaining", "QRE", "Total remaining time"),
    op("query_disc_type", "QDT", "Disc type"),
    op("query_audio_type", "QAT", "Audio type"),
    op("query_subtitle_type", "QST", "Subtitle type"),
    op("query_subtitle_shift", "QSH", "Subtitle shift"),
    op("query_osd_position", "QOP", "OSD position"),
    op("query_repeat_mode", "QRP", "Repeat mode"),
    op("query_zoom_mode", "QZM", "Zoom mode"),
    op("query_region_code", "QRG", "Region code"),
    op("query_model_number", "QMD", "Model number"),
    // Setters
    setter("set_verbose_mode", "SVM", "Set verbose mode", Argument::Verbose),
    setter("set_hdmi_resolution", "SHD", "Set HDMI resolution", Argument::HdmiResolution),
    setter("set_output_system", "SPN", "Set TV output system", Argument::OutputSystem),
    setter("set_zoom_ratio", "SZM", "Set zoom ratio", Argument::ZoomRatio),
    setter("set_repeat", "SRP", "Set repeat mode", Argument::Repeat),
    setter("search", "SRH", "Search to a title, chapter or time", Argument::Free),
    setter("set_subtitle_shift", "SSH", "Set subtitle shift", Argument::SubtitleShift),
    setter("set_osd_position", "SOP", "Set OSD position", Argument::OsdPosition),
];

/// Look up an operation by name. Case and `-`/`_` are not significant.
pub fn operation(name: &str) -> Option<&'static Operation> {
    let wanted = name.trim().replace('-', "_");
    OPERATIONS
        .iter()
        .find(|op| op.name.eq_ignore_ascii_case(&wanted))
}

/// Look up an operation by its command code (case-insensitive)
pub fn operation_by_code(code: &str) -> Option<&'static Operation> {
    OPERATIONS
        .iter()
        .find(|op| op.code.eq_ignore_ascii_case(code.trim()))
}
