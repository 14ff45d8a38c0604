//! Argument types for the parameterized commands
//!
//! Every setter takes a closed type, so an out-of-domain value is rejected
//! while the value is built, before anything reaches the wire.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::protocol::ProtocolError;

/// Declares a unit enum backed by fixed wire tokens, with case-insensitive
/// parsing and `Display` producing the token.
macro_rules! wire_tokens {
    (
        $(#[$meta:meta])*
        $name:ident, $what:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $token:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every legal value, in catalog order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Token sent on the wire
            pub fn as_token(&self) -> &'static str {
                match self {
                    $($name::$variant => $token),+
                }
            }
        }

        impl FromStr for $name {
            type Err = ProtocolError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_token().eq_ignore_ascii_case(s))
                    .ok_or_else(|| {
                        ProtocolError::InvalidArgument(format!("{} not supported: {:?}", $what, s))
                    })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_token())
            }
        }
    };
}

wire_tokens! {
    /// Verbosity of unsolicited reports sent by the player
    VerboseMode, "Verbose mode" {
        /// No unsolicited output
        Off => "0",
        /// Echo received commands
        EchoCommands => "1",
        /// Report major status changes
        StatusChanges => "2",
        /// Report playback time every second
        PlaybackTime => "3",
    }
}

wire_tokens! {
    /// HDMI output resolution
    HdmiResolution, "HDMI resolution" {
        /// Standard definition, interlaced
        SdInterlaced => "SDI",
        /// Standard definition, progressive
        SdProgressive => "SDP",
        /// 720 lines, progressive
        P720 => "720P",
        /// 1080 lines, interlaced
        I1080 => "1080I",
        /// 1080 lines, progressive
        P1080 => "1080P",
        /// Source direct
        Source => "SRC",
        /// Automatic
        Auto => "AUTO",
    }
}

wire_tokens! {
    /// TV output system
    OutputSystem, "Output system" {
        /// NTSC
        Ntsc => "NTSC",
        /// PAL
        Pal => "PAL",
        /// Follow the disc
        Auto => "AUTO",
    }
}

wire_tokens! {
    /// Zoom ratio / aspect handling
    ZoomRatio, "Zoom ratio" {
        /// No zoom
        Normal => "1",
        /// Stretch to aspect ratio
        Stretch => "AR",
        /// Full screen
        Full => "FS",
        /// Underscan
        Underscan => "US",
        /// 1.2x
        X1_2 => "1.2",
        /// 1.3x
        X1_3 => "1.3",
        /// 1.5x
        X1_5 => "1.5",
        /// 2x
        X2 => "2",
        /// 3x
        X3 => "3",
        /// 4x
        X4 => "4",
        /// 1/2 zoom out
        Half => "1/2",
        /// 1/3 zoom out
        Third => "1/3",
        /// 1/4 zoom out
        Quarter => "1/4",
    }
}

wire_tokens! {
    /// Repeat mode
    RepeatMode, "Repeat mode" {
        /// Repeat chapter
        Chapter => "CH",
        /// Repeat title
        Title => "TT",
        /// Repeat everything
        All => "ALL",
        /// Repeat off
        Off => "OFF",
        /// Shuffle
        Shuffle => "SHF",
        /// Random
        Random => "RND",
    }
}

impl VerboseMode {
    /// What the player reports in this mode
    pub fn description(&self) -> &'static str {
        match self {
            VerboseMode::Off => "Off",
            VerboseMode::EchoCommands => "Echo commands",
            VerboseMode::StatusChanges => "Report major status changes (unsolicited)",
            VerboseMode::PlaybackTime => "Report playback time every second (unsolicited)",
        }
    }
}

impl TryFrom<u8> for VerboseMode {
    type Error = ProtocolError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(VerboseMode::Off),
            1 => Ok(VerboseMode::EchoCommands),
            2 => Ok(VerboseMode::StatusChanges),
            3 => Ok(VerboseMode::PlaybackTime),
            _ => Err(ProtocolError::InvalidArgument(format!(
                "Verbose mode not supported: {}",
                value
            ))),
        }
    }
}

impl HdmiResolution {
    /// Human-readable name of the resolution
    pub fn description(&self) -> &'static str {
        match self {
            HdmiResolution::SdInterlaced => "Standard Definition (interlaced)",
            HdmiResolution::SdProgressive => "Standard Definition (progressive)",
            HdmiResolution::P720 => "720 vertical lines (progressive)",
            HdmiResolution::I1080 => "1080 vertical lines (interlaced)",
            HdmiResolution::P1080 => "1080 vertical lines (progressive)",
            HdmiResolution::Source => "Source direct",
            HdmiResolution::Auto => "Automatic",
        }
    }
}

/// Parse an integer argument, rejecting values outside `min..=max`
fn parse_bounded(s: &str, what: &str, min: i8, max: i8) -> Result<i8, ProtocolError> {
    let value: i8 = s
        .trim()
        .parse()
        .map_err(|_| ProtocolError::InvalidArgument(format!("{} must be an integer: {:?}", what, s)))?;
    check_bounds(value, what, min, max)
}

fn check_bounds(value: i8, what: &str, min: i8, max: i8) -> Result<i8, ProtocolError> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(ProtocolError::InvalidArgument(format!(
            "{} must be between {} and {}: {}",
            what, min, max, value
        )))
    }
}

/// Subtitle vertical shift, -5 through 5
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub struct SubtitleShift(i8);

impl SubtitleShift {
    /// Lowest shift accepted by the player
    pub const MIN: i8 = -5;
    /// Highest shift accepted by the player
    pub const MAX: i8 = 5;

    /// Validate a shift value
    pub fn new(value: i8) -> Result<Self, ProtocolError> {
        check_bounds(value, "Subtitle shift", Self::MIN, Self::MAX).map(Self)
    }

    /// The shift value
    pub fn get(&self) -> i8 {
        self.0
    }
}

impl TryFrom<i8> for SubtitleShift {
    type Error = ProtocolError;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SubtitleShift> for i8 {
    fn from(shift: SubtitleShift) -> Self {
        shift.0
    }
}

impl FromStr for SubtitleShift {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_bounded(s, "Subtitle shift", Self::MIN, Self::MAX).map(Self)
    }
}

impl fmt::Display for SubtitleShift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// On-screen display position, 0 through 5
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct OsdPosition(u8);

impl OsdPosition {
    /// Highest position accepted by the player
    pub const MAX: u8 = 5;

    /// Validate a position
    pub fn new(value: u8) -> Result<Self, ProtocolError> {
        if value <= Self::MAX {
            Ok(Self(value))
        } else {
            Err(ProtocolError::InvalidArgument(format!(
                "OSD position must be between 0 and {}: {}",
                Self::MAX,
                value
            )))
        }
    }

    /// The position value
    pub fn get(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for OsdPosition {
    type Error = ProtocolError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<OsdPosition> for u8 {
    fn from(position: OsdPosition) -> Self {
        position.0
    }
}

impl FromStr for OsdPosition {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = parse_bounded(s, "OSD position", 0, Self::MAX as i8)?;
        Ok(Self(value as u8))
    }
}

impl fmt::Display for OsdPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
