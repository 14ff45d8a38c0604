//! Decoding of query replies into readable descriptions

use super::settings::{HdmiResolution, VerboseMode};

/// Repeat status codes reported by `QRP`
const REPEAT_STATUS: &[(&str, &str)] = &[
    ("00", "Off"),
    ("01", "Repeat once"),
    ("02", "Repeat chapter"),
    ("03", "Repeat all"),
    ("04", "Repeat title"),
    ("05", "Shuffle"),
    ("06", "Random"),
];

/// Zoom status codes reported by `QZM`
const ZOOM_STATUS: &[(&str, &str)] = &[
    ("00", "Off"),
    ("01", "Stretch"),
    ("02", "Full"),
    ("03", "Underscan"),
    ("04", "1.2"),
    ("05", "1.3"),
    ("06", "1.5"),
    ("07", "2"),
    ("08", "3"),
    ("09", "4"),
    ("10", "1/2"),
    ("11", "1/3"),
    ("12", "1/4"),
    ("13", "Pillar box"),
];

fn lookup(table: &[(&str, &'static str)], code: &str) -> Option<&'static str> {
    let code = code.trim();
    table
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, description)| *description)
}

/// Describe a `QRP` reply
pub fn repeat_status(code: &str) -> Option<&'static str> {
    lookup(REPEAT_STATUS, code)
}

/// Describe a `QZM` reply
pub fn zoom_status(code: &str) -> Option<&'static str> {
    lookup(ZOOM_STATUS, code)
}

/// Describe a `QVM` reply
pub fn verbose_status(code: &str) -> Option<&'static str> {
    code.parse::<VerboseMode>().ok().map(|m| m.description())
}

/// Describe a `QHD` reply
pub fn hdmi_status(code: &str) -> Option<&'static str> {
    code.parse::<HdmiResolution>().ok().map(|r| r.description())
}

/// Describe the reply of a status query, when the query has a known code table
pub fn describe(query_code: &str, reply: &str) -> Option<&'static str> {
    match query_code.to_ascii_uppercase().as_str() {
        "QRP" => repeat_status(reply),
        "QZM" => zoom_status(reply),
        "QVM" => verbose_status(reply),
        "QHD" => hdmi_status(reply),
        _ => None,
    }
}
