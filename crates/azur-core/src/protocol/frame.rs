//! Frame encoding/decoding
//!
//! Request frame: `#` + 3-character command code + optional (` ` + parameters) + `\r`.
//!
//! Reply frame: `@` + 2-character result code + payload + `\r`. A result code of
//! `ER` (any case) marks a failure and the payload carries the player's reason.

use super::{ProtocolError, COMMAND_CODE_LEN};

/// Request start marker
pub const REQUEST_START: u8 = b'#';

/// Reply start marker
pub const REPLY_START: u8 = b'@';

/// Terminator for both directions
pub const TERMINATOR: u8 = b'\r';

/// Result code reported by the player on failure
pub const ERROR_RESULT_CODE: &str = "ER";

/// A single command sent to the player
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    code: String,
    parameters: Option<String>,
}

impl Request {
    /// Create a request, normalizing the code to uppercase.
    ///
    /// Fails with [`ProtocolError::InvalidCommand`] unless `code` is exactly
    /// three characters long.
    pub fn new(code: &str, parameters: Option<&str>) -> Result<Self, ProtocolError> {
        if code.chars().count() != COMMAND_CODE_LEN {
            return Err(ProtocolError::InvalidCommand(code.to_string()));
        }

        Ok(Self {
            code: code.to_ascii_uppercase(),
            parameters: parameters
                .filter(|p| !p.is_empty())
                .map(str::to_string),
        })
    }

    /// Uppercased command code
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Parameter text, if any
    pub fn parameters(&self) -> Option<&str> {
        self.parameters.as_deref()
    }

    /// Encode the request to wire bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        let params_len = self.parameters.as_ref().map_or(0, |p| p.len() + 1);
        let mut bytes = Vec::with_capacity(1 + self.code.len() + params_len + 1);

        bytes.push(REQUEST_START);
        bytes.extend_from_slice(self.code.as_bytes());
        if let Some(params) = &self.parameters {
            bytes.push(b' ');
            bytes.extend_from_slice(params.as_bytes());
        }
        bytes.push(TERMINATOR);

        bytes
    }
}

/// A decoded reply frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Two character result code (shorter only for truncated frames)
    pub result_code: String,
    /// Everything between the result code and the terminator, untrimmed
    pub payload: String,
}

impl Reply {
    /// Decode a well-formed reply frame.
    ///
    /// The caller is expected to have checked [`is_well_formed`]; anything else
    /// is rejected with [`ProtocolError::InvalidResponse`].
    pub fn from_bytes(data: &[u8]) -> Result<Self, ProtocolError> {
        if !is_well_formed(data) {
            return Err(ProtocolError::InvalidResponse(
                String::from_utf8_lossy(data).into_owned(),
            ));
        }

        // Between '@' and '\r'
        let body = &data[1..data.len() - 1];
        let split = body.len().min(2);

        Ok(Self {
            result_code: String::from_utf8_lossy(&body[..split]).into_owned(),
            payload: String::from_utf8_lossy(&body[split..]).into_owned(),
        })
    }

    /// True when the player flagged the request as failed
    pub fn is_error(&self) -> bool {
        self.result_code.eq_ignore_ascii_case(ERROR_RESULT_CODE)
    }

    /// Convert into the caller-facing result: the trimmed payload on success,
    /// [`ProtocolError::DeviceError`] with the verbatim payload otherwise.
    pub fn into_result(self) -> Result<String, ProtocolError> {
        if self.is_error() {
            Err(ProtocolError::DeviceError(self.payload))
        } else {
            Ok(self.payload.trim().to_string())
        }
    }
}

/// A buffer holds a complete frame when it starts with `@` and ends with `\r`
pub fn is_well_formed(data: &[u8]) -> bool {
    data.first() == Some(&REPLY_START) && data.last() == Some(&TERMINATOR)
}

/// True when the terminator appears anywhere in the buffer
pub fn has_terminator(data: &[u8]) -> bool {
    data.contains(&TERMINATOR)
}

/// Drop any bytes preceding the first `@`.
///
/// Returns `true` when something was discarded. A buffer without `@`, or one
/// that already starts with it, is left untouched.
pub fn trim_leading_noise(data: &mut Vec<u8>) -> bool {
    match data.iter().position(|&b| b == REPLY_START) {
        Some(pos) if pos > 0 => {
            data.drain(..pos);
            true
        }
        _ => false,
    }
}
