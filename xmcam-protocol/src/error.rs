//! Protocol error types and device status codes.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Protocol-level errors that can occur during framing or payload handling.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed header: {0}")]
    MalformedHeader(String),

    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid UTF-8 in payload")]
    InvalidUtf8,

    #[error("invalid payload: {0}")]
    InvalidPayload(&'static str),

    #[error("frame too large: {size} bytes")]
    FrameTooLarge { size: usize },
}

/// Status code reported by the device in the `Ret` field of a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusCode(pub i64);

impl StatusCode {
    pub const OK: StatusCode = StatusCode(100);
    pub const UNKNOWN_ERROR: StatusCode = StatusCode(101);
    pub const UNSUPPORTED_VERSION: StatusCode = StatusCode(102);
    pub const NOT_PERMITTED: StatusCode = StatusCode(103);
    pub const ALREADY_LOGGED_IN: StatusCode = StatusCode(104);
    pub const NOT_LOGGED_IN: StatusCode = StatusCode(105);
    pub const BAD_CREDENTIALS: StatusCode = StatusCode(106);
    pub const NO_PERMISSION: StatusCode = StatusCode(107);
    pub const BAD_PASSWORD: StatusCode = StatusCode(203);
    pub const UPGRADE_STARTED: StatusCode = StatusCode(511);
    pub const UPGRADE_NOT_STARTED: StatusCode = StatusCode(512);
    pub const UPGRADE_DATA_ERROR: StatusCode = StatusCode(513);
    pub const UPGRADE_ERROR: StatusCode = StatusCode(514);
    pub const UPGRADE_SUCCESS: StatusCode = StatusCode(515);

    /// Returns whether the device accepted the command.
    pub fn is_success(&self) -> bool {
        *self == Self::OK || *self == Self::UPGRADE_SUCCESS
    }

    /// Returns the device's meaning of this code, if known.
    pub fn description(&self) -> Option<&'static str> {
        let text = match self.0 {
            100 => "OK",
            101 => "unknown error",
            102 => "unsupported version",
            103 => "request not permitted",
            104 => "user already logged in",
            105 => "user is not logged in",
            106 => "username or password is incorrect",
            107 => "user does not have necessary permissions",
            203 => "password is incorrect",
            511 => "start of upgrade",
            512 => "upgrade was not started",
            513 => "upgrade data error",
            514 => "upgrade error",
            515 => "upgrade successful",
            _ => return None,
        };
        Some(text)
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.description() {
            Some(text) => write!(f, "{} ({})", self.0, text),
            None => write!(f, "{}", self.0),
        }
    }
}
