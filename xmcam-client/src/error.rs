//! Client error types.

use crate::config::ConfigError;
use crate::session::SessionState;
use xmcam_protocol::{MessageKind, ProtocolError, StatusCode};
use thiserror::Error;

/// Client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("connection error: {0}")]
    Connect(#[source] std::io::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("not connected")]
    NotConnected,

    #[error("connection closed")]
    ConnectionClosed,

    #[error("request timeout")]
    Timeout,

    #[error("authentication failed: {status}")]
    AuthenticationFailed { status: StatusCode },

    #[error("empty response to {kind}")]
    EmptyResponse { kind: MessageKind },

    #[error("device rejected {kind}: {status}")]
    Device {
        kind: MessageKind,
        status: StatusCode,
    },

    #[error("invalid session state: {operation} requires {expected}, session is {actual:?}")]
    InvalidState {
        operation: &'static str,
        expected: &'static str,
        actual: SessionState,
    },

    #[error("connection desynchronized by an incomplete exchange")]
    Desynchronized,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("audio error: {0}")]
    Audio(String),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ClientError {
    /// Returns whether the frame stream can no longer be trusted.
    ///
    /// After such an error every further exchange on the same connection fails;
    /// the caller should close it and connect again.
    pub fn breaks_connection(&self) -> bool {
        matches!(
            self,
            ClientError::Io(_)
                | ClientError::ConnectionClosed
                | ClientError::Timeout
                | ClientError::Desynchronized
                | ClientError::Protocol(ProtocolError::MalformedHeader(_))
        )
    }

    /// Returns whether this is a decode failure of a structured payload.
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            ClientError::Protocol(ProtocolError::Decode(_) | ProtocolError::InvalidUtf8)
        )
    }
}
