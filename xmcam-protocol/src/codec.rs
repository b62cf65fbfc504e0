//! Encoder and decoder for frames and payloads.

use crate::error::ProtocolError;
use crate::frame::{Frame, FrameHeader};
use crate::message::{format_session_id, MessageKind, SESSION_ID_KEY};
use bytes::{Bytes, BytesMut};
use serde_json::Value;

/// Request payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Nested key-value data serialized as JSON text. Must be an object.
    Structured(Value),
    /// Opaque bytes sent as-is (audio streaming).
    Raw(Bytes),
    /// No payload.
    Empty,
}

impl Payload {
    /// Creates a structured payload from any serializable value.
    pub fn structured<T: serde::Serialize>(value: &T) -> Result<Self, ProtocolError> {
        Ok(Payload::Structured(serde_json::to_value(value)?))
    }

    /// Creates a raw payload.
    pub fn raw(bytes: impl Into<Bytes>) -> Self {
        Payload::Raw(bytes.into())
    }
}

/// Decoded reply payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Structured(Value),
    Raw(Bytes),
    Empty,
}

impl Body {
    /// Returns the structured value, if any.
    pub fn as_structured(&self) -> Option<&Value> {
        match self {
            Body::Structured(value) => Some(value),
            _ => None,
        }
    }

    /// Consumes the body, returning the structured value or `Null`.
    pub fn into_structured(self) -> Value {
        match self {
            Body::Structured(value) => value,
            _ => Value::Null,
        }
    }

    /// Returns the raw bytes, if any.
    pub fn as_raw(&self) -> Option<&Bytes> {
        match self {
            Body::Raw(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Body::Empty)
    }
}

/// Encodes requests into frames.
pub struct Encoder;

impl Encoder {
    /// Encodes a request frame.
    ///
    /// Structured payloads get the session identifier injected under `SessionID`,
    /// except for login. Raw payloads are written untouched.
    pub fn encode(
        kind: MessageKind,
        session_id: u32,
        payload: &Payload,
    ) -> Result<BytesMut, ProtocolError> {
        let body = match payload {
            Payload::Structured(value) => {
                let mut value = value.clone();
                let map = value
                    .as_object_mut()
                    .ok_or(ProtocolError::InvalidPayload("structured payload must be an object"))?;
                if kind.carries_session_id() {
                    map.insert(
                        SESSION_ID_KEY.to_string(),
                        Value::String(format_session_id(session_id)),
                    );
                }
                Bytes::from(serde_json::to_vec(&value)?)
            }
            Payload::Raw(bytes) => bytes.clone(),
            Payload::Empty => Bytes::new(),
        };

        let frame = Frame::new(FrameHeader::new(kind, session_id), body)?;
        Ok(frame.encode())
    }
}

/// Decodes frames from an accumulating buffer and reply payloads by kind.
pub struct Decoder {
    buffer: BytesMut,
}

impl Decoder {
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::with_capacity(8192),
        }
    }

    /// Appends data to the internal buffer.
    pub fn extend(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Attempts to decode the next frame from the buffer.
    pub fn decode_frame(&mut self) -> Result<Option<Frame>, ProtocolError> {
        Frame::decode(&mut self.buffer)
    }

    /// Returns the number of bytes currently buffered.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Clears the internal buffer.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Decodes a reply payload according to the kind of the request it answers.
    ///
    /// Structured replies may be terminated by newline and NUL bytes, which are ignored.
    pub fn decode_body(kind: MessageKind, payload: Bytes) -> Result<Body, ProtocolError> {
        if payload.is_empty() {
            return Ok(Body::Empty);
        }
        if kind.has_raw_reply() {
            return Ok(Body::Raw(payload));
        }

        let end = payload
            .iter()
            .rposition(|&b| b != 0 && !b.is_ascii_whitespace())
            .map_or(0, |pos| pos + 1);
        if end == 0 {
            return Ok(Body::Empty);
        }

        let text = std::str::from_utf8(&payload[..end]).map_err(|_| ProtocolError::InvalidUtf8)?;
        Ok(Body::Structured(serde_json::from_str(text)?))
    }

    /// Decodes a request payload as the device would see it.
    pub fn decode_request(kind: MessageKind, payload: Bytes) -> Result<Payload, ProtocolError> {
        if payload.is_empty() {
            return Ok(Payload::Empty);
        }
        if kind == MessageKind::TALK_DATA {
            return Ok(Payload::Raw(payload));
        }
        let text = std::str::from_utf8(&payload).map_err(|_| ProtocolError::InvalidUtf8)?;
        Ok(Payload::Structured(serde_json::from_str(text)?))
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}
