//! # xmcam-protocol
//!
//! Wire protocol implementation for XM/DVRIP network video recorders and cameras.
//!
//! This crate provides:
//! - The fixed 20-byte little-endian frame header
//! - Structured (JSON) and raw payload encoding with session identifier injection
//! - Response body decoding per message kind
//! - Message kind constants, device status codes and typed command parameters

pub mod codec;
pub mod error;
pub mod frame;
pub mod message;

pub use codec::{Body, Decoder, Encoder, Payload};
pub use error::{ProtocolError, StatusCode};
pub use frame::{Frame, FrameHeader, FRAME_HEADER_SIZE, MARKER};
pub use message::{format_session_id, parse_session_id, MessageKind};

/// Protocol version written into outgoing frames.
pub const PROTOCOL_VERSION: u8 = 0x01;

/// Default control port of XM devices.
pub const DEFAULT_PORT: u16 = 34567;
