//! Binary frame format.
//!
//! Frame layout (20 bytes header + payload, all integers little-endian):
//!
//! ```text
//! +--------+---------+----------+------------+----------+
//! | marker | version | reserved | session_id | sequence |
//! | 1 byte | 1 byte  | 2 bytes  |  4 bytes   | 4 bytes  |
//! +--------+---------+----------+------------+----------+
//! | channel | end_flag | kind    | payload_len |
//! | 1 byte  | 1 byte   | 2 bytes |   4 bytes   |
//! +---------+----------+---------+-------------+
//! | payload                                    |
//! | payload_len bytes                          |
//! +--------------------------------------------+
//! ```

use crate::error::ProtocolError;
use crate::message::MessageKind;
use bytes::{Buf, BufMut, Bytes, BytesMut};

/// Marker byte opening every frame.
pub const MARKER: u8 = 0xFF;

/// Size of the fixed frame header in bytes (1+1+2+4+4+1+1+2+4 = 20).
pub const FRAME_HEADER_SIZE: usize = 20;

/// Fixed frame header.
///
/// The reserved bytes are written as zero and ignored on decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Protocol version byte.
    pub version: u8,
    /// Session identifier. Signed on the wire, kept as the raw 32-bit value.
    pub session_id: u32,
    /// Sequence number, assigned by the device on replies.
    pub sequence: i32,
    /// Channel number.
    pub channel: u8,
    /// End-of-message flag.
    pub end_flag: u8,
    /// Message kind.
    pub kind: MessageKind,
    /// Number of payload bytes following the header.
    pub payload_len: u32,
}

impl FrameHeader {
    /// Creates a request header for the given kind and session.
    pub fn new(kind: MessageKind, session_id: u32) -> Self {
        Self {
            version: crate::PROTOCOL_VERSION,
            session_id,
            sequence: 0,
            channel: 0,
            end_flag: 0,
            kind,
            payload_len: 0,
        }
    }

    /// Appends the encoded header to `buf`.
    pub fn encode_into(&self, buf: &mut BytesMut) {
        buf.reserve(FRAME_HEADER_SIZE);
        buf.put_u8(MARKER);
        buf.put_u8(self.version);
        buf.put_u16_le(0);
        buf.put_u32_le(self.session_id);
        buf.put_i32_le(self.sequence);
        buf.put_u8(self.channel);
        buf.put_u8(self.end_flag);
        buf.put_u16_le(self.kind.code());
        buf.put_u32_le(self.payload_len);
    }

    /// Encodes the header into a fixed-size array.
    pub fn encode(&self) -> [u8; FRAME_HEADER_SIZE] {
        let mut buf = BytesMut::with_capacity(FRAME_HEADER_SIZE);
        self.encode_into(&mut buf);
        let mut out = [0u8; FRAME_HEADER_SIZE];
        out.copy_from_slice(&buf);
        out
    }

    /// Decodes a header from the first [`FRAME_HEADER_SIZE`] bytes of `buf`.
    pub fn decode(buf: &[u8]) -> Result<Self, ProtocolError> {
        if buf.len() < FRAME_HEADER_SIZE {
            return Err(ProtocolError::MalformedHeader(format!(
                "need {} bytes, got {}",
                FRAME_HEADER_SIZE,
                buf.len()
            )));
        }

        let mut cur = &buf[..FRAME_HEADER_SIZE];
        let marker = cur.get_u8();
        if marker != MARKER {
            return Err(ProtocolError::MalformedHeader(format!(
                "invalid marker byte {:#04x}",
                marker
            )));
        }

        let version = cur.get_u8();
        cur.advance(2);
        let session_id = cur.get_u32_le();
        let sequence = cur.get_i32_le();
        let channel = cur.get_u8();
        let end_flag = cur.get_u8();
        let kind = MessageKind(cur.get_u16_le());
        let payload_len = cur.get_u32_le();

        Ok(Self {
            version,
            session_id,
            sequence,
            channel,
            end_flag,
            kind,
            payload_len,
        })
    }
}

/// A complete frame: header plus payload.
#[derive(Debug, Clone)]
pub struct Frame {
    pub header: FrameHeader,
    pub payload: Bytes,
}

impl Frame {
    /// Creates a frame, setting the header's payload length from `payload`.
    pub fn new(mut header: FrameHeader, payload: Bytes) -> Result<Self, ProtocolError> {
        header.payload_len = u32::try_from(payload.len()).map_err(|_| {
            ProtocolError::FrameTooLarge {
                size: payload.len(),
            }
        })?;
        Ok(Self { header, payload })
    }

    /// Encodes the frame into bytes.
    pub fn encode(&self) -> BytesMut {
        let mut buf = BytesMut::with_capacity(FRAME_HEADER_SIZE + self.payload.len());
        self.header.encode_into(&mut buf);
        buf.put_slice(&self.payload);
        buf
    }

    /// Decodes a frame from an accumulating buffer.
    ///
    /// Returns `Ok(Some(frame))` if a complete frame was decoded,
    /// `Ok(None)` if more data is needed, or `Err` on a malformed header.
    pub fn decode(buf: &mut BytesMut) -> Result<Option<Self>, ProtocolError> {
        if buf.len() < FRAME_HEADER_SIZE {
            return Ok(None);
        }

        let header = FrameHeader::decode(&buf[..FRAME_HEADER_SIZE])?;
        let total_len = FRAME_HEADER_SIZE + header.payload_len as usize;
        if buf.len() < total_len {
            return Ok(None);
        }

        buf.advance(FRAME_HEADER_SIZE);
        let payload = buf.split_to(header.payload_len as usize).freeze();

        Ok(Some(Self { header, payload }))
    }
}
