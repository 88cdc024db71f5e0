use bytes::{Buf, Bytes, BytesMut};

use crate::error::{FrameError, Result};
use crate::varint::{decode_uvarint, put_uvarint, uvarint_len};

/// Default maximum frame payload size: 16 MiB.
pub const DEFAULT_MAX_FRAME: usize = 16 * 1024 * 1024;

/// Default maximum raw body size: 256 MiB.
pub const DEFAULT_MAX_BODY: usize = 256 * 1024 * 1024;

/// A length-prefixed block read off the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// The frame payload, without its length prefix.
    pub payload: Bytes,
}

impl Frame {
    /// Create a new frame.
    pub fn new(payload: impl Into<Bytes>) -> Self {
        Self {
            payload: payload.into(),
        }
    }

    /// The total wire size of this frame (prefix + payload).
    pub fn wire_size(&self) -> usize {
        uvarint_len(self.payload.len() as u64) + self.payload.len()
    }
}

/// Encode a frame into the wire format.
///
/// Wire format:
/// ```text
/// ┌─────────────────────┬──────────────────┐
/// │ Length (uvarint,    │ Payload          │
/// │ 1..=10 bytes)       │ (Length bytes)   │
/// └─────────────────────┴──────────────────┘
/// ```
///
/// An empty payload is a single `0x00` byte.
pub fn encode_frame(payload: &[u8], dst: &mut BytesMut) {
    dst.reserve(uvarint_len(payload.len() as u64) + payload.len());
    put_uvarint(dst, payload.len() as u64);
    dst.extend_from_slice(payload);
}

/// Decode a frame from a buffer.
///
/// Returns `Ok(None)` if the buffer doesn't contain a complete frame yet.
/// On success, consumes the frame bytes from the buffer.
pub fn decode_frame(src: &mut BytesMut, max_payload: usize) -> Result<Option<Frame>> {
    let Some((declared, prefix_len)) = decode_uvarint(&src[..])? else {
        return Ok(None);
    };

    if declared > max_payload as u64 {
        return Err(FrameError::PayloadTooLarge {
            size: declared,
            max: max_payload as u64,
        });
    }

    let payload_len = declared as usize;
    if src.len() < prefix_len + payload_len {
        return Ok(None);
    }

    src.advance(prefix_len);
    let payload = src.split_to(payload_len).freeze();

    Ok(Some(Frame { payload }))
}

/// Configuration for the frame reader and writer.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Maximum frame payload size in bytes. Default: 16 MiB.
    pub max_frame_size: usize,
    /// Maximum raw body size in bytes. Default: 256 MiB.
    pub max_body_size: usize,
    /// Read timeout for blocking operations.
    pub read_timeout: Option<std::time::Duration>,
    /// Write timeout for blocking operations.
    pub write_timeout: Option<std::time::Duration>,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_frame_size: DEFAULT_MAX_FRAME,
            max_body_size: DEFAULT_MAX_BODY,
            read_timeout: None,
            write_timeout: None,
        }
    }
}
