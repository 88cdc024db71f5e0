//! Message-level helpers shared by the codec, the CLI and test peers.
//!
//! A message is one header frame followed by the raw body it describes.
//! Bodies are serialized, then compressed, then checksummed; decoding runs
//! the same steps in reverse.

use std::io::Read;

use bytes::{BufMut, Bytes, BytesMut};
use rpcwire_frame::varint::MAX_VARINT_LEN;
use rpcwire_frame::{encode_frame, FrameConfig, FrameError, FrameReader};
use rpcwire_header::{CompressType, RequestHeader, ResponseHeader};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::CodecConfig;
use crate::error::{CodecError, Result};

/// CRC32 (IEEE) of a compressed body.
pub fn checksum(body: &[u8]) -> u32 {
    crc32fast::hash(body)
}

/// Check `body` against a header checksum.
///
/// A checksum of 0 means the sender did not compute one and always passes.
/// A body whose real CRC32 happens to be 0 is therefore indistinguishable
/// from an unchecked one.
pub fn verify_checksum(expected: u32, body: &[u8]) -> Result<()> {
    if expected == 0 {
        return Ok(());
    }
    let actual = checksum(body);
    if actual != expected {
        return Err(CodecError::ChecksumMismatch { expected, actual });
    }
    Ok(())
}

/// Serialize and compress `value` as configured.
///
/// The compressor is resolved before anything is serialized, so an
/// unregistered compression type fails without doing any work.
pub fn encode_body<T: Serialize + ?Sized>(config: &CodecConfig, value: &T) -> Result<Vec<u8>> {
    let compressor = config.compressors.get(config.compress_type)?;
    let raw = config.serializers.marshal(config.serialize_type, value)?;
    Ok(compressor.zip(&raw)?)
}

/// Verify and decompress a received body, leaving it serialized.
pub fn unpack_body(
    config: &CodecConfig,
    compress_type: CompressType,
    expected_checksum: u32,
    body: &[u8],
) -> Result<Vec<u8>> {
    verify_checksum(expected_checksum, body)?;
    Ok(config.compressors.unzip(compress_type, body)?)
}

/// Verify, decompress and deserialize a received body.
pub fn decode_body<T: DeserializeOwned>(
    config: &CodecConfig,
    compress_type: CompressType,
    expected_checksum: u32,
    body: &[u8],
) -> Result<T> {
    let raw = unpack_body(config, compress_type, expected_checksum, body)?;
    Ok(config.serializers.unmarshal(config.serialize_type, &raw)?)
}

/// Wire bytes of one complete request message.
pub fn encode_request<T: Serialize + ?Sized>(
    config: &CodecConfig,
    id: u64,
    method: &str,
    arg: &T,
) -> Result<Vec<u8>> {
    let body = encode_body(config, arg)?;
    let header = RequestHeader {
        id,
        method: method.to_string(),
        request_len: body_len(&body, &config.frame)?,
        compress_type: config.compress_type,
        checksum: checksum(&body),
    };
    assemble(&header.marshal(), &body, &config.frame)
}

/// Wire bytes of one complete response message.
///
/// `reply` is `None` for error replies, which carry an empty body.
pub fn encode_response<T: Serialize + ?Sized>(
    config: &CodecConfig,
    id: u64,
    error: &str,
    reply: Option<&T>,
) -> Result<Vec<u8>> {
    let body = match reply {
        Some(reply) => encode_body(config, reply)?,
        None => Vec::new(),
    };
    let header = ResponseHeader {
        id,
        error: error.to_string(),
        response_len: body_len(&body, &config.frame)?,
        compress_type: config.compress_type,
        checksum: checksum(&body),
    };
    assemble(&header.marshal(), &body, &config.frame)
}

/// Read one request message: its header and its still-compressed body.
pub fn read_request<R: Read>(frames: &mut FrameReader<R>) -> Result<(RequestHeader, Bytes)> {
    let frame = frames.read_frame()?;
    let header = RequestHeader::decode(&frame.payload)?;
    let body = frames.read_exact(header.request_len as usize)?;
    Ok((header, body))
}

/// Read one response message: its header and its still-compressed body.
pub fn read_response<R: Read>(frames: &mut FrameReader<R>) -> Result<(ResponseHeader, Bytes)> {
    let frame = frames.read_frame()?;
    let header = ResponseHeader::decode(&frame.payload)?;
    let body = frames.read_exact(header.response_len as usize)?;
    Ok((header, body))
}

/// Body length as carried in a header, bounded by the configured maximum.
pub(crate) fn body_len(body: &[u8], frame: &FrameConfig) -> Result<u32> {
    let max = u32::try_from(frame.max_body_size).unwrap_or(u32::MAX);
    u32::try_from(body.len())
        .ok()
        .filter(|len| *len <= max)
        .ok_or_else(|| {
            FrameError::PayloadTooLarge {
                size: body.len() as u64,
                max: u64::from(max),
            }
            .into()
        })
}

pub(crate) fn check_header_len(len: usize, frame: &FrameConfig) -> Result<()> {
    if len > frame.max_frame_size {
        return Err(FrameError::PayloadTooLarge {
            size: len as u64,
            max: frame.max_frame_size as u64,
        }
        .into());
    }
    Ok(())
}

fn assemble(header: &[u8], body: &[u8], frame: &FrameConfig) -> Result<Vec<u8>> {
    check_header_len(header.len(), frame)?;
    let mut wire = BytesMut::with_capacity(MAX_VARINT_LEN + header.len() + body.len());
    encode_frame(header, &mut wire);
    wire.put_slice(body);
    Ok(wire.to_vec())
}
