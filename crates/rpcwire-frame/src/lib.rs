//! Varint length-prefixed framing for the rpcwire protocol.
//!
//! Every message on the wire is two consecutive pieces:
//! - a frame: an unsigned LEB128 length followed by that many header bytes
//! - a raw body whose length was declared inside the header
//!
//! [`FrameReader`] and [`FrameWriter`] handle both pieces over one buffered
//! stream, so a body read never loses bytes already pulled in while reading
//! the preceding frame.

pub mod codec;
pub mod error;
pub mod reader;
pub mod varint;
pub mod writer;

pub use codec::{
    decode_frame, encode_frame, Frame, FrameConfig, DEFAULT_MAX_BODY, DEFAULT_MAX_FRAME,
};
pub use error::{FrameError, Result};
pub use reader::FrameReader;
pub use writer::FrameWriter;
