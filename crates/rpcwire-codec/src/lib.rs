//! Client side of the rpcwire protocol.
//!
//! [`ClientCodec`] turns typed calls into wire messages and wire messages
//! back into typed replies over one duplex connection:
//!
//! - `write_request` serializes and compresses the argument, checksums the
//!   compressed body, and writes a header frame followed by the raw body;
//! - `read_response_header` reads the next reply header and matches it to
//!   the method name recorded when the request was written;
//! - `read_response_body` / `discard_response_body` consume the reply body
//!   that belongs to that header.
//!
//! Requests may be written from many threads at once. Replies may arrive in
//! any order; they are matched to calls purely by sequence id.

pub mod client;
pub mod config;
pub mod error;
pub mod message;

pub use client::{ClientCodec, Response};
pub use config::CodecConfig;
pub use error::{CodecError, Result};
pub use message::{
    checksum, decode_body, encode_body, encode_request, encode_response, read_request,
    read_response, unpack_body, verify_checksum,
};
