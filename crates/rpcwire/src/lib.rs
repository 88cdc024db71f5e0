//! Client-side RPC wire codec.
//!
//! rpcwire turns typed method calls into a compact wire format and typed
//! replies back out of it: a varint-framed header carrying the sequence id,
//! method or error text, body length, compression type and CRC32, followed
//! by the serialized and compressed body.
//!
//! # Crate Structure
//!
//! - [`transport`]: duplex connections (TCP, Unix domain sockets)
//! - [`frame`]: varint length-prefixed frames and fixed-length body I/O
//! - [`header`]: request/response headers and the request header pool
//! - [`compress`]: compressor registry (raw, gzip, snappy, zlib)
//! - [`serialize`]: serializer registry (JSON, MessagePack, bincode)
//! - [`codec`]: the client codec tying them together

/// Re-export transport types.
pub mod transport {
    pub use rpcwire_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use rpcwire_frame::*;
}

/// Re-export header types.
pub mod header {
    pub use rpcwire_header::*;
}

/// Re-export compression types.
pub mod compress {
    pub use rpcwire_compress::*;
}

/// Re-export serialization types.
pub mod serialize {
    pub use rpcwire_serialize::*;
}

/// Re-export codec types.
pub mod codec {
    pub use rpcwire_codec::*;
}

pub use rpcwire_codec::{ClientCodec, CodecConfig, CodecError, Response};
pub use rpcwire_header::CompressType;
pub use rpcwire_serialize::SerializeType;
