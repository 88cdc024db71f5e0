/// Errors returned by the client codec.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Transport-level error.
    #[error("transport error: {0}")]
    Transport(#[from] rpcwire_transport::TransportError),

    /// Frame-level error.
    #[error("frame error: {0}")]
    Frame(#[from] rpcwire_frame::FrameError),

    /// Malformed message header.
    #[error("header error: {0}")]
    Header(#[from] rpcwire_header::HeaderError),

    /// Compression lookup or (de)compression failure.
    #[error("compression error: {0}")]
    Compress(#[from] rpcwire_compress::CompressError),

    /// Serialization lookup or encode/decode failure.
    #[error("serialization error: {0}")]
    Serialize(#[from] rpcwire_serialize::SerializeError),

    /// The body's CRC32 does not match the header.
    #[error("unexpected checksum: header {expected:#010x}, body {actual:#010x}")]
    ChecksumMismatch { expected: u32, actual: u32 },

    /// A body read was attempted without a preceding header read.
    #[error("no response header read for this body")]
    NoResponseHeader,

    /// The codec has been closed.
    #[error("codec is closed")]
    Closed,
}

impl From<std::io::Error> for CodecError {
    fn from(err: std::io::Error) -> Self {
        CodecError::Transport(rpcwire_transport::TransportError::Io(err))
    }
}

pub type Result<T> = std::result::Result<T, CodecError>;
