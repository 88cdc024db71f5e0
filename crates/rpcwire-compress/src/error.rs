use std::io;

use rpcwire_header::CompressType;

/// Errors raised while compressing or decompressing a body.
#[derive(Debug, thiserror::Error)]
pub enum CompressError {
    /// No compressor registered for the requested type.
    #[error("compressor not found: {0}")]
    NotFound(CompressType),

    /// The compressor failed to encode the body.
    #[error("{kind} compression failed: {source}")]
    Compress {
        kind: CompressType,
        #[source]
        source: io::Error,
    },

    /// The body is not valid for the declared compression type.
    #[error("{kind} decompression failed: {source}")]
    Decompress {
        kind: CompressType,
        #[source]
        source: io::Error,
    },

    /// The decompressed body exceeds the configured limit.
    #[error("decompressed {kind} body exceeds {max} bytes")]
    TooLarge { kind: CompressType, max: usize },
}

pub type Result<T> = std::result::Result<T, CompressError>;
