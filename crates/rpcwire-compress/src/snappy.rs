use std::io::{self, Write};

use rpcwire_header::CompressType;

use crate::compressor::{read_bounded, Compressor};
use crate::config::DEFAULT_MAX_DECOMPRESSED_SIZE;
use crate::error::{CompressError, Result};

/// Snappy in the framing (stream) format.
///
/// Bodies start with the `sNaPpY` stream identifier chunk, matching Go's
/// `snappy.NewBufferedWriter`. Peers that send bare raw blocks are rejected.
#[derive(Debug, Clone, Copy)]
pub struct SnappyCompressor {
    max_output: usize,
}

impl SnappyCompressor {
    /// Decompress to at most `max_output` bytes.
    pub fn new(max_output: usize) -> Self {
        Self { max_output }
    }
}

impl Default for SnappyCompressor {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DECOMPRESSED_SIZE)
    }
}

impl Compressor for SnappyCompressor {
    fn zip(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut encoder = snap::write::FrameEncoder::new(Vec::new());
        encoder.write_all(data).map_err(compress_failed)?;
        encoder
            .into_inner()
            .map_err(|err| compress_failed(err.into_error()))
    }

    fn unzip(&self, data: &[u8]) -> Result<Vec<u8>> {
        read_bounded(
            snap::read::FrameDecoder::new(data),
            CompressType::Snappy,
            self.max_output,
        )
    }
}

fn compress_failed(source: io::Error) -> CompressError {
    CompressError::Compress {
        kind: CompressType::Snappy,
        source,
    }
}
