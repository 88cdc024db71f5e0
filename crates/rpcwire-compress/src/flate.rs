use std::io::{self, Write};

use flate2::Compression;
use rpcwire_header::CompressType;

use crate::compressor::{read_bounded, Compressor};
use crate::config::DEFAULT_MAX_DECOMPRESSED_SIZE;
use crate::error::{CompressError, Result};

/// gzip (RFC 1952) body compression.
#[cfg(feature = "gzip")]
#[derive(Debug, Clone, Copy)]
pub struct GzipCompressor {
    level: Compression,
    max_output: usize,
}

#[cfg(feature = "gzip")]
impl GzipCompressor {
    /// Default level, decompressing to at most `max_output` bytes.
    pub fn new(max_output: usize) -> Self {
        Self::with_level(Compression::default().level(), max_output)
    }

    /// Explicit level in `0..=9`; out-of-range levels are clamped.
    pub fn with_level(level: u32, max_output: usize) -> Self {
        Self {
            level: Compression::new(level.min(9)),
            max_output,
        }
    }
}

#[cfg(feature = "gzip")]
impl Default for GzipCompressor {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DECOMPRESSED_SIZE)
    }
}

#[cfg(feature = "gzip")]
impl Compressor for GzipCompressor {
    fn zip(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut encoder = flate2::write::GzEncoder::new(Vec::new(), self.level);
        encoder
            .write_all(data)
            .map_err(|source| compress_failed(CompressType::Gzip, source))?;
        encoder
            .finish()
            .map_err(|source| compress_failed(CompressType::Gzip, source))
    }

    fn unzip(&self, data: &[u8]) -> Result<Vec<u8>> {
        read_bounded(
            flate2::read::GzDecoder::new(data),
            CompressType::Gzip,
            self.max_output,
        )
    }
}

/// zlib (RFC 1950) body compression.
#[cfg(feature = "zlib")]
#[derive(Debug, Clone, Copy)]
pub struct ZlibCompressor {
    level: Compression,
    max_output: usize,
}

#[cfg(feature = "zlib")]
impl ZlibCompressor {
    /// Default level, decompressing to at most `max_output` bytes.
    pub fn new(max_output: usize) -> Self {
        Self::with_level(Compression::default().level(), max_output)
    }

    /// Explicit level in `0..=9`; out-of-range levels are clamped.
    pub fn with_level(level: u32, max_output: usize) -> Self {
        Self {
            level: Compression::new(level.min(9)),
            max_output,
        }
    }
}

#[cfg(feature = "zlib")]
impl Default for ZlibCompressor {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DECOMPRESSED_SIZE)
    }
}

#[cfg(feature = "zlib")]
impl Compressor for ZlibCompressor {
    fn zip(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), self.level);
        encoder
            .write_all(data)
            .map_err(|source| compress_failed(CompressType::Zlib, source))?;
        encoder
            .finish()
            .map_err(|source| compress_failed(CompressType::Zlib, source))
    }

    fn unzip(&self, data: &[u8]) -> Result<Vec<u8>> {
        read_bounded(
            flate2::read::ZlibDecoder::new(data),
            CompressType::Zlib,
            self.max_output,
        )
    }
}

fn compress_failed(kind: CompressType, source: io::Error) -> CompressError {
    CompressError::Compress { kind, source }
}
