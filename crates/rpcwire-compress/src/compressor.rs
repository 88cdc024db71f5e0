#[cfg(any(feature = "gzip", feature = "zlib", feature = "snappy"))]
use std::io::Read;

#[cfg(any(feature = "gzip", feature = "zlib", feature = "snappy"))]
use rpcwire_header::CompressType;

#[cfg(any(feature = "gzip", feature = "zlib", feature = "snappy"))]
use crate::error::CompressError;
use crate::error::Result;

/// A body compression algorithm.
///
/// Implementations must be stateless or internally synchronized; one
/// instance is shared by every codec holding the registry.
pub trait Compressor: Send + Sync {
    /// Compress a serialized body.
    fn zip(&self, data: &[u8]) -> Result<Vec<u8>>;

    /// Reverse [`zip`](Compressor::zip).
    fn unzip(&self, data: &[u8]) -> Result<Vec<u8>>;
}

/// Identity compressor for [`CompressType::Raw`](rpcwire_header::CompressType::Raw).
#[derive(Debug, Clone, Copy, Default)]
pub struct RawCompressor;

impl Compressor for RawCompressor {
    fn zip(&self, data: &[u8]) -> Result<Vec<u8>> {
        Ok(data.to_vec())
    }

    fn unzip(&self, data: &[u8]) -> Result<Vec<u8>> {
        Ok(data.to_vec())
    }
}

/// Drain `reader`, failing once more than `max` bytes come out.
#[cfg(any(feature = "gzip", feature = "zlib", feature = "snappy"))]
pub(crate) fn read_bounded<R: Read>(reader: R, kind: CompressType, max: usize) -> Result<Vec<u8>> {
    let limit = u64::try_from(max).unwrap_or(u64::MAX).saturating_add(1);
    let mut out = Vec::new();
    reader
        .take(limit)
        .read_to_end(&mut out)
        .map_err(|source| CompressError::Decompress { kind, source })?;

    if out.len() > max {
        return Err(CompressError::TooLarge { kind, max });
    }
    Ok(out)
}
