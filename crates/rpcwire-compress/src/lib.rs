//! Body compressors for the rpcwire protocol.
//!
//! Each [`CompressType`] carried in a header selects a [`Compressor`] from a
//! [`CompressorRegistry`]. Lookups fail closed: an unregistered type is a
//! [`CompressError::NotFound`], never a silent pass-through.
//!
//! Algorithms other than [`CompressType::Raw`] are behind cargo features
//! (`gzip`, `zlib`, `snappy`, all on by default).

pub mod compressor;
pub mod config;
pub mod error;
pub mod registry;

#[cfg(any(feature = "gzip", feature = "zlib"))]
mod flate;
#[cfg(feature = "snappy")]
mod snappy;

pub use compressor::{Compressor, RawCompressor};
pub use config::CompressConfig;
pub use error::{CompressError, Result};
pub use registry::CompressorRegistry;
pub use rpcwire_header::CompressType;

#[cfg(feature = "gzip")]
pub use flate::GzipCompressor;
#[cfg(feature = "zlib")]
pub use flate::ZlibCompressor;
#[cfg(feature = "snappy")]
pub use snappy::SnappyCompressor;
