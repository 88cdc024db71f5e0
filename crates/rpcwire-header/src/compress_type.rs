use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Compression applied to a message body, carried as a `u16` in every header.
///
/// Unrecognised wire values are kept as [`CompressType::Unknown`] so that the
/// receiver's compressor registry, not the header decoder, reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "u16", into = "u16")]
pub enum CompressType {
    #[default]
    Raw,
    Gzip,
    Snappy,
    Zlib,
    Unknown(u16),
}

impl CompressType {
    /// The compression types defined by the protocol.
    pub const KNOWN: [CompressType; 4] = [
        CompressType::Raw,
        CompressType::Gzip,
        CompressType::Snappy,
        CompressType::Zlib,
    ];

    /// Wire value.
    pub fn as_u16(self) -> u16 {
        match self {
            CompressType::Raw => 0,
            CompressType::Gzip => 1,
            CompressType::Snappy => 2,
            CompressType::Zlib => 3,
            CompressType::Unknown(value) => value,
        }
    }

    /// Lowercase name, as accepted by `FromStr`.
    pub fn name(self) -> &'static str {
        match self {
            CompressType::Raw => "raw",
            CompressType::Gzip => "gzip",
            CompressType::Snappy => "snappy",
            CompressType::Zlib => "zlib",
            CompressType::Unknown(_) => "unknown",
        }
    }
}

impl From<u16> for CompressType {
    fn from(value: u16) -> Self {
        match value {
            0 => CompressType::Raw,
            1 => CompressType::Gzip,
            2 => CompressType::Snappy,
            3 => CompressType::Zlib,
            other => CompressType::Unknown(other),
        }
    }
}

impl From<CompressType> for u16 {
    fn from(value: CompressType) -> Self {
        value.as_u16()
    }
}

impl fmt::Display for CompressType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompressType::Unknown(value) => write!(f, "unknown({value})"),
            known => f.write_str(known.name()),
        }
    }
}

impl FromStr for CompressType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "raw" | "none" => Ok(CompressType::Raw),
            "gzip" => Ok(CompressType::Gzip),
            "snappy" => Ok(CompressType::Snappy),
            "zlib" => Ok(CompressType::Zlib),
            other => other
                .parse::<u16>()
                .map(CompressType::from)
                .map_err(|_| format!("unknown compression type: {s}")),
        }
    }
}
