/// Default upper bound on a decompressed body (256 MiB).
pub const DEFAULT_MAX_DECOMPRESSED_SIZE: usize = 256 * 1024 * 1024;

/// Limits applied by a [`CompressorRegistry`](crate::CompressorRegistry).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressConfig {
    /// Maximum number of bytes a single body may decompress to.
    pub max_decompressed_size: usize,
}

impl Default for CompressConfig {
    fn default() -> Self {
        Self {
            max_decompressed_size: DEFAULT_MAX_DECOMPRESSED_SIZE,
        }
    }
}
