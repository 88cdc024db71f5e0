use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use rpcwire_header::CompressType;

use crate::compressor::{Compressor, RawCompressor};
use crate::config::CompressConfig;
use crate::error::{CompressError, Result};

/// Compression-type-keyed registry of compressors.
///
/// Built once and shared read-only (usually behind an `Arc`) by every codec
/// that uses it.
pub struct CompressorRegistry {
    compressors: HashMap<CompressType, Arc<dyn Compressor>>,
    config: CompressConfig,
}

impl CompressorRegistry {
    /// Create an empty registry with default config.
    pub fn new() -> Self {
        Self::with_config(CompressConfig::default())
    }

    /// Create an empty registry with explicit config.
    pub fn with_config(config: CompressConfig) -> Self {
        Self {
            compressors: HashMap::new(),
            config,
        }
    }

    /// Registry holding `Raw` and every compiled-in algorithm.
    pub fn with_defaults() -> Self {
        Self::with_defaults_config(CompressConfig::default())
    }

    /// Like [`with_defaults`](Self::with_defaults) with explicit config.
    pub fn with_defaults_config(config: CompressConfig) -> Self {
        let mut registry = Self::with_config(config);
        registry.register_defaults();
        registry
    }

    /// Register `Raw` and every compiled-in algorithm, replacing existing entries.
    pub fn register_defaults(&mut self) {
        #[cfg(any(feature = "gzip", feature = "zlib", feature = "snappy"))]
        let max = self.config.max_decompressed_size;

        self.register(CompressType::Raw, Arc::new(RawCompressor));
        #[cfg(feature = "gzip")]
        self.register(
            CompressType::Gzip,
            Arc::new(crate::flate::GzipCompressor::new(max)),
        );
        #[cfg(feature = "snappy")]
        self.register(
            CompressType::Snappy,
            Arc::new(crate::snappy::SnappyCompressor::new(max)),
        );
        #[cfg(feature = "zlib")]
        self.register(
            CompressType::Zlib,
            Arc::new(crate::flate::ZlibCompressor::new(max)),
        );
    }

    /// Register a compressor, returning the one it replaces.
    pub fn register(
        &mut self,
        kind: CompressType,
        compressor: Arc<dyn Compressor>,
    ) -> Option<Arc<dyn Compressor>> {
        self.compressors.insert(kind, compressor)
    }

    /// Remove the compressor for `kind`.
    pub fn remove(&mut self, kind: CompressType) -> Option<Arc<dyn Compressor>> {
        self.compressors.remove(&kind)
    }

    /// Check if `kind` has a registered compressor.
    pub fn contains(&self, kind: CompressType) -> bool {
        self.compressors.contains_key(&kind)
    }

    /// Registered types in wire-value order.
    pub fn types(&self) -> Vec<CompressType> {
        let mut types: Vec<CompressType> = self.compressors.keys().copied().collect();
        types.sort_unstable_by_key(|kind| kind.as_u16());
        types
    }

    /// Look up the compressor for `kind`.
    pub fn get(&self, kind: CompressType) -> Result<&dyn Compressor> {
        self.compressors
            .get(&kind)
            .map(|compressor| compressor.as_ref())
            .ok_or(CompressError::NotFound(kind))
    }

    /// Compress `data` with the compressor registered for `kind`.
    pub fn zip(&self, kind: CompressType, data: &[u8]) -> Result<Vec<u8>> {
        let zipped = self.get(kind)?.zip(data)?;
        tracing::trace!(%kind, raw = data.len(), zipped = zipped.len(), "body compressed");
        Ok(zipped)
    }

    /// Decompress `data` with the compressor registered for `kind`.
    ///
    /// The output limit is enforced here as well as inside the built-in
    /// compressors, so custom compressors are bounded too.
    pub fn unzip(&self, kind: CompressType, data: &[u8]) -> Result<Vec<u8>> {
        let unzipped = self.get(kind)?.unzip(data)?;
        let max = self.config.max_decompressed_size;
        if unzipped.len() > max {
            return Err(CompressError::TooLarge { kind, max });
        }
        tracing::trace!(%kind, zipped = data.len(), raw = unzipped.len(), "body decompressed");
        Ok(unzipped)
    }

    /// Get registry configuration.
    pub fn config(&self) -> &CompressConfig {
        &self.config
    }
}

/// The default registry carries every compiled-in algorithm.
impl Default for CompressorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for CompressorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompressorRegistry")
            .field("types", &self.types())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Reversible toy algorithm for exercising custom registration.
    struct XorCompressor(u8);

    impl Compressor for XorCompressor {
        fn zip(&self, data: &[u8]) -> Result<Vec<u8>> {
            Ok(data.iter().map(|b| b ^ self.0).collect())
        }

        fn unzip(&self, data: &[u8]) -> Result<Vec<u8>> {
            self.zip(data)
        }
    }

    /// Expands every byte eightfold on the way out.
    struct InflatingCompressor;

    impl Compressor for InflatingCompressor {
        fn zip(&self, data: &[u8]) -> Result<Vec<u8>> {
            Ok(data.to_vec())
        }

        fn unzip(&self, data: &[u8]) -> Result<Vec<u8>> {
            Ok(data.iter().flat_map(|b| [*b; 8]).collect())
        }
    }

    #[test]
    fn empty_registry_fails_closed() {
        let registry = CompressorRegistry::new();
        assert!(registry.types().is_empty());
        assert!(matches!(
            registry.zip(CompressType::Raw, b"x"),
            Err(CompressError::NotFound(CompressType::Raw))
        ));
    }

    #[test]
    fn defaults_cover_compiled_in_types() {
        let registry = CompressorRegistry::with_defaults();
        assert!(registry.contains(CompressType::Raw));
        assert_eq!(registry.contains(CompressType::Gzip), cfg!(feature = "gzip"));
        assert_eq!(
            registry.contains(CompressType::Snappy),
            cfg!(feature = "snappy")
        );
        assert_eq!(registry.contains(CompressType::Zlib), cfg!(feature = "zlib"));
    }

    #[test]
    fn every_default_type_round_trips() {
        let registry = CompressorRegistry::default();
        let body = br#"{"A":1,"B":2}"#;
        for kind in registry.types() {
            let zipped = registry.zip(kind, body).unwrap();
            assert_eq!(registry.unzip(kind, &zipped).unwrap(), body, "{kind}");
        }
    }

    #[test]
    fn unknown_wire_value_is_not_found() {
        let registry = CompressorRegistry::with_defaults();
        let err = registry.unzip(CompressType::Unknown(9), b"").unwrap_err();
        assert!(matches!(err, CompressError::NotFound(CompressType::Unknown(9))));
        assert_eq!(err.to_string(), "compressor not found: unknown(9)");
    }

    #[test]
    fn custom_compressor_can_claim_unknown_value() {
        let mut registry = CompressorRegistry::new();
        assert!(registry
            .register(CompressType::Unknown(40), Arc::new(XorCompressor(0x5a)))
            .is_none());

        let zipped = registry.zip(CompressType::Unknown(40), b"abc").unwrap();
        assert_ne!(zipped, b"abc");
        assert_eq!(
            registry.unzip(CompressType::Unknown(40), &zipped).unwrap(),
            b"abc"
        );
    }

    #[test]
    fn register_replaces_and_remove_drops() {
        let mut registry = CompressorRegistry::with_defaults();
        assert!(registry
            .register(CompressType::Raw, Arc::new(XorCompressor(1)))
            .is_some());
        assert_eq!(registry.zip(CompressType::Raw, &[0]).unwrap(), vec![1]);

        assert!(registry.remove(CompressType::Raw).is_some());
        assert!(!registry.contains(CompressType::Raw));
        assert!(registry.remove(CompressType::Raw).is_none());
    }

    #[test]
    fn types_are_sorted_by_wire_value() {
        let mut registry = CompressorRegistry::new();
        registry.register(CompressType::Unknown(7), Arc::new(RawCompressor));
        registry.register(CompressType::Zlib, Arc::new(RawCompressor));
        registry.register(CompressType::Raw, Arc::new(RawCompressor));
        assert_eq!(
            registry.types(),
            vec![CompressType::Raw, CompressType::Zlib, CompressType::Unknown(7)]
        );
    }

    #[test]
    fn limit_applies_to_custom_compressors() {
        let mut registry = CompressorRegistry::with_config(CompressConfig {
            max_decompressed_size: 15,
        });
        registry.register(CompressType::Raw, Arc::new(InflatingCompressor));

        assert_eq!(registry.unzip(CompressType::Raw, b"a").unwrap().len(), 8);
        assert!(matches!(
            registry.unzip(CompressType::Raw, b"ab"),
            Err(CompressError::TooLarge { max: 15, .. })
        ));
    }

    #[test]
    fn registry_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CompressorRegistry>();
    }

    #[test]
    fn debug_lists_types() {
        let mut registry = CompressorRegistry::new();
        registry.register(CompressType::Raw, Arc::new(RawCompressor));
        let rendered = format!("{registry:?}");
        assert!(rendered.contains("Raw"));
        assert!(rendered.contains("max_decompressed_size"));
    }
}
