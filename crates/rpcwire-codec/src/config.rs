use std::sync::Arc;

use rpcwire_compress::CompressorRegistry;
use rpcwire_frame::FrameConfig;
use rpcwire_header::{CompressType, DEFAULT_POOL_CAPACITY};
use rpcwire_serialize::{SerializeType, SerializerRegistry};

/// Per-codec settings.
///
/// Registries are shared, so many codecs can be built from clones of one
/// config without duplicating compressor state.
#[derive(Debug, Clone)]
pub struct CodecConfig {
    /// Compression applied to outgoing request bodies.
    pub compress_type: CompressType,
    /// Serialization format for arguments and replies.
    pub serialize_type: SerializeType,
    /// Frame and body size limits and socket timeouts.
    pub frame: FrameConfig,
    /// Compressors available for requests and replies.
    pub compressors: Arc<CompressorRegistry>,
    /// Serializers for arguments and replies.
    pub serializers: Arc<SerializerRegistry>,
    /// Idle request headers kept for reuse.
    pub header_pool_capacity: usize,
}

impl CodecConfig {
    /// Set the compression applied to request bodies.
    pub fn with_compress_type(mut self, compress_type: CompressType) -> Self {
        self.compress_type = compress_type;
        self
    }

    /// Set the argument and reply serialization format.
    pub fn with_serialize_type(mut self, serialize_type: SerializeType) -> Self {
        self.serialize_type = serialize_type;
        self
    }

    /// Set frame limits and socket timeouts.
    pub fn with_frame_config(mut self, frame: FrameConfig) -> Self {
        self.frame = frame;
        self
    }

    /// Use a shared compressor registry.
    pub fn with_compressors(mut self, compressors: Arc<CompressorRegistry>) -> Self {
        self.compressors = compressors;
        self
    }

    /// Use a shared serializer registry.
    pub fn with_serializers(mut self, serializers: Arc<SerializerRegistry>) -> Self {
        self.serializers = serializers;
        self
    }

    /// Set how many idle request headers the codec keeps for reuse.
    pub fn with_header_pool_capacity(mut self, capacity: usize) -> Self {
        self.header_pool_capacity = capacity;
        self
    }
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            compress_type: CompressType::Raw,
            serialize_type: SerializeType::Json,
            frame: FrameConfig::default(),
            compressors: Arc::new(CompressorRegistry::with_defaults()),
            serializers: Arc::new(SerializerRegistry::with_defaults()),
            header_pool_capacity: DEFAULT_POOL_CAPACITY,
        }
    }
}
