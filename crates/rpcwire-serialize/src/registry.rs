use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Result, SerializeError};
use crate::serialize_type::SerializeType;
use crate::serializer::{
    BincodeSerializer, JsonSerializer, MsgPackSerializer, Serializer, SerializerExt,
};

/// Format-keyed registry of serializers.
///
/// Built once and shared read-only (usually behind an `Arc`) by every codec
/// that uses it. Any [`Serializer`] can be registered, replacing the
/// built-in implementation for its format.
pub struct SerializerRegistry {
    serializers: HashMap<SerializeType, Arc<dyn Serializer>>,
}

impl SerializerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            serializers: HashMap::new(),
        }
    }

    /// Registry holding the built-in JSON, MessagePack and bincode formats.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(SerializeType::Json, Arc::new(JsonSerializer));
        registry.register(SerializeType::MsgPack, Arc::new(MsgPackSerializer));
        registry.register(SerializeType::Bincode, Arc::new(BincodeSerializer));
        registry
    }

    /// Register a serializer, returning the one it replaces.
    pub fn register(
        &mut self,
        kind: SerializeType,
        serializer: Arc<dyn Serializer>,
    ) -> Option<Arc<dyn Serializer>> {
        self.serializers.insert(kind, serializer)
    }

    /// Remove the serializer for `kind`.
    pub fn remove(&mut self, kind: SerializeType) -> Option<Arc<dyn Serializer>> {
        self.serializers.remove(&kind)
    }

    /// Check if `kind` has a registered serializer.
    pub fn contains(&self, kind: SerializeType) -> bool {
        self.serializers.contains_key(&kind)
    }

    /// Registered formats, sorted.
    pub fn types(&self) -> Vec<SerializeType> {
        let mut types: Vec<SerializeType> = self.serializers.keys().copied().collect();
        types.sort_unstable();
        types
    }

    /// Look up the serializer for `kind`.
    pub fn get(&self, kind: SerializeType) -> Result<&dyn Serializer> {
        self.serializers
            .get(&kind)
            .map(|serializer| serializer.as_ref())
            .ok_or(SerializeError::NotFound(kind))
    }

    /// Encode `value` with the serializer registered for `kind`.
    pub fn marshal<T: Serialize + ?Sized>(&self, kind: SerializeType, value: &T) -> Result<Vec<u8>> {
        let body = self.get(kind)?.encode(value)?;
        tracing::trace!(%kind, len = body.len(), "body serialized");
        Ok(body)
    }

    /// Decode `data` with the serializer registered for `kind`.
    pub fn unmarshal<T: DeserializeOwned>(&self, kind: SerializeType, data: &[u8]) -> Result<T> {
        self.get(kind)?.decode(data)
    }
}

/// The default registry carries every built-in format.
impl Default for SerializerRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for SerializerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerializerRegistry")
            .field("types", &self.types())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde::Deserialize;

    use super::*;
    use crate::serializer::Visit;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Reply {
        #[serde(rename = "C")]
        c: i64,
        note: Option<String>,
        tags: BTreeMap<String, u16>,
    }

    fn reply() -> Reply {
        Reply {
            c: -3,
            note: Some("sum".to_string()),
            tags: BTreeMap::from([("x".to_string(), 7)]),
        }
    }

    /// JSON with a marker prefix, counting calls.
    #[derive(Default)]
    struct TaggedJson {
        calls: AtomicUsize,
    }

    impl Serializer for TaggedJson {
        fn marshal(&self, value: &dyn erased_serde::Serialize) -> Result<Vec<u8>> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            let mut body = b"T:".to_vec();
            body.extend(JsonSerializer.marshal(value)?);
            Ok(body)
        }

        fn unmarshal(&self, data: &[u8], visit: &mut Visit<'_>) -> Result<()> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            let json = data
                .strip_prefix(b"T:")
                .ok_or_else(|| <erased_serde::Error as serde::de::Error>::custom("missing tag"))?;
            JsonSerializer.unmarshal(json, visit)
        }
    }

    #[test]
    fn every_default_format_round_trips() {
        let registry = SerializerRegistry::default();
        assert_eq!(registry.types(), SerializeType::ALL.to_vec());
        for kind in registry.types() {
            let body = registry.marshal(kind, &reply()).unwrap();
            let back: Reply = registry.unmarshal(kind, &body).unwrap();
            assert_eq!(back, reply(), "{kind}");
        }
    }

    #[test]
    fn empty_registry_fails_closed() {
        let registry = SerializerRegistry::new();
        assert!(matches!(
            registry.marshal(SerializeType::Json, &1u8),
            Err(SerializeError::NotFound(SerializeType::Json))
        ));
        assert!(matches!(
            registry.unmarshal::<u8>(SerializeType::Bincode, &[1]),
            Err(SerializeError::NotFound(SerializeType::Bincode))
        ));
    }

    #[test]
    fn custom_serializer_replaces_builtin() {
        let tagged = Arc::new(TaggedJson::default());
        let mut registry = SerializerRegistry::with_defaults();
        let previous = registry.register(SerializeType::Json, tagged.clone());
        assert!(previous.is_some());

        let body = registry.marshal(SerializeType::Json, &reply()).unwrap();
        assert!(body.starts_with(b"T:{"));
        let back: Reply = registry.unmarshal(SerializeType::Json, &body).unwrap();
        assert_eq!(back, reply());
        assert_eq!(tagged.calls.load(Ordering::Relaxed), 2);

        assert!(matches!(
            registry.unmarshal::<Reply>(SerializeType::Json, br#"{"C":1}"#),
            Err(SerializeError::Erased(_))
        ));
    }

    #[test]
    fn register_and_remove_manage_entries() {
        let mut registry = SerializerRegistry::new();
        assert!(registry
            .register(SerializeType::MsgPack, Arc::new(MsgPackSerializer))
            .is_none());
        assert_eq!(registry.types(), vec![SerializeType::MsgPack]);

        assert!(registry.remove(SerializeType::MsgPack).is_some());
        assert!(registry.remove(SerializeType::MsgPack).is_none());
        assert!(!registry.contains(SerializeType::MsgPack));
    }

    #[test]
    fn not_found_message_names_format() {
        let err = SerializerRegistry::new()
            .marshal(SerializeType::MsgPack, &())
            .unwrap_err();
        assert_eq!(err.to_string(), "serializer not found: msgpack");
    }
}
