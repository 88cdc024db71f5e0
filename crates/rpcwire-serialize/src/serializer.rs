use serde::de::{DeserializeOwned, DeserializeSeed, Error as _};
use serde::Serialize;

use crate::error::{Result, SerializeError};

/// Callback that pulls one value out of a type-erased deserializer.
///
/// [`SerializerExt::decode`] builds one for the target type; a format
/// implementation hands it a deserializer over the body.
pub type Visit<'a> =
    dyn for<'de> FnMut(&mut dyn erased_serde::Deserializer<'de>) -> erased_serde::Result<()> + 'a;

/// A body serialization format.
///
/// The trait is object safe so a
/// [`SerializerRegistry`](crate::SerializerRegistry) can hold any
/// implementation behind an `Arc`. Values cross it type-erased; use
/// [`SerializerExt`] for typed calls.
pub trait Serializer: Send + Sync {
    /// Encode a value into a body.
    fn marshal(&self, value: &dyn erased_serde::Serialize) -> Result<Vec<u8>>;

    /// Run `visit` against a deserializer over `data`.
    ///
    /// Implementations with a native serde deserializer wrap it in
    /// [`VisitSeed`].
    fn unmarshal(&self, data: &[u8], visit: &mut Visit<'_>) -> Result<()>;
}

/// Typed wrappers over [`Serializer`].
pub trait SerializerExt: Serializer {
    /// Encode `value` into a body.
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>> {
        let value: &dyn erased_serde::Serialize = &value;
        self.marshal(value)
    }

    /// Decode a body into a new `T`.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T> {
        let mut decoded = None;
        self.unmarshal(data, &mut |de: &mut dyn erased_serde::Deserializer<'_>| {
            decoded = Some(erased_serde::deserialize::<T>(de)?);
            Ok(())
        })?;
        decoded.ok_or(SerializeError::NoValue)
    }
}

impl<S: Serializer + ?Sized> SerializerExt for S {}

/// Adapts a [`Visit`] callback into a serde `DeserializeSeed`, so it can be
/// driven by any concrete deserializer.
pub struct VisitSeed<'a, 'v>(pub &'a mut Visit<'v>);

impl<'de> DeserializeSeed<'de> for VisitSeed<'_, '_> {
    type Value = ();

    fn deserialize<D>(self, deserializer: D) -> std::result::Result<(), D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let mut erased = <dyn erased_serde::Deserializer>::erase(deserializer);
        (self.0)(&mut erased).map_err(D::Error::custom)
    }
}

/// JSON via `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer;

impl Serializer for JsonSerializer {
    fn marshal(&self, value: &dyn erased_serde::Serialize) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(value)?)
    }

    fn unmarshal(&self, data: &[u8], visit: &mut Visit<'_>) -> Result<()> {
        let mut de = serde_json::Deserializer::from_slice(data);
        VisitSeed(visit).deserialize(&mut de)?;
        de.end()?;
        Ok(())
    }
}

/// MessagePack via `rmp-serde`, structs encoded as maps keyed by field name.
#[derive(Debug, Clone, Copy, Default)]
pub struct MsgPackSerializer;

impl Serializer for MsgPackSerializer {
    fn marshal(&self, value: &dyn erased_serde::Serialize) -> Result<Vec<u8>> {
        Ok(rmp_serde::to_vec_named(value)?)
    }

    fn unmarshal(&self, data: &[u8], visit: &mut Visit<'_>) -> Result<()> {
        let mut de = rmp_serde::Deserializer::from_read_ref(data);
        VisitSeed(visit).deserialize(&mut de)?;
        Ok(())
    }
}

/// bincode with the standard (little-endian, varint) configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct BincodeSerializer;

impl Serializer for BincodeSerializer {
    fn marshal(&self, value: &dyn erased_serde::Serialize) -> Result<Vec<u8>> {
        Ok(bincode::serde::encode_to_vec(value, bincode::config::standard())?)
    }

    fn unmarshal(&self, data: &[u8], visit: &mut Visit<'_>) -> Result<()> {
        let ((), _read) = bincode::serde::seed_decode_from_slice(
            VisitSeed(visit),
            data,
            bincode::config::standard(),
        )?;
        Ok(())
    }
}
