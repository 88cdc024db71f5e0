//! Serializers for rpcwire call arguments and replies.
//!
//! The serialization format is not carried on the wire; both ends agree on
//! it out of band and a codec uses one [`SerializeType`] for its lifetime.

pub mod error;
pub mod registry;
pub mod serialize_type;
pub mod serializer;

pub use error::{Result, SerializeError};
pub use registry::SerializerRegistry;
pub use serialize_type::SerializeType;
pub use serializer::{
    BincodeSerializer, JsonSerializer, MsgPackSerializer, Serializer, SerializerExt, Visit,
    VisitSeed,
};
pub use erased_serde;
