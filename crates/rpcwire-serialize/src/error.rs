use crate::serialize_type::SerializeType;

/// Errors raised while encoding or decoding a call body.
#[derive(Debug, thiserror::Error)]
pub enum SerializeError {
    /// No serializer is registered for the format.
    #[error("serializer not found: {0}")]
    NotFound(SerializeType),

    /// The serializer returned without decoding a value.
    #[error("serializer produced no value")]
    NoValue,

    /// Failure inside a type-erased (de)serialization, e.g. from a custom
    /// serializer.
    #[error("serde: {0}")]
    Erased(#[from] erased_serde::Error),

    /// JSON encode or decode failure.
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    /// MessagePack encode failure.
    #[error("msgpack encode: {0}")]
    MsgPackEncode(#[from] rmp_serde::encode::Error),

    /// MessagePack decode failure.
    #[error("msgpack decode: {0}")]
    MsgPackDecode(#[from] rmp_serde::decode::Error),

    /// bincode encode failure.
    #[error("bincode encode: {0}")]
    BincodeEncode(#[from] bincode::error::EncodeError),

    /// bincode decode failure.
    #[error("bincode decode: {0}")]
    BincodeDecode(#[from] bincode::error::DecodeError),
}

pub type Result<T> = std::result::Result<T, SerializeError>;
