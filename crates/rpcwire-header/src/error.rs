/// Errors that can occur while decoding a header.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HeaderError {
    /// The frame carried no header bytes at all.
    #[error("header is empty")]
    Empty,

    /// The header ended in the middle of a field.
    #[error("header truncated while reading {field}")]
    Truncated { field: &'static str },

    /// A varint field does not fit in a `u64`.
    #[error("header field {field} overflows u64")]
    VarintOverflow { field: &'static str },

    /// A length field does not fit in its declared width.
    #[error("header field {field} out of range: {value}")]
    LengthOverflow { field: &'static str, value: u64 },

    /// The method or error string is not valid UTF-8.
    #[error("header field {field} is not valid UTF-8")]
    InvalidUtf8 { field: &'static str },
}

pub type Result<T> = std::result::Result<T, HeaderError>;
