//! Request and response headers for the rpcwire protocol.
//!
//! A header travels as the payload of one length-prefixed frame and
//! describes the raw body that follows it:
//!
//! ```text
//! u16 LE   compress type
//! uvarint  string length, then UTF-8 bytes (method or error)
//! uvarint  sequence id
//! uvarint  body length
//! u32 LE   CRC32 (IEEE) of the body, 0 = not checked
//! ```
//!
//! Request headers are short-lived and reused through
//! [`RequestHeaderPool`]; a checked-out header is reset when its guard drops.

pub mod compress_type;
pub mod error;
pub mod pool;
pub mod request;
pub mod response;

mod wire;

pub use compress_type::CompressType;
pub use error::{HeaderError, Result};
pub use pool::{PooledRequestHeader, RequestHeaderPool, DEFAULT_POOL_CAPACITY};
pub use request::RequestHeader;
pub use response::ResponseHeader;
