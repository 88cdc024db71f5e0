//! Duplex byte-stream connections for the rpcwire codec.
//!
//! The codec needs an ordered, reliable stream that can be split into an
//! independent read half and write half and closed from either side.
//! [`Connection`] captures exactly that; [`RpcStream`] is the concrete
//! stream type returned by the connect helpers here.
//!
//! Dialing policy (retries, TLS, pooling) belongs to the layer above.

pub mod error;
pub mod traits;

pub use error::{Result, TransportError};
pub use traits::{connect_tcp, Connection, RpcStream};

#[cfg(unix)]
pub use traits::connect_unix;
