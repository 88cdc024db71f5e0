use std::fmt;
use std::io;

use rpcwire_codec::CodecError;
use rpcwire_compress::CompressError;
use rpcwire_frame::FrameError;
use rpcwire_serialize::SerializeError;
use rpcwire_transport::TransportError;

// Exit codes follow sysexits-style semantics.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::ConnectionRefused
        | io::ErrorKind::ConnectionReset
        | io::ErrorKind::NotFound
        | io::ErrorKind::BrokenPipe => TRANSPORT_ERROR,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn transport_error(context: &str, err: TransportError) -> CliError {
    match err {
        TransportError::Connect { addr, source } => {
            io_error(&format!("{context}: connect to {addr}"), source)
        }
        TransportError::Io(source) => io_error(context, source),
    }
}

pub fn frame_error(context: &str, err: FrameError) -> CliError {
    match err {
        FrameError::Io(source) => io_error(context, source),
        FrameError::ConnectionClosed => CliError::new(TRANSPORT_ERROR, format!("{context}: {err}")),
        FrameError::PayloadTooLarge { .. } | FrameError::VarintOverflow => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
    }
}

pub fn codec_error(context: &str, err: CodecError) -> CliError {
    match err {
        CodecError::Transport(err) => transport_error(context, err),
        CodecError::Frame(err) => frame_error(context, err),
        CodecError::Compress(CompressError::NotFound(_))
        | CodecError::Serialize(SerializeError::NotFound(_)) => {
            CliError::new(USAGE, format!("{context}: {err}"))
        }
        CodecError::Header(_)
        | CodecError::Compress(_)
        | CodecError::Serialize(_)
        | CodecError::ChecksumMismatch { .. } => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
        CodecError::NoResponseHeader | CodecError::Closed => {
            CliError::new(INTERNAL, format!("{context}: {err}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeouts_map_to_124() {
        let err = io_error("read", io::Error::from(io::ErrorKind::WouldBlock));
        assert_eq!(err.code, TIMEOUT);
        assert_eq!(err.to_string(), "read: operation would block");
    }

    #[test]
    fn refused_connect_is_transport_error() {
        let err = transport_error(
            "call failed",
            TransportError::Connect {
                addr: "127.0.0.1:1".to_string(),
                source: io::Error::from(io::ErrorKind::ConnectionRefused),
            },
        );
        assert_eq!(err.code, TRANSPORT_ERROR);
        assert!(err.message.contains("127.0.0.1:1"));
    }

    #[test]
    fn checksum_mismatch_is_data_invalid() {
        let err = codec_error(
            "inspect",
            CodecError::ChecksumMismatch {
                expected: 1,
                actual: 2,
            },
        );
        assert_eq!(err.code, DATA_INVALID);
    }

    #[test]
    fn unknown_compression_is_usage() {
        let err = codec_error(
            "encode",
            CodecError::Compress(CompressError::NotFound(rpcwire_header::CompressType::Unknown(
                9,
            ))),
        );
        assert_eq!(err.code, USAGE);
    }
}
