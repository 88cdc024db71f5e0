use std::io::{Read, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::Duration;

use tracing::debug;

use crate::error::{Result, TransportError};

/// A connected duplex byte stream.
///
/// The codec clones the connection once for its read half and once for its
/// write half, and keeps the original to close the stream. Closing one clone
/// must unblock I/O pending on the others.
pub trait Connection: Read + Write + Send + 'static {
    /// Create an independently owned handle to the same stream.
    fn try_clone(&self) -> std::io::Result<Self>
    where
        Self: Sized;

    /// Shut the stream down in both directions.
    fn shutdown(&self) -> std::io::Result<()>;

    /// Set read timeout on the underlying stream.
    fn set_read_timeout(&self, _timeout: Option<Duration>) -> std::io::Result<()> {
        Ok(())
    }

    /// Set write timeout on the underlying stream.
    fn set_write_timeout(&self, _timeout: Option<Duration>) -> std::io::Result<()> {
        Ok(())
    }
}

impl Connection for TcpStream {
    fn try_clone(&self) -> std::io::Result<Self> {
        TcpStream::try_clone(self)
    }

    fn shutdown(&self) -> std::io::Result<()> {
        TcpStream::shutdown(self, Shutdown::Both)
    }

    fn set_read_timeout(&self, timeout: Option<Duration>) -> std::io::Result<()> {
        TcpStream::set_read_timeout(self, timeout)
    }

    fn set_write_timeout(&self, timeout: Option<Duration>) -> std::io::Result<()> {
        TcpStream::set_write_timeout(self, timeout)
    }
}

#[cfg(unix)]
impl Connection for std::os::unix::net::UnixStream {
    fn try_clone(&self) -> std::io::Result<Self> {
        std::os::unix::net::UnixStream::try_clone(self)
    }

    fn shutdown(&self) -> std::io::Result<()> {
        std::os::unix::net::UnixStream::shutdown(self, Shutdown::Both)
    }

    fn set_read_timeout(&self, timeout: Option<Duration>) -> std::io::Result<()> {
        std::os::unix::net::UnixStream::set_read_timeout(self, timeout)
    }

    fn set_write_timeout(&self, timeout: Option<Duration>) -> std::io::Result<()> {
        std::os::unix::net::UnixStream::set_write_timeout(self, timeout)
    }
}

/// A connected RPC stream over TCP or a Unix domain socket.
pub struct RpcStream {
    inner: RpcStreamInner,
}

enum RpcStreamInner {
    Tcp(TcpStream),
    #[cfg(unix)]
    Unix(std::os::unix::net::UnixStream),
}

impl Read for RpcStream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match &mut self.inner {
            RpcStreamInner::Tcp(stream) => stream.read(buf),
            #[cfg(unix)]
            RpcStreamInner::Unix(stream) => stream.read(buf),
        }
    }
}

impl Write for RpcStream {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match &mut self.inner {
            RpcStreamInner::Tcp(stream) => stream.write(buf),
            #[cfg(unix)]
            RpcStreamInner::Unix(stream) => stream.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match &mut self.inner {
            RpcStreamInner::Tcp(stream) => stream.flush(),
            #[cfg(unix)]
            RpcStreamInner::Unix(stream) => stream.flush(),
        }
    }
}

impl Connection for RpcStream {
    fn try_clone(&self) -> std::io::Result<Self> {
        let inner = match &self.inner {
            RpcStreamInner::Tcp(stream) => RpcStreamInner::Tcp(stream.try_clone()?),
            #[cfg(unix)]
            RpcStreamInner::Unix(stream) => RpcStreamInner::Unix(stream.try_clone()?),
        };
        Ok(Self { inner })
    }

    fn shutdown(&self) -> std::io::Result<()> {
        match &self.inner {
            RpcStreamInner::Tcp(stream) => Connection::shutdown(stream),
            #[cfg(unix)]
            RpcStreamInner::Unix(stream) => Connection::shutdown(stream),
        }
    }

    fn set_read_timeout(&self, timeout: Option<Duration>) -> std::io::Result<()> {
        match &self.inner {
            RpcStreamInner::Tcp(stream) => stream.set_read_timeout(timeout),
            #[cfg(unix)]
            RpcStreamInner::Unix(stream) => stream.set_read_timeout(timeout),
        }
    }

    fn set_write_timeout(&self, timeout: Option<Duration>) -> std::io::Result<()> {
        match &self.inner {
            RpcStreamInner::Tcp(stream) => stream.set_write_timeout(timeout),
            #[cfg(unix)]
            RpcStreamInner::Unix(stream) => stream.set_write_timeout(timeout),
        }
    }
}

impl From<TcpStream> for RpcStream {
    fn from(stream: TcpStream) -> Self {
        Self {
            inner: RpcStreamInner::Tcp(stream),
        }
    }
}

#[cfg(unix)]
impl From<std::os::unix::net::UnixStream> for RpcStream {
    fn from(stream: std::os::unix::net::UnixStream) -> Self {
        Self {
            inner: RpcStreamInner::Unix(stream),
        }
    }
}

impl std::fmt::Debug for RpcStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.inner {
            RpcStreamInner::Tcp(_) => f.debug_struct("RpcStream").field("type", &"tcp").finish(),
            #[cfg(unix)]
            RpcStreamInner::Unix(_) => f.debug_struct("RpcStream").field("type", &"unix").finish(),
        }
    }
}

/// Connect to a TCP endpoint (blocking).
pub fn connect_tcp(addr: impl ToSocketAddrs + std::fmt::Display) -> Result<RpcStream> {
    let label = addr.to_string();
    let stream = TcpStream::connect(&addr).map_err(|e| TransportError::Connect {
        addr: label.clone(),
        source: e,
    })?;
    stream.set_nodelay(true)?;
    debug!(addr = %label, "connected over tcp");
    Ok(stream.into())
}

/// Connect to a listening Unix domain socket (blocking).
#[cfg(unix)]
pub fn connect_unix(path: impl AsRef<std::path::Path>) -> Result<RpcStream> {
    let path = path.as_ref();
    let stream =
        std::os::unix::net::UnixStream::connect(path).map_err(|e| TransportError::Connect {
            addr: path.display().to_string(),
            source: e,
        })?;
    debug!(?path, "connected to unix domain socket");
    Ok(stream.into())
}
