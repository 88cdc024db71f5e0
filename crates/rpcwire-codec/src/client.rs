use std::collections::HashMap;
use std::fmt;
use std::io::{self, Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use rpcwire_frame::{FrameReader, FrameWriter};
use rpcwire_header::{RequestHeaderPool, ResponseHeader};
use rpcwire_transport::Connection;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::config::CodecConfig;
use crate::error::{CodecError, Result};
use crate::message::{body_len, check_header_len, checksum, decode_body, encode_body};

type BoxRead = Box<dyn Read + Send>;
type BoxWrite = Box<dyn Write + Send>;
type Closer = Box<dyn FnOnce() -> io::Result<()> + Send>;

/// Reply metadata produced by [`ClientCodec::read_response_header`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    /// Sequence id echoed by the server.
    pub seq: u64,
    /// Method recorded when the request was written; empty if the id was
    /// not pending.
    pub service_method: String,
    /// Server-side error text; empty on success.
    pub error: String,
}

struct ReadHalf {
    frames: FrameReader<BoxRead>,
    /// Header of the reply whose body has not been consumed yet.
    header: Option<ResponseHeader>,
}

/// Client codec over one duplex connection.
///
/// All methods take `&self`; share the codec behind an `Arc`. Any number of
/// threads may write requests concurrently. Reading is expected to happen
/// on one thread at a time, always a header followed by its body.
pub struct ClientCodec {
    reader: Mutex<ReadHalf>,
    writer: Mutex<FrameWriter<BoxWrite>>,
    closer: Mutex<Option<Closer>>,
    pending: Mutex<HashMap<u64, String>>,
    closed: AtomicBool,
    headers: RequestHeaderPool,
    config: CodecConfig,
}

impl ClientCodec {
    /// Build a codec over a connection, applying the configured socket
    /// timeouts. [`close`](Self::close) shuts the connection down.
    pub fn new<C: Connection>(conn: C, config: CodecConfig) -> Result<Self> {
        conn.set_read_timeout(config.frame.read_timeout)?;
        conn.set_write_timeout(config.frame.write_timeout)?;
        let reader = conn.try_clone()?;
        let writer = conn.try_clone()?;
        Ok(Self::from_parts(
            reader,
            writer,
            move || conn.shutdown(),
            config,
        ))
    }

    /// Build a codec from separate halves.
    ///
    /// `closer` runs at most once, on the first [`close`](Self::close); it
    /// should unblock any read pending on `reader`.
    pub fn from_parts<R, W, F>(reader: R, writer: W, closer: F, config: CodecConfig) -> Self
    where
        R: Read + Send + 'static,
        W: Write + Send + 'static,
        F: FnOnce() -> io::Result<()> + Send + 'static,
    {
        let frames = FrameReader::with_config(Box::new(reader) as BoxRead, config.frame.clone());
        let writer = FrameWriter::with_config(Box::new(writer) as BoxWrite, config.frame.clone());
        Self {
            reader: Mutex::new(ReadHalf {
                frames,
                header: None,
            }),
            writer: Mutex::new(writer),
            closer: Mutex::new(Some(Box::new(closer))),
            pending: Mutex::new(HashMap::new()),
            closed: AtomicBool::new(false),
            headers: RequestHeaderPool::with_capacity(config.header_pool_capacity),
            config,
        }
    }

    /// Write one request: header frame, then the compressed argument.
    ///
    /// `id` is recorded as pending under `method` until its reply header is
    /// read. If the write fails the table is restored to what it held
    /// before, including an entry this id displaced.
    pub fn write_request<T: Serialize + ?Sized>(&self, id: u64, method: &str, arg: &T) -> Result<()> {
        if self.is_closed() {
            return Err(CodecError::Closed);
        }

        let displaced = lock(&self.pending).insert(id, method.to_string());
        if let Some(previous) = &displaced {
            debug!(id, previous = %previous, method, "request id already pending");
        }

        let result = self.send_request(id, method, arg);
        if result.is_err() {
            let mut pending = lock(&self.pending);
            match displaced {
                Some(previous) => pending.insert(id, previous),
                None => pending.remove(&id),
            };
        }
        result
    }

    fn send_request<T: Serialize + ?Sized>(&self, id: u64, method: &str, arg: &T) -> Result<()> {
        let body = encode_body(&self.config, arg)?;

        let encoded = {
            let mut header = self.headers.get();
            header.id = id;
            header.method.push_str(method);
            header.request_len = body_len(&body, &self.config.frame)?;
            header.compress_type = self.config.compress_type;
            header.checksum = checksum(&body);
            header.marshal()
        };
        check_header_len(encoded.len(), &self.config.frame)?;

        let mut writer = lock(&self.writer);
        if self.is_closed() {
            return Err(CodecError::Closed);
        }
        writer.queue_frame(&encoded);
        writer.queue_raw(&body);
        writer.flush()?;
        drop(writer);

        debug!(
            id,
            method,
            len = body.len(),
            compress = %self.config.compress_type,
            "request written"
        );
        Ok(())
    }

    /// Read the next reply header and match it to its pending call.
    ///
    /// A reply whose id is not pending is still returned, with an empty
    /// `service_method`. A previous reply body that was neither read nor
    /// discarded is drained first.
    pub fn read_response_header(&self) -> Result<Response> {
        if self.is_closed() {
            return Err(CodecError::Closed);
        }

        let mut read_half = lock(&self.reader);
        if let Some(unread) = read_half.header.take() {
            if unread.response_len != 0 {
                debug!(id = unread.id, len = unread.response_len, "draining unread response body");
                read_half.frames.skip(unread.response_len as usize)?;
            }
        }
        let frame = read_half.frames.read_frame()?;
        let header = ResponseHeader::decode(&frame.payload)?;

        let service_method = match lock(&self.pending).remove(&header.id) {
            Some(method) => method,
            None => {
                debug!(id = header.id, "response for unknown request id");
                String::new()
            }
        };
        debug!(
            id = header.id,
            method = %service_method,
            len = header.response_len,
            failed = header.is_error(),
            "response header read"
        );

        let response = Response {
            seq: header.id,
            service_method,
            error: header.error.clone(),
        };
        read_half.header = Some(header);
        Ok(response)
    }

    /// Read, verify, decompress and deserialize the current reply body.
    pub fn read_response_body<T: DeserializeOwned>(&self) -> Result<T> {
        let mut read_half = lock(&self.reader);
        let header = read_half.header.take().ok_or(CodecError::NoResponseHeader)?;
        let body = read_half.frames.read_exact(header.response_len as usize)?;
        drop(read_half);

        decode_body(&self.config, header.compress_type, header.checksum, &body)
    }

    /// Skip the current reply body, keeping the stream aligned.
    pub fn discard_response_body(&self) -> Result<()> {
        let mut read_half = lock(&self.reader);
        let header = read_half.header.take().ok_or(CodecError::NoResponseHeader)?;
        if header.response_len != 0 {
            read_half.frames.skip(header.response_len as usize)?;
        }
        Ok(())
    }

    /// Close the connection and forget every pending call.
    ///
    /// Later writes fail with [`CodecError::Closed`]. Calling `close` again
    /// is a no-op.
    pub fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }

        let abandoned = {
            let mut pending = lock(&self.pending);
            let count = pending.len();
            pending.clear();
            count
        };
        debug!(abandoned, "client codec closed");

        match lock(&self.closer).take() {
            Some(close) => Ok(close()?),
            None => Ok(()),
        }
    }

    /// Whether [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Number of calls written but not yet answered.
    pub fn pending_len(&self) -> usize {
        lock(&self.pending).len()
    }

    /// Method recorded for a pending call.
    pub fn pending_method(&self, id: u64) -> Option<String> {
        lock(&self.pending).get(&id).cloned()
    }

    /// Codec configuration.
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }
}

impl fmt::Debug for ClientCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCodec")
            .field("compress_type", &self.config.compress_type)
            .field("serialize_type", &self.config.serialize_type)
            .field("pending", &self.pending_len())
            .field("closed", &self.is_closed())
            .finish()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
