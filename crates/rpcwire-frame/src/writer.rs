use std::io::{ErrorKind, Write};

use bytes::BytesMut;

use crate::codec::{encode_frame, FrameConfig};
use crate::error::{FrameError, Result};

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;

/// Writes frames and raw bodies to any `Write` stream.
///
/// Pieces are queued into an internal buffer and reach the stream only on
/// [`flush`](Self::flush), so a header frame and its body queued back to back
/// go out as one contiguous run of bytes.
pub struct FrameWriter<T> {
    inner: T,
    buf: BytesMut,
    config: FrameConfig,
}

impl<T: Write> FrameWriter<T> {
    /// Create a new frame writer with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new frame writer with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
        }
    }

    /// Queue a length-prefixed frame.
    pub fn queue_frame(&mut self, payload: &[u8]) {
        encode_frame(payload, &mut self.buf);
    }

    /// Queue raw bytes with no length prefix.
    pub fn queue_raw(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Encode and send one frame (blocking).
    pub fn send(&mut self, payload: &[u8]) -> Result<()> {
        if payload.len() > self.config.max_frame_size {
            return Err(FrameError::PayloadTooLarge {
                size: payload.len() as u64,
                max: self.config.max_frame_size as u64,
            });
        }

        self.queue_frame(payload);
        self.flush()
    }

    /// Number of queued bytes not yet written.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }

    /// Drop queued bytes without writing them.
    pub fn discard(&mut self) {
        self.buf.clear();
    }

    /// Write all queued bytes and flush the underlying stream.
    ///
    /// The queue is cleared whether or not the write succeeds, so a failed
    /// message never leaks into the next one.
    pub fn flush(&mut self) -> Result<()> {
        let result = self.write_queued();
        self.buf.clear();
        result?;

        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
    }

    fn write_queued(&mut self) -> Result<()> {
        let mut offset = 0usize;
        while offset < self.buf.len() {
            match self.inner.write(&self.buf[offset..]) {
                Ok(0) => return Err(FrameError::ConnectionClosed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
        Ok(())
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner stream.
    ///
    /// Queued bytes that were never flushed are dropped.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Update maximum frame size for subsequent `send` calls.
    pub fn set_max_frame_size(&mut self, max_frame_size: usize) {
        self.config.max_frame_size = max_frame_size;
    }

    /// Current frame writer configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}
