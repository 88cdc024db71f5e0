use std::io::{ErrorKind, Read};

use bytes::{Buf, Bytes, BytesMut};
use tracing::trace;

use crate::codec::{decode_frame, Frame, FrameConfig};
use crate::error::{FrameError, Result};

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;
const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Reads frames and raw bodies from any `Read` stream.
///
/// Handles partial reads internally; callers always get complete frames and
/// complete bodies. Bytes read past the end of one piece stay buffered for
/// the next call.
pub struct FrameReader<T> {
    inner: T,
    buf: BytesMut,
    config: FrameConfig,
}

impl<T: Read> FrameReader<T> {
    /// Create a new frame reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new frame reader with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
        }
    }

    /// Read the next complete frame (blocking).
    ///
    /// Returns `Err(FrameError::ConnectionClosed)` when EOF is reached.
    pub fn read_frame(&mut self) -> Result<Frame> {
        loop {
            if let Some(frame) = decode_frame(&mut self.buf, self.config.max_frame_size)? {
                trace!(len = frame.payload.len(), "frame decoded");
                return Ok(frame);
            }
            self.fill()?;
        }
    }

    /// Read exactly `len` raw bytes (blocking).
    ///
    /// Used for message bodies, whose length is declared by the preceding
    /// header rather than by a prefix of their own.
    pub fn read_exact(&mut self, len: usize) -> Result<Bytes> {
        if len > self.config.max_body_size {
            return Err(FrameError::PayloadTooLarge {
                size: len as u64,
                max: self.config.max_body_size as u64,
            });
        }

        self.buf.reserve(len.saturating_sub(self.buf.len()));
        while self.buf.len() < len {
            self.fill()?;
        }
        Ok(self.buf.split_to(len).freeze())
    }

    /// Consume and discard exactly `len` raw bytes (blocking).
    pub fn skip(&mut self, len: usize) -> Result<()> {
        trace!(len, "draining raw body");
        let mut remaining = len;
        loop {
            let take = remaining.min(self.buf.len());
            self.buf.advance(take);
            remaining -= take;
            if remaining == 0 {
                return Ok(());
            }
            self.fill()?;
        }
    }

    /// Number of bytes read from the stream but not yet consumed.
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    fn fill(&mut self) -> Result<()> {
        let mut chunk = [0u8; READ_CHUNK_SIZE];
        loop {
            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            };

            if read == 0 {
                return Err(FrameError::ConnectionClosed);
            }

            self.buf.extend_from_slice(&chunk[..read]);
            return Ok(());
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Update maximum frame size for subsequent frame decoding.
    pub fn set_max_frame_size(&mut self, max_frame_size: usize) {
        self.config.max_frame_size = max_frame_size;
    }

    /// Current frame reader configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::{Arc, Mutex};

    use bytes::{BufMut, BytesMut};

    use super::*;
    use crate::codec::encode_frame;
    use crate::varint::put_uvarint;

    fn wire_with(frames: &[&str]) -> Vec<u8> {
        let mut wire = BytesMut::new();
        for payload in frames {
            encode_frame(payload.as_bytes(), &mut wire);
        }
        wire.to_vec()
    }

    #[test]
    fn read_single_frame() {
        let mut reader = FrameReader::new(Cursor::new(wire_with(&["hello"])));
        let frame = reader.read_frame().unwrap();

        assert_eq!(frame.payload.as_ref(), b"hello");
    }

    #[test]
    fn read_multiple_frames() {
        let wire = wire_with(&["one", "two", "three"]);
        let mut reader = FrameReader::new(Cursor::new(wire));

        assert_eq!(reader.read_frame().unwrap().payload.as_ref(), b"one");
        assert_eq!(reader.read_frame().unwrap().payload.as_ref(), b"two");
        assert_eq!(reader.read_frame().unwrap().payload.as_ref(), b"three");
    }

    #[test]
    fn read_frame_with_large_payload() {
        let payload = vec![0xAB; 64 * 1024];
        let mut wire = BytesMut::new();
        encode_frame(&payload, &mut wire);
        let mut reader = FrameReader::new(Cursor::new(wire.to_vec()));
        let frame = reader.read_frame().unwrap();

        assert_eq!(frame.payload.as_ref(), payload.as_slice());
    }

    #[test]
    fn frame_then_raw_body_then_frame() {
        let mut wire = BytesMut::new();
        encode_frame(b"header-1", &mut wire);
        wire.put_slice(b"body-one");
        encode_frame(b"header-2", &mut wire);
        wire.put_slice(b"b2");

        let mut reader = FrameReader::new(Cursor::new(wire.to_vec()));
        assert_eq!(reader.read_frame().unwrap().payload.as_ref(), b"header-1");
        assert_eq!(reader.read_exact(8).unwrap().as_ref(), b"body-one");
        assert_eq!(reader.read_frame().unwrap().payload.as_ref(), b"header-2");
        assert_eq!(reader.read_exact(2).unwrap().as_ref(), b"b2");
        assert_eq!(reader.buffered(), 0);
    }

    #[test]
    fn skip_keeps_stream_aligned() {
        let mut wire = BytesMut::new();
        encode_frame(b"h1", &mut wire);
        wire.put_slice(&[0x5A; 20_000]);
        encode_frame(b"h2", &mut wire);

        let mut reader = FrameReader::new(ByteByByteReader {
            bytes: wire.to_vec(),
            pos: 0,
        });
        assert_eq!(reader.read_frame().unwrap().payload.as_ref(), b"h1");
        reader.skip(20_000).unwrap();
        assert_eq!(reader.read_frame().unwrap().payload.as_ref(), b"h2");
    }

    #[test]
    fn skip_zero_is_noop() {
        let mut reader = FrameReader::new(Cursor::new(wire_with(&["x"])));
        reader.skip(0).unwrap();
        assert_eq!(reader.read_frame().unwrap().payload.as_ref(), b"x");
    }

    #[test]
    fn read_exact_short_stream_is_connection_closed() {
        let mut reader = FrameReader::new(Cursor::new(b"abc".to_vec()));
        let err = reader.read_exact(10).unwrap_err();
        assert!(matches!(err, FrameError::ConnectionClosed));
    }

    #[test]
    fn read_exact_rejects_body_over_limit() {
        let cfg = FrameConfig {
            max_body_size: 4,
            ..FrameConfig::default()
        };
        let mut reader = FrameReader::with_config(Cursor::new(vec![0u8; 16]), cfg);
        let err = reader.read_exact(5).unwrap_err();
        assert!(matches!(err, FrameError::PayloadTooLarge { size: 5, max: 4 }));
    }

    #[test]
    fn partial_read_handling() {
        let byte_reader = ByteByByteReader {
            bytes: wire_with(&["slow"]),
            pos: 0,
        };
        let mut reader = FrameReader::new(byte_reader);

        let frame = reader.read_frame().unwrap();
        assert_eq!(frame.payload.as_ref(), b"slow");
    }

    #[test]
    fn connection_closed_cleanly() {
        let mut reader = FrameReader::new(Cursor::new(Vec::<u8>::new()));
        let err = reader.read_frame().unwrap_err();
        assert!(matches!(err, FrameError::ConnectionClosed));
    }

    #[test]
    fn connection_closed_mid_frame() {
        let mut partial = BytesMut::new();
        put_uvarint(&mut partial, 16);
        partial.put_slice(b"only-part");

        let mut reader = FrameReader::new(Cursor::new(partial.to_vec()));
        let err = reader.read_frame().unwrap_err();
        assert!(matches!(err, FrameError::ConnectionClosed));
    }

    #[test]
    fn oversized_frame_in_stream() {
        let mut wire = BytesMut::new();
        put_uvarint(&mut wire, 1024);

        let cfg = FrameConfig {
            max_frame_size: 16,
            ..FrameConfig::default()
        };
        let mut reader = FrameReader::with_config(Cursor::new(wire.to_vec()), cfg);
        let err = reader.read_frame().unwrap_err();
        assert!(matches!(err, FrameError::PayloadTooLarge { .. }));
    }

    #[derive(Debug)]
    struct ByteByByteReader {
        bytes: Vec<u8>,
        pos: usize,
    }

    impl Read for ByteByByteReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.pos >= self.bytes.len() || buf.is_empty() {
                return Ok(0);
            }

            buf[0] = self.bytes[self.pos];
            self.pos += 1;
            Ok(1)
        }
    }

    #[test]
    fn roundtrip_over_pipe() {
        let (left, right) = std::os::unix::net::UnixStream::pair().unwrap();
        let mut writer = crate::writer::FrameWriter::new(left);
        let mut reader = FrameReader::new(right);

        writer.send(b"ping").unwrap();
        let frame = reader.read_frame().unwrap();

        assert_eq!(frame.payload.as_ref(), b"ping");
    }

    #[test]
    fn concurrent_reader_writer_threads() {
        let (left, right) = std::os::unix::net::UnixStream::pair().unwrap();
        let mut writer = crate::writer::FrameWriter::new(left);
        let reader = Arc::new(Mutex::new(FrameReader::new(right)));

        let reader_thread = {
            let reader = Arc::clone(&reader);
            std::thread::spawn(move || {
                for expected in 0..64u16 {
                    let mut reader = reader.lock().unwrap();
                    let frame = reader.read_frame().unwrap();
                    assert_eq!(frame.payload.as_ref(), format!("msg-{expected}").as_bytes());
                    let body = reader.read_exact(2).unwrap();
                    assert_eq!(body.as_ref(), &expected.to_le_bytes()[..]);
                }
            })
        };

        for i in 0..64u16 {
            let payload = format!("msg-{i}");
            writer.queue_frame(payload.as_bytes());
            writer.queue_raw(&i.to_le_bytes());
            writer.flush().unwrap();
        }

        reader_thread.join().unwrap();
    }

    #[test]
    fn accessors_and_into_inner() {
        let cursor = Cursor::new(Vec::<u8>::new());
        let mut reader = FrameReader::new(cursor);

        let _ = reader.get_ref();
        let _ = reader.get_mut();
        reader.set_max_frame_size(32);
        assert_eq!(reader.config().max_frame_size, 32);
        let _inner = reader.into_inner();
    }

    #[test]
    fn read_would_block_propagates_io_error() {
        let reader = WouldBlockThenData {
            state: 0,
            bytes: wire_with(&["ok"]),
            pos: 0,
        };
        let mut framed = FrameReader::new(reader);
        let err = framed.read_frame().unwrap_err();
        assert!(matches!(err, FrameError::Io(e) if e.kind() == ErrorKind::WouldBlock));
    }

    struct WouldBlockThenData {
        state: u8,
        bytes: Vec<u8>,
        pos: usize,
    }

    impl Read for WouldBlockThenData {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.state == 0 {
                self.state = 1;
                return Err(std::io::Error::from(ErrorKind::WouldBlock));
            }
            let remaining = self.bytes.len() - self.pos;
            let n = remaining.min(buf.len());
            buf[..n].copy_from_slice(&self.bytes[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    #[test]
    fn interrupted_read_retries() {
        let reader = InterruptedThenData {
            state: 0,
            bytes: wire_with(&["ok"]),
            pos: 0,
        };
        let mut framed = FrameReader::new(reader);
        let frame = framed.read_frame().unwrap();

        assert_eq!(frame.payload.as_ref(), b"ok");
    }

    struct InterruptedThenData {
        state: u8,
        bytes: Vec<u8>,
        pos: usize,
    }

    impl Read for InterruptedThenData {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.state == 0 {
                self.state = 1;
                return Err(std::io::Error::from(ErrorKind::Interrupted));
            }
            let remaining = self.bytes.len() - self.pos;
            let n = remaining.min(buf.len());
            buf[..n].copy_from_slice(&self.bytes[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }
}
