use bytes::BufMut;
use rpcwire_frame::varint::{decode_uvarint, put_uvarint};
use rpcwire_frame::FrameError;

use crate::error::{HeaderError, Result};

pub(crate) fn put_string<B: BufMut>(dst: &mut B, value: &str) {
    put_uvarint(dst, value.len() as u64);
    dst.put_slice(value.as_bytes());
}

/// Field-by-field reader over one header payload.
pub(crate) struct FieldReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> FieldReader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Result<Self> {
        if data.is_empty() {
            return Err(HeaderError::Empty);
        }
        Ok(Self { data, pos: 0 })
    }

    fn take(&mut self, len: usize, field: &'static str) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.data.len())
            .ok_or(HeaderError::Truncated { field })?;
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    pub(crate) fn u16_le(&mut self, field: &'static str) -> Result<u16> {
        let bytes = self.take(2, field)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    pub(crate) fn u32_le(&mut self, field: &'static str) -> Result<u32> {
        let bytes = self.take(4, field)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub(crate) fn uvarint(&mut self, field: &'static str) -> Result<u64> {
        match decode_uvarint(&self.data[self.pos..]) {
            Ok(Some((value, used))) => {
                self.pos += used;
                Ok(value)
            }
            Ok(None) => Err(HeaderError::Truncated { field }),
            Err(FrameError::VarintOverflow) => Err(HeaderError::VarintOverflow { field }),
            Err(_) => Err(HeaderError::Truncated { field }),
        }
    }

    pub(crate) fn uvarint_u32(&mut self, field: &'static str) -> Result<u32> {
        let value = self.uvarint(field)?;
        u32::try_from(value).map_err(|_| HeaderError::LengthOverflow { field, value })
    }

    pub(crate) fn string(&mut self, field: &'static str) -> Result<String> {
        let len = self.uvarint(field)?;
        let len = usize::try_from(len).map_err(|_| HeaderError::LengthOverflow { field, value: len })?;
        let bytes = self.take(len, field)?;
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|_| HeaderError::InvalidUtf8 { field })
    }
}
