use bytes::BufMut;
use rpcwire_frame::varint::{put_uvarint, uvarint_len};

use crate::compress_type::CompressType;
use crate::error::Result;
use crate::wire::{put_string, FieldReader};

/// Envelope of one inbound reply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHeader {
    /// Sequence id of the request this answers.
    pub id: u64,
    /// Server-side error text; empty on success.
    pub error: String,
    /// Length of the compressed body that follows the header.
    pub response_len: u32,
    /// Compression applied to the body.
    pub compress_type: CompressType,
    /// CRC32 (IEEE) of the compressed body; 0 skips verification.
    pub checksum: u32,
}

impl ResponseHeader {
    /// Exact number of bytes `marshal` produces.
    pub fn encoded_len(&self) -> usize {
        2 + uvarint_len(self.error.len() as u64)
            + self.error.len()
            + uvarint_len(self.id)
            + uvarint_len(u64::from(self.response_len))
            + 4
    }

    /// Encode the header; the result is exactly one frame payload.
    pub fn marshal(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        self.marshal_into(&mut buf);
        buf
    }

    /// Append the encoded header to `dst`.
    pub fn marshal_into<B: BufMut>(&self, dst: &mut B) {
        dst.put_u16_le(self.compress_type.as_u16());
        put_string(dst, &self.error);
        put_uvarint(dst, self.id);
        put_uvarint(dst, u64::from(self.response_len));
        dst.put_u32_le(self.checksum);
    }

    /// Decode a header from one frame payload, replacing every field.
    ///
    /// Fields absent from the new payload never keep values from a previous
    /// decode; on error the header is left reset.
    pub fn unmarshal(&mut self, data: &[u8]) -> Result<()> {
        self.reset();
        *self = Self::decode(data)?;
        Ok(())
    }

    /// Decode a new header from one frame payload.
    pub fn decode(data: &[u8]) -> Result<Self> {
        let mut fields = FieldReader::new(data)?;
        let compress_type = CompressType::from(fields.u16_le("compress_type")?);
        let error = fields.string("error")?;
        let id = fields.uvarint("id")?;
        let response_len = fields.uvarint_u32("response_len")?;
        let checksum = fields.u32_le("checksum")?;

        Ok(Self {
            id,
            error,
            response_len,
            compress_type,
            checksum,
        })
    }

    /// Zero every field.
    pub fn reset(&mut self) {
        self.id = 0;
        self.error.clear();
        self.response_len = 0;
        self.compress_type = CompressType::Raw;
        self.checksum = 0;
    }

    /// True when the reply carries a server-side error.
    pub fn is_error(&self) -> bool {
        !self.error.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HeaderError;

    #[test]
    fn byte_layout_matches_request_layout() {
        let header = ResponseHeader {
            id: 1,
            error: "boom".to_string(),
            response_len: 0,
            compress_type: CompressType::Snappy,
            checksum: 0,
        };

        let mut expected = vec![0x02, 0x00, 4];
        expected.extend_from_slice(b"boom");
        expected.extend_from_slice(&[1, 0, 0, 0, 0, 0]);

        assert_eq!(header.marshal(), expected);
        assert_eq!(header.encoded_len(), expected.len());
        assert!(header.is_error());
    }

    #[test]
    fn unmarshal_does_not_retain_previous_error() {
        let mut header = ResponseHeader {
            id: 9,
            error: "stale failure".to_string(),
            response_len: 55,
            compress_type: CompressType::Zlib,
            checksum: 77,
        };
        let fresh = ResponseHeader {
            id: 10,
            response_len: 3,
            ..ResponseHeader::default()
        };

        header.unmarshal(&fresh.marshal()).unwrap();
        assert_eq!(header, fresh);
        assert!(!header.is_error());
    }

    #[test]
    fn unknown_compress_type_decodes() {
        let header = ResponseHeader {
            compress_type: CompressType::Unknown(0x1234),
            ..ResponseHeader::default()
        };
        let decoded = ResponseHeader::decode(&header.marshal()).unwrap();
        assert_eq!(decoded.compress_type, CompressType::Unknown(0x1234));
    }

    #[test]
    fn truncated_id_reported() {
        let bytes = [0x00, 0x00, 0x00, 0x80];
        assert_eq!(
            ResponseHeader::decode(&bytes),
            Err(HeaderError::Truncated { field: "id" })
        );
    }

    #[test]
    fn overflowing_length_reported() {
        let mut bytes = vec![0x00, 0x00, 0x00, 0x01];
        bytes.extend_from_slice(&[0xff, 0xff, 0xff, 0xff, 0x7f]);
        bytes.extend_from_slice(&[0, 0, 0, 0]);
        assert!(matches!(
            ResponseHeader::decode(&bytes),
            Err(HeaderError::LengthOverflow {
                field: "response_len",
                ..
            })
        ));
    }
}
