use bytes::BufMut;
use rpcwire_frame::varint::{put_uvarint, uvarint_len};

use crate::compress_type::CompressType;
use crate::error::Result;
use crate::wire::{put_string, FieldReader};

/// Envelope of one outbound call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestHeader {
    /// Sequence id assigned by the dispatch layer.
    pub id: u64,
    /// Fully qualified method name, e.g. `Arith.Add`.
    pub method: String,
    /// Length of the compressed body that follows the header.
    pub request_len: u32,
    /// Compression applied to the body.
    pub compress_type: CompressType,
    /// CRC32 (IEEE) of the compressed body; 0 skips verification.
    pub checksum: u32,
}

impl RequestHeader {
    /// Exact number of bytes `marshal` produces.
    pub fn encoded_len(&self) -> usize {
        2 + uvarint_len(self.method.len() as u64)
            + self.method.len()
            + uvarint_len(self.id)
            + uvarint_len(u64::from(self.request_len))
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
        put_string(dst, &self.method);
        put_uvarint(dst, self.id);
        put_uvarint(dst, u64::from(self.request_len));
        dst.put_u32_le(self.checksum);
    }

    /// Decode a header from one frame payload, replacing every field.
    ///
    /// On error the header is left reset rather than half-populated.
    pub fn unmarshal(&mut self, data: &[u8]) -> Result<()> {
        self.reset();
        *self = Self::decode(data)?;
        Ok(())
    }

    /// Decode a new header from one frame payload.
    pub fn decode(data: &[u8]) -> Result<Self> {
        let mut fields = FieldReader::new(data)?;
        let compress_type = CompressType::from(fields.u16_le("compress_type")?);
        let method = fields.string("method")?;
        let id = fields.uvarint("id")?;
        let request_len = fields.uvarint_u32("request_len")?;
        let checksum = fields.u32_le("checksum")?;

        Ok(Self {
            id,
            method,
            request_len,
            compress_type,
            checksum,
        })
    }

    /// Zero every field, keeping the method string's allocation.
    pub fn reset(&mut self) {
        self.id = 0;
        self.method.clear();
        self.request_len = 0;
        self.compress_type = CompressType::Raw;
        self.checksum = 0;
    }

    /// True when every field is at its zero value.
    pub fn is_reset(&self) -> bool {
        self.id == 0
            && self.method.is_empty()
            && self.request_len == 0
            && self.compress_type == CompressType::Raw
            && self.checksum == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HeaderError;

    fn sample() -> RequestHeader {
        RequestHeader {
            id: 300,
            method: "Arith.Add".to_string(),
            request_len: 12,
            compress_type: CompressType::Gzip,
            checksum: 0x0102_0304,
        }
    }

    #[test]
    fn byte_layout() {
        let bytes = sample().marshal();

        let mut expected = vec![0x01, 0x00, 9];
        expected.extend_from_slice(b"Arith.Add");
        expected.extend_from_slice(&[0xac, 0x02]);
        expected.push(12);
        expected.extend_from_slice(&[0x04, 0x03, 0x02, 0x01]);

        assert_eq!(bytes, expected);
        assert_eq!(bytes.len(), sample().encoded_len());
    }

    #[test]
    fn decode_restores_fields() {
        let header = sample();
        assert_eq!(RequestHeader::decode(&header.marshal()).unwrap(), header);
    }

    #[test]
    fn unmarshal_overwrites_previous_values() {
        let mut header = sample();
        let replacement = RequestHeader {
            id: 1,
            method: String::new(),
            ..RequestHeader::default()
        };

        header.unmarshal(&replacement.marshal()).unwrap();
        assert_eq!(header, replacement);
    }

    #[test]
    fn unmarshal_failure_leaves_header_reset() {
        let mut header = sample();
        let mut bytes = sample().marshal();
        bytes.truncate(bytes.len() - 2);

        let err = header.unmarshal(&bytes).unwrap_err();
        assert_eq!(err, HeaderError::Truncated { field: "checksum" });
        assert!(header.is_reset());
    }

    #[test]
    fn empty_payload_rejected() {
        assert_eq!(RequestHeader::decode(&[]), Err(HeaderError::Empty));
    }

    #[test]
    fn invalid_utf8_method_rejected() {
        let mut bytes = vec![0x00, 0x00, 2, 0xff, 0xfe];
        bytes.extend_from_slice(&[1, 0, 0, 0, 0, 0]);
        assert_eq!(
            RequestHeader::decode(&bytes),
            Err(HeaderError::InvalidUtf8 { field: "method" })
        );
    }

    #[test]
    fn trailing_bytes_are_ignored() {
        let mut bytes = sample().marshal();
        bytes.extend_from_slice(b"extension");
        assert_eq!(RequestHeader::decode(&bytes).unwrap(), sample());
    }

    #[test]
    fn reset_clears_everything() {
        let mut header = sample();
        header.reset();
        assert!(header.is_reset());
        assert_eq!(header, RequestHeader::default());
    }
}
