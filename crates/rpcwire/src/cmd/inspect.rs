use std::fs::File;
use std::io::{self, Read};

use rpcwire_codec::{unpack_body, verify_checksum, CodecConfig, CodecError};
use rpcwire_frame::{FrameError, FrameReader};
use rpcwire_header::{CompressType, RequestHeader, ResponseHeader};
use rpcwire_serialize::SerializeType;
use serde::Serialize;
use tracing::{debug, warn};

use crate::cmd::{InspectArgs, MessageKind};
use crate::exit::{codec_error, frame_error, io_error, CliResult, DATA_INVALID, SUCCESS};
use crate::output::{hex_preview, preview, print_reports, OutputFormat, Report};

const HEX_PREVIEW_BYTES: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum ChecksumStatus {
    Ok,
    Unchecked,
    Mismatch,
}

#[derive(Debug, Serialize)]
struct MessageReport {
    index: usize,
    kind: &'static str,
    id: u64,
    /// Method for requests, error text for responses.
    name: String,
    compress: String,
    body_len: u32,
    checksum: String,
    checksum_status: ChecksumStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    body: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    body_hex: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    body_error: Option<String>,
}

impl MessageReport {
    fn is_valid(&self) -> bool {
        self.checksum_status != ChecksumStatus::Mismatch && self.body_error.is_none()
    }
}

impl Report for MessageReport {
    fn columns() -> &'static [&'static str] {
        &[
            "#", "KIND", "ID", "METHOD/ERROR", "COMPRESS", "BODY", "CRC32", "STATUS", "CONTENT",
        ]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.index.to_string(),
            self.kind.to_string(),
            self.id.to_string(),
            self.name.clone(),
            self.compress.clone(),
            self.body_len.to_string(),
            self.checksum.clone(),
            self.status().to_string(),
            self.content(),
        ]
    }

    fn pretty(&self) -> String {
        format!(
            "#{} {} id={} {:?} compress={} body={}B crc32={} {} {}",
            self.index,
            self.kind,
            self.id,
            self.name,
            self.compress,
            self.body_len,
            self.checksum,
            self.status(),
            self.content()
        )
    }
}

impl MessageReport {
    fn status(&self) -> &'static str {
        match (self.checksum_status, &self.body_error) {
            (ChecksumStatus::Mismatch, _) => "checksum mismatch",
            (_, Some(_)) => "undecodable",
            (ChecksumStatus::Unchecked, None) => "unchecked",
            (ChecksumStatus::Ok, None) => "ok",
        }
    }

    fn content(&self) -> String {
        if let Some(body) = &self.body {
            return preview(body);
        }
        if let Some(hex) = &self.body_hex {
            return format!("0x{hex}");
        }
        self.body_error.clone().unwrap_or_default()
    }
}

/// Header fields common to both directions.
struct Envelope {
    id: u64,
    name: String,
    body_len: u32,
    compress_type: CompressType,
    checksum: u32,
}

impl From<RequestHeader> for Envelope {
    fn from(header: RequestHeader) -> Self {
        Self {
            id: header.id,
            name: header.method,
            body_len: header.request_len,
            compress_type: header.compress_type,
            checksum: header.checksum,
        }
    }
}

impl From<ResponseHeader> for Envelope {
    fn from(header: ResponseHeader) -> Self {
        Self {
            id: header.id,
            name: header.error,
            body_len: header.response_len,
            compress_type: header.compress_type,
            checksum: header.checksum,
        }
    }
}

pub fn run(args: InspectArgs, format: OutputFormat) -> CliResult<i32> {
    let input: Box<dyn Read> = if args.input.as_os_str() == "-" {
        Box::new(io::stdin().lock())
    } else {
        let file = File::open(&args.input).map_err(|err| {
            io_error(&format!("failed opening {}", args.input.display()), err)
        })?;
        Box::new(file)
    };

    let config = CodecConfig::default().with_serialize_type(args.serialize);
    let reports = inspect_stream(input, args.kind, &config, args.count)?;
    print_reports(&reports, format);

    let invalid = reports.iter().filter(|report| !report.is_valid()).count();
    if invalid > 0 {
        warn!(invalid, total = reports.len(), "stream contains invalid messages");
        return Ok(DATA_INVALID);
    }
    Ok(SUCCESS)
}

fn inspect_stream<R: Read>(
    input: R,
    kind: MessageKind,
    config: &CodecConfig,
    limit: Option<usize>,
) -> CliResult<Vec<MessageReport>> {
    let mut frames = FrameReader::with_config(input, config.frame.clone());
    let mut reports = Vec::new();

    while limit.is_none_or(|limit| reports.len() < limit) {
        let frame = match frames.read_frame() {
            Ok(frame) => frame,
            Err(FrameError::ConnectionClosed) if frames.buffered() == 0 => break,
            Err(err) => {
                return Err(frame_error(
                    &format!("message {} truncated", reports.len()),
                    err,
                ))
            }
        };

        let context = format!("message {} header", reports.len());
        let envelope: Envelope = match kind {
            MessageKind::Request => RequestHeader::decode(&frame.payload)
                .map(Envelope::from)
                .map_err(|err| codec_error(&context, err.into()))?,
            MessageKind::Response => ResponseHeader::decode(&frame.payload)
                .map(Envelope::from)
                .map_err(|err| codec_error(&context, err.into()))?,
        };

        let body = frames
            .read_exact(envelope.body_len as usize)
            .map_err(|err| frame_error(&format!("message {} body", reports.len()), err))?;

        reports.push(describe(reports.len(), kind, envelope, &body, config));
    }

    debug!(messages = reports.len(), "stream inspected");
    Ok(reports)
}

fn describe(
    index: usize,
    kind: MessageKind,
    envelope: Envelope,
    body: &[u8],
    config: &CodecConfig,
) -> MessageReport {
    let checksum_status = match verify_checksum(envelope.checksum, body) {
        Ok(()) if envelope.checksum == 0 => ChecksumStatus::Unchecked,
        Ok(()) => ChecksumStatus::Ok,
        Err(_) => ChecksumStatus::Mismatch,
    };

    let mut report = MessageReport {
        index,
        kind: match kind {
            MessageKind::Request => "request",
            MessageKind::Response => "response",
        },
        id: envelope.id,
        name: envelope.name,
        compress: envelope.compress_type.to_string(),
        body_len: envelope.body_len,
        checksum: format!("{:08x}", envelope.checksum),
        checksum_status,
        body: None,
        body_hex: None,
        body_error: None,
    };
    if body.is_empty() || checksum_status == ChecksumStatus::Mismatch {
        return report;
    }

    // The checksum was verified above.
    match unpack_body(config, envelope.compress_type, 0, body) {
        Ok(raw) => decode_value(&mut report, config, &raw),
        Err(err) => report.body_error = Some(err.to_string()),
    }
    report
}

fn decode_value(report: &mut MessageReport, config: &CodecConfig, raw: &[u8]) {
    if config.serialize_type == SerializeType::Bincode {
        // bincode is not self-describing; show the bytes.
        report.body_hex = Some(hex_preview(raw, HEX_PREVIEW_BYTES));
        return;
    }
    match config
        .serializers
        .unmarshal::<serde_json::Value>(config.serialize_type, raw)
    {
        Ok(value) => report.body = Some(value),
        Err(err) => report.body_error = Some(CodecError::from(err).to_string()),
    }
}
