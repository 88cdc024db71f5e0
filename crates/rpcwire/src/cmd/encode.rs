use std::io::Cursor;
use std::path::Path;

use rpcwire_codec::{encode_request, encode_response, read_request, read_response, CodecConfig};
use rpcwire_frame::FrameReader;
use serde::Serialize;
use tracing::debug;

use crate::cmd::{read_json_body, EncodeArgs};
use crate::exit::{codec_error, io_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_raw, print_reports, OutputFormat, Report};

#[derive(Debug, Serialize)]
struct EncodeReport {
    kind: &'static str,
    id: u64,
    /// Method for requests, error text for responses.
    name: String,
    compress: String,
    serialize: String,
    body_len: u32,
    checksum: String,
    wire_len: usize,
    output: String,
}

impl Report for EncodeReport {
    fn columns() -> &'static [&'static str] {
        &[
            "KIND", "ID", "METHOD/ERROR", "COMPRESS", "SERIALIZE", "BODY", "CRC32", "WIRE",
            "OUTPUT",
        ]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.kind.to_string(),
            self.id.to_string(),
            self.name.clone(),
            self.compress.clone(),
            self.serialize.clone(),
            self.body_len.to_string(),
            self.checksum.clone(),
            self.wire_len.to_string(),
            self.output.clone(),
        ]
    }

    fn pretty(&self) -> String {
        format!(
            "{} id={} {}={:?} compress={} serialize={} body={}B crc32={} wire={}B -> {}",
            self.kind,
            self.id,
            if self.kind == "request" { "method" } else { "error" },
            self.name,
            self.compress,
            self.serialize,
            self.body_len,
            self.checksum,
            self.wire_len,
            self.output
        )
    }
}

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let config = args.codec.config();
    let body = read_json_body(args.json.as_deref(), args.file.as_ref())?;

    let wire = if args.response {
        let error = args.error.as_deref().unwrap_or("");
        encode_response(&config, args.id, error, body.as_ref())
    } else {
        let method = args
            .method
            .as_deref()
            .ok_or_else(|| CliError::new(USAGE, "--method is required for requests"))?;
        encode_request(
            &config,
            args.id,
            method,
            &body.unwrap_or(serde_json::Value::Null),
        )
    }
    .map_err(|err| codec_error("encode failed", err))?;
    debug!(len = wire.len(), response = args.response, "message encoded");

    match &args.output {
        None => print_raw(&wire).map_err(|err| io_error("failed writing stdout", err))?,
        Some(path) => {
            std::fs::write(path, &wire)
                .map_err(|err| io_error(&format!("failed writing {}", path.display()), err))?;
            let report = summarize(&config, args.response, &wire, path)?;
            print_reports(&[report], format);
        }
    }

    Ok(SUCCESS)
}

fn summarize(
    config: &CodecConfig,
    response: bool,
    wire: &[u8],
    path: &Path,
) -> CliResult<EncodeReport> {
    let mut frames = FrameReader::new(Cursor::new(wire));
    let (kind, id, name, body_len, checksum) = if response {
        let (header, _) =
            read_response(&mut frames).map_err(|err| codec_error("re-read failed", err))?;
        ("response", header.id, header.error, header.response_len, header.checksum)
    } else {
        let (header, _) =
            read_request(&mut frames).map_err(|err| codec_error("re-read failed", err))?;
        ("request", header.id, header.method, header.request_len, header.checksum)
    };

    Ok(EncodeReport {
        kind,
        id,
        name,
        compress: config.compress_type.to_string(),
        serialize: config.serialize_type.to_string(),
        body_len,
        checksum: format!("{checksum:08x}"),
        wire_len: wire.len(),
        output: path.display().to_string(),
    })
}
