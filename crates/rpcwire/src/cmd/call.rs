use std::path::PathBuf;
use std::time::Instant;

use rpcwire_codec::{ClientCodec, CodecConfig, CodecError};
use rpcwire_serialize::SerializeType;
use rpcwire_transport::{connect_tcp, RpcStream};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cmd::{parse_duration, CallArgs};
use crate::exit::{codec_error, transport_error, CliError, CliResult, FAILURE, SUCCESS, USAGE};
use crate::output::{preview, print_reports, OutputFormat, Report};

/// Where `call` connects.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Target {
    Tcp(String),
    Unix(PathBuf),
}

impl Target {
    fn parse(input: &str) -> CliResult<Self> {
        if let Some(addr) = input.strip_prefix("tcp://") {
            return Self::tcp(addr, input);
        }
        if let Some(path) = input.strip_prefix("unix://") {
            if path.is_empty() {
                return Err(CliError::new(USAGE, format!("missing socket path: {input}")));
            }
            return Ok(Target::Unix(PathBuf::from(path)));
        }
        if input.contains('/') {
            return Ok(Target::Unix(PathBuf::from(input)));
        }
        Self::tcp(input, input)
    }

    fn tcp(addr: &str, input: &str) -> CliResult<Self> {
        match addr.rsplit_once(':') {
            Some((host, port)) if !host.is_empty() && port.parse::<u16>().is_ok() => {
                Ok(Target::Tcp(addr.to_string()))
            }
            _ => Err(CliError::new(
                USAGE,
                format!("target must be HOST:PORT or a socket path: {input}"),
            )),
        }
    }

    fn connect(&self) -> rpcwire_transport::Result<RpcStream> {
        match self {
            Target::Tcp(addr) => connect_tcp(addr.as_str()),
            #[cfg(unix)]
            Target::Unix(path) => rpcwire_transport::connect_unix(path),
            #[cfg(not(unix))]
            Target::Unix(path) => Err(rpcwire_transport::TransportError::Connect {
                addr: path.display().to_string(),
                source: std::io::Error::new(
                    std::io::ErrorKind::Unsupported,
                    "unix sockets are not available on this platform",
                ),
            }),
        }
    }
}

#[derive(Debug, Serialize)]
struct CallReport {
    target: String,
    id: u64,
    method: String,
    ok: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply: Option<serde_json::Value>,
    rtt_ms: f64,
}

impl Report for CallReport {
    fn columns() -> &'static [&'static str] {
        &["TARGET", "ID", "METHOD", "OK", "REPLY/ERROR", "RTT (ms)"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.target.clone(),
            self.id.to_string(),
            self.method.clone(),
            self.ok.to_string(),
            self.outcome(),
            format!("{:.3}", self.rtt_ms),
        ]
    }

    fn pretty(&self) -> String {
        let status = if self.ok { "ok" } else { "error" };
        format!(
            "{} {} id={} {status}: {} ({:.3} ms)",
            self.target,
            self.method,
            self.id,
            self.outcome(),
            self.rtt_ms
        )
    }
}

impl CallReport {
    fn outcome(&self) -> String {
        match &self.reply {
            Some(reply) if self.ok => preview(reply),
            _ => self.error.clone(),
        }
    }
}

pub fn run(args: CallArgs, format: OutputFormat) -> CliResult<i32> {
    if args.codec.serialize == SerializeType::Bincode {
        return Err(CliError::new(
            USAGE,
            "bincode replies are not self-describing; use json or msgpack",
        ));
    }
    let target = Target::parse(&args.target)?;
    let timeout = parse_duration(&args.timeout)?;
    let arg: serde_json::Value = serde_json::from_str(&args.json)
        .map_err(|err| CliError::new(USAGE, format!("argument is not valid JSON: {err}")))?;

    let mut config: CodecConfig = args.codec.config();
    config.frame.read_timeout = Some(timeout);
    config.frame.write_timeout = Some(timeout);

    let stream = target
        .connect()
        .map_err(|err| transport_error("call failed", err))?;
    let codec = ClientCodec::new(stream, config)
        .map_err(|err| codec_error("failed configuring connection", err))?;

    let started = Instant::now();
    let result = round_trip(&codec, args.id, &args.method, &arg);
    let rtt_ms = started.elapsed().as_secs_f64() * 1000.0;

    if let Err(err) = codec.close() {
        warn!(error = %err, "failed closing connection");
    }

    let (response, reply) = result.map_err(|err| codec_error("call failed", err))?;
    if response.seq != args.id {
        warn!(expected = args.id, got = response.seq, "reply id does not match request");
    }

    let report = CallReport {
        target: args.target,
        id: response.seq,
        method: args.method,
        ok: response.error.is_empty(),
        error: response.error,
        reply,
        rtt_ms,
    };
    info!(method = %report.method, ok = report.ok, rtt_ms, "call finished");
    let code = if report.ok { SUCCESS } else { FAILURE };
    print_reports(&[report], format);
    Ok(code)
}

fn round_trip(
    codec: &ClientCodec,
    id: u64,
    method: &str,
    arg: &serde_json::Value,
) -> Result<(rpcwire_codec::Response, Option<serde_json::Value>), CodecError> {
    codec.write_request(id, method, arg)?;
    let response = codec.read_response_header()?;
    debug!(seq = response.seq, error = %response.error, "reply header received");

    if !response.error.is_empty() {
        codec.discard_response_body()?;
        return Ok((response, None));
    }
    let reply = codec.read_response_body::<serde_json::Value>()?;
    Ok((response, Some(reply)))
}
