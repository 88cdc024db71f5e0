use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Subcommand, ValueEnum};
use rpcwire_codec::CodecConfig;
use rpcwire_header::CompressType;
use rpcwire_serialize::SerializeType;

use crate::exit::{io_error, CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod call;
pub mod encode;
pub mod inspect;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encode one request or response message to wire bytes.
    Encode(EncodeArgs),
    /// Decode and verify a captured message stream.
    Inspect(InspectArgs),
    /// Send one request to a server and print its reply.
    Call(CallArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Encode(args) => encode::run(args, format),
        Command::Inspect(args) => inspect::run(args, format),
        Command::Call(args) => call::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

/// Body encoding shared by commands that build messages.
#[derive(Args, Debug, Clone)]
pub struct CodecArgs {
    /// Body compression: raw, gzip, snappy, zlib, or a wire number.
    #[arg(long, short = 'z', default_value = "raw")]
    pub compress: CompressType,
    /// Body serialization: json, msgpack or bincode.
    #[arg(long, short = 's', default_value = "json")]
    pub serialize: SerializeType,
}

impl CodecArgs {
    pub fn config(&self) -> CodecConfig {
        CodecConfig::default()
            .with_compress_type(self.compress)
            .with_serialize_type(self.serialize)
    }
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Method name, e.g. `Arith.Add`.
    #[arg(long, short = 'm', required_unless_present = "response")]
    pub method: Option<String>,
    /// Sequence id.
    #[arg(long, default_value_t = 1)]
    pub id: u64,
    /// JSON body (argument or reply).
    #[arg(long, conflicts_with = "file")]
    pub json: Option<String>,
    /// Read the JSON body from a file.
    #[arg(long, conflicts_with = "json")]
    pub file: Option<PathBuf>,
    /// Encode a response instead of a request.
    #[arg(long)]
    pub response: bool,
    /// Error text carried by the response.
    #[arg(long, requires = "response")]
    pub error: Option<String>,
    /// Write wire bytes to a file and print a summary instead.
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
    #[command(flatten)]
    pub codec: CodecArgs,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum MessageKind {
    Request,
    Response,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Captured byte stream; `-` reads stdin.
    pub input: PathBuf,
    /// Direction of the captured messages.
    #[arg(long, value_enum, default_value = "request")]
    pub kind: MessageKind,
    /// Serialization used to decode bodies.
    #[arg(long, short = 's', default_value = "json")]
    pub serialize: SerializeType,
    /// Stop after N messages.
    #[arg(long)]
    pub count: Option<usize>,
}

#[derive(Args, Debug)]
pub struct CallArgs {
    /// Server address: tcp://HOST:PORT, unix:///PATH, HOST:PORT or a socket path.
    pub target: String,
    /// Method name, e.g. `Arith.Add`.
    #[arg(long, short = 'm')]
    pub method: String,
    /// JSON argument.
    #[arg(long, default_value = "null")]
    pub json: String,
    /// Sequence id.
    #[arg(long, default_value_t = 1)]
    pub id: u64,
    /// Read/write timeout (e.g. 5s, 500ms).
    #[arg(long, default_value = "5s")]
    pub timeout: String,
    #[command(flatten)]
    pub codec: CodecArgs,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Parse a JSON body from `--json` or `--file`, defaulting to `null`.
pub fn read_json_body(
    json: Option<&str>,
    file: Option<&PathBuf>,
) -> CliResult<Option<serde_json::Value>> {
    let text = match (json, file) {
        (Some(json), _) => json.to_string(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err))?,
        (None, None) => return Ok(None),
    };
    serde_json::from_str(&text)
        .map(Some)
        .map_err(|err| CliError::new(USAGE, format!("body is not valid JSON: {err}")))
}

pub fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    Ok(match unit {
        "ms" => Duration::from_millis(value),
        _ => Duration::from_secs(value),
    })
}
