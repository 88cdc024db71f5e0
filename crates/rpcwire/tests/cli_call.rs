#![cfg(all(unix, feature = "cli"))]

use std::io::Write;
use std::os::unix::net::UnixListener;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::thread::{self, JoinHandle};

use rpcwire_codec::{decode_body, encode_response, read_request, CodecConfig};
use rpcwire_frame::FrameReader;
use rpcwire_header::CompressType;
use serde_json::{json, Value};

fn unique_socket(tag: &str) -> PathBuf {
    let dir = PathBuf::from(format!(
        "/tmp/rpcwire-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir.join("arith.sock")
}

/// Serve one request: `Arith.Add` sums `A` and `B`, anything else errors.
fn serve_once(path: &Path, config: CodecConfig) -> JoinHandle<()> {
    let listener = UnixListener::bind(path).expect("socket should bind");
    thread::spawn(move || {
        let (stream, _) = listener.accept().expect("client should connect");
        let mut out = stream.try_clone().expect("stream should clone");
        let mut frames = FrameReader::new(stream);

        let (header, body) = read_request(&mut frames).expect("request should arrive");
        let arg: Value = decode_body(&config, header.compress_type, header.checksum, &body)
            .expect("request body should decode");

        let wire = match header.method.as_str() {
            "Arith.Add" => {
                let sum = arg["A"].as_i64().unwrap_or(0) + arg["B"].as_i64().unwrap_or(0);
                encode_response(&config, header.id, "", Some(&json!(sum)))
            }
            other => encode_response::<Value>(
                &config,
                header.id,
                &format!("rpc: can't find method {other}"),
                None,
            ),
        }
        .expect("reply should encode");
        out.write_all(&wire).expect("reply should send");
    })
}

fn call(path: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_rpcwire"))
        .args(["--log-level", "error", "--format", "json", "call"])
        .arg(path)
        .args(["--timeout", "3s"])
        .args(args)
        .output()
        .expect("rpcwire should run")
}

fn report(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be one JSON report")
}

#[test]
fn call_returns_reply() {
    let path = unique_socket("call-add");
    let server = serve_once(&path, CodecConfig::default());

    let output = call(&path, &["-m", "Arith.Add", "--json", r#"{"A":20,"B":22}"#, "--id", "9"]);
    server.join().expect("server should finish");

    assert!(output.status.success(), "call failed: {output:?}");
    let report = report(&output);
    assert_eq!(report["ok"], true);
    assert_eq!(report["id"], 9);
    assert_eq!(report["reply"], 42);
}

#[test]
fn call_with_compression_and_msgpack() {
    let path = unique_socket("call-zlib");
    let config = CodecConfig::default()
        .with_compress_type(CompressType::Zlib)
        .with_serialize_type(rpcwire_serialize::SerializeType::MsgPack);
    let server = serve_once(&path, config);

    let output = call(
        &path,
        &["-m", "Arith.Add", "--json", r#"{"A":1,"B":2}"#, "-z", "zlib", "-s", "msgpack"],
    );
    server.join().expect("server should finish");

    assert!(output.status.success(), "call failed: {output:?}");
    assert_eq!(report(&output)["reply"], 3);
}

#[test]
fn server_error_exits_failure() {
    let path = unique_socket("call-err");
    let server = serve_once(&path, CodecConfig::default());

    let output = call(&path, &["-m", "Arith.Pow", "--json", "[2,8]"]);
    server.join().expect("server should finish");

    assert_eq!(output.status.code(), Some(1));
    let report = report(&output);
    assert_eq!(report["ok"], false);
    assert_eq!(report["error"], "rpc: can't find method Arith.Pow");
    assert!(report.get("reply").is_none());
}

#[test]
fn missing_socket_is_transport_error() {
    let path = unique_socket("call-missing");
    let output = call(&path, &["-m", "Arith.Add"]);
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn bincode_call_is_usage_error() {
    let path = unique_socket("call-bincode");
    let output = call(&path, &["-m", "Arith.Add", "-s", "bincode"]);
    assert_eq!(output.status.code(), Some(64));
}
