// CLI integration tests for encode, decode, and batch flows.
use std::fs;
use std::io::Write;
use std::process::{Command, Stdio};

use serde_json::{Value, json};

fn cmd() -> Command {
    let exe = env!("CARGO_BIN_EXE_bpcodec");
    Command::new(exe)
}

fn parse_json(value: &[u8]) -> Value {
    serde_json::from_slice(value).expect("valid json")
}

fn run_with_stdin(args: &[&str], stdin: &str) -> std::process::Output {
    let mut child = cmd()
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(stdin.as_bytes())
        .expect("write stdin");
    child.wait_with_output().expect("output")
}

#[test]
fn encode_file_then_decode_inline() {
    let temp = tempfile::tempdir().expect("tempdir");
    let input = temp.path().join("belt.json");
    fs::write(&input, r#"{"a": 1, "b": [2, 3]}"#).expect("write");

    let encode = cmd()
        .args(["encode", input.to_str().unwrap()])
        .output()
        .expect("encode");
    assert!(encode.status.success());
    let blueprint = String::from_utf8(encode.stdout).expect("utf8");
    let blueprint = blueprint.trim();
    assert!(blueprint.starts_with('0'));

    let decode = cmd().args(["decode", blueprint]).output().expect("decode");
    assert!(decode.status.success());
    assert_eq!(parse_json(&decode.stdout), json!({"a": 1, "b": [2, 3]}));
}

#[test]
fn encode_reads_stdin_and_decode_reads_file() {
    let encode = run_with_stdin(&["encode", "--level", "1"], r#"{"label": "from stdin"}"#);
    assert!(encode.status.success());

    let temp = tempfile::tempdir().expect("tempdir");
    let file = temp.path().join("bp.txt");
    fs::write(&file, &encode.stdout).expect("write");

    let decode = cmd()
        .args(["decode", "-f", file.to_str().unwrap()])
        .output()
        .expect("decode");
    assert!(decode.status.success());
    assert_eq!(parse_json(&decode.stdout), json!({"label": "from stdin"}));
}

#[test]
fn decode_pretty_uses_four_space_indent() {
    let decode = cmd()
        .args(["--color", "never", "decode", "--pretty", "0eNqrVkpUsjKsBQAIKgIJ"])
        .output()
        .expect("decode");
    assert!(decode.status.success());
    assert_eq!(String::from_utf8_lossy(&decode.stdout), "{\n    \"a\": 1\n}\n");
}

#[test]
fn codec_failures_use_stable_exit_codes() {
    let cases: [(&[&str], &str, i32, &str); 4] = [
        (&["encode"], "[1, 2, 3]", 7, "InvalidDocument"),
        (&["decode"], "1SGVsbG8=", 8, "InvalidFormat"),
        (&["decode"], "0not-valid-base64!!", 9, "Decoding"),
        (&["encode"], "{\"a\":", 11, "Parse"),
    ];
    for (args, stdin, code, kind) in cases {
        let output = run_with_stdin(args, stdin);
        assert_eq!(output.status.code(), Some(code), "kind {kind}");
        assert!(output.stdout.is_empty());
        let err = parse_json(&output.stderr);
        assert_eq!(err["error"]["kind"], kind);
        assert!(err["error"]["hint"].is_string());
    }
}

#[test]
fn corrupt_payload_exit_code() {
    // "0" + base64("not deflate data")
    let output = cmd()
        .args(["decode", "0bm90IGRlZmxhdGUgZGF0YQ=="])
        .output()
        .expect("decode");
    assert_eq!(output.status.code(), Some(10));
}

#[test]
fn batch_decode_skips_bad_files_and_reports_them() {
    let temp = tempfile::tempdir().expect("tempdir");
    let input_dir = temp.path().join("BPString");
    let output_dir = temp.path().join("Decoded");
    fs::create_dir_all(&input_dir).expect("mkdir");
    fs::write(input_dir.join("good.txt"), "0eNqrVkpUsjKsBQAIKgIJ\n").expect("write");
    fs::write(input_dir.join("bad.txt"), "hello").expect("write");

    let output = cmd()
        .args([
            "batch",
            "decode",
            "--input-dir",
            input_dir.to_str().unwrap(),
            "--output-dir",
            output_dir.to_str().unwrap(),
        ])
        .output()
        .expect("batch");

    assert_eq!(output.status.code(), Some(8));
    let summary = parse_json(&output.stdout);
    assert_eq!(summary["operation"], "decode");
    assert_eq!(summary["files"], 2);
    assert_eq!(summary["ok"], 1);
    assert_eq!(summary["failed"], 1);

    let notice = parse_json(String::from_utf8_lossy(&output.stderr).lines().next().expect("notice").as_bytes());
    assert_eq!(notice["notice"]["kind"], "skip");
    assert_eq!(notice["notice"]["details"]["kind"], "InvalidFormat");
    assert!(notice["notice"]["path"].as_str().unwrap().ends_with("bad.txt"));

    let decoded = fs::read(output_dir.join("good.json")).expect("decoded file");
    assert_eq!(parse_json(&decoded), json!({"a": 1}));
    assert!(!output_dir.join("bad.json").exists());
}

#[test]
fn batch_encode_avoids_overwriting_outputs() {
    let temp = tempfile::tempdir().expect("tempdir");
    let input_dir = temp.path().join("BPJson");
    let output_dir = temp.path().join("Encoded");
    fs::create_dir_all(&input_dir).expect("mkdir");
    fs::write(input_dir.join("belt.json"), r#"{"a": 1}"#).expect("write");

    for _ in 0..2 {
        let output = cmd()
            .current_dir(temp.path())
            .args(["batch", "encode"])
            .output()
            .expect("batch");
        assert!(output.status.success());
    }

    let first = fs::read_to_string(output_dir.join("belt.txt")).expect("first");
    let second = fs::read_to_string(output_dir.join("belt1.txt")).expect("second");
    assert!(first.starts_with('0'));
    assert_eq!(first, second);
}

#[test]
fn batch_stop_policy_fails_fast() {
    let temp = tempfile::tempdir().expect("tempdir");
    let input_dir = temp.path().join("in");
    fs::create_dir_all(&input_dir).expect("mkdir");
    fs::write(input_dir.join("a.json"), "\"scalar\"").expect("write");
    fs::write(input_dir.join("b.json"), "{}").expect("write");

    let output = cmd()
        .args([
            "batch",
            "encode",
            "--errors",
            "stop",
            "--input-dir",
            input_dir.to_str().unwrap(),
            "--output-dir",
            temp.path().join("out").to_str().unwrap(),
        ])
        .output()
        .expect("batch");

    assert_eq!(output.status.code(), Some(7));
    assert!(output.stdout.is_empty());
    let err = parse_json(&output.stderr);
    assert!(err["error"]["path"].as_str().unwrap().ends_with("a.json"));
    assert!(!temp.path().join("out").join("b.txt").exists());
}

#[test]
fn missing_batch_input_dir_is_not_found() {
    let temp = tempfile::tempdir().expect("tempdir");
    let output = cmd()
        .current_dir(temp.path())
        .args(["batch", "decode"])
        .output()
        .expect("batch");
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn usage_exit_code() {
    let output = cmd()
        .args(["encode", "--level", "12"])
        .output()
        .expect("encode");
    assert_eq!(output.status.code(), Some(2));
}
