use std::io::Write;
use std::process::{Command, Output, Stdio};

use serde_json::Value;

fn mutscope(args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_mutscope"))
        .args(args)
        .env_remove("MUTSCOPE_LOG")
        .env_remove("MUTSCOPE_STRATEGY")
        .env_remove("MUTSCOPE_LOOKUP")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(stdin.as_bytes()).unwrap();
    child.wait_with_output().unwrap()
}

#[test]
fn test_single_request() {
    let output = mutscope(
        &["--lookup", "none"],
        r#"{"normalSequence": "ABCDE", "damagedSequence": "ABCXE"}"#,
    );
    assert!(output.status.success());

    let response: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(response["functionalityScore"]["damaged"], 44.93);
    assert_eq!(response["impaired"], true);
}

#[test]
fn test_validation_error_exit_code() {
    let output = mutscope(&["--lookup", "none"], r#"{"normalSequence": "", "damagedSequence": "ABC"}"#);
    assert_eq!(output.status.code(), Some(2));

    let body: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body["status"], 400);
    assert_eq!(body["error"], "normal sequence is required");
}

#[test]
fn test_stdio_answers_each_line() {
    let input = concat!(
        r#"{"normalSeq": "ABCDE", "damagedSeq": "ABCDE"}"#,
        "\n\n",
        r#"{"normalSeq": "ABCDE"}"#,
        "\n",
        r#"{"normalSeq": "AAAA", "damagedSeq": "AAAAXYZ", "strategy": "linear"}"#,
        "\n",
    );
    let output = mutscope(&["--stdio", "--lookup", "none"], input);
    assert!(output.status.success());

    let lines: Vec<Value> = String::from_utf8(output.stdout)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["functionalityScore"]["damaged"], 100.0);
    assert_eq!(lines[1]["status"], 400);
    assert_eq!(lines[2]["extraResidues"].as_array().unwrap().len(), 3);
    assert_eq!(lines[2]["strategy"], "linear-decay");
}

#[test]
fn test_unknown_argument() {
    let output = mutscope(&["--frobnicate"], "");
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown argument"));
}

#[test]
fn test_missing_config_file() {
    let output = mutscope(&["--config", "/nonexistent/mutscope.toml"], "");
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Config file not found: /nonexistent/mutscope.toml"));
}

#[test]
fn test_missing_input_file() {
    let output = mutscope(&["--lookup", "none", "--input", "/nonexistent/request.json"], "");
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("IO error"));
}
