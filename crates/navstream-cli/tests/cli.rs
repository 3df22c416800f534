use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use serde_json::Value;
use tempfile::TempDir;

fn cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("navstream"))
}

fn sample_log(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("session.log");
    let mut data = Vec::new();
    data.extend_from_slice(b"AT+CSQ\r");
    data.extend_from_slice(b"\r\nOK\r\n");
    data.extend_from_slice(
        b"$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47\r\n",
    );
    std::fs::write(&path, data).expect("write sample log");
    path
}

#[test]
fn help_covers_decode() {
    cmd()
        .arg("log")
        .arg("decode")
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("--stdout").and(contains("--summary")));
}

#[test]
fn missing_input_shows_error_and_hint() {
    let temp = TempDir::new().expect("tempdir");
    let missing = temp.path().join("missing.log");
    let report = temp.path().join("report.json");

    cmd()
        .arg("log")
        .arg("decode")
        .arg(missing)
        .arg("-o")
        .arg(report)
        .assert()
        .failure()
        .code(2)
        .stderr(contains("error:").and(contains("hint:")));
}

#[test]
fn stdout_outputs_json() {
    let temp = TempDir::new().expect("tempdir");
    let input = sample_log(&temp);

    let assert = cmd()
        .arg("log")
        .arg("decode")
        .arg(input)
        .arg("--stdout")
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    let value: Value = serde_json::from_str(&stdout).expect("valid json");
    assert_eq!(value["report_version"], 1);
    assert_eq!(value["tool"]["name"], "navstream");
    let messages = value["messages"].as_array().expect("messages array");
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[2]["id"], "GGA");
}

#[test]
fn report_file_is_written() {
    let temp = TempDir::new().expect("tempdir");
    let input = sample_log(&temp);
    let report = temp.path().join("report.json");

    cmd()
        .arg("log")
        .arg("decode")
        .arg(&input)
        .arg("-o")
        .arg(&report)
        .assert()
        .success()
        .stderr(contains("report written"));

    let written = std::fs::read_to_string(&report).expect("read report");
    let _: Value = serde_json::from_str(&written).expect("valid json");
}

#[test]
fn quiet_suppresses_confirmation() {
    let temp = TempDir::new().expect("tempdir");
    let input = sample_log(&temp);
    let report = temp.path().join("report.json");

    cmd()
        .arg("log")
        .arg("decode")
        .arg(&input)
        .arg("-o")
        .arg(&report)
        .arg("--quiet")
        .assert()
        .success()
        .stderr(contains("report written").not());
}

#[test]
fn summary_lists_protocol_counts() {
    let temp = TempDir::new().expect("tempdir");
    let input = sample_log(&temp);

    cmd()
        .arg("log")
        .arg("decode")
        .arg(input)
        .arg("--stdout")
        .arg("--summary")
        .assert()
        .success()
        .stderr(contains("NMEA").and(contains("AT")));
}

#[test]
fn stdout_and_report_conflict() {
    let temp = TempDir::new().expect("tempdir");
    let input = sample_log(&temp);
    let report = temp.path().join("report.json");

    cmd()
        .arg("log")
        .arg("decode")
        .arg(input)
        .arg("-o")
        .arg(report)
        .arg("--stdout")
        .assert()
        .failure();
}

#[test]
fn glob_with_single_match_resolves() {
    let temp = TempDir::new().expect("tempdir");
    let _input = sample_log(&temp);
    let pattern = temp.path().join("*.log");

    cmd()
        .arg("log")
        .arg("decode")
        .arg(pattern)
        .arg("--stdout")
        .assert()
        .success();
}
