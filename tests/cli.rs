use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

const TWO_TASKS: &str = r#"{
    "cpus": [0, 1],
    "tasks": [
        { "name": "a", "cpu": 0, "T": 10, "D": 10, "C": 1, "P": 2, "req": { "1": 1 } },
        { "name": "b", "cpu": 1, "T": 10, "D": 10, "C": 1, "P": 1, "req": { "1": 1 } }
    ],
    "resources": [ { "id": 1, "c": 1 } ]
}"#;

fn spin_table(args: &[&Path]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_spin-table"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("spawn spin-table")
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

#[test]
fn writes_header() {
    let dir = TempDir::new().expect("tempdir");
    let config = dir.path().join("system.json");
    let header = dir.path().join("spin_prio.h");
    fs::write(&config, TWO_TASKS).expect("write config");

    let out = spin_table(&[&config, &header]);
    assert_eq!(out.status.code(), Some(0), "stderr: {}", stderr(&out));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("with 2 entries."));

    let text = fs::read_to_string(&header).expect("read header");
    assert!(text.contains("    { \"a\", 1, 2, 0 },\n"));
    // b is outpaced by a's processor and starts at the high sentinel
    assert!(text.contains("    { \"b\", 1, 2, 0 },\n"));
}

#[test]
fn wrong_argument_count_is_a_usage_error() {
    let out = spin_table(&[]);
    assert_eq!(out.status.code(), Some(2));
    assert!(stderr(&out).contains("Usage:"));

    let only = Path::new("system.json");
    let out = spin_table(&[only]);
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn missing_config_fails() {
    let dir = TempDir::new().expect("tempdir");
    let header = dir.path().join("out.h");
    let out = spin_table(&[&dir.path().join("absent.json"), &header]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("error: cannot read"));
    assert!(!header.exists());
}

#[test]
fn invalid_system_fails_without_output() {
    let dir = TempDir::new().expect("tempdir");
    let config = dir.path().join("system.json");
    let header = dir.path().join("out.h");
    fs::write(
        &config,
        r#"{ "tasks": [ { "name": "a", "cpu": 0, "T": 10, "D": 10, "P": 1, "req": { "9": 1 } } ] }"#,
    )
    .expect("write config");

    let out = spin_table(&[&config, &header]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("invalid system"));
    assert!(!header.exists());
}

#[test]
fn malformed_json_fails() {
    let dir = TempDir::new().expect("tempdir");
    let config = dir.path().join("system.json");
    fs::write(&config, "{ \"tasks\": [").expect("write config");
    let out = spin_table(&[&config, &dir.path().join("out.h")]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("error: "));
}

#[test]
fn unwritable_output_fails() {
    let dir = TempDir::new().expect("tempdir");
    let config = dir.path().join("system.json");
    fs::write(&config, TWO_TASKS).expect("write config");
    let out = spin_table(&[&config, &dir.path().join("missing").join("out.h")]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("cannot write"));
}
