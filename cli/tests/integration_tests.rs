use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const BIN: &str = env!("CARGO_BIN_EXE_cool-lexicon");

/// Writes a sqlite config pointing at `lexicon.db` inside `dir`.
fn write_config(dir: &Path) -> PathBuf {
    let json = serde_json::json!({
        "type": "sqlite",
        "host": dir.join("lexicon.db").to_string_lossy(),
    });
    let path = dir.join("cool-lexicon-cfg.json");
    fs::write(&path, serde_json::to_string_pretty(&json).unwrap()).expect("failed to write config");
    path
}

fn run(config: &Path, args: &[&str]) -> Output {
    Command::new(BIN)
        .arg("--config")
        .arg(config)
        .args(["--log-level", "warn"])
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run cool-lexicon")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Sets up the schema and loads the five sample words from a file.
fn seeded(dir: &Path) -> PathBuf {
    let config = write_config(dir);
    let words = dir.join("words.txt");
    fs::write(&words, "नमस्ते धन्यवाद\nनमस्कार\nसुंदर मोक्ष\n").unwrap();

    let output = run(
        &config,
        &["--setup", "--input-file", "--add", words.to_str().unwrap()],
    );
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(stdout(&output), "added : 5\n");
    config
}

#[test]
fn setup_then_lookup_reports_each_word() {
    let dir = tempfile::tempdir().unwrap();
    let config = seeded(dir.path());

    let words = dir.path().join("lookup.txt");
    fs::write(&words, "नमस्कार notexists सुंदर").unwrap();
    let output = run(&config, &["--input-file", "--ex", words.to_str().unwrap()]);

    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "notexists : false\nनमस्कार : true\nसुंदर : true\n"
    );
}

#[test]
fn prefix_and_suffix_search() {
    let dir = tempfile::tempdir().unwrap();
    let config = seeded(dir.path());

    let output = run(&config, &["--ss", "न"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "न : [\"नमस्कार\",\"नमस्ते\"]\n");

    let output = run(&config, &["--ends-with", "र"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "र : [\"नमस्कार\",\"सुंदर\"]\n");

    let output = run(&config, &["--starts-with", "क्र"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "");
}

#[test]
fn output_dir_receives_operation_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = seeded(dir.path());
    let out = dir.path().join("results");

    let output = run(
        &config,
        &["--output-dir", out.to_str().unwrap(), "--lookup", "मोक्ष"],
    );
    assert!(output.status.success());
    assert_eq!(stdout(&output), "");
    assert_eq!(
        fs::read_to_string(out.join("lookup.txt")).unwrap(),
        "मोक्ष : true\n"
    );
}

#[test]
fn repeated_add_is_a_noop() {
    let dir = tempfile::tempdir().unwrap();
    let config = seeded(dir.path());

    for _ in 0..2 {
        let output = run(&config, &["--ad", "देव"]);
        assert!(output.status.success());
    }
    let output = run(&config, &["--ss", "दे"]);
    assert_eq!(stdout(&output), "दे : [\"देव\"]\n");
}

#[test]
fn missing_schema_without_setup_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());

    let output = run(&config, &["--lookup", "मोक्ष"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error:"), "stderr: {stderr}");
    assert!(stderr.contains("run setup"), "stderr: {stderr}");
}

#[test]
fn invalid_config_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("bad.json");
    fs::write(&config, r#"{"type": "libsql-token", "host": "localhost"}"#).unwrap();

    let output = run(&config, &["--lookup", "मोक्ष"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("authToken is required"), "stderr: {stderr}");
}

#[test]
fn operations_are_mutually_exclusive() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());

    let output = run(&config, &["--lookup", "a", "--add", "b"]);
    assert!(!output.status.success());
}

#[test]
fn empty_input_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let config = seeded(dir.path());
    let empty = dir.path().join("empty.txt");
    fs::write(&empty, "\n").unwrap();

    let output = run(&config, &["--input-file", "--add", empty.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("contains no words"));
}
