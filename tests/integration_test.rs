use std::fs;
use std::io::Write;
use std::process::{Command, Stdio};

use trufoso::config::Config;

/// Run the binary with isolated config dirs, feeding `input` on stdin
fn run_host(input: &str, extra_args: &[&str]) -> (std::process::Output, tempfile::TempDir) {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_home = temp_dir.path().join("config");
    fs::create_dir_all(&config_home).expect("Failed to create config dir");

    let mut child = Command::new(env!("CARGO_BIN_EXE_trufoso"))
        .args(extra_args)
        .env("XDG_CONFIG_HOME", &config_home)
        .env("HOME", temp_dir.path())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn trufoso");

    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(input.as_bytes())
        .expect("Failed to write input");

    let output = child.wait_with_output().expect("Failed to wait for trufoso");
    (output, temp_dir)
}

#[test]
fn test_quit_exits_cleanly() {
    let (output, _dir) = run_host("status\nquit\n", &[]);
    assert!(output.status.success(), "{:?}", output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Trufoso"));
    assert!(stdout.contains("sentado"));
}

#[test]
fn test_closed_input_exits_cleanly() {
    let (output, _dir) = run_host("", &["--trick", "paw"]);
    assert!(output.status.success(), "{:?}", output);
}

#[test]
fn test_unknown_trick_fails() {
    let (output, _dir) = run_host("quit\n", &["--trick", "rodar"]);
    assert!(!output.status.success());
}

#[test]
fn test_explicit_config_file() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("trufoso.json");

    let config = Config {
        trick: "paw".to_string(),
        journal_enabled: false,
        ..Config::default()
    };
    config.save_to(&config_path).expect("Failed to save config");

    let path = config_path.to_string_lossy().to_string();
    let (output, _dir) = run_host("status\nquit\n", &["--config", &path]);
    assert!(output.status.success(), "{:?}", output);
    assert!(String::from_utf8_lossy(&output.stdout).contains("'paw'"));
}
