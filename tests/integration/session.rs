use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn write_config(dir: &Path, executable: &str, mode: &str) -> String {
    let config_path = dir.join("tunsup.yaml");
    fs::write(
        &config_path,
        format!(
            r#"executable: "{executable}"
interface: tunsup-itest-none
capabilities: []
elevate: false
device_wait_ms: 100
on_configure_error: {mode}
"#
        ),
    )
    .expect("failed to write config");
    config_path.to_str().unwrap().to_string()
}

/// A child that exits cleanly without any signal leaves the supervisor with
/// exit status 0, even when the interface never appeared (lenient mode).
#[test]
fn clean_child_exit_propagates_zero() {
    let temp = tempdir().expect("failed to create tempdir");
    let config_path = write_config(temp.path(), "true", "continue");

    Command::new(assert_cmd::cargo::cargo_bin!("tunsup"))
        .env("HOME", temp.path())
        .arg("run")
        .arg("--config")
        .arg(&config_path)
        .assert()
        .success();
}

#[test]
fn child_exit_code_is_propagated() {
    let temp = tempdir().expect("failed to create tempdir");
    let config_path = write_config(temp.path(), "exit 7", "continue");

    Command::new(assert_cmd::cargo::cargo_bin!("tunsup"))
        .env("HOME", temp.path())
        .arg("run")
        .arg("--config")
        .arg(&config_path)
        .assert()
        .code(7);
}

/// In strict mode a configuration failure tears the session down instead of
/// leaving the child running.
#[test]
fn strict_mode_aborts_on_configuration_failure() {
    let temp = tempdir().expect("failed to create tempdir");
    let config_path = write_config(temp.path(), "true", "abort");

    let output = Command::new(assert_cmd::cargo::cargo_bin!("tunsup"))
        .env("HOME", temp.path())
        .arg("run")
        .arg("--config")
        .arg(&config_path)
        .output()
        .expect("failed to execute run");

    assert_eq!(output.status.code(), Some(1));
    let logged = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(logged.contains("Timed out"), "{logged}");
}

#[test]
fn child_output_is_captured_in_log_files() {
    let temp = tempdir().expect("failed to create tempdir");
    let config_path = write_config(temp.path(), "echo interface ready", "continue");

    Command::new(assert_cmd::cargo::cargo_bin!("tunsup"))
        .env("HOME", temp.path())
        .arg("run")
        .arg("--config")
        .arg(&config_path)
        .assert()
        .success();

    let log_path = temp
        .path()
        .join(".local/share/tunsup/logs/child.stdout.log");
    let content = fs::read_to_string(&log_path).expect("stdout log should exist");
    assert!(
        predicate::str::contains("interface ready").eval(&content),
        "{content}"
    );
}
