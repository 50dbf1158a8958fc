use std::fs;

use assert_cmd::Command;
use tempfile::tempdir;

/// Grant failures abort before anything else in the session happens: no
/// child is started and no interface exists.
#[test]
fn grant_failure_aborts_before_any_child() {
    let temp = tempdir().expect("failed to create tempdir");
    let config_path = temp.path().join("tunsup.yaml");
    fs::write(
        &config_path,
        r#"executable: /nonexistent/tunnel
capabilities: [cap_net_admin]
elevate: false
"#,
    )
    .expect("failed to write config");

    let output = Command::new(assert_cmd::cargo::cargo_bin!("tunsup"))
        .env("HOME", temp.path())
        .arg("run")
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .output()
        .expect("failed to execute run");

    assert_eq!(output.status.code(), Some(1));
    let logged = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(logged.contains("Executable not found"), "{logged}");
}

#[test]
fn grant_subcommand_reports_missing_executable() {
    let temp = tempdir().expect("failed to create tempdir");
    let config_path = temp.path().join("tunsup.yaml");
    fs::write(&config_path, "elevate: false\n").expect("failed to write config");

    let output = Command::new(assert_cmd::cargo::cargo_bin!("tunsup"))
        .env("HOME", temp.path())
        .arg("grant")
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .arg("/nonexistent/tunnel")
        .output()
        .expect("failed to execute grant");

    assert_eq!(output.status.code(), Some(1));
    let logged = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(logged.contains("Executable not found"), "{logged}");
}

#[test]
fn grant_with_empty_capability_set_succeeds() {
    let temp = tempdir().expect("failed to create tempdir");
    let exe = temp.path().join("tunnel");
    fs::write(&exe, "#!/bin/sh\nexit 0\n").expect("failed to write executable");

    let config_path = temp.path().join("tunsup.yaml");
    fs::write(
        &config_path,
        format!(
            "executable: {}\ncapabilities: []\nelevate: false\n",
            exe.display()
        ),
    )
    .expect("failed to write config");

    Command::new(assert_cmd::cargo::cargo_bin!("tunsup"))
        .env("HOME", temp.path())
        .arg("grant")
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .assert()
        .success();
}
