use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_describes_the_supervisor() {
    Command::new(assert_cmd::cargo::cargo_bin!("tunsup"))
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "supervisor for privileged TUN-device programs",
        ));
}

#[test]
fn unknown_subcommand_is_rejected() {
    Command::new(assert_cmd::cargo::cargo_bin!("tunsup"))
        .arg("watch")
        .assert()
        .failure();
}

#[test]
fn invalid_log_level_is_rejected() {
    Command::new(assert_cmd::cargo::cargo_bin!("tunsup"))
        .arg("--log-level")
        .arg("loud")
        .arg("run")
        .assert()
        .failure();
}

#[test]
fn missing_config_file_aborts_with_its_path() {
    let output = Command::new(assert_cmd::cargo::cargo_bin!("tunsup"))
        .arg("run")
        .arg("--config")
        .arg("/nonexistent/tunsup.yaml")
        .output()
        .expect("failed to execute run");

    assert_eq!(output.status.code(), Some(1));
    let logged = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(logged.contains("/nonexistent/tunsup.yaml"), "{logged}");
}
