//! Integration tests for `mits config`.

#![allow(clippy::expect_used)]

use std::io::Write;

use predicates::prelude::*;

use crate::cli_tests::mits;

const SUITE: &str = "\
broker:
  name: minibroker
provisioning:
  override_params:
    enabled: true
tests:
  redis:
    enabled: true
    class: redis
    plan: 5-0-7
  mysql:
    enabled: false
    class: mysql
    plan: 5-7-30
timeouts:
  create_service: 10m
";

fn config_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".yaml")
        .tempfile()
        .expect("tempfile");
    file.write_all(content.as_bytes()).expect("write");
    file
}

#[test]
fn test_config_shows_effective_configuration() {
    let file = config_file(SUITE);
    mits()
        .arg("--config")
        .arg(file.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("minibroker"))
        .stdout(predicate::str::contains("enabled:"))
        .stdout(predicate::str::contains("create_service: 10m"))
        .stdout(predicate::str::contains("command: 2m"));
}

#[test]
fn test_config_reads_path_from_environment() {
    let file = config_file(SUITE);
    mits()
        .env("MITS_CONFIG", file.path())
        .args(["config", "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::contains("name: minibroker"));
}

#[test]
fn test_config_json_output_is_valid_json() {
    let file = config_file(SUITE);
    let output = mits()
        .arg("--config")
        .arg(file.path())
        .args(["config", "--json"])
        .output()
        .expect("run mits");
    assert!(output.status.success());

    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(value["config"]["broker"]["name"], "minibroker");
    assert_eq!(value["config"]["tests"]["redis"]["plan"], "5-0-7");
    assert_eq!(value["config"]["timeouts"]["create_service"], "10m");
    assert_eq!(value["config"]["provisioning"]["override_params"]["enabled"], true);
    assert!(value["path"].as_str().expect("path").ends_with(".yaml"));
}

#[test]
fn test_config_rejects_invalid_document() {
    let file = config_file("broker:\n  name: \"\"\n");
    mits()
        .arg("--config")
        .arg(file.path())
        .arg("config")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("broker.name must not be empty"));
}

#[test]
fn test_no_color_accepts_any_non_empty_value() {
    let file = config_file(SUITE);
    for value in ["1", "yes", "true"] {
        mits()
            .env("NO_COLOR", value)
            .arg("--config")
            .arg(file.path())
            .arg("config")
            .assert()
            .success()
            .stdout(predicate::str::contains("minibroker"))
            .stdout(predicate::str::contains("\x1b[").not());
    }
}

#[test]
fn test_no_color_flag_still_parses() {
    let file = config_file(SUITE);
    mits()
        .env_remove("NO_COLOR")
        .arg("--config")
        .arg(file.path())
        .args(["config", "--no-color"])
        .assert()
        .success();
}
