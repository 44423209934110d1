//! Unit tests for global flag parsing and the config-path environment variable.
//!
//! Tests that mutate `MITS_CONFIG` are serialized with `serial_test`.

#![allow(clippy::expect_used, unsafe_code)]

use std::path::PathBuf;

use clap::Parser;
use mits_cli::cli::{Cli, Command};
use mits_common::Backend;
use serial_test::serial;

#[test]
#[serial]
fn test_config_path_defaults_to_none() {
    // SAFETY: serialized with every other test touching MITS_CONFIG.
    unsafe { std::env::remove_var("MITS_CONFIG") };
    let cli = Cli::try_parse_from(["mits", "config"]).expect("parse");
    assert!(cli.config.is_none());
}

#[test]
#[serial]
fn test_config_path_read_from_environment() {
    // SAFETY: serialized with every other test touching MITS_CONFIG.
    unsafe { std::env::set_var("MITS_CONFIG", "/etc/mits/suite.yaml") };
    let cli = Cli::try_parse_from(["mits", "config"]).expect("parse");
    unsafe { std::env::remove_var("MITS_CONFIG") };
    assert_eq!(cli.config, Some(PathBuf::from("/etc/mits/suite.yaml")));
}

#[test]
#[serial]
fn test_config_flag_overrides_environment() {
    // SAFETY: serialized with every other test touching MITS_CONFIG.
    unsafe { std::env::set_var("MITS_CONFIG", "/etc/mits/suite.yaml") };
    let cli = Cli::try_parse_from(["mits", "--config", "local.yaml", "config"]).expect("parse");
    unsafe { std::env::remove_var("MITS_CONFIG") };
    assert_eq!(cli.config, Some(PathBuf::from("local.yaml")));
}

#[test]
fn test_run_accepts_repeated_backends() {
    let cli = Cli::try_parse_from(["mits", "run", "--backend", "redis", "--backend", "mysql", "--json"])
        .expect("parse");
    assert!(cli.json);
    let Command::Run(args) = cli.command else {
        panic!("expected run command");
    };
    assert_eq!(args.backends, [Backend::Redis, Backend::MySql]);
}

#[test]
fn test_run_rejects_unknown_backend() {
    assert!(Cli::try_parse_from(["mits", "run", "--backend", "cassandra"]).is_err());
}
