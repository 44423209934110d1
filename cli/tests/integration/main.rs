//! Integration tests for the mits CLI
//!
//! These tests spawn the actual binary and test end-to-end behavior.
//! None of them reach a platform: they stop before any `cf` call.

mod config_command;
