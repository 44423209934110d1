//! Unit tests for the mits CLI
//!
//! These tests drive the public API against an in-memory platform and run
//! fast without spawning `cf` or touching the network.

mod cli_flags;
mod mocks;
mod run_suite;
mod scenario_runner;
