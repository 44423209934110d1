//! Infrastructure layer — concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: process execution, the `cf`
//! client, configuration files, and HTTP health probes.
//!
//! Imports from `crate::domain`, `crate::application::ports` and `mits_common`
//! are allowed. Imports from `crate::commands` or `crate::output` are forbidden.

pub mod cf;
pub mod command_runner;
pub mod config;
pub mod health;
