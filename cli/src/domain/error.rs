//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! Errors convert to `anyhow::Error` via the `?` operator in outer layers.

use std::time::Duration;

use thiserror::Error;

/// Coarse failure classes shared by every lifecycle step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// An external command exited non-zero where zero was required.
    CommandFailed,
    /// A wait exceeded its deadline.
    Timeout,
    /// A terminal status outside the expected pair was observed.
    UnexpectedStatus,
    /// Structured output could not be parsed into the expected shape.
    DecodeFailed,
}

// ── Service instance errors ───────────────────────────────────────────────────

/// Errors raised by the service instance lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("invalid provisioning parameters for service instance {instance}: {reason}")]
    InvalidParameters { instance: String, reason: String },

    #[error("failed to create service instance {instance}: {reason}")]
    CreateFailed { instance: String, reason: String },

    #[error("failed to resolve the guid of service instance {instance}: {reason}")]
    IdResolutionFailed { instance: String, reason: String },

    #[error("failed to query the status of service instance {instance}: {reason}")]
    QueryFailed { instance: String, reason: String },

    #[error("timed out after {timeout:?} waiting for service instance {instance}")]
    Timeout {
        instance: String,
        timeout: Duration,
        last_status: Option<String>,
    },

    #[error("service instance {instance} reported unexpected status {status:?}")]
    UnexpectedStatus { instance: String, status: String },

    #[error("failed to create a service key for {instance}: {reason}")]
    KeyCreationFailed { instance: String, reason: String },

    #[error("failed to look up the service key guid for {instance}: {reason}")]
    KeyLookupFailed { instance: String, reason: String },

    #[error("failed to fetch the service key record for {instance}: {reason}")]
    KeyFetchFailed { instance: String, reason: String },

    #[error("failed to decode the service key record for {instance}: {reason}")]
    DecodeFailed { instance: String, reason: String },

    #[error("failed to bind service instance {instance} to app {app}: {reason}")]
    BindFailed {
        instance: String,
        app: String,
        reason: String,
    },

    #[error("failed to unbind service instance {instance} from app {app}: {reason}")]
    UnbindFailed {
        instance: String,
        app: String,
        reason: String,
    },
}

impl ServiceError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::UnexpectedStatus { .. } => ErrorKind::UnexpectedStatus,
            Self::InvalidParameters { .. } | Self::DecodeFailed { .. } => ErrorKind::DecodeFailed,
            Self::CreateFailed { .. }
            | Self::IdResolutionFailed { .. }
            | Self::QueryFailed { .. }
            | Self::KeyCreationFailed { .. }
            | Self::KeyLookupFailed { .. }
            | Self::KeyFetchFailed { .. }
            | Self::BindFailed { .. }
            | Self::UnbindFailed { .. } => ErrorKind::CommandFailed,
        }
    }

    /// Name of the service instance the error refers to.
    #[must_use]
    pub fn instance(&self) -> &str {
        match self {
            Self::InvalidParameters { instance, .. }
            | Self::CreateFailed { instance, .. }
            | Self::IdResolutionFailed { instance, .. }
            | Self::QueryFailed { instance, .. }
            | Self::Timeout { instance, .. }
            | Self::UnexpectedStatus { instance, .. }
            | Self::KeyCreationFailed { instance, .. }
            | Self::KeyLookupFailed { instance, .. }
            | Self::KeyFetchFailed { instance, .. }
            | Self::DecodeFailed { instance, .. }
            | Self::BindFailed { instance, .. }
            | Self::UnbindFailed { instance, .. } => instance,
        }
    }
}
