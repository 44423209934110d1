//! Provisioning status extraction and classification.
//!
//! Pure functions only, no I/O and no async.

/// Prefix of the status line in `cf service <name>` output. Case-sensitive.
pub const STATUS_PREFIX: &str = "status:";

/// Expected status tokens for one lifecycle transition (create or delete).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisioningCondition {
    progress: String,
    completed: String,
}

/// How an observed status token relates to a [`ProvisioningCondition`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusClass {
    /// In progress, or not reported yet. Keep polling.
    Pending,
    /// The transition finished successfully.
    Completed,
    /// Any other token. Terminal failure, never retried.
    Unexpected(String),
}

impl ProvisioningCondition {
    /// Build a condition. Tokens are trimmed and lower-cased.
    #[must_use]
    pub fn new(progress: &str, completed: &str) -> Self {
        Self {
            progress: normalize(progress),
            completed: normalize(completed),
        }
    }

    /// Condition for asynchronous instance creation.
    #[must_use]
    pub fn create() -> Self {
        Self::new("create in progress", "create succeeded")
    }

    /// Condition for asynchronous instance deletion.
    #[must_use]
    pub fn delete() -> Self {
        Self::new("delete in progress", "delete succeeded")
    }

    #[must_use]
    pub fn progress(&self) -> &str {
        &self.progress
    }

    #[must_use]
    pub fn completed(&self) -> &str {
        &self.completed
    }

    /// Classify an observed token; `None` means no status line was found.
    #[must_use]
    pub fn classify(&self, token: Option<&str>) -> StatusClass {
        let Some(token) = token.map(normalize).filter(|t| !t.is_empty()) else {
            return StatusClass::Pending;
        };
        if token == self.progress {
            StatusClass::Pending
        } else if token == self.completed {
            StatusClass::Completed
        } else {
            StatusClass::Unexpected(token)
        }
    }
}

/// Extract the normalised status token from multi-line status text.
///
/// Returns `None` when no line starts with [`STATUS_PREFIX`] or the value is
/// blank; callers treat that as "not reported yet". If several lines match,
/// the last non-blank one wins.
#[must_use]
pub fn extract_status(text: &str) -> Option<String> {
    text.lines()
        .rev()
        .filter_map(|line| line.strip_prefix(STATUS_PREFIX))
        .map(normalize)
        .find(|status| !status.is_empty())
}

fn normalize(token: &str) -> String {
    token.trim().to_lowercase()
}
