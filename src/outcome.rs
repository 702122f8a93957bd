//! The per-workflow request outcome.
//!
//! ```text
//!            submit (valid)              2xx + rendered
//!   Idle ─────────────────▶ Loading ─────────────────────▶ Success(artifact)
//!    ▲  \                      │
//!    │   \ submit (invalid)    │ request or render failure
//!    │    ▼                    ▼
//!    └─ Error(message) ◀───────┘
//!   (file added)
//! ```
//!
//! A result and an error are never held at the same time: the enum holds
//! exactly one state. Replacing the state drops whatever artifact the old
//! `Success` held, which releases the previous inline image as soon as a new
//! submission starts.

use crate::render::Artifact;

/// Transient state of the last submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RequestOutcome {
    /// Nothing submitted yet, or the last error was cleared.
    #[default]
    Idle,
    /// A request is in flight; the submit control is disabled.
    Loading,
    Success(Artifact),
    /// User-facing message, either a validation message or the workflow's
    /// generic failure text.
    Error(String),
}

impl RequestOutcome {
    pub fn is_loading(&self) -> bool {
        matches!(self, RequestOutcome::Loading)
    }

    pub fn result(&self) -> Option<&Artifact> {
        match self {
            RequestOutcome::Success(artifact) => Some(artifact),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            RequestOutcome::Error(msg) => Some(msg.as_str()),
            _ => None,
        }
    }

    /// Clear a displayed error. Results and in-flight state are kept.
    pub(crate) fn clear_error(&mut self) {
        if matches!(self, RequestOutcome::Error(_)) {
            *self = RequestOutcome::Idle;
        }
    }
}
