//! Observer trait for submission events.
//!
//! Inject an [`Arc<dyn SubmissionObserver>`] via
//! [`crate::config::ClientConfigBuilder::observer`] to react to the outcome
//! transitions of every submission: start a spinner when a request goes out,
//! stop it when the result or error arrives.
//!
//! # Example
//!
//! ```rust
//! use fileconv_client::{ClientConfig, SubmissionObserver};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingObserver {
//!     sent: AtomicUsize,
//! }
//!
//! impl SubmissionObserver for CountingObserver {
//!     fn on_submit(&self, endpoint: &str) {
//!         let n = self.sent.fetch_add(1, Ordering::SeqCst) + 1;
//!         eprintln!("request #{n} → {endpoint}");
//!     }
//! }
//!
//! let config = ClientConfig::builder()
//!     .observer(Arc::new(CountingObserver { sent: AtomicUsize::new(0) }))
//!     .build()
//!     .unwrap();
//! ```

use crate::render::Artifact;
use std::sync::Arc;

/// Called by the workflows as a submission moves through its states.
///
/// All methods default to no-ops so implementors only override what they
/// need. Validation failures never reach `on_submit`; they go straight to
/// `on_error`.
pub trait SubmissionObserver: Send + Sync {
    /// A request is about to be sent; the outcome is now `Loading`.
    fn on_submit(&self, endpoint: &str) {
        let _ = endpoint;
    }

    /// The outcome became `Success`.
    fn on_success(&self, artifact: &Artifact) {
        let _ = artifact;
    }

    /// The outcome became `Error` with this user-facing message.
    fn on_error(&self, message: &str) {
        let _ = message;
    }
}

/// Observer that ignores every event. Used when none is configured.
pub struct NoopObserver;

impl SubmissionObserver for NoopObserver {}

/// Convenience alias matching the type stored in [`crate::config::ClientConfig`].
pub type SharedObserver = Arc<dyn SubmissionObserver>;
