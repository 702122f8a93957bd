//! The two client workflows.
//!
//! Each workflow owns its selector inputs, its file collector and its
//! [`RequestOutcome`]. A submission is strictly linear:
//!
//! ```text
//! select ──▶ validate ──▶ encode ──▶ send ──▶ render-or-error
//! ```
//!
//! 1. [`image`]: one image, six operations, inline or downloaded result
//! 2. [`pdf`]: merge several PDFs or split one, always downloaded
//!
//! Both share [`run_submission`], which performs the outcome transitions.

pub mod image;
pub mod pdf;

use crate::client::Client;
use crate::error::{FileConvError, ValidationError};
use crate::outcome::RequestOutcome;
use crate::payload::PreparedRequest;
use crate::render::RenderMode;
use tracing::{debug, error, info, warn};

/// Drive one submission from a validation result to a final outcome.
///
/// A validation error is shown at once and no request is made. Otherwise the
/// outcome passes through `Loading` (dropping any previous result) and ends
/// in exactly one of `Success` or `Error`. Request failures are logged with
/// their cause and shown as `failure_message`.
pub(crate) async fn run_submission(
    client: &Client,
    outcome: &mut RequestOutcome,
    prepared: Result<PreparedRequest, ValidationError>,
    mode: RenderMode,
    failure_message: &'static str,
) {
    let observer = client.observer();

    let request = match prepared {
        Ok(request) => request,
        Err(e) => {
            let message = FileConvError::from(e).to_string();
            debug!("Validation failed: {}", message);
            observer.on_error(&message);
            *outcome = RequestOutcome::Error(message);
            return;
        }
    };

    *outcome = RequestOutcome::Loading;
    observer.on_submit(request.endpoint);

    let response = match client.dispatch(&request).await {
        Ok(response) => response,
        Err(e) => {
            if e.is_request_failure() {
                warn!("Request to '{}' failed: {}", request.endpoint, e);
            } else {
                error!("Could not send '{}': {}", request.endpoint, e);
            }
            observer.on_error(failure_message);
            *outcome = RequestOutcome::Error(failure_message.to_string());
            return;
        }
    };

    match client.render(mode, response).await {
        Ok(artifact) => {
            info!("'{}' succeeded", request.endpoint);
            observer.on_success(&artifact);
            *outcome = RequestOutcome::Success(artifact);
        }
        Err(e) => {
            warn!("Rendering result of '{}' failed: {}", request.endpoint, e);
            let message = e.to_string();
            observer.on_error(&message);
            *outcome = RequestOutcome::Error(message);
        }
    }
}
