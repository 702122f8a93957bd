//! Image workflow: one file, one operation, one result.

use crate::client::Client;
use crate::collector::FileCollector;
use crate::error::ValidationError;
use crate::operation::{ImageOperation, ImageOperationKind, Quality};
use crate::outcome::RequestOutcome;
use crate::payload::PreparedRequest;
use crate::upload::UploadFile;
use crate::workflow::run_submission;
use tracing::debug;

/// State of the image page: selector, inputs, selected file, outcome.
///
/// Inputs for operations other than the selected one keep their values; they
/// are simply not sent.
#[derive(Debug, Clone)]
pub struct ImageWorkflow {
    operation: ImageOperationKind,
    quality: Quality,
    width: String,
    height: String,
    file: FileCollector,
    outcome: RequestOutcome,
}

impl Default for ImageWorkflow {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageWorkflow {
    pub fn new() -> Self {
        Self {
            operation: ImageOperationKind::default(),
            quality: Quality::default(),
            width: String::new(),
            height: String::new(),
            file: FileCollector::single(),
            outcome: RequestOutcome::Idle,
        }
    }

    // ── Selector and inputs ──────────────────────────────────────────────

    pub fn operation(&self) -> ImageOperationKind {
        self.operation
    }

    pub fn set_operation(&mut self, operation: ImageOperationKind) {
        self.operation = operation;
    }

    pub fn quality(&self) -> Quality {
        self.quality
    }

    /// Store a quality value, clamped to 1–100.
    pub fn set_quality(&mut self, value: i64) {
        self.quality = Quality::new(value);
    }

    /// Store typed quality text; non-numeric text is ignored.
    pub fn set_quality_input(&mut self, raw: &str) -> Quality {
        if let Some(q) = Quality::parse_input(raw) {
            self.quality = q;
        }
        self.quality
    }

    pub fn width(&self) -> &str {
        &self.width
    }

    pub fn set_width(&mut self, width: impl Into<String>) {
        self.width = width.into();
    }

    pub fn height(&self) -> &str {
        &self.height
    }

    pub fn set_height(&mut self, height: impl Into<String>) {
        self.height = height.into();
    }

    // ── File selection ───────────────────────────────────────────────────

    /// Select a file, replacing any previous one. A non-empty selection
    /// clears a displayed error.
    pub fn add_files(&mut self, files: impl IntoIterator<Item = UploadFile>) {
        if self.file.add_files(files) {
            self.outcome.clear_error();
        }
    }

    pub fn select_file(&mut self, file: UploadFile) {
        self.add_files([file]);
    }

    pub fn selected_file(&self) -> Option<&UploadFile> {
        self.file.first()
    }

    // ── Submission ───────────────────────────────────────────────────────

    pub fn outcome(&self) -> &RequestOutcome {
        &self.outcome
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        !self.outcome.is_loading() && self.selected_file().is_some()
    }

    /// The typed operation built from the selector and current inputs.
    pub fn current_operation(&self) -> ImageOperation {
        match self.operation {
            ImageOperationKind::Compress => ImageOperation::Compress {
                quality: self.quality,
            },
            ImageOperationKind::Resize => ImageOperation::Resize {
                width: self.width.clone(),
                height: self.height.clone(),
            },
            ImageOperationKind::JpgToPng => ImageOperation::JpgToPng,
            ImageOperationKind::PngToJpg => ImageOperation::PngToJpg,
            ImageOperationKind::ImageToPdf => ImageOperation::ImageToPdf,
            ImageOperationKind::TransparentBackground => ImageOperation::TransparentBackground,
        }
    }

    /// Validate and build the multipart payload: `image` first, then the
    /// operation's parameters.
    pub fn prepare(&self) -> Result<PreparedRequest, ValidationError> {
        let file = self
            .selected_file()
            .ok_or(ValidationError::NoImageSelected)?;
        let operation = self.current_operation();

        let request = operation.text_fields().into_iter().fold(
            PreparedRequest::new(operation.kind().endpoint()).file("image", file.clone()),
            |req, (name, value)| req.text(name, value),
        );
        Ok(request)
    }

    /// Validate, send and render. Returns the final outcome.
    ///
    /// Does nothing while a request is already in flight.
    pub async fn submit(&mut self, client: &Client) -> &RequestOutcome {
        if self.outcome.is_loading() {
            debug!("Submission ignored: request already in flight");
            return &self.outcome;
        }
        let kind = self.operation;
        let prepared = self.prepare();
        run_submission(
            client,
            &mut self.outcome,
            prepared,
            kind.render_mode(),
            kind.failure_message(),
        )
        .await;
        &self.outcome
    }

    /// Return to `Idle`, dropping any result or error.
    pub fn reset(&mut self) {
        self.outcome = RequestOutcome::Idle;
    }
}
