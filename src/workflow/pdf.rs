//! PDF workflow: merge several files or split one.
//!
//! The two operations keep separate file collections, so switching between
//! them does not lose either selection.

use crate::client::Client;
use crate::collector::FileCollector;
use crate::error::ValidationError;
use crate::operation::{is_numeric_count, PdfOperation, PdfOperationKind, SplitMode, SplitSpec};
use crate::outcome::RequestOutcome;
use crate::payload::PreparedRequest;
use crate::upload::UploadFile;
use crate::workflow::run_submission;
use tracing::debug;

/// State of the PDF page.
#[derive(Debug, Clone)]
pub struct PdfWorkflow {
    operation: PdfOperationKind,
    merge_files: FileCollector,
    split_file: FileCollector,
    split_mode: SplitMode,
    pages: String,
    count: String,
    outcome: RequestOutcome,
}

impl Default for PdfWorkflow {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfWorkflow {
    pub fn new() -> Self {
        Self {
            operation: PdfOperationKind::default(),
            merge_files: FileCollector::multi(),
            split_file: FileCollector::single(),
            split_mode: SplitMode::default(),
            pages: String::new(),
            count: String::new(),
            outcome: RequestOutcome::Idle,
        }
    }

    pub fn operation(&self) -> PdfOperationKind {
        self.operation
    }

    pub fn set_operation(&mut self, operation: PdfOperationKind) {
        self.operation = operation;
    }

    pub fn split_mode(&self) -> SplitMode {
        self.split_mode
    }

    pub fn set_split_mode(&mut self, mode: SplitMode) {
        self.split_mode = mode;
    }

    pub fn pages(&self) -> &str {
        &self.pages
    }

    /// Page-range expression, e.g. `1-3,5,7-9`. Not parsed locally.
    pub fn set_pages(&mut self, pages: impl Into<String>) {
        self.pages = pages.into();
    }

    pub fn count(&self) -> &str {
        &self.count
    }

    /// Pages per output file, as typed.
    pub fn set_count(&mut self, count: impl Into<String>) {
        self.count = count.into();
    }

    // ── File selection ───────────────────────────────────────────────────

    /// Add files to the collection of the current operation: appended for
    /// merge, replacing the held file for split. A non-empty selection clears
    /// a displayed error.
    pub fn add_files(&mut self, files: impl IntoIterator<Item = UploadFile>) {
        let added = match self.operation {
            PdfOperationKind::Merge => self.merge_files.add_files(files),
            PdfOperationKind::Split => self.split_file.add_files(files),
        };
        if added {
            self.outcome.clear_error();
        }
    }

    /// Remove a file of the current operation by position. Out-of-range
    /// indices are ignored.
    pub fn remove_file(&mut self, index: usize) -> Option<UploadFile> {
        match self.operation {
            PdfOperationKind::Merge => self.merge_files.remove_file(index),
            PdfOperationKind::Split => self.split_file.remove_file(index),
        }
    }

    /// Files queued for merging, in merge order.
    pub fn merge_files(&self) -> &[UploadFile] {
        self.merge_files.files()
    }

    pub fn split_file(&self) -> Option<&UploadFile> {
        self.split_file.first()
    }

    // ── Submission ───────────────────────────────────────────────────────

    pub fn outcome(&self) -> &RequestOutcome {
        &self.outcome
    }

    /// Whether the submit control of the current operation is enabled.
    pub fn can_submit(&self) -> bool {
        if self.outcome.is_loading() {
            return false;
        }
        match self.operation {
            PdfOperationKind::Merge => self.merge_files.len() >= 2,
            PdfOperationKind::Split => self.split_file().is_some(),
        }
    }

    /// The typed operation, validated against the current inputs.
    pub fn current_operation(&self) -> Result<PdfOperation, ValidationError> {
        match self.operation {
            PdfOperationKind::Merge => Ok(PdfOperation::Merge),
            PdfOperationKind::Split => self.split_spec().map(PdfOperation::Split),
        }
    }

    /// Ranges or count from the current split inputs.
    fn split_spec(&self) -> Result<SplitSpec, ValidationError> {
        match self.split_mode {
            SplitMode::Pages if self.pages.is_empty() => Err(ValidationError::EmptyPageRanges),
            SplitMode::Pages => Ok(SplitSpec::Pages(self.pages.clone())),
            SplitMode::Count if !is_numeric_count(&self.count) => {
                Err(ValidationError::InvalidPageCount)
            }
            SplitMode::Count => Ok(SplitSpec::Count(self.count.clone())),
        }
    }

    /// Validate and build the multipart payload.
    ///
    /// Merge sends one `pdfs` part per file in order. Split sends `pdf`,
    /// `mode`, then `pages` or `count`.
    pub fn prepare(&self) -> Result<PreparedRequest, ValidationError> {
        match self.operation {
            PdfOperationKind::Merge => self.prepare_merge(),
            PdfOperationKind::Split => self.prepare_split(),
        }
    }

    fn prepare_merge(&self) -> Result<PreparedRequest, ValidationError> {
        if self.merge_files.len() < 2 {
            return Err(ValidationError::TooFewPdfsToMerge);
        }
        Ok(self
            .merge_files
            .files()
            .iter()
            .fold(PreparedRequest::new(PdfOperationKind::Merge.endpoint()), |req, f| {
                req.file("pdfs", f.clone())
            }))
    }

    fn prepare_split(&self) -> Result<PreparedRequest, ValidationError> {
        let file = self.split_file().ok_or(ValidationError::NoPdfToSplit)?;
        let spec = self.split_spec()?;

        let request = PreparedRequest::new(PdfOperationKind::Split.endpoint())
            .file("pdf", file.clone())
            .text("mode", spec.mode().as_str());
        Ok(match spec {
            SplitSpec::Pages(pages) => request.text("pages", pages),
            SplitSpec::Count(count) => request.text("count", count),
        })
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::{MERGE_FAILURE_MESSAGE, SPLIT_FAILURE_MESSAGE};
    use crate::render::Artifact;
    use crate::workflow::testing::{client, RecordingTransport};

    fn pdf(name: &str) -> UploadFile {
        UploadFile::from_bytes(name, format!("%PDF {name}").into_bytes())
    }

    fn split_workflow() -> PdfWorkflow {
        let mut wf = PdfWorkflow::new();
        wf.set_operation(PdfOperationKind::Split);
        wf.add_files([pdf("book.pdf")]);
        wf
    }

    #[tokio::test]
    async fn merge_needs_two_files() {
        let dir = tempfile::tempdir().unwrap();
        let transport = RecordingTransport::ok(b"%PDF", None);
        let client = client(transport.clone(), dir.path());

        let mut wf = PdfWorkflow::new();
        assert!(!wf.can_submit());
        assert_eq!(
            wf.submit(&client).await.error(),
            Some("Please select at least two PDF files to merge")
        );

        wf.add_files([pdf("a.pdf")]);
        assert!(!wf.can_submit());
        assert_eq!(
            wf.submit(&client).await.error(),
            Some("Please select at least two PDF files to merge")
        );
        assert_eq!(transport.calls(), 0);
    }

    #[test]
    fn merge_payload_keeps_add_order() {
        let mut wf = PdfWorkflow::new();
        wf.add_files([pdf("c.pdf"), pdf("a.pdf")]);
        wf.add_files([pdf("b.pdf"), pdf("a.pdf")]);

        let req = wf.prepare().unwrap();
        assert_eq!(req.endpoint, "merge-pdfs");
        let names: Vec<_> = req.files_named("pdfs").map(UploadFile::name).collect();
        assert_eq!(names, vec!["c.pdf", "a.pdf", "b.pdf", "a.pdf"]);
    }

    #[test]
    fn removing_a_file_keeps_the_others_in_order() {
        let mut wf = PdfWorkflow::new();
        wf.add_files([pdf("1.pdf"), pdf("2.pdf"), pdf("3.pdf")]);
        wf.remove_file(0);
        wf.remove_file(7);
        let names: Vec<_> = wf.merge_files().iter().map(UploadFile::name).collect();
        assert_eq!(names, vec!["2.pdf", "3.pdf"]);
    }

    #[test]
    fn collections_are_kept_per_operation() {
        let mut wf = PdfWorkflow::new();
        wf.add_files([pdf("a.pdf"), pdf("b.pdf")]);
        wf.set_operation(PdfOperationKind::Split);
        wf.add_files([pdf("one.pdf")]);
        wf.add_files([pdf("two.pdf")]);

        assert_eq!(wf.split_file().map(UploadFile::name), Some("two.pdf"));
        wf.set_operation(PdfOperationKind::Merge);
        assert_eq!(wf.merge_files().len(), 2);
    }

    #[tokio::test]
    async fn split_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let transport = RecordingTransport::ok(b"PK", None);
        let client = client(transport.clone(), dir.path());

        let mut wf = PdfWorkflow::new();
        wf.set_operation(PdfOperationKind::Split);
        wf.set_pages("1-3");
        assert!(!wf.can_submit());
        assert_eq!(
            wf.submit(&client).await.error(),
            Some("Please select a PDF file to split")
        );
        assert_eq!(transport.calls(), 0);
    }

    #[test]
    fn split_by_pages_validation() {
        let mut wf = split_workflow();
        assert_eq!(wf.prepare(), Err(ValidationError::EmptyPageRanges));

        wf.set_pages("abc");
        let req = wf.prepare().unwrap();
        assert_eq!(req.text_value("pages"), Some("abc"));
    }

    #[test]
    fn split_by_pages_payload() {
        let mut wf = split_workflow();
        wf.set_pages("1-3,5");

        let req = wf.prepare().unwrap();
        assert_eq!(req.endpoint, "split-pdf");
        assert_eq!(req.field_names(), vec!["pdf", "mode", "pages"]);
        assert_eq!(req.text_value("mode"), Some("pages"));
        assert_eq!(req.text_value("pages"), Some("1-3,5"));
    }

    #[test]
    fn split_by_count_validation() {
        let mut wf = split_workflow();
        wf.set_split_mode(SplitMode::Count);
        wf.set_pages("1-3");
        assert_eq!(wf.prepare(), Err(ValidationError::InvalidPageCount));

        wf.set_count("two");
        assert_eq!(wf.prepare(), Err(ValidationError::InvalidPageCount));

        wf.set_count("2");
        let req = wf.prepare().unwrap();
        assert_eq!(req.field_names(), vec!["pdf", "mode", "count"]);
        assert_eq!(req.text_value("mode"), Some("count"));
        assert_eq!(req.text_value("count"), Some("2"));
        assert_eq!(req.text_value("pages"), None);
    }

    #[tokio::test]
    async fn split_success_downloads_zip() {
        let dir = tempfile::tempdir().unwrap();
        let transport = RecordingTransport::ok(b"PK\x03\x04zip", Some("application/zip"));
        let client = client(transport.clone(), dir.path());

        let mut wf = split_workflow();
        wf.set_pages("1-3,5");
        let outcome = wf.submit(&client).await;

        let path = outcome.result().and_then(Artifact::downloaded_path).expect("downloaded");
        assert_eq!(path, dir.path().join("split_pdfs.zip"));
        assert!(outcome.error().is_none());
        assert_eq!(transport.last().0, "http://localhost:3000/split-pdf");
    }

    #[tokio::test]
    async fn merge_success_downloads_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let client = client(RecordingTransport::ok(b"%PDF-merged", None), dir.path());

        let mut wf = PdfWorkflow::new();
        wf.add_files([pdf("a.pdf"), pdf("b.pdf")]);
        let outcome = wf.submit(&client).await;
        assert_eq!(
            outcome.result(),
            Some(&Artifact::Downloaded {
                path: dir.path().join("merged.pdf"),
                bytes: 11
            })
        );
    }

    #[tokio::test]
    async fn validation_error_is_cleared_by_a_successful_split() {
        let dir = tempfile::tempdir().unwrap();
        let transport = RecordingTransport::ok(b"PK\x03\x04", Some("application/zip"));
        let client = client(transport.clone(), dir.path());

        let mut wf = split_workflow();
        assert_eq!(wf.submit(&client).await.error(), Some("Please enter page ranges"));

        // Editing the ranges alone keeps the message up.
        wf.set_pages("2-4");
        assert!(wf.outcome().error().is_some());

        let outcome = wf.submit(&client).await;
        assert!(outcome.error().is_none());
        assert_eq!(
            outcome.result().and_then(Artifact::downloaded_path),
            Some(dir.path().join("split_pdfs.zip").as_path())
        );
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn failures_use_operation_message() {
        let dir = tempfile::tempdir().unwrap();
        let client = client(RecordingTransport::failing(502), dir.path());

        let mut wf = PdfWorkflow::new();
        wf.add_files([pdf("a.pdf"), pdf("b.pdf")]);
        assert_eq!(wf.submit(&client).await.error(), Some(MERGE_FAILURE_MESSAGE));

        let mut wf = split_workflow();
        wf.set_split_mode(SplitMode::Count);
        wf.set_count("1");
        let outcome = wf.submit(&client).await;
        assert_eq!(outcome.error(), Some(SPLIT_FAILURE_MESSAGE));
        assert!(outcome.result().is_none());
    }
}
