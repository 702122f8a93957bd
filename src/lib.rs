//! # fileconv-client
//!
//! Client for the file-conversion backend: compress, resize and convert
//! images, merge and split PDFs.
//!
//! All transformation work happens on the backend. This crate collects the
//! user's selection, validates it, encodes it as one multipart POST and
//! presents what comes back: documents are downloaded under a fixed name,
//! images are held in memory for preview.
//!
//! ## Submission Flow
//!
//! ```text
//! selection
//!  │
//!  ├─ 1. Select    operation + parameters (quality, size, ranges, count)
//!  ├─ 2. Collect   one file, or an ordered list for merging
//!  ├─ 3. Validate  fail fast with a user-facing message, no request made
//!  ├─ 4. Encode    PreparedRequest → multipart form, fields in order
//!  ├─ 5. Send      POST {base_url}{endpoint}, single shot, no retry
//!  └─ 6. Render    download (PDF, ZIP) or inline image, or a generic error
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fileconv_client::{Client, ClientConfig, PdfWorkflow, UploadFile};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::new(ClientConfig::builder().output_dir("out").build()?)?;
//!
//!     let mut merge = PdfWorkflow::new();
//!     merge.add_files([
//!         UploadFile::from_path("part1.pdf").await?,
//!         UploadFile::from_path("part2.pdf").await?,
//!     ]);
//!
//!     let outcome = merge.submit(&client).await;
//!     if let Some(msg) = outcome.error() {
//!         eprintln!("{msg}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `fileconv` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! ## Endpoints
//!
//! | Operation | Endpoint | Fields | Result |
//! |-----------|----------|--------|--------|
//! | compress | `compress` | `image`, `quality` | inline |
//! | resize | `resize` | `image`, `width`, `height` | inline |
//! | jpg-to-png | `convert/jpg-to-png` | `image` | inline |
//! | png-to-jpg | `convert/png-to-jpg` | `image` | inline |
//! | image-to-pdf | `convert/to-pdf` | `image` | `converted.pdf` |
//! | transparent-background | `transparent` | `image` | inline |
//! | merge | `merge-pdfs` | `pdfs` × n | `merged.pdf` |
//! | split | `split-pdf` | `pdf`, `mode`, `pages` or `count` | `split_pdfs.zip` |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod client;
pub mod collector;
pub mod config;
pub mod error;
pub mod observer;
pub mod operation;
pub mod outcome;
pub mod payload;
pub mod render;
pub mod transport;
pub mod upload;
pub mod workflow;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use client::Client;
pub use collector::{CollectorMode, FileCollector};
pub use config::{ClientConfig, ClientConfigBuilder, DEFAULT_BASE_URL};
pub use error::{FileConvError, ValidationError};
pub use observer::{NoopObserver, SharedObserver, SubmissionObserver};
pub use operation::{
    ImageOperation, ImageOperationKind, PdfOperation, PdfOperationKind, Quality, SplitMode,
    SplitSpec,
};
pub use outcome::RequestOutcome;
pub use payload::{FormField, PreparedRequest};
pub use render::{Artifact, ImagePreview, InlineImage, RenderMode};
pub use transport::{HttpTransport, Transport, TransportResponse};
pub use upload::UploadFile;
pub use workflow::image::ImageWorkflow;
pub use workflow::pdf::PdfWorkflow;
