//! Operation selector types for both workflows.
//!
//! A selector value (`*Kind`) is what the user has picked; it carries no
//! parameters, so switching operation never loses the values typed into the
//! hidden inputs. A typed operation ([`ImageOperation`], [`PdfOperation`]) is
//! built from the selector plus the current inputs at submission time and
//! carries exactly the parameters its endpoint needs.

use crate::render::RenderMode;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Generic failure text of the image workflow.
pub const IMAGE_FAILURE_MESSAGE: &str = "Error processing image. Please try again.";
/// Generic failure text of the merge operation.
pub const MERGE_FAILURE_MESSAGE: &str = "Error merging PDFs. Please try again.";
/// Generic failure text of the split operation.
pub const SPLIT_FAILURE_MESSAGE: &str = "Error splitting PDF. Please try again.";

/// A selector string did not name a known operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown operation '{input}' (expected one of: {expected})")]
pub struct ParseOperationError {
    input: String,
    expected: &'static str,
}

// ── Image ────────────────────────────────────────────────────────────────

/// The operation picked in the image workflow's selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum ImageOperationKind {
    /// Re-encode at a lower quality. (default)
    #[default]
    Compress,
    /// Scale to the given width and height.
    Resize,
    JpgToPng,
    PngToJpg,
    /// Wrap the image in a single-page PDF.
    ImageToPdf,
    /// Make the background colour transparent.
    TransparentBackground,
}

impl ImageOperationKind {
    /// Every selectable image operation, in menu order.
    pub const ALL: [ImageOperationKind; 6] = [
        ImageOperationKind::Compress,
        ImageOperationKind::Resize,
        ImageOperationKind::JpgToPng,
        ImageOperationKind::PngToJpg,
        ImageOperationKind::ImageToPdf,
        ImageOperationKind::TransparentBackground,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ImageOperationKind::Compress => "compress",
            ImageOperationKind::Resize => "resize",
            ImageOperationKind::JpgToPng => "jpg-to-png",
            ImageOperationKind::PngToJpg => "png-to-jpg",
            ImageOperationKind::ImageToPdf => "image-to-pdf",
            ImageOperationKind::TransparentBackground => "transparent-background",
        }
    }

    /// Path appended to the backend base URL.
    pub fn endpoint(self) -> &'static str {
        match self {
            ImageOperationKind::Compress => "compress",
            ImageOperationKind::Resize => "resize",
            ImageOperationKind::JpgToPng => "convert/jpg-to-png",
            ImageOperationKind::PngToJpg => "convert/png-to-jpg",
            ImageOperationKind::ImageToPdf => "convert/to-pdf",
            ImageOperationKind::TransparentBackground => "transparent",
        }
    }

    /// Only the PDF conversion is downloaded; every other result is an image
    /// shown inline.
    pub fn render_mode(self) -> RenderMode {
        match self {
            ImageOperationKind::ImageToPdf => RenderMode::Download {
                filename: "converted.pdf",
            },
            _ => RenderMode::Inline {
                stem: self.result_stem(),
            },
        }
    }

    pub fn failure_message(self) -> &'static str {
        IMAGE_FAILURE_MESSAGE
    }

    /// File-name stem used when the backend does not name the inline result.
    pub fn result_stem(self) -> &'static str {
        match self {
            ImageOperationKind::Compress => "compressed",
            ImageOperationKind::Resize => "resized",
            ImageOperationKind::JpgToPng | ImageOperationKind::PngToJpg => "converted",
            ImageOperationKind::ImageToPdf => "converted",
            ImageOperationKind::TransparentBackground => "transparent",
        }
    }
}

impl fmt::Display for ImageOperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageOperationKind {
    type Err = ParseOperationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        ImageOperationKind::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseOperationError {
                input: s.to_string(),
                expected: "compress, resize, jpg-to-png, png-to-jpg, image-to-pdf, transparent-background",
            })
    }
}

/// JPEG quality sent with `compress`, always within 1–100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub struct Quality(u8);

impl Quality {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 100;

    /// Clamp any integer into range.
    pub fn new(value: i64) -> Self {
        Self(value.clamp(Self::MIN as i64, Self::MAX as i64) as u8)
    }

    /// Interpret text typed into the quality input.
    ///
    /// Blank input counts as 0 and so clamps to 1. Decimals are truncated.
    /// Returns `None` for non-numeric text; callers keep the previous value.
    pub fn parse_input(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Some(Self::new(0));
        }
        let value: f64 = raw.parse().ok()?;
        if value.is_nan() {
            return None;
        }
        // `as` saturates, so ±inf lands on the bounds.
        Some(Self::new(value.trunc() as i64))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(50)
    }
}

impl From<Quality> for u8 {
    fn from(q: Quality) -> u8 {
        q.0
    }
}

impl TryFrom<u8> for Quality {
    type Error = String;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        if (Self::MIN..=Self::MAX).contains(&v) {
            Ok(Self(v))
        } else {
            Err(format!("quality must be 1–100, got {v}"))
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An image operation with the parameters its endpoint requires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageOperation {
    Compress { quality: Quality },
    /// Width and height are forwarded as typed; the backend parses them.
    Resize { width: String, height: String },
    JpgToPng,
    PngToJpg,
    ImageToPdf,
    TransparentBackground,
}

impl ImageOperation {
    pub fn kind(&self) -> ImageOperationKind {
        match self {
            ImageOperation::Compress { .. } => ImageOperationKind::Compress,
            ImageOperation::Resize { .. } => ImageOperationKind::Resize,
            ImageOperation::JpgToPng => ImageOperationKind::JpgToPng,
            ImageOperation::PngToJpg => ImageOperationKind::PngToJpg,
            ImageOperation::ImageToPdf => ImageOperationKind::ImageToPdf,
            ImageOperation::TransparentBackground => ImageOperationKind::TransparentBackground,
        }
    }

    /// Text fields sent after the `image` part, in order.
    pub fn text_fields(&self) -> Vec<(&'static str, String)> {
        match self {
            ImageOperation::Compress { quality } => vec![("quality", quality.to_string())],
            ImageOperation::Resize { width, height } => {
                vec![("width", width.clone()), ("height", height.clone())]
            }
            _ => Vec::new(),
        }
    }
}

// ── PDF ──────────────────────────────────────────────────────────────────

/// The operation picked in the PDF workflow's selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PdfOperationKind {
    /// Concatenate two or more PDFs in selection order. (default)
    #[default]
    Merge,
    /// Split one PDF by page ranges or fixed page count.
    Split,
}

impl PdfOperationKind {
    pub const ALL: [PdfOperationKind; 2] = [PdfOperationKind::Merge, PdfOperationKind::Split];

    pub fn as_str(self) -> &'static str {
        match self {
            PdfOperationKind::Merge => "merge",
            PdfOperationKind::Split => "split",
        }
    }

    pub fn endpoint(self) -> &'static str {
        match self {
            PdfOperationKind::Merge => "merge-pdfs",
            PdfOperationKind::Split => "split-pdf",
        }
    }

    /// Both PDF results are downloaded under a fixed name.
    pub fn render_mode(self) -> RenderMode {
        match self {
            PdfOperationKind::Merge => RenderMode::Download {
                filename: "merged.pdf",
            },
            PdfOperationKind::Split => RenderMode::Download {
                filename: "split_pdfs.zip",
            },
        }
    }

    pub fn failure_message(self) -> &'static str {
        match self {
            PdfOperationKind::Merge => MERGE_FAILURE_MESSAGE,
            PdfOperationKind::Split => SPLIT_FAILURE_MESSAGE,
        }
    }
}

impl fmt::Display for PdfOperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PdfOperationKind {
    type Err = ParseOperationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        PdfOperationKind::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseOperationError {
                input: s.to_string(),
                expected: "merge, split",
            })
    }
}

/// How a split divides the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SplitMode {
    /// Explicit page ranges such as `1-3,5,7-9`. (default)
    #[default]
    Pages,
    /// Fixed number of pages per output file.
    Count,
}

impl SplitMode {
    /// Value of the `mode` form field.
    pub fn as_str(self) -> &'static str {
        match self {
            SplitMode::Pages => "pages",
            SplitMode::Count => "count",
        }
    }
}

impl fmt::Display for SplitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SplitMode {
    type Err = ParseOperationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pages" => Ok(SplitMode::Pages),
            "count" => Ok(SplitMode::Count),
            other => Err(ParseOperationError {
                input: other.to_string(),
                expected: "pages, count",
            }),
        }
    }
}

/// Parameters of a validated split request.
///
/// Both values are forwarded verbatim: range syntax is checked by the
/// backend, and the count only has to look numeric.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitSpec {
    Pages(String),
    Count(String),
}

impl SplitSpec {
    pub fn mode(&self) -> SplitMode {
        match self {
            SplitSpec::Pages(_) => SplitMode::Pages,
            SplitSpec::Count(_) => SplitMode::Count,
        }
    }
}

/// A PDF operation with the parameters its endpoint requires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PdfOperation {
    Merge,
    Split(SplitSpec),
}

impl PdfOperation {
    pub fn kind(&self) -> PdfOperationKind {
        match self {
            PdfOperation::Merge => PdfOperationKind::Merge,
            PdfOperation::Split(_) => PdfOperationKind::Split,
        }
    }
}

/// True when `raw` reads as a finite number, the only check a page count gets
/// before it is forwarded.
pub fn is_numeric_count(raw: &str) -> bool {
    let raw = raw.trim();
    !raw.is_empty() && raw.parse::<f64>().map(f64::is_finite).unwrap_or(false)
}
