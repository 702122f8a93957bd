//! Result rendering: turn a backend response into an [`Artifact`].
//!
//! Documents (PDF conversion, merge, split) are *downloaded*: written to the
//! output directory under a fixed name. Images are kept *inline* as an owned
//! buffer that the caller can preview or save.
//!
//! Downloads are written atomically. The body goes to a
//! [`tempfile::NamedTempFile`] created next to the target and is then
//! persisted over it; on every failure path the temporary file is dropped and
//! removed, so no half-written artifact is ever left behind.

use crate::error::FileConvError;
use crate::transport::TransportResponse;
use image::ImageFormat;
use std::fmt;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// How a successful response is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Save to disk under a fixed suggested name.
    Download { filename: &'static str },
    /// Keep in memory for display; `stem` names it when saved.
    Inline { stem: &'static str },
}

/// The rendered result of a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artifact {
    /// A document written to disk.
    Downloaded { path: PathBuf, bytes: u64 },
    /// An image held in memory.
    Inline(InlineImage),
}

impl Artifact {
    pub fn as_inline(&self) -> Option<&InlineImage> {
        match self {
            Artifact::Inline(img) => Some(img),
            Artifact::Downloaded { .. } => None,
        }
    }

    pub fn downloaded_path(&self) -> Option<&Path> {
        match self {
            Artifact::Downloaded { path, .. } => Some(path),
            Artifact::Inline(_) => None,
        }
    }
}

/// An image result retained until the next submission replaces it.
#[derive(Clone, PartialEq, Eq)]
pub struct InlineImage {
    data: Vec<u8>,
    content_type: Option<String>,
    suggested_name: String,
}

/// Format and size sniffed from an inline image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImagePreview {
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
}

impl InlineImage {
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// `Content-Type` the backend declared, if any.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// File name used by [`InlineImage::save_to`].
    pub fn suggested_name(&self) -> &str {
        &self.suggested_name
    }

    /// Decode just enough of the image to learn its format and dimensions.
    ///
    /// Returns `None` when the body is not an image this build can read.
    pub fn preview(&self) -> Option<ImagePreview> {
        let reader = image::ImageReader::new(Cursor::new(&self.data))
            .with_guessed_format()
            .ok()?;
        let format = reader.format()?;
        let (width, height) = reader.into_dimensions().ok()?;
        Some(ImagePreview {
            format,
            width,
            height,
        })
    }

    /// Save the image into `dir` under its suggested name.
    pub async fn save_to(&self, dir: impl AsRef<Path>) -> Result<PathBuf, FileConvError> {
        let (path, _) = write_atomic(dir.as_ref(), &self.suggested_name, self.data.clone()).await?;
        Ok(path)
    }
}

impl fmt::Debug for InlineImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InlineImage")
            .field("len", &self.data.len())
            .field("content_type", &self.content_type)
            .field("suggested_name", &self.suggested_name)
            .finish()
    }
}

/// Render a response according to `mode`, writing downloads into `output_dir`.
pub async fn render(
    mode: RenderMode,
    response: TransportResponse,
    output_dir: &Path,
) -> Result<Artifact, FileConvError> {
    match mode {
        RenderMode::Download { filename } => {
            let (path, bytes) = write_atomic(output_dir, filename, response.body).await?;
            debug!("Downloaded {} bytes to {}", bytes, path.display());
            Ok(Artifact::Downloaded { path, bytes })
        }
        RenderMode::Inline { stem } => {
            let suggested_name = inline_name(stem, &response);
            debug!(
                "Inline result {} ({} bytes)",
                suggested_name,
                response.body.len()
            );
            Ok(Artifact::Inline(InlineImage {
                data: response.body,
                content_type: response.content_type,
                suggested_name,
            }))
        }
    }
}

/// Name for an inline result: the backend's `Content-Disposition` name when
/// it gives one, else `stem` plus an extension from the content type or the
/// image magic bytes.
fn inline_name(stem: &str, response: &TransportResponse) -> String {
    if let Some(name) = response.filename.as_deref().and_then(sanitize_file_name) {
        return name;
    }

    let ext = response
        .content_type
        .as_deref()
        .and_then(ImageFormat::from_mime_type)
        .or_else(|| image::guess_format(&response.body).ok())
        .and_then(|f| f.extensions_str().first().copied())
        .unwrap_or("bin");

    format!("{stem}.{ext}")
}

/// Strip any directory part so a server-chosen name cannot escape the
/// output directory.
fn sanitize_file_name(name: &str) -> Option<String> {
    let base = name.rsplit(['/', '\\']).next()?.trim();
    if base.is_empty() || base == "." || base == ".." {
        None
    } else {
        Some(base.to_string())
    }
}

/// Write `data` to `dir/filename` via a temp file in the same directory.
async fn write_atomic(
    dir: &Path,
    filename: &str,
    data: Vec<u8>,
) -> Result<(PathBuf, u64), FileConvError> {
    let path = dir.join(filename);

    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| FileConvError::OutputWriteFailed {
            path: path.clone(),
            source: e,
        })?;

    let dir = dir.to_path_buf();
    let target = path.clone();
    tokio::task::spawn_blocking(move || {
        let fail = |source| FileConvError::OutputWriteFailed {
            path: target.clone(),
            source,
        };
        let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(fail)?;
        tmp.write_all(&data).map_err(fail)?;
        tmp.flush().map_err(fail)?;
        tmp.persist(&target).map_err(|e| fail(e.error))?;
        Ok((target, data.len() as u64))
    })
    .await
    .map_err(|e| FileConvError::Internal(format!("write task failed: {e}")))?
}
