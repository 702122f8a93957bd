//! Upload files: the local file references a workflow collects.
//!
//! An [`UploadFile`] is read into memory when it is selected, the way a
//! browser `File` is a handle to data that already exists. The bytes sit
//! behind an `Arc`, so collectors and prepared requests can clone the
//! reference freely without copying the content.

use crate::error::FileConvError;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// A named file ready to be sent as a multipart part.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadFile {
    name: String,
    content_type: &'static str,
    data: Arc<[u8]>,
}

impl UploadFile {
    /// Wrap in-memory content; the MIME type is guessed from `name`.
    pub fn from_bytes(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        let name = name.into();
        let data: Vec<u8> = data.into();
        let content_type = guess_content_type(&name);
        Self {
            name,
            content_type,
            data: Arc::from(data),
        }
    }

    /// Read a local file, validating that it exists and is readable.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, FileConvError> {
        let path = path.as_ref();
        let data = tokio::fs::read(path)
            .await
            .map_err(|e| read_error(path.to_path_buf(), e))?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        debug!("Loaded upload {} ({} bytes)", path.display(), data.len());
        Ok(Self::from_bytes(name, data))
    }

    /// File name sent in the part's `Content-Disposition`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content_type(&self) -> &'static str {
        self.content_type
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl fmt::Debug for UploadFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadFile")
            .field("name", &self.name)
            .field("content_type", &self.content_type)
            .field("len", &self.data.len())
            .finish()
    }
}

fn read_error(path: PathBuf, e: std::io::Error) -> FileConvError {
    match e.kind() {
        std::io::ErrorKind::NotFound => FileConvError::FileNotFound { path },
        std::io::ErrorKind::PermissionDenied => FileConvError::PermissionDenied { path },
        _ => FileConvError::ReadFailed { path, source: e },
    }
}

/// MIME type for a file name, by extension only.
pub fn guess_content_type(name: &str) -> &'static str {
    let ext = Path::new(name)
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase());
    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}
