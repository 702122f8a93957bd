//! File collector: the files pending submission.
//!
//! Single-file workflows hold at most one file and replace it on every new
//! selection. Multi-file collectors append in selection order; that order is
//! the merge order, and the same file may appear more than once.

use crate::upload::UploadFile;

/// Whether a collector keeps one file or an ordered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectorMode {
    Single,
    Multi,
}

/// Ordered set of pending upload files.
#[derive(Debug, Clone)]
pub struct FileCollector {
    mode: CollectorMode,
    files: Vec<UploadFile>,
}

impl FileCollector {
    pub fn single() -> Self {
        Self {
            mode: CollectorMode::Single,
            files: Vec::new(),
        }
    }

    pub fn multi() -> Self {
        Self {
            mode: CollectorMode::Multi,
            files: Vec::new(),
        }
    }

    pub fn mode(&self) -> CollectorMode {
        self.mode
    }

    /// Add a selection batch. Returns `false` when the batch was empty and
    /// nothing changed.
    ///
    /// In single mode the first file of the batch replaces the held one.
    pub fn add_files(&mut self, files: impl IntoIterator<Item = UploadFile>) -> bool {
        let mut files = files.into_iter().peekable();
        if files.peek().is_none() {
            return false;
        }
        match self.mode {
            CollectorMode::Single => {
                self.files.clear();
                self.files.extend(files.next());
            }
            CollectorMode::Multi => self.files.extend(files),
        }
        true
    }

    /// Remove the file at `index`; out-of-range indices are ignored.
    pub fn remove_file(&mut self, index: usize) -> Option<UploadFile> {
        if index < self.files.len() {
            Some(self.files.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }

    pub fn files(&self) -> &[UploadFile] {
        &self.files
    }

    /// The held file of a single collector (the first file otherwise).
    pub fn first(&self) -> Option<&UploadFile> {
        self.files.first()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Display names in order, as the chip list shows them.
    pub fn names(&self) -> Vec<&str> {
        self.files.iter().map(UploadFile::name).collect()
    }
}
