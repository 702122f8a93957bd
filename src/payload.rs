//! Multipart payload description.
//!
//! Validation produces a [`PreparedRequest`]: the endpoint suffix plus the
//! ordered list of form fields. Keeping the payload as plain data (rather
//! than a `reqwest::multipart::Form`, which cannot be inspected) lets tests
//! assert field names, values and order without a network round trip.

use crate::upload::UploadFile;

/// One named segment of a multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormField {
    Text { name: &'static str, value: String },
    File { name: &'static str, file: UploadFile },
}

impl FormField {
    pub fn text(name: &'static str, value: impl Into<String>) -> Self {
        FormField::Text {
            name,
            value: value.into(),
        }
    }

    pub fn file(name: &'static str, file: UploadFile) -> Self {
        FormField::File { name, file }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FormField::Text { name, .. } | FormField::File { name, .. } => *name,
        }
    }
}

/// A validated submission, ready for the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRequest {
    /// Path relative to the backend base URL, e.g. `convert/to-pdf`.
    pub endpoint: &'static str,
    pub fields: Vec<FormField>,
}

impl PreparedRequest {
    pub fn new(endpoint: &'static str) -> Self {
        Self {
            endpoint,
            fields: Vec::new(),
        }
    }

    pub fn text(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.fields.push(FormField::text(name, value));
        self
    }

    pub fn file(mut self, name: &'static str, file: UploadFile) -> Self {
        self.fields.push(FormField::file(name, file));
        self
    }

    /// Value of the first text field called `name`.
    pub fn text_value(&self, name: &str) -> Option<&str> {
        self.fields.iter().find_map(|f| match f {
            FormField::Text { name: n, value } if *n == name => Some(value.as_str()),
            _ => None,
        })
    }

    /// Files sent under `name`, in body order.
    pub fn files_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a UploadFile> + 'a {
        self.fields.iter().filter_map(move |f| match f {
            FormField::File { name: n, file } if *n == name => Some(file),
            _ => None,
        })
    }

    /// Field names in body order.
    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(FormField::name).collect()
    }

    /// Total bytes of file content in the body.
    pub fn upload_bytes(&self) -> usize {
        self.fields
            .iter()
            .map(|f| match f {
                FormField::File { file, .. } => file.len(),
                FormField::Text { .. } => 0,
            })
            .sum()
    }
}
