//! Request transport: send a [`PreparedRequest`] and collect the response.
//!
//! The [`Transport`] trait is the seam between the workflows and the network.
//! [`HttpTransport`] is the real implementation on top of `reqwest`; tests and
//! embedders can inject their own through
//! [`crate::config::ClientConfigBuilder::transport`].
//!
//! Every request is a single POST. There is no retry, and by default no
//! timeout: a submission either gets a 2xx body back or fails.

use crate::error::FileConvError;
use crate::payload::{FormField, PreparedRequest};
use futures::future::BoxFuture;
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::Url;
use std::time::Duration;
use tracing::debug;

/// The parts of a successful response the renderer cares about.
///
/// The body is treated as opaque bytes whatever its declared type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportResponse {
    pub body: Vec<u8>,
    /// Declared `Content-Type`, if any.
    pub content_type: Option<String>,
    /// File name from `Content-Disposition`, if any.
    pub filename: Option<String>,
}

/// Sends one multipart POST per call.
///
/// Implementations must be `Send + Sync`; the client shares one instance
/// behind an `Arc`.
pub trait Transport: Send + Sync {
    fn post<'a>(
        &'a self,
        url: &'a Url,
        request: &'a PreparedRequest,
    ) -> BoxFuture<'a, Result<TransportResponse, FileConvError>>;
}

/// `reqwest`-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a transport; `timeout_secs = None` waits indefinitely.
    pub fn new(timeout_secs: Option<u64>) -> Result<Self, FileConvError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| FileConvError::Internal(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    async fn send(&self, url: &Url, request: &PreparedRequest) -> Result<TransportResponse, FileConvError> {
        let form = build_form(request)?;
        let failed = |e: reqwest::Error| FileConvError::RequestFailed {
            url: url.to_string(),
            reason: e.to_string(),
        };

        let response = self
            .client
            .post(url.clone())
            .multipart(form)
            .send()
            .await
            .map_err(failed)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FileConvError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let filename = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(disposition_filename);

        let body = response.bytes().await.map_err(failed)?.to_vec();
        debug!("{} → {} ({} bytes)", url, status, body.len());

        Ok(TransportResponse {
            body,
            content_type,
            filename,
        })
    }
}

impl Transport for HttpTransport {
    fn post<'a>(
        &'a self,
        url: &'a Url,
        request: &'a PreparedRequest,
    ) -> BoxFuture<'a, Result<TransportResponse, FileConvError>> {
        Box::pin(self.send(url, request))
    }
}

/// Encode the prepared fields, in order, as a multipart form.
fn build_form(request: &PreparedRequest) -> Result<Form, FileConvError> {
    request.fields.iter().try_fold(Form::new(), |form, field| match field {
        FormField::Text { name, value } => Ok(form.text(*name, value.clone())),
        FormField::File { name, file } => {
            let part = Part::bytes(file.data().to_vec())
                .file_name(file.name().to_string())
                .mime_str(file.content_type())
                .map_err(|e| FileConvError::Internal(format!("invalid MIME type: {e}")))?;
            Ok(form.part(*name, part))
        }
    })
}

/// Pull `filename=` out of a `Content-Disposition` header value.
fn disposition_filename(header: &str) -> Option<String> {
    header.split(';').find_map(|param| {
        let (key, value) = param.trim().split_once('=')?;
        if !key.trim().eq_ignore_ascii_case("filename") {
            return None;
        }
        let value = value.trim().trim_matches('"');
        (!value.is_empty()).then(|| value.to_string())
    })
}
