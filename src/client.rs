//! The client: configuration plus the resolved transport.
//!
//! A [`Client`] is shared by any number of workflows. It owns nothing
//! per-submission; each workflow owns its own outcome state.

use crate::config::ClientConfig;
use crate::error::FileConvError;
use crate::observer::{NoopObserver, SubmissionObserver};
use crate::payload::PreparedRequest;
use crate::render::{self, Artifact, RenderMode};
use crate::transport::{HttpTransport, Transport, TransportResponse};
use reqwest::Url;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Dispatches prepared requests and renders their responses.
#[derive(Clone)]
pub struct Client {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Create a client, building the HTTP transport unless one was injected.
    pub fn new(config: ClientConfig) -> Result<Self, FileConvError> {
        let transport: Arc<dyn Transport> = match config.transport {
            Some(ref t) => Arc::clone(t),
            None => Arc::new(HttpTransport::new(config.request_timeout_secs)?),
        };
        Ok(Self { config, transport })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Full URL of an endpoint suffix.
    pub fn endpoint_url(&self, endpoint: &str) -> Result<Url, FileConvError> {
        self.config
            .base_url
            .join(endpoint)
            .map_err(|e| FileConvError::Internal(format!("bad endpoint '{endpoint}': {e}")))
    }

    /// Send one prepared request.
    pub async fn dispatch(&self, request: &PreparedRequest) -> Result<TransportResponse, FileConvError> {
        let url = self.endpoint_url(request.endpoint)?;
        info!("POST {} ({} fields)", url, request.fields.len());
        debug!(
            "Fields: {:?}, {} upload bytes",
            request.field_names(),
            request.upload_bytes()
        );
        self.transport.post(&url, request).await
    }

    /// Render a response, writing downloads to the configured output directory.
    pub async fn render(&self, mode: RenderMode, response: TransportResponse) -> Result<Artifact, FileConvError> {
        render::render(mode, response, &self.config.output_dir).await
    }

    pub(crate) fn observer(&self) -> &dyn SubmissionObserver {
        match self.config.observer {
            Some(ref o) => o.as_ref(),
            None => &NoopObserver,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_url_joins_under_base() {
        let config = ClientConfig::builder()
            .base_url("http://backend:9000/v1")
            .build()
            .unwrap();
        let client = Client::new(config).unwrap();
        assert_eq!(
            client.endpoint_url("convert/jpg-to-png").unwrap().as_str(),
            "http://backend:9000/v1/convert/jpg-to-png"
        );
        assert_eq!(
            client.endpoint_url("merge-pdfs").unwrap().as_str(),
            "http://backend:9000/v1/merge-pdfs"
        );
    }

    #[test]
    fn default_client_targets_localhost() {
        let client = Client::new(ClientConfig::default()).unwrap();
        assert_eq!(
            client.endpoint_url("split-pdf").unwrap().as_str(),
            "http://localhost:3000/split-pdf"
        );
    }
}
