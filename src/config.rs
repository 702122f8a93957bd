//! Client configuration.
//!
//! Everything environment-specific (where the backend lives, where downloads
//! go, how long to wait) is carried by [`ClientConfig`] and handed to
//! [`crate::client::Client::new`]. Nothing is compiled in except the default
//! base URL.

use crate::error::FileConvError;
use crate::observer::SharedObserver;
use crate::transport::Transport;
use reqwest::Url;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Backend base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/";

/// Configuration for a [`crate::client::Client`].
///
/// Built via [`ClientConfig::builder()`] or using [`ClientConfig::default()`].
///
/// # Example
/// ```rust
/// use fileconv_client::ClientConfig;
///
/// let config = ClientConfig::builder()
///     .base_url("http://converter.internal:8080")
///     .output_dir("downloads")
///     .request_timeout_secs(60)
///     .build()
///     .unwrap();
/// assert_eq!(config.base_url.as_str(), "http://converter.internal:8080/");
/// ```
#[derive(Clone)]
pub struct ClientConfig {
    /// Backend root. Always ends in `/` so endpoint suffixes join under it.
    pub base_url: Url,

    /// Per-request timeout in seconds. Default: `None` (wait indefinitely).
    pub request_timeout_secs: Option<u64>,

    /// Directory downloaded artifacts are written to. Default: `.`.
    pub output_dir: PathBuf,

    /// Pre-constructed transport. Takes precedence over the HTTP transport.
    pub transport: Option<Arc<dyn Transport>>,

    /// Receives outcome transitions of every submission.
    pub observer: Option<SharedObserver>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: None,
            output_dir: PathBuf::from("."),
            transport: None,
            observer: None,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url.as_str())
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("output_dir", &self.output_dir)
            .field("transport", &self.transport.as_ref().map(|_| "<dyn Transport>"))
            .field("observer", &self.observer.as_ref().map(|_| "<dyn SubmissionObserver>"))
            .finish()
    }
}

impl ClientConfig {
    /// Create a new builder for `ClientConfig`.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder {
            base_url: None,
            config: Self::default(),
        }
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug)]
pub struct ClientConfigBuilder {
    base_url: Option<String>,
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Backend root; a missing trailing `/` is added.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = Some(secs);
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.config.transport = Some(transport);
        self
    }

    pub fn observer(mut self, observer: SharedObserver) -> Self {
        self.config.observer = Some(observer);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(mut self) -> Result<ClientConfig, FileConvError> {
        if let Some(raw) = self.base_url.take() {
            self.config.base_url = parse_base_url(&raw)?;
        }
        if self.config.request_timeout_secs == Some(0) {
            return Err(FileConvError::InvalidConfig(
                "Request timeout must be ≥ 1 second".into(),
            ));
        }
        Ok(self.config)
    }
}

/// Parse and normalise a backend base URL.
pub fn parse_base_url(raw: &str) -> Result<Url, FileConvError> {
    let raw = raw.trim();
    let mut url = Url::parse(raw)
        .map_err(|e| FileConvError::InvalidConfig(format!("Invalid base URL '{raw}': {e}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(FileConvError::InvalidConfig(format!(
            "Base URL must use http or https, got '{}'",
            url.scheme()
        )));
    }
    if url.cannot_be_a_base() {
        return Err(FileConvError::InvalidConfig(format!(
            "'{raw}' cannot be used as a base URL"
        )));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid")
}
