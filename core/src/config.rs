//! Construction-time configuration for `Client`.
//!
//! # Design
//! Overrides are recorded on a plain `ClientConfig` and validated in order
//! when the client is built: base URL first, then each default header in
//! insertion order. The first invalid override aborts construction.

use std::fmt;
use std::sync::Arc;

use ureq::http::{HeaderName, HeaderValue, Uri};

use crate::error::ApiError;
use crate::transport::Transport;
use crate::Client;

/// Production API root.
pub const DEFAULT_BASE_URL: &str = "https://dev.to/api";

/// Overrides applied when building a `Client`. Every field is optional.
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// Replaces `DEFAULT_BASE_URL`.
    pub base_url: Option<String>,
    /// Sent with every request unless overridden by `api-key` or
    /// `content-type`.
    pub headers: Vec<(String, String)>,
    /// Replaces the default `UreqTransport`.
    pub transport: Option<Arc<dyn Transport>>,
}

impl ClientConfig {
    /// Validated base URL without a trailing slash.
    pub(crate) fn resolve_base_url(&self) -> Result<String, ApiError> {
        let Some(url) = self.base_url.as_deref() else {
            return Ok(DEFAULT_BASE_URL.to_string());
        };
        let uri: Uri = url
            .parse()
            .map_err(|e| ApiError::Config(format!("invalid base URL {url:?}: {e}")))?;
        match uri.scheme_str() {
            Some("http" | "https") if uri.host().is_some() => Ok(url.trim_end_matches('/').to_string()),
            _ => Err(ApiError::Config(format!(
                "invalid base URL {url:?}: expected an absolute http(s) URL"
            ))),
        }
    }

    /// Checks every default header in insertion order.
    pub(crate) fn validate_headers(&self) -> Result<(), ApiError> {
        for (name, value) in &self.headers {
            HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| ApiError::Config(format!("invalid header name {name:?}")))?;
            HeaderValue::from_str(value)
                .map_err(|_| ApiError::Config(format!("invalid value for header {name:?}")))?;
        }
        Ok(())
    }
}

/// Chained construction of a `Client`.
///
/// ```no_run
/// let client = devto_core::Client::builder("my-api-key")
///     .base_url("http://localhost:3000")
///     .header("x-request-source", "docs")
///     .build()?;
/// # Ok::<(), devto_core::ApiError>(())
/// ```
#[derive(Clone)]
pub struct ClientBuilder {
    api_key: String,
    config: ClientConfig,
}

impl fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("api_key", &"<redacted>")
            .field("config", &self.config)
            .finish()
    }
}

impl ClientBuilder {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            config: ClientConfig::default(),
        }
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    /// Adds one default header. Repeating a name sends every value.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.headers.push((name.into(), value.into()));
        self
    }

    /// Replaces all default headers.
    pub fn headers(mut self, headers: Vec<(String, String)>) -> Self {
        self.config.headers = headers;
        self
    }

    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.config.transport = Some(Arc::new(transport));
        self
    }

    pub fn build(self) -> Result<Client, ApiError> {
        Client::with_config(self.api_key, self.config)
    }
}
