//! The request pipeline shared by every API operation.
//!
//! # Design
//! `Client` holds the base URL, API key, default headers and transport, and
//! never changes after construction. All resource operations go through
//! `make_request`, which is the single place headers are merged and error
//! responses are mapped to `ApiError::Remote`.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::{ClientBuilder, ClientConfig};
use crate::error::{ApiError, RemoteError, UNPARSEABLE_ERROR_BODY};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::{Transport, UreqTransport};

const API_KEY_HEADER: &str = "api-key";
const CONTENT_TYPE_HEADER: &str = "content-type";
const JSON: &str = "application/json";

/// Synchronous client for the dev.to API.
///
/// Cheap to clone; clones share the transport.
#[derive(Clone)]
pub struct Client {
    base_url: String,
    api_key: String,
    headers: Vec<(String, String)>,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("headers", &self.headers)
            .field("transport", &self.transport)
            .finish()
    }
}

impl Client {
    /// Client for the production API with the default transport.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ApiError> {
        Self::with_config(api_key, ClientConfig::default())
    }

    pub fn builder(api_key: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(api_key)
    }

    /// Fails with `ApiError::Config` when `api_key` is empty or an override
    /// in `config` is invalid.
    pub fn with_config(api_key: impl Into<String>, config: ClientConfig) -> Result<Self, ApiError> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(ApiError::Config("invalid credentials: key must not be empty".to_string()));
        }

        let base_url = config.resolve_base_url()?;
        config.validate_headers()?;

        let transport = match config.transport {
            Some(transport) => transport,
            None => Arc::new(UreqTransport::new()),
        };

        Ok(Self {
            base_url,
            api_key,
            headers: config.headers,
            transport,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `base_url` joined with `path`, which must start with `/`.
    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Defaults first, then `api-key` and `content-type`, which replace any
    /// default of the same name.
    fn request_headers(&self) -> Vec<(String, String)> {
        let mut headers: Vec<(String, String)> = self
            .headers
            .iter()
            .filter(|(name, _)| {
                !name.eq_ignore_ascii_case(API_KEY_HEADER) && !name.eq_ignore_ascii_case(CONTENT_TYPE_HEADER)
            })
            .cloned()
            .collect();
        headers.push((API_KEY_HEADER.to_string(), self.api_key.clone()));
        headers.push((CONTENT_TYPE_HEADER.to_string(), JSON.to_string()));
        headers
    }

    /// Send one request to `url` and return the raw response.
    ///
    /// Statuses of 400 and above never reach the caller as a response: the
    /// body is decoded into `ApiError::Remote`, falling back to a fixed
    /// message with the response status when the body is not the expected
    /// shape.
    pub fn make_request(&self, method: HttpMethod, url: &str, body: Option<String>) -> Result<HttpResponse, ApiError> {
        let request = HttpRequest {
            method,
            url: url.to_string(),
            headers: self.request_headers(),
            body,
        };

        debug!(%method, url, "sending request");
        let response = self.transport.execute(&request)?;
        debug!(%method, url, status = response.status, bytes = response.body.len(), "received response");

        if response.is_error() {
            return Err(ApiError::Remote(decode_error(&response)));
        }
        Ok(response)
    }

    /// `make_request` followed by decoding the body as `T`.
    pub(crate) fn request_json<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<String>,
        context: &str,
    ) -> Result<T, ApiError> {
        let response = self.make_request(method, &self.url(path), body)?;
        serde_json::from_slice(&response.body).map_err(|e| ApiError::Deserialization(format!("{context}: {e}")))
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
    status: Option<u16>,
}

fn decode_error(response: &HttpResponse) -> RemoteError {
    match serde_json::from_slice::<ErrorBody>(&response.body) {
        Ok(body) => RemoteError {
            message: body.error,
            status: body.status.unwrap_or(response.status),
        },
        Err(e) => {
            warn!(status = response.status, error = %e, "error response body is not the documented shape");
            RemoteError {
                message: UNPARSEABLE_ERROR_BODY.to_string(),
                status: response.status,
            }
        }
    }
}
