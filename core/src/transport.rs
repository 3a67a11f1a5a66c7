//! The network boundary of the client.
//!
//! # Design
//! `Transport` is the only place bytes leave the process. `Client` builds an
//! `HttpRequest`, the transport executes it and returns the status, headers
//! and body without interpreting them. Status handling stays in `Client`, so
//! a transport must hand back 4xx/5xx responses as data rather than errors.

use std::fmt;
use std::time::Duration;

use ureq::http::Uri;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Executes one HTTP round trip.
///
/// Implementations must be safe to share between threads; a `Client` holds
/// its transport behind an `Arc`.
pub trait Transport: fmt::Debug + Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// Default transport backed by a `ureq` agent.
///
/// The agent keeps a connection pool, so one transport should be reused for
/// many requests.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
    timeout: Option<Duration>,
}

impl UreqTransport {
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Transport whose requests fail with `ApiError::Transport` once
    /// `timeout` has elapsed.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::build(Some(timeout))
    }

    fn build(timeout: Option<Duration>) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .new_agent();
        Self { agent, timeout }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqTransport")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        request
            .url
            .parse::<Uri>()
            .map_err(|e| ApiError::InvalidRequest(format!("{} {}: {e}", request.method, request.url)))?;

        let result = match (request.method, request.body.as_deref()) {
            (HttpMethod::Get, _) => {
                let mut builder = self.agent.get(&request.url);
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.call()
            }
            (HttpMethod::Post | HttpMethod::Put, body) => {
                let mut builder = match request.method {
                    HttpMethod::Put => self.agent.put(&request.url),
                    _ => self.agent.post(&request.url),
                };
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                match body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        };

        let mut response = result.map_err(|e| match e {
            ureq::Error::BadUri(msg) => ApiError::InvalidRequest(msg),
            ureq::Error::Http(e) => ApiError::InvalidRequest(e.to_string()),
            other => ApiError::Transport(other.to_string()),
        })?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        // No size cap: a listing carries every article's markdown.
        let body = response
            .body_mut()
            .with_config()
            .limit(u64::MAX)
            .read_to_vec()
            .map_err(|e| ApiError::Io(e.to_string()))?;

        Ok(HttpResponse { status, headers, body })
    }
}

#[cfg(test)]
mod tests {
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;

    use super::*;

    /// Serve one connection: read the request head, then write `reply` and close.
    fn serve_once(reply: &'static [u8]) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream);
            let mut line = String::new();
            while reader.read_line(&mut line).unwrap() > 0 && line != "\r\n" {
                line.clear();
            }
            let mut stream = reader.into_inner();
            stream.write_all(reply).unwrap();
        });
        format!("http://{addr}/users/me")
    }

    fn request(url: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: url.to_string(),
            headers: Vec::new(),
            body: None,
        }
    }

    #[test]
    fn malformed_url_is_a_request_build_error() {
        let err = UreqTransport::new().execute(&request("http://exa mple.com/")).unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(_)), "got {err:?}");
    }

    #[test]
    fn unreachable_host_is_a_transport_error() {
        // Port 9 on loopback is not expected to have a listener.
        let transport = UreqTransport::with_timeout(Duration::from_secs(2));
        let err = transport.execute(&request("http://127.0.0.1:9/users/me")).unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)), "got {err:?}");
    }

    #[test]
    fn truncated_body_is_an_io_error() {
        let url = serve_once(b"HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 100\r\n\r\n{\"id\":1234");
        let err = UreqTransport::with_timeout(Duration::from_secs(5))
            .execute(&request(&url))
            .unwrap_err();
        assert!(matches!(err, ApiError::Io(_)), "got {err:?}");
    }

    #[test]
    fn complete_body_is_returned() {
        let url = serve_once(b"HTTP/1.1 200 OK\r\ncontent-length: 11\r\nx-extra: yes\r\n\r\n{\"id\":1234}");
        let response = UreqTransport::new().execute(&request(&url)).unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.header("x-extra"), Some("yes"));
        assert_eq!(response.body, br#"{"id":1234}"#.to_vec());
    }
}
