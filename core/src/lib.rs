//! Synchronous client for the dev.to (Forem) REST API.
//!
//! # Overview
//! Authenticates with an API key and maps the article and user endpoints
//! onto typed structures. Every call is a single blocking round trip.
//!
//! # Design
//! - `Client` is immutable after construction and shares its transport, so
//!   it can be cloned or put behind an `Arc` and used from many threads.
//! - Every operation funnels through `Client::make_request`, the one place
//!   that merges headers and turns 4xx/5xx responses into `ApiError::Remote`.
//! - The network sits behind the `Transport` trait; `UreqTransport` is the
//!   default and tests substitute an in-memory one.
//! - No retries, caching or pagination.

mod articles;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;
mod users;

pub use client::Client;
pub use config::{ClientBuilder, ClientConfig, DEFAULT_BASE_URL};
pub use error::{ApiError, RemoteError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{Transport, UreqTransport};
pub use types::{Article, CreateArticle, User};
