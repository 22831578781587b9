//! Transport abstraction.
//!
//! # Responsibilities
//! - Transport-agnostic request/response types
//! - The [`Transport`] capability the interceptor sends through
//! - Production backend over reqwest (`reqwest.rs`)
//!
//! # Design Decisions
//! - `Transport` returns a boxed future so it stays dyn-compatible and
//!   can be swapped for a programmable fake in tests
//! - Header lookup is case-insensitive, matching HTTP semantics
//! - A transport `Err` means no response arrived: no completion event,
//!   no policy evaluation. Non-2xx responses with a body are `Ok` and
//!   flow through the full pipeline

pub mod reqwest;

pub use self::reqwest::ReqwestTransport;

use futures_util::future::BoxFuture;
use thiserror::Error;

/// Error type for transport-level failures.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request never produced a response (connect failure, timeout,
    /// broken connection).
    #[error("network error: {0}")]
    Network(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The request could not be constructed (bad method, bad URL).
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// An outgoing request, before correlation tagging.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method, e.g. "GET".
    pub method: String,

    /// Absolute request URL.
    pub url: String,

    /// Header name/value pairs, in insertion order.
    pub headers: Vec<(String, String)>,

    /// Optional request body.
    pub body: Option<String>,
}

impl HttpRequest {
    /// Create a request with no headers and no body.
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// GET request for `url`.
    pub fn get(url: impl Into<String>) -> Self {
        Self::new("GET", url)
    }

    /// POST request for `url` carrying `body`.
    pub fn post(url: impl Into<String>, body: impl Into<String>) -> Self {
        let mut request = Self::new("POST", url);
        request.body = Some(body.into());
        request
    }

    /// Builder-style header append.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Set a header, replacing any existing value under the same name
    /// (case-insensitive).
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers
            .retain(|(existing, _)| !existing.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value.into()));
    }
}

/// A response as seen by the interception layer.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,

    /// Response header name/value pairs.
    pub headers: Vec<(String, String)>,

    /// Raw response body.
    pub body: String,
}

impl HttpResponse {
    /// First header value under `name`, case-insensitive.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Black-box HTTP transport. Issues the network request and resumes the
/// caller with the response; timeout and connection management live
/// here, not in the interception layer.
pub trait Transport: Send + Sync {
    /// Send the request and await the transport-level outcome.
    fn send(&self, request: HttpRequest) -> BoxFuture<'_, Result<HttpResponse, TransportError>>;
}
