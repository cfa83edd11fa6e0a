//! Caller-facing request and response descriptions.
//!
//! # Design
//! `Request` is plain owned data built by the caller and only ever borrowed by
//! the executor. `Response` borrows the request it answers, so a caller that
//! fans out many calls can match results to inputs without cloning.
//!
//! The body is generic over `Serialize`, defaulting to `serde_json::Value` for
//! dynamic payloads. Types with no JSON mapping do not compile; serializer
//! failures at runtime surface as `Error::Encoding`.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::de::DeserializeOwned;

/// Header name to values, in the order they are sent.
pub type Headers = BTreeMap<String, Vec<String>>;

/// Query parameter name to values, in the order they are encoded.
pub type QueryParams = BTreeMap<String, Vec<String>>;

/// An HTTP call to make.
#[derive(Debug, Clone, PartialEq)]
pub struct Request<B = serde_json::Value> {
    /// HTTP method token. Empty means `GET`.
    pub method: String,
    pub url: String,
    /// Encoded to JSON and sent as the request body when present.
    pub body: Option<B>,
    /// When non-empty, replaces the outgoing header set entirely.
    /// `Content-Type: application/json` is always forced afterwards.
    pub headers: Headers,
    /// Replaces the query string of `url`.
    pub params: QueryParams,
    pub log_request_body: bool,
    pub log_response_body: bool,
}

impl<B> Default for Request<B> {
    fn default() -> Self {
        Self {
            method: String::new(),
            url: String::new(),
            body: None,
            headers: Headers::new(),
            params: QueryParams::new(),
            log_request_body: false,
            log_response_body: false,
        }
    }
}

impl<B> Request<B> {
    pub fn new(method: &str, url: &str) -> Self {
        Self {
            method: method.to_string(),
            url: url.to_string(),
            ..Self::default()
        }
    }

    pub fn with_body(mut self, body: B) -> Self {
        self.body = Some(body);
        self
    }

    /// Append a value for `name`.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.entry(name.to_string()).or_default().push(value.to_string());
        self
    }

    /// Append a value for query parameter `name`.
    pub fn param(mut self, name: &str, value: &str) -> Self {
        self.params.entry(name.to_string()).or_default().push(value.to_string());
        self
    }

    pub fn log_bodies(mut self, request: bool, response: bool) -> Self {
        self.log_request_body = request;
        self.log_response_body = response;
        self
    }
}

/// The outcome of a completed HTTP call.
#[derive(Debug, Clone, PartialEq)]
pub struct Response<'r, B = serde_json::Value> {
    pub status_code: u16,
    /// The full response body, never truncated.
    pub body: Vec<u8>,
    /// Header names are lower-case as reported by the transport, so
    /// `headers["Content-Type"]` panics where `headers["content-type"]` does
    /// not. Use `Response::header` for a case-insensitive lookup.
    pub headers: Headers,
    pub request: &'r Request<B>,
}

impl<B> Response<'_, B> {
    /// First value of header `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .and_then(|(_, values)| values.first())
            .map(String::as_str)
    }

    /// The body as UTF-8 text, replacing invalid sequences.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_slice(&self.body)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}
