//! Pluggable HTTP transport.
//!
//! # Design
//! The executor never touches sockets itself; it hands a prepared
//! `HttpRequest` to a `Transport` and gets back a fully read `HttpResponse`.
//! `BlockingTransport` is the default, backed by `reqwest::blocking`, so every
//! call blocks the calling thread until the body has been drained.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::error::Error;
use crate::http::{HttpRequest, HttpResponse};
use crate::types::Headers;

pub trait Transport {
    /// Send `request` and read the whole response body. Any failure, including
    /// one partway through the body, is an `Error::Transport`.
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, Error>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, Error> {
        (**self).send(request)
    }
}

/// Synchronous transport over a `reqwest::blocking::Client`.
///
/// Must not be used from inside an async runtime.
#[derive(Debug, Clone)]
pub struct BlockingTransport {
    client: reqwest::blocking::Client,
}

impl BlockingTransport {
    /// Client with no overall deadline. A call waits as long as the server
    /// takes; use `with_client` to bound it.
    pub fn new() -> Result<Self, Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(None)
            .build()
            .map_err(|e| Error::transport(&e))?;
        Ok(Self { client })
    }

    /// Use a preconfigured client, e.g. one with timeouts set.
    pub fn with_client(client: reqwest::blocking::Client) -> Self {
        Self { client }
    }
}

impl Transport for BlockingTransport {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, Error> {
        let headers = header_map(&request.headers)?;

        let mut builder = self
            .client
            .request(request.method, request.url)
            .headers(headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().map_err(|e| Error::transport(&e))?;
        let status = response.status().as_u16();
        let headers = collect_headers(response.headers());
        // Consumes the response, so the connection is released whether or not
        // the read succeeds.
        let body = response.bytes().map_err(|e| Error::transport(&e))?;

        Ok(HttpResponse {
            status,
            headers,
            body: body.to_vec(),
        })
    }
}

fn header_map(headers: &[(String, String)]) -> Result<HeaderMap, Error> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| Error::Transport(format!("invalid header name {name:?}: {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| Error::Transport(format!("invalid value for header {name}: {e}")))?;
        map.append(name, value);
    }
    Ok(map)
}

fn collect_headers(headers: &HeaderMap) -> Headers {
    let mut collected = Headers::new();
    for (name, value) in headers {
        collected
            .entry(name.as_str().to_string())
            .or_default()
            .push(String::from_utf8_lossy(value.as_bytes()).into_owned());
    }
    collected
}
