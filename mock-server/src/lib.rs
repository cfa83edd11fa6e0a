//! Stateless HTTP server used to exercise the request executor over real
//! sockets.
//!
//! `/echo` reflects the received request back as JSON so tests can assert on
//! exactly what went over the wire; the other routes produce fixed responses,
//! `/delay/{ms}` after holding the connection open for `ms` milliseconds.

use std::collections::BTreeMap;
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::{Path, Query},
    http::{header, HeaderMap, Method, StatusCode, Uri},
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

/// The request as observed by the server.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct EchoedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    /// Lower-case header names, values in arrival order.
    pub headers: BTreeMap<String, Vec<String>>,
    pub body: String,
}

impl EchoedRequest {
    /// First value of `name`, which must be given in lower case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|values| values.first()).map(String::as_str)
    }
}

#[derive(Deserialize)]
pub struct LargeParams {
    #[serde(default)]
    pub size: usize,
}

pub const JSON_BODY: &str = r#"{"test":"test"}"#;

pub fn app() -> Router {
    Router::new()
        .route("/echo", any(echo))
        .route("/json", get(json))
        .route("/large", get(large))
        .route("/status/{code}", any(status))
        .route("/delay/{ms}", get(delay))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Json<EchoedRequest> {
    tracing::debug!(%method, %uri, body_len = body.len(), "echo");

    let mut echoed: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (name, value) in &headers {
        echoed
            .entry(name.as_str().to_string())
            .or_default()
            .push(String::from_utf8_lossy(value.as_bytes()).into_owned());
    }

    Json(EchoedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        headers: echoed,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}

async fn json() -> ([(header::HeaderName, &'static str); 1], &'static str) {
    ([(header::CONTENT_TYPE, "application/json")], JSON_BODY)
}

async fn large(Query(params): Query<LargeParams>) -> ([(header::HeaderName, &'static str); 1], String) {
    let body = format!(r#"{{"test":"{}"}}"#, "a".repeat(params.size));
    ([(header::CONTENT_TYPE, "application/json")], body)
}

async fn status(Path(code): Path<u16>) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_REQUEST)
}

/// Replies with `JSON_BODY` after `ms` milliseconds.
async fn delay(Path(ms): Path<u64>) -> ([(header::HeaderName, &'static str); 1], &'static str) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
    ([(header::CONTENT_TYPE, "application/json")], JSON_BODY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn echoed_request_roundtrips_through_json() {
        let mut headers = BTreeMap::new();
        headers.insert("content-type".to_string(), vec!["application/json".to_string()]);
        let echoed = EchoedRequest {
            method: "POST".to_string(),
            path: "/echo".to_string(),
            query: Some("a=1".to_string()),
            headers,
            body: r#"{"test":"test"}"#.to_string(),
        };
        let json = serde_json::to_string(&echoed).unwrap();
        let back: EchoedRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, echoed);
    }

    #[test]
    fn header_lookup_returns_first_value() {
        let mut headers = BTreeMap::new();
        headers.insert("x-multi".to_string(), vec!["one".to_string(), "two".to_string()]);
        let echoed = EchoedRequest {
            method: "GET".to_string(),
            path: "/echo".to_string(),
            query: None,
            headers,
            body: String::new(),
        };
        assert_eq!(echoed.header("x-multi"), Some("one"));
        assert_eq!(echoed.header("x-missing"), None);
    }

    #[test]
    fn large_params_default_to_zero() {
        let params: LargeParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.size, 0);
    }
}
