//! Wire-level request and response data exchanged with a `Transport`.
//!
//! # Design
//! `HttpRequest` is the fully prepared outgoing call: method and URL already
//! validated by the `http`/`url` types, query string encoded, header set
//! resolved, body bytes final. A transport only has to put it on the wire,
//! which keeps the preparation rules testable without sockets.

use reqwest::Method;
use url::Url;

use crate::error::Error;
use crate::types::{Headers, QueryParams};

pub const CONTENT_TYPE: &str = "Content-Type";
pub const APPLICATION_JSON: &str = "application/json";

/// A prepared outgoing request.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    /// Sent in order; a name may repeat.
    pub headers: Vec<(String, String)>,
    /// `None` sends no body at all.
    pub body: Option<Vec<u8>>,
}

/// A fully read response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Headers,
    pub body: Vec<u8>,
}

impl HttpRequest {
    /// Validate `method` and `url`, encode `params` into the query string and
    /// resolve the header set.
    ///
    /// A non-empty `headers` map replaces the header set wholesale, then
    /// `Content-Type: application/json` is forced regardless of any
    /// caller-supplied value or the presence of a body.
    pub fn prepare(
        method: &str,
        url: &str,
        params: &QueryParams,
        headers: &Headers,
        body: Option<Vec<u8>>,
    ) -> Result<Self, Error> {
        let method = parse_method(method)?;
        let mut url = parse_url(&method, url)?;
        encode_query(&mut url, params);

        Ok(HttpRequest {
            method,
            url,
            headers: resolve_headers(headers),
            body,
        })
    }

    /// All values of header `name`, compared case-insensitively.
    pub fn header_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.headers
            .iter()
            .filter(move |(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

fn parse_method(method: &str) -> Result<Method, Error> {
    if method.is_empty() {
        return Ok(Method::GET);
    }
    Method::from_bytes(method.as_bytes())
        .map_err(|e| Error::Transport(format!("invalid method {method:?}: {e}")))
}

fn parse_url(method: &Method, raw: &str) -> Result<Url, Error> {
    let url = Url::parse(raw).map_err(|e| match e {
        url::ParseError::RelativeUrlWithoutBase => {
            Error::Transport(format!("{method} {raw:?}: missing protocol scheme ({e})"))
        }
        _ => Error::Transport(format!("{method} {raw:?}: {e}")),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(Error::Transport(format!(
            "{method} {raw:?}: unsupported protocol scheme {other:?}"
        ))),
    }
}

/// Replace the query string with `params`. Keys go out in sorted order, values
/// in the order given. An empty map clears the query string.
fn encode_query(url: &mut Url, params: &QueryParams) {
    let pairs: Vec<(&str, &str)> = params
        .iter()
        .flat_map(|(key, values)| values.iter().map(move |v| (key.as_str(), v.as_str())))
        .collect();

    if pairs.is_empty() {
        url.set_query(None);
        return;
    }

    let mut query = url.query_pairs_mut();
    query.clear();
    for (key, value) in pairs {
        query.append_pair(key, value);
    }
}

fn resolve_headers(headers: &Headers) -> Vec<(String, String)> {
    let mut resolved: Vec<(String, String)> = headers
        .iter()
        .filter(|(name, _)| !name.eq_ignore_ascii_case(CONTENT_TYPE))
        .flat_map(|(name, values)| values.iter().map(move |v| (name.clone(), v.clone())))
        .collect();
    resolved.push((CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string()));
    resolved
}
