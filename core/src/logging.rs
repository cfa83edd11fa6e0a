//! Debug records emitted around each HTTP exchange.
//!
//! The executor calls an `ExchangeLogger` it was given rather than a global
//! logger, so tests can capture records directly. `TracingLogger` forwards to
//! `tracing` at debug level.

/// Fields logged before the request goes out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestRecord<'a> {
    pub method: &'a str,
    pub url: &'a str,
    /// `None` when body logging is off or there is no body. `Some("")` is a
    /// body truncated to zero characters.
    pub body: Option<&'a str>,
}

/// Fields logged after the response has been read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseRecord<'a> {
    pub status_code: u16,
    pub body: Option<&'a str>,
}

pub trait ExchangeLogger: Send + Sync {
    fn request(&self, record: &RequestRecord<'_>);
    fn response(&self, record: &ResponseRecord<'_>);
}

/// Emits `tracing` debug events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl ExchangeLogger for TracingLogger {
    fn request(&self, record: &RequestRecord<'_>) {
        tracing::debug!(
            method = record.method,
            url = record.url,
            body = record.body.unwrap_or_default(),
            "sending request"
        );
    }

    fn response(&self, record: &ResponseRecord<'_>) {
        tracing::debug!(
            status_code = record.status_code,
            body = record.body.unwrap_or_default(),
            "received response"
        );
    }
}

/// Discards every record.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl ExchangeLogger for NoopLogger {
    fn request(&self, _record: &RequestRecord<'_>) {}
    fn response(&self, _record: &ResponseRecord<'_>) {}
}

/// The first `limit` characters of `text`, or `text` unchanged when it is not
/// longer than that. Counts chars, not bytes, and adds no marker.
pub fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
