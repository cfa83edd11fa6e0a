//! Executes one JSON request per call and logs truncated bodies around it.
//!
//! # Design
//! `RequestExecutor` holds only its log limit, a transport and a logger, none
//! of which change after construction, so one executor can serve many threads
//! at once. All per-call state (encoded body, response buffer) lives on the
//! calling thread's stack.
//!
//! A call runs encode, log, prepare, send, read, log, return. Encoding happens
//! first so a body with no JSON form fails before anything reaches the
//! network. Truncation only ever applies to the log records; the bytes sent
//! and the bytes returned are always complete.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::config::ExecutorConfig;
use crate::error::Error;
use crate::http::HttpRequest;
use crate::logging::{truncate_chars, ExchangeLogger, RequestRecord, ResponseRecord, TracingLogger};
use crate::transport::{BlockingTransport, Transport};
use crate::types::{Request, Response};

#[derive(Clone)]
pub struct RequestExecutor<T = BlockingTransport> {
    max_log_chars: usize,
    transport: T,
    logger: Arc<dyn ExchangeLogger>,
}

impl RequestExecutor<BlockingTransport> {
    /// Executor over a blocking client with no deadline, logging through
    /// `tracing`. Fails only if the HTTP client cannot be initialised.
    pub fn new(max_log_chars: usize) -> Result<Self, Error> {
        Ok(Self::with_transport(max_log_chars, BlockingTransport::new()?))
    }

    pub fn from_config(config: &ExecutorConfig) -> Result<Self, Error> {
        Self::new(config.max_log_chars)
    }
}

impl<T: Transport> RequestExecutor<T> {
    pub fn with_transport(max_log_chars: usize, transport: T) -> Self {
        Self {
            max_log_chars,
            transport,
            logger: Arc::new(TracingLogger),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn ExchangeLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn max_log_chars(&self) -> usize {
        self.max_log_chars
    }

    /// Send `request` and read the full response.
    ///
    /// Blocks until the response body has been read. Fails with
    /// `Error::Encoding` when the body cannot be serialized, in which case no
    /// connection is attempted, and with `Error::Transport` for anything that
    /// goes wrong from request construction to the end of the body.
    pub fn execute<'r, B: Serialize>(&self, request: &'r Request<B>) -> Result<Response<'r, B>, Error> {
        let payload = match &request.body {
            Some(body) => Some(serde_json::to_string(body)?),
            None => None,
        };

        self.logger.request(&RequestRecord {
            method: &request.method,
            url: &request.url,
            body: payload
                .as_deref()
                .filter(|_| request.log_request_body)
                .map(|text| truncate_chars(text, self.max_log_chars)),
        });

        let outgoing = HttpRequest::prepare(
            &request.method,
            &request.url,
            &request.params,
            &request.headers,
            payload.map(String::into_bytes),
        )?;
        let incoming = self.transport.send(outgoing)?;

        {
            let text = request
                .log_response_body
                .then(|| String::from_utf8_lossy(&incoming.body));
            self.logger.response(&ResponseRecord {
                status_code: incoming.status,
                body: text.as_deref().map(|t| truncate_chars(t, self.max_log_chars)),
            });
        }

        Ok(Response {
            status_code: incoming.status,
            body: incoming.body,
            headers: incoming.headers,
            request,
        })
    }
}

impl<T: fmt::Debug> fmt::Debug for RequestExecutor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("max_log_chars", &self.max_log_chars)
            .field("transport", &self.transport)
            .finish_non_exhaustive()
    }
}
