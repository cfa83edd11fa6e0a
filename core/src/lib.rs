//! Synchronous JSON request helper.
//!
//! # Overview
//! `RequestExecutor::execute` encodes a `Request` body to JSON, sends one
//! blocking HTTP request and returns the fully read `Response`. Request and
//! response bodies can be logged at debug level, cut to a configurable number
//! of characters; the data sent and returned is never cut.
//!
//! # Design
//! - The executor is immutable after construction and safe to share between
//!   threads.
//! - Network I/O sits behind the `Transport` trait; `BlockingTransport`
//!   (reqwest) is the default.
//! - Logging goes through an `ExchangeLogger` passed to the executor;
//!   `TracingLogger` (the default) emits `tracing` events.
//! - Two error classes: `Error::Encoding` before any I/O, `Error::Transport`
//!   for everything after. No retries.

pub mod config;
pub mod error;
pub mod executor;
pub mod http;
pub mod logging;
pub mod transport;
pub mod types;

pub use config::ExecutorConfig;
pub use error::Error;
pub use executor::RequestExecutor;
pub use http::{HttpRequest, HttpResponse};
pub use logging::{truncate_chars, ExchangeLogger, NoopLogger, RequestRecord, ResponseRecord, TracingLogger};
pub use transport::{BlockingTransport, Transport};
pub use types::{Headers, QueryParams, Request, Response};
