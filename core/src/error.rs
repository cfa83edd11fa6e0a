//! Error type for request execution.
//!
//! # Design
//! Two failure classes only. `Encoding` is raised before any network action,
//! so seeing it guarantees nothing was sent. Everything that happens from
//! request construction onwards is `Transport`, carrying the diagnostic text
//! of the underlying HTTP stack. Neither is retried.

use std::error::Error as StdError;

/// Errors returned by `RequestExecutor::execute`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request body could not be serialized to JSON.
    #[error("encoding failed: {0}")]
    Encoding(String),

    /// Building, sending, or reading the HTTP exchange failed.
    #[error("transport failed: {0}")]
    Transport(String),
}

impl Error {
    /// Wrap an error from the HTTP stack, keeping its whole `source()` chain
    /// in the message.
    pub(crate) fn transport(err: &dyn StdError) -> Self {
        Error::Transport(describe(err))
    }

    pub fn is_encoding(&self) -> bool {
        matches!(self, Error::Encoding(_))
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }

    /// Diagnostic text without the variant prefix.
    pub fn message(&self) -> &str {
        match self {
            Error::Encoding(msg) | Error::Transport(msg) => msg,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Encoding(err.to_string())
    }
}

/// Join an error and its sources with `": "`, skipping sources whose text is
/// already part of the message.
fn describe(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug)]
    struct Layer {
        text: &'static str,
        inner: Option<Box<Layer>>,
    }

    impl fmt::Display for Layer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.text)
        }
    }

    impl StdError for Layer {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            self.inner.as_deref().map(|l| l as &(dyn StdError + 'static))
        }
    }

    #[test]
    fn transport_joins_source_chain() {
        let err = Layer {
            text: "error sending request",
            inner: Some(Box::new(Layer {
                text: "client error (Connect)",
                inner: Some(Box::new(Layer {
                    text: "Connection refused",
                    inner: None,
                })),
            })),
        };
        let wrapped = Error::transport(&err);
        assert_eq!(
            wrapped.message(),
            "error sending request: client error (Connect): Connection refused"
        );
        assert!(wrapped.is_transport());
    }

    #[test]
    fn transport_skips_repeated_source_text() {
        let err = Layer {
            text: "builder error: relative URL without a base",
            inner: Some(Box::new(Layer {
                text: "relative URL without a base",
                inner: None,
            })),
        };
        assert_eq!(
            Error::transport(&err).message(),
            "builder error: relative URL without a base"
        );
    }

    #[test]
    fn json_errors_become_encoding_errors() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let wrapped = Error::from(err);
        assert!(wrapped.is_encoding());
        assert!(wrapped.to_string().starts_with("encoding failed: "));
    }
}
