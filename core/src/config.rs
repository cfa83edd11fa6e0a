//! Executor configuration.

use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_LOG_CHARS: usize = 10_000;

/// Settings for `RequestExecutor::from_config`. Missing fields take their
/// defaults, so an empty JSON object is a valid config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    /// Maximum characters of request/response body text per log record.
    pub max_log_chars: usize,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            max_log_chars: DEFAULT_MAX_LOG_CHARS,
        }
    }
}
