// ── Core error types ──
//
// User-facing errors from mealdeck-core. The `From<mealdeck_api::Error>`
// impl translates transport-layer errors into domain variants. `CoreError`
// is `Clone` because one in-flight fetch result is handed to every reader
// that joined it.

use thiserror::Error;

use crate::form::FormErrors;

/// Unified error type for the core crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    // ── Request errors ───────────────────────────────────────────────
    /// Non-success HTTP status from the backend.
    #[error("API Error: {status} {status_text}")]
    RequestFailed { status: u16, status_text: String },

    #[error("Cannot reach food API at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Input errors ─────────────────────────────────────────────────
    /// Form input rejected before any network call.
    #[error("Validation failed: {0}")]
    ValidationFailed(FormErrors),

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Whether the query/mutation layers should spend a retry on this error.
    ///
    /// Everything that reached (or tried to reach) the network is retried;
    /// bad configuration and rejected input never are.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::Config { .. } | Self::ValidationFailed(_))
    }

    /// Returns `true` for a 404 from the backend.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::RequestFailed { status: 404, .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<mealdeck_api::Error> for CoreError {
    fn from(err: mealdeck_api::Error) -> Self {
        match err {
            mealdeck_api::Error::RequestFailed {
                status,
                status_text,
            } => CoreError::RequestFailed {
                status,
                status_text,
            },
            mealdeck_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                }
            }
            mealdeck_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid API URL: {e}"),
            },
            mealdeck_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            mealdeck_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
            mealdeck_api::Error::Encoding(e) => {
                CoreError::Internal(format!("Failed to encode request body: {e}"))
            }
        }
    }
}
