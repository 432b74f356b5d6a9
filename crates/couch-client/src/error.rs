//! Client error types.

use couch_core::CoreError;
use thiserror::Error;

/// Errors that can occur when talking to a CouchDB server.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with an error not covered by a dedicated variant.
    #[error("CouchDB error ({status}) {error}: {reason}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// CouchDB `error` token, e.g. `bad_request`.
        error: String,
        /// CouchDB `reason` text or the raw response body.
        reason: String,
    },

    /// Database, document or view does not exist.
    #[error("not found: {resource} ({reason})")]
    NotFound { resource: String, reason: String },

    /// Revision mismatch on write.
    #[error("conflict on {resource}: {reason}")]
    Conflict { resource: String, reason: String },

    /// Missing or rejected credentials (401/403).
    #[error("unauthorized: {reason}")]
    Unauthorized { reason: String },

    /// Precondition failed (412), e.g. the database already exists.
    #[error("precondition failed: {reason}")]
    PreconditionFailed { reason: String },

    /// The server returned 429 Too Many Requests.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_secs: u64,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Core(#[from] CoreError),

    /// A caller-supplied argument cannot be sent to the server.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Required configuration is missing.
    #[error("not configured: {0}")]
    NotConfigured(String),
}

impl ClientError {
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
