//! Cross-cutting error types.
//!
//! Transport errors live in `couch-client`; this module only covers what can
//! go wrong while shaping documents and JSON.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A document or value failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A required document field is absent.
    #[error("Missing document field '{field}'")]
    MissingField { field: String },
}
