//! Shared HTTP response helpers.
//!
//! Centralizes status-code checks so the operation modules stay focused on
//! request construction and response mapping. CouchDB reports failures as
//! `{"error": "...", "reason": "..."}`; the status code picks the
//! [`ClientError`] variant.

use serde::Deserialize;

use crate::error::ClientError;

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: String,
    #[serde(default)]
    reason: String,
}

/// Check an HTTP response for error statuses.
///
/// Returns the response unchanged on success. `resource` names what was
/// requested and ends up in [`ClientError::NotFound`] and
/// [`ClientError::Conflict`].
pub async fn check_response(
    resp: reqwest::Response,
    resource: &str,
) -> Result<reqwest::Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    if status.as_u16() == 429 {
        return Err(ClientError::RateLimited {
            retry_after_secs: parse_retry_after(&resp),
        });
    }

    let text = resp.text().await.unwrap_or_default();
    let body = parse_error_body(&text);
    tracing::debug!(status = status.as_u16(), resource, error = %body.error, "couchdb error response");

    Err(match status.as_u16() {
        401 | 403 => ClientError::Unauthorized { reason: body.reason },
        404 => ClientError::NotFound {
            resource: resource.to_string(),
            reason: body.reason,
        },
        409 => ClientError::Conflict {
            resource: resource.to_string(),
            reason: body.reason,
        },
        412 => ClientError::PreconditionFailed { reason: body.reason },
        code => ClientError::Api {
            status: code,
            error: body.error,
            reason: body.reason,
        },
    })
}

/// Parse a CouchDB error body; a non-JSON body becomes the reason.
fn parse_error_body(text: &str) -> ErrorBody {
    serde_json::from_str::<ErrorBody>(text).unwrap_or_else(|_| ErrorBody {
        error: String::new(),
        reason: text.trim().to_string(),
    })
}

/// Parse the `Retry-After` header as seconds, falling back to 60 s.
fn parse_retry_after(resp: &reqwest::Response) -> u64 {
    resp.headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(60)
}
