//! Error type shared by the collaborator adapters.
//!
//! [`ApiError`] covers what can go wrong talking to the record store, the
//! meeting service or the mail relay. The workflow engine wraps it into the
//! matching [`WorkflowError`](crate::error::WorkflowError) variant.

use thiserror::Error;

/// Errors returned by an external collaborator.
///
/// - [`RateLimited`](ApiError::RateLimited): HTTP 429
/// - [`Status`](ApiError::Status): any other non-success status
/// - [`Network`](ApiError::Network): transport failure (DNS, refused, timeout)
/// - [`Decode`](ApiError::Decode): a success response with an unreadable body
/// - [`Incomplete`](ApiError::Incomplete): a readable response missing required values
#[derive(Debug, Error)]
pub enum ApiError {
    /// `retry_after_ms` is taken from the `retry-after` header when present.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// Status code plus the response body as the message.
    #[error("API error (status {status}): {message}")]
    Status { status: u16, message: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("incomplete response: missing {missing}")]
    Incomplete { missing: String },
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Status { status: 404, .. })
    }
}
