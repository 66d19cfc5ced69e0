//! Unified SDK error types.

use serde::Deserialize;
use thiserror::Error;

/// Top-level SDK error.
///
/// Stream failures have no variant here on purpose: an unexpected close or
/// connect failure surfaces as a session status, never as a propagated
/// error, and the rest of the application stays usable.
#[derive(Error, Debug)]
pub enum SdkError {
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Mutation failed: {0}")]
    Mutation(String),
}

/// HTTP-layer errors.
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("Request failed: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Server error {status}: {body}")]
    ServerError { status: u16, body: String },

    #[error("Rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Timeout")]
    Timeout,

    #[error("Max retries exceeded after {attempts} attempts: {last_error}")]
    MaxRetriesExceeded { attempts: u32, last_error: String },
}

/// Error body the server attaches to 4xx responses: `{"detail": "..."}`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

impl HttpError {
    /// Extract the server-provided `detail` field from an error body, if any.
    ///
    /// Mutation failures surface this text to the user when present; callers
    /// fall back to generic wording otherwise.
    pub fn server_detail(&self) -> Option<String> {
        let body = match self {
            HttpError::NotFound(body) => body,
            HttpError::BadRequest(body) => body,
            HttpError::ServerError { body, .. } => body,
            _ => return None,
        };
        serde_json::from_str::<ErrorBody>(body)
            .ok()
            .map(|parsed| parsed.detail)
    }
}
