//! Describer error types.

use thiserror::Error;

/// Errors from the remote describer call. A single failed call fails the
/// caller's tick; no retry or backoff happens at this layer.
#[derive(Debug, Error)]
pub enum DescriberError {
    #[error("describer request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("describer API returned {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("describer response contained no candidates")]
    EmptyResponse,
}
