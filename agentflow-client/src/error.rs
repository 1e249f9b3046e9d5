//! Error type shared by every client operation.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

/// Failures surfaced by the API client and the execution session.
///
/// `Validation` failures never reach the network; everything else is a
/// `NetworkError` in the taxonomy sense — caught at the call site, logged,
/// and surfaced once, with no automatic retry anywhere.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Local pre-network validation failure.
    #[error("validation failed: {0}")]
    Validation(#[from] agentflow_sdk::ValidationError),

    /// The request could not be sent or the transport failed mid-flight.
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status.
    #[error("backend returned {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The response body did not match the expected shape.
    #[error("failed to decode response: {0}")]
    Json(#[from] serde_json::Error),

    /// One or more requests in an unordered batch failed.
    #[error("{failed} of {total} batch requests failed")]
    Batch { failed: usize, total: usize },

    /// A displayed-result lookup named an order that is not on display.
    #[error("no displayed result with order {0}")]
    UnknownResult(u32),
}

impl ClientError {
    /// Build an API error from a status and the raw response body.
    pub(crate) fn api(status: reqwest::StatusCode, body: String) -> Self {
        ClientError::Api { status, body }
    }
}
