//! Error types.

use thiserror::Error;

use crate::response::Response;

/// Result type for all sdkit operations.
pub type Result<T> = std::result::Result<T, SdkError>;

/// Errors produced while building routes or executing calls.
#[derive(Debug, Error)]
pub enum SdkError {
    /// Malformed path-template syntax. Raised when the route's template is
    /// parsed, before anything touches the network.
    #[error("invalid path template: {0}")]
    Template(String),

    /// A required (non-optional) path segment has no binding in the bag.
    #[error("no values provided for key `{key}`")]
    MissingParam {
        /// The unbound template key.
        key: String,
    },

    /// The base URI joined with the route path is not an absolute URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The transport failed before producing any response. Post-response
    /// hooks do not run for this variant.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server replied with a non-2xx status. Carries the full response
    /// envelope, after the post-response hook chain has seen it.
    #[error("remote error: status {status}")]
    Remote {
        /// HTTP status code.
        status: u16,
        /// The response the server sent along with the error status.
        response: Response,
    },

    /// Response body deserialization error.
    #[error("JSON error: {0}")]
    Json(String),
}

impl SdkError {
    /// The HTTP status code, when the server responded at all.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// The attached response envelope, when one exists.
    pub fn response(&self) -> Option<&Response> {
        match self {
            Self::Remote { response, .. } => Some(response),
            _ => None,
        }
    }

    /// Whether this error carries a missing-parameter diagnosis.
    pub fn is_missing_param(&self) -> bool {
        matches!(self, Self::MissingParam { .. })
    }
}
