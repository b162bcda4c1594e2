//! Error types for the Readwise client.

use std::time::Duration;
use thiserror::Error;

/// Error building a [`Client`](crate::Client).
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("token is not a valid header value")]
    InvalidToken,

    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Main error type for API operations.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("unauthorized: token was rejected")]
    Unauthorized,

    #[error("forbidden")]
    Forbidden,

    #[error("not found: {url}")]
    NotFound { url: String },

    #[error("rate limited")]
    RateLimited { retry_after: Option<Duration> },

    #[error("invalid request: {message}")]
    BadRequest { message: String },

    #[error("server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("timeout")]
    Timeout,

    #[error("json error: {0}")]
    Json(String),
}

impl ApiError {
    /// Create error from HTTP status code
    pub fn from_status(status: u16, url: &str) -> Self {
        match status {
            400 => ApiError::BadRequest {
                message: "Bad request".to_string(),
            },
            401 => ApiError::Unauthorized,
            403 => ApiError::Forbidden,
            404 => ApiError::NotFound {
                url: url.to_string(),
            },
            429 => ApiError::RateLimited { retry_after: None },
            _ if status >= 500 => ApiError::ServerError {
                status,
                message: format!("Server error {}", status),
            },
            _ => ApiError::ServerError {
                status,
                message: format!("Unexpected status {}", status),
            },
        }
    }

    /// Whether a caller could reasonably retry the failed request.
    ///
    /// The client itself never retries; this is a hint for callers that do.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::RateLimited { .. } => true,
            ApiError::ServerError { status, .. } => *status >= 500,
            ApiError::Network(_) => true,
            ApiError::Timeout => true,
            _ => false,
        }
    }

    /// HTTP status code if applicable
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized => Some(401),
            ApiError::Forbidden => Some(403),
            ApiError::NotFound { .. } => Some(404),
            ApiError::RateLimited { .. } => Some(429),
            ApiError::BadRequest { .. } => Some(400),
            ApiError::ServerError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else {
            ApiError::Network(err)
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Json(err.to_string())
    }
}
