//! Typed errors for backend API operations
//!
//! Provides structured error types so callers can react to common failure
//! modes (expired token, validation rejection, backend outage) without
//! string matching.

use thiserror::Error;

/// Backend API errors with typed variants
///
/// Enables callers to distinguish between different failure modes:
/// - `Unauthorized` (401/403) - credential missing, expired, or rejected
/// - `NotFound` (404) - the requested resource does not exist
/// - `Validation` (400/422) - malformed input; caller error
/// - `Server` (5xx) - backend-side issue
/// - `Network` - connection/timeout; no response at all
/// - `Unknown` - anything uncategorized
#[derive(Debug, Error)]
pub enum ApiError {
    /// Credential is missing, expired, or rejected (HTTP 401/403)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Requested resource does not exist (HTTP 404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed request (HTTP 400/422)
    ///
    /// Indicates invalid caller input (bad credentials payload, out-of-range
    /// filter). Retrying without changing the request will not help.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Backend-side error (HTTP 5xx)
    #[error("Server error: {0}")]
    Server(String),

    /// Network connectivity issue (connection refused, timeout, etc.)
    #[error("Network error: {0}")]
    Network(String),

    /// Other errors not fitting the above categories
    #[error("Unexpected error: {0}")]
    Unknown(String),
}

/// Plain discriminant of [`ApiError`], for storing in controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Unauthorized,
    NotFound,
    Validation,
    Server,
    Network,
    Unknown,
}

impl ApiError {
    /// Get the plain discriminant for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Unauthorized(_) => ErrorKind::Unauthorized,
            ApiError::NotFound(_) => ErrorKind::NotFound,
            ApiError::Validation(_) => ErrorKind::Validation,
            ApiError::Server(_) => ErrorKind::Server,
            ApiError::Network(_) => ErrorKind::Network,
            ApiError::Unknown(_) => ErrorKind::Unknown,
        }
    }

    /// Check if this error indicates a credential problem
    pub fn is_auth_error(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }

    /// Convert HTTP status code and error text into a typed ApiError
    pub fn from_http_status(status: reqwest::StatusCode, error_text: String) -> Self {
        match status.as_u16() {
            401 | 403 => ApiError::Unauthorized(error_text),
            404 => ApiError::NotFound(error_text),
            400 | 422 => ApiError::Validation(error_text),
            500..=599 => ApiError::Server(error_text),
            _ => ApiError::Unknown(format!("HTTP {}: {}", status, error_text)),
        }
    }

    /// Convert network/connection errors into a typed ApiError
    pub fn from_network_error(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ApiError::Network(format!("Request timeout: {}", e))
        } else if e.is_connect() {
            ApiError::Network(format!("Connection failed: {}", e))
        } else if let Some(status) = e.status() {
            Self::from_http_status(status, e.to_string())
        } else if e.is_decode() {
            ApiError::Unknown(format!("Malformed response body: {}", e))
        } else {
            ApiError::Network(e.to_string())
        }
    }
}
