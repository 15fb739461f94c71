//! API error taxonomy
//!
//! Splits failures by how callers must react: transient errors are retried
//! locally, auth errors force re-authentication, validation errors and rate
//! limits are surfaced as-is.

/// Errors produced by the authenticated HTTP layer
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// An authenticated request was attempted with no access token present.
    /// Detected before any network call.
    #[error("Authentication required: no access token in session")]
    AuthRequired,

    /// The session could not be refreshed after a 401; it has been cleared
    /// and the user must log in again
    #[error("Session expired: re-authentication required")]
    SessionExpired,

    /// HTTP 429; the caller should wait before retrying
    #[error("Rate limited by server")]
    RateLimited,

    /// Well-formed non-transient server rejection (4xx other than 401/429).
    /// Never retried.
    #[error("Request rejected ({status}): {message}")]
    Validation { status: u16, message: String },

    /// Connection-level or 5xx failure; retried with backoff before being
    /// surfaced
    #[error("Network request failed: {0}")]
    Transient(String),

    /// The server answered but the body did not match the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// Whether the retry loop may attempt this request again
    pub fn is_transient(&self) -> bool {
        matches!(self, ApiError::Transient(_))
    }
}
