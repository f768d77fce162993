//! Oracle client error types.

use thiserror::Error;

pub type OracleResult<T> = Result<T, OracleError>;

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("Oracle not configured: {0}")]
    NotConfigured(String),

    #[error("Oracle rejected credentials: {0}")]
    AuthFailed(String),

    #[error("Oracle rate limited: {0}")]
    RateLimited(String),

    #[error("Oracle returned {status}: {body}")]
    RequestFailed { status: u16, body: String },

    #[error("Oracle request failed: {0}")]
    Transport(String),

    #[error("Oracle request timed out after {0} seconds")]
    Timeout(u64),

    #[error("Oracle returned no content: {0}")]
    EmptyResponse(String),

    #[error("Failed to decode oracle response: {0}")]
    InvalidResponse(String),
}

impl OracleError {
    pub fn not_configured(msg: impl Into<String>) -> Self {
        Self::NotConfigured(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Map a reqwest failure, distinguishing timeouts.
    pub(crate) fn from_reqwest(err: reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout_secs)
        } else {
            Self::Transport(err.to_string())
        }
    }

    /// Map a non-success HTTP status into the error taxonomy.
    pub(crate) fn from_status(status: u16, body: String) -> Self {
        match status {
            401 | 403 => Self::AuthFailed(body),
            429 => Self::RateLimited(body),
            // Gemini reports a bad key as 400 INVALID_ARGUMENT.
            400 if body.contains("API_KEY_INVALID") || body.contains("API key not valid") => {
                Self::AuthFailed(body)
            }
            _ => Self::RequestFailed { status, body },
        }
    }
}
