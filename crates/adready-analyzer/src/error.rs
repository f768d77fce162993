//! Analyzer error types.
//!
//! Every fatal failure maps to a stable [`ErrorKind`] for telemetry and a
//! user-facing message; optional-path failures never reach this type.

use serde::Serialize;
use thiserror::Error;

use adready_media::MediaError;
use adready_models::MediaKind;
use adready_oracle::OracleError;

pub type AnalyzerResult<T> = Result<T, AnalysisError>;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("{kind} payload of {size} bytes exceeds the {limit} byte limit")]
    PayloadTooLarge { kind: MediaKind, size: u64, limit: u64 },

    #[error("Video transcoder is not available")]
    TranscoderUnavailable,

    #[error("No frames could be extracted ({attempted} timestamps attempted)")]
    FrameExtractionFailed { attempted: usize },

    #[error("Reasoning oracle not configured: {0}")]
    OracleNotConfigured(String),

    #[error("Reasoning oracle rejected credentials: {0}")]
    OracleAuthFailed(String),

    #[error("Reasoning oracle rate limited: {0}")]
    OracleRateLimited(String),

    #[error("Oracle response could not be parsed: {0}")]
    OracleResponseUnparseable(String),

    #[error("Analysis exceeded its {0} second deadline")]
    DeadlineExceeded(u64),

    #[error("Unexpected failure: {0}")]
    Unexpected(String),
}

/// Stable, machine-readable error kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    UnsupportedMediaType,
    PayloadTooLarge,
    TranscoderUnavailable,
    FrameExtractionFailed,
    OracleNotConfigured,
    OracleAuthFailed,
    OracleRateLimited,
    OracleResponseUnparseable,
    DeadlineExceeded,
    UnexpectedFailure,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnsupportedMediaType => "unsupported_media_type",
            Self::PayloadTooLarge => "payload_too_large",
            Self::TranscoderUnavailable => "transcoder_unavailable",
            Self::FrameExtractionFailed => "frame_extraction_failed",
            Self::OracleNotConfigured => "oracle_not_configured",
            Self::OracleAuthFailed => "oracle_auth_failed",
            Self::OracleRateLimited => "oracle_rate_limited",
            Self::OracleResponseUnparseable => "oracle_response_unparseable",
            Self::DeadlineExceeded => "deadline_exceeded",
            Self::UnexpectedFailure => "unexpected_failure",
        }
    }
}

impl AnalysisError {
    pub fn unparseable(msg: impl Into<String>) -> Self {
        Self::OracleResponseUnparseable(msg.into())
    }

    pub fn unexpected(msg: impl Into<String>) -> Self {
        Self::Unexpected(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsupportedMediaType(_) => ErrorKind::UnsupportedMediaType,
            Self::PayloadTooLarge { .. } => ErrorKind::PayloadTooLarge,
            Self::TranscoderUnavailable => ErrorKind::TranscoderUnavailable,
            Self::FrameExtractionFailed { .. } => ErrorKind::FrameExtractionFailed,
            Self::OracleNotConfigured(_) => ErrorKind::OracleNotConfigured,
            Self::OracleAuthFailed(_) => ErrorKind::OracleAuthFailed,
            Self::OracleRateLimited(_) => ErrorKind::OracleRateLimited,
            Self::OracleResponseUnparseable(_) => ErrorKind::OracleResponseUnparseable,
            Self::DeadlineExceeded(_) => ErrorKind::DeadlineExceeded,
            Self::Unexpected(_) => ErrorKind::UnexpectedFailure,
        }
    }

    /// Message safe to show to the person who uploaded the creative.
    pub fn user_message(&self) -> String {
        match self {
            Self::UnsupportedMediaType(_) => {
                "Unsupported file type. Upload a JPEG, PNG, WEBP or GIF image, or an MP4, MOV or WEBM video.".to_string()
            }
            Self::PayloadTooLarge { kind, limit, .. } => format!(
                "File too large. The maximum {} size is {} MB.",
                kind,
                limit / (1024 * 1024)
            ),
            Self::TranscoderUnavailable => {
                "Video analysis is temporarily unavailable. Please upload a still image of your ad instead.".to_string()
            }
            Self::FrameExtractionFailed { .. } => {
                "We could not read any frames from this video. The file may be corrupt or use an unsupported codec.".to_string()
            }
            Self::OracleNotConfigured(_) | Self::OracleAuthFailed(_) => {
                "The analysis service is not available right now. Please try again later.".to_string()
            }
            Self::OracleRateLimited(_) => {
                "The analysis service is busy. Please wait a minute and retry.".to_string()
            }
            Self::OracleResponseUnparseable(_) => {
                "The analysis returned an unreadable result. Please retry.".to_string()
            }
            Self::DeadlineExceeded(_) => {
                "The analysis took too long. Try a shorter video or retry.".to_string()
            }
            Self::Unexpected(_) => "Something went wrong while analyzing your creative.".to_string(),
        }
    }

    /// Worth retrying later without changing the input.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::OracleRateLimited(_)
                | Self::OracleResponseUnparseable(_)
                | Self::DeadlineExceeded(_)
                | Self::Unexpected(_)
        )
    }
}

impl From<MediaError> for AnalysisError {
    fn from(err: MediaError) -> Self {
        match err {
            MediaError::UnsupportedMediaType(ct) => Self::UnsupportedMediaType(ct),
            MediaError::PayloadTooLarge { kind, size, limit } => {
                Self::PayloadTooLarge { kind, size, limit }
            }
            MediaError::FfmpegNotFound | MediaError::FfprobeNotFound => Self::TranscoderUnavailable,
            MediaError::FrameExtractionFailed { attempted } => {
                Self::FrameExtractionFailed { attempted }
            }
            other => Self::Unexpected(other.to_string()),
        }
    }
}

impl From<OracleError> for AnalysisError {
    fn from(err: OracleError) -> Self {
        match err {
            OracleError::NotConfigured(msg) => Self::OracleNotConfigured(msg),
            OracleError::AuthFailed(msg) => Self::OracleAuthFailed(msg),
            OracleError::RateLimited(msg) => Self::OracleRateLimited(msg),
            OracleError::EmptyResponse(msg) | OracleError::InvalidResponse(msg) => {
                Self::OracleResponseUnparseable(msg)
            }
            other => Self::Unexpected(other.to_string()),
        }
    }
}
