//! AI client error types.
//!
//! Every remote-call failure is normalized into one of these kinds before it
//! leaves this crate; callers never see raw transport errors.

use std::time::Duration;

use thiserror::Error;

pub type AiResult<T> = Result<T, AiError>;

#[derive(Debug, Error)]
pub enum AiError {
    /// Quota exhaustion that survived all retry attempts. Terminal and
    /// distinguished so callers can offer a credential switch.
    #[error("You have exceeded your API quota during {operation}. Wait for the quota to reset or switch to a different API key.")]
    QuotaExceeded { operation: String },

    /// The API rejected the configured key outright.
    #[error("The selected API key is not valid. Select a different key and try again.")]
    InvalidApiKey,

    /// The key exists but cannot access this feature (surfaced by the video
    /// download endpoint as an entity-not-found response).
    #[error("The selected API key cannot access this feature. Select a different key and try again.")]
    ApiKeyNotSelected,

    /// The edit call succeeded but returned no image payload.
    #[error("The model returned no image data")]
    NoImageData,

    /// Video generation reported done but carried no download link.
    #[error("Video generation succeeded but returned no download link")]
    MissingDownloadLink,

    /// Operation aborted by the caller's cancellation signal.
    #[error("Operation cancelled")]
    Cancelled,

    /// Generic, user-safe image editing failure.
    #[error("Image editing failed: {0}")]
    ImageEditFailed(String),

    /// Generic, user-safe video generation failure.
    #[error("Video generation failed: {0}")]
    VideoGenerationFailed(String),

    /// A classified remote failure, produced at the HTTP boundary and
    /// consumed by the retry controller. Never escapes the client: anything
    /// still `Remote` after retry is normalized to an operation-specific
    /// failure.
    #[error("Remote call failed ({status_line}): {message}")]
    Remote {
        /// HTTP status code, when a response was received
        http_status: Option<u16>,
        /// Structured status from the API error body (e.g. RESOURCE_EXHAUSTED)
        api_status: Option<String>,
        /// Error message from the API or transport layer
        message: String,
        /// Server-suggested retry delay, when present in the error payload
        retry_delay: Option<Duration>,
        /// Pre-rendered status description for Display
        status_line: String,
    },
}

impl AiError {
    /// Build a remote error from its parts.
    pub fn remote(
        http_status: Option<u16>,
        api_status: Option<String>,
        message: impl Into<String>,
        retry_delay: Option<Duration>,
    ) -> Self {
        let status_line = match (http_status, api_status.as_deref()) {
            (Some(code), Some(status)) => format!("{} {}", code, status),
            (Some(code), None) => code.to_string(),
            (None, Some(status)) => status.to_string(),
            (None, None) => "transport".to_string(),
        };
        Self::Remote {
            http_status,
            api_status,
            message: message.into(),
            retry_delay,
            status_line,
        }
    }

    /// Check whether this failure signals remote-quota exhaustion.
    ///
    /// Structured signals (HTTP 429, RESOURCE_EXHAUSTED status) are checked
    /// first; the text-marker fallback covers transport errors that never
    /// produced a structured body.
    pub fn is_quota(&self) -> bool {
        match self {
            AiError::QuotaExceeded { .. } => true,
            AiError::Remote {
                http_status,
                api_status,
                message,
                ..
            } => {
                if *http_status == Some(429) {
                    return true;
                }
                if api_status.as_deref() == Some("RESOURCE_EXHAUSTED") {
                    return true;
                }
                let msg = message.to_lowercase();
                msg.contains("429") || msg.contains("resource_exhausted") || msg.contains("quota")
            }
            _ => false,
        }
    }

    /// Check whether this failure is credential-related.
    pub fn is_credential(&self) -> bool {
        matches!(self, AiError::InvalidApiKey | AiError::ApiKeyNotSelected)
    }

    /// Server-suggested delay before the next attempt, when the error
    /// payload carried one.
    pub fn suggested_retry_delay(&self) -> Option<Duration> {
        match self {
            AiError::Remote { retry_delay, .. } => *retry_delay,
            _ => None,
        }
    }
}
