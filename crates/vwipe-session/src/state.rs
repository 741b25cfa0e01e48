//! Session state as a tagged union.
//!
//! Each variant carries exactly the data valid in that phase, so invalid
//! combinations (a completed video with no edited frame, a quota flag
//! outside the error state) cannot be represented.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vwipe_models::{CredentialPresence, FrameArtifact, SelectionRect, VideoArtifact};

/// What a `Processing` phase is waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingKind {
    /// Extracting the first frame from an uploaded video
    Extraction,
    /// Waiting on the remote inpainting call
    Inpaint,
}

/// Why the session is in the error state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Remote quota exhausted; offer a credential switch and a usage link
    Quota,
    /// The credential is invalid or cannot access the feature
    CredentialMissing,
    /// Everything else; offer a reset
    Generic,
}

impl ErrorKind {
    pub fn is_quota(&self) -> bool {
        matches!(self, ErrorKind::Quota)
    }
}

/// Current session phase.
#[derive(Debug, Clone)]
pub enum SessionState {
    /// Waiting for an upload
    Idle,
    /// A local or remote operation is in flight
    Processing { kind: ProcessingKind },
    /// Frame extracted, awaiting selection and confirmation
    VideoLoaded {
        frame: FrameArtifact,
        selection: Option<SelectionRect>,
    },
    /// Inpainting succeeded; original retained for hold-to-compare
    Complete {
        original: FrameArtifact,
        edited: FrameArtifact,
    },
    /// Waiting on the remote video generation operation
    GeneratingVideo {
        original: FrameArtifact,
        edited: FrameArtifact,
    },
    /// Video generated and downloaded
    VideoComplete {
        original: FrameArtifact,
        edited: FrameArtifact,
        video: VideoArtifact,
    },
    /// A failure was surfaced. Artifacts are retained so a credential
    /// switch can restore the furthest phase reached.
    Error {
        message: String,
        kind: ErrorKind,
        original: Option<FrameArtifact>,
        edited: Option<FrameArtifact>,
    },
}

/// Discriminant-only view of the session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Idle,
    Processing,
    VideoLoaded,
    GeneratingVideo,
    Complete,
    VideoComplete,
    Error,
}

impl SessionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionPhase::Idle => "idle",
            SessionPhase::Processing => "processing",
            SessionPhase::VideoLoaded => "video_loaded",
            SessionPhase::GeneratingVideo => "generating_video",
            SessionPhase::Complete => "complete",
            SessionPhase::VideoComplete => "video_complete",
            SessionPhase::Error => "error",
        }
    }
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl SessionState {
    /// The discriminant of this state.
    pub fn phase(&self) -> SessionPhase {
        match self {
            SessionState::Idle => SessionPhase::Idle,
            SessionState::Processing { .. } => SessionPhase::Processing,
            SessionState::VideoLoaded { .. } => SessionPhase::VideoLoaded,
            SessionState::GeneratingVideo { .. } => SessionPhase::GeneratingVideo,
            SessionState::Complete { .. } => SessionPhase::Complete,
            SessionState::VideoComplete { .. } => SessionPhase::VideoComplete,
            SessionState::Error { .. } => SessionPhase::Error,
        }
    }

    pub fn name(&self) -> &'static str {
        self.phase().as_str()
    }
}

/// Serializable snapshot of the session for the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    /// Session identifier
    pub session_id: Uuid,
    /// Current phase
    pub phase: SessionPhase,
    /// Cosmetic progress percentage (0-100); carries no correctness meaning
    pub progress: u8,
    /// Credential presence as last observed
    pub credential: CredentialPresence,
    /// Error message, when in the error phase
    pub error_message: Option<String>,
    /// Error kind, when in the error phase
    pub error_kind: Option<ErrorKind>,
    /// When the session last changed
    pub updated_at: DateTime<Utc>,
}
