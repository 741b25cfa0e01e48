//! The editing session.
//!
//! Owns the state machine, the cosmetic progress channel, and the
//! cancellation signal for in-flight video generation. One remote operation
//! is in flight per session at most; every event handler drives the state
//! forward and re-renders are observation-only.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{info, warn};
use uuid::Uuid;
use vwipe_ai::AiError;
use vwipe_models::{CredentialPresence, FrameArtifact, SelectionRect};

use crate::error::SessionError;
use crate::progress::ProgressTicker;
use crate::state::{ErrorKind, ProcessingKind, SessionSnapshot, SessionState};
use crate::traits::{CredentialStore, FrameSource, RemoteEditor};

/// Minimum selection edge, in pixels, for removal to be actionable.
pub const MIN_ACTIONABLE_EDGE: f64 = 5.0;

/// An editing session.
pub struct Session<E, F, C> {
    id: Uuid,
    editor: E,
    frames: F,
    credentials: C,
    state: SessionState,
    credential: CredentialPresence,
    progress: Arc<watch::Sender<u8>>,
    progress_rx: watch::Receiver<u8>,
    cancel_tx: watch::Sender<bool>,
    updated_at: DateTime<Utc>,
}

impl<E, F, C> Session<E, F, C>
where
    E: RemoteEditor,
    F: FrameSource,
    C: CredentialStore,
{
    /// Create a new idle session.
    ///
    /// Credential presence starts `Unknown`; call [`refresh_credential`]
    /// after construction to resolve it.
    ///
    /// [`refresh_credential`]: Session::refresh_credential
    pub fn new(editor: E, frames: F, credentials: C) -> Self {
        let (progress, progress_rx) = watch::channel(0u8);
        let (cancel_tx, _) = watch::channel(false);
        Self {
            id: Uuid::new_v4(),
            editor,
            frames,
            credentials,
            state: SessionState::Idle,
            credential: CredentialPresence::Unknown,
            progress: Arc::new(progress),
            progress_rx,
            cancel_tx,
            updated_at: Utc::now(),
        }
    }

    /// Re-query the credential store and update the tri-state flag.
    pub async fn refresh_credential(&mut self) -> CredentialPresence {
        let presence = CredentialPresence::from(self.credentials.is_selected().await);
        self.credential = presence;
        self.touch();
        presence
    }

    /// A file was selected: extract its first frame.
    ///
    /// Lands in `video_loaded` on success or `error` on a decode failure,
    /// never anywhere else.
    pub async fn load_video(&mut self, path: &Path) -> Result<(), SessionError> {
        if !matches!(self.state, SessionState::Idle) {
            return Err(SessionError::invalid_action("load_video", self.state.name()));
        }

        self.set_state(SessionState::Processing {
            kind: ProcessingKind::Extraction,
        });

        match self.frames.extract_frame(path).await {
            Ok(frame) => {
                info!(session_id = %self.id, "Frame extracted");
                self.set_state(SessionState::VideoLoaded {
                    frame,
                    selection: None,
                });
            }
            Err(e) => {
                warn!(session_id = %self.id, "Frame extraction failed: {}", e);
                self.set_state(SessionState::Error {
                    message: "Could not read a frame from this video. Please try another file."
                        .to_string(),
                    kind: ErrorKind::Generic,
                    original: None,
                    edited: None,
                });
            }
        }
        Ok(())
    }

    /// The user drew or adjusted the selection rectangle.
    pub fn update_selection(&mut self, rect: SelectionRect) -> Result<(), SessionError> {
        match &mut self.state {
            SessionState::VideoLoaded { selection, .. } => {
                *selection = Some(rect);
                self.touch();
                Ok(())
            }
            _ => Err(SessionError::invalid_action(
                "update_selection",
                self.state.name(),
            )),
        }
    }

    /// The user confirmed removal of the selected region.
    ///
    /// Precondition failures (no frame, no selection, selection below the
    /// actionable threshold) are rejected without a state change.
    pub async fn confirm_removal(&mut self) -> Result<(), SessionError> {
        let (frame, selection) = match &self.state {
            SessionState::VideoLoaded { frame, selection } => (frame.clone(), *selection),
            _ => return Err(SessionError::NoFrameLoaded),
        };
        let selection = selection.ok_or(SessionError::NoSelection)?;
        if !selection.is_actionable(MIN_ACTIONABLE_EDGE) {
            return Err(SessionError::SelectionTooSmall);
        }

        self.set_state(SessionState::Processing {
            kind: ProcessingKind::Inpaint,
        });
        let ticker = ProgressTicker::start(self.progress.clone());

        let result = self.editor.inpaint(&frame, &selection).await;
        ticker.stop();

        match result {
            Ok(edited) => {
                info!(session_id = %self.id, "Inpainting complete");
                self.set_progress(100);
                self.set_state(SessionState::Complete {
                    original: frame,
                    edited,
                });
            }
            Err(e) => {
                self.set_progress(0);
                self.fail(e, Some(frame), None);
            }
        }
        Ok(())
    }

    /// The user requested a generated video of the edited frame.
    ///
    /// If no credential is selected, the store is prompted and presence
    /// re-queried first; a still-absent credential is rejected without a
    /// state change.
    pub async fn generate_video(&mut self) -> Result<(), SessionError> {
        let (original, edited) = match &self.state {
            SessionState::Complete { original, edited } => (original.clone(), edited.clone()),
            _ => {
                return Err(SessionError::invalid_action(
                    "generate_video",
                    self.state.name(),
                ))
            }
        };

        if !self.credential.is_present() {
            self.credentials.prompt_selection().await;
            if !self.refresh_credential().await.is_present() {
                return Err(SessionError::CredentialNotSelected);
            }
        }

        self.set_state(SessionState::GeneratingVideo {
            original: original.clone(),
            edited: edited.clone(),
        });

        let cancel_rx = self.cancel_tx.subscribe();
        match self.editor.animate(&edited, cancel_rx).await {
            Ok(video) => {
                info!(session_id = %self.id, "Video generation complete");
                self.set_state(SessionState::VideoComplete {
                    original,
                    edited,
                    video,
                });
            }
            Err(AiError::Cancelled) => {
                info!(session_id = %self.id, "Video generation cancelled by reset");
                self.set_state(SessionState::Idle);
            }
            Err(e) => self.fail(e, Some(original), Some(edited)),
        }
        Ok(())
    }

    /// The user switched credentials after a quota or credential error.
    ///
    /// Prompts selection, re-queries presence, and on success restores the
    /// furthest phase the retained artifacts support.
    pub async fn switch_credential(&mut self) -> Result<(), SessionError> {
        self.credentials.prompt_selection().await;
        if !self.refresh_credential().await.is_present() {
            return Ok(());
        }

        if let SessionState::Error {
            kind,
            original,
            edited,
            ..
        } = &self.state
        {
            if matches!(kind, ErrorKind::Quota | ErrorKind::CredentialMissing) {
                let original = original.clone();
                let edited = edited.clone();
                let restored = match (original, edited) {
                    (Some(original), Some(edited)) => SessionState::Complete { original, edited },
                    (Some(frame), None) => SessionState::VideoLoaded {
                        frame,
                        selection: None,
                    },
                    _ => SessionState::Idle,
                };
                info!(session_id = %self.id, restored = restored.name(), "Error cleared after credential switch");
                self.set_state(restored);
            }
        }
        Ok(())
    }

    /// Discard all artifacts and errors and return to idle.
    ///
    /// Fires the cancellation signal so an in-flight video poll loop stops
    /// instead of running to completion against a dead session.
    pub fn reset(&mut self) {
        let _ = self.cancel_tx.send(true);
        // Fresh channel so the next operation starts uncancelled.
        let (cancel_tx, _) = watch::channel(false);
        self.cancel_tx = cancel_tx;

        self.set_progress(0);
        self.set_state(SessionState::Idle);
        info!(session_id = %self.id, "Session reset");
    }

    /// Current state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Credential presence as last observed.
    pub fn credential(&self) -> CredentialPresence {
        self.credential
    }

    /// Current cosmetic progress value.
    pub fn progress(&self) -> u8 {
        *self.progress_rx.borrow()
    }

    /// Subscribe to cosmetic progress updates.
    pub fn subscribe_progress(&self) -> watch::Receiver<u8> {
        self.progress.subscribe()
    }

    /// Session identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Serializable snapshot for the presentation layer.
    pub fn snapshot(&self) -> SessionSnapshot {
        let (error_message, error_kind) = match &self.state {
            SessionState::Error { message, kind, .. } => (Some(message.clone()), Some(*kind)),
            _ => (None, None),
        };
        SessionSnapshot {
            session_id: self.id,
            phase: self.state.phase(),
            progress: self.progress(),
            credential: self.credential,
            error_message,
            error_kind,
            updated_at: self.updated_at,
        }
    }

    /// Normalize an AI failure into the error state.
    fn fail(
        &mut self,
        e: AiError,
        original: Option<FrameArtifact>,
        edited: Option<FrameArtifact>,
    ) {
        let kind = if e.is_quota() {
            ErrorKind::Quota
        } else if e.is_credential() {
            ErrorKind::CredentialMissing
        } else {
            ErrorKind::Generic
        };
        warn!(session_id = %self.id, kind = ?kind, "Operation failed: {}", e);
        self.set_state(SessionState::Error {
            message: e.to_string(),
            kind,
            original,
            edited,
        });
    }

    fn set_state(&mut self, state: SessionState) {
        self.state = state;
        self.touch();
    }

    fn set_progress(&mut self, value: u8) {
        let _ = self.progress.send(value.min(100));
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
