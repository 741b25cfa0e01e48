//! Trait seams for the session's collaborators.

use std::path::Path;

use async_trait::async_trait;
use tokio::sync::watch;
use vwipe_ai::{AiResult, EditClient};
use vwipe_media::MediaResult;
use vwipe_models::{FrameArtifact, SelectionRect, VideoArtifact};

/// Remote generative editing operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemoteEditor: Send + Sync {
    /// Remove the selected object from the frame.
    async fn inpaint(
        &self,
        frame: &FrameArtifact,
        selection: &SelectionRect,
    ) -> AiResult<FrameArtifact>;

    /// Animate the frame into a short clip. `cancel` aborts the in-flight
    /// poll loop when flipped to `true`.
    async fn animate(
        &self,
        frame: &FrameArtifact,
        cancel: watch::Receiver<bool>,
    ) -> AiResult<VideoArtifact>;
}

#[async_trait]
impl RemoteEditor for vwipe_ai::EditClient {
    async fn inpaint(
        &self,
        frame: &FrameArtifact,
        selection: &SelectionRect,
    ) -> AiResult<FrameArtifact> {
        EditClient::inpaint(self, frame, selection).await
    }

    async fn animate(
        &self,
        frame: &FrameArtifact,
        cancel: watch::Receiver<bool>,
    ) -> AiResult<VideoArtifact> {
        EditClient::animate(self, frame, cancel).await
    }
}

/// Still-frame extraction from an uploaded video.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FrameSource: Send + Sync {
    /// Extract the first meaningful frame of the video at `path`.
    async fn extract_frame(&self, path: &Path) -> MediaResult<FrameArtifact>;
}

/// FFmpeg-backed frame source.
#[derive(Debug, Default)]
pub struct FfmpegFrameSource;

#[async_trait]
impl FrameSource for FfmpegFrameSource {
    async fn extract_frame(&self, path: &Path) -> MediaResult<FrameArtifact> {
        vwipe_media::extract_first_frame(path, None).await
    }
}

/// Credential presence check and selection prompt.
///
/// The store never exposes the credential value itself; the session only
/// needs to know whether one is selected and how to ask for one.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Has a credential been selected?
    async fn is_selected(&self) -> bool;

    /// Prompt the user to select one. Callers re-query presence afterward.
    async fn prompt_selection(&self);
}
