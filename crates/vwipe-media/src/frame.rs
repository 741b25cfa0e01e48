//! First-frame extraction.

use std::path::Path;

use tracing::{debug, info};
use vwipe_models::FrameArtifact;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};

/// Default timestamp to seek to before grabbing the frame.
///
/// Slightly past zero so fade-ins and black leader frames are skipped.
pub const FRAME_TIMESTAMP_SECS: f64 = 0.1;

/// JPEG quality scale passed to FFmpeg (2 is roughly quality 0.9).
const JPEG_QSCALE: u8 = 2;

/// Extraction timeout; single-frame grabs finish in well under this.
const EXTRACT_TIMEOUT_SECS: u64 = 60;

/// Extract a still frame from a video file as a JPEG at native resolution.
///
/// Seeks to `timestamp` (default [`FRAME_TIMESTAMP_SECS`]) and grabs one
/// frame. Fails if the file cannot be decoded or no frame exists at the
/// requested position.
pub async fn extract_first_frame(
    video_path: impl AsRef<Path>,
    timestamp: Option<f64>,
) -> MediaResult<FrameArtifact> {
    let video_path = video_path.as_ref();
    let timestamp = timestamp.unwrap_or(FRAME_TIMESTAMP_SECS);

    if !video_path.exists() {
        return Err(MediaError::FileNotFound(video_path.to_path_buf()));
    }

    // Validate the container up front so a non-video file fails with a
    // decode error instead of an opaque FFmpeg exit status.
    let info = crate::probe::probe_video(video_path).await?;
    debug!(
        width = info.width,
        height = info.height,
        codec = %info.codec,
        "Probed source video"
    );

    let workdir = tempfile::tempdir()?;
    let frame_path = workdir.path().join("frame.jpg");

    let cmd = FfmpegCommand::new(video_path, &frame_path)
        .seek(timestamp)
        .single_frame()
        .jpeg_quality(JPEG_QSCALE)
        .log_level("error");

    FfmpegRunner::new()
        .with_timeout(EXTRACT_TIMEOUT_SECS)
        .run(&cmd)
        .await?;

    let bytes = tokio::fs::read(&frame_path).await.map_err(|_| {
        MediaError::invalid_video("No frame could be extracted at the requested position")
    })?;

    if bytes.is_empty() {
        return Err(MediaError::invalid_video(
            "Extracted frame is empty",
        ));
    }

    info!(
        size = bytes.len(),
        timestamp, "Extracted first frame"
    );

    Ok(FrameArtifact::new(bytes, "image/jpeg"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_extract_missing_file() {
        let err = extract_first_frame("/nonexistent/clip.mp4", None)
            .await
            .unwrap_err();
        assert!(matches!(err, MediaError::FileNotFound(_)));
    }

    #[tokio::test]
    async fn test_extract_non_video_file() {
        // Requires ffprobe; skip on machines without it.
        if which::which("ffprobe").is_err() {
            return;
        }

        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), b"not a video").unwrap();

        let err = extract_first_frame(file.path(), None).await.unwrap_err();
        assert!(matches!(
            err,
            MediaError::FfprobeFailed { .. }
                | MediaError::InvalidVideo(_)
                | MediaError::JsonParse(_)
        ));
    }
}
