//! Session-scoped media artifacts.
//!
//! Artifacts are ephemeral: they live for the duration of an editing session
//! and are discarded on reset. The original frame is retained alongside the
//! edited one so the caller can offer a hold-to-compare view.

use image::GenericImageView;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while inspecting artifact payloads.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Image data could not be decoded: {0}")]
    UndecodableImage(String),
}

/// A still image extracted from the source video or returned by the editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameArtifact {
    /// Encoded image bytes (JPEG or PNG)
    pub bytes: Vec<u8>,
    /// MIME type of the encoded bytes
    pub mime_type: String,
}

impl FrameArtifact {
    /// Create a new frame artifact.
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }

    /// Decode the pixel dimensions of the image.
    pub fn dimensions(&self) -> Result<(u32, u32), ArtifactError> {
        let img = image::load_from_memory(&self.bytes)
            .map_err(|e| ArtifactError::UndecodableImage(e.to_string()))?;
        Ok(img.dimensions())
    }
}

/// A generated video clip downloaded from the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoArtifact {
    /// Encoded video bytes
    pub bytes: Vec<u8>,
    /// MIME type of the encoded bytes
    pub mime_type: String,
}

impl VideoArtifact {
    /// Create a new video artifact.
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }
}

/// Target aspect ratio for video generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AspectRatio {
    /// 16:9, for landscape source frames
    Widescreen,
    /// 9:16, for portrait or square source frames
    Vertical,
}

impl AspectRatio {
    /// Pick the target ratio from source frame dimensions.
    ///
    /// Square frames go vertical, matching short-form playback surfaces.
    pub fn from_dimensions(width: u32, height: u32) -> Self {
        if width > height {
            AspectRatio::Widescreen
        } else {
            AspectRatio::Vertical
        }
    }

    /// Wire representation expected by the video generation API.
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Widescreen => "16:9",
            AspectRatio::Vertical => "9:16",
        }
    }
}

impl std::fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aspect_ratio_selection() {
        assert_eq!(
            AspectRatio::from_dimensions(1920, 1080),
            AspectRatio::Widescreen
        );
        assert_eq!(
            AspectRatio::from_dimensions(1080, 1920),
            AspectRatio::Vertical
        );
        assert_eq!(
            AspectRatio::from_dimensions(720, 720),
            AspectRatio::Vertical
        );
    }

    #[test]
    fn test_aspect_ratio_wire_format() {
        assert_eq!(AspectRatio::Widescreen.as_str(), "16:9");
        assert_eq!(AspectRatio::Vertical.as_str(), "9:16");
    }

    #[test]
    fn test_frame_dimensions() {
        // Minimal 1x1 PNG
        let png: &[u8] = &[
            0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48,
            0x44, 0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00,
            0x00, 0x1F, 0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78,
            0x9C, 0x63, 0x00, 0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00,
            0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
        ];
        let frame = FrameArtifact::new(png.to_vec(), "image/png");
        assert_eq!(frame.dimensions().unwrap(), (1, 1));
    }

    #[test]
    fn test_frame_dimensions_garbage() {
        let frame = FrameArtifact::new(vec![0, 1, 2, 3], "image/png");
        assert!(frame.dimensions().is_err());
    }
}
