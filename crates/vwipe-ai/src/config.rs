//! AI client configuration.

use std::time::Duration;

/// Configuration for the edit client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL (overridable for tests)
    pub base_url: String,
    /// Model used for image editing
    pub image_model: String,
    /// Model used for video generation
    pub video_model: String,
    /// Target resolution for generated video
    pub video_resolution: String,
    /// Interval between operation status polls
    pub poll_interval: Duration,
    /// Maximum total time to wait for a video operation
    pub max_poll_wait: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            image_model: "gemini-2.5-flash-image-preview".to_string(),
            video_model: "veo-3.0-generate-001".to_string(),
            video_resolution: "720p".to_string(),
            poll_interval: Duration::from_secs(10),
            max_poll_wait: Duration::from_secs(600),
        }
    }
}

impl ClientConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("VWIPE_API_BASE_URL").unwrap_or(defaults.base_url),
            image_model: std::env::var("VWIPE_IMAGE_MODEL").unwrap_or(defaults.image_model),
            video_model: std::env::var("VWIPE_VIDEO_MODEL").unwrap_or(defaults.video_model),
            video_resolution: std::env::var("VWIPE_VIDEO_RESOLUTION")
                .unwrap_or(defaults.video_resolution),
            poll_interval: Duration::from_secs(
                std::env::var("VWIPE_POLL_INTERVAL_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(10),
            ),
            max_poll_wait: Duration::from_secs(
                std::env::var("VWIPE_MAX_POLL_WAIT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(600),
            ),
        }
    }
}
