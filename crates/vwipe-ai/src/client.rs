//! Remote edit client.
//!
//! Issues the inpainting and video generation requests, owns response-shape
//! validation and error classification. Both operations run inside the quota
//! retry controller; quota and credential errors pass through to callers
//! unchanged, anything else is normalized to a user-safe failure.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::Client;
use tokio::sync::watch;
use tracing::{debug, info, warn};
use url::Url;
use vwipe_models::{AspectRatio, FrameArtifact, RegionPosition, SelectionRect, VideoArtifact};

use crate::config::ClientConfig;
use crate::error::{AiError, AiResult};
use crate::retry::{with_quota_retry, RetryPolicy};
use crate::wire::{
    ApiErrorBody, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    ImagePayload, InlineData, Operation, Part, PredictRequest, VideoInstance, VideoParameters,
};

/// Retry label for the inpainting operation.
pub const IMAGE_EDIT_LABEL: &str = "image editing";
/// Retry label for the video generation operation.
pub const VIDEO_GENERATION_LABEL: &str = "video generation";

/// Client for the remote generative editing service.
pub struct EditClient {
    api_key: String,
    http: Client,
    config: ClientConfig,
    retry: RetryPolicy,
}

impl EditClient {
    /// Create a client with default configuration.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_config(api_key, ClientConfig::default())
    }

    /// Create a client with explicit configuration.
    pub fn with_config(api_key: impl Into<String>, config: ClientConfig) -> Self {
        Self {
            api_key: api_key.into(),
            http: Client::new(),
            config,
            retry: RetryPolicy::default(),
        }
    }

    /// Override the retry policy.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Remove the selected object from the frame.
    ///
    /// Derives a coarse position phrase from the selection, submits the
    /// frame with a fixed removal instruction, and returns the first image
    /// payload of the response.
    pub async fn inpaint(
        &self,
        frame: &FrameArtifact,
        selection: &SelectionRect,
    ) -> AiResult<FrameArtifact> {
        let (width, height) = frame.dimensions().map_err(|e| {
            warn!("Frame could not be decoded: {}", e);
            AiError::ImageEditFailed("The selected frame could not be decoded.".to_string())
        })?;

        let position = RegionPosition::from_selection(selection, width as f64, height as f64);
        let instruction = format!(
            "Remove the object located {} of the image. Fill the removed region \
             with a realistic continuation of the surrounding background. Do not \
             change anything else in the image.",
            position.phrase()
        );
        debug!(position = position.phrase(), "Built inpaint instruction");

        with_quota_retry(&self.retry, IMAGE_EDIT_LABEL, || {
            self.generate_content(frame, &instruction)
        })
        .await
        .map_err(normalize_image_error)
    }

    /// Animate the frame into a short clip.
    ///
    /// Starts a long-running generation operation, polls it until done
    /// (bounded by `max_poll_wait`, aborted by `cancel`), then downloads the
    /// result via the signed link in the completed response.
    pub async fn animate(
        &self,
        frame: &FrameArtifact,
        cancel: watch::Receiver<bool>,
    ) -> AiResult<VideoArtifact> {
        let (width, height) = frame.dimensions().map_err(|e| {
            warn!("Frame could not be decoded: {}", e);
            AiError::VideoGenerationFailed("The edited frame could not be decoded.".to_string())
        })?;
        let aspect = AspectRatio::from_dimensions(width, height);

        with_quota_retry(&self.retry, VIDEO_GENERATION_LABEL, || {
            self.generate_video(frame, aspect, cancel.clone())
        })
        .await
        .map_err(normalize_video_error)
    }

    /// One inpaint attempt against the generateContent endpoint.
    async fn generate_content(
        &self,
        frame: &FrameArtifact,
        instruction: &str,
    ) -> AiResult<FrameArtifact> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.config.base_url, self.config.image_model, self.api_key
        );

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part {
                        text: None,
                        inline_data: Some(InlineData {
                            mime_type: frame.mime_type.clone(),
                            data: BASE64.encode(&frame.bytes),
                        }),
                    },
                    Part {
                        text: Some(instruction.to_string()),
                        inline_data: None,
                    },
                ],
            }],
            generation_config: GenerationConfig {
                response_modalities: vec!["IMAGE".to_string()],
            },
        };

        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(classify_error_response(response).await);
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|e| {
            AiError::remote(None, None, format!("Failed to parse edit response: {}", e), None)
        })?;

        let image_part = parsed
            .candidates
            .iter()
            .filter_map(|c| c.content.as_ref())
            .flat_map(|c| c.parts.iter())
            .find_map(|p| p.inline_data.as_ref())
            .ok_or(AiError::NoImageData)?;

        let bytes = BASE64
            .decode(&image_part.data)
            .map_err(|_| AiError::NoImageData)?;

        info!(size = bytes.len(), "Received edited image");
        Ok(FrameArtifact::new(bytes, image_part.mime_type.clone()))
    }

    /// One video generation attempt: start, poll, download.
    async fn generate_video(
        &self,
        frame: &FrameArtifact,
        aspect: AspectRatio,
        mut cancel: watch::Receiver<bool>,
    ) -> AiResult<VideoArtifact> {
        let operation = self.start_video_operation(frame, aspect).await?;
        info!(operation = %operation.name, aspect = %aspect, "Started video generation");

        let operation = self.poll_operation(operation, &mut cancel).await?;

        let uri = operation
            .download_uri()
            .ok_or(AiError::MissingDownloadLink)?
            .to_string();

        self.download_video(&uri).await
    }

    async fn start_video_operation(
        &self,
        frame: &FrameArtifact,
        aspect: AspectRatio,
    ) -> AiResult<Operation> {
        let url = format!(
            "{}/models/{}:predictLongRunning?key={}",
            self.config.base_url, self.config.video_model, self.api_key
        );

        let request = PredictRequest {
            instances: vec![VideoInstance {
                prompt: "Animate this scene into a short, natural video clip. Use subtle \
                         camera motion and realistic movement. Do not introduce new objects."
                    .to_string(),
                image: ImagePayload {
                    bytes_base64_encoded: BASE64.encode(&frame.bytes),
                    mime_type: frame.mime_type.clone(),
                },
            }],
            parameters: VideoParameters {
                sample_count: 1,
                resolution: self.config.video_resolution.clone(),
                aspect_ratio: aspect.as_str().to_string(),
            },
        };

        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(classify_error_response(response).await);
        }

        response.json().await.map_err(|e| {
            AiError::remote(
                None,
                None,
                format!("Failed to parse operation handle: {}", e),
                None,
            )
        })
    }

    /// Poll the operation on a fixed interval until done, the deadline
    /// passes, or the cancellation signal fires.
    async fn poll_operation(
        &self,
        mut operation: Operation,
        cancel: &mut watch::Receiver<bool>,
    ) -> AiResult<Operation> {
        let deadline = tokio::time::Instant::now() + self.config.max_poll_wait;

        loop {
            if *cancel.borrow() {
                info!(operation = %operation.name, "Video generation cancelled");
                return Err(AiError::Cancelled);
            }

            if operation.done {
                if let Some(err) = operation.error.take() {
                    let message = err
                        .message
                        .unwrap_or_else(|| format!("Operation failed with code {:?}", err.code));
                    return Err(AiError::remote(None, None, message, None));
                }
                return Ok(operation);
            }

            if tokio::time::Instant::now() >= deadline {
                return Err(AiError::VideoGenerationFailed(format!(
                    "Timed out after {} seconds waiting for the video operation.",
                    self.config.max_poll_wait.as_secs()
                )));
            }

            tokio::select! {
                _ = tokio::time::sleep(self.config.poll_interval) => {
                    debug!(operation = %operation.name, "Polling video operation");
                    operation = self.fetch_operation(&operation.name).await?;
                }
                changed = cancel.changed() => {
                    if changed.is_err() {
                        // Cancel sender dropped; fall back to plain polling.
                        tokio::time::sleep(self.config.poll_interval).await;
                        operation = self.fetch_operation(&operation.name).await?;
                    }
                    // A received change is handled by the borrow check on the
                    // next iteration.
                }
            }
        }
    }

    async fn fetch_operation(&self, name: &str) -> AiResult<Operation> {
        let url = format!("{}/{}?key={}", self.config.base_url, name, self.api_key);

        let response = self.http.get(&url).send().await.map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(classify_error_response(response).await);
        }

        response.json().await.map_err(|e| {
            AiError::remote(
                None,
                None,
                format!("Failed to parse operation status: {}", e),
                None,
            )
        })
    }

    /// Download the generated clip from the signed, time-limited link.
    ///
    /// The link requires the caller's key appended as a query parameter. An
    /// entity-not-found rejection means the key cannot access the video
    /// feature, which is a credential-selection problem rather than a
    /// download failure.
    async fn download_video(&self, uri: &str) -> AiResult<VideoArtifact> {
        let mut url = Url::parse(uri).map_err(|_| {
            AiError::VideoGenerationFailed("The returned download link is invalid.".to_string())
        })?;
        url.query_pairs_mut().append_pair("key", &self.api_key);

        let response = self.http.get(url).send().await.map_err(transport_error)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            if body.to_lowercase().contains("entity was not found") {
                return Err(AiError::ApiKeyNotSelected);
            }
            return Err(AiError::remote(Some(status), None, body, None));
        }

        let bytes = response.bytes().await.map_err(transport_error)?;
        info!(size = bytes.len(), "Downloaded generated video");
        Ok(VideoArtifact::new(bytes.to_vec(), "video/mp4"))
    }
}

/// Map a transport failure into a classifiable remote error.
fn transport_error(e: reqwest::Error) -> AiError {
    AiError::remote(e.status().map(|s| s.as_u16()), None, e.to_string(), None)
}

/// Classify a non-success HTTP response into a typed error.
async fn classify_error_response(response: reqwest::Response) -> AiError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    classify_error_body(status, &body)
}

fn classify_error_body(status: u16, body: &str) -> AiError {
    let parsed = serde_json::from_str::<ApiErrorBody>(body).ok();
    let (api_status, message, retry_delay) = match parsed {
        Some(parsed) => (
            parsed.error.status.clone(),
            parsed
                .error
                .message
                .clone()
                .unwrap_or_else(|| body.to_string()),
            parsed.error.retry_delay(),
        ),
        None => (None, body.to_string(), None),
    };

    // Invalid or forbidden credential, never retried.
    if status == 400 || status == 403 {
        let text = message.to_lowercase();
        if text.contains("api key not valid")
            || text.contains("api_key_invalid")
            || api_status.as_deref() == Some("PERMISSION_DENIED")
        {
            return AiError::InvalidApiKey;
        }
    }

    AiError::remote(Some(status), api_status, message, retry_delay)
}

/// Let distinguished errors through, normalize the rest.
fn normalize_image_error(e: AiError) -> AiError {
    match e {
        AiError::QuotaExceeded { .. }
        | AiError::InvalidApiKey
        | AiError::ApiKeyNotSelected
        | AiError::NoImageData
        | AiError::Cancelled
        | AiError::ImageEditFailed(_) => e,
        other => {
            warn!("Image edit failed: {}", other);
            AiError::ImageEditFailed("The image could not be processed. Please try again.".to_string())
        }
    }
}

fn normalize_video_error(e: AiError) -> AiError {
    match e {
        AiError::QuotaExceeded { .. }
        | AiError::InvalidApiKey
        | AiError::ApiKeyNotSelected
        | AiError::MissingDownloadLink
        | AiError::Cancelled
        | AiError::VideoGenerationFailed(_) => e,
        other => {
            warn!("Video generation failed: {}", other);
            AiError::VideoGenerationFailed(
                "The video could not be generated. Please try again.".to_string(),
            )
        }
    }
}
