//! HTTP-level tests for the edit client against a mock API server.

use std::time::Duration;

use serde_json::json;
use tokio::sync::watch;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vwipe_ai::{AiError, ClientConfig, EditClient, RetryPolicy};
use vwipe_models::{FrameArtifact, SelectionRect};

const API_KEY: &str = "test-key";
const IMAGE_MODEL: &str = "gemini-2.5-flash-image-preview";
const VIDEO_MODEL: &str = "veo-3.0-generate-001";

/// Minimal 1x1 PNG so dimension decoding succeeds.
fn png_frame() -> FrameArtifact {
    let png: &[u8] = &[
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
        0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
        0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
        0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
    ];
    FrameArtifact::new(png.to_vec(), "image/png")
}

fn selection() -> SelectionRect {
    SelectionRect::new(0.0, 0.0, 1.0, 1.0)
}

fn client_for(server: &MockServer) -> EditClient {
    let config = ClientConfig {
        base_url: server.uri(),
        poll_interval: Duration::from_millis(10),
        max_poll_wait: Duration::from_secs(5),
        ..ClientConfig::default()
    };
    // Millisecond backoff keeps retry tests fast; the schedule itself is
    // covered by unit tests.
    let retry = RetryPolicy {
        max_attempts: 3,
        base_delay: Duration::from_millis(5),
        suggested_delay_pad: Duration::from_millis(1),
    };
    EditClient::with_config(API_KEY, config).with_retry_policy(retry)
}

fn edited_image_response() -> ResponseTemplate {
    use base64::Engine;
    let data = base64::engine::general_purpose::STANDARD.encode(b"edited-image-bytes");
    ResponseTemplate::new(200).set_body_json(json!({
        "candidates": [
            {
                "content": {
                    "parts": [
                        { "inlineData": { "mimeType": "image/png", "data": data } }
                    ]
                }
            }
        ]
    }))
}

#[tokio::test]
async fn inpaint_returns_first_image_payload() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/models/{}:generateContent", IMAGE_MODEL)))
        .and(query_param("key", API_KEY))
        .respond_with(edited_image_response())
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let edited = client.inpaint(&png_frame(), &selection()).await.unwrap();

    assert_eq!(edited.bytes, b"edited-image-bytes");
    assert_eq!(edited.mime_type, "image/png");
}

#[tokio::test]
async fn inpaint_without_image_payload_fails() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/models/{}:generateContent", IMAGE_MODEL)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [
                { "content": { "parts": [ { "text": "I cannot edit this image." } ] } }
            ]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.inpaint(&png_frame(), &selection()).await.unwrap_err();

    assert!(matches!(err, AiError::NoImageData));
}

#[tokio::test]
async fn inpaint_invalid_key_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/models/{}:generateContent", IMAGE_MODEL)))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {
                "code": 400,
                "message": "API key not valid. Please pass a valid API key.",
                "status": "INVALID_ARGUMENT"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.inpaint(&png_frame(), &selection()).await.unwrap_err();

    assert!(matches!(err, AiError::InvalidApiKey));
}

#[tokio::test]
async fn inpaint_quota_exhaustion_after_three_attempts() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/models/{}:generateContent", IMAGE_MODEL)))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": {
                "code": 429,
                "message": "Resource has been exhausted (e.g. check quota).",
                "status": "RESOURCE_EXHAUSTED"
            }
        })))
        .expect(3)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.inpaint(&png_frame(), &selection()).await.unwrap_err();

    match err {
        AiError::QuotaExceeded { ref operation } => assert_eq!(operation, "image editing"),
        other => panic!("expected QuotaExceeded, got {:?}", other),
    }
    assert!(err.to_string().contains("exceeded your API quota"));
}

#[tokio::test]
async fn inpaint_recovers_after_quota_failures() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/models/{}:generateContent", IMAGE_MODEL)))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": {
                "code": 429,
                "message": "quota",
                "status": "RESOURCE_EXHAUSTED",
                "details": [ { "retryDelay": "0.01s" } ]
            }
        })))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("/models/{}:generateContent", IMAGE_MODEL)))
        .respond_with(edited_image_response())
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let edited = client.inpaint(&png_frame(), &selection()).await.unwrap();

    assert_eq!(edited.bytes, b"edited-image-bytes");
}

#[tokio::test]
async fn animate_polls_until_done_and_downloads() {
    let server = MockServer::start().await;
    let op_name = format!("models/{}/operations/op1", VIDEO_MODEL);

    Mock::given(method("POST"))
        .and(path(format!("/models/{}:predictLongRunning", VIDEO_MODEL)))
        .and(query_param("key", API_KEY))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "name": op_name, "done": false })),
        )
        .expect(1)
        .mount(&server)
        .await;

    // First poll still pending, second completes with the download link.
    Mock::given(method("GET"))
        .and(path(format!("/{}", op_name)))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "name": op_name, "done": false })),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/{}", op_name)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": op_name,
            "done": true,
            "response": {
                "generateVideoResponse": {
                    "generatedSamples": [
                        { "video": { "uri": format!("{}/files/video.mp4?sig=abc", server.uri()) } }
                    ]
                }
            }
        })))
        .mount(&server)
        .await;

    // The signed link requires the key appended as a query parameter.
    Mock::given(method("GET"))
        .and(path("/files/video.mp4"))
        .and(query_param("sig", "abc"))
        .and(query_param("key", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"video-bytes".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let (_cancel_tx, cancel_rx) = watch::channel(false);
    let client = client_for(&server);
    let video = client.animate(&png_frame(), cancel_rx).await.unwrap();

    assert_eq!(video.bytes, b"video-bytes");
    assert_eq!(video.mime_type, "video/mp4");
}

#[tokio::test]
async fn animate_completed_without_link_fails() {
    let server = MockServer::start().await;
    let op_name = format!("models/{}/operations/op2", VIDEO_MODEL);

    Mock::given(method("POST"))
        .and(path(format!("/models/{}:predictLongRunning", VIDEO_MODEL)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "name": op_name, "done": true, "response": {} })),
        )
        .mount(&server)
        .await;

    let (_cancel_tx, cancel_rx) = watch::channel(false);
    let client = client_for(&server);
    let err = client.animate(&png_frame(), cancel_rx).await.unwrap_err();

    assert!(matches!(err, AiError::MissingDownloadLink));
}

#[tokio::test]
async fn animate_entity_not_found_download_means_key_problem() {
    let server = MockServer::start().await;
    let op_name = format!("models/{}/operations/op3", VIDEO_MODEL);

    Mock::given(method("POST"))
        .and(path(format!("/models/{}:predictLongRunning", VIDEO_MODEL)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": op_name,
            "done": true,
            "response": {
                "generateVideoResponse": {
                    "generatedSamples": [
                        { "video": { "uri": format!("{}/files/video.mp4", server.uri()) } }
                    ]
                }
            }
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/files/video.mp4"))
        .respond_with(
            ResponseTemplate::new(403).set_body_string("Requested entity was not found."),
        )
        .mount(&server)
        .await;

    let (_cancel_tx, cancel_rx) = watch::channel(false);
    let client = client_for(&server);
    let err = client.animate(&png_frame(), cancel_rx).await.unwrap_err();

    assert!(matches!(err, AiError::ApiKeyNotSelected));
}

#[tokio::test]
async fn animate_stops_polling_on_cancel() {
    let server = MockServer::start().await;
    let op_name = format!("models/{}/operations/op4", VIDEO_MODEL);

    Mock::given(method("POST"))
        .and(path(format!("/models/{}:predictLongRunning", VIDEO_MODEL)))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "name": op_name, "done": false })),
        )
        .mount(&server)
        .await;

    // Never completes.
    Mock::given(method("GET"))
        .and(path(format!("/{}", op_name)))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "name": op_name, "done": false })),
        )
        .mount(&server)
        .await;

    let (cancel_tx, cancel_rx) = watch::channel(false);
    let client = client_for(&server);

    let animate = tokio::spawn(async move {
        client.animate(&png_frame(), cancel_rx).await
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    cancel_tx.send(true).unwrap();

    let err = animate.await.unwrap().unwrap_err();
    assert!(matches!(err, AiError::Cancelled));
}

#[tokio::test]
async fn animate_operation_error_is_user_safe() {
    let server = MockServer::start().await;
    let op_name = format!("models/{}/operations/op5", VIDEO_MODEL);

    Mock::given(method("POST"))
        .and(path(format!("/models/{}:predictLongRunning", VIDEO_MODEL)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": op_name,
            "done": true,
            "error": { "code": 13, "message": "internal pipeline crash at worker-7" }
        })))
        .mount(&server)
        .await;

    let (_cancel_tx, cancel_rx) = watch::channel(false);
    let client = client_for(&server);
    let err = client.animate(&png_frame(), cancel_rx).await.unwrap_err();

    assert!(matches!(err, AiError::VideoGenerationFailed(_)));
    assert!(!err.to_string().contains("worker-7"));
}
