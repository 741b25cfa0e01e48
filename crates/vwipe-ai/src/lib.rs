//! Gemini client for image inpainting and video generation.
//!
//! This crate provides:
//! - A typed error taxonomy separating quota, credential, and malformed
//!   response failures from generic ones
//! - A retry controller that retries quota failures only, honoring
//!   API-suggested delays over its default exponential backoff
//! - The inpaint operation (image + positional instruction, image output)
//! - The animate operation (long-running video generation with a bounded,
//!   cancellable poll loop and signed-link download)

pub mod client;
pub mod config;
pub mod error;
pub mod retry;
mod wire;

pub use client::EditClient;
pub use config::ClientConfig;
pub use error::{AiError, AiResult};
pub use retry::{with_quota_retry, RetryPolicy};
