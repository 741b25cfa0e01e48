//! Shared data models for the VWipe editing session.
//!
//! This crate provides Serde-serializable types for:
//! - Pixel selection rectangles and drag normalization
//! - Coarse positional description (3x3 grid phrases)
//! - Frame and video artifacts
//! - API credential presence tracking

pub mod artifact;
pub mod credential;
pub mod position;
pub mod rect;

// Re-export common types
pub use artifact::{ArtifactError, AspectRatio, FrameArtifact, VideoArtifact};
pub use credential::CredentialPresence;
pub use position::RegionPosition;
pub use rect::SelectionRect;
