//! FFmpeg CLI wrapper for frame extraction.
//!
//! This crate provides:
//! - A command builder and runner for FFmpeg invocations
//! - FFprobe-based container and stream inspection
//! - First-frame extraction producing a JPEG at native resolution

pub mod command;
pub mod error;
pub mod frame;
pub mod probe;

pub use command::{check_ffmpeg, check_ffprobe, FfmpegCommand, FfmpegRunner};
pub use error::{MediaError, MediaResult};
pub use frame::{extract_first_frame, FRAME_TIMESTAMP_SECS};
pub use probe::{probe_video, VideoInfo};
