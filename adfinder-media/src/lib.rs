//! AdFinder Media Library
//!
//! This library samples a single frame from a video file and scores how
//! similar two sampled frames are.

pub mod frame_sampler;
pub mod similarity;

pub use frame_sampler::{FfmpegSampler, FrameSampler};
pub use similarity::{score, AverageHash};

use std::path::PathBuf;

/// Result type for adfinder-media operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for adfinder-media operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("FFmpeg error: {0}")]
    Ffmpeg(#[from] ffmpeg_next::Error),

    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("No video stream found")]
    NoVideoStream,

    #[error("Offset {offset_seconds}s is past the end of the video ({duration_seconds:.1}s)")]
    OffsetPastEnd {
        offset_seconds: u32,
        duration_seconds: f64,
    },

    #[error("No frame could be decoded after the seek point")]
    NoFrame,

    #[error("Decoded frame could not be converted to an image")]
    InvalidFrame,

    #[error("Cannot hash a {width}x{height} image")]
    DegenerateImage { width: u32, height: u32 },
}
