//! AdFinder Scanner Library
//!
//! This library walks a working directory and reports every video whose
//! sampled frame matches the frame sampled from a reference video.

pub mod match_log;
pub mod observer;
pub mod pipeline;
pub mod walk;

pub use match_log::{clean_logs, MatchLog};
pub use observer::{ScanObserver, SilentObserver};
pub use pipeline::{ScanOutcome, ScanPipeline, ScanRequest};
pub use walk::collect_candidates;

use std::path::PathBuf;

/// Result type for adfinder-scanner operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for adfinder-scanner operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Core(#[from] adfinder_core::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not sample the reference video {}: {source}", .path.display())]
    ReferenceExtraction {
        path: PathBuf,
        source: adfinder_media::Error,
    },
}

impl Error {
    /// True for bad user input detected before scanning started
    pub fn is_parameter_error(&self) -> bool {
        matches!(self, Error::Core(err) if err.is_parameter_error())
    }
}
