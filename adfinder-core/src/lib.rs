//! AdFinder Core Library
//!
//! This library provides the data model shared by the AdFinder crates: the
//! parameters of a scan, the persisted user configuration and the lifecycle
//! of a running scan.

pub mod candidate;
pub mod config;
pub mod extensions;
pub mod scan_handle;
pub mod similarity;

pub use candidate::{CandidateFile, VideoReference};
pub use config::AppConfig;
pub use extensions::ExtensionSet;
pub use scan_handle::{ScanHandle, ScanState};
pub use similarity::{Similarity, Threshold};

use std::path::PathBuf;

/// Result type for adfinder-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for adfinder-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Sample offset must be a positive number of seconds, got {0}")]
    InvalidOffset(u32),

    #[error("Similarity must be a percentage between 0 and 100, got {0}")]
    InvalidSimilarity(u32),

    #[error("No accepted video extensions configured")]
    NoExtensions,

    #[error("Reference file {} does not have an accepted video extension", .0.display())]
    UnsupportedReference(PathBuf),

    #[error("Working directory {} does not exist", .0.display())]
    MissingWorkingDir(PathBuf),

    #[error("Cannot move scan from {from:?} to {to:?}")]
    InvalidTransition { from: ScanState, to: ScanState },
}

impl Error {
    /// Returns true for errors caused by bad user input, which are reported
    /// before any scanning starts.
    pub fn is_parameter_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidOffset(_)
                | Error::InvalidSimilarity(_)
                | Error::NoExtensions
                | Error::UnsupportedReference(_)
                | Error::MissingWorkingDir(_)
        )
    }
}
