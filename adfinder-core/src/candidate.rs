//! Reference and candidate video descriptions

use crate::extensions::normalized_extension;
use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// The example video every candidate is compared against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoReference {
    path: PathBuf,
    offset_seconds: u32,
}

impl VideoReference {
    /// Creates a reference sampled at `offset_seconds` (must be positive)
    pub fn new(path: impl Into<PathBuf>, offset_seconds: u32) -> Result<Self> {
        if offset_seconds == 0 {
            return Err(Error::InvalidOffset(offset_seconds));
        }

        Ok(Self {
            path: path.into(),
            offset_seconds,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Time at which every video of the run is sampled
    pub fn offset_seconds(&self) -> u32 {
        self.offset_seconds
    }
}

/// A file discovered under the working directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    path: PathBuf,
    extension: Option<String>,
}

impl CandidateFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let extension = normalized_extension(&path);
        Self { path, extension }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Folder containing the file
    pub fn parent(&self) -> Option<&Path> {
        self.path.parent()
    }

    /// File name including the extension
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|name| name.to_str())
    }

    /// File name without the extension
    pub fn base_name(&self) -> Option<&str> {
        self.path.file_stem().and_then(|stem| stem.to_str())
    }

    /// Lowercase, dot-prefixed extension (".mp4")
    pub fn extension(&self) -> Option<&str> {
        self.extension.as_deref()
    }

    pub fn into_path(self) -> PathBuf {
        self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_rejects_zero_offset() {
        assert!(matches!(
            VideoReference::new("ref.mp4", 0),
            Err(Error::InvalidOffset(0))
        ));
        assert_eq!(VideoReference::new("ref.mp4", 5).unwrap().offset_seconds(), 5);
    }

    #[test]
    fn test_candidate_derived_attributes() {
        let candidate = CandidateFile::new("/media/shows/Episode 01.MKV");

        assert_eq!(candidate.parent(), Some(Path::new("/media/shows")));
        assert_eq!(candidate.file_name(), Some("Episode 01.MKV"));
        assert_eq!(candidate.base_name(), Some("Episode 01"));
        assert_eq!(candidate.extension(), Some(".mkv"));
    }

    #[test]
    fn test_candidate_without_extension() {
        let candidate = CandidateFile::new("/media/README");

        assert_eq!(candidate.extension(), None);
        assert_eq!(candidate.base_name(), Some("README"));
    }
}
