//! Accepted video file extensions

use crate::{Error, Result};
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

/// Set of accepted extensions, stored lowercase and dot-prefixed (".mp4")
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionSet {
    extensions: BTreeSet<String>,
}

impl ExtensionSet {
    /// Parses a comma-separated list such as `"mp4, AVI，.mkv"`.
    ///
    /// Both ASCII and full-width commas separate items. Items are trimmed,
    /// lowercased and normalized to a single leading dot; empty items are
    /// ignored.
    pub fn parse(list: &str) -> Result<Self> {
        let extensions: BTreeSet<String> = list
            .split([',', '，'])
            .map(|item| item.trim().trim_start_matches('.').to_lowercase())
            .filter(|item| !item.is_empty())
            .map(|item| format!(".{item}"))
            .collect();

        if extensions.is_empty() {
            return Err(Error::NoExtensions);
        }

        Ok(Self { extensions })
    }

    /// Checks whether a normalized extension (".mp4") is in the set
    pub fn contains(&self, extension: &str) -> bool {
        self.extensions.contains(extension)
    }

    /// Checks whether the path's extension is accepted, ignoring case
    pub fn accepts(&self, path: &Path) -> bool {
        normalized_extension(path).is_some_and(|ext| self.contains(&ext))
    }

    /// Iterates over the normalized extensions in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.extensions.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }
}

/// Renders the persisted form: comma-separated, without dots
impl fmt::Display for ExtensionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let items: Vec<&str> = self.iter().map(|ext| &ext[1..]).collect();
        f.write_str(&items.join(","))
    }
}

/// Returns the lowercase, dot-prefixed extension of a path
pub fn normalized_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .map(|ext| format!(".{}", ext.to_lowercase()))
}
