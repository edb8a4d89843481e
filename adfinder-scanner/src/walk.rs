//! Candidate discovery under the working directory

use adfinder_core::{CandidateFile, ExtensionSet};
use std::path::Path;
use tracing::warn;
use walkdir::WalkDir;

/// Recursively lists the files under `root` whose extension is accepted.
///
/// Entries are visited in file-name order within each directory. Symlinks
/// are not followed, and entries that cannot be read are logged and skipped.
pub fn collect_candidates(root: &Path, extensions: &ExtensionSet) -> Vec<CandidateFile> {
    WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!("Skipping unreadable entry under {}: {}", root.display(), err);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| CandidateFile::new(entry.into_path()))
        .filter(|candidate| {
            candidate
                .extension()
                .is_some_and(|ext| extensions.contains(ext))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_collects_accepted_files_recursively() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("season 1/extras")).unwrap();
        fs::write(root.join("b.mp4"), "").unwrap();
        fs::write(root.join("A.MKV"), "").unwrap();
        fs::write(root.join("notes.txt"), "").unwrap();
        fs::write(root.join("season 1/ep1.avi"), "").unwrap();
        fs::write(root.join("season 1/extras/trailer.Mp4"), "").unwrap();
        fs::write(root.join("season 1/extras/cover.jpg"), "").unwrap();

        let extensions = ExtensionSet::parse("mp4,mkv,avi").unwrap();
        let found: Vec<_> = collect_candidates(root, &extensions)
            .into_iter()
            .map(|c| c.path().strip_prefix(root).unwrap().to_path_buf())
            .collect();

        assert_eq!(
            found,
            vec![
                Path::new("A.MKV").to_path_buf(),
                Path::new("b.mp4").to_path_buf(),
                Path::new("season 1/ep1.avi").to_path_buf(),
                Path::new("season 1/extras/trailer.Mp4").to_path_buf(),
            ]
        );
    }

    #[test]
    fn test_directories_named_like_videos_are_ignored() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("folder.mp4")).unwrap();

        let extensions = ExtensionSet::parse("mp4").unwrap();

        assert!(collect_candidates(dir.path(), &extensions).is_empty());
    }

    #[test]
    fn test_empty_directory() {
        let dir = tempdir().unwrap();
        let extensions = ExtensionSet::parse("mp4").unwrap();

        assert!(collect_candidates(dir.path(), &extensions).is_empty());
    }
}
