//! Per-run log artifact listing matching files
//!
//! Each scan gets its own text file named after the Unix time the run
//! started. The file only appears once the first match is written, and every
//! match is flushed as soon as it is found so a run that is interrupted still
//! leaves its partial results behind.

use chrono::Utc;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const LOG_EXTENSION: &str = "txt";

/// Append-only list of matches for one scan run
#[derive(Debug)]
pub struct MatchLog {
    log_dir: PathBuf,
    stem: String,
    file: Option<(PathBuf, File)>,
    entries: usize,
}

impl MatchLog {
    /// Names the artifact after the current Unix time without touching the disk
    pub fn new(log_dir: &Path) -> Self {
        Self::with_stem(log_dir, Utc::now().timestamp().to_string())
    }

    fn with_stem(log_dir: &Path, stem: String) -> Self {
        Self {
            log_dir: log_dir.to_path_buf(),
            stem,
            file: None,
            entries: 0,
        }
    }

    /// Writes one matching path on its own line and flushes it
    pub fn append(&mut self, matched: &Path) -> io::Result<()> {
        let (_, file) = match &mut self.file {
            Some(open) => open,
            slot @ None => slot.insert(reserve(&self.log_dir, &self.stem)?),
        };

        writeln!(file, "{}", matched.display())?;
        file.flush()?;
        self.entries += 1;
        Ok(())
    }

    /// Location of the artifact, once at least one match was written
    pub fn path(&self) -> Option<&Path> {
        self.file.as_ref().map(|(path, _)| path.as_path())
    }

    /// Number of matches written so far
    pub fn len(&self) -> usize {
        self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }
}

/// Creates `{stem}.txt`, or `{stem}-N.txt` for the first N not taken yet.
///
/// The name is claimed with `create_new`, so concurrent runs started within
/// the same second never share a file.
fn reserve(log_dir: &Path, stem: &str) -> io::Result<(PathBuf, File)> {
    fs::create_dir_all(log_dir)?;

    let mut suffix = 0u32;
    loop {
        let name = match suffix {
            0 => format!("{stem}.{LOG_EXTENSION}"),
            n => format!("{stem}-{n}.{LOG_EXTENSION}"),
        };
        let path = log_dir.join(name);

        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => {
                debug!("Created match log {}", path.display());
                return Ok((path, file));
            }
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => suffix += 1,
            Err(err) => return Err(err),
        }
    }
}

/// Deletes every log artifact in `log_dir`, then the directory itself if
/// nothing else is left in it. Returns how many artifacts were removed.
pub fn clean_logs(log_dir: &Path) -> io::Result<usize> {
    if !log_dir.is_dir() {
        return Ok(0);
    }

    let mut removed = 0;
    for entry in fs::read_dir(log_dir)? {
        let path = entry?.path();
        let is_log = path.is_file()
            && path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case(LOG_EXTENSION));
        if is_log {
            fs::remove_file(&path)?;
            removed += 1;
        }
    }

    if fs::read_dir(log_dir)?.next().is_none() {
        fs::remove_dir(log_dir)?;
    }

    info!("Removed {} log file(s) from {}", removed, log_dir.display());
    Ok(removed)
}
