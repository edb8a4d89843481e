//! The scan loop: sample the reference once, then compare every candidate

use crate::{collect_candidates, Error, MatchLog, Result, ScanObserver};
use adfinder_core::{ExtensionSet, ScanHandle, Similarity, Threshold, VideoReference};
use adfinder_media::{score, FrameSampler};
use image::RgbImage;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Parameters of one scan
#[derive(Debug, Clone)]
pub struct ScanRequest {
    /// Reference video and the offset every video is sampled at
    pub reference: VideoReference,
    /// Directory searched recursively for candidates
    pub root_dir: PathBuf,
    /// Extensions a file must have to be compared
    pub extensions: ExtensionSet,
    /// Similarity a candidate must exceed to match
    pub threshold: Threshold,
}

impl ScanRequest {
    /// Rejects requests that cannot produce a meaningful scan
    pub fn validate(&self) -> Result<()> {
        let reference = self.reference.path();
        if !self.extensions.accepts(reference) {
            return Err(adfinder_core::Error::UnsupportedReference(reference.to_path_buf()).into());
        }
        if !self.root_dir.is_dir() {
            return Err(adfinder_core::Error::MissingWorkingDir(self.root_dir.clone()).into());
        }
        Ok(())
    }
}

/// Result of a finished (or cancelled) scan
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanOutcome {
    /// Matching candidates, in the order they were found
    pub matches: Vec<PathBuf>,
    /// Log artifact, present only when something matched
    pub log_path: Option<PathBuf>,
    /// Candidates that were sampled (successfully or not)
    pub examined: usize,
    /// Candidates left out because sampling or scoring failed
    pub skipped: usize,
    /// True when the run stopped on a cancellation request
    pub cancelled: bool,
}

/// Compares the candidates under a directory against a reference video
pub struct ScanPipeline<S> {
    sampler: S,
}

impl<S: FrameSampler> ScanPipeline<S> {
    pub fn new(sampler: S) -> Self {
        Self { sampler }
    }

    /// Runs one scan, driving `handle` from Idle to Completed or Aborted.
    ///
    /// Matches are appended to `log` as they are found. A candidate that
    /// cannot be sampled or scored is skipped; only invalid parameters, a
    /// reference that cannot be sampled, or a failed log write end the run
    /// with an error.
    pub fn run(
        &self,
        request: &ScanRequest,
        handle: &ScanHandle,
        observer: &dyn ScanObserver,
        log: &mut MatchLog,
    ) -> Result<ScanOutcome> {
        request.validate()?;
        handle.start()?;

        let reference = request.reference.path();
        let offset = request.reference.offset_seconds();

        let reference_frame = match self.sampler.extract_frame(reference, offset) {
            Ok(frame) => frame,
            Err(source) => {
                handle.abort()?;
                return Err(Error::ReferenceExtraction {
                    path: reference.to_path_buf(),
                    source,
                });
            }
        };
        observer.on_reference_sampled(reference);

        let candidates = collect_candidates(&request.root_dir, &request.extensions);
        let total = candidates.len();
        info!(
            "Comparing {} candidate(s) under {} at {}s",
            total,
            request.root_dir.display(),
            offset
        );
        observer.on_candidates_found(total);

        let mut outcome = ScanOutcome::default();
        for (index, candidate) in candidates.into_iter().enumerate() {
            if handle.is_cancel_requested() {
                info!("Scan cancelled after {} candidate(s)", outcome.examined);
                outcome.cancelled = true;
                break;
            }

            let path = candidate.path();
            observer.on_candidate(index, total, path);
            outcome.examined += 1;

            let similarity = match self.compare(&reference_frame, path, offset) {
                Ok(similarity) => similarity,
                Err(err) => {
                    debug!("Skipping {}: {}", path.display(), err);
                    observer.on_skip(path, &err.to_string());
                    outcome.skipped += 1;
                    continue;
                }
            };

            if request.threshold.is_exceeded_by(similarity) {
                if let Err(err) = log.append(path) {
                    handle.abort()?;
                    return Err(err.into());
                }
                info!("Match: {} ({})", path.display(), similarity);
                observer.on_match(path, similarity);
                outcome.matches.push(candidate.into_path());
            }
        }

        outcome.cancelled |= handle.is_cancel_requested();
        handle.complete()?;

        outcome.log_path = log.path().map(Path::to_path_buf);
        observer.on_finished(outcome.matches.len(), outcome.cancelled);
        Ok(outcome)
    }

    fn compare(
        &self,
        reference_frame: &RgbImage,
        path: &Path,
        offset_seconds: u32,
    ) -> adfinder_media::Result<Similarity> {
        let frame = self.sampler.extract_frame(path, offset_seconds)?;
        score(reference_frame, &frame)
    }
}
