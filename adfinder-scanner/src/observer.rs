//! Progress reporting hooks for a running scan

use adfinder_core::Similarity;
use std::path::Path;

/// Trait for following a scan as it runs.
///
/// The CLI prints progress lines; tests record events. All methods have
/// default no-op implementations.
pub trait ScanObserver {
    /// The reference frame was sampled and the scan is about to enumerate candidates
    fn on_reference_sampled(&self, _reference: &Path) {}

    /// Number of candidates with an accepted extension
    fn on_candidates_found(&self, _total: usize) {}

    /// About to sample candidate `index` (0-based) of `total`
    fn on_candidate(&self, _index: usize, _total: usize, _path: &Path) {}

    /// The candidate could not be sampled or scored and was left out
    fn on_skip(&self, _path: &Path, _reason: &str) {}

    /// The candidate exceeded the threshold and was written to the log
    fn on_match(&self, _path: &Path, _similarity: Similarity) {}

    /// The run ended normally or after a cancellation request
    fn on_finished(&self, _matches: usize, _cancelled: bool) {}
}

/// No-op observer for silent operation
pub struct SilentObserver;

impl ScanObserver for SilentObserver {}
