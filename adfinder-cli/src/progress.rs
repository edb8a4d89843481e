//! Console progress with ETA estimation

use adfinder_core::Similarity;
use adfinder_scanner::ScanObserver;
use std::cell::Cell;
use std::path::Path;
use std::time::Instant;

/// Prints one line per candidate plus every match as it is found
pub struct CliReporter {
    start_time: Instant,
    total: Cell<usize>,
}

impl CliReporter {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            total: Cell::new(0),
        }
    }
}

impl ScanObserver for CliReporter {
    fn on_reference_sampled(&self, reference: &Path) {
        println!("Reference frame sampled from {}", reference.display());
    }

    fn on_candidates_found(&self, total: usize) {
        self.total.set(total);
        println!("Found {} candidate video(s)", total);
    }

    fn on_candidate(&self, index: usize, total: usize, path: &Path) {
        let elapsed_secs = self.start_time.elapsed().as_secs_f64();
        let percent = if total > 0 {
            (index as f64 / total as f64) * 100.0
        } else {
            0.0
        };

        if index > 0 {
            let rate = index as f64 / elapsed_secs;
            let remaining = (total - index) as f64 / rate;
            println!(
                "  [{}/{}] ({:.1}%) - elapsed: {} - ETA: {} - {}",
                index + 1,
                total,
                percent,
                format_duration(elapsed_secs),
                format_duration(remaining),
                path.display(),
            );
        } else {
            println!("  [1/{}] {}", total, path.display());
        }
    }

    fn on_match(&self, path: &Path, similarity: Similarity) {
        println!("  MATCH {} ({})", path.display(), similarity);
    }

    fn on_finished(&self, matches: usize, cancelled: bool) {
        let elapsed = format_duration(self.start_time.elapsed().as_secs_f64());
        if cancelled {
            println!("Scan cancelled after {}: {} match(es) so far", elapsed, matches);
        } else {
            println!(
                "Scanned {} candidate(s) in {}: {} match(es)",
                self.total.get(),
                elapsed,
                matches
            );
        }
    }
}

/// Short elapsed/ETA label: tenths below a minute, then whole minutes and
/// seconds, then hours and minutes
fn format_duration(secs: f64) -> String {
    let total = secs.max(0.0).round() as u64;
    match (total / 3600, total % 3600 / 60, total % 60) {
        (0, 0, _) => format!("{:.1}s", secs.max(0.0)),
        (0, mins, rest) => format!("{mins}m {rest:02}s"),
        (hours, mins, _) => format!("{hours}h {mins:02}m"),
    }
}
