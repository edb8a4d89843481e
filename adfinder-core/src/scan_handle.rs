//! Scan lifecycle state machine
//!
//! A `ScanHandle` is shared between the pipeline, which drives the run, and
//! the presentation layer, which polls the state and may request
//! cancellation. Clones refer to the same scan.

use crate::{Error, Result};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Lifecycle states of a scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Idle,
    Running,
    CancelRequested,
    Completed,
    Aborted,
}

impl ScanState {
    /// True once the run has ended, whatever the reason
    pub fn is_terminal(self) -> bool {
        matches!(self, ScanState::Completed | ScanState::Aborted)
    }
}

/// Thread-safe handle over the state of one scan
#[derive(Debug, Clone)]
pub struct ScanHandle {
    state: Arc<Mutex<ScanState>>,
}

impl Default for ScanHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanHandle {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(ScanState::Idle)),
        }
    }

    pub fn state(&self) -> ScanState {
        *self.lock()
    }

    /// Idle -> Running
    pub fn start(&self) -> Result<()> {
        self.transition(ScanState::Running, |from| from == ScanState::Idle)
    }

    /// Running -> CancelRequested.
    ///
    /// Returns false when there is no running scan to cancel.
    pub fn cancel(&self) -> bool {
        let mut state = self.lock();
        if *state == ScanState::Running {
            *state = ScanState::CancelRequested;
            true
        } else {
            false
        }
    }

    /// Polled by the pipeline between candidates
    pub fn is_cancel_requested(&self) -> bool {
        self.state() == ScanState::CancelRequested
    }

    /// Running | CancelRequested -> Completed
    pub fn complete(&self) -> Result<()> {
        self.transition(ScanState::Completed, |from| {
            matches!(from, ScanState::Running | ScanState::CancelRequested)
        })
    }

    /// Running | CancelRequested -> Aborted
    pub fn abort(&self) -> Result<()> {
        self.transition(ScanState::Aborted, |from| {
            matches!(from, ScanState::Running | ScanState::CancelRequested)
        })
    }

    /// Completed | Aborted -> Idle, so the handle can drive another run
    pub fn reset(&self) -> Result<()> {
        self.transition(ScanState::Idle, ScanState::is_terminal)
    }

    fn transition(&self, to: ScanState, allowed: impl Fn(ScanState) -> bool) -> Result<()> {
        let mut state = self.lock();
        let from = *state;
        if !allowed(from) {
            return Err(Error::InvalidTransition { from, to });
        }
        *state = to;
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, ScanState> {
        // The guarded value is a plain enum, so a poisoned lock still holds a valid state.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
