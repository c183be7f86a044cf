//! Best-effort completion estimate for a running crawl.
//!
//! The estimate is a heuristic, not a promise of linear completion. The set of
//! discovered pages keeps growing while the crawl runs and no total is ever
//! reported, so `(extracted + failed) / discovered` is only a rough ratio. It is
//! capped at [`PROGRESS_CEILING`] until the engine reports a terminal status,
//! which alone yields [`PROGRESS_COMPLETE`].

use crate::JobSnapshot;

/// Highest percentage shown while the job is still running.
pub const PROGRESS_CEILING: u8 = 95;
/// Percentage shown once the job reached a terminal status.
pub const PROGRESS_COMPLETE: u8 = 100;

/// Stateless estimate for a single snapshot.
///
/// Returns `None` when nothing has been discovered yet and the job is still running.
pub fn estimate(snapshot: &JobSnapshot) -> Option<u8> {
    if snapshot.is_terminal() {
        return Some(PROGRESS_COMPLETE);
    }
    if snapshot.discovered == 0 {
        return None;
    }
    let processed = u128::from(snapshot.extracted) + u128::from(snapshot.failed);
    let percent = processed * 100 / u128::from(snapshot.discovered);
    let capped = percent.min(u128::from(PROGRESS_CEILING));
    // `capped` is at most 95 here.
    Some(capped as u8)
}

/// Per-session estimator that never lets the shown value go backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProgressEstimator {
    last: Option<u8>,
}

impl ProgressEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds the next snapshot and returns the value to display.
    pub fn observe(&mut self, snapshot: &JobSnapshot) -> Option<u8> {
        let next = match (self.last, estimate(snapshot)) {
            (Some(last), Some(current)) => Some(last.max(current)),
            (last, None) => last,
            (None, current) => current,
        };
        self.last = next;
        next
    }

    pub fn last(&self) -> Option<u8> {
        self.last
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}
