//! Smile signal accumulation.
//!
//! Turns a noisy per-sample probability stream into discrete score
//! flushes: each above-threshold sample adds one pending point, and a
//! full quota is emitted as a single outbound `smilePoint` frame.

use tracing::trace;

/// Accumulates above-threshold smile samples up to a flush quota.
///
/// The increment/flush decision for one sample is a single synchronous
/// step, so samples can never be lost or double counted around a flush.
#[derive(Debug)]
pub struct SmileAccumulator {
    threshold: f64,
    quota: u32,
    pending: u32,
}

impl SmileAccumulator {
    pub fn new(threshold: f64, quota: u32) -> Self {
        Self {
            threshold,
            quota,
            pending: 0,
        }
    }

    /// Record one probability sample.
    ///
    /// Returns `Some(quota)` when the quota is reached while the session
    /// is open; the pending counter resets in the same call and the
    /// caller fires the frame without awaiting an acknowledgement (the
    /// authoritative total arrives later via the `smilePoint` broadcast).
    ///
    /// While the session is not open the counter clamps at the quota, so
    /// a long outage can never produce an oversized or duplicate
    /// increment once connectivity resumes.
    pub fn record(&mut self, probability: f64, session_open: bool) -> Option<u32> {
        if probability > self.threshold {
            self.pending += 1;
            trace!(pending = self.pending, "Smile sample counted");
        }
        if self.pending >= self.quota {
            if session_open {
                self.pending = 0;
                return Some(self.quota);
            }
            self.pending = self.quota;
        }
        None
    }

    /// Discard the pending buffer.
    ///
    /// Called when the transport reopens: the server is authoritative,
    /// and replaying a stale partial count would risk double counting.
    pub fn reset(&mut self) {
        if self.pending > 0 {
            trace!(discarded = self.pending, "Discarding pending smile points");
        }
        self.pending = 0;
    }

    pub fn pending(&self) -> u32 {
        self.pending
    }

    pub fn quota(&self) -> u32 {
        self.quota
    }
}
