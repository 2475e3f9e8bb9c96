use crate::time::{Timestamp, open_end};

/// A drug-exposure interval.
///
/// A missing `stop` means the exposure is ongoing and behaves as the open-end
/// sentinel in every comparison. A missing `start` never overlaps anything,
/// and neither does an inverted interval whose start is after its stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    pub start: Option<Timestamp>,
    pub stop: Option<Timestamp>,
}

impl Interval {
    pub fn new(start: Option<Timestamp>, stop: Option<Timestamp>) -> Self {
        Self { start, stop }
    }

    /// The stop time with an open end clamped to the sentinel.
    pub fn effective_stop(&self) -> Timestamp {
        self.stop.unwrap_or_else(open_end)
    }

    /// True when both ends are present and `start` is after `stop`.
    pub fn is_inverted(&self) -> bool {
        matches!((self.start, self.stop), (Some(start), Some(stop)) if start > stop)
    }

    /// Closed-interval overlap test: `a0 <= b1 && b0 <= a1`.
    pub fn overlaps(&self, other: &Interval) -> bool {
        if self.is_inverted() || other.is_inverted() {
            return false;
        }
        match (self.start, other.start) {
            (Some(a0), Some(b0)) => a0 <= other.effective_stop() && b0 <= self.effective_stop(),
            _ => false,
        }
    }

    /// The shared window of two overlapping intervals.
    ///
    /// On ties the timestamp from `self` is kept, so the reported offset is
    /// the first exposure's.
    pub fn overlap_window(&self, other: &Interval) -> Option<(Timestamp, Timestamp)> {
        if !self.overlaps(other) {
            return None;
        }
        let (a0, b0) = (self.start?, other.start?);
        let start = if a0 >= b0 { a0 } else { b0 };
        let (a1, b1) = (self.effective_stop(), other.effective_stop());
        let stop = if a1 <= b1 { a1 } else { b1 };
        Some((start, stop))
    }
}
