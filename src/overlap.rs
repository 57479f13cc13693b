//! Decides which second-segment packets are new content.

use crate::high_water::HighWaterTracker;

/// Admits a second-segment packet only when its pts, in the source time
/// base, is strictly past the first segment's mark for the same track.
/// Only pts is consulted; dts plays no part in the decision.
pub struct OverlapFilter<'a> {
    tracker: &'a HighWaterTracker,
}

impl<'a> OverlapFilter<'a> {
    pub fn new(tracker: &'a HighWaterTracker) -> Self {
        Self { tracker }
    }

    /// Tracks without a mark (not video or audio) and packets without a pts
    /// are rejected. A track that saw no pts in the first segment admits
    /// every timestamped packet.
    pub fn accept(&self, index: usize, pts: Option<i64>) -> bool {
        match (self.tracker.mark_for(index), pts) {
            (Some(mark), Some(pts)) => mark.max_pts.is_none_or(|max| pts > max),
            _ => false,
        }
    }
}
