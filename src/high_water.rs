//! Per-track high-water marks recorded while draining the first segment.

use std::collections::BTreeMap;
use std::fmt;

use crate::schema::{OutputSchema, Track};
use crate::timestamp::NOPTS_VALUE;

/// Highest pts and dts seen on one track, in that track's source time base.
/// `None` means no timestamp has been seen yet and orders below every real
/// timestamp, negative ones included.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HighWaterMark {
    pub max_pts: Option<i64>,
    pub max_dts: Option<i64>,
}

impl HighWaterMark {
    pub fn observe(&mut self, pts: Option<i64>, dts: Option<i64>) {
        self.max_pts = self.max_pts.max(pts);
        self.max_dts = self.max_dts.max(dts);
    }
}

/// Marks for every video and audio track. Other tracks are not tracked.
#[derive(Debug, Clone, Default)]
pub struct HighWaterTracker {
    marks: BTreeMap<usize, HighWaterMark>,
}

impl HighWaterTracker {
    pub fn new(tracks: &[Track]) -> Self {
        let marks = tracks
            .iter()
            .filter(|t| t.role.is_av())
            .map(|t| (t.index, HighWaterMark::default()))
            .collect();
        Self { marks }
    }

    pub fn observe(&mut self, index: usize, pts: Option<i64>, dts: Option<i64>) {
        if let Some(mark) = self.marks.get_mut(&index) {
            mark.observe(pts, dts);
        }
    }

    pub fn mark_for(&self, index: usize) -> Option<HighWaterMark> {
        self.marks.get(&index).copied()
    }

    pub fn summary(&self, schema: &OutputSchema) -> Phase1Summary {
        Phase1Summary {
            video: self.mark_for(schema.video_index()).unwrap_or_default(),
            audio: self.mark_for(schema.audio_index()).unwrap_or_default(),
        }
    }
}

/// The marks left behind by the first segment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Phase1Summary {
    pub video: HighWaterMark,
    pub audio: HighWaterMark,
}

/// Prints the four `Max <kind> <pts|dts>: <n>` lines; unset marks print as
/// `AV_NOPTS_VALUE`.
impl fmt::Display for Phase1Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = |v: Option<i64>| v.unwrap_or(NOPTS_VALUE);
        writeln!(f, "Max video pts: {}", value(self.video.max_pts))?;
        writeln!(f, "Max video dts: {}", value(self.video.max_dts))?;
        writeln!(f, "Max audio pts: {}", value(self.audio.max_pts))?;
        writeln!(f, "Max audio dts: {}", value(self.audio.max_dts))
    }
}
