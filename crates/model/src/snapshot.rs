//! Point-in-time copies of recorded statistics.

use std::collections::BTreeMap;

use crate::source::{Backend, Point2, SampleSource};

/// An owned copy of a recorder's statistics at one instant.
///
/// A snapshot shares nothing with the recorder it came from; later
/// recording never changes it. It is what exporters and UIs read.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StatsSnapshot {
    /// Backend the statistics were recorded with.
    pub backend: Backend,

    /// Whether a session was in progress when the snapshot was taken.
    pub is_recording: bool,

    /// Session start, in clock seconds.
    pub start_time: f64,

    /// Session end, in clock seconds. Zero while a session is running.
    pub end_time: f64,

    /// Clock reading when the snapshot was taken.
    pub current_time: f64,

    /// Press/occurrence counts per source.
    pub counts: BTreeMap<SampleSource, u64>,

    /// Ordered 2D samples per positional source, oldest first.
    pub positions: BTreeMap<SampleSource, Vec<Point2>>,
}

impl StatsSnapshot {
    /// Count recorded for `source`, zero if never seen.
    pub fn count(&self, source: &SampleSource) -> u64 {
        self.counts.get(source).copied().unwrap_or(0)
    }

    /// Samples recorded for `source`, empty if none.
    pub fn positions(&self, source: &SampleSource) -> &[Point2] {
        self.positions
            .get(source)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Positional sources that hold at least one sample.
    pub fn positional_sources(&self) -> impl Iterator<Item = (&SampleSource, &[Point2])> {
        self.positions
            .iter()
            .filter(|(_, points)| !points.is_empty())
            .map(|(source, points)| (source, points.as_slice()))
    }

    /// Total number of positional samples across all sources.
    pub fn total_positions(&self) -> usize {
        self.positions.values().map(Vec::len).sum()
    }

    /// Session length: up to now while recording, up to the end otherwise.
    pub fn duration_secs(&self) -> f64 {
        let end = if self.is_recording {
            self.current_time
        } else {
            self.end_time
        };
        (end - self.start_time).max(0.0)
    }

    /// The key pressed most often. Ties go to the key that sorts first.
    pub fn most_frequent_key(&self) -> Option<(&str, u64)> {
        let mut best: Option<(&str, u64)> = None;
        for (source, &count) in &self.counts {
            let SampleSource::Key(code) = source else {
                continue;
            };
            if count == 0 {
                continue;
            }
            if best.map_or(true, |(_, top)| count > top) {
                best = Some((code.as_str(), count));
            }
        }
        best
    }
}
