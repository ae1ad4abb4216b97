//! Incremental heatmap binning with a per-(name, resolution) cache.
//!
//! Position sequences only ever grow during a session, so a named
//! sequence that was binned before only needs its new tail binned again.
//! Each cache entry remembers how many leading samples its grid already
//! holds.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use playstats_common::error::PlaystatsResult;
use playstats_model::{Point2, StatsSnapshot};

use crate::grid::{HeatmapGrid, MAX_RESOLUTION};
use crate::policy::RangeTable;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    name: String,
    resolution: usize,
}

#[derive(Debug)]
struct CacheEntry {
    /// Leading samples already binned into `grid`.
    processed: usize,
    grid: HeatmapGrid,
}

/// Bins positional samples into heatmap grids, reusing earlier work.
///
/// The cache sits behind a mutex so that the processed count and its grid
/// are always updated together, even with concurrent callers.
#[derive(Debug)]
pub struct HeatmapBinner {
    ranges: RangeTable,
    cache: Mutex<HashMap<CacheKey, CacheEntry>>,
}

impl HeatmapBinner {
    pub fn new(ranges: RangeTable) -> Self {
        Self {
            ranges,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn ranges(&self) -> &RangeTable {
        &self.ranges
    }

    /// Bin `samples` into an `resolution`-square grid.
    ///
    /// With a `name`, the source's scale policy comes from the range table
    /// and only samples beyond the cached processed count are binned. An
    /// anonymous call uses the fallback policy and always bins everything.
    /// Resolutions above [`MAX_RESOLUTION`] are rejected.
    pub fn bin(
        &self,
        name: Option<&str>,
        samples: &[Point2],
        resolution: usize,
    ) -> PlaystatsResult<HeatmapGrid> {
        let resolution = resolution.max(1);
        let Some(name) = name else {
            return HeatmapGrid::from_samples(samples, resolution, self.ranges.fallback());
        };

        let policy = self.ranges.policy_for(name);
        let mut cache = self.lock();
        let key = CacheKey {
            name: name.to_string(),
            resolution,
        };

        let entry = match cache.entry(key) {
            Entry::Occupied(occupied) => occupied.into_mut(),
            Entry::Vacant(vacant) => vacant.insert(CacheEntry {
                processed: 0,
                grid: HeatmapGrid::new(resolution)?,
            }),
        };

        if entry.processed > samples.len() {
            tracing::warn!(
                source = name,
                resolution,
                cached = entry.processed,
                available = samples.len(),
                "Sample sequence shrank below cached count, rebuilding heatmap"
            );
            entry.grid = HeatmapGrid::new(resolution)?;
            entry.processed = 0;
        }

        let fresh = &samples[entry.processed..];
        if !fresh.is_empty() {
            let binned = entry.grid.accumulate(fresh, policy);
            tracing::debug!(
                source = name,
                resolution,
                new_samples = fresh.len(),
                binned,
                "Binned new heatmap samples"
            );
        }
        entry.processed = samples.len();
        Ok(entry.grid.clone())
    }

    /// One grid per positional source holding at least one sample.
    pub fn bin_snapshot(
        &self,
        snapshot: &StatsSnapshot,
        resolution: usize,
    ) -> PlaystatsResult<Vec<(String, HeatmapGrid)>> {
        snapshot
            .positional_sources()
            .map(|(source, samples)| {
                let name = source.name();
                let grid = self.bin(Some(&name), samples, resolution)?;
                Ok((name, grid))
            })
            .collect()
    }

    /// Samples already binned for `(name, resolution)`, if cached.
    pub fn processed_count(&self, name: &str, resolution: usize) -> Option<usize> {
        let key = CacheKey {
            name: name.to_string(),
            resolution: resolution.max(1),
        };
        self.lock().get(&key).map(|entry| entry.processed)
    }

    /// Number of cached grids.
    pub fn cached_entries(&self) -> usize {
        self.lock().len()
    }

    /// Forget all cached grids.
    pub fn clear(&self) {
        let mut cache = self.lock();
        if !cache.is_empty() {
            tracing::debug!(entries = cache.len(), "Clearing heatmap cache");
        }
        cache.clear();
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<CacheKey, CacheEntry>> {
        // A panic mid-update can only leave a stale entry behind, which the
        // shrink check or a clear() recovers from.
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for HeatmapBinner {
    fn default() -> Self {
        Self::new(RangeTable::default())
    }
}
