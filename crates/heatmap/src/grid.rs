//! Square frequency grids built from 2D samples.

use playstats_common::error::{PlaystatsError, PlaystatsResult};
use playstats_model::Point2;

use crate::policy::ScalePolicy;

/// Largest accepted grid side, in cells.
pub const MAX_RESOLUTION: usize = 4096;

/// A square 2D histogram. Cells are stored row-major with `y` as the row.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapGrid {
    resolution: usize,
    cells: Vec<f32>,
}

impl HeatmapGrid {
    /// An all-zero grid of `resolution x resolution` cells (at least 1x1).
    ///
    /// Fails when `resolution` exceeds [`MAX_RESOLUTION`].
    pub fn new(resolution: usize) -> PlaystatsResult<Self> {
        let resolution = resolution.max(1);
        let len = resolution
            .checked_mul(resolution)
            .filter(|_| resolution <= MAX_RESOLUTION)
            .ok_or_else(|| {
                PlaystatsError::heatmap(format!(
                    "Resolution {resolution} exceeds the maximum of {MAX_RESOLUTION}"
                ))
            })?;
        Ok(Self {
            resolution,
            cells: vec![0.0; len],
        })
    }

    /// Bin every sample into a fresh grid.
    pub fn from_samples(
        samples: &[Point2],
        resolution: usize,
        policy: ScalePolicy,
    ) -> PlaystatsResult<Self> {
        let mut grid = Self::new(resolution)?;
        grid.accumulate(samples, policy);
        Ok(grid)
    }

    /// Add `samples` on top of the current counts.
    ///
    /// Returns how many samples landed inside the grid; the rest are
    /// dropped.
    pub fn accumulate(&mut self, samples: &[Point2], policy: ScalePolicy) -> usize {
        let mut binned = 0;
        for &point in samples {
            let Some((x, y)) = policy.cell(point, self.resolution) else {
                continue;
            };
            self.cells[y * self.resolution + x] += 1.0;
            binned += 1;
        }
        binned
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn cells(&self) -> &[f32] {
        &self.cells
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<f32> {
        if x >= self.resolution || y >= self.resolution {
            return None;
        }
        Some(self.cells[y * self.resolution + x])
    }

    /// Largest cell value, zero for an empty grid.
    pub fn max_density(&self) -> f32 {
        self.cells.iter().copied().fold(0.0_f32, f32::max)
    }

    /// Sum of all cells, i.e. the number of binned samples.
    pub fn total(&self) -> f32 {
        self.cells.iter().sum()
    }
}
