//! Heatmap rendering: normalize a grid and map it through a color ramp.

use image::{Rgba, RgbaImage};

use crate::grid::HeatmapGrid;

/// Color for empty cells: black at about 10% opacity.
const EMPTY: [f32; 4] = [0.0, 0.0, 0.0, 0.1];

/// A piecewise-linear color ramp over `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorRamp {
    /// Color for cells whose normalized value is exactly zero.
    empty: [f32; 4],
    /// Stops sorted by position, RGBA components in `[0, 1]`.
    stops: Vec<(f32, [f32; 4])>,
}

impl ColorRamp {
    /// Build a ramp from `(position, rgba)` stops. Stops are sorted by
    /// position; a ramp needs at least one stop.
    pub fn new(empty: [f32; 4], mut stops: Vec<(f32, [f32; 4])>) -> Option<Self> {
        if stops.is_empty() {
            return None;
        }
        stops.sort_by(|a, b| a.0.total_cmp(&b.0));
        Some(Self { empty, stops })
    }

    /// Black, blue, cyan, yellow, red at quarter steps.
    pub fn thermal() -> Self {
        Self {
            empty: EMPTY,
            stops: vec![
                (0.0, [0.0, 0.0, 0.0, 1.0]),
                (0.25, [0.0, 0.0, 1.0, 1.0]),
                (0.5, [0.0, 1.0, 1.0, 1.0]),
                (0.75, [1.0, 1.0, 0.0, 1.0]),
                (1.0, [1.0, 0.0, 0.0, 1.0]),
            ],
        }
    }

    /// Color for a normalized value. Values are clamped to `[0, 1]`; zero
    /// and NaN map to the empty color.
    pub fn color_at(&self, value: f32) -> Rgba<u8> {
        if value.is_nan() || value <= 0.0 {
            return to_rgba8(self.empty);
        }
        let value = value.min(1.0);

        let first = self.stops[0];
        if value <= first.0 {
            return to_rgba8(first.1);
        }
        for pair in self.stops.windows(2) {
            let (lo, lo_color) = pair[0];
            let (hi, hi_color) = pair[1];
            if value < hi {
                let span = hi - lo;
                let t = if span > 0.0 { (value - lo) / span } else { 1.0 };
                return to_rgba8(lerp(lo_color, hi_color, t));
            }
        }
        to_rgba8(self.stops[self.stops.len() - 1].1)
    }
}

impl Default for ColorRamp {
    fn default() -> Self {
        Self::thermal()
    }
}

fn lerp(a: [f32; 4], b: [f32; 4], t: f32) -> [f32; 4] {
    std::array::from_fn(|i| a[i] + (b[i] - a[i]) * t)
}

fn to_rgba8(color: [f32; 4]) -> Rgba<u8> {
    Rgba(color.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8))
}

/// Render `grid` to an image of the same dimensions.
///
/// Each cell is divided by the grid maximum (a non-positive maximum counts
/// as 1). Grid row `y` grows upward, so cell `(x, y)` lands on pixel
/// `(x, resolution - 1 - y)`.
pub fn render_heatmap(grid: &HeatmapGrid, ramp: &ColorRamp) -> RgbaImage {
    let resolution = grid.resolution();
    let mut max = grid.max_density();
    if max <= 0.0 {
        max = 1.0;
    }

    let size = resolution as u32;
    RgbaImage::from_fn(size, size, |px, py| {
        let x = px as usize;
        let y = resolution - 1 - py as usize;
        let value = grid.cell(x, y).unwrap_or(0.0) / max;
        ramp.color_at(value)
    })
}
