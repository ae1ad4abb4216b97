//! Scale policies: how a source's raw values map onto grid cells.

use std::collections::HashMap;

use playstats_model::Point2;
use serde::{Deserialize, Serialize};

/// Value range of a positional source, per axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScalePolicy {
    /// Values expected in `[-rx, rx] x [-ry, ry]` (analog sticks, deltas).
    Centered { rx: f32, ry: f32 },
    /// Values expected in `[0, rx] x [0, ry]` (screen positions).
    Positive { rx: f32, ry: f32 },
}

impl ScalePolicy {
    /// Policy used for names the range table does not know.
    pub const FALLBACK: ScalePolicy = ScalePolicy::Centered { rx: 1.0, ry: 1.0 };

    /// Grid cell `(x, y)` for `point` on an `resolution`-square grid.
    ///
    /// Returns `None` when either axis lands outside `[0, resolution - 1]`.
    pub fn cell(&self, point: Point2, resolution: usize) -> Option<(usize, usize)> {
        if resolution == 0 {
            return None;
        }
        let (x, y) = match *self {
            ScalePolicy::Centered { rx, ry } => (
                axis_index((point.x as f64 + rx as f64) / (2.0 * rx as f64), resolution)?,
                axis_index((point.y as f64 + ry as f64) / (2.0 * ry as f64), resolution)?,
            ),
            ScalePolicy::Positive { rx, ry } => (
                axis_index(point.x as f64 / rx as f64, resolution)?,
                axis_index(point.y as f64 / ry as f64, resolution)?,
            ),
        };
        Some((x, y))
    }
}

/// Scale a unit-range value to a cell index, rounding half to even.
///
/// Non-finite input (e.g. from a zero-width range) never maps to a cell.
fn axis_index(unit: f64, resolution: usize) -> Option<usize> {
    let last = (resolution - 1) as f64;
    let index = (unit * last).round_ties_even();
    if index.is_finite() && (0.0..=last).contains(&index) {
        Some(index as usize)
    } else {
        None
    }
}

/// Static lookup from source name to scale policy.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeTable {
    entries: HashMap<String, ScalePolicy>,
    fallback: ScalePolicy,
}

/// Mouse button indices that get a screen-sized entry by default.
const MOUSE_BUTTONS: std::ops::RangeInclusive<u8> = 0..=6;

impl RangeTable {
    /// An empty table that resolves every name to `fallback`.
    pub fn new(fallback: ScalePolicy) -> Self {
        Self {
            entries: HashMap::new(),
            fallback,
        }
    }

    /// The standard table for a display of the given pixel size.
    ///
    /// Pointer positions and mouse clicks span the display, `Look` deltas
    /// span +/-5, and `ScrollWheel` spans +/-1 horizontally and +/-5
    /// vertically.
    pub fn for_display(width: f32, height: f32) -> Self {
        let screen = ScalePolicy::Positive {
            rx: width,
            ry: height,
        };
        let mut table = Self::new(ScalePolicy::FALLBACK)
            .with("Point", screen)
            .with("Look", ScalePolicy::Centered { rx: 5.0, ry: 5.0 })
            .with("ScrollWheel", ScalePolicy::Centered { rx: 1.0, ry: 5.0 });
        for button in MOUSE_BUTTONS {
            table.insert(format!("Mouse{button}"), screen);
        }
        table
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, policy: ScalePolicy) -> Self {
        self.insert(name, policy);
        self
    }

    /// Register or replace the policy for `name`.
    pub fn insert(&mut self, name: impl Into<String>, policy: ScalePolicy) {
        self.entries.insert(name.into(), policy);
    }

    /// Policy for `name`, or the fallback for unknown names.
    pub fn policy_for(&self, name: &str) -> ScalePolicy {
        self.entries.get(name).copied().unwrap_or(self.fallback)
    }

    pub fn fallback(&self) -> ScalePolicy {
        self.fallback
    }
}

impl Default for RangeTable {
    fn default() -> Self {
        Self::for_display(1920.0, 1080.0)
    }
}
