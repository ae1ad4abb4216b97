//! Playstats Heatmap Engine
//!
//! Turns recorded 2D samples into heatmap images:
//! - **Scale policies:** Map a named source's values onto grid cells
//! - **Binning:** Accumulate samples into square frequency grids
//! - **Caching:** Bin only samples that arrived since the last call
//! - **Rendering:** Normalize a grid and color it through a thermal ramp
//!
//! This crate is pure computation. Writing images to disk is the
//! exporter's job.

pub mod binner;
pub mod grid;
pub mod policy;
pub mod render;

pub use binner::HeatmapBinner;
pub use grid::{HeatmapGrid, MAX_RESOLUTION};
pub use policy::{RangeTable, ScalePolicy};
pub use render::{render_heatmap, ColorRamp};
