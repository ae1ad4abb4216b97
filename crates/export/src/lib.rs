//! Playstats Export
//!
//! Serializes recorded statistics and heatmap images to disk:
//!
//! ```text
//! StatsSnapshot ──► stats_csv::generate_csv ──► FileSink::write_text ──► stats.csv
//!
//! (name, RgbaImage)* ──► export_heatmap_images ──► FileSink::write_png ──► <name>.png
//! ```
//!
//! `stats_csv::parse_csv` reads an exported CSV back into counts and
//! ordered samples.

pub mod sink;
pub mod stats_csv;

pub use sink::*;
pub use stats_csv::{generate_csv, parse_csv, ParsedStats};
