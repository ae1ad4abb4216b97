//! Playstats Common Utilities
//!
//! Shared infrastructure for all Playstats crates:
//! - Error types and result aliases
//! - Session clocks for recording timestamps
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
