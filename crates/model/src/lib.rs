//! Playstats Model
//!
//! Defines the core data contracts shared by the recorder and exporters:
//! - **Sources:** Recordable input channels and the backend that owns them
//! - **Events:** Timestamped input events fed to a recorder by its host
//! - **Snapshots:** Immutable copies of recorded statistics
//!
//! Positional samples keep the units the host delivered them in (pixels
//! for pointer clicks, raw axis values for analog actions). Scaling into
//! heatmap cells happens downstream.

pub mod event;
pub mod snapshot;
pub mod source;

pub use event::*;
pub use snapshot::*;
pub use source::*;
