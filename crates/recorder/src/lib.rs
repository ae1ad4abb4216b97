//! Playstats Recorder
//!
//! Records player input during play sessions and turns it into
//! statistics, heatmaps, and export files. The host owns one
//! [`InputRecorder`], hands it every observed input event through
//! [`InputRecorder::ingest`], and polls it for snapshots and exports.
//!
//! Two backends are supported:
//!
//! - **Discrete:** Key presses and mouse button presses (with click positions)
//! - **Action:** Named actions, optionally carrying a 2D value

pub mod backends;
pub mod store;

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use image::RgbaImage;
use playstats_common::clock::SessionClock;
use playstats_common::config::{AppConfig, CacheLifetime};
use playstats_common::error::{PlaystatsError, PlaystatsResult};
use playstats_export::{export_heatmap_images, FileSink, FsSink};
use playstats_heatmap::{render_heatmap, ColorRamp, HeatmapBinner, HeatmapGrid, RangeTable};
use playstats_model::{Backend, InputEvent, StatsSnapshot};

pub use backends::{backend_for, ActionBackend, DiscreteBackend, InputBackend};
pub use store::SampleStore;

/// Recorder settings.
#[derive(Debug, Clone)]
pub struct RecorderConfig {
    /// Backend selected at construction.
    pub backend: Backend,

    /// When cached heatmap grids are discarded.
    pub cache_lifetime: CacheLifetime,

    /// Scale policy per positional source name.
    pub ranges: RangeTable,

    /// Color ramp for rendered heatmaps.
    pub ramp: ColorRamp,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Discrete,
            cache_lifetime: CacheLifetime::Session,
            ranges: RangeTable::default(),
            ramp: ColorRamp::thermal(),
        }
    }
}

impl RecorderConfig {
    /// Build recorder settings from application config.
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            backend: config.recording.backend,
            cache_lifetime: config.heatmap.cache_lifetime,
            ranges: RangeTable::for_display(
                config.heatmap.display_width,
                config.heatmap.display_height,
            ),
            ramp: ColorRamp::thermal(),
        }
    }
}

/// A recorder behind a mutex, for hosts that record and read from
/// different threads.
pub type SharedRecorder = Arc<Mutex<InputRecorder>>;

/// Owns one recording session's state and everything derived from it.
pub struct InputRecorder {
    backend: Box<dyn InputBackend>,
    store: SampleStore,
    clock: Box<dyn SessionClock>,
    sink: Box<dyn FileSink>,
    binner: HeatmapBinner,
    ramp: ColorRamp,
    cache_lifetime: CacheLifetime,
    is_recording: bool,
    start_time: f64,
    end_time: f64,
    events_ingested: u64,
}

impl InputRecorder {
    /// Create an idle recorder that writes exports to the local filesystem.
    pub fn new(config: RecorderConfig, clock: Box<dyn SessionClock>) -> Self {
        Self {
            backend: backend_for(config.backend),
            store: SampleStore::new(),
            clock,
            sink: Box::new(FsSink),
            binner: HeatmapBinner::new(config.ranges),
            ramp: config.ramp,
            cache_lifetime: config.cache_lifetime,
            is_recording: false,
            start_time: 0.0,
            end_time: 0.0,
            events_ingested: 0,
        }
    }

    /// Replace the export destination.
    pub fn with_sink(mut self, sink: Box<dyn FileSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Wrap the recorder for sharing across threads.
    pub fn into_shared(self) -> SharedRecorder {
        Arc::new(Mutex::new(self))
    }

    /// Begin a session: clears recorded samples and stamps the start time.
    ///
    /// Returns `false` (and changes nothing) if a session is already running.
    pub fn start_recording(&mut self) -> bool {
        if self.is_recording {
            tracing::debug!("start_recording ignored, already recording");
            return false;
        }

        self.store.clear();
        if self.cache_lifetime == CacheLifetime::Session {
            self.binner.clear();
        }
        self.start_time = self.clock.now_secs();
        self.end_time = 0.0;
        self.events_ingested = 0;
        self.is_recording = true;

        tracing::info!(
            backend = %self.backend.backend(),
            start = self.start_time,
            "Recording started"
        );
        true
    }

    /// End the current session and stamp the end time.
    ///
    /// Returns `false` if no session is running.
    pub fn end_recording(&mut self) -> bool {
        if !self.is_recording {
            tracing::debug!("end_recording ignored, not recording");
            return false;
        }

        self.end_time = self.clock.now_secs();
        self.is_recording = false;

        tracing::info!(
            backend = %self.backend.backend(),
            duration = self.end_time - self.start_time,
            events = self.events_ingested,
            "Recording stopped"
        );
        true
    }

    pub fn is_recording(&self) -> bool {
        self.is_recording
    }

    /// The active backend.
    pub fn backend(&self) -> Backend {
        self.backend.backend()
    }

    /// Switch backends. Refused while a session is running.
    pub fn set_backend(&mut self, kind: Backend) -> bool {
        if self.is_recording {
            tracing::warn!(
                current = %self.backend.backend(),
                requested = %kind,
                "Cannot switch backend while recording"
            );
            return false;
        }
        if self.backend.backend() != kind {
            self.backend = backend_for(kind);
            self.store.clear();
            tracing::info!(backend = %kind, "Backend switched");
        }
        true
    }

    /// Record one input event observed by the host.
    ///
    /// Events are ignored while idle and when the active backend does not
    /// record their kind. Returns whether the event was recorded.
    pub fn ingest(&mut self, event: &InputEvent) -> bool {
        if !self.is_recording {
            tracing::debug!(event = ?event.kind, "Event ignored, not recording");
            return false;
        }
        let recorded = self.backend.feed(&event.kind, &mut self.store);
        if recorded {
            self.events_ingested += 1;
        } else {
            tracing::debug!(
                backend = self.backend.name(),
                event = ?event.kind,
                "Event not recorded by active backend"
            );
        }
        recorded
    }

    /// Events recorded in the current or most recent session.
    pub fn events_ingested(&self) -> u64 {
        self.events_ingested
    }

    /// An independent copy of the current statistics.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            backend: self.backend.backend(),
            is_recording: self.is_recording,
            start_time: self.start_time,
            end_time: if self.is_recording { 0.0 } else { self.end_time },
            current_time: self.clock.now_secs(),
            counts: self.store.counts().clone(),
            positions: self.store.positions().clone(),
        }
    }

    /// Current statistics as CSV text.
    pub fn generate_csv(&self) -> PlaystatsResult<String> {
        playstats_export::generate_csv(&self.snapshot())
    }

    /// Write current statistics as CSV to `path`.
    pub fn export_csv(&self, path: &Path) -> PlaystatsResult<PathBuf> {
        playstats_export::export_csv(self.sink.as_ref(), path, &self.snapshot())
    }

    /// Raw heatmap grids, one per positional source with samples.
    ///
    /// Fails for resolutions above [`playstats_heatmap::MAX_RESOLUTION`].
    pub fn heatmap_grids(&self, resolution: usize) -> PlaystatsResult<Vec<(String, HeatmapGrid)>> {
        self.binner.bin_snapshot(&self.snapshot(), resolution)
    }

    /// Rendered heatmaps, one per positional source with samples.
    pub fn generate_heatmaps(&self, resolution: usize) -> PlaystatsResult<Vec<(String, RgbaImage)>> {
        let grids = self.heatmap_grids(resolution)?;
        Ok(grids
            .into_iter()
            .map(|(name, grid)| {
                let image = render_heatmap(&grid, &self.ramp);
                (name, image)
            })
            .collect())
    }

    /// Write one PNG per positional source into `folder`.
    pub fn export_heatmaps(&self, folder: &Path, resolution: usize) -> PlaystatsResult<Vec<PathBuf>> {
        if folder.as_os_str().is_empty() {
            return Err(PlaystatsError::config("Heatmap export folder is empty"));
        }
        let images = self.generate_heatmaps(resolution)?;
        export_heatmap_images(self.sink.as_ref(), folder, &images)
    }

    /// Forget all incremental heatmap state.
    pub fn reset_heatmap_cache(&self) {
        self.binner.clear();
    }
}

impl std::fmt::Debug for InputRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputRecorder")
            .field("backend", &self.backend.backend())
            .field("sink", &self.sink.name())
            .field("is_recording", &self.is_recording)
            .field("start_time", &self.start_time)
            .field("end_time", &self.end_time)
            .field("events_ingested", &self.events_ingested)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use playstats_common::clock::ManualClock;
    use playstats_model::SampleSource;

    fn recorder(clock: &ManualClock) -> InputRecorder {
        InputRecorder::new(RecorderConfig::default(), Box::new(clock.clone()))
    }

    #[test]
    fn start_and_end_are_guarded() {
        let clock = ManualClock::new(1.0);
        let mut rec = recorder(&clock);

        assert!(!rec.end_recording());
        assert!(rec.start_recording());
        assert!(!rec.start_recording());
        clock.advance(2.0);
        assert!(rec.end_recording());
        assert!(!rec.end_recording());

        let snapshot = rec.snapshot();
        assert_eq!(snapshot.start_time, 1.0);
        assert_eq!(snapshot.end_time, 3.0);
        assert!(!snapshot.is_recording);
    }

    #[test]
    fn events_are_ignored_while_idle() {
        let clock = ManualClock::default();
        let mut rec = recorder(&clock);
        assert!(!rec.ingest(&InputEvent::key(0, "A")));
        assert!(rec.snapshot().counts.is_empty());
    }

    #[test]
    fn snapshot_reports_zero_end_time_while_recording() {
        let clock = ManualClock::new(5.0);
        let mut rec = recorder(&clock);
        rec.start_recording();
        clock.advance(1.5);

        let snapshot = rec.snapshot();
        assert!(snapshot.is_recording);
        assert_eq!(snapshot.end_time, 0.0);
        assert_eq!(snapshot.current_time, 6.5);
        assert_eq!(snapshot.duration_secs(), 1.5);
    }

    #[test]
    fn backend_switch_refused_while_recording() {
        let clock = ManualClock::default();
        let mut rec = recorder(&clock);
        rec.start_recording();
        assert!(!rec.set_backend(Backend::Action));
        assert_eq!(rec.backend(), Backend::Discrete);

        rec.end_recording();
        assert!(rec.set_backend(Backend::Action));
        assert_eq!(rec.backend(), Backend::Action);
    }

    #[test]
    fn switching_backend_drops_other_backend_data() {
        let clock = ManualClock::default();
        let mut rec = recorder(&clock);
        rec.start_recording();
        rec.ingest(&InputEvent::key(0, "A"));
        rec.end_recording();

        rec.set_backend(Backend::Action);
        assert_eq!(rec.snapshot().count(&SampleSource::key("A")), 0);
    }

    #[test]
    fn recorder_config_follows_app_config() {
        let mut app = AppConfig::default();
        app.recording.backend = Backend::Action;
        app.heatmap.cache_lifetime = CacheLifetime::Recorder;
        app.heatmap.display_width = 800.0;

        let config = RecorderConfig::from_app_config(&app);
        assert_eq!(config.backend, Backend::Action);
        assert_eq!(config.cache_lifetime, CacheLifetime::Recorder);
        assert_eq!(config.ranges, RangeTable::for_display(800.0, 1080.0));
    }

    #[test]
    fn oversized_heatmap_resolution_is_an_error() {
        let clock = ManualClock::default();
        let mut rec = recorder(&clock);
        rec.start_recording();
        rec.ingest(&InputEvent::mouse_button(0, 0, 10.0, 10.0));

        for resolution in [playstats_heatmap::MAX_RESOLUTION + 1, usize::MAX] {
            assert!(matches!(
                rec.generate_heatmaps(resolution),
                Err(PlaystatsError::Heatmap { .. })
            ));
        }
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join("heatmaps");
        assert!(rec.export_heatmaps(&folder, usize::MAX).is_err());
        assert!(!folder.exists());
    }
}
