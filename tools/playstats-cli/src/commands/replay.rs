//! Replay a recorded input event log through a recorder and export it.

use std::path::PathBuf;

use playstats_common::clock::ManualClock;
use playstats_common::config::AppConfig;
use playstats_heatmap::RangeTable;
use playstats_model::{parse_events, Backend, InputEvent};
use playstats_recorder::{InputRecorder, RecorderConfig};

pub struct ReplayArgs {
    pub path: PathBuf,
    pub backend: Option<String>,
    pub out: Option<PathBuf>,
    pub resolution: Option<u32>,
    pub display: Option<String>,
}

/// What a replay produced.
#[derive(Debug)]
pub struct ReplayReport {
    pub events: usize,
    pub recorded: usize,
    pub duration_secs: f64,
    pub csv_path: PathBuf,
    pub heatmaps: Vec<PathBuf>,
}

pub fn run(config: &AppConfig, args: ReplayArgs) -> anyhow::Result<()> {
    println!("Replaying events from: {}", args.path.display());

    let content = std::fs::read_to_string(&args.path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", args.path.display()))?;
    let events =
        parse_events(&content).map_err(|e| anyhow::anyhow!("Failed to parse events: {e}"))?;
    println!("  Loaded {} events", events.len());

    let report = replay(config, &args, &events)?;

    println!(
        "  Recorded {} of {} events over {:.2}s",
        report.recorded, report.events, report.duration_secs
    );
    println!("  Statistics: {}", report.csv_path.display());
    if report.heatmaps.is_empty() {
        println!("  No positional samples, no heatmaps written.");
    }
    for path in &report.heatmaps {
        println!("  Heatmap: {}", path.display());
    }
    println!("\nReplay complete.");

    Ok(())
}

pub fn replay(
    config: &AppConfig,
    args: &ReplayArgs,
    events: &[InputEvent],
) -> anyhow::Result<ReplayReport> {
    let mut recorder_config = RecorderConfig::from_app_config(config);
    if let Some(backend) = &args.backend {
        recorder_config.backend = backend.parse::<Backend>()?;
    }
    if let Some(display) = &args.display {
        let (width, height) = parse_display(display)?;
        recorder_config.ranges = RangeTable::for_display(width, height);
    }

    let start = events.first().map(InputEvent::timestamp_secs).unwrap_or(0.0);
    let clock = ManualClock::new(start);
    let mut recorder = InputRecorder::new(recorder_config, Box::new(clock.clone()));

    recorder.start_recording();
    let mut recorded = 0;
    for event in events {
        clock.set(event.timestamp_secs());
        if recorder.ingest(event) {
            recorded += 1;
        }
    }
    recorder.end_recording();

    let out = args.out.clone().unwrap_or_else(|| config.export_dir.clone());
    let resolution = args.resolution.unwrap_or(config.heatmap.resolution) as usize;

    let csv_path = recorder.export_csv(&out.join("stats.csv"))?;
    let heatmaps = recorder.export_heatmaps(&out.join("heatmaps"), resolution)?;

    tracing::info!(
        events = events.len(),
        recorded,
        heatmaps = heatmaps.len(),
        "Replay exported"
    );

    Ok(ReplayReport {
        events: events.len(),
        recorded,
        duration_secs: recorder.snapshot().duration_secs(),
        csv_path,
        heatmaps,
    })
}

/// Parse `WIDTHxHEIGHT` into a positive pixel size.
fn parse_display(raw: &str) -> anyhow::Result<(f32, f32)> {
    let (w, h) = raw
        .split_once(['x', 'X'])
        .ok_or_else(|| anyhow::anyhow!("Display must look like 1920x1080, got '{raw}'"))?;
    let width: f32 = w.trim().parse()?;
    let height: f32 = h.trim().parse()?;
    if width <= 0.0 || height <= 0.0 {
        anyhow::bail!("Display size must be positive, got '{raw}'");
    }
    Ok((width, height))
}
