use std::thread;

use playstats_common::clock::ManualClock;
use playstats_common::config::CacheLifetime;
use playstats_export::parse_csv;
use playstats_heatmap::RangeTable;
use playstats_model::{Backend, InputEvent, Point2, SampleSource};
use playstats_recorder::{InputRecorder, RecorderConfig};

fn discrete_recorder(clock: &ManualClock) -> InputRecorder {
    let config = RecorderConfig {
        ranges: RangeTable::for_display(100.0, 100.0),
        ..Default::default()
    };
    InputRecorder::new(config, Box::new(clock.clone()))
}

fn action_recorder(clock: &ManualClock, cache_lifetime: CacheLifetime) -> InputRecorder {
    let config = RecorderConfig {
        backend: Backend::Action,
        cache_lifetime,
        ..Default::default()
    };
    InputRecorder::new(config, Box::new(clock.clone()))
}

#[test]
fn key_counts_appear_in_csv() {
    let clock = ManualClock::new(0.0);
    let mut rec = discrete_recorder(&clock);
    rec.start_recording();
    for t in 0..3 {
        assert!(rec.ingest(&InputEvent::key(t, "A")));
    }
    assert!(rec.ingest(&InputEvent::key(3, "S")));
    clock.advance(4.0);
    rec.end_recording();

    let csv = rec.generate_csv().unwrap();
    assert!(csv.contains("\nKey,A,3\n"));
    assert!(csv.contains("\nKey,S,1\n"));
    assert!(csv.starts_with("Backend,StartTime,EndTime,Duration\nDiscrete,0,4,4\n"));
}

#[test]
fn snapshots_are_isolated_from_later_recording() {
    let clock = ManualClock::default();
    let mut rec = discrete_recorder(&clock);
    rec.start_recording();
    rec.ingest(&InputEvent::mouse_button(0, 0, 10.0, 10.0));

    let before = rec.snapshot();
    rec.ingest(&InputEvent::mouse_button(1, 0, 20.0, 20.0));
    rec.ingest(&InputEvent::key(2, "A"));

    assert_eq!(before.count(&SampleSource::MouseButton(0)), 1);
    assert_eq!(before.positions(&SampleSource::MouseButton(0)).len(), 1);
    assert_eq!(before.count(&SampleSource::key("A")), 0);

    let after = rec.snapshot();
    assert_eq!(after.count(&SampleSource::MouseButton(0)), 2);
}

#[test]
fn restarting_clears_previous_session() {
    let clock = ManualClock::default();
    let mut rec = discrete_recorder(&clock);
    rec.start_recording();
    rec.ingest(&InputEvent::key(0, "A"));
    rec.end_recording();

    rec.start_recording();
    assert!(rec.snapshot().counts.is_empty());
    assert_eq!(rec.events_ingested(), 0);
}

#[test]
fn heatmap_export_without_positional_samples_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let folder = dir.path().join("heatmaps");

    let clock = ManualClock::default();
    let mut rec = discrete_recorder(&clock);
    rec.start_recording();
    rec.ingest(&InputEvent::key(0, "A"));

    let written = rec.export_heatmaps(&folder, 16).unwrap();
    assert!(written.is_empty());
    assert!(!folder.exists());
}

#[test]
fn heatmap_export_writes_one_png_per_positional_source() {
    let dir = tempfile::tempdir().unwrap();
    let folder = dir.path().join("out").join("heatmaps");

    let clock = ManualClock::default();
    let mut rec = discrete_recorder(&clock);
    rec.start_recording();
    rec.ingest(&InputEvent::mouse_button(0, 0, 0.0, 0.0));
    rec.ingest(&InputEvent::mouse_button(1, 0, 100.0, 100.0));
    rec.ingest(&InputEvent::mouse_button(2, 1, 50.0, 50.0));
    rec.ingest(&InputEvent::key(3, "A"));
    rec.end_recording();

    let written = rec.export_heatmaps(&folder, 3).unwrap();
    assert_eq!(
        written,
        vec![folder.join("Mouse0.png"), folder.join("Mouse1.png")]
    );

    let grids = rec.heatmap_grids(3).unwrap();
    let (name, grid) = &grids[0];
    assert_eq!(name, "Mouse0");
    assert_eq!(grid.cell(0, 0), Some(1.0));
    assert_eq!(grid.cell(2, 2), Some(1.0));
    assert_eq!(grid.total(), 2.0);

    let png = image::open(folder.join("Mouse1.png")).unwrap().to_rgba8();
    assert_eq!(png.dimensions(), (3, 3));
}

#[test]
fn csv_export_round_trips_action_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stats.csv");

    let clock = ManualClock::new(10.0);
    let mut rec = action_recorder(&clock, CacheLifetime::Session);
    rec.start_recording();
    rec.ingest(&InputEvent::action(0, "Jump"));
    rec.ingest(&InputEvent::action(1, "Jump"));
    rec.ingest(&InputEvent::action_vector(2, "Look", 1.25, -3.5));
    rec.ingest(&InputEvent::action_vector(3, "Look", 0.0, 0.5));
    // Keys belong to the other backend.
    assert!(!rec.ingest(&InputEvent::key(4, "A")));
    clock.advance(2.5);
    rec.end_recording();

    rec.export_csv(&path).unwrap();
    let parsed = parse_csv(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let snapshot = rec.snapshot();

    assert_eq!(parsed.backend, Backend::Action);
    assert_eq!(parsed.start_time, 10.0);
    assert_eq!(parsed.end_time, 12.5);
    assert_eq!(parsed.counts, snapshot.counts);
    assert_eq!(parsed.positions, snapshot.positions);
    assert_eq!(
        parsed.positions[&SampleSource::action("Look")],
        vec![Point2::new(1.25, -3.5), Point2::new(0.0, 0.5)]
    );
}

#[test]
fn session_cache_lifetime_starts_each_session_fresh() {
    let clock = ManualClock::default();
    let mut rec = action_recorder(&clock, CacheLifetime::Session);

    rec.start_recording();
    rec.ingest(&InputEvent::action_vector(0, "Look", 5.0, 5.0));
    rec.ingest(&InputEvent::action_vector(1, "Look", 5.0, 5.0));
    assert_eq!(rec.heatmap_grids(11).unwrap()[0].1.total(), 2.0);
    rec.end_recording();

    rec.start_recording();
    rec.ingest(&InputEvent::action_vector(2, "Look", -5.0, -5.0));
    rec.ingest(&InputEvent::action_vector(3, "Look", -5.0, -5.0));
    rec.ingest(&InputEvent::action_vector(4, "Look", -5.0, -5.0));
    let grids = rec.heatmap_grids(11).unwrap();
    let grid = &grids[0].1;
    assert_eq!(grid.total(), 3.0);
    assert_eq!(grid.cell(0, 0), Some(3.0));
    assert_eq!(grid.cell(10, 10), Some(0.0));
}

#[test]
fn recorder_cache_lifetime_keeps_grids_across_sessions() {
    let clock = ManualClock::default();
    let mut rec = action_recorder(&clock, CacheLifetime::Recorder);

    rec.start_recording();
    rec.ingest(&InputEvent::action_vector(0, "Look", 5.0, 5.0));
    rec.ingest(&InputEvent::action_vector(1, "Look", 5.0, 5.0));
    rec.heatmap_grids(11).unwrap();
    rec.end_recording();

    rec.start_recording();
    for t in 2..5 {
        rec.ingest(&InputEvent::action_vector(t, "Look", -5.0, -5.0));
    }
    // The retained grid already covers two samples, so only the third new
    // one is binned on top of the previous session's counts.
    let grids = rec.heatmap_grids(11).unwrap();
    let grid = &grids[0].1;
    assert_eq!(grid.cell(10, 10), Some(2.0));
    assert_eq!(grid.cell(0, 0), Some(1.0));

    rec.reset_heatmap_cache();
    let grids = rec.heatmap_grids(11).unwrap();
    let grid = &grids[0].1;
    assert_eq!(grid.cell(10, 10), Some(0.0));
    assert_eq!(grid.cell(0, 0), Some(3.0));
}

#[test]
fn empty_export_destinations_are_rejected() {
    let clock = ManualClock::default();
    let rec = discrete_recorder(&clock);
    assert!(rec.export_csv(std::path::Path::new("")).is_err());
    assert!(rec.export_heatmaps(std::path::Path::new(""), 8).is_err());
}

#[test]
fn shared_recorder_accepts_events_from_many_threads() {
    let clock = ManualClock::default();
    let shared = discrete_recorder(&clock).into_shared();
    shared.lock().unwrap().start_recording();

    let workers: Vec<_> = (0..4)
        .map(|i| {
            let shared = shared.clone();
            thread::spawn(move || {
                for t in 0..250 {
                    let event = InputEvent::mouse_button(t, 0, (i * 10) as f32, 50.0);
                    shared.lock().unwrap().ingest(&event);
                    if t % 50 == 0 {
                        shared.lock().unwrap().heatmap_grids(8).unwrap();
                    }
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    let rec = shared.lock().unwrap();
    let snapshot = rec.snapshot();
    assert_eq!(snapshot.count(&SampleSource::MouseButton(0)), 1000);
    assert_eq!(rec.heatmap_grids(8).unwrap()[0].1.total(), 1000.0);
}
