//! Summarize an exported statistics CSV.

use std::path::PathBuf;

use playstats_export::parse_csv;

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", path.display()))?;
    let stats = parse_csv(&text).map_err(|e| anyhow::anyhow!("Failed to parse CSV: {e}"))?;

    println!("Statistics: {}", path.display());
    println!("  Backend: {}", stats.backend);
    if stats.end_time == 0.0 {
        println!("  Started: {:.2}s (still recording at export)", stats.start_time);
    } else {
        println!(
            "  Session: {:.2}s .. {:.2}s ({:.2}s)",
            stats.start_time, stats.end_time, stats.duration
        );
    }
    println!();

    println!("Counts:");
    if stats.counts.is_empty() {
        println!("  (none)");
    }
    for (source, count) in &stats.counts {
        println!("  {source}: {count}");
    }

    if !stats.positions.is_empty() {
        println!();
        println!("Positional samples:");
        for (source, points) in &stats.positions {
            println!("  {source}: {}", points.len());
        }
    }

    Ok(())
}
