//! File sinks: where exported text and images end up.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbaImage};
use playstats_common::error::{PlaystatsError, PlaystatsResult};
use playstats_model::StatsSnapshot;

use crate::stats_csv::generate_csv;

/// Characters that are not allowed in file names on common platforms.
const ILLEGAL_FILENAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Destination for exported files.
pub trait FileSink: Send + Sync {
    /// Create `dir` and any missing parents.
    fn create_dir_all(&self, dir: &Path) -> PlaystatsResult<()>;

    /// Write `content` to `path`, replacing any existing file.
    fn write_text(&self, path: &Path, content: &str) -> PlaystatsResult<()>;

    /// Encode `image` as PNG at `path`, replacing any existing file.
    fn write_png(&self, path: &Path, image: &RgbaImage) -> PlaystatsResult<()>;

    /// Sink name for logging.
    fn name(&self) -> &str;
}

/// Writes straight to the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSink;

impl FileSink for FsSink {
    fn create_dir_all(&self, dir: &Path) -> PlaystatsResult<()> {
        std::fs::create_dir_all(dir).map_err(|e| PlaystatsError::from_io(dir, e))
    }

    fn write_text(&self, path: &Path, content: &str) -> PlaystatsResult<()> {
        std::fs::write(path, content).map_err(|e| PlaystatsError::from_io(path, e))
    }

    fn write_png(&self, path: &Path, image: &RgbaImage) -> PlaystatsResult<()> {
        image
            .save_with_format(path, ImageFormat::Png)
            .map_err(|e| match e {
                image::ImageError::IoError(io) => PlaystatsError::from_io(path, io),
                other => PlaystatsError::Image(other),
            })
    }

    fn name(&self) -> &str {
        "filesystem"
    }
}

/// Replace every character that is illegal in a file name with `_`.
pub fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| {
            if c.is_control() || ILLEGAL_FILENAME_CHARS.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect();
    if sanitized.is_empty() {
        "_".to_string()
    } else {
        sanitized
    }
}

/// File stem for `name` that no earlier image in the batch has taken.
///
/// Collisions get `_1`, `_2`, ... appended. Stems are compared without
/// case so case-insensitive filesystems keep every file too.
fn unique_stem(name: &str, used: &mut HashSet<String>) -> String {
    let base = sanitize_filename(name);
    let mut stem = base.clone();
    let mut suffix = 1;
    while !used.insert(stem.to_lowercase()) {
        stem = format!("{base}_{suffix}");
        suffix += 1;
    }
    stem
}

/// Write `snapshot` as CSV to `path`, creating parent directories.
pub fn export_csv(
    sink: &dyn FileSink,
    path: &Path,
    snapshot: &StatsSnapshot,
) -> PlaystatsResult<PathBuf> {
    if path.as_os_str().is_empty() {
        return Err(PlaystatsError::config("CSV export path is empty"));
    }

    let content = generate_csv(snapshot)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        sink.create_dir_all(parent)?;
    }
    sink.write_text(path, &content)?;

    tracing::info!(
        path = %path.display(),
        bytes = content.len(),
        sink = sink.name(),
        "Exported statistics CSV"
    );
    Ok(path.to_path_buf())
}

/// Write one `<sanitized-name>.png` per image into `folder`.
///
/// Names that sanitize to the same file name are suffixed so every image
/// gets its own file.
///
/// Nothing touches the disk when `images` is empty. A failure part way
/// through returns [`PlaystatsError::PartialExport`] listing the files
/// already written; those files are left in place.
pub fn export_heatmap_images(
    sink: &dyn FileSink,
    folder: &Path,
    images: &[(String, RgbaImage)],
) -> PlaystatsResult<Vec<PathBuf>> {
    if folder.as_os_str().is_empty() {
        return Err(PlaystatsError::config("Heatmap export folder is empty"));
    }
    if images.is_empty() {
        tracing::info!("No positional samples recorded, nothing to export");
        return Ok(Vec::new());
    }

    sink.create_dir_all(folder)?;

    let mut written = Vec::with_capacity(images.len());
    let mut used = HashSet::with_capacity(images.len());
    for (name, image) in images {
        let path = folder.join(format!("{}.png", unique_stem(name, &mut used)));
        if let Err(err) = sink.write_png(&path, image) {
            tracing::warn!(
                path = %path.display(),
                error = %err,
                written = written.len(),
                "Heatmap export aborted"
            );
            return Err(PlaystatsError::PartialExport {
                written,
                source: Box::new(err),
            });
        }
        written.push(path);
    }

    tracing::info!(
        folder = %folder.display(),
        files = written.len(),
        sink = sink.name(),
        "Exported heatmaps"
    );
    Ok(written)
}
