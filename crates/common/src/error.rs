//! Error types shared across Playstats crates.

use std::path::{Path, PathBuf};

/// Top-level error type for Playstats operations.
#[derive(Debug, thiserror::Error)]
pub enum PlaystatsError {
    #[error("Heatmap error: {message}")]
    Heatmap { message: String },

    #[error("Export error: {message}")]
    Export { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Invalid path: {path}")]
    InvalidPath { path: PathBuf },

    /// A batch export stopped part way. Files already written stay on disk.
    #[error("Export aborted after {} file(s): {source}", .written.len())]
    PartialExport {
        written: Vec<PathBuf>,
        #[source]
        source: Box<PlaystatsError>,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using PlaystatsError.
pub type PlaystatsResult<T> = Result<T, PlaystatsError>;

impl PlaystatsError {
    pub fn heatmap(msg: impl Into<String>) -> Self {
        Self::Heatmap {
            message: msg.into(),
        }
    }

    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Classify an I/O failure against the path it happened on.
    pub fn from_io(path: &Path, err: std::io::Error) -> Self {
        use std::io::ErrorKind;

        match err.kind() {
            ErrorKind::PermissionDenied => Self::PermissionDenied {
                path: path.to_path_buf(),
            },
            ErrorKind::NotFound | ErrorKind::InvalidInput => Self::InvalidPath {
                path: path.to_path_buf(),
            },
            _ => Self::Io(err),
        }
    }

    /// Files written before the failure, if this is a partial batch export.
    pub fn written_files(&self) -> &[PathBuf] {
        match self {
            Self::PartialExport { written, .. } => written,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn io_errors_are_classified_by_kind() {
        let path = Path::new("/locked/stats.csv");

        let denied = PlaystatsError::from_io(path, Error::from(ErrorKind::PermissionDenied));
        assert!(matches!(denied, PlaystatsError::PermissionDenied { ref path } if path.ends_with("stats.csv")));

        let missing = PlaystatsError::from_io(path, Error::from(ErrorKind::NotFound));
        assert!(matches!(missing, PlaystatsError::InvalidPath { .. }));

        let other = PlaystatsError::from_io(path, Error::from(ErrorKind::WriteZero));
        assert!(matches!(other, PlaystatsError::Io(_)));
    }

    #[test]
    fn partial_export_lists_written_files() {
        let err = PlaystatsError::PartialExport {
            written: vec![PathBuf::from("out/Look.png")],
            source: Box::new(PlaystatsError::export("disk full")),
        };
        assert_eq!(err.written_files().len(), 1);
        assert!(err.to_string().contains("1 file(s)"));
        assert!(PlaystatsError::config("x").written_files().is_empty());
    }
}
