use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    WriteCsv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("CSV output error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ReportError {
    /// Attach the destination file to an error raised by a path-less writer.
    pub(crate) fn at_path(self, path: &Path) -> Self {
        match self {
            Self::Csv(source) => Self::WriteCsv {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
