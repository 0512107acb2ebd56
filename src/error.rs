//! Error types shared by the filter and integrate jobs.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CurateError>;

/// Errors that abort a job before any output is written.
#[derive(Debug, Error)]
pub enum CurateError {
    /// A required input collection does not exist
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// Reading, copying or writing a file failed
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not a JSON array
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Serializing the output collection failed
    #[error("failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The HTTP client for the liveness probe could not be built
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

impl CurateError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CurateError::Io {
            path: path.into(),
            source,
        }
    }
}
