use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failure converting a single unit. Never aborts the batch.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid input pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

/// Failure loading the coverage manifest. Callers degrade to an empty manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read coverage manifest {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed coverage manifest: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("malformed coverage manifest {path}: {source}")]
    ParseFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Valid JSON without a `categories` object of string lists.
    #[error("coverage manifest has the wrong shape: {0}")]
    Shape(#[source] serde_json::Error),

    #[error("coverage manifest {path} has the wrong shape: {source}")]
    ShapeFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ManifestError {
    pub(crate) fn at(self, path: &Path) -> Self {
        match self {
            Self::Parse(source) => Self::ParseFile {
                path: path.to_path_buf(),
                source,
            },
            Self::Shape(source) => Self::ShapeFile {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        }
    }
}
