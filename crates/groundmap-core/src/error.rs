//! Errors raised while loading tables and statement files or writing reports.
//!
//! The rewrite, rename and aggregation passes themselves never fail.

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, GroundingError>;

#[derive(Debug, thiserror::Error)]
pub enum GroundingError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("delimited record error in {origin}: {source}")]
    Csv {
        origin: String,
        #[source]
        source: csv::Error,
    },

    /// A row with the wrong number of columns. Loading stops at the first one.
    #[error("{origin}:{line}: expected {expected} columns, found {found}")]
    MalformedRow {
        origin: String,
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("invalid JSON in {origin}: {source}")]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl GroundingError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(origin: impl Into<String>, source: csv::Error) -> Self {
        Self::Csv {
            origin: origin.into(),
            source,
        }
    }

    pub(crate) fn json(origin: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Json {
            origin: origin.into(),
            source,
        }
    }
}
