//! History persistence errors

use std::path::PathBuf;
use tally_core::{CalcError, NumberError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed history file: {0}")]
    Csv(#[from] csv::Error),

    #[error("line {line}: {reason}")]
    Row { line: usize, reason: String },

    #[error("cannot serialize {record}: {source}")]
    Unperformable {
        record: String,
        #[source]
        source: NumberError,
    },
}

impl HistoryError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}

impl From<HistoryError> for CalcError {
    fn from(err: HistoryError) -> Self {
        CalcError::Persistence(err.to_string())
    }
}
