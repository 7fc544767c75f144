use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

/// Errors raised while reading or writing the CSV sources, or while
/// fabricating synthetic data.
///
/// Filtering and snapshot extraction never fail; they degrade to empty
/// output instead.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("cannot access '{}': {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("missing required column '{0}'")]
    MissingColumn(String),

    #[error("line {line}, column '{column}': {reason} (got '{value}')")]
    MalformedValue {
        line: u64,
        column: String,
        value: String,
        reason: String,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("{weeks} weeks starting {start} run past the last representable date")]
    WeekRange { start: NaiveDate, weeks: usize },
}

/// The two failure classes callers distinguish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required column or value is missing or unparseable, or a
    /// requested week range cannot be dated.
    DataFormat,
    /// The file could not be opened, read or written.
    FileAccess,
}

impl DataError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DataError::FileAccess { .. } => ErrorKind::FileAccess,
            DataError::Csv(e) if e.is_io_error() => ErrorKind::FileAccess,
            DataError::MissingColumn(_)
            | DataError::MalformedValue { .. }
            | DataError::Csv(_)
            | DataError::WeekRange { .. } => ErrorKind::DataFormat,
        }
    }

    pub(crate) fn file_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DataError::FileAccess {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, DataError>;
