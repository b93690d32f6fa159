//! Error types for the maintenance log.
//!
//! Failures fall into four kinds: storage (the database or its files are
//! unusable), validation (bad user input on a direct insert), import (a bad
//! import file or a failure partway through a bulk import) and config.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while working with the maintenance log.
#[derive(Debug, Error)]
pub enum Error {
    /// SQLite operation failure.
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// Filesystem failure around the backing storage.
    #[error("storage error: cannot access {}: {source}", path.display())]
    StorageIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Another process holds the writer lock.
    #[error("storage error: {} is in use by another process", path.display())]
    Locked { path: PathBuf },

    /// A stored value cannot be read back as its expected type.
    #[error("storage error: record {id}: {reason}")]
    CorruptRow { id: i64, reason: String },

    /// Rejected user input.
    #[error("{0}")]
    Validation(String),

    /// Import stopped at the first failure. Rows before it stay committed.
    #[error("import from {source_name} failed ({committed} rows committed before the failure): {cause}")]
    Import {
        source_name: String,
        committed: usize,
        #[source]
        cause: ImportCause,
    },

    /// Unreadable or invalid configuration file.
    #[error("config error: {}: {reason}", path.display())]
    Config { path: PathBuf, reason: String },
}

/// The underlying failure of an import.
#[derive(Debug, Error)]
pub enum ImportCause {
    #[error("cannot read file: {0}")]
    Read(#[source] std::io::Error),

    #[error("invalid JSON: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("top level must be an array of records")]
    NotAnArray,

    #[error("row {index}: {reason}")]
    RowShape { index: usize, reason: String },

    #[error("row {index}: {source}")]
    Insert {
        index: usize,
        #[source]
        source: rusqlite::Error,
    },
}

/// Coarse classification of an [`Error`], used to decide how to report it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Storage,
    Validation,
    Import,
    Config,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Storage(_) | Error::StorageIo { .. } | Error::Locked { .. } | Error::CorruptRow { .. } => {
                ErrorKind::Storage
            }
            Error::Validation(_) => ErrorKind::Validation,
            Error::Import { .. } => ErrorKind::Import,
            Error::Config { .. } => ErrorKind::Config,
        }
    }
}

/// Convenience alias for results with [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind() {
        assert_eq!(Error::Validation("x".to_string()).kind(), ErrorKind::Validation);
        assert_eq!(
            Error::Locked {
                path: PathBuf::from("a.db")
            }
            .kind(),
            ErrorKind::Storage
        );
        assert_eq!(
            Error::Storage(rusqlite::Error::InvalidQuery).kind(),
            ErrorKind::Storage
        );
    }

    #[test]
    fn test_import_error_message_names_source_and_row() {
        let err = Error::Import {
            source_name: "backup.json".to_string(),
            committed: 2,
            cause: ImportCause::RowShape {
                index: 2,
                reason: "expected 5 fields, found 3".to_string(),
            },
        };

        let msg = err.to_string();
        assert!(msg.contains("backup.json"));
        assert!(msg.contains("2 rows committed"));
        assert!(msg.contains("row 2: expected 5 fields, found 3"));
        assert_eq!(err.kind(), ErrorKind::Import);
    }
}
