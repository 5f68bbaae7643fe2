//! Error types for store access.

use std::fmt;

use types::RecordIndex;

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur while reading the record store.
///
/// Both are fatal to the step or episode in progress; retry policy belongs
/// to whatever wraps the store client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// No record exists at the requested index.
    RecordUnavailable(RecordIndex),
    /// Backfill would reach below the first stored record.
    IndexUnderflow { index: RecordIndex, depth: usize },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::RecordUnavailable(index) => {
                write!(f, "no record at index {}", index)
            }
            StorageError::IndexUnderflow { index, depth } => write!(
                f,
                "cannot backfill {} records ending at index {}",
                depth + 1,
                index
            ),
        }
    }
}

impl std::error::Error for StorageError {}
