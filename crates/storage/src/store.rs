//! Record store abstraction.

use types::RecordIndex;
use types::record::FeatureRecord;

use crate::error::{Result, StorageError};

/// Read access to the time-series record store.
///
/// Records are keyed by a dense per-session index, one per action interval.
/// Calls block on whatever I/O the implementation does; a missing key is
/// reported as [`StorageError::RecordUnavailable`], never as a partial
/// record.
pub trait RecordStore {
    /// Fetch the record at `index`.
    fn get(&self, index: RecordIndex) -> Result<FeatureRecord>;
}

/// In-memory append-only store used by tests and the demo rollout.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Vec<FeatureRecord>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record at the next index.
    pub fn push(&mut self, record: FeatureRecord) {
        self.records.push(record);
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Index of the newest record, if any.
    pub fn last_index(&self) -> Option<RecordIndex> {
        self.records.len().checked_sub(1).map(|i| i as RecordIndex)
    }
}

impl RecordStore for MemoryStore {
    fn get(&self, index: RecordIndex) -> Result<FeatureRecord> {
        self.records
            .get(index as usize)
            .cloned()
            .ok_or(StorageError::RecordUnavailable(index))
    }
}
