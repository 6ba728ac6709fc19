//! In-memory storage implementation for testing and development.

use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{ExtractionError, Result};
use crate::traits::store::RecordStore;
use crate::types::record::{MergeOutcome, StoredRecord};

/// In-memory record table.
///
/// Useful for testing and development. Not suitable for production
/// as data is lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<BTreeSet<StoredRecord>>,
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all stored data.
    pub fn clear(&self) -> Result<()> {
        self.write()?.clear();
        Ok(())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, BTreeSet<StoredRecord>>> {
        self.records
            .read()
            .map_err(|e| ExtractionError::Storage(e.to_string().into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, BTreeSet<StoredRecord>>> {
        self.records
            .write()
            .map_err(|e| ExtractionError::Storage(e.to_string().into()))
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn merge(&self, records: &[StoredRecord]) -> Result<MergeOutcome> {
        // Single write guard for the whole batch keeps it atomic
        let mut stored = self.write()?;
        let inserted = records
            .iter()
            .filter(|record| stored.insert((*record).clone()))
            .count();
        Ok(MergeOutcome::new(records.len(), inserted))
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }

    async fn records_for_file(&self, filename: &str) -> Result<Vec<StoredRecord>> {
        Ok(self
            .read()?
            .iter()
            .filter(|r| r.filename == filename)
            .cloned()
            .collect())
    }
}
