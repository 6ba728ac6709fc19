//! Storage trait for merged extraction records.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::record::{MergeOutcome, StoredRecord};

/// Persistent table of extracted hostnames.
///
/// Implementations treat the 5-tuple (host, name, extracted hostname,
/// extraction date, filename) as the record identity: merging a record whose
/// identity is already stored is a no-op, and a batch is applied atomically.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert every record not already present.
    async fn merge(&self, records: &[StoredRecord]) -> Result<MergeOutcome>;

    /// Total number of stored records.
    async fn count(&self) -> Result<usize>;

    /// Stored records tagged with `filename`, ordered by identity.
    async fn records_for_file(&self, filename: &str) -> Result<Vec<StoredRecord>>;

    /// Check the backend is reachable.
    async fn ping(&self) -> Result<()> {
        self.count().await.map(|_| ())
    }
}
