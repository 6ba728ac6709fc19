//! Testing utilities: scan export fixtures and a store that always fails.
//!
//! Useful for testing applications built on this library without a real
//! scanner export or database.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{ExtractionError, Result};
use crate::traits::store::RecordStore;
use crate::types::record::{MergeOutcome, StoredRecord};

/// Builder for scanner CSV exports in the layout the normalizer expects.
///
/// Adds a `Plugin ID` column so fixtures exercise the "extra columns are
/// ignored" path.
#[derive(Debug, Clone, Default)]
pub struct ScanCsvBuilder {
    rows: Vec<(String, String, String)>,
}

impl ScanCsvBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a raw row.
    pub fn row(
        mut self,
        host: impl Into<String>,
        name: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        self.rows.push((host.into(), name.into(), output.into()));
        self
    }

    /// Add a NetBIOS row in the usual Nessus layout.
    pub fn netbios(self, host: impl Into<String>, computer_name: &str) -> Self {
        let output = format!(
            "The following 2 NetBIOS names have been gathered :\n\n  {:<16} = Computer name\n  WORKGROUP        = Workgroup / Domain name\n",
            computer_name
        );
        self.row(host, "Windows NetBIOS / SMB Remote Host Information Disclosure", output)
    }

    /// Add an "Additional DNS Hostnames" row listing `hostnames`.
    pub fn dns(self, host: impl Into<String>, hostnames: &[&str]) -> Self {
        let mut output = String::from("The following hostnames point to the remote host:\n");
        for name in hostnames {
            output.push_str(&format!("  - {}\n", name));
        }
        self.row(host, "Additional DNS Hostnames", output)
    }

    /// Add an SSL self-signed certificate row with `common_name` as subject CN.
    pub fn ssl(self, host: impl Into<String>, common_name: &str) -> Self {
        let output = format!(
            "The following certificate was found :\n\n  Subject : C=US/ST=MN/O=Example/CN={}\n",
            common_name
        );
        self.row(host, "SSL Self-Signed Certificate", output)
    }

    /// Render the export as CSV text.
    pub fn build(&self) -> String {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(["Plugin ID", "Host", "Name", "Plugin Output"])
            .expect("writing to a Vec");
        for (i, (host, name, output)) in self.rows.iter().enumerate() {
            let id = (10_000 + i).to_string();
            writer
                .write_record([id.as_str(), host.as_str(), name.as_str(), output.as_str()])
                .expect("writing to a Vec");
        }
        let bytes = writer.into_inner().expect("flushing to a Vec");
        String::from_utf8(bytes).expect("fixture text is UTF-8")
    }
}

/// A store whose every operation fails, for exercising storage error paths.
#[derive(Debug, Default)]
pub struct FailingStore {
    attempts: AtomicUsize,
}

impl FailingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of merges attempted.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    fn unavailable() -> ExtractionError {
        ExtractionError::Storage("store unavailable".into())
    }
}

#[async_trait]
impl RecordStore for FailingStore {
    async fn merge(&self, _records: &[StoredRecord]) -> Result<MergeOutcome> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(Self::unavailable())
    }

    async fn count(&self) -> Result<usize> {
        Err(Self::unavailable())
    }

    async fn records_for_file(&self, _filename: &str) -> Result<Vec<StoredRecord>> {
        Err(Self::unavailable())
    }
}
