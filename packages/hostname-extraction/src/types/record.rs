//! Persisted record types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::types::row::{Heuristic, ResultRow};

/// Name of the table extracted rows are merged into.
pub const TABLE_NAME: &str = "all_extracted_names";

/// Width of every text column in [`TABLE_NAME`].
pub const MAX_TEXT_LEN: usize = 255;

/// A dated, file-tagged result row as stored.
///
/// Equality and hashing cover exactly the identity 5-tuple
/// (host, name, extracted hostname, extraction date, filename).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StoredRecord {
    pub host: String,
    pub name: String,
    pub extracted_hostname: String,
    pub extraction_date: NaiveDate,
    pub filename: String,
}

impl StoredRecord {
    pub fn new(
        host: impl Into<String>,
        name: impl Into<String>,
        extracted_hostname: impl Into<String>,
        extraction_date: NaiveDate,
        filename: impl Into<String>,
    ) -> Self {
        Self {
            host: fit_column("host", host.into()),
            name: fit_column("name", name.into()),
            extracted_hostname: fit_column("extracted_hostname", extracted_hostname.into()),
            extraction_date,
            filename: fit_column("filename", filename.into()),
        }
    }

    pub fn from_result(row: &ResultRow, extraction_date: NaiveDate, filename: &str) -> Self {
        Self::new(
            row.host.clone(),
            row.name.clone(),
            row.hostname.to_stored(),
            extraction_date,
            filename,
        )
    }
}

/// Truncate to the column width on a char boundary.
fn fit_column(column: &str, value: String) -> String {
    if value.chars().count() <= MAX_TEXT_LEN {
        return value;
    }
    warn!(
        column,
        length = value.chars().count(),
        "Value exceeds {} characters, truncating",
        MAX_TEXT_LEN
    );
    value.chars().take(MAX_TEXT_LEN).collect()
}

/// A result row paired with its stored form, as written to the result file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatedRow {
    pub index: usize,
    pub source: Heuristic,
    pub record: StoredRecord,
}

/// Counts reported by a merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeOutcome {
    /// Records handed to the store
    pub submitted: usize,
    /// Records that were new
    pub inserted: usize,
    /// Records already present under the same identity
    pub skipped: usize,
}

impl MergeOutcome {
    pub fn new(submitted: usize, inserted: usize) -> Self {
        Self {
            submitted,
            inserted,
            skipped: submitted.saturating_sub(inserted),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    #[test]
    fn test_identity_is_the_five_tuple() {
        let a = StoredRecord::new("10.0.0.1", "netbios", "web01", date(), "scan.csv");
        let b = StoredRecord::new("10.0.0.1", "netbios", "web01", date(), "scan.csv");
        let c = StoredRecord::new("10.0.0.1", "netbios", "web01", date(), "other.csv");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_long_values_are_truncated_to_column_width() {
        let long = "x".repeat(400);
        let record = StoredRecord::new("h", "n", long, date(), "f.csv");
        assert_eq!(record.extracted_hostname.chars().count(), MAX_TEXT_LEN);
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        let long = "é".repeat(300);
        let record = StoredRecord::new(long, "n", "e", date(), "f.csv");
        assert_eq!(record.host.chars().count(), MAX_TEXT_LEN);
        assert!(record.host.chars().all(|c| c == 'é'));
    }

    #[test]
    fn test_merge_outcome_skipped() {
        let outcome = MergeOutcome::new(5, 2);
        assert_eq!(outcome.skipped, 3);
    }
}
