//! Row types flowing through the extraction pipeline.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::record::{DatedRow, StoredRecord};

/// Prefix written in place of a hostname when a NetBIOS row has no match.
pub const UNMATCHED_PREFIX: &str = "No match found in: ";

/// One normalized scanner row.
///
/// `name` and `plugin_output` are lower-cased; `host` is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRow {
    /// 0-based position of the row in the input file
    pub index: usize,
    pub host: String,
    pub name: String,
    pub plugin_output: String,
}

impl ScanRow {
    pub fn new(
        index: usize,
        host: impl Into<String>,
        name: impl AsRef<str>,
        plugin_output: impl AsRef<str>,
    ) -> Self {
        Self {
            index,
            host: host.into(),
            name: name.as_ref().to_lowercase(),
            plugin_output: plugin_output.as_ref().to_lowercase(),
        }
    }
}

/// Which heuristic produced a result row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Heuristic {
    Netbios,
    Dns,
    Ssl,
}

impl fmt::Display for Heuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Netbios => write!(f, "netbios"),
            Self::Dns => write!(f, "dns"),
            Self::Ssl => write!(f, "ssl"),
        }
    }
}

/// The value a heuristic settled on for a host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ExtractedHostname {
    /// A hostname pulled out of the plugin output.
    Found(String),

    /// NetBIOS soft miss; holds the plugin output that failed to match.
    Unmatched(String),
}

impl ExtractedHostname {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// The text written to the result file and the store.
    pub fn to_stored(&self) -> String {
        self.to_string()
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Found(name) => name.is_empty(),
            Self::Unmatched(_) => false,
        }
    }
}

impl fmt::Display for ExtractedHostname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Found(name) => f.write_str(name),
            Self::Unmatched(text) => write!(f, "{}{}", UNMATCHED_PREFIX, text),
        }
    }
}

/// A (Host, Name) pair with the hostname its heuristic extracted.
///
/// Date and filename are attached later by [`ResultTable::dated`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRow {
    /// Input row index, kept as the implicit index of the exported table
    pub index: usize,
    pub host: String,
    pub name: String,
    pub hostname: ExtractedHostname,
    pub source: Heuristic,
}

impl ResultRow {
    pub fn new(row: &ScanRow, hostname: ExtractedHostname, source: Heuristic) -> Self {
        Self {
            index: row.index,
            host: row.host.clone(),
            name: row.name.clone(),
            hostname,
            source,
        }
    }
}

/// Ordered result rows: NetBIOS first, then DNS, then SSL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultTable {
    pub rows: Vec<ResultRow>,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn push(&mut self, row: ResultRow) {
        self.rows.push(row);
    }

    pub fn extend(&mut self, rows: impl IntoIterator<Item = ResultRow>) {
        self.rows.extend(rows);
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResultRow> {
        self.rows.iter()
    }

    /// Drop rows without a hostname.
    pub fn retain_resolved(&mut self) {
        self.rows.retain(|row| !row.hostname.is_empty());
    }

    /// Rows produced by one heuristic.
    pub fn from_source(&self, source: Heuristic) -> impl Iterator<Item = &ResultRow> {
        self.rows.iter().filter(move |row| row.source == source)
    }

    /// Tag every row with the extraction date and file label.
    pub fn dated(&self, filename: &str, extraction_date: chrono::NaiveDate) -> Vec<DatedRow> {
        self.rows
            .iter()
            .map(|row| DatedRow {
                index: row.index,
                source: row.source,
                record: StoredRecord::from_result(row, extraction_date, filename),
            })
            .collect()
    }
}

impl IntoIterator for ResultTable {
    type Item = ResultRow;
    type IntoIter = std::vec::IntoIter<ResultRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}
