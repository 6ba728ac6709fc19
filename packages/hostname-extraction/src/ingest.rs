//! File-level entry points: read a staged export, extract, date, and merge.

use std::io::ErrorKind;
use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, instrument};

use crate::aggregate::{extract_rows, ExtractionSummary};
use crate::error::{ExtractionError, Result};
use crate::normalize::normalize_csv;
use crate::output::results_to_csv;
use crate::traits::store::RecordStore;
use crate::types::config::ExtractionConfig;
use crate::types::record::{DatedRow, MergeOutcome, StoredRecord};

/// Read a staged file as UTF-8 text.
///
/// I/O failures become [`ExtractionError::UnreadableInput`] naming the file;
/// bytes that aren't UTF-8 become [`ExtractionError::InvalidFormat`].
pub fn read_staged(path: &Path) -> Result<String> {
    let filename = display_name(path);

    let bytes = std::fs::read(path).map_err(|e| {
        let reason = match e.kind() {
            ErrorKind::NotFound => "does not exist",
            ErrorKind::PermissionDenied => "cannot be read",
            _ => "some other error",
        };
        ExtractionError::unreadable(filename.clone(), reason)
    })?;

    String::from_utf8(bytes).map_err(|_| {
        ExtractionError::invalid_format(format!("{} is not valid UTF-8 text", filename))
    })
}

/// Final path component, used as the default file label.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// The date used when the caller doesn't supply one.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// An extracted, dated file that hasn't been merged yet.
#[derive(Debug, Clone, Serialize)]
pub struct PreparedFile {
    pub filename: String,
    pub extraction_date: NaiveDate,
    pub rows: Vec<DatedRow>,
    pub summary: ExtractionSummary,
}

impl PreparedFile {
    /// Extract hostnames from CSV `text` and tag the results.
    pub fn from_text(
        text: &str,
        filename: impl Into<String>,
        extraction_date: NaiveDate,
        config: &ExtractionConfig,
    ) -> Result<Self> {
        let filename = filename.into();
        let scan = normalize_csv(text)?;
        let extraction = extract_rows(&scan, config);

        Ok(Self {
            rows: extraction.table.dated(&filename, extraction_date),
            summary: extraction.summary,
            filename,
            extraction_date,
        })
    }

    /// Read and extract the staged file at `path`.
    pub fn from_path(
        path: &Path,
        filename: impl Into<String>,
        extraction_date: NaiveDate,
        config: &ExtractionConfig,
    ) -> Result<Self> {
        let text = read_staged(path)?;
        Self::from_text(&text, filename, extraction_date, config)
    }

    /// The rows in their stored form.
    pub fn records(&self) -> Vec<StoredRecord> {
        self.rows.iter().map(|row| row.record.clone()).collect()
    }

    /// The downloadable result file.
    pub fn to_csv(&self) -> Result<Vec<u8>> {
        results_to_csv(&self.rows)
    }

    /// Merge the rows into `store`.
    pub async fn merge_into(&self, store: &dyn RecordStore) -> Result<MergeOutcome> {
        store.merge(&self.records()).await
    }
}

/// A file that has been extracted and merged.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessedFile {
    pub prepared: PreparedFile,
    pub merge: MergeOutcome,
}

/// Read, extract, and merge the staged file at `path` in one call.
///
/// `filename` is the label stored with every row; `extraction_date` defaults
/// to today.
#[instrument(skip(path, store, config), fields(path = %path.display()))]
pub async fn process_file(
    path: &Path,
    filename: &str,
    extraction_date: Option<NaiveDate>,
    store: &dyn RecordStore,
    config: &ExtractionConfig,
) -> Result<ProcessedFile> {
    let date = extraction_date.unwrap_or_else(today);
    let prepared = PreparedFile::from_path(path, filename, date, config)?;
    let merge = prepared.merge_into(store).await?;

    info!(
        filename,
        rows = prepared.rows.len(),
        inserted = merge.inserted,
        skipped = merge.skipped,
        "Processed scan export"
    );

    Ok(ProcessedFile { prepared, merge })
}
