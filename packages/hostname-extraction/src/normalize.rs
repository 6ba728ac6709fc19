//! Normalization of raw scanner CSV into [`ScanRow`]s.

use std::io::Read;

use tracing::debug;

use crate::error::{ExtractionError, Result};
use crate::types::row::ScanRow;

pub const HOST_COLUMN: &str = "Host";
pub const NAME_COLUMN: &str = "Name";
pub const PLUGIN_OUTPUT_COLUMN: &str = "Plugin Output";

/// Positions of the three required columns in the header row.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    host: usize,
    name: usize,
    plugin_output: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let find = |column: &str| {
            headers
                .iter()
                .position(|h| h == column)
                .ok_or_else(|| {
                    ExtractionError::invalid_format(format!("missing required column '{}'", column))
                })
        };

        Ok(Self {
            host: find(HOST_COLUMN)?,
            name: find(NAME_COLUMN)?,
            plugin_output: find(PLUGIN_OUTPUT_COLUMN)?,
        })
    }
}

/// Parse CSV text into normalized rows.
///
/// Column names are matched case-sensitively in any order; other columns are
/// ignored. Missing trailing cells read as empty strings.
pub fn normalize_csv(text: &str) -> Result<Vec<ScanRow>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    normalize_reader(text.as_bytes())
}

/// Parse CSV from any reader into normalized rows.
pub fn normalize_reader<R: Read>(reader: R) -> Result<Vec<ScanRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| ExtractionError::invalid_format(e.to_string()))?
        .clone();
    let columns = ColumnIndex::from_headers(&headers)?;

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(|e| ExtractionError::invalid_format(e.to_string()))?;
        let cell = |i: usize| record.get(i).unwrap_or_default();
        rows.push(ScanRow::new(
            index,
            cell(columns.host),
            cell(columns.name),
            cell(columns.plugin_output),
        ));
    }

    debug!(rows = rows.len(), "Normalized scan rows");
    Ok(rows)
}
