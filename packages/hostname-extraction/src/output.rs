//! CSV serialization of dated result rows.

use std::io::Write;

use crate::error::{ExtractionError, Result};
use crate::types::record::DatedRow;

/// Header of the result file; the leading blank column is the row index.
pub const RESULT_HEADER: [&str; 6] = [
    "",
    "Host",
    "Name",
    "Extracted_Hostname",
    "Extraction_Date",
    "Filename",
];

/// Write `rows` as CSV to `writer`.
pub fn write_results<W: Write>(rows: &[DatedRow], writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(RESULT_HEADER)
        .map_err(|e| ExtractionError::Output(Box::new(e)))?;

    for row in rows {
        let record = &row.record;
        let index = row.index.to_string();
        let date = record.extraction_date.format("%Y-%m-%d").to_string();
        csv.write_record([
            index.as_str(),
            record.host.as_str(),
            record.name.as_str(),
            record.extracted_hostname.as_str(),
            date.as_str(),
            record.filename.as_str(),
        ])
        .map_err(|e| ExtractionError::Output(Box::new(e)))?;
    }

    csv.flush()
        .map_err(|e| ExtractionError::Output(Box::new(e)))?;
    Ok(())
}

/// Serialize `rows` into an in-memory CSV document.
pub fn results_to_csv(rows: &[DatedRow]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_results(rows, &mut buf)?;
    Ok(buf)
}
