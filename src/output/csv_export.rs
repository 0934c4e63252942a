//! CSV export of result tables

use crate::search::ResultTable;
use crate::CarFinderError;
use chrono::{DateTime, Utc};
use std::io;
use std::path::Path;

/// File name for an export taken at `timestamp`
///
/// Format: `car_results_{unix_seconds}.csv`
pub fn csv_file_name(timestamp: DateTime<Utc>) -> String {
    format!("car_results_{}.csv", timestamp.timestamp())
}

/// Writes the table as CSV to any writer
///
/// The header row is always written, even for an empty table. Absent values
/// become empty fields.
pub fn write_csv_to<W: io::Write>(table: &ResultTable, writer: W) -> Result<(), CarFinderError> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    wtr.write_record([
        "title", "price", "mileage", "location", "url", "source", "price_num",
    ])?;
    for row in table {
        wtr.serialize(row)?;
    }
    wtr.flush()?;

    Ok(())
}

/// Writes the table as CSV to `path`, replacing any existing file
pub fn write_csv(table: &ResultTable, path: &Path) -> Result<(), CarFinderError> {
    let file = std::fs::File::create(path)?;
    write_csv_to(table, file)
}
