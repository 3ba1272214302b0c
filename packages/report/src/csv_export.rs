//! CSV exports.
//!
//! The header row is always written, so an empty manifest still produces a
//! file with the expected columns. Absent values are empty cells.

use std::io::Write;

use dc_receiving_manifest_models::PackageRow;
use dc_receiving_receiving::ReceivingRow;
use serde::Serialize;

use crate::ReportError;

fn write_rows<W: Write, T: Serialize>(
    writer: W,
    columns: &[&str],
    rows: &[T],
) -> Result<(), ReportError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv_writer.write_record(columns)?;
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;

    log::debug!("Wrote {} CSV rows", rows.len());
    Ok(())
}

/// Writes the package list.
///
/// # Errors
///
/// Returns [`ReportError`] if a row cannot be written.
pub fn write_packages<W: Write>(writer: W, rows: &[PackageRow]) -> Result<(), ReportError> {
    write_rows(writer, PackageRow::COLUMNS, rows)
}

/// Writes the receiving report.
///
/// # Errors
///
/// Returns [`ReportError`] if a row cannot be written.
pub fn write_receiving<W: Write>(writer: W, rows: &[ReceivingRow]) -> Result<(), ReportError> {
    write_rows(writer, ReceivingRow::COLUMNS, rows)
}

/// Renders the package list to a string.
///
/// # Errors
///
/// Returns [`ReportError`] if a row cannot be serialized.
pub fn packages_to_string(rows: &[PackageRow]) -> Result<String, ReportError> {
    let mut buf = Vec::new();
    write_packages(&mut buf, rows)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
