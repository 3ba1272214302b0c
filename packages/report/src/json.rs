//! JSON dump of an extraction, for debugging a layout.

use std::io::Write;

use chrono::NaiveDateTime;
use dc_receiving_manifest::ManifestExtraction;
use dc_receiving_manifest::assemble::ManifestSummary;
use dc_receiving_manifest_models::{ExtractionStats, ManifestHeader, PackageRecord};
use serde::Serialize;

use crate::ReportError;

/// Everything recovered from a manifest except its source text.
#[derive(Debug, Serialize)]
pub struct ExtractionDump<'a> {
    /// Profile the extraction ran with.
    pub profile: &'a str,
    /// Header metadata.
    pub header: &'a ManifestHeader,
    /// `header.date_created` as a timestamp, when it parses.
    pub date_created: Option<NaiveDateTime>,
    /// Field coverage counts.
    pub stats: ExtractionStats,
    /// Package and quantity totals.
    pub summary: ManifestSummary,
    /// Package records in manifest order.
    pub packages: &'a [PackageRecord],
}

impl<'a> ExtractionDump<'a> {
    /// Builds the dump for `extraction`.
    #[must_use]
    pub fn new(profile: &'a str, extraction: &'a ManifestExtraction) -> Self {
        Self {
            profile,
            header: &extraction.header,
            date_created: extraction.header.date_created_parsed(),
            stats: extraction.stats(),
            summary: extraction.summary(),
            packages: &extraction.packages,
        }
    }
}

/// Writes `dump` as pretty-printed JSON followed by a newline.
///
/// # Errors
///
/// Returns [`ReportError`] if serialization or the write fails.
pub fn write_dump<W: Write>(mut writer: W, dump: &ExtractionDump<'_>) -> Result<(), ReportError> {
    serde_json::to_writer_pretty(&mut writer, dump)?;
    writeln!(writer)?;
    Ok(())
}
