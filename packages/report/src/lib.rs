#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Output formats for extracted manifests.
//!
//! - [`csv_export`]: package list and receiving report CSVs.
//! - [`json`]: JSON dump of a whole extraction.
//! - [`worksheet`]: printable plain-text verification worksheet.
//! - [`table`]: fixed-width package table for the terminal.

pub mod csv_export;
pub mod json;
pub mod table;
pub mod worksheet;

use dc_receiving_manifest_models::ManifestHeader;

/// Errors that can occur while writing a report.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// CSV writing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error (file write).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Manifest number for file names, or `unknown` when it was not found.
#[must_use]
pub fn manifest_label(header: &ManifestHeader) -> &str {
    header.manifest_number.as_deref().unwrap_or("unknown")
}

/// Default file name for the package list CSV.
#[must_use]
pub fn packages_file_name(header: &ManifestHeader) -> String {
    format!("manifest_{}_packages.csv", manifest_label(header))
}

/// Default file name for the receiving report CSV.
#[must_use]
pub fn receiving_report_file_name(header: &ManifestHeader) -> String {
    format!("manifest_{}_receiving_report.csv", manifest_label(header))
}

/// Default file name for the verification worksheet.
#[must_use]
pub fn worksheet_file_name(header: &ManifestHeader) -> String {
    format!("manifest_{}_worksheet.txt", manifest_label(header))
}

/// Formats a quantity without a trailing `.0` for whole numbers.
#[must_use]
pub fn format_quantity(qty: f64) -> String {
    if qty.fract() == 0.0 && qty.abs() < 1e15 {
        format!("{qty:.0}")
    } else {
        format!("{qty}")
    }
}

/// Formats an optional quantity, showing `n/a` when absent.
#[must_use]
pub fn format_optional_quantity(qty: Option<f64>) -> String {
    qty.map_or_else(|| "n/a".to_owned(), format_quantity)
}
