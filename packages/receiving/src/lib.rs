#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Receiving workflow.
//!
//! Pairs each extracted package with the quantity actually received and
//! computes the variance against what the manifest says was shipped. A
//! package whose shipped quantity was not found has no variance at all;
//! it is never compared against zero.

use std::collections::BTreeMap;
use std::io::Read;

use dc_receiving_manifest_models::PackageRecord;
use serde::{Deserialize, Serialize};

/// Errors that can occur while recording received quantities.
#[derive(Debug, thiserror::Error)]
pub enum ReceivingError {
    /// CSV reading failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error (file read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No package has this sequence number.
    #[error("No package #{sequence} in this manifest")]
    UnknownSequence {
        /// Requested sequence number.
        sequence: u32,
    },

    /// Received quantities cannot be negative.
    #[error("Package #{sequence}: received quantity {value} is negative")]
    NegativeQuantity {
        /// Package sequence number.
        sequence: u32,
        /// Rejected value.
        value: f64,
    },

    /// A row of received-quantity input could not be parsed.
    #[error("Line {line}: {message}")]
    Parse {
        /// 1-based input line.
        line: u64,
        /// Description of what went wrong.
        message: String,
    },
}

/// One package with its received quantity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReceivingEntry {
    /// The extracted package.
    pub record: PackageRecord,
    /// Quantity counted on receipt.
    pub received: f64,
}

impl ReceivingEntry {
    /// Pairs `record` with a received quantity.
    #[must_use]
    pub const fn new(record: PackageRecord, received: f64) -> Self {
        Self { record, received }
    }

    /// Received minus shipped. `None` when the shipped quantity is absent.
    #[must_use]
    pub fn variance(&self) -> Option<f64> {
        self.record.quantity_shipped.map(|shipped| self.received - shipped)
    }

    /// Variance as a percentage of the shipped quantity.
    ///
    /// `None` when the shipped quantity is absent or not positive.
    #[must_use]
    pub fn variance_percent(&self) -> Option<f64> {
        let shipped = self.record.quantity_shipped.filter(|s| *s > 0.0)?;
        Some((self.received - shipped) / shipped * 100.0)
    }

    /// Returns `true` if received and shipped quantities differ.
    #[must_use]
    pub fn has_discrepancy(&self) -> bool {
        self.variance().is_some_and(|v| v.abs() > f64::EPSILON)
    }
}

/// Totals over a receiving session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ReceivingTotals {
    /// Sum of the shipped quantities that were found.
    pub total_shipped: f64,
    /// Sum of all received quantities.
    pub total_received: f64,
    /// `total_received - total_shipped`.
    pub total_variance: f64,
}

/// Receiving-report row. Column names match the receiving report export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReceivingRow {
    /// Sequence number.
    #[serde(rename = "Package #")]
    pub sequence: u32,
    /// Package tag.
    #[serde(rename = "Package ID")]
    pub package_id: String,
    /// Cleaned item name.
    #[serde(rename = "Item Name")]
    pub item_name: String,
    /// Shipped quantity.
    #[serde(rename = "Qty Shipped")]
    pub quantity_shipped: Option<f64>,
    /// Received quantity.
    #[serde(rename = "Qty Received")]
    pub quantity_received: f64,
    /// Received minus shipped.
    #[serde(rename = "Variance")]
    pub variance: Option<f64>,
    /// Variance as a percentage of shipped.
    #[serde(rename = "Variance %")]
    pub variance_percent: Option<f64>,
}

impl ReceivingRow {
    /// Column headers in export order.
    pub const COLUMNS: &[&str] = &[
        "Package #",
        "Package ID",
        "Item Name",
        "Qty Shipped",
        "Qty Received",
        "Variance",
        "Variance %",
    ];
}

impl From<&ReceivingEntry> for ReceivingRow {
    fn from(entry: &ReceivingEntry) -> Self {
        Self {
            sequence: entry.record.sequence,
            package_id: entry.record.package_id.clone().unwrap_or_default(),
            item_name: entry.record.item_name.clone().unwrap_or_default(),
            quantity_shipped: entry.record.quantity_shipped,
            quantity_received: entry.received,
            variance: entry.variance(),
            variance_percent: entry.variance_percent(),
        }
    }
}

/// Received quantities for every package of one manifest.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReceivingSession {
    entries: Vec<ReceivingEntry>,
}

impl ReceivingSession {
    /// Starts a session where every package was received exactly as
    /// shipped. Packages without a shipped quantity start at zero.
    #[must_use]
    pub fn from_packages(packages: &[PackageRecord]) -> Self {
        Self {
            entries: packages
                .iter()
                .map(|p| ReceivingEntry::new(p.clone(), p.quantity_shipped.unwrap_or(0.0)))
                .collect(),
        }
    }

    /// Entries in manifest order.
    #[must_use]
    pub fn entries(&self) -> &[ReceivingEntry] {
        &self.entries
    }

    /// Records the received quantity for package `sequence`.
    ///
    /// # Errors
    ///
    /// Returns [`ReceivingError::NegativeQuantity`] if `received` is
    /// negative or not a number, or [`ReceivingError::UnknownSequence`] if
    /// no package has that sequence number.
    pub fn set_received(&mut self, sequence: u32, received: f64) -> Result<(), ReceivingError> {
        if received.is_nan() || received < 0.0 {
            return Err(ReceivingError::NegativeQuantity {
                sequence,
                value: received,
            });
        }

        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.record.sequence == sequence)
            .ok_or(ReceivingError::UnknownSequence { sequence })?;

        log::debug!("Package #{sequence}: received {received}");
        entry.received = received;
        Ok(())
    }

    /// Records every quantity in `received`.
    ///
    /// # Errors
    ///
    /// Stops at the first quantity [`Self::set_received`] rejects.
    pub fn apply(&mut self, received: &BTreeMap<u32, f64>) -> Result<(), ReceivingError> {
        for (&sequence, &qty) in received {
            self.set_received(sequence, qty)?;
        }
        Ok(())
    }

    /// Shipped, received, and variance totals.
    ///
    /// Packages without a shipped quantity still count toward the received
    /// total.
    #[must_use]
    pub fn totals(&self) -> ReceivingTotals {
        let total_shipped: f64 = self
            .entries
            .iter()
            .filter_map(|e| e.record.quantity_shipped)
            .sum();
        let total_received: f64 = self.entries.iter().map(|e| e.received).sum();

        ReceivingTotals {
            total_shipped,
            total_received,
            total_variance: total_received - total_shipped,
        }
    }

    /// Entries whose received quantity differs from the shipped quantity.
    pub fn discrepancies(&self) -> impl Iterator<Item = &ReceivingEntry> {
        self.entries.iter().filter(|e| e.has_discrepancy())
    }

    /// Report rows, one per entry.
    #[must_use]
    pub fn rows(&self) -> Vec<ReceivingRow> {
        self.entries.iter().map(ReceivingRow::from).collect()
    }
}

/// One row of received-quantity input.
///
/// Accepts the receiving report's own column names, so an edited report can
/// be fed back in.
#[derive(Debug, Deserialize)]
struct ReceivedInput {
    #[serde(alias = "Package #")]
    sequence: u32,
    #[serde(alias = "Qty Received")]
    received: f64,
}

/// Reads `sequence,received` pairs from CSV with a header row.
///
/// # Errors
///
/// Returns [`ReceivingError::Parse`] for a row that does not hold a
/// sequence number and a quantity, [`ReceivingError::NegativeQuantity`] for
/// a negative quantity, or [`ReceivingError::Csv`] if the input is not CSV.
pub fn parse_received_csv<R: Read>(reader: R) -> Result<BTreeMap<u32, f64>, ReceivingError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut received = BTreeMap::new();
    for result in csv_reader.deserialize::<ReceivedInput>() {
        let row = result.map_err(|e| match e.position() {
            Some(position) => ReceivingError::Parse {
                line: position.line(),
                message: e.to_string(),
            },
            None => ReceivingError::Csv(e),
        })?;

        if row.received < 0.0 {
            return Err(ReceivingError::NegativeQuantity {
                sequence: row.sequence,
                value: row.received,
            });
        }
        if received.insert(row.sequence, row.received).is_some() {
            log::warn!("Package #{} listed twice; using the last value", row.sequence);
        }
    }

    log::info!("Read {} received quantities", received.len());
    Ok(received)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn package(sequence: u32, shipped: Option<f64>) -> PackageRecord {
        PackageRecord {
            quantity_shipped: shipped,
            item_name: Some(format!("Item {sequence}")),
            ..PackageRecord::empty(sequence)
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn variance_is_received_minus_shipped() {
        let entry = ReceivingEntry::new(package(1, Some(40.0)), 38.0);
        assert_eq!(entry.variance(), Some(-2.0));
        assert!(approx(entry.variance_percent().unwrap(), -5.0));
        assert!(entry.has_discrepancy());
    }

    #[test]
    fn absent_shipped_has_no_variance() {
        let entry = ReceivingEntry::new(package(1, None), 5.0);
        assert_eq!(entry.variance(), None);
        assert_eq!(entry.variance_percent(), None);
        assert!(!entry.has_discrepancy());
    }

    #[test]
    fn zero_shipped_has_variance_but_no_percent() {
        let entry = ReceivingEntry::new(package(1, Some(0.0)), 3.0);
        assert_eq!(entry.variance(), Some(3.0));
        assert_eq!(entry.variance_percent(), None);
    }

    #[test]
    fn session_defaults_to_shipped_or_zero() {
        let session = ReceivingSession::from_packages(&[package(1, Some(40.0)), package(2, None)]);
        let received: Vec<f64> = session.entries().iter().map(|e| e.received).collect();
        assert_eq!(received, vec![40.0, 0.0]);
        assert_eq!(session.discrepancies().count(), 0);
    }

    #[test]
    fn set_received_validates_input() {
        let mut session = ReceivingSession::from_packages(&[package(1, Some(10.0))]);
        assert!(matches!(
            session.set_received(2, 1.0),
            Err(ReceivingError::UnknownSequence { sequence: 2 })
        ));
        assert!(matches!(
            session.set_received(1, -1.0),
            Err(ReceivingError::NegativeQuantity { .. })
        ));
        session.set_received(1, 9.0).unwrap();
        assert_eq!(session.entries()[0].received, 9.0);
    }

    #[test]
    fn totals_skip_absent_shipped() {
        let mut session = ReceivingSession::from_packages(&[
            package(1, Some(40.0)),
            package(2, None),
            package(3, Some(10.0)),
        ]);
        session.set_received(2, 4.0).unwrap();
        session.set_received(3, 8.0).unwrap();

        let totals = session.totals();
        assert!(approx(totals.total_shipped, 50.0));
        assert!(approx(totals.total_received, 52.0));
        assert!(approx(totals.total_variance, 2.0));
    }

    #[test]
    fn rows_carry_variance_columns() {
        let mut session = ReceivingSession::from_packages(&[package(1, Some(20.0)), package(2, None)]);
        session.set_received(1, 25.0).unwrap();
        let rows = session.rows();
        assert_eq!(rows[0].variance, Some(5.0));
        assert!(approx(rows[0].variance_percent.unwrap(), 25.0));
        assert_eq!(rows[1].variance, None);
        assert_eq!(rows[1].package_id, "");
    }

    #[test]
    fn parses_received_csv() {
        let input = "sequence,received\n1, 38\n3,10.5\n";
        let received = parse_received_csv(input.as_bytes()).unwrap();
        assert_eq!(received.get(&1), Some(&38.0));
        assert_eq!(received.get(&3), Some(&10.5));
        assert_eq!(received.len(), 2);
    }

    #[test]
    fn parses_edited_receiving_report() {
        let input = "Package #,Package ID,Item Name,Qty Shipped,Qty Received,Variance,Variance %\n\
                     1,1A40,Gummies,40,39,-1,-2.5\n";
        let received = parse_received_csv(input.as_bytes()).unwrap();
        assert_eq!(received.get(&1), Some(&39.0));
    }

    #[test]
    fn rejects_unparseable_row() {
        let input = "sequence,received\n1,lots\n";
        assert!(matches!(
            parse_received_csv(input.as_bytes()),
            Err(ReceivingError::Parse { line: 2, .. })
        ));
    }

    #[test]
    fn rejects_negative_row() {
        let input = "sequence,received\n4,-2\n";
        assert!(matches!(
            parse_received_csv(input.as_bytes()),
            Err(ReceivingError::NegativeQuantity { sequence: 4, .. })
        ));
    }

    #[test]
    fn apply_stops_at_unknown_sequence() {
        let mut session = ReceivingSession::from_packages(&[package(1, Some(1.0))]);
        let received = BTreeMap::from([(1, 2.0), (7, 1.0)]);
        assert!(matches!(
            session.apply(&received),
            Err(ReceivingError::UnknownSequence { sequence: 7 })
        ));
        assert_eq!(session.entries()[0].received, 2.0);
    }
}
