//! Record assembly.
//!
//! Flattens package records into display rows and totals them. Order is
//! preserved exactly; nothing is filtered, sorted, or deduplicated.

use dc_receiving_manifest_models::{MeasurementKind, PackageRecord, PackageRow};
use serde::Serialize;

/// Projects one record onto the fixed package-list columns.
#[must_use]
pub fn to_row(record: &PackageRecord) -> PackageRow {
    let text = |v: Option<&str>| v.unwrap_or_default().to_owned();
    let measurement = |kind| {
        record
            .measurement(kind)
            .map(ToString::to_string)
            .unwrap_or_default()
    };

    PackageRow {
        sequence: record.sequence,
        package_id: text(record.package_id.as_deref()),
        item_name: text(record.item_name.as_deref()),
        quantity_shipped: record.quantity_shipped,
        production_batch: text(record.production_batch.as_deref()),
        weight: measurement(MeasurementKind::Weight),
        volume: measurement(MeasurementKind::Volume),
        strain: text(record.strain.as_deref()),
    }
}

/// One row per record, in manifest order.
#[must_use]
pub fn to_rows(records: &[PackageRecord]) -> Vec<PackageRow> {
    records.iter().map(to_row).collect()
}

/// Totals over a manifest's packages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ManifestSummary {
    /// Number of packages.
    pub total_packages: usize,
    /// Sum of the shipped quantities that were found.
    pub total_quantity_shipped: f64,
    /// Packages whose shipped quantity was not found.
    pub missing_quantity: usize,
}

/// Totals `records`. Absent quantities add nothing to the sum.
#[must_use]
pub fn summarize(records: &[PackageRecord]) -> ManifestSummary {
    records.iter().fold(
        ManifestSummary {
            total_packages: records.len(),
            ..ManifestSummary::default()
        },
        |mut summary, record| {
            match record.quantity_shipped {
                Some(qty) => summary.total_quantity_shipped += qty,
                None => summary.missing_quantity += 1,
            }
            summary
        },
    )
}

#[cfg(test)]
mod tests {
    use dc_receiving_manifest_models::Measurement;

    use super::*;

    fn record(sequence: u32, qty: Option<f64>) -> PackageRecord {
        PackageRecord {
            quantity_shipped: qty,
            ..PackageRecord::empty(sequence)
        }
    }

    #[test]
    fn row_uses_empty_cells_for_absent_text() {
        let row = to_row(&PackageRecord::empty(3));
        assert_eq!(row.sequence, 3);
        assert_eq!(row.package_id, "");
        assert_eq!(row.weight, "");
        assert_eq!(row.quantity_shipped, None);
    }

    #[test]
    fn row_formats_measurements() {
        let record = PackageRecord {
            package_id: Some("1A4000000000000000001234".to_owned()),
            item_name: Some("Blue Dream".to_owned()),
            weight: Some(Measurement::new("3.5", "g")),
            volume: Some(Measurement::new("1", "fl oz")),
            ..PackageRecord::empty(1)
        };
        let row = to_row(&record);
        assert_eq!(row.item_name, "Blue Dream");
        assert_eq!(row.weight, "3.5 g");
        assert_eq!(row.volume, "1 fl oz");
    }

    #[test]
    fn rows_preserve_order() {
        let records = vec![record(1, None), record(2, Some(1.0)), record(3, None)];
        let sequences: Vec<u32> = to_rows(&records).iter().map(|r| r.sequence).collect();
        assert_eq!(sequences, vec![1, 2, 3]);
    }

    #[test]
    fn summary_skips_absent_quantities() {
        let records = vec![record(1, Some(40.0)), record(2, None), record(3, Some(0.0))];
        let summary = summarize(&records);
        assert_eq!(summary.total_packages, 3);
        assert!((summary.total_quantity_shipped - 40.0).abs() < f64::EPSILON);
        assert_eq!(summary.missing_quantity, 1);
    }

    #[test]
    fn empty_summary() {
        assert_eq!(summarize(&[]), ManifestSummary::default());
    }
}
