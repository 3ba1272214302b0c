//! Printable verification worksheet.
//!
//! One block per package with blank lines for the receiver to fill in by
//! hand. Long values are shortened so each block fits a printed page: the
//! package tag keeps its last 8 characters (the part people read off the
//! label) and the batch is cut to 20.

use chrono::NaiveDate;
use dc_receiving_manifest_models::{HeaderField, ManifestHeader, PackageRecord};

use crate::format_optional_quantity;

/// Characters of the package tag shown.
pub const ID_TAIL_CHARS: usize = 8;
/// Characters of the production batch shown.
pub const BATCH_MAX_CHARS: usize = 20;

const RULE: &str = "==============================================================";
const THIN_RULE: &str = "--------------------------------------------------------------";

/// Returns the last `n` characters of `s`.
#[must_use]
pub fn tail_chars(s: &str, n: usize) -> &str {
    let count = s.chars().count();
    if count <= n {
        return s;
    }
    s.char_indices()
        .nth(count - n)
        .map_or(s, |(start, _)| &s[start..])
}

/// Returns the first `n` characters of `s`.
#[must_use]
pub fn truncate_chars(s: &str, n: usize) -> &str {
    s.char_indices().nth(n).map_or(s, |(end, _)| &s[..end])
}

/// Renders the worksheet.
#[must_use]
pub fn render(header: &ManifestHeader, packages: &[PackageRecord], printed_on: NaiveDate) -> String {
    let mut lines = vec![
        RULE.to_owned(),
        "RECEIVING VERIFICATION WORKSHEET".to_owned(),
        RULE.to_owned(),
    ];
    for field in HeaderField::ALL {
        let value = header.get(*field).unwrap_or("Not found");
        lines.push(format!("{:<20} {value}", format!("{}:", field.label())));
    }
    lines.push(format!("{:<20} {}", "Printed:", printed_on.format("%Y-%m-%d")));
    lines.push(format!("{:<20} {}", "Packages:", packages.len()));
    lines.push(RULE.to_owned());

    for package in packages {
        let id = package.package_id.as_deref().map_or_else(
            || "n/a".to_owned(),
            |id| format!("...{}", tail_chars(id, ID_TAIL_CHARS)),
        );
        let name = package.item_name.as_deref().unwrap_or("(no item name)");
        let batch = package
            .production_batch
            .as_deref()
            .map_or("n/a", |b| truncate_chars(b, BATCH_MAX_CHARS));

        lines.push(format!("#{:<4} {id:<12} {name}", package.sequence));
        lines.push(format!(
            "      Shipped: {:<10} Batch: {batch}",
            format_optional_quantity(package.quantity_shipped)
        ));
        lines.push("      Received: ________  Verified by: ________".to_owned());
        lines.push(THIN_RULE.to_owned());
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn printed_on() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, 19).unwrap()
    }

    #[test]
    fn tail_and_truncate_are_char_based() {
        assert_eq!(tail_chars("1A4000000000000000001234", 8), "00001234");
        assert_eq!(tail_chars("short", 8), "short");
        assert_eq!(tail_chars("ééééééééé", 8), "éééééééé");
        assert_eq!(truncate_chars("BATCH-2025-11-19-LOT-0042", 20), "BATCH-2025-11-19-LOT");
        assert_eq!(truncate_chars("ß-batch", 1), "ß");
        assert_eq!(truncate_chars("abc", 20), "abc");
    }

    #[test]
    fn renders_header_and_package_blocks() {
        let header = ManifestHeader {
            manifest_number: Some("123456".to_owned()),
            destination_name: Some("Green Leaf Distribution".to_owned()),
            ..ManifestHeader::default()
        };
        let packages = vec![
            PackageRecord {
                package_id: Some("1A4000000000000000001234".to_owned()),
                item_name: Some("Side Hustle (Flower)".to_owned()),
                quantity_shipped: Some(40.0),
                production_batch: Some("BATCH-2025-11-19-LOT-0042".to_owned()),
                ..PackageRecord::empty(1)
            },
            PackageRecord::empty(2),
        ];

        let sheet = render(&header, &packages, printed_on());

        assert!(sheet.contains("Manifest Number:     123456"));
        assert!(sheet.contains("Destination:         Green Leaf Distribution"));
        assert!(sheet.contains("Origin:              Not found"));
        assert!(sheet.contains("Printed:             2025-11-19"));
        assert!(sheet.contains("#1    ...00001234  Side Hustle (Flower)"));
        assert!(sheet.contains("Shipped: 40         Batch: BATCH-2025-11-19-LOT\n"));
        assert!(sheet.contains("#2    n/a          (no item name)"));
        assert!(sheet.contains("Shipped: n/a        Batch: n/a"));
        assert_eq!(sheet.matches("Received: ________  Verified by: ________").count(), 2);
    }

    #[test]
    fn empty_manifest_renders_title_block_only() {
        let sheet = render(&ManifestHeader::default(), &[], printed_on());
        let lines: Vec<&str> = sheet.lines().collect();

        assert_eq!(lines.len(), 6 + HeaderField::ALL.len());
        assert_eq!(lines[3], "Manifest Number:     Not found");
        assert_eq!(lines[10], "Packages:            0");
        assert!(sheet.ends_with(&format!("{RULE}\n")));
        assert!(!sheet.contains("Received:"));
    }
}
