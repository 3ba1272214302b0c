//! Per-package field extraction.
//!
//! Every field has its own pure function over a package's line window. Each
//! one takes a cursor and returns a [`Scan`]: the value, if found, and the
//! cursor the next step should start from. A step that fails hands back the
//! cursor it was given, so later steps still run.
//!
//! ## Package block layout
//!
//! ```text
//! 1. Package | Shipped             <- marker (window line 0)
//! Shipped                          <- status
//! ...                              <- boilerplate up to header_skip
//! 1A4000000000                     <- package tag, wrapped at ~15 chars
//! 0000001234
//! Lab Test Results ...             <- tag stop anchor
//! Contains Retail IDs: No
//! Bloom Vape - 1.0g Blue Dream     <- item name, may wrap
//! (BDR), CAPNA, INC.
//! Shp: 40                          <- shipped quantity, unit may wrap
//! ea
//! Item Details
//! Wgt: 1.0 g                       <- measurements
//! Strain: Blue Dream
//! Source Production Batch          <- batch label, value on next line
//! BDR-2025-001
//! ```

use std::sync::LazyLock;

use dc_receiving_manifest_models::{Measurement, PackageRecord};
use regex::Regex;

use crate::config::{NameCleaning, ScanWindows};
use crate::lines::{find_from, window_end};
use crate::segment::PackageWindow;

/// Stop anchor for the package tag.
pub const LAB_TEST_ANCHOR: &str = "Lab Test";
/// Line preceding the item name.
pub const RETAIL_IDS_ANCHOR: &str = "Contains Retail IDs";
/// Shipped quantity marker.
pub const SHIPPED_ANCHOR: &str = "Shp:";
/// Section following the item name.
pub const ITEM_DETAILS_ANCHOR: &str = "Item Details";
/// Production batch label.
pub const BATCH_ANCHOR: &str = "Source Production Batch";

static SHIPPED_QTY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Shp:\s*(\d{1,3}(?:,\d{3})+(?:\.\d+)?|\d+(?:\.\d+)?)").expect("valid regex")
});

static EACH_UNIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[\s\d])ea\b").expect("valid regex"));

static WEIGHT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(kg|g|oz|lbs?)\b").expect("valid regex")
});

static VOLUME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(fl\s*oz|mls?|l)\b").expect("valid regex")
});

static STRAIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Strain:\s*([^|]+)").expect("valid regex"));

static INLINE_BATCH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Source Production Batch\s*:?\s+([\w\-,]+)").expect("valid regex")
});

/// Result of one extraction step.
#[derive(Debug, Clone, PartialEq)]
pub struct Scan<T> {
    /// Recovered value.
    pub value: Option<T>,
    /// Where the next step starts.
    pub cursor: usize,
}

impl<T> Scan<T> {
    const fn found(value: T, cursor: usize) -> Self {
        Self {
            value: Some(value),
            cursor,
        }
    }

    const fn missed(cursor: usize) -> Self {
        Self {
            value: None,
            cursor,
        }
    }
}

/// Weight, volume, and strain from the "Item Details" block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Measurements {
    /// Net weight.
    pub weight: Option<Measurement>,
    /// Net volume.
    pub volume: Option<Measurement>,
    /// Strain name.
    pub strain: Option<String>,
}

/// Skips one- and two-digit filler lines (page numbers, row counters).
#[must_use]
pub fn skip_numeric_filler(lines: &[&str], cursor: usize) -> usize {
    let mut i = cursor;
    while lines
        .get(i)
        .is_some_and(|l| !l.is_empty() && l.len() < 3 && l.chars().all(|c| c.is_ascii_digit()))
    {
        i += 1;
    }
    i
}

/// Returns `true` if `line` can be a fragment of a wrapped package tag.
#[must_use]
pub fn is_identifier_fragment(line: &str, max_len: usize) -> bool {
    !line.is_empty()
        && line.chars().count() <= max_len
        && line.chars().all(char::is_alphanumeric)
}

/// Reassembles the package tag from its wrapped fragments.
///
/// Fragments are concatenated directly up to the [`LAB_TEST_ANCHOR`] line,
/// which becomes the new cursor. Lines that cannot be fragments are skipped.
/// Without the anchor, or with no fragments, the tag is absent.
#[must_use]
pub fn package_id(lines: &[&str], cursor: usize, max_len: usize) -> Scan<String> {
    let start = skip_numeric_filler(lines, cursor);
    let Some(stop) = find_from(lines, start, LAB_TEST_ANCHOR) else {
        log::debug!("No '{LAB_TEST_ANCHOR}' anchor after line {start}");
        return Scan::missed(cursor);
    };

    let id: String = lines[start..stop]
        .iter()
        .filter(|l| is_identifier_fragment(l, max_len))
        .copied()
        .collect();

    if id.is_empty() {
        Scan::missed(stop)
    } else {
        Scan::found(id, stop)
    }
}

/// Collects the item name between the [`RETAIL_IDS_ANCHOR`] line and the
/// quantity or "Item Details" line.
///
/// Wrapped name lines are joined with single spaces. The cursor ends on the
/// stop line.
#[must_use]
pub fn item_name(lines: &[&str], cursor: usize) -> Scan<String> {
    let Some(anchor) = find_from(lines, cursor, RETAIL_IDS_ANCHOR) else {
        log::debug!("No '{RETAIL_IDS_ANCHOR}' anchor after line {cursor}");
        return Scan::missed(cursor);
    };
    let start = anchor + 1;

    let Some(stop) = lines
        .iter()
        .enumerate()
        .skip(start)
        .find_map(|(i, l)| {
            (l.contains(SHIPPED_ANCHOR) || l.contains(ITEM_DETAILS_ANCHOR)).then_some(i)
        })
    else {
        log::debug!("Item name after line {anchor} never terminated");
        return Scan::missed(start);
    };

    let name = lines[start..stop]
        .iter()
        .filter(|l| !l.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ");

    if name.is_empty() {
        Scan::missed(stop)
    } else {
        Scan::found(name, stop)
    }
}

/// Parses the number after `Shp:`, accepting `1,000`-style grouping.
#[must_use]
pub fn parse_shipped_quantity(text: &str) -> Option<f64> {
    let caps = SHIPPED_QTY_RE.captures(text)?;
    caps.get(1)?.as_str().replace(',', "").parse().ok()
}

/// Finds the shipped quantity.
///
/// Starts at the first `Shp:` line at or after `cursor`. When the `ea` unit
/// is not on that line, up to `lookahead` following lines are joined in
/// until it appears. The cursor moves past the unit line, or just past the
/// `Shp:` line when no unit was seen.
#[must_use]
pub fn quantity_shipped(lines: &[&str], cursor: usize, lookahead: usize) -> Scan<f64> {
    let Some(at) = find_from(lines, cursor, SHIPPED_ANCHOR) else {
        return Scan::missed(cursor);
    };

    let last = window_end(lines, at + 1, lookahead);
    let unit_line = if EACH_UNIT_RE.is_match(lines[at]) {
        Some(at)
    } else {
        (at + 1..last).find(|&j| EACH_UNIT_RE.is_match(lines[j]))
    };
    let (end, next) = unit_line.map_or((last, at + 1), |u| (u + 1, u + 1));

    let joined = lines[at..end].join(" ");
    parse_shipped_quantity(&joined).map_or_else(
        || {
            log::debug!("Unparseable shipped quantity: {joined:?}");
            Scan::missed(next)
        },
        |qty| Scan::found(qty, next),
    )
}

/// Captures amount and unit, folding plural units (`lbs`, `mls`) to singular.
fn capture_measurement(re: &Regex, line: &str) -> Option<Measurement> {
    let caps = re.captures(line)?;
    let unit = caps.get(2)?.as_str();
    let unit = unit.strip_suffix(['s', 'S']).unwrap_or(unit);
    Some(Measurement::new(caps.get(1)?.as_str(), unit))
}

/// Scans up to `window` lines from `cursor` for weight, volume, and strain.
///
/// A later line of the same kind replaces an earlier one.
#[must_use]
pub fn measurements(lines: &[&str], cursor: usize, window: usize) -> Measurements {
    let end = window_end(lines, cursor, window);
    let mut found = Measurements::default();

    for line in lines.iter().take(end).skip(cursor) {
        if line.starts_with("Wgt:") || line.starts_with("Weight:") {
            if let Some(m) = capture_measurement(&WEIGHT_RE, line) {
                found.weight = Some(m);
            }
        } else if line.starts_with("Vol:") || line.starts_with("Volume:") {
            if let Some(m) = capture_measurement(&VOLUME_RE, line) {
                found.volume = Some(m);
            }
        } else if line.starts_with("Strain:")
            && let Some(strain) = STRAIN_RE
                .captures(line)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().trim())
                .filter(|s| !s.is_empty())
        {
            found.strain = Some(strain.to_owned());
        }
    }

    found
}

/// Finds the source production batch within `window` lines of `cursor`.
///
/// Only the first [`BATCH_ANCHOR`] line is considered. Its next line is the
/// value unless that line is blank or past the end of the package, in which
/// case the value must be inline on the anchor line.
#[must_use]
pub fn production_batch(lines: &[&str], cursor: usize, window: usize) -> Scan<String> {
    let end = window_end(lines, cursor, window);
    let Some(at) = lines
        .iter()
        .enumerate()
        .take(end)
        .skip(cursor)
        .find_map(|(i, l)| l.contains(BATCH_ANCHOR).then_some(i))
    else {
        return Scan::missed(cursor);
    };

    if let Some(next) = lines.get(at + 1).filter(|l| !l.is_empty()) {
        return Scan::found((*next).to_owned(), at + 2);
    }

    INLINE_BATCH_RE
        .captures(lines[at])
        .and_then(|c| c.get(1))
        .map_or_else(
            || Scan::missed(at + 1),
            |m| Scan::found(m.as_str().to_owned(), at + 1),
        )
}

/// Runs every field step over one package window.
///
/// The returned record always carries the window's sequence number, even
/// when nothing else could be recovered.
#[must_use]
pub fn extract_package(
    window: &PackageWindow<'_>,
    windows: &ScanWindows,
    cleaning: &NameCleaning,
) -> PackageRecord {
    let lines = window.lines.as_slice();
    let cursor = window.start.min(lines.len());

    let id = package_id(lines, cursor, windows.identifier_max_len);
    let name = item_name(lines, id.cursor);
    let qty = quantity_shipped(lines, name.cursor, windows.quantity_lookahead);
    let details = measurements(lines, qty.cursor, windows.measurement_lines);
    let batch = production_batch(lines, qty.cursor, windows.batch_lines);

    let record = PackageRecord {
        sequence: window.sequence,
        package_id: id.value,
        item_name: name.value.as_deref().map(|n| cleaning.apply(n)),
        raw_item_name: name.value,
        quantity_shipped: qty.value,
        production_batch: batch.value,
        weight: details.weight,
        volume: details.volume,
        strain: details.strain,
    };

    if record.has_any_field() {
        log::debug!(
            "Package {}: id={:?} qty={:?}",
            record.sequence,
            record.package_id,
            record.quantity_shipped
        );
    } else {
        log::warn!(
            "Package {}: boundary found but no fields recovered",
            record.sequence
        );
    }

    record
}
