#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Manifest header, package record, and tabular row types.
//!
//! These are the values produced by the extraction pipeline in
//! `dc_receiving_manifest` and consumed by the receiving workflow and the
//! report writers. Absence of a field is always modelled as `None`; nothing
//! in this crate substitutes a zero or an empty string for a missing value
//! except [`PackageRow`], which is explicitly a display projection.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A labelled field in the manifest header block.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum HeaderField {
    /// Manifest number (e.g. `"0001234567"`).
    ManifestNumber,
    /// Creation date/time as printed on the manifest.
    DateCreated,
    /// Name of the licensed entity shipping the packages.
    OriginName,
    /// License number of the shipping entity.
    OriginLicense,
    /// Name of the licensed entity receiving the packages.
    DestinationName,
    /// License number of the receiving entity.
    DestinationLicense,
}

impl HeaderField {
    /// Every header field, in display order.
    pub const ALL: &[Self] = &[
        Self::ManifestNumber,
        Self::DateCreated,
        Self::OriginName,
        Self::OriginLicense,
        Self::DestinationName,
        Self::DestinationLicense,
    ];

    /// Human-readable label used in reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ManifestNumber => "Manifest Number",
            Self::DateCreated => "Date Created",
            Self::OriginName => "Origin",
            Self::OriginLicense => "Origin License",
            Self::DestinationName => "Destination",
            Self::DestinationLicense => "Destination License",
        }
    }
}

/// Header metadata recovered from a manifest.
///
/// Every field is optional: a missing anchor is an expected outcome, not an
/// error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestHeader {
    /// Manifest number.
    pub manifest_number: Option<String>,
    /// Creation date/time, verbatim.
    pub date_created: Option<String>,
    /// Originating entity name.
    pub origin_name: Option<String>,
    /// Originating license number.
    pub origin_license: Option<String>,
    /// Destination entity name.
    pub destination_name: Option<String>,
    /// Destination license number.
    pub destination_license: Option<String>,
}

/// Accepted layouts for [`ManifestHeader::date_created_parsed`].
const DATE_TIME_FORMATS: &[&str] = &["%m/%d/%Y %I:%M %p", "%m/%d/%Y %I:%M:%S %p", "%m/%d/%Y %H:%M"];

impl ManifestHeader {
    /// Returns the value of `field`, if present.
    #[must_use]
    pub fn get(&self, field: HeaderField) -> Option<&str> {
        match field {
            HeaderField::ManifestNumber => self.manifest_number.as_deref(),
            HeaderField::DateCreated => self.date_created.as_deref(),
            HeaderField::OriginName => self.origin_name.as_deref(),
            HeaderField::OriginLicense => self.origin_license.as_deref(),
            HeaderField::DestinationName => self.destination_name.as_deref(),
            HeaderField::DestinationLicense => self.destination_license.as_deref(),
        }
    }

    /// Returns a copy of this header with `field` set to `value`.
    #[must_use]
    pub fn with(mut self, field: HeaderField, value: Option<String>) -> Self {
        let slot = match field {
            HeaderField::ManifestNumber => &mut self.manifest_number,
            HeaderField::DateCreated => &mut self.date_created,
            HeaderField::OriginName => &mut self.origin_name,
            HeaderField::OriginLicense => &mut self.origin_license,
            HeaderField::DestinationName => &mut self.destination_name,
            HeaderField::DestinationLicense => &mut self.destination_license,
        };
        *slot = value;
        self
    }

    /// Number of header fields that were found.
    #[must_use]
    pub fn found_count(&self) -> usize {
        HeaderField::ALL
            .iter()
            .filter(|f| self.get(**f).is_some())
            .count()
    }

    /// Returns `true` if no header field was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.found_count() == 0
    }

    /// Parses [`Self::date_created`] into a timestamp.
    ///
    /// A bare date (`MM/DD/YYYY`) resolves to midnight. Returns `None` when
    /// the field is absent or in an unrecognised layout.
    #[must_use]
    pub fn date_created_parsed(&self) -> Option<NaiveDateTime> {
        let raw = self.date_created.as_deref()?.trim();
        for format in DATE_TIME_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
                return Some(dt);
            }
        }
        chrono::NaiveDate::parse_from_str(raw, "%m/%d/%Y")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    }
}

/// A measured attribute with its unit (e.g. `3.5 g`, `1 fl oz`).
///
/// The amount is kept as it appeared in the source so that reports show
/// `1.0 g` rather than a reformatted float.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measurement {
    /// Numeric amount, verbatim.
    pub amount: String,
    /// Unit token, verbatim.
    pub unit: String,
}

impl Measurement {
    /// Creates a measurement from its amount and unit text.
    #[must_use]
    pub fn new(amount: &str, unit: &str) -> Self {
        Self {
            amount: amount.to_owned(),
            unit: unit.to_owned(),
        }
    }

    /// Numeric value of the amount.
    #[must_use]
    pub fn value(&self) -> Option<f64> {
        self.amount.parse().ok()
    }
}

impl std::fmt::Display for Measurement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.amount, self.unit)
    }
}

/// Kind of unit-bearing measurement recorded under "Item Details".
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MeasurementKind {
    /// Net weight (`Wgt:` / `Weight:`).
    Weight,
    /// Net volume (`Vol:` / `Volume:`).
    Volume,
}

/// One manifest line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageRecord {
    /// 1-based position in the manifest. Contiguous across a run.
    pub sequence: u32,
    /// Package tag (e.g. `1A4000000000000000001234`).
    pub package_id: Option<String>,
    /// Item name as found in the text.
    pub raw_item_name: Option<String>,
    /// Item name after the configured cleaning heuristic.
    pub item_name: Option<String>,
    /// Shipped quantity. `None` means the marker was not found, never zero.
    pub quantity_shipped: Option<f64>,
    /// Source production batch.
    pub production_batch: Option<String>,
    /// Net weight.
    pub weight: Option<Measurement>,
    /// Net volume.
    pub volume: Option<Measurement>,
    /// Strain name.
    pub strain: Option<String>,
}

impl PackageRecord {
    /// A record carrying only its sequence number.
    #[must_use]
    pub const fn empty(sequence: u32) -> Self {
        Self {
            sequence,
            package_id: None,
            raw_item_name: None,
            item_name: None,
            quantity_shipped: None,
            production_batch: None,
            weight: None,
            volume: None,
            strain: None,
        }
    }

    /// Returns `true` if at least one field besides the sequence number was
    /// recovered.
    #[must_use]
    pub const fn has_any_field(&self) -> bool {
        self.package_id.is_some()
            || self.raw_item_name.is_some()
            || self.quantity_shipped.is_some()
            || self.production_batch.is_some()
            || self.weight.is_some()
            || self.volume.is_some()
            || self.strain.is_some()
    }

    /// Returns the measurement of the given kind.
    #[must_use]
    pub const fn measurement(&self, kind: MeasurementKind) -> Option<&Measurement> {
        match kind {
            MeasurementKind::Weight => self.weight.as_ref(),
            MeasurementKind::Volume => self.volume.as_ref(),
        }
    }
}

/// Flattened, display-ready projection of a [`PackageRecord`].
///
/// Column names match the package list export. Text columns use an empty
/// string for absent values; the quantity stays optional so that it is never
/// summed as zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackageRow {
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
    /// Source production batch.
    #[serde(rename = "Production Batch")]
    pub production_batch: String,
    /// Net weight, formatted.
    #[serde(rename = "Weight")]
    pub weight: String,
    /// Net volume, formatted.
    #[serde(rename = "Volume")]
    pub volume: String,
    /// Strain name.
    #[serde(rename = "Strain")]
    pub strain: String,
}

impl PackageRow {
    /// Column headers in export order.
    pub const COLUMNS: &[&str] = &[
        "Package #",
        "Package ID",
        "Item Name",
        "Qty Shipped",
        "Production Batch",
        "Weight",
        "Volume",
        "Strain",
    ];
}

/// Field coverage counts for one extraction run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Number of package records.
    pub total_packages: usize,
    /// Records with a package tag.
    pub with_identifier: usize,
    /// Records with an item name.
    pub with_item_name: usize,
    /// Records with a shipped quantity.
    pub with_quantity_shipped: usize,
    /// Records with a production batch.
    pub with_production_batch: usize,
}

impl ExtractionStats {
    /// Tallies field coverage over `packages`.
    #[must_use]
    pub fn from_packages(packages: &[PackageRecord]) -> Self {
        packages.iter().fold(
            Self {
                total_packages: packages.len(),
                ..Self::default()
            },
            |mut stats, p| {
                stats.with_identifier += usize::from(p.package_id.is_some());
                stats.with_item_name += usize::from(p.item_name.is_some());
                stats.with_quantity_shipped += usize::from(p.quantity_shipped.is_some());
                stats.with_production_batch += usize::from(p.production_batch.is_some());
                stats
            },
        )
    }
}
