#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Transfer-manifest text extraction.
//!
//! Turns the plain text of a Metrc-style transfer manifest into a
//! [`ManifestHeader`] and an ordered list of [`PackageRecord`]s:
//!
//! 1. [`lines::tokenize`] splits the text into trimmed lines.
//! 2. [`header::extract_header`] recovers the header fields.
//! 3. A [`segment::Segmenter`] finds the package boundaries.
//! 4. [`fields::extract_package`] recovers each package's fields.
//!
//! Extraction never fails once an [`Extractor`] is built. Anything that
//! cannot be found is `None`, and a text with no packages yields an empty
//! list alongside the source text for diagnostics.

pub mod assemble;
pub mod clean;
pub mod config;
pub mod fields;
pub mod header;
pub mod lines;
pub mod profiles;
pub mod segment;

use dc_receiving_manifest_models::{
    ExtractionStats, HeaderField, ManifestHeader, PackageRecord, PackageRow,
};
use serde::Serialize;

use crate::assemble::ManifestSummary;
use crate::config::ExtractionConfig;
use crate::segment::Segmenter;

/// Characters of source text shown when a manifest yields no packages.
pub const DEBUG_EXCERPT_CHARS: usize = 2000;

/// Errors that can occur while loading or compiling an extraction config.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading a config file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing failed.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A configured pattern did not compile.
    #[error("Invalid pattern: {0}")]
    Regex(#[from] regex::Error),

    /// No built-in profile has the requested id.
    #[error("Unknown profile: {name}")]
    UnknownProfile {
        /// Requested profile id.
        name: String,
    },

    /// The config parsed but cannot drive an extraction.
    #[error("Invalid config: {message}")]
    Invalid {
        /// Description of what went wrong.
        message: String,
    },
}

/// Everything recovered from one manifest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManifestExtraction {
    /// Header metadata.
    pub header: ManifestHeader,
    /// Package records in manifest order.
    pub packages: Vec<PackageRecord>,
    /// The text the extraction ran over.
    pub source_text: String,
}

impl ManifestExtraction {
    /// Returns `true` if no package was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Field coverage counts.
    #[must_use]
    pub fn stats(&self) -> ExtractionStats {
        ExtractionStats::from_packages(&self.packages)
    }

    /// Display rows, one per package.
    #[must_use]
    pub fn rows(&self) -> Vec<PackageRow> {
        assemble::to_rows(&self.packages)
    }

    /// Package and quantity totals.
    #[must_use]
    pub fn summary(&self) -> ManifestSummary {
        assemble::summarize(&self.packages)
    }

    /// The first `limit` characters of the source text.
    #[must_use]
    pub fn debug_excerpt(&self, limit: usize) -> &str {
        self.source_text
            .char_indices()
            .nth(limit)
            .map_or(self.source_text.as_str(), |(end, _)| &self.source_text[..end])
    }
}

/// A compiled extraction pipeline.
#[derive(Debug, Clone)]
pub struct Extractor {
    config: ExtractionConfig,
    segmenter: Segmenter,
}

impl Default for Extractor {
    fn default() -> Self {
        Self {
            config: ExtractionConfig::default(),
            segmenter: Segmenter::default(),
        }
    }
}

impl Extractor {
    /// Validates and compiles `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the config is invalid or its delimiter
    /// pattern does not compile.
    pub fn new(config: ExtractionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let segmenter = Segmenter::from_strategy(&config.segmentation)?;
        Ok(Self { config, segmenter })
    }

    /// Builds an extractor from a built-in profile.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownProfile`] if no profile has that id.
    pub fn from_profile(id: &str) -> Result<Self, ConfigError> {
        Self::new(profiles::profile(id)?)
    }

    /// The config this extractor was built from.
    #[must_use]
    pub const fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Runs the pipeline over `text`.
    #[must_use]
    pub fn extract(&self, text: &str) -> ManifestExtraction {
        let lines = lines::tokenize(text);
        let header = header::extract_header(&lines);

        let packages: Vec<PackageRecord> = self
            .segmenter
            .segment(text, &lines)
            .iter()
            .map(|window| {
                fields::extract_package(
                    window,
                    &self.config.windows,
                    &self.config.name_cleaning,
                )
            })
            .collect();

        log::info!(
            "Extracted {} packages and {}/{} header fields ({}, {} lines)",
            packages.len(),
            header.found_count(),
            HeaderField::ALL.len(),
            self.config.segmentation.label(),
            lines.len()
        );

        ManifestExtraction {
            header,
            packages,
            source_text: text.to_owned(),
        }
    }
}

/// Extracts `text` with the default marker-scan pipeline.
#[must_use]
pub fn extract_manifest(text: &str) -> ManifestExtraction {
    Extractor::default().extract(text)
}

#[cfg(test)]
mod tests {
    use dc_receiving_manifest_models::Measurement;

    use super::*;

    const HEADER: &str = "\
Manifest No.   123456
Date Created 11/18/2025 02:15 PM
Originating Entity
Emerald Farms LLC
Originating License No. C11-0000123-LIC
Destination
Green Leaf Distribution
Destination License No. C11-0000456-LIC
";

    const PACKAGES: &str = "\
1. Package | Shipped
Shipped
Package
Item
Quantity
1A4000000000
0000001234
Lab Test Results Passed
Contains Retail IDs: No
Side Hustle (Flower) (Vape Cartridge
(weight - each))
Shp: 40
ea
Item Details
Wgt: 1.0 g
Strain: Blue Dream
Source Production Batch
BDR-2025-001
2. Package | Accepted
Accepted
Package
Item
Quantity
Lab Test Results Pending
Contains Retail IDs: No
Bloom Vape - 1.0g Blue Dream (BDR), CAPNA, INC.
Shp: 1,000 ea
Item Details
Vol: 30 ml
Source Production Batch
BLM-77
";

    fn manifest() -> String {
        format!("{HEADER}{PACKAGES}")
    }

    #[test]
    fn extracts_header_and_packages() {
        let result = extract_manifest(&manifest());

        assert_eq!(result.header.manifest_number.as_deref(), Some("123456"));
        assert_eq!(result.header.found_count(), HeaderField::ALL.len());
        assert_eq!(result.packages.len(), 2);

        let first = &result.packages[0];
        assert_eq!(first.sequence, 1);
        assert_eq!(first.package_id.as_deref(), Some("1A40000000000000001234"));
        assert_eq!(first.item_name.as_deref(), Some("Side Hustle (Flower)"));
        assert_eq!(first.quantity_shipped, Some(40.0));
        assert_eq!(first.weight, Some(Measurement::new("1.0", "g")));
        assert_eq!(first.volume, None);
        assert_eq!(first.strain.as_deref(), Some("Blue Dream"));
        assert_eq!(first.production_batch.as_deref(), Some("BDR-2025-001"));
    }

    #[test]
    fn scenario_manifest_number() {
        let result = extract_manifest("Manifest No.   123456");
        assert_eq!(result.header.manifest_number.as_deref(), Some("123456"));
    }

    #[test]
    fn scenario_quantity_on_one_line() {
        let text = "\
1. Package | Shipped
Shipped
a
b
c
Shp: 40 ea";
        let result = extract_manifest(text);
        assert_eq!(result.packages.len(), 1);
        assert_eq!(result.packages[0].quantity_shipped, Some(40.0));
    }

    #[test]
    fn scenario_nested_category_stripped() {
        let result = extract_manifest(&manifest());
        assert_eq!(
            result.packages[0].raw_item_name.as_deref(),
            Some("Side Hustle (Flower) (Vape Cartridge (weight - each))")
        );
        assert_eq!(
            result.packages[0].item_name.as_deref(),
            Some("Side Hustle (Flower)")
        );
    }

    #[test]
    fn scenario_comma_truncation_profile() {
        let extractor = Extractor::from_profile("metrc_comma_names").unwrap();
        let result = extractor.extract(&manifest());
        assert_eq!(
            result.packages[1].item_name.as_deref(),
            Some("Bloom Vape - 1.0g Blue Dream (BDR)")
        );
    }

    #[test]
    fn scenario_second_package_without_identifier() {
        let result = extract_manifest(&manifest());
        assert_eq!(result.packages.len(), 2);

        let second = &result.packages[1];
        assert_eq!(second.sequence, 2);
        assert_eq!(second.package_id, None);
        assert_eq!(
            second.raw_item_name.as_deref(),
            Some("Bloom Vape - 1.0g Blue Dream (BDR), CAPNA, INC.")
        );
        assert_eq!(second.quantity_shipped, Some(1000.0));
        assert_eq!(second.volume, Some(Measurement::new("30", "ml")));
        assert_eq!(second.weight, None);
        assert_eq!(second.production_batch.as_deref(), Some("BLM-77"));
    }

    #[test]
    fn scenario_empty_input() {
        let result = extract_manifest("");
        assert!(result.header.is_empty());
        assert!(result.is_empty());
        assert_eq!(result.source_text, "");
    }

    #[test]
    fn extraction_is_deterministic() {
        let text = manifest();
        let extractor = Extractor::default();
        assert_eq!(extractor.extract(&text), extractor.extract(&text));
    }

    #[test]
    fn sequences_are_contiguous_even_for_garbage_bodies() {
        let text = "\
1. Package | Shipped
Shipped
2. Package | Shipped
Shipped
???
3. Package | Accepted
Accepted";
        let result = extract_manifest(text);
        let sequences: Vec<u32> = result.packages.iter().map(|p| p.sequence).collect();
        assert_eq!(sequences, vec![1, 2, 3]);
        assert!(result.packages.iter().all(|p| !p.has_any_field()));
    }

    #[test]
    fn missing_quantity_is_absent_not_zero() {
        let text = PACKAGES.replace("Shp: 40", "Qty: 40");
        let result = extract_manifest(&text);
        assert_eq!(result.packages[0].quantity_shipped, None);
        assert_eq!(result.summary().missing_quantity, 1);
        assert!((result.summary().total_quantity_shipped - 1000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn header_survives_without_package_markers() {
        let text = manifest().replace(". Package |", " Item ");
        let result = extract_manifest(&text);
        assert!(result.is_empty());
        assert_eq!(result.header.found_count(), HeaderField::ALL.len());
    }

    #[test]
    fn packages_survive_without_header() {
        let result = extract_manifest(PACKAGES);
        assert!(result.header.is_empty());
        assert_eq!(result.packages.len(), 2);
        assert_eq!(result.packages[0].quantity_shipped, Some(40.0));
    }

    #[test]
    fn truncated_input_never_panics() {
        let text = manifest();
        for (end, _) in text.char_indices() {
            let result = extract_manifest(&text[..end]);
            assert!(result.packages.len() <= 2);
        }
        let lines: Vec<&str> = text.lines().collect();
        for n in 0..=lines.len() {
            let _ = extract_manifest(&lines[..n].join("\n"));
        }
    }

    #[test]
    fn delimiter_profile_agrees_with_marker_scan() {
        let text = manifest();
        let scanned = extract_manifest(&text);
        let split = Extractor::from_profile("metrc_delimiter_split")
            .unwrap()
            .extract(&text);

        assert_eq!(split.header, scanned.header);
        assert_eq!(split.packages.len(), scanned.packages.len());
        for (a, b) in scanned.packages.iter().zip(&split.packages) {
            assert_eq!(a.sequence, b.sequence);
            assert_eq!(a.package_id, b.package_id);
            assert_eq!(a.quantity_shipped, b.quantity_shipped);
            assert_eq!(a.production_batch, b.production_batch);
        }
        assert_eq!(
            split.packages[1].item_name.as_deref(),
            Some("Bloom Vape - 1.0g Blue Dream (BDR)")
        );
    }

    #[test]
    fn stats_count_recovered_fields() {
        let stats = extract_manifest(&manifest()).stats();
        assert_eq!(stats.total_packages, 2);
        assert_eq!(stats.with_identifier, 1);
        assert_eq!(stats.with_item_name, 2);
        assert_eq!(stats.with_quantity_shipped, 2);
        assert_eq!(stats.with_production_batch, 2);
    }

    #[test]
    fn rows_follow_package_order() {
        let rows = extract_manifest(&manifest()).rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].weight, "1.0 g");
        assert_eq!(rows[1].package_id, "");
    }

    #[test]
    fn debug_excerpt_is_char_bounded() {
        let result = extract_manifest("héllo wörld");
        assert_eq!(result.debug_excerpt(5), "héllo");
        assert_eq!(result.debug_excerpt(100), "héllo wörld");
        assert_eq!(result.debug_excerpt(0), "");
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = ExtractionConfig::default();
        config.windows.measurement_lines = 0;
        assert!(matches!(
            Extractor::new(config),
            Err(ConfigError::Invalid { .. })
        ));
    }
}
