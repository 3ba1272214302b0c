//! Extraction configuration.
//!
//! An [`ExtractionConfig`] selects the segmentation strategy and the item
//! name cleaning heuristic for one manifest layout, and caps the scan
//! windows used by the field extractor. Configs are TOML documents; the
//! built-in ones live under `profiles/` (see [`crate::profiles`]).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Default marker substring that opens a package block.
pub const DEFAULT_MARKER: &str = ". Package |";

/// Default ordinal-capturing delimiter for the split strategy.
pub const DEFAULT_DELIMITER_PATTERN: &str = r"(?m)^[ \t]*(\d+)\.[ \t]*Package[ \t]*\|";

/// Default number of lines between a package marker and its first field.
pub const DEFAULT_HEADER_SKIP: usize = 5;

/// Full configuration for one manifest layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Unique identifier (e.g. `"metrc_marker_scan"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// How package boundaries are found.
    pub segmentation: SegmentationStrategy,
    /// How raw item names are cleaned.
    #[serde(default)]
    pub name_cleaning: NameCleaning,
    /// Scan window caps.
    #[serde(default)]
    pub windows: ScanWindows,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            id: "metrc_marker_scan".to_owned(),
            name: "Metrc transfer manifest (marker scan)".to_owned(),
            segmentation: SegmentationStrategy::default(),
            name_cleaning: NameCleaning::default(),
            windows: ScanWindows::default(),
        }
    }
}

/// Package boundary detection strategy, tagged by `type` in TOML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SegmentationStrategy {
    /// Scan lines for a marker substring confirmed by a status line.
    MarkerScan {
        /// Substring that opens a package block.
        #[serde(default = "default_marker")]
        marker: String,
        /// Accepted values for the line right after the marker.
        #[serde(default = "default_status_tokens")]
        status_tokens: Vec<String>,
        /// Lines from the marker to the first field line.
        #[serde(default = "default_header_skip")]
        header_skip: usize,
    },
    /// Split the whole text on an ordinal-capturing delimiter regex.
    DelimiterSplit {
        /// Regex with exactly one capture group holding the ordinal.
        #[serde(default = "default_delimiter_pattern")]
        pattern: String,
        /// Lines from the delimiter to the first field line.
        #[serde(default = "default_header_skip")]
        header_skip: usize,
    },
}

impl Default for SegmentationStrategy {
    fn default() -> Self {
        Self::MarkerScan {
            marker: default_marker(),
            status_tokens: default_status_tokens(),
            header_skip: DEFAULT_HEADER_SKIP,
        }
    }
}

impl SegmentationStrategy {
    /// Short strategy name for log messages.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::MarkerScan { .. } => "marker_scan",
            Self::DelimiterSplit { .. } => "delimiter_split",
        }
    }
}

/// Item name cleaning heuristic, tagged by `type` in TOML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NameCleaning {
    /// Keep the raw name.
    Keep,
    /// Drop everything from the first comma on.
    CommaTruncate,
    /// Remove a trailing category annotation in parentheses.
    StripCategory {
        /// Words that mark a simple trailing `(...)` as a category.
        #[serde(default = "default_category_keywords")]
        keywords: Vec<String>,
        /// How a keyword is matched against the annotation content.
        #[serde(default)]
        matching: KeywordMatch,
    },
}

impl Default for NameCleaning {
    fn default() -> Self {
        Self::StripCategory {
            keywords: default_category_keywords(),
            matching: KeywordMatch::default(),
        }
    }
}

/// Keyword matching mode for [`NameCleaning::StripCategory`].
///
/// Both modes are case-insensitive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordMatch {
    /// Keyword anywhere in the content: `(Prepackaged)` matches `packaged`.
    #[default]
    Substring,
    /// Keyword must start a word: `(Peach)` does not match `each`.
    WordStart,
}

/// Upper bounds for the per-package scans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanWindows {
    /// Longest line accepted as a package tag fragment.
    pub identifier_max_len: usize,
    /// Extra lines searched for the `ea` unit after `Shp:`.
    pub quantity_lookahead: usize,
    /// Lines scanned for weight/volume/strain after the quantity.
    pub measurement_lines: usize,
    /// Lines scanned for the source production batch after the quantity.
    pub batch_lines: usize,
}

impl Default for ScanWindows {
    fn default() -> Self {
        Self {
            identifier_max_len: 15,
            quantity_lookahead: 2,
            measurement_lines: 20,
            batch_lines: 50,
        }
    }
}

fn default_marker() -> String {
    DEFAULT_MARKER.to_owned()
}

pub(crate) fn default_status_tokens() -> Vec<String> {
    vec!["Accepted".to_owned(), "Shipped".to_owned()]
}

const fn default_header_skip() -> usize {
    DEFAULT_HEADER_SKIP
}

fn default_delimiter_pattern() -> String {
    DEFAULT_DELIMITER_PATTERN.to_owned()
}

/// Category words recognised in a trailing `(...)` annotation.
#[must_use]
pub fn default_category_keywords() -> Vec<String> {
    ["edible", "extract", "weight", "each", "packaged"]
        .into_iter()
        .map(str::to_owned)
        .collect()
}

impl ExtractionConfig {
    /// Parses a config from TOML text and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] if the document is malformed, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::de::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`Self::from_toml_str`].
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        log::debug!("Loaded extraction config from {}", path.display());
        Self::from_toml_str(&contents)
    }

    /// Checks values that deserialize fine but cannot drive a scan.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |message: &str| {
            Err(ConfigError::Invalid {
                message: format!("{}: {message}", self.id),
            })
        };

        if self.id.trim().is_empty() {
            return invalid("empty id");
        }

        match &self.segmentation {
            SegmentationStrategy::MarkerScan {
                marker,
                status_tokens,
                ..
            } => {
                if marker.is_empty() {
                    return invalid("marker must not be empty");
                }
                if status_tokens.iter().all(|t| t.trim().is_empty()) {
                    return invalid("at least one status token is required");
                }
            }
            SegmentationStrategy::DelimiterSplit { pattern, .. } => {
                if pattern.is_empty() {
                    return invalid("delimiter pattern must not be empty");
                }
            }
        }

        if let NameCleaning::StripCategory { keywords, .. } = &self.name_cleaning
            && keywords.iter().any(|k| k.trim().is_empty())
        {
            return invalid("category keywords must not be blank");
        }

        let w = &self.windows;
        if w.identifier_max_len == 0 || w.measurement_lines == 0 || w.batch_lines == 0 {
            return invalid("scan windows must be non-zero");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_marker_scan_config() {
        let config = ExtractionConfig::from_toml_str(
            r#"
id = "minimal"
name = "Minimal"

[segmentation]
type = "marker_scan"
"#,
        )
        .unwrap();
        assert_eq!(config.segmentation, SegmentationStrategy::default());
        assert_eq!(config.name_cleaning, NameCleaning::default());
        assert_eq!(config.windows, ScanWindows::default());
    }

    #[test]
    fn parses_delimiter_split_with_comma_truncation() {
        let config = ExtractionConfig::from_toml_str(
            r#"
id = "split"
name = "Split"
name_cleaning = { type = "comma_truncate" }

[segmentation]
type = "delimiter_split"
header_skip = 3

[windows]
batch_lines = 10
"#,
        )
        .unwrap();
        assert_eq!(
            config.segmentation,
            SegmentationStrategy::DelimiterSplit {
                pattern: DEFAULT_DELIMITER_PATTERN.to_owned(),
                header_skip: 3,
            }
        );
        assert_eq!(config.name_cleaning, NameCleaning::CommaTruncate);
        assert_eq!(config.windows.batch_lines, 10);
        assert_eq!(config.windows.measurement_lines, 20);
    }

    #[test]
    fn parses_word_start_keyword_matching() {
        let config = ExtractionConfig::from_toml_str(
            r#"
id = "words"
name = "Words"
name_cleaning = { type = "strip_category", keywords = ["each"], matching = "word_start" }

[segmentation]
type = "marker_scan"
"#,
        )
        .unwrap();
        assert_eq!(
            config.name_cleaning,
            NameCleaning::StripCategory {
                keywords: vec!["each".to_owned()],
                matching: KeywordMatch::WordStart,
            }
        );
    }

    #[test]
    fn rejects_unknown_strategy() {
        let err = ExtractionConfig::from_toml_str(
            r#"
id = "bad"
name = "Bad"

[segmentation]
type = "ocr"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn rejects_empty_marker() {
        let err = ExtractionConfig::from_toml_str(
            r#"
id = "bad"
name = "Bad"

[segmentation]
type = "marker_scan"
marker = ""
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn rejects_zero_windows() {
        let mut config = ExtractionConfig::default();
        config.windows.batch_lines = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn default_config_is_valid() {
        ExtractionConfig::default().validate().unwrap();
    }
}
