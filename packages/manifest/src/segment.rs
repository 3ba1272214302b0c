//! Package segmentation.
//!
//! Finds package boundaries and cuts the manifest into one
//! [`PackageWindow`] per package. Two strategies are supported:
//!
//! - **Marker scan**: a line containing the marker (e.g. `". Package |"`)
//!   opens a package when the next line is a status token (`Accepted` /
//!   `Shipped`). The window runs to the next confirmed marker.
//! - **Delimiter split**: the whole text is split on an ordinal-capturing
//!   regex and each piece is tokenized on its own.
//!
//! Either way, sequence numbers are assigned positionally starting at 1, and
//! a boundary always yields a window even when its body is garbage.

use regex::Regex;

use crate::ConfigError;
use crate::config::{
    DEFAULT_HEADER_SKIP, DEFAULT_MARKER, SegmentationStrategy, default_status_tokens,
};
use crate::lines::tokenize;

/// The lines belonging to one package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageWindow<'a> {
    /// 1-based position in the manifest.
    pub sequence: u32,
    /// Ordinal printed in the document, when the strategy captures it.
    pub ordinal: Option<u32>,
    /// Lines from the boundary up to (not including) the next boundary.
    pub lines: Vec<&'a str>,
    /// Index of the first field line within `lines`.
    pub start: usize,
}

/// A compiled segmentation strategy.
#[derive(Debug, Clone)]
pub enum Segmenter {
    /// Line scan for a status-confirmed marker.
    MarkerScan {
        /// Marker substring.
        marker: String,
        /// Accepted status lines.
        status_tokens: Vec<String>,
        /// Lines from marker to first field.
        header_skip: usize,
    },
    /// Regex split on an ordinal-capturing delimiter.
    DelimiterSplit {
        /// Compiled delimiter.
        pattern: Regex,
        /// Lines from delimiter to first field.
        header_skip: usize,
    },
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::MarkerScan {
            marker: DEFAULT_MARKER.to_owned(),
            status_tokens: default_status_tokens(),
            header_skip: DEFAULT_HEADER_SKIP,
        }
    }
}

impl Segmenter {
    /// Compiles `strategy`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Regex`] if the delimiter pattern does not
    /// compile, or [`ConfigError::Invalid`] if it does not have exactly one
    /// capture group.
    pub fn from_strategy(strategy: &SegmentationStrategy) -> Result<Self, ConfigError> {
        match strategy {
            SegmentationStrategy::MarkerScan {
                marker,
                status_tokens,
                header_skip,
            } => Ok(Self::MarkerScan {
                marker: marker.clone(),
                status_tokens: status_tokens.clone(),
                header_skip: *header_skip,
            }),
            SegmentationStrategy::DelimiterSplit {
                pattern,
                header_skip,
            } => {
                let pattern = Regex::new(pattern)?;
                if pattern.captures_len() != 2 {
                    return Err(ConfigError::Invalid {
                        message: format!(
                            "delimiter pattern must have exactly one capture group, found {}",
                            pattern.captures_len() - 1
                        ),
                    });
                }
                Ok(Self::DelimiterSplit {
                    pattern,
                    header_skip: *header_skip,
                })
            }
        }
    }

    /// Cuts the manifest into package windows, in document order.
    #[must_use]
    pub fn segment<'a>(&self, text: &'a str, lines: &[&'a str]) -> Vec<PackageWindow<'a>> {
        match self {
            Self::MarkerScan {
                marker,
                status_tokens,
                header_skip,
            } => marker_scan(lines, marker, status_tokens, *header_skip),
            Self::DelimiterSplit {
                pattern,
                header_skip,
            } => delimiter_split(text, pattern, *header_skip),
        }
    }
}

/// Returns the indices of every marker line confirmed by a status line.
#[must_use]
pub fn confirmed_markers(lines: &[&str], marker: &str, status_tokens: &[String]) -> Vec<usize> {
    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| line.contains(marker))
        .filter_map(|(i, _)| {
            let status = lines.get(i + 1).copied().unwrap_or_default();
            if status_tokens.iter().any(|t| t == status) {
                Some(i)
            } else {
                log::warn!("Ignoring marker on line {i}: next line {status:?} is not a status");
                None
            }
        })
        .collect()
}

fn sequence_number(index: usize) -> u32 {
    u32::try_from(index + 1).unwrap_or(u32::MAX)
}

/// Marker-scan segmentation over tokenized lines.
#[must_use]
pub fn marker_scan<'a>(
    lines: &[&'a str],
    marker: &str,
    status_tokens: &[String],
    header_skip: usize,
) -> Vec<PackageWindow<'a>> {
    let starts = confirmed_markers(lines, marker, status_tokens);

    starts
        .iter()
        .enumerate()
        .map(|(k, &start)| {
            let end = starts.get(k + 1).copied().unwrap_or(lines.len());
            PackageWindow {
                sequence: sequence_number(k),
                ordinal: None,
                lines: lines[start..end].to_vec(),
                start: header_skip,
            }
        })
        .collect()
}

/// Delimiter-split segmentation over the raw text.
///
/// Text before the first delimiter belongs to the manifest header and is
/// not part of any package.
#[must_use]
pub fn delimiter_split<'a>(
    text: &'a str,
    pattern: &Regex,
    header_skip: usize,
) -> Vec<PackageWindow<'a>> {
    let hits: Vec<(usize, usize, Option<u32>)> = pattern
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let ordinal = caps.get(1).and_then(|m| m.as_str().parse().ok());
            Some((whole.start(), whole.end(), ordinal))
        })
        .collect();

    hits.iter()
        .enumerate()
        .map(|(k, &(_, body_start, ordinal))| {
            let body_end = hits.get(k + 1).map_or(text.len(), |&(next, _, _)| next);
            let sequence = sequence_number(k);
            if ordinal != Some(sequence) {
                log::warn!("Package {sequence}: document ordinal is {ordinal:?}");
            }
            PackageWindow {
                sequence,
                ordinal,
                lines: tokenize(&text[body_start..body_end]),
                start: header_skip,
            }
        })
        .collect()
}
