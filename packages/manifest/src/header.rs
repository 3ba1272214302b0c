//! Manifest header extraction.
//!
//! Each [`HeaderField`] has exactly one anchor. Fields are looked up
//! independently of each other and of package extraction: a missing anchor
//! leaves that field `None` and nothing else changes. The first acceptable
//! hit in line order wins.

use std::sync::LazyLock;

use dc_receiving_manifest_models::{HeaderField, ManifestHeader};
use regex::Regex;

static MANIFEST_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Manifest No\.\s+(\d+)").expect("valid regex"));

static DATE_CREATED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"Date Created\s*:?\s*(\d{1,2}/\d{1,2}/\d{4}(?:\s+\d{1,2}:\d{2}(?::\d{2})?(?:\s*[AaPp][Mm])?)?)",
    )
    .expect("valid regex")
});

static ORIGIN_LICENSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Originating License (?:No\.?|Number|#)\s*:?\s*([A-Za-z0-9][A-Za-z0-9\-]*)")
        .expect("valid regex")
});

static DESTINATION_LICENSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Destination License (?:No\.?|Number|#)\s*:?\s*([A-Za-z0-9][A-Za-z0-9\-]*)")
        .expect("valid regex")
});

/// How a header field is located in the line sequence.
#[derive(Debug, Clone, Copy)]
pub enum Anchor {
    /// The value is the line right after a line containing `label`. Only
    /// accepted when it is non-empty and starts with an uppercase letter.
    NextLine {
        /// Label substring.
        label: &'static str,
    },
    /// A regex anchored on the label captures the value on the same line.
    Inline {
        /// Pattern with the value in capture group 1.
        pattern: &'static LazyLock<Regex>,
    },
}

/// Returns the anchor used for `field`.
#[must_use]
pub fn anchor(field: HeaderField) -> Anchor {
    match field {
        HeaderField::ManifestNumber => Anchor::Inline {
            pattern: &MANIFEST_NUMBER_RE,
        },
        HeaderField::DateCreated => Anchor::Inline {
            pattern: &DATE_CREATED_RE,
        },
        HeaderField::OriginName => Anchor::NextLine {
            label: "Originating Entity",
        },
        HeaderField::OriginLicense => Anchor::Inline {
            pattern: &ORIGIN_LICENSE_RE,
        },
        HeaderField::DestinationName => Anchor::NextLine {
            label: "Destination",
        },
        HeaderField::DestinationLicense => Anchor::Inline {
            pattern: &DESTINATION_LICENSE_RE,
        },
    }
}

/// Finds the value for a label-then-next-line anchor.
#[must_use]
pub fn find_next_line_value(lines: &[&str], label: &str) -> Option<String> {
    lines.iter().enumerate().find_map(|(i, line)| {
        if !line.contains(label) {
            return None;
        }
        let next = lines.get(i + 1)?;
        next.chars()
            .next()
            .is_some_and(char::is_uppercase)
            .then(|| (*next).to_owned())
    })
}

/// Finds the value for an inline regex anchor.
#[must_use]
pub fn find_inline_value(lines: &[&str], pattern: &Regex) -> Option<String> {
    lines.iter().find_map(|line| {
        pattern
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_owned())
            .filter(|v| !v.is_empty())
    })
}

/// Extracts a single header field.
#[must_use]
pub fn extract_field(lines: &[&str], field: HeaderField) -> Option<String> {
    match anchor(field) {
        Anchor::NextLine { label } => find_next_line_value(lines, label),
        Anchor::Inline { pattern } => find_inline_value(lines, pattern),
    }
}

/// Extracts every header field from the tokenized manifest.
#[must_use]
pub fn extract_header(lines: &[&str]) -> ManifestHeader {
    let header = HeaderField::ALL
        .iter()
        .fold(ManifestHeader::default(), |header, &field| {
            let value = extract_field(lines, field);
            if value.is_none() {
                log::debug!("Header field {field} not found");
            }
            header.with(field, value)
        });

    log::debug!(
        "Recovered {}/{} header fields",
        header.found_count(),
        HeaderField::ALL.len()
    );

    header
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lines::tokenize;

    const HEADER_TEXT: &str = "\
Manifest No.   123456
Date Created 11/18/2025 02:15 PM
Originating Entity
Emerald Farms LLC
Originating License No. C11-0000123-LIC
Destination
Green Leaf Distribution
Destination License No. C11-0000456-LIC
";

    #[test]
    fn extracts_manifest_number() {
        let lines = tokenize("Manifest No.   123456");
        assert_eq!(
            extract_field(&lines, HeaderField::ManifestNumber).as_deref(),
            Some("123456")
        );
    }

    #[test]
    fn extracts_full_header() {
        let lines = tokenize(HEADER_TEXT);
        let header = extract_header(&lines);
        assert_eq!(header.manifest_number.as_deref(), Some("123456"));
        assert_eq!(header.date_created.as_deref(), Some("11/18/2025 02:15 PM"));
        assert_eq!(header.origin_name.as_deref(), Some("Emerald Farms LLC"));
        assert_eq!(header.origin_license.as_deref(), Some("C11-0000123-LIC"));
        assert_eq!(
            header.destination_name.as_deref(),
            Some("Green Leaf Distribution")
        );
        assert_eq!(
            header.destination_license.as_deref(),
            Some("C11-0000456-LIC")
        );
    }

    #[test]
    fn next_line_rejects_blank_and_lowercase_values() {
        let lines = tokenize("Destination\n\nfoo\nDestination\nlowercase co\n");
        assert_eq!(find_next_line_value(&lines, "Destination"), None);
    }

    #[test]
    fn next_line_keeps_scanning_after_rejected_hit() {
        let lines = tokenize("Destination\n\nDestination\nAcme Retail");
        assert_eq!(
            find_next_line_value(&lines, "Destination").as_deref(),
            Some("Acme Retail")
        );
    }

    #[test]
    fn next_line_label_on_last_line_is_absent() {
        let lines = tokenize("Some text\nDestination");
        assert_eq!(find_next_line_value(&lines, "Destination"), None);
    }

    #[test]
    fn first_match_wins() {
        let lines = tokenize("Manifest No. 111\nManifest No. 222");
        assert_eq!(
            extract_field(&lines, HeaderField::ManifestNumber).as_deref(),
            Some("111")
        );
    }

    #[test]
    fn inline_value_must_share_the_label_line() {
        let lines = tokenize("Manifest No.\n123456");
        assert_eq!(extract_field(&lines, HeaderField::ManifestNumber), None);
    }

    #[test]
    fn missing_fields_do_not_block_others() {
        let lines = tokenize("nothing here\nDestination License No. ABC-9");
        let header = extract_header(&lines);
        assert_eq!(header.manifest_number, None);
        assert_eq!(header.destination_license.as_deref(), Some("ABC-9"));
        assert_eq!(header.found_count(), 1);
    }

    #[test]
    fn empty_input_yields_empty_header() {
        assert!(extract_header(&tokenize("")).is_empty());
    }
}
