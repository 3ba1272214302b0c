//! Item name cleaning heuristics.
//!
//! Raw item names often carry supplier or category boilerplate:
//! - After a comma: `"Blue Dream (BDR), CAPNA, INC."`
//! - As a trailing nested annotation: `"Side Hustle (Flower) (Vape Cartridge (weight - each))"`
//! - As a trailing simple annotation: `"Gummies (Edible)"`
//!
//! Parentheses that are part of the product name (`"(Flower)"`, `"(BDR)"`)
//! must survive, so a simple trailing group is only removed when it names a
//! category keyword.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::{KeywordMatch, NameCleaning};

/// Trailing ` (outer (inner))` annotation.
static NESTED_CATEGORY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+\([^()]*\([^()]*\)\s*\)$").expect("valid regex"));

/// Trailing ` (content)` annotation, capturing the content.
static SIMPLE_CATEGORY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+\(([^()]*)\)$").expect("valid regex"));

/// Drops the first comma and everything after it.
#[must_use]
pub fn truncate_at_comma(name: &str) -> String {
    name.split_once(',')
        .map_or(name, |(head, _)| head)
        .trim()
        .to_string()
}

/// Returns `true` if `content` names one of `keywords` under `matching`.
fn names_category(content: &str, keywords: &[String], matching: KeywordMatch) -> bool {
    let content = content.to_lowercase();
    keywords.iter().map(|k| k.to_lowercase()).any(|k| match matching {
        KeywordMatch::Substring => content.contains(&k),
        KeywordMatch::WordStart => content
            .split(|c: char| !c.is_alphanumeric())
            .any(|word| word.starts_with(&k)),
    })
}

/// Removes one trailing category annotation, if present.
///
/// A nested annotation is always removed. A simple one is removed only when
/// its content names one of `keywords`.
#[must_use]
pub fn strip_category_once(
    name: &str,
    keywords: &[String],
    matching: KeywordMatch,
) -> Option<String> {
    if let Some(m) = NESTED_CATEGORY_RE.find(name) {
        return Some(name[..m.start()].trim_end().to_string());
    }

    let caps = SIMPLE_CATEGORY_RE.captures(name)?;
    let whole = caps.get(0)?;
    names_category(caps.get(1)?.as_str(), keywords, matching)
        .then(|| name[..whole.start()].trim_end().to_string())
}

/// Removes trailing category annotations until none is left.
#[must_use]
pub fn strip_category(name: &str, keywords: &[String], matching: KeywordMatch) -> String {
    let mut current = name.trim().to_string();
    while let Some(next) = strip_category_once(&current, keywords, matching) {
        current = next;
    }
    current
}

impl NameCleaning {
    /// Cleans `raw` with this heuristic.
    ///
    /// Falls back to the trimmed raw name when cleaning would leave nothing.
    #[must_use]
    pub fn apply(&self, raw: &str) -> String {
        let cleaned = match self {
            Self::Keep => raw.trim().to_string(),
            Self::CommaTruncate => truncate_at_comma(raw),
            Self::StripCategory { keywords, matching } => strip_category(raw, keywords, *matching),
        };

        if cleaned.is_empty() {
            raw.trim().to_string()
        } else {
            cleaned
        }
    }
}
