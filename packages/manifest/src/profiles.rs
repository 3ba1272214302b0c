//! Built-in extraction profiles.
//!
//! Each `.toml` file in `packages/manifest/profiles/` is baked into the
//! binary at compile time via [`include_str!`]. Supporting another export
//! layout means adding a TOML file and listing it below.

use crate::ConfigError;
use crate::config::ExtractionConfig;

/// TOML profiles embedded at compile time.
const PROFILE_TOMLS: &[(&str, &str)] = &[
    (
        "metrc_marker_scan",
        include_str!("../profiles/metrc_marker_scan.toml"),
    ),
    (
        "metrc_comma_names",
        include_str!("../profiles/metrc_comma_names.toml"),
    ),
    (
        "metrc_delimiter_split",
        include_str!("../profiles/metrc_delimiter_split.toml"),
    ),
];

#[cfg(test)]
const EXPECTED_PROFILE_COUNT: usize = 3;

/// Returns every built-in profile.
///
/// # Panics
///
/// Panics if an embedded TOML profile is malformed (a build-time mistake,
/// covered by the tests below).
#[must_use]
pub fn builtin_profiles() -> Vec<ExtractionConfig> {
    PROFILE_TOMLS
        .iter()
        .map(|(name, toml_str)| {
            ExtractionConfig::from_toml_str(toml_str)
                .unwrap_or_else(|e| panic!("Failed to parse profile {name}.toml: {e}"))
        })
        .collect()
}

/// Looks up a built-in profile by id.
///
/// # Errors
///
/// Returns [`ConfigError::UnknownProfile`] if no profile has that id.
pub fn profile(id: &str) -> Result<ExtractionConfig, ConfigError> {
    builtin_profiles()
        .into_iter()
        .find(|p| p.id == id)
        .ok_or_else(|| ConfigError::UnknownProfile {
            name: id.to_owned(),
        })
}
