#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Manifest document to text conversion.
//!
//! Manifests arrive either as the PDF printed by the state traceability
//! system or as a text dump that was already extracted. PDFs go through
//! pure-Rust text extraction ([`pdf_extract`]); anything else is read as
//! UTF-8 text. Either way the result is one newline-delimited string with
//! pages in document order, ready for `dc_receiving_manifest`.

use std::path::Path;

use strum_macros::{AsRefStr, Display};

/// Errors specific to manifest text extraction.
#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// PDF text extraction failed.
    #[error("PDF extraction error: {0}")]
    Extraction(String),

    /// The path cannot be read as a manifest.
    #[error("Unsupported input: {path}")]
    UnsupportedInput {
        /// Offending path.
        path: String,
    },
}

/// How a manifest file is turned into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum InputFormat {
    /// A PDF document.
    Pdf,
    /// Already-extracted text.
    Text,
}

impl InputFormat {
    /// Picks the format from the file extension (case-insensitive).
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("pdf") => Self::Pdf,
            _ => Self::Text,
        }
    }
}

/// Replaces page breaks with newlines and unifies line endings.
#[must_use]
pub fn normalize_text(text: &str) -> String {
    text.replace("\r\n", "\n").replace(['\u{c}', '\r'], "\n")
}

/// Extracts the text of an in-memory PDF.
///
/// # Errors
///
/// Returns [`PdfError::Extraction`] if the bytes are not a readable PDF.
pub fn extract_text_from_mem(bytes: &[u8]) -> Result<String, PdfError> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| PdfError::Extraction(format!("failed to extract text from PDF: {e}")))?;

    log::debug!(
        "Extracted {} characters of text from {} bytes",
        text.len(),
        bytes.len()
    );

    Ok(normalize_text(&text))
}

/// Reads a PDF from disk and extracts its text.
///
/// # Errors
///
/// Returns [`PdfError::Io`] if the file cannot be read, or
/// [`PdfError::Extraction`] if it is not a readable PDF.
pub fn extract_text_from_path(path: &Path) -> Result<String, PdfError> {
    let bytes = std::fs::read(path)?;
    log::debug!("Read {} bytes from {}", bytes.len(), path.display());
    extract_text_from_mem(&bytes)
}

/// Reads a manifest file as text, extracting it first if it is a PDF.
///
/// # Errors
///
/// Returns [`PdfError::UnsupportedInput`] if `path` is a directory,
/// otherwise as [`extract_text_from_path`] or [`std::fs::read_to_string`].
pub fn read_manifest_text(path: &Path) -> Result<String, PdfError> {
    if path.is_dir() {
        return Err(PdfError::UnsupportedInput {
            path: path.display().to_string(),
        });
    }

    let format = InputFormat::from_path(path);
    log::info!("Reading {} as {format}", path.display());

    match format {
        InputFormat::Pdf => extract_text_from_path(path),
        InputFormat::Text => Ok(normalize_text(&std::fs::read_to_string(path)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_format_from_extension() {
        assert_eq!(InputFormat::from_path(Path::new("m.pdf")), InputFormat::Pdf);
        assert_eq!(InputFormat::from_path(Path::new("M.PDF")), InputFormat::Pdf);
        assert_eq!(InputFormat::from_path(Path::new("m.txt")), InputFormat::Text);
        assert_eq!(InputFormat::from_path(Path::new("manifest")), InputFormat::Text);
    }

    #[test]
    fn normalizes_page_breaks_and_line_endings() {
        assert_eq!(normalize_text("a\r\nb\u{c}c\rd"), "a\nb\nc\nd");
    }

    #[test]
    fn garbage_bytes_are_an_extraction_error() {
        assert!(matches!(
            extract_text_from_mem(b"not a pdf"),
            Err(PdfError::Extraction(_))
        ));
    }

    #[test]
    fn reads_text_dump() {
        let path = std::env::temp_dir().join("dc_receiving_pdf_reads_text_dump.txt");
        std::fs::write(&path, "Manifest No. 1\r\nShp: 4 ea").unwrap();
        let text = read_manifest_text(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(text, "Manifest No. 1\nShp: 4 ea");
    }

    #[test]
    fn directory_is_unsupported() {
        assert!(matches!(
            read_manifest_text(&std::env::temp_dir()),
            Err(PdfError::UnsupportedInput { .. })
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            read_manifest_text(Path::new("/nonexistent/dc_receiving/manifest.txt")),
            Err(PdfError::Io(_))
        ));
    }
}
