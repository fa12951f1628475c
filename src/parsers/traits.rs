//! Parser trait definitions.
//!
//! Each spec family implements [`SbomParser`]; the sniffer picks the parser
//! and hands it the already-buffered bytes together with the detected
//! [`FormatTriple`].

use super::detection::FormatTriple;
use crate::error::{Result, SbomScoreError};
use crate::model::{Document, SpecFormat};

/// Trait for spec-family parsers
///
/// Parsing is a pure function of the input bytes: implementors build a fresh
/// [`Document`] and never keep state between calls.
pub trait SbomParser: Send + Sync {
    /// Spec family handled by this parser
    fn spec(&self) -> SpecFormat;

    /// Human-readable name used in error context
    fn format_name(&self) -> &'static str;

    /// Get supported format versions
    fn supported_versions(&self) -> &'static [&'static str] {
        self.spec().supported_versions()
    }

    /// Parse the buffered document previously detected as `format`
    fn parse_bytes(&self, bytes: &[u8], format: &FormatTriple) -> Result<Document>;

    /// Check that the detected version is one this parser knows
    ///
    /// An absent version is accepted; the adapter records it as a missing
    /// required field instead.
    fn ensure_supported(&self, format: &FormatTriple) -> Result<()> {
        let version = format.version.trim();
        let known = version.is_empty()
            || self
                .supported_versions()
                .iter()
                .any(|v| *v == version || version.starts_with(&format!("{v}.")));
        if known {
            Ok(())
        } else {
            Err(SbomScoreError::unsupported_version(
                self.format_name(),
                version,
                self.supported_versions(),
            ))
        }
    }
}
