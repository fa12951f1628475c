//! CycloneDX SBOM parser.
//!
//! Supports CycloneDX 1.0 through 1.6 in JSON and XML formats.

mod convert;
mod model;
mod signature;
mod xml;

use crate::error::{ErrorContext, ParseErrorKind, Result, SbomScoreError};
use crate::model::{Document, FileFormat, SpecFormat};
use crate::parsers::detection::FormatTriple;
use crate::parsers::traits::SbomParser;
use model::CdxBom;
use serde_json::Value;

/// Parser for CycloneDX SBOM format
#[derive(Debug, Default, Clone, Copy)]
pub struct CycloneDxParser;

impl CycloneDxParser {
    /// Create a new CycloneDX parser
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Parse a CycloneDX BOM from JSON
    ///
    /// The raw value is kept for signature extraction, which the structured
    /// decode does not cover.
    fn parse_json(&self, bytes: &[u8], format: &FormatTriple) -> Result<Document> {
        let raw: Value = serde_json::from_slice(bytes).context("CycloneDX JSON")?;
        let bom: CdxBom = serde_json::from_value(raw.clone()).context("CycloneDX JSON")?;
        Ok(convert::convert(bom, Some(&raw), format))
    }

    /// Parse a CycloneDX BOM from XML
    fn parse_xml(&self, bytes: &[u8], format: &FormatTriple) -> Result<Document> {
        let bom = xml::parse(bytes)?;
        Ok(convert::convert(bom, None, format))
    }
}

impl SbomParser for CycloneDxParser {
    fn spec(&self) -> SpecFormat {
        SpecFormat::CycloneDx
    }

    fn format_name(&self) -> &'static str {
        "CycloneDX"
    }

    fn parse_bytes(&self, bytes: &[u8], format: &FormatTriple) -> Result<Document> {
        match format.file_format {
            FileFormat::Json => self.parse_json(bytes, format),
            FileFormat::Xml => self.parse_xml(bytes, format),
            other => Err(SbomScoreError::parse(
                format!("CycloneDX {other}"),
                ParseErrorKind::UnknownFormat,
            )),
        }
    }
}
