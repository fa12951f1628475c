//! SPDX 2.x parser.
//!
//! Supports SPDX 2.1, 2.2 and 2.3 in JSON, YAML, tag-value and RDF/XML.
//! Every encoding is first decoded into the same native structures in
//! [`model`], then adapted into the unified [`Document`] by [`convert`].

mod convert;
pub(crate) mod model;
mod rdf;
mod tagvalue;

use crate::error::{ErrorContext, ParseErrorKind, Result, SbomScoreError};
use crate::model::{Document, FileFormat, SpecFormat};
use crate::parsers::detection::FormatTriple;
use crate::parsers::traits::SbomParser;
use model::SpdxDocument;

/// Parser for SPDX 2.x documents
#[derive(Debug, Default, Clone, Copy)]
pub struct SpdxParser;

impl SpdxParser {
    /// Create a new SPDX parser
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn decode(&self, bytes: &[u8], file_format: FileFormat) -> Result<SpdxDocument> {
        match file_format {
            FileFormat::Json => serde_json::from_slice(bytes).context("SPDX JSON"),
            FileFormat::Yaml => serde_yaml::from_slice(bytes).context("SPDX YAML"),
            FileFormat::TagValue => {
                let text = String::from_utf8_lossy(bytes);
                tagvalue::parse(&text)
            }
            FileFormat::Rdf => rdf::parse(bytes),
            other => Err(SbomScoreError::parse(
                format!("SPDX {other}"),
                ParseErrorKind::UnknownFormat,
            )),
        }
    }
}

impl SbomParser for SpdxParser {
    fn spec(&self) -> SpecFormat {
        SpecFormat::Spdx
    }

    fn format_name(&self) -> &'static str {
        "SPDX"
    }

    fn supported_versions(&self) -> &'static [&'static str] {
        &["2.1", "2.2", "2.3"]
    }

    fn parse_bytes(&self, bytes: &[u8], format: &FormatTriple) -> Result<Document> {
        let native = self.decode(bytes, format.file_format)?;
        tracing::debug!(
            packages = native.packages.len(),
            relationships = native.relationships.len(),
            "decoded SPDX document"
        );
        Ok(convert::convert(native, format))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL_JSON: &str = r#"{
        "spdxVersion": "SPDX-2.3",
        "dataLicense": "CC0-1.0",
        "SPDXID": "SPDXRef-DOCUMENT",
        "name": "minimal",
        "documentNamespace": "https://example.com/minimal",
        "creationInfo": {"created": "2023-01-01T00:00:00Z", "creators": ["Tool: gen-1.0"]},
        "packages": [{
            "SPDXID": "SPDXRef-pkg",
            "name": "pkg",
            "downloadLocation": "NOASSERTION",
            "filesAnalyzed": false
        }],
        "relationships": [{
            "spdxElementId": "SPDXRef-DOCUMENT",
            "relationshipType": "DESCRIBES",
            "relatedSpdxElement": "SPDXRef-pkg"
        }]
    }"#;

    #[test]
    fn test_parse_json() {
        let triple = FormatTriple::new(SpecFormat::Spdx, FileFormat::Json, "2.3");
        let doc = SpdxParser::new()
            .parse_bytes(MINIMAL_JSON.as_bytes(), &triple)
            .expect("valid document");
        assert_eq!(doc.components().len(), 1);
        assert_eq!(doc.primary_component_id(), Some("SPDXRef-pkg"));
        assert!(doc.spec().required_fields);
    }

    #[test]
    fn test_malformed_json_names_the_guess() {
        let triple = FormatTriple::new(SpecFormat::Spdx, FileFormat::Json, "2.3");
        let err = SpdxParser::new()
            .parse_bytes(b"{\"spdxVersion\": ", &triple)
            .unwrap_err();
        assert!(err.to_string().contains("SPDX JSON"));
    }

    #[test]
    fn test_unsupported_version() {
        let triple = FormatTriple::new(SpecFormat::Spdx, FileFormat::Json, "2.0");
        assert!(SpdxParser::new().ensure_supported(&triple).is_err());
        let triple = FormatTriple::new(SpecFormat::Spdx, FileFormat::Json, "2.3");
        assert!(SpdxParser::new().ensure_supported(&triple).is_ok());
    }
}
