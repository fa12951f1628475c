//! SBOM format parsers.
//!
//! Input flows through a fixed pipeline: the [`Sniffer`] detects the
//! (spec, encoding, version) triple, [`parser_for`] picks the spec parser,
//! the parser adapts the spec-native structures into a
//! [`Document`], and the schema validator's verdict is attached to it.
//!
//! ## Usage
//!
//! ```no_run
//! use sbom_score::parsers::{detect, parse_sbom};
//! use std::path::Path;
//!
//! let doc = parse_sbom(Path::new("sbom.json")).unwrap();
//! println!("{} components", doc.components().len());
//!
//! let bytes = std::fs::read("sbom.json").unwrap();
//! println!("Detected: {}", detect(&bytes));
//! ```

mod common;
mod cyclonedx;
mod detection;
mod entity;
mod spdx;
mod spdx3;
mod traits;

pub use cyclonedx::CycloneDxParser;
pub use detection::{FormatTriple, Sniffer};
pub use entity::{parse_entities, parse_entity, split_tool, Entity};
pub use spdx::SpdxParser;
pub use spdx3::Spdx3Parser;
pub use traits::SbomParser;

use crate::error::{ErrorContext, Result, SbomScoreError};
use crate::model::{Document, FileFormat, SpecFormat};
use crate::validation::{BuiltinSchemaValidator, SchemaValidator};
use std::io::{Read, Seek};
use std::path::Path;

/// Maximum SBOM file size (512 MB); the whole document is buffered before parsing
pub const MAX_SBOM_FILE_SIZE: u64 = 512 * 1024 * 1024;

/// Detect the format triple of a buffered document
#[must_use]
pub fn detect(bytes: &[u8]) -> FormatTriple {
    Sniffer::new().detect(bytes)
}

/// Parser responsible for a detected format, if any
#[must_use]
pub fn parser_for(format: &FormatTriple) -> Option<Box<dyn SbomParser>> {
    match (format.spec, format.file_format) {
        (SpecFormat::Spdx, FileFormat::JsonLd) => Some(Box::new(Spdx3Parser::new())),
        (SpecFormat::Spdx, _) => Some(Box::new(SpdxParser::new())),
        (SpecFormat::CycloneDx, _) => Some(Box::new(CycloneDxParser::new())),
        (SpecFormat::Unknown, _) => None,
    }
}

/// Detect and parse a buffered document with the built-in schema validator
pub fn parse_bytes(bytes: &[u8]) -> Result<Document> {
    parse_bytes_with(bytes, &BuiltinSchemaValidator::new())
}

/// Detect and parse a buffered document with a caller-supplied schema validator
///
/// Detection failure is fatal: no best-guess parse is attempted. Once a
/// format is matched, a decode failure is reported against that format and
/// no other format is tried.
pub fn parse_bytes_with(bytes: &[u8], validator: &dyn SchemaValidator) -> Result<Document> {
    crate::licenses::init();

    let format = detect(bytes);
    let parser = parser_for(&format).ok_or_else(SbomScoreError::unrecognized_input)?;
    parser.ensure_supported(&format)?;

    let doc = parser.parse_bytes(bytes, &format)?;

    let outcome = validator.validate(format.spec, format.file_format, &format.version, bytes);
    if !outcome.valid {
        tracing::warn!(
            format = %format,
            errors = outcome.logs.len(),
            "document failed schema validation"
        );
    }

    tracing::debug!(
        format = %format,
        components = doc.components().len(),
        relationships = doc.relationships().len(),
        "parsed SBOM"
    );
    Ok(doc.with_schema_outcome(outcome.valid, outcome.logs))
}

/// Rewind and buffer a seekable reader, then detect and parse it
pub fn parse_reader<R: Read + Seek>(reader: &mut R) -> Result<Document> {
    let (bytes, _) = Sniffer::new()
        .detect_reader(reader)
        .context("reading SBOM input")?;
    parse_bytes(&bytes)
}

/// Detect SBOM format from file content and parse accordingly
///
/// Returns an error if the file exceeds [`MAX_SBOM_FILE_SIZE`].
pub fn parse_sbom(path: &Path) -> Result<Document> {
    let metadata = std::fs::metadata(path).map_err(|e| SbomScoreError::io(path, e))?;
    if metadata.len() > MAX_SBOM_FILE_SIZE {
        return Err(SbomScoreError::validation(format!(
            "SBOM file {} is {} MB, exceeding the {} MB limit",
            path.display(),
            metadata.len() / (1024 * 1024),
            MAX_SBOM_FILE_SIZE / (1024 * 1024),
        )));
    }
    let bytes = std::fs::read(path).map_err(|e| SbomScoreError::io(path, e))?;
    parse_bytes(&bytes).map_err(|err| match err {
        SbomScoreError::Parse {
            source: crate::error::ParseErrorKind::UnknownFormat,
            ..
        } => SbomScoreError::unknown_format(path.display().to_string()),
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseErrorKind;
    use crate::validation::{NoopSchemaValidator, SchemaOutcome};
    use std::io::Cursor;

    const CDX: &str = r#"{"bomFormat": "CycloneDX", "specVersion": "1.5", "version": 1,
        "metadata": {"component": {"type": "application", "name": "app", "bom-ref": "app"}},
        "components": [{"type": "library", "name": "lib", "version": "1.0", "bom-ref": "lib"}],
        "dependencies": [{"ref": "app", "dependsOn": ["lib"]}]}"#;

    #[test]
    fn test_parser_for_each_spec() {
        let spdx3 = FormatTriple::new(SpecFormat::Spdx, FileFormat::JsonLd, "3.0.1");
        assert_eq!(parser_for(&spdx3).map(|p| p.format_name()), Some("SPDX 3"));

        let spdx = FormatTriple::new(SpecFormat::Spdx, FileFormat::TagValue, "2.3");
        assert_eq!(parser_for(&spdx).map(|p| p.format_name()), Some("SPDX"));

        let cdx = FormatTriple::new(SpecFormat::CycloneDx, FileFormat::Xml, "1.6");
        assert_eq!(parser_for(&cdx).map(|p| p.format_name()), Some("CycloneDX"));

        assert!(parser_for(&FormatTriple::unknown()).is_none());
    }

    #[test]
    fn test_parse_bytes_cyclonedx() {
        let doc = parse_bytes(CDX.as_bytes()).expect("parse");
        assert_eq!(doc.spec().spec_type, SpecFormat::CycloneDx);
        assert_eq!(doc.components().len(), 2);
        assert_eq!(doc.primary_component_id(), Some("app"));
        assert!(doc.schema_valid());
    }

    #[test]
    fn test_unknown_format_is_fatal() {
        match parse_bytes(b"not an sbom") {
            Err(SbomScoreError::Parse {
                source: ParseErrorKind::UnknownFormat,
                ..
            }) => {}
            other => panic!("expected UnknownFormat, got {other:?}"),
        }
        let err = parse_bytes(b"not an sbom").expect_err("unknown");
        assert_eq!(
            err.to_string(),
            "Failed to parse SBOM: unsupported or unrecognized SBOM format"
        );
    }

    #[test]
    fn test_missing_spdx_version_parses_without_required_fields() {
        let json = r#"{"dataLicense": "CC0-1.0", "SPDXID": "SPDXRef-DOCUMENT",
            "name": "demo", "documentNamespace": "https://example.com/demo",
            "creationInfo": {"created": "2024-01-01T00:00:00Z", "creators": ["Tool: gen-1.0"]},
            "packages": [{"SPDXID": "SPDXRef-Package-a", "name": "a",
                          "downloadLocation": "NOASSERTION", "filesAnalyzed": false}]}"#;
        let doc = parse_bytes(json.as_bytes()).expect("missing version is not fatal");
        assert_eq!(doc.spec().spec_type, SpecFormat::Spdx);
        assert_eq!(doc.spec().version, "");
        assert!(!doc.spec().required_fields);
        assert!(doc.logs().iter().any(|l| l.contains("SPDXVersion")));
        assert_eq!(doc.components().len(), 1);
    }

    #[test]
    fn test_missing_cyclonedx_spec_version_parses_without_required_fields() {
        let json = r#"{"bomFormat": "CycloneDX", "version": 1,
            "components": [{"type": "library", "name": "lib", "bom-ref": "lib"}]}"#;
        let doc = parse_bytes(json.as_bytes()).expect("missing specVersion is not fatal");
        assert_eq!(doc.spec().spec_type, SpecFormat::CycloneDx);
        assert!(!doc.spec().required_fields);
        assert!(doc.logs().iter().any(|l| l.contains("specVersion")));
        assert_eq!(doc.components().len(), 1);
    }

    #[test]
    fn test_unsupported_version() {
        let err = parse_bytes(br#"{"bomFormat": "CycloneDX", "specVersion": "2.0"}"#)
            .expect_err("2.0 is not a CycloneDX version");
        assert!(matches!(
            err,
            SbomScoreError::Parse {
                source: ParseErrorKind::UnsupportedVersion { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_validator_outcome_attached() {
        struct Rejecting;
        impl SchemaValidator for Rejecting {
            fn validate(&self, _: SpecFormat, _: FileFormat, _: &str, _: &[u8]) -> SchemaOutcome {
                SchemaOutcome::failed(vec!["rejected".to_string()])
            }
        }

        let doc = parse_bytes_with(CDX.as_bytes(), &Rejecting).expect("parse");
        assert!(!doc.schema_valid());
        assert_eq!(doc.schema_logs(), ["rejected"]);

        let doc = parse_bytes_with(CDX.as_bytes(), &NoopSchemaValidator).expect("parse");
        assert!(doc.schema_valid());
    }

    #[test]
    fn test_parse_reader_rewinds() {
        let mut cursor = Cursor::new(CDX.as_bytes().to_vec());
        cursor.set_position(20);
        let doc = parse_reader(&mut cursor).expect("parse");
        assert_eq!(doc.components().len(), 2);
    }

    #[test]
    fn test_parse_sbom_missing_file() {
        let err = parse_sbom(Path::new("/nonexistent/sbom.json")).expect_err("missing");
        assert!(matches!(err, SbomScoreError::Io { .. }));
    }
}
