//! SPDX 2 tag-value reader.
//!
//! Each line is `Tag: value`. Values wrapped in `<text>...</text>` may span
//! lines. Document tags come first; `PackageName` opens a package section
//! and `FileName`/`SnippetSPDXID` open sections whose tags are skipped.
//! `LicenseID` opens an extracted-license section.

use super::model::{
    SpdxChecksum, SpdxCreationInfo, SpdxDocument, SpdxExternalDocumentRef, SpdxExternalRef,
    SpdxExtractedLicense, SpdxPackage, SpdxRelationship, SpdxVerificationCode,
};
use crate::error::{ParseErrorKind, Result, SbomScoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Document,
    Package,
    File,
    License,
}

/// Parse tag-value text into the native SPDX structures
pub(crate) fn parse(text: &str) -> Result<SpdxDocument> {
    let mut doc = SpdxDocument::default();
    let mut section = Section::Document;
    let mut lines = text.lines().enumerate();

    while let Some((idx, raw)) = lines.next() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((tag, value)) = line.split_once(':') else {
            return Err(SbomScoreError::parse(
                "SPDX tag-value",
                ParseErrorKind::InvalidTagValue {
                    line: idx + 1,
                    message: format!("expected 'Tag: value', found '{line}'"),
                },
            ));
        };
        let tag = tag.trim();
        let mut value = value.trim().to_string();

        if let Some(rest) = value.strip_prefix("<text>") {
            value = read_text_block(rest, &mut lines, idx)?;
        }

        section = apply(&mut doc, section, tag, value);
    }
    Ok(doc)
}

/// Collect a `<text>` block that may continue over following lines
fn read_text_block<'a>(
    first: &str,
    lines: &mut impl Iterator<Item = (usize, &'a str)>,
    start: usize,
) -> Result<String> {
    if let Some(end) = first.find("</text>") {
        return Ok(first[..end].to_string());
    }
    let mut buf = first.to_string();
    for (_, raw) in lines.by_ref() {
        if let Some(end) = raw.find("</text>") {
            buf.push('\n');
            buf.push_str(&raw[..end]);
            return Ok(buf.trim().to_string());
        }
        buf.push('\n');
        buf.push_str(raw);
    }
    Err(SbomScoreError::parse(
        "SPDX tag-value",
        ParseErrorKind::InvalidTagValue {
            line: start + 1,
            message: "unterminated <text> block".to_string(),
        },
    ))
}

fn apply(doc: &mut SpdxDocument, section: Section, tag: &str, value: String) -> Section {
    match tag {
        "PackageName" => {
            doc.packages.push(SpdxPackage {
                name: Some(value),
                ..SpdxPackage::default()
            });
            return Section::Package;
        }
        "FileName" | "SnippetSPDXID" => return Section::File,
        "LicenseID" => {
            doc.has_extracted_licensing_infos.push(SpdxExtractedLicense {
                license_id: value,
                ..SpdxExtractedLicense::default()
            });
            return Section::License;
        }
        "Relationship" => {
            if let Some(rel) = parse_relationship(&value) {
                doc.relationships.push(rel);
            }
            return section;
        }
        _ => {}
    }

    match section {
        Section::Document => apply_document(doc, tag, value),
        Section::Package => {
            if let Some(pkg) = doc.packages.last_mut() {
                apply_package(pkg, tag, value);
            }
        }
        Section::License => {
            if let Some(lic) = doc.has_extracted_licensing_infos.last_mut() {
                match tag {
                    "LicenseName" => lic.name = Some(value),
                    "ExtractedText" => lic.extracted_text = Some(value),
                    _ => {}
                }
            }
        }
        Section::File => {}
    }
    section
}

fn apply_document(doc: &mut SpdxDocument, tag: &str, value: String) {
    match tag {
        "SPDXVersion" => doc.spdx_version = Some(value),
        "DataLicense" => doc.data_license = Some(value),
        "SPDXID" => doc.spdx_id = Some(value),
        "DocumentName" => doc.name = Some(value),
        "DocumentNamespace" => doc.document_namespace = Some(value),
        "DocumentComment" => doc.comment = Some(value),
        "ExternalDocumentRef" => {
            let mut parts = value.split_whitespace();
            if let (Some(id), Some(uri)) = (parts.next(), parts.next()) {
                doc.external_document_refs.push(SpdxExternalDocumentRef {
                    external_document_id: Some(id.to_string()),
                    spdx_document: uri.to_string(),
                });
            }
        }
        "Creator" => doc
            .creation_info
            .get_or_insert_with(SpdxCreationInfo::default)
            .creators
            .push(value),
        "Created" => doc.creation_info.get_or_insert_with(SpdxCreationInfo::default).created = Some(value),
        "CreatorComment" => doc.creation_info.get_or_insert_with(SpdxCreationInfo::default).comment = Some(value),
        "LicenseListVersion" => {
            doc.creation_info
                .get_or_insert_with(SpdxCreationInfo::default)
                .license_list_version = Some(value);
        }
        _ => {}
    }
}

fn apply_package(pkg: &mut SpdxPackage, tag: &str, value: String) {
    match tag {
        "SPDXID" => pkg.spdx_id = Some(value),
        "PackageVersion" => pkg.version_info = Some(value),
        "PackageSupplier" => pkg.supplier = Some(value),
        "PackageOriginator" => pkg.originator = Some(value),
        "PackageDownloadLocation" => pkg.download_location = Some(value),
        "FilesAnalyzed" => pkg.files_analyzed = Some(!value.eq_ignore_ascii_case("false")),
        "PackageVerificationCode" => {
            // `<hex> (excludes: ...)`
            let code = value.split_whitespace().next().unwrap_or_default().to_string();
            pkg.package_verification_code = Some(SpdxVerificationCode {
                package_verification_code_value: Some(code),
            });
        }
        "PackageChecksum" => {
            if let Some((alg, sum)) = value.split_once(':') {
                pkg.checksums.push(SpdxChecksum {
                    algorithm: alg.trim().to_string(),
                    checksum_value: sum.trim().to_string(),
                });
            }
        }
        "PackageHomePage" => pkg.homepage = Some(value),
        "PackageSourceInfo" => pkg.source_info = Some(value),
        "PackageLicenseConcluded" => pkg.license_concluded = Some(value),
        "PackageLicenseDeclared" => pkg.license_declared = Some(value),
        "PackageCopyrightText" => pkg.copyright_text = Some(value),
        "PackageSummary" => pkg.summary = Some(value),
        "PackageDescription" => pkg.description = Some(value),
        "PrimaryPackagePurpose" => pkg.primary_package_purpose = Some(value),
        "ExternalRef" => {
            let mut parts = value.split_whitespace();
            if let (Some(category), Some(ty), Some(locator)) =
                (parts.next(), parts.next(), parts.next())
            {
                pkg.external_refs.push(SpdxExternalRef {
                    reference_category: Some(category.to_string()),
                    reference_type: ty.to_string(),
                    reference_locator: locator.to_string(),
                });
            }
        }
        _ => {}
    }
}

fn parse_relationship(value: &str) -> Option<SpdxRelationship> {
    let mut parts = value.split_whitespace();
    let from = parts.next()?;
    let ty = parts.next()?;
    let to = parts.next()?;
    Some(SpdxRelationship {
        spdx_element_id: from.to_string(),
        relationship_type: ty.to_string(),
        related_spdx_element: to.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "SPDXVersion: SPDX-2.2
DataLicense: CC0-1.0
SPDXID: SPDXRef-DOCUMENT
DocumentName: sample
DocumentNamespace: https://example.com/sample
Creator: Tool: spdx-builder-1.2.0
Created: 2023-01-01T00:00:00Z
DocumentComment: <text>multi
line comment</text>

PackageName: openssl
SPDXID: SPDXRef-openssl
PackageVersion: 3.0.0
PackageDownloadLocation: https://www.openssl.org/source/openssl-3.0.0.tar.gz
FilesAnalyzed: false
PackageChecksum: SHA256: deadbeef
PackageLicenseDeclared: Apache-2.0
ExternalRef: PACKAGE-MANAGER purl pkg:generic/openssl@3.0.0

FileName: ./README
SPDXID: SPDXRef-readme

Relationship: SPDXRef-DOCUMENT DESCRIBES SPDXRef-openssl

LicenseID: LicenseRef-1
LicenseName: Custom One
ExtractedText: <text>custom</text>
";

    #[test]
    fn test_parse_sample() {
        let doc = parse(SAMPLE).expect("valid tag-value");
        assert_eq!(doc.spdx_version.as_deref(), Some("SPDX-2.2"));
        assert_eq!(doc.comment.as_deref(), Some("multi\nline comment"));
        let ci = doc.creation_info.as_ref().expect("creation info");
        assert_eq!(ci.creators, vec!["Tool: spdx-builder-1.2.0"]);

        assert_eq!(doc.packages.len(), 1);
        let pkg = &doc.packages[0];
        assert_eq!(pkg.spdx_id.as_deref(), Some("SPDXRef-openssl"));
        assert_eq!(pkg.files_analyzed, Some(false));
        assert_eq!(pkg.checksums[0].algorithm, "SHA256");
        assert_eq!(pkg.external_refs[0].reference_type, "purl");

        assert_eq!(doc.relationships.len(), 1);
        assert_eq!(doc.has_extracted_licensing_infos[0].name.as_deref(), Some("Custom One"));
    }

    #[test]
    fn test_file_section_ids_do_not_leak() {
        let doc = parse(SAMPLE).expect("valid tag-value");
        assert_eq!(doc.spdx_id.as_deref(), Some("SPDXRef-DOCUMENT"));
        assert_eq!(doc.packages[0].spdx_id.as_deref(), Some("SPDXRef-openssl"));
    }

    #[test]
    fn test_line_without_colon_is_error() {
        let err = parse("SPDXVersion: SPDX-2.3\ngarbage line\n").unwrap_err();
        assert!(err.to_string().contains("tag-value"));
    }

    #[test]
    fn test_unterminated_text_block() {
        assert!(parse("DocumentComment: <text>never closed\n").is_err());
    }
}
