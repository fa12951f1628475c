//! SPDX 2 RDF/XML reader.
//!
//! RDF/XML alternates class elements (`spdx:Package`, `spdx:Relationship`,
//! uppercase local names) with property elements (`spdx:name`, lowercase).
//! The reader keeps a stack of open elements; property values arrive either
//! as text or as an `rdf:resource` attribute and are written into the
//! nearest enclosing class frame. Nested class elements (a package defined
//! inline under `relatedSpdxElement`) are handled the same way as top-level
//! ones.

use super::model::{
    SpdxChecksum, SpdxCreationInfo, SpdxDocument, SpdxExternalRef, SpdxExtractedLicense,
    SpdxPackage, SpdxRelationship, SpdxVerificationCode,
};
use crate::error::{ParseErrorKind, Result, SbomScoreError};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

const LICENSE_PROPERTIES: [&str; 4] = [
    "licenseConcluded",
    "licenseDeclared",
    "dataLicense",
    "hasExtractedLicensingInfo",
];

#[derive(Debug)]
enum Frame {
    Document,
    CreationInfo,
    Package(SpdxPackage),
    Relationship(SpdxRelationship),
    Checksum(SpdxChecksum),
    ExternalRef(SpdxExternalRef),
    VerificationCode(SpdxVerificationCode),
    License {
        tokens: Vec<String>,
        extracted: Option<SpdxExtractedLicense>,
    },
    /// Class nested inside a license frame (license sets, operators)
    Nested,
    /// Any other class element (File, Snippet, Annotation, ...)
    Element(Option<String>),
    Property(String),
}

impl Frame {
    const fn is_class(&self) -> bool {
        !matches!(self, Self::Property(_))
    }
}

/// Parse RDF/XML bytes into the native SPDX structures
pub(crate) fn parse(bytes: &[u8]) -> Result<SpdxDocument> {
    let mut reader = Reader::from_reader(bytes);
    reader.config_mut().trim_text(true);
    let mut doc = SpdxDocument::default();
    let mut stack: Vec<Frame> = Vec::new();
    let mut buf = Vec::new();

    loop {
        let event = reader.read_event_into(&mut buf).map_err(|e| {
            SbomScoreError::parse(
                "SPDX RDF/XML",
                ParseErrorKind::InvalidRdf(format!(
                    "at byte {}: {e}",
                    reader.buffer_position()
                )),
            )
        })?;
        match event {
            Event::Start(e) => {
                let frame = open(&e, &mut stack, &mut doc);
                stack.push(frame);
            }
            Event::Empty(e) => {
                let frame = open(&e, &mut stack, &mut doc);
                stack.push(frame);
                close(&mut stack, &mut doc);
            }
            Event::Text(t) => {
                let text = t
                    .unescape()
                    .map_err(|e| SbomScoreError::parse("SPDX RDF/XML", ParseErrorKind::InvalidRdf(e.to_string())))?;
                on_text(&mut stack, &mut doc, text.trim());
            }
            Event::CData(c) => {
                let text = String::from_utf8_lossy(&c).into_owned();
                on_text(&mut stack, &mut doc, text.trim());
            }
            Event::End(_) => close(&mut stack, &mut doc),
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(doc)
}

fn local(qname: &[u8]) -> String {
    let name = String::from_utf8_lossy(qname);
    name.rsplit(':').next().unwrap_or_default().to_string()
}

/// Value of an attribute by local name (`rdf:about` -> `about`)
fn attr(e: &BytesStart<'_>, name: &str) -> Option<String> {
    e.attributes()
        .filter_map(std::result::Result::ok)
        .find(|a| local(a.key.as_ref()) == name)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

/// Element id from an `rdf:about` URI (`...#SPDXRef-x` -> `SPDXRef-x`)
fn fragment(uri: &str) -> String {
    uri.rsplit('#').next().unwrap_or(uri).to_string()
}

/// License identifier from a resource URI
fn license_token(uri: &str) -> String {
    let lower = uri.to_ascii_lowercase();
    if lower.ends_with("#noassertion") {
        return "NOASSERTION".to_string();
    }
    if lower.ends_with("#none") {
        return "NONE".to_string();
    }
    if let Some((_, id)) = uri.rsplit_once("spdx.org/licenses/") {
        return id.trim_end_matches(".html").to_string();
    }
    if uri.contains('#') {
        return fragment(uri);
    }
    uri.rsplit('/').next().unwrap_or(uri).to_string()
}

/// Vocabulary suffix (`...#relationshipType_dependsOn` -> `DEPENDS_ON`)
fn vocab(uri: &str, prefix: &str) -> String {
    let tail = fragment(uri);
    let tail = tail.rsplit('/').next().unwrap_or(&tail);
    let term = tail.strip_prefix(prefix).unwrap_or(tail);
    let mut out = String::with_capacity(term.len() + 4);
    for (i, c) in term.chars().enumerate() {
        if c.is_ascii_uppercase() && i > 0 {
            out.push('_');
        }
        out.push(c.to_ascii_uppercase());
    }
    out
}

fn current_property(stack: &[Frame]) -> Option<&str> {
    match stack.last() {
        Some(Frame::Property(p)) => Some(p.as_str()),
        _ => None,
    }
}

fn inside_license(stack: &[Frame]) -> bool {
    stack
        .iter()
        .rev()
        .find(|f| f.is_class() && !matches!(f, Frame::Nested))
        .is_some_and(|f| matches!(f, Frame::License { .. }))
}

/// Innermost license frame, skipping nested operators
fn license_frame(stack: &mut [Frame]) -> Option<(&mut Vec<String>, &mut Option<SpdxExtractedLicense>)> {
    stack.iter_mut().rev().find_map(|f| match f {
        Frame::License { tokens, extracted } => Some((tokens, extracted)),
        _ => None,
    })
}

/// Id of the innermost element that can be a relationship subject
fn subject_id(stack: &[Frame], doc: &SpdxDocument) -> Option<String> {
    stack.iter().rev().find_map(|f| match f {
        Frame::Document => doc.spdx_id.clone(),
        Frame::Package(p) => p.spdx_id.clone(),
        Frame::Element(id) => id.clone(),
        _ => None,
    })
}

fn open(e: &BytesStart<'_>, stack: &mut Vec<Frame>, doc: &mut SpdxDocument) -> Frame {
    let name = local(e.name().as_ref());
    let about = attr(e, "about").or_else(|| attr(e, "nodeID"));
    let is_class = name.chars().next().is_some_and(char::is_uppercase);

    if !is_class {
        if let Some(resource) = attr(e, "resource") {
            on_resource(stack, doc, &name, &resource);
        }
        return Frame::Property(name);
    }

    let property = current_property(stack).map(str::to_string);
    if inside_license(stack) {
        if let (Some(about), Some((tokens, _))) = (&about, license_frame(stack)) {
            tokens.push(license_token(about));
        }
        return Frame::Nested;
    }
    if property
        .as_deref()
        .is_some_and(|p| LICENSE_PROPERTIES.contains(&p))
    {
        let extracted = (name == "ExtractedLicensingInfo").then(|| SpdxExtractedLicense {
            license_id: about.as_deref().map(fragment).unwrap_or_default(),
            ..SpdxExtractedLicense::default()
        });
        let tokens = match (&about, name.as_str()) {
            (Some(a), "ExtractedLicensingInfo" | "License" | "ListedLicense") => {
                vec![license_token(a)]
            }
            _ => Vec::new(),
        };
        return Frame::License { tokens, extracted };
    }

    let id = about.as_deref().map(fragment);
    if let Some(id) = &id {
        link_related(stack, doc, property.as_deref(), id);
    }

    match name.as_str() {
        "SpdxDocument" => {
            if let Some(about) = &about {
                if let Some((ns, frag)) = about.rsplit_once('#') {
                    doc.document_namespace.get_or_insert_with(|| ns.to_string());
                    doc.spdx_id.get_or_insert_with(|| frag.to_string());
                }
            }
            Frame::Document
        }
        "CreationInfo" => Frame::CreationInfo,
        "Package" => Frame::Package(SpdxPackage {
            spdx_id: id,
            ..SpdxPackage::default()
        }),
        "Relationship" => Frame::Relationship(SpdxRelationship {
            spdx_element_id: subject_id(stack, doc).unwrap_or_default(),
            ..SpdxRelationship::default()
        }),
        "Checksum" => Frame::Checksum(SpdxChecksum::default()),
        "ExternalRef" => Frame::ExternalRef(SpdxExternalRef::default()),
        "PackageVerificationCode" => Frame::VerificationCode(SpdxVerificationCode::default()),
        _ => Frame::Element(id),
    }
}

/// Record an inline element as the target of its enclosing property
fn link_related(stack: &mut [Frame], doc: &mut SpdxDocument, property: Option<&str>, id: &str) {
    match property {
        Some("relatedSpdxElement") => {
            if let Some(Frame::Relationship(rel)) = stack.iter_mut().rev().find(|f| f.is_class()) {
                rel.related_spdx_element = id.to_string();
            }
        }
        Some("describesPackage") => doc.document_describes.push(id.to_string()),
        _ => {}
    }
}

fn on_resource(stack: &mut [Frame], doc: &mut SpdxDocument, property: &str, resource: &str) {
    if inside_license(stack) {
        if let Some((tokens, _)) = license_frame(stack) {
            tokens.push(license_token(resource));
        }
        return;
    }
    let Some(owner) = stack.iter_mut().rev().find(|f| f.is_class()) else {
        return;
    };
    match (owner, property) {
        (Frame::Document, "dataLicense") => doc.data_license = Some(license_token(resource)),
        (Frame::Document, "describesPackage") => doc.document_describes.push(fragment(resource)),
        (Frame::Package(pkg), "licenseConcluded") => {
            pkg.license_concluded = Some(license_token(resource));
        }
        (Frame::Package(pkg), "licenseDeclared") => {
            pkg.license_declared = Some(license_token(resource));
        }
        (Frame::Package(pkg), "downloadLocation") => {
            pkg.download_location = Some(license_token(resource));
        }
        (Frame::Package(pkg), "copyrightText") => pkg.copyright_text = Some(license_token(resource)),
        (Frame::Package(pkg), "primaryPackagePurpose") => {
            pkg.primary_package_purpose = Some(vocab(resource, "purpose_"));
        }
        (Frame::Relationship(rel), "relationshipType") => {
            rel.relationship_type = vocab(resource, "relationshipType_");
        }
        (Frame::Relationship(rel), "relatedSpdxElement") => {
            rel.related_spdx_element = license_token(resource);
        }
        (Frame::Checksum(cs), "algorithm") => cs.algorithm = vocab(resource, "checksumAlgorithm_"),
        (Frame::ExternalRef(r), "referenceType") => {
            let uri = resource.trim_end_matches('/');
            r.reference_type = uri
                .rsplit(['#', '/'])
                .next()
                .unwrap_or(uri)
                .to_string();
        }
        (Frame::ExternalRef(r), "referenceCategory") => {
            r.reference_category = Some(vocab(resource, "referenceCategory_"));
        }
        _ => {}
    }
}

fn on_text(stack: &mut [Frame], doc: &mut SpdxDocument, text: &str) {
    if text.is_empty() {
        return;
    }
    let Some(property) = current_property(stack).map(str::to_string) else {
        return;
    };
    let Some(owner) = stack.iter_mut().rev().find(|f| f.is_class()) else {
        return;
    };
    let value = text.to_string();
    match owner {
        Frame::Document => match property.as_str() {
            "specVersion" => doc.spdx_version = Some(value),
            "name" => doc.name = Some(value),
            "comment" => doc.comment = Some(value),
            _ => {}
        },
        Frame::CreationInfo => {
            let ci = doc.creation_info.get_or_insert_with(SpdxCreationInfo::default);
            match property.as_str() {
                "created" => ci.created = Some(value),
                "creator" => ci.creators.push(value),
                "licenseListVersion" => ci.license_list_version = Some(value),
                "comment" => ci.comment = Some(value),
                _ => {}
            }
        }
        Frame::Package(pkg) => match property.as_str() {
            "name" => pkg.name = Some(value),
            "versionInfo" => pkg.version_info = Some(value),
            "supplier" => pkg.supplier = Some(value),
            "originator" => pkg.originator = Some(value),
            "downloadLocation" => pkg.download_location = Some(value),
            "filesAnalyzed" => pkg.files_analyzed = Some(!value.eq_ignore_ascii_case("false")),
            "homepage" => pkg.homepage = Some(value),
            "sourceInfo" => pkg.source_info = Some(value),
            "copyrightText" => pkg.copyright_text = Some(value),
            "summary" => pkg.summary = Some(value),
            "description" => pkg.description = Some(value),
            "licenseConcluded" => pkg.license_concluded = Some(value),
            "licenseDeclared" => pkg.license_declared = Some(value),
            _ => {}
        },
        Frame::Checksum(cs) if property == "checksumValue" => cs.checksum_value = value,
        Frame::ExternalRef(r) if property == "referenceLocator" => r.reference_locator = value,
        Frame::VerificationCode(v) if property == "packageVerificationCodeValue" => {
            v.package_verification_code_value = Some(value);
        }
        Frame::License { tokens, extracted } => match property.as_str() {
            "licenseId" => {
                if let Some(ex) = extracted {
                    ex.license_id.clone_from(&value);
                }
                if !tokens.contains(&value) {
                    tokens.push(value);
                }
            }
            "name" => {
                if let Some(ex) = extracted {
                    ex.name = Some(value);
                }
            }
            "extractedText" => {
                if let Some(ex) = extracted {
                    ex.extracted_text = Some(value);
                }
            }
            _ => {}
        },
        _ => {}
    }
}

fn close(stack: &mut Vec<Frame>, doc: &mut SpdxDocument) {
    let Some(frame) = stack.pop() else {
        return;
    };
    match frame {
        Frame::Package(pkg) => doc.packages.push(pkg),
        Frame::Relationship(rel) => {
            if !rel.spdx_element_id.is_empty()
                && !rel.relationship_type.is_empty()
                && !rel.related_spdx_element.is_empty()
            {
                doc.relationships.push(rel);
            }
        }
        Frame::Checksum(cs) => {
            if let Some(pkg) = nearest_package(stack) {
                pkg.checksums.push(cs);
            }
        }
        Frame::ExternalRef(r) => {
            if let Some(pkg) = nearest_package(stack) {
                pkg.external_refs.push(r);
            }
        }
        Frame::VerificationCode(v) => {
            if let Some(pkg) = nearest_package(stack) {
                pkg.package_verification_code = Some(v);
            }
        }
        Frame::License { tokens, extracted } => {
            // Token order only matters for display; resolution sorts them
            let expression = tokens.join(" AND ");
            let property = current_property(stack).map(str::to_string);
            if let Some(ex) = extracted {
                if !ex.license_id.is_empty() {
                    doc.has_extracted_licensing_infos.push(ex);
                }
            }
            match (property.as_deref(), stack.iter_mut().rev().find(|f| f.is_class())) {
                (Some("licenseConcluded"), Some(Frame::Package(pkg))) => {
                    pkg.license_concluded = Some(expression);
                }
                (Some("licenseDeclared"), Some(Frame::Package(pkg))) => {
                    pkg.license_declared = Some(expression);
                }
                (Some("dataLicense"), Some(Frame::Document)) => doc.data_license = Some(expression),
                _ => {}
            }
        }
        _ => {}
    }
}

fn nearest_package(stack: &mut [Frame]) -> Option<&mut SpdxPackage> {
    stack.iter_mut().rev().find_map(|f| match f {
        Frame::Package(p) => Some(p),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r##"<?xml version="1.0" encoding="utf-8"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:spdx="http://spdx.org/rdf/terms#"
         xmlns:rdfs="http://www.w3.org/2000/01/rdf-schema#">
  <spdx:SpdxDocument rdf:about="https://example.com/doc#SPDXRef-DOCUMENT">
    <spdx:specVersion>SPDX-2.2</spdx:specVersion>
    <spdx:name>rdf-sample</spdx:name>
    <spdx:dataLicense rdf:resource="http://spdx.org/licenses/CC0-1.0"/>
    <spdx:creationInfo>
      <spdx:CreationInfo>
        <spdx:created>2023-03-01T10:00:00Z</spdx:created>
        <spdx:creator>Tool: rdf-writer-2.0</spdx:creator>
      </spdx:CreationInfo>
    </spdx:creationInfo>
    <spdx:hasExtractedLicensingInfo>
      <spdx:ExtractedLicensingInfo rdf:about="https://example.com/doc#LicenseRef-1">
        <spdx:licenseId>LicenseRef-1</spdx:licenseId>
        <spdx:name>Custom One</spdx:name>
      </spdx:ExtractedLicensingInfo>
    </spdx:hasExtractedLicensingInfo>
    <spdx:relationship>
      <spdx:Relationship>
        <spdx:relationshipType rdf:resource="http://spdx.org/rdf/terms#relationshipType_describes"/>
        <spdx:relatedSpdxElement>
          <spdx:Package rdf:about="https://example.com/doc#SPDXRef-app">
            <spdx:name>app</spdx:name>
            <spdx:versionInfo>1.0</spdx:versionInfo>
            <spdx:downloadLocation rdf:resource="http://spdx.org/rdf/terms#noassertion"/>
            <spdx:filesAnalyzed>false</spdx:filesAnalyzed>
            <spdx:checksum>
              <spdx:Checksum>
                <spdx:algorithm rdf:resource="http://spdx.org/rdf/terms#checksumAlgorithm_sha256"/>
                <spdx:checksumValue>abcd</spdx:checksumValue>
              </spdx:Checksum>
            </spdx:checksum>
            <spdx:externalRef>
              <spdx:ExternalRef>
                <spdx:referenceCategory rdf:resource="http://spdx.org/rdf/terms#referenceCategory_packageManager"/>
                <spdx:referenceType rdf:resource="http://spdx.org/rdf/references/purl"/>
                <spdx:referenceLocator>pkg:npm/app@1.0</spdx:referenceLocator>
              </spdx:ExternalRef>
            </spdx:externalRef>
            <spdx:licenseConcluded>
              <spdx:DisjunctiveLicenseSet>
                <spdx:member rdf:resource="http://spdx.org/licenses/MIT"/>
                <spdx:member rdf:resource="https://example.com/doc#LicenseRef-1"/>
              </spdx:DisjunctiveLicenseSet>
            </spdx:licenseConcluded>
            <spdx:licenseDeclared rdf:resource="http://spdx.org/rdf/terms#noassertion"/>
            <spdx:relationship>
              <spdx:Relationship>
                <spdx:relationshipType rdf:resource="http://spdx.org/rdf/terms#relationshipType_dependsOn"/>
                <spdx:relatedSpdxElement rdf:resource="https://example.com/doc#SPDXRef-lib"/>
              </spdx:Relationship>
            </spdx:relationship>
          </spdx:Package>
        </spdx:relatedSpdxElement>
      </spdx:Relationship>
    </spdx:relationship>
  </spdx:SpdxDocument>
  <spdx:Package rdf:about="https://example.com/doc#SPDXRef-lib">
    <spdx:name>lib</spdx:name>
  </spdx:Package>
</rdf:RDF>"##;

    #[test]
    fn test_document_fields() {
        let doc = parse(SAMPLE.as_bytes()).expect("valid rdf");
        assert_eq!(doc.spdx_id.as_deref(), Some("SPDXRef-DOCUMENT"));
        assert_eq!(doc.document_namespace.as_deref(), Some("https://example.com/doc"));
        assert_eq!(doc.spdx_version.as_deref(), Some("SPDX-2.2"));
        assert_eq!(doc.data_license.as_deref(), Some("CC0-1.0"));
        let ci = doc.creation_info.as_ref().expect("creation info");
        assert_eq!(ci.creators, vec!["Tool: rdf-writer-2.0"]);
        assert_eq!(doc.has_extracted_licensing_infos.len(), 1);
        assert_eq!(doc.has_extracted_licensing_infos[0].name.as_deref(), Some("Custom One"));
    }

    #[test]
    fn test_inline_package_and_relationships() {
        let doc = parse(SAMPLE.as_bytes()).expect("valid rdf");
        assert_eq!(doc.packages.len(), 2);
        let app = doc
            .packages
            .iter()
            .find(|p| p.spdx_id.as_deref() == Some("SPDXRef-app"))
            .expect("inline package");
        assert_eq!(app.files_analyzed, Some(false));
        assert_eq!(app.checksums[0].algorithm, "SHA256");
        assert_eq!(app.external_refs[0].reference_type, "purl");
        assert_eq!(app.license_concluded.as_deref(), Some("MIT AND LicenseRef-1"));
        assert_eq!(app.license_declared.as_deref(), Some("NOASSERTION"));

        let describes = doc
            .relationships
            .iter()
            .find(|r| r.relationship_type == "DESCRIBES")
            .expect("describes");
        assert_eq!(describes.spdx_element_id, "SPDXRef-DOCUMENT");
        assert_eq!(describes.related_spdx_element, "SPDXRef-app");

        let depends = doc
            .relationships
            .iter()
            .find(|r| r.relationship_type == "DEPENDS_ON")
            .expect("depends");
        assert_eq!(depends.spdx_element_id, "SPDXRef-app");
        assert_eq!(depends.related_spdx_element, "SPDXRef-lib");
    }

    #[test]
    fn test_malformed_xml_is_error() {
        assert!(parse(b"<rdf:RDF><spdx:Package></rdf:RDF>").is_err());
    }
}
