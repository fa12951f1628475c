//! Adapter from the SPDX 2 native structures to the unified model.

use super::model::{SpdxDocument, SpdxPackage, SpdxRelationship};
use crate::licenses;
use crate::model::{
    Checksum, Component, Document, DocumentBuilder, EntityType, License, Relationship,
    RelationshipType, Spec, SpecFormat, Swid,
};
use crate::parsers::common::{
    add_cpe, add_omnibor, add_purl, add_swhid, is_vcs_location, present, surrogate_id,
};
use crate::parsers::detection::FormatTriple;
use crate::parsers::entity::{parse_entities, parse_entity};
use crate::utils::version_at_least;

const DOCUMENT_ID: &str = "SPDXRef-DOCUMENT";

/// Build a [`Document`] from a decoded SPDX 2 document
pub(crate) fn convert(doc: SpdxDocument, format: &FormatTriple) -> Document {
    let mut spec = Spec::new(SpecFormat::Spdx, format.version.clone(), format.file_format);
    spec.name = present(doc.name.as_deref());
    spec.namespace = present(doc.document_namespace.as_deref());
    spec.spdx_id = present(doc.spdx_id.as_deref());
    spec.comment = present(doc.comment.as_deref());
    spec.creation_timestamp = doc
        .creation_info
        .as_ref()
        .and_then(|ci| present(ci.created.as_deref()));
    spec.external_doc_refs = doc
        .external_document_refs
        .iter()
        .map(|r| r.spdx_document.trim().to_string())
        .filter(|r| !r.is_empty())
        .collect();

    let custom: Vec<License> = doc
        .has_extracted_licensing_infos
        .iter()
        .map(|l| {
            let name = l
                .name
                .as_deref()
                .and_then(|n| present(Some(n)))
                .unwrap_or_else(|| l.license_id.clone());
            License::custom(name, l.license_id.clone())
        })
        .collect();
    spec.licenses = doc
        .data_license
        .as_deref()
        .map(|d| licenses::resolve(d, &custom))
        .unwrap_or_default();

    let mut b = DocumentBuilder::new(spec);
    check_document_fields(&doc, &mut b);
    add_creators(&doc, &mut b);

    for pkg in &doc.packages {
        let comp = convert_package(pkg, &format.version, &custom, &mut b);
        b.add_component(comp);
    }

    let document_id = doc.spdx_id.as_deref().unwrap_or(DOCUMENT_ID);
    add_relationships(&doc.relationships, document_id, &doc.document_describes, &mut b);

    b.build()
}

fn check_document_fields(doc: &SpdxDocument, b: &mut DocumentBuilder) {
    let created = doc
        .creation_info
        .as_ref()
        .and_then(|ci| present(ci.created.as_deref()));
    let checks = [
        ("CreationInfo", doc.creation_info.is_some()),
        ("Created", created.is_some()),
        ("SPDXVersion", present(doc.spdx_version.as_deref()).is_some()),
        ("DataLicense", present(doc.data_license.as_deref()).is_some()),
        ("SPDXID", present(doc.spdx_id.as_deref()).is_some()),
        ("DocumentName", present(doc.name.as_deref()).is_some()),
        ("DocumentNamespace", present(doc.document_namespace.as_deref()).is_some()),
    ];
    let mut all_present = true;
    for (field, ok) in checks {
        if !ok {
            all_present = false;
            b.log(format!("document is missing required field {field}"));
        }
    }
    b.spec_mut().required_fields = all_present;
}

fn add_creators(doc: &SpdxDocument, b: &mut DocumentBuilder) {
    let Some(ci) = &doc.creation_info else {
        return;
    };
    for creator in &ci.creators {
        let entities = parse_entities(creator);
        if entities.is_empty() && present(Some(creator)).is_some() {
            b.log(format!("unparsable creator '{creator}'"));
        }
        for entity in entities {
            match entity.entity_type {
                EntityType::Tool => b.add_tool(entity.to_tool()),
                EntityType::Organization => {
                    if b.spec_mut().organization.is_none() {
                        b.spec_mut().organization = Some(entity.name.clone());
                    }
                    b.add_author(entity.to_author());
                }
                EntityType::Person | EntityType::Unknown => b.add_author(entity.to_author()),
            }
        }
    }
}

fn convert_package(
    pkg: &SpdxPackage,
    version: &str,
    custom: &[License],
    b: &mut DocumentBuilder,
) -> Component {
    let id = match present(pkg.spdx_id.as_deref()) {
        Some(id) => id,
        None => {
            let id = surrogate_id();
            b.log(format!(
                "package '{}' has no SPDXID, using {id}",
                pkg.name.as_deref().unwrap_or_default()
            ));
            id
        }
    };
    let mut comp = Component::new(id, pkg.name.as_deref().unwrap_or_default().trim());
    comp.version = present(pkg.version_info.as_deref());
    comp.description =
        present(pkg.description.as_deref()).or_else(|| present(pkg.summary.as_deref()));
    comp.primary_purpose = present(pkg.primary_package_purpose.as_deref());
    comp.copyright = present(pkg.copyright_text.as_deref());

    for cs in &pkg.checksums {
        comp.checksums.push(Checksum::new(&cs.algorithm, cs.checksum_value.trim()));
    }

    for ext in &pkg.external_refs {
        let locator = ext.reference_locator.trim();
        match ext.reference_type.trim() {
            "purl" => add_purl(&mut comp, locator, b),
            "cpe23Type" | "cpe22Type" => add_cpe(&mut comp, locator, b),
            "swh" => add_swhid(&mut comp, locator, b),
            "gitoid" => add_omnibor(&mut comp, locator, b),
            "swid" => {
                if let Some(swid) = Swid::parse(locator, None) {
                    comp.swids.push(swid);
                }
            }
            _ => {}
        }
    }

    let supplier = pkg.supplier.as_deref().and_then(parse_entity);
    let originator = pkg.originator.as_deref().and_then(parse_entity);
    comp.manufacturer = originator.as_ref().map(|o| o.to_organization());
    comp.supplier = supplier
        .or(originator)
        .map(|e| e.to_organization());

    if let Some(location) = present(pkg.download_location.as_deref()) {
        if is_vcs_location(&location) {
            comp.source_code_url = Some(location.clone());
        }
        comp.download_url = Some(location);
    }
    comp.source_code_hash = pkg
        .package_verification_code
        .as_ref()
        .and_then(|v| present(v.package_verification_code_value.as_deref()));

    comp.concluded_licenses = pkg
        .license_concluded
        .as_deref()
        .map(|l| licenses::resolve(l, custom))
        .unwrap_or_default();
    comp.declared_licenses = pkg
        .license_declared
        .as_deref()
        .map(|l| licenses::resolve(l, custom))
        .unwrap_or_default();
    comp.licenses = if comp.concluded_licenses.is_empty() {
        comp.declared_licenses.clone()
    } else {
        comp.concluded_licenses.clone()
    };

    comp.required_fields_present = check_package_fields(pkg, version, &comp.id, b);
    comp
}

/// Package fields mandated by the SPDX version in use
fn check_package_fields(pkg: &SpdxPackage, version: &str, id: &str, b: &mut DocumentBuilder) -> bool {
    let has = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
    let mut missing: Vec<&str> = Vec::new();
    if !has(&pkg.name) {
        missing.push("PackageName");
    }
    if !has(&pkg.spdx_id) {
        missing.push("SPDXID");
    }
    if !has(&pkg.download_location) {
        missing.push("PackageDownloadLocation");
    }
    let files_analyzed = pkg.files_analyzed.unwrap_or(true);
    let has_code = pkg
        .package_verification_code
        .as_ref()
        .is_some_and(|c| has(&c.package_verification_code_value));
    if files_analyzed && !has_code {
        missing.push("PackageVerificationCode");
    }
    if !version_at_least(version, "2.3") {
        if !has(&pkg.license_concluded) {
            missing.push("PackageLicenseConcluded");
        }
        if !has(&pkg.license_declared) {
            missing.push("PackageLicenseDeclared");
        }
        if !has(&pkg.copyright_text) {
            missing.push("PackageCopyrightText");
        }
    }
    if !missing.is_empty() {
        b.log(format!(
            "package {id} is missing required fields: {}",
            missing.join(", ")
        ));
    }
    missing.is_empty()
}

fn add_relationships(
    rels: &[SpdxRelationship],
    document_id: &str,
    document_describes: &[String],
    b: &mut DocumentBuilder,
) {
    let mut described_by: Option<String> = None;
    let mut describes: Option<String> = None;

    for rel in rels {
        let from = rel.spdx_element_id.trim();
        let to = rel.related_spdx_element.trim();
        if present(Some(from)).is_none() || present(Some(to)).is_none() {
            continue;
        }
        match rel.relationship_type.trim().to_ascii_uppercase().as_str() {
            "DEPENDS_ON" => b.add_relationship(Relationship::new(from, to, RelationshipType::DependsOn)),
            "CONTAINS" => b.add_relationship(Relationship::new(from, to, RelationshipType::Contains)),
            "DEPENDENCY_OF" => {
                b.add_relationship(Relationship::new(to, from, RelationshipType::DependsOn));
            }
            "CONTAINED_BY" => {
                b.add_relationship(Relationship::new(to, from, RelationshipType::Contains));
            }
            "DESCRIBES" => {
                if from == document_id && describes.is_none() {
                    describes = Some(to.to_string());
                }
                b.add_relationship(Relationship::new(from, to, RelationshipType::Describes));
            }
            "DESCRIBED_BY" => {
                if to == document_id && described_by.is_none() {
                    described_by = Some(from.to_string());
                }
                b.add_relationship(Relationship::new(to, from, RelationshipType::Describes));
            }
            other => b.add_relationship(Relationship::new(
                from,
                to,
                RelationshipType::Other(other.to_string()),
            )),
        }
    }

    let primary = describes
        .or_else(|| document_describes.first().map(|d| d.trim().to_string()))
        .or(described_by);
    if let Some(id) = primary {
        b.primary_component(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FileFormat;
    use crate::parsers::spdx::model::{SpdxCreationInfo, SpdxVerificationCode};

    fn triple(version: &str) -> FormatTriple {
        FormatTriple::new(SpecFormat::Spdx, FileFormat::Json, version)
    }

    fn package(id: &str) -> SpdxPackage {
        SpdxPackage {
            spdx_id: Some(id.to_string()),
            name: Some("pkg".to_string()),
            download_location: Some("NOASSERTION".to_string()),
            ..SpdxPackage::default()
        }
    }

    #[test]
    fn test_verification_code_required_only_when_files_analyzed() {
        let mut pkg = package("SPDXRef-a");
        let doc = SpdxDocument {
            packages: vec![pkg],
            ..SpdxDocument::default()
        };
        let d = convert(doc, &triple("2.3"));
        assert!(!d.components()[0].required_fields_present);

        pkg = package("SPDXRef-a");
        pkg.files_analyzed = Some(false);
        let doc = SpdxDocument {
            packages: vec![pkg],
            ..SpdxDocument::default()
        };
        let d = convert(doc, &triple("2.3"));
        assert!(d.components()[0].required_fields_present);
    }

    #[test]
    fn test_older_versions_need_license_and_copyright() {
        let mut pkg = package("SPDXRef-a");
        pkg.package_verification_code = Some(SpdxVerificationCode {
            package_verification_code_value: Some("abc".to_string()),
        });
        let doc = SpdxDocument {
            packages: vec![pkg],
            ..SpdxDocument::default()
        };
        let d = convert(doc, &triple("2.2"));
        assert!(!d.components()[0].required_fields_present);
    }

    #[test]
    fn test_originator_fallback_is_supplier_and_manufacturer() {
        let mut pkg = package("SPDXRef-a");
        pkg.originator = Some("Organization: Acme (oss@acme.example)".to_string());
        let doc = SpdxDocument {
            packages: vec![pkg],
            ..SpdxDocument::default()
        };
        let d = convert(doc, &triple("2.3"));
        let comp = &d.components()[0];
        assert_eq!(comp.supplier.as_ref().map(|s| s.name.as_str()), Some("Acme"));
        assert_eq!(comp.manufacturer.as_ref().map(|s| s.name.as_str()), Some("Acme"));
    }

    #[test]
    fn test_primary_component_precedence() {
        let rel = |a: &str, t: &str, b: &str| SpdxRelationship {
            spdx_element_id: a.to_string(),
            relationship_type: t.to_string(),
            related_spdx_element: b.to_string(),
        };
        let doc = SpdxDocument {
            spdx_id: Some(DOCUMENT_ID.to_string()),
            packages: vec![package("SPDXRef-a"), package("SPDXRef-b"), package("SPDXRef-c")],
            document_describes: vec!["SPDXRef-c".to_string()],
            relationships: vec![
                rel("SPDXRef-b", "DESCRIBED_BY", DOCUMENT_ID),
                rel(DOCUMENT_ID, "describes", "SPDXRef-a"),
                rel("SPDXRef-b", "dependency_of", "SPDXRef-a"),
            ],
            ..SpdxDocument::default()
        };
        let d = convert(doc, &triple("2.3"));
        assert_eq!(d.primary_component_id(), Some("SPDXRef-a"));
        assert_eq!(d.dependencies_of("SPDXRef-a").collect::<Vec<_>>(), vec!["SPDXRef-b"]);
    }

    #[test]
    fn test_creators_split_into_authors_and_tools() {
        let doc = SpdxDocument {
            creation_info: Some(SpdxCreationInfo {
                created: Some("2024-01-01T00:00:00Z".to_string()),
                creators: vec![
                    "Tool: syft-0.90.0".to_string(),
                    "Organization: Acme".to_string(),
                    "Person: Jane (jane@acme.example)".to_string(),
                ],
                ..SpdxCreationInfo::default()
            }),
            ..SpdxDocument::default()
        };
        let d = convert(doc, &triple("2.3"));
        assert_eq!(d.tools().len(), 1);
        assert_eq!(d.tools()[0].version.as_deref(), Some("0.90.0"));
        assert_eq!(d.authors().len(), 2);
        assert_eq!(d.spec().organization.as_deref(), Some("Acme"));
    }
}
