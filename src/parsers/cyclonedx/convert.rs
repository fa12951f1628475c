//! Adapter from the CycloneDX structures to the unified model.

use super::model::{
    CdxBom, CdxComponent, CdxContact, CdxLicenseChoice, CdxMetadata, CdxOrganization,
};
use super::signature;
use crate::licenses;
use crate::model::{
    Author, Checksum, Component, Composition, Contact, Document, DocumentBuilder, EntityType,
    FileFormat, License, Organization, Purl, Relationship, RelationshipType, Spec, SpecFormat,
    Swid, Tool, Vulnerability,
};
use crate::parsers::common::{add_cpe, add_omnibor, add_purl, add_swhid, present, surrogate_id};
use crate::parsers::detection::FormatTriple;
use crate::utils::version_at_least;
use serde_json::Value;

/// Build a [`Document`] from a decoded BOM. `raw` is the undecoded JSON value
/// used for signature extraction; XML input passes `None`.
pub(crate) fn convert(bom: CdxBom, raw: Option<&Value>, format: &FormatTriple) -> Document {
    let mut spec = Spec::new(SpecFormat::CycloneDx, format.version.clone(), format.file_format);
    spec.namespace = present(bom.serial_number.as_deref());
    spec.doc_version = bom.version;
    spec.external_doc_refs = bom
        .external_references
        .iter()
        .filter(|r| r.ref_type.eq_ignore_ascii_case("bom"))
        .map(|r| r.url.trim().to_string())
        .filter(|u| !u.is_empty())
        .collect();

    let version_16 = version_at_least(&format.version, "1.6");
    let mut b = DocumentBuilder::new(spec);
    check_document_fields(&bom, format.file_format, &mut b);

    if let Some(meta) = &bom.metadata {
        add_metadata(meta, version_16, &mut b);
    }

    let mut walker = Walker {
        builder: &mut b,
        version_16,
    };
    if let Some(root) = bom.metadata.as_ref().and_then(|m| m.component.as_ref()) {
        if let Some(id) = walker.walk(root) {
            walker.builder.primary_component(id);
        }
    }
    for comp in &bom.components {
        walker.walk(comp);
    }

    for dep in &bom.dependencies {
        let Some(from) = dep.ref_field.as_deref().map(str::trim).filter(|r| !r.is_empty()) else {
            continue;
        };
        for to in dep.depends_on.iter().map(|t| t.trim()).filter(|t| !t.is_empty()) {
            b.add_relationship(Relationship::new(from, to, RelationshipType::DependsOn));
        }
    }

    for vuln in &bom.vulnerabilities {
        if let Some(id) = present(vuln.id.as_deref()) {
            b.add_vulnerability(Vulnerability { id });
        }
    }
    for comp in &bom.compositions {
        b.add_composition(Composition {
            aggregate: comp.aggregate.clone().unwrap_or_default(),
            assemblies: comp.assemblies.clone(),
            dependencies: comp.dependencies.clone(),
        });
    }

    if let Some(extracted) = raw.and_then(signature::extract) {
        if extracted.discarded > 0 {
            b.log(format!(
                "signature has {} additional signer(s); only the first is used",
                extracted.discarded
            ));
        }
        b.signature(Some(extracted.signature));
    }

    b.build()
}

fn check_document_fields(bom: &CdxBom, file_format: FileFormat, b: &mut DocumentBuilder) {
    let mut missing: Vec<&str> = Vec::new();
    if file_format == FileFormat::Json && bom.bom_format.as_deref() != Some("CycloneDX") {
        missing.push("bomFormat");
    }
    if file_format == FileFormat::Json && present(bom.spec_version.as_deref()).is_none() {
        missing.push("specVersion");
    }
    if bom.version.unwrap_or(0) < 1 {
        missing.push("version");
    }
    if bom
        .dependencies
        .iter()
        .any(|d| d.ref_field.as_deref().map_or(true, |r| r.trim().is_empty()))
    {
        missing.push("dependencies[].ref");
    }
    for field in &missing {
        b.log(format!("document is missing required field {field}"));
    }
    b.spec_mut().required_fields = missing.is_empty();
}

fn add_metadata(meta: &CdxMetadata, version_16: bool, b: &mut DocumentBuilder) {
    b.spec_mut().creation_timestamp = present(meta.timestamp.as_deref());
    b.spec_mut().name = meta
        .component
        .as_ref()
        .and_then(|c| present(c.name.as_deref()));

    for author in &meta.authors {
        b.add_author(contact_author(author, EntityType::Person));
    }
    for tool in &meta.tools {
        if let Some(name) = present(tool.name.as_deref()) {
            b.add_tool(Tool::new(name, present(tool.version.as_deref())));
        }
    }

    let supplier = meta.supplier.as_ref().and_then(organization);
    let manufacturer = meta
        .manufacturer
        .as_ref()
        .or(meta.manufacture.as_ref())
        .and_then(organization);
    b.spec_mut().organization = supplier
        .as_ref()
        .or(manufacturer.as_ref())
        .map(|o| o.name.clone())
        .filter(|n| !n.is_empty());
    b.supplier(supplier);
    b.manufacturer(manufacturer);

    for lc in &meta.lifecycles {
        if let Some(phase) = present(lc.phase.as_deref()).or_else(|| present(lc.name.as_deref())) {
            b.add_lifecycle(phase);
        }
    }

    let lics = LicenseViews::from_choices(&meta.licenses, version_16);
    b.spec_mut().licenses = lics.unified();
}

fn contact_author(c: &CdxContact, entity_type: EntityType) -> Author {
    Author {
        name: c.name.as_deref().unwrap_or_default().trim().to_string(),
        email: present(c.email.as_deref()),
        phone: present(c.phone.as_deref()),
        entity_type,
    }
}

fn organization(o: &CdxOrganization) -> Option<Organization> {
    let org = Organization {
        name: o.name.as_deref().unwrap_or_default().trim().to_string(),
        email: o.contact.iter().find_map(|c| present(c.email.as_deref())),
        urls: o
            .url
            .iter()
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .collect(),
        contacts: o
            .contact
            .iter()
            .map(|c| Contact {
                name: present(c.name.as_deref()),
                email: present(c.email.as_deref()),
                phone: present(c.phone.as_deref()),
            })
            .collect(),
    };
    org.is_present().then_some(org)
}

/// Declared and concluded license lists of one `licenses` array
#[derive(Default)]
struct LicenseViews {
    declared: Vec<License>,
    concluded: Vec<License>,
}

impl LicenseViews {
    /// Without an acknowledgement, 1.6 treats entries as declared and
    /// earlier versions as concluded
    fn from_choices(choices: &[CdxLicenseChoice], version_16: bool) -> Self {
        let mut views = Self::default();
        for choice in choices {
            let (resolved, ack) = match (&choice.license, &choice.expression) {
                (Some(lic), _) => {
                    let resolved = if let Some(id) = present(lic.id.as_deref()) {
                        licenses::resolve(&id, &[])
                    } else if let Some(name) = present(lic.name.as_deref()) {
                        vec![License::custom(name.clone(), name)]
                    } else {
                        Vec::new()
                    };
                    let ack = lic.acknowledgement.as_deref().or(choice.acknowledgement.as_deref());
                    (resolved, ack)
                }
                (None, Some(expr)) => (
                    licenses::resolve(expr, &[]),
                    choice.acknowledgement.as_deref(),
                ),
                (None, None) => continue,
            };
            let declared = match ack.map(str::trim) {
                Some(a) if a.eq_ignore_ascii_case("declared") => true,
                Some(a) if a.eq_ignore_ascii_case("concluded") => false,
                _ => version_16,
            };
            let target = if declared {
                &mut views.declared
            } else {
                &mut views.concluded
            };
            for lic in resolved {
                if !target.contains(&lic) {
                    target.push(lic);
                }
            }
        }
        views
    }

    fn unified(&self) -> Vec<License> {
        let mut all = self.concluded.clone();
        for lic in &self.declared {
            if !all.contains(lic) {
                all.push(lic.clone());
            }
        }
        all
    }
}

/// Depth-first component walk with first-occurrence-wins deduplication
struct Walker<'b> {
    builder: &'b mut DocumentBuilder,
    version_16: bool,
}

impl Walker<'_> {
    /// Register `root` and its descendants; returns the identity of `root`.
    ///
    /// A subtree whose root identity was already registered is skipped
    /// entirely, which keeps aliased or cyclic nesting finite.
    fn walk(&mut self, root: &CdxComponent) -> Option<String> {
        let mut root_id = None;
        let mut stack: Vec<&CdxComponent> = vec![root];
        while let Some(node) = stack.pop() {
            let id = identity(node);
            if root_id.is_none() {
                root_id = Some(id.clone());
            }
            if self.builder.contains(&id) {
                tracing::debug!(id = %id, "duplicate component identity, skipping subtree");
                continue;
            }
            let comp = self.convert(node, id);
            self.builder.add_component(comp);
            // Reverse so children are visited in document order
            stack.extend(node.components.iter().rev());
        }
        root_id
    }

    fn convert(&mut self, c: &CdxComponent, id: String) -> Component {
        let b = &mut *self.builder;
        let mut comp = Component::new(id, c.name.as_deref().unwrap_or_default().trim());
        comp.version = present(c.version.as_deref());
        comp.description = present(c.description.as_deref());
        comp.primary_purpose = present(c.component_type.as_deref());
        comp.copyright = present(c.copyright.as_deref());

        if let Some(purl) = present(c.purl.as_deref()) {
            add_purl(&mut comp, &purl, b);
        }
        if let Some(cpe) = present(c.cpe.as_deref()) {
            add_cpe(&mut comp, &cpe, b);
        }
        if let Some(swid) = c
            .swid
            .as_ref()
            .and_then(|s| Swid::parse(s.tag_id.as_deref()?, s.name.as_deref()))
        {
            comp.swids.push(swid);
        }
        for id in &c.omnibor_id {
            add_omnibor(&mut comp, id.trim(), b);
        }
        for id in &c.swhid {
            add_swhid(&mut comp, id.trim(), b);
        }
        for hash in &c.hashes {
            if !hash.content.trim().is_empty() {
                comp.checksums.push(Checksum::new(&hash.alg, hash.content.trim()));
            }
        }

        for ext in &c.external_references {
            let url = ext.url.trim();
            if url.is_empty() {
                continue;
            }
            match ext.ref_type.as_str() {
                "vcs" => {
                    comp.source_code_url = Some(url.to_string());
                    if let Some(hash) = ext.hashes.iter().find(|h| !h.content.trim().is_empty()) {
                        comp.source_code_hash = Some(hash.content.trim().to_string());
                    }
                }
                "distribution" | "distribution-intake" => {
                    if comp.download_url.is_none() {
                        comp.download_url = Some(url.to_string());
                    }
                }
                _ => {}
            }
        }

        comp.supplier = c.supplier.as_ref().and_then(organization);
        comp.manufacturer = c.manufacturer.as_ref().and_then(organization);
        if let Some(author) = present(c.author.as_deref()) {
            comp.authors.push(Author::new(author, EntityType::Unknown));
        }
        comp.authors.extend(
            c.authors
                .iter()
                .map(|a| contact_author(a, EntityType::Person))
                .filter(Author::is_present),
        );

        let views = LicenseViews::from_choices(&c.licenses, self.version_16);
        comp.licenses = views.unified();
        comp.declared_licenses = views.declared;
        comp.concluded_licenses = views.concluded;

        let has_type = present(c.component_type.as_deref()).is_some();
        comp.required_fields_present = has_type && comp.has_name();
        if !comp.required_fields_present {
            b.log(format!("component {} is missing required field type or name", comp.id));
        }
        comp
    }
}

/// BOM-ref, else first valid PURL, else a fresh surrogate
fn identity(c: &CdxComponent) -> String {
    present(c.bom_ref.as_deref())
        .or_else(|| {
            present(c.purl.as_deref()).filter(|p| Purl::is_valid(p))
        })
        .unwrap_or_else(surrogate_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::cyclonedx::model::CdxBom;

    fn triple(version: &str) -> FormatTriple {
        FormatTriple::new(SpecFormat::CycloneDx, FileFormat::Json, version)
    }

    fn parse(json: &str, version: &str) -> Document {
        licenses::init();
        let raw: Value = serde_json::from_str(json).expect("json");
        let bom: CdxBom = serde_json::from_value(raw.clone()).expect("bom");
        convert(bom, Some(&raw), &triple(version))
    }

    #[test]
    fn test_duplicate_bom_refs_are_registered_once() {
        let json = r#"{"bomFormat": "CycloneDX", "specVersion": "1.5", "version": 1,
            "components": [
              {"type": "library", "bom-ref": "a", "name": "a",
               "components": [{"type": "library", "bom-ref": "shared", "name": "shared"}]},
              {"type": "library", "bom-ref": "b", "name": "b",
               "components": [{"type": "library", "bom-ref": "shared", "name": "shared-again",
                               "components": [{"type": "library", "bom-ref": "a", "name": "cycle"}]}]}
            ]}"#;
        let doc = parse(json, "1.5");
        let ids: Vec<&str> = doc.components().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "shared", "b"]);
        assert_eq!(doc.component("shared").map(|c| c.name.as_str()), Some("shared"));
    }

    #[test]
    fn test_identity_falls_back_to_purl_then_surrogate() {
        let json = r#"{"bomFormat": "CycloneDX", "specVersion": "1.4", "version": 1,
            "components": [
              {"type": "library", "name": "x", "purl": "pkg:npm/x@1.0.0"},
              {"type": "library", "name": "y", "purl": "not a purl"}
            ]}"#;
        let doc = parse(json, "1.4");
        assert_eq!(doc.components()[0].id, "pkg:npm/x@1.0.0");
        assert!(doc.components()[1].id.starts_with("urn:uuid:"));
        assert!(doc.logs().iter().any(|l| l.contains("invalid purl")));
    }

    #[test]
    fn test_license_defaulting_depends_on_version() {
        let json = r#"{"bomFormat": "CycloneDX", "specVersion": "1.6", "version": 1,
            "components": [{"type": "library", "bom-ref": "c", "name": "c",
              "licenses": [{"license": {"id": "MIT"}},
                           {"expression": "Apache-2.0", "acknowledgement": "concluded"}]}]}"#;
        let doc = parse(json, "1.6");
        let c = doc.component("c").expect("component");
        assert_eq!(c.declared_licenses()[0].short_id(), "MIT");
        assert_eq!(c.concluded_licenses()[0].short_id(), "Apache-2.0");
        assert_eq!(c.licenses().len(), 2);

        let doc = parse(&json.replace("1.6", "1.5"), "1.5");
        let c = doc.component("c").expect("component");
        assert!(c.declared_licenses().is_empty());
        assert_eq!(c.concluded_licenses().len(), 2);
    }

    #[test]
    fn test_metadata_component_is_primary() {
        let json = r#"{"bomFormat": "CycloneDX", "specVersion": "1.6", "version": 2,
            "metadata": {"timestamp": "2024-01-01T00:00:00Z",
              "tools": {"components": [{"type": "application", "name": "gen", "version": "1.0"}]},
              "authors": [{"name": "Jane", "email": "jane@example.com"}],
              "manufacture": {"name": "Acme", "url": ["https://acme.example"]},
              "lifecycles": [{"phase": "build"}],
              "component": {"type": "application", "bom-ref": "root", "name": "root"}},
            "components": [{"type": "library", "bom-ref": "dep", "name": "dep"}],
            "dependencies": [{"ref": "root", "dependsOn": ["dep"]}]}"#;
        let doc = parse(json, "1.6");
        assert_eq!(doc.primary_component_id(), Some("root"));
        assert!(doc.primary_component().is_some_and(|c| c.is_primary));
        assert_eq!(doc.manufacturer().map(|m| m.name.as_str()), Some("Acme"));
        assert_eq!(doc.lifecycles(), ["build".to_string()]);
        assert_eq!(doc.tools().len(), 1);
        assert_eq!(doc.authors().len(), 1);
        assert!(doc.spec().required_fields);
        assert_eq!(doc.dependency_depth(), 1);
    }

    #[test]
    fn test_required_fields() {
        let json = r#"{"bomFormat": "CycloneDX", "specVersion": "1.4", "version": 0,
            "dependencies": [{"ref": "", "dependsOn": []}]}"#;
        let doc = parse(json, "1.4");
        assert!(!doc.spec().required_fields);
        assert!(doc.logs().iter().any(|l| l.contains("version")));
    }

    #[test]
    fn test_vcs_reference_and_hash() {
        let json = r#"{"bomFormat": "CycloneDX", "specVersion": "1.5", "version": 1,
            "components": [{"type": "library", "bom-ref": "c", "name": "c",
              "externalReferences": [
                {"type": "vcs", "url": "https://github.com/acme/c",
                 "hashes": [{"alg": "SHA-1", "content": "0123"}]},
                {"type": "distribution", "url": "https://dl.acme.example/c.tgz"}]}]}"#;
        let doc = parse(json, "1.5");
        let c = doc.component("c").expect("component");
        assert_eq!(c.source_code_url.as_deref(), Some("https://github.com/acme/c"));
        assert_eq!(c.source_code_hash.as_deref(), Some("0123"));
        assert_eq!(c.download_url.as_deref(), Some("https://dl.acme.example/c.tgz"));
    }
}
