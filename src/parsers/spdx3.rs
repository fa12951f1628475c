//! SPDX 3.x JSON-LD parser.
//!
//! An SPDX 3 document is a flat `@graph` of typed elements linked by
//! `spdxId`. The parser decodes every element into one loose structure,
//! indexes them by id and then walks packages, agents and relationships.

use crate::error::{ErrorContext, Result};
use crate::licenses;
use crate::model::{
    Author, Checksum, Component, Document, DocumentBuilder, EntityType, FileFormat, License,
    Organization, Relationship, RelationshipType, Spec, SpecFormat, Swid, Tool,
};
use crate::parsers::common::{
    add_cpe, add_omnibor, add_purl, add_swhid, is_vcs_location, present,
};
use crate::parsers::detection::FormatTriple;
use crate::parsers::entity::split_tool;
use crate::parsers::traits::SbomParser;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::HashMap;

/// Parser for SPDX 3.x JSON-LD documents
#[derive(Debug, Default, Clone, Copy)]
pub struct Spdx3Parser;

impl Spdx3Parser {
    /// Create a new SPDX 3 parser
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl SbomParser for Spdx3Parser {
    fn spec(&self) -> SpecFormat {
        SpecFormat::Spdx
    }

    fn format_name(&self) -> &'static str {
        "SPDX 3"
    }

    fn supported_versions(&self) -> &'static [&'static str] {
        &["3.0", "3.0.1"]
    }

    fn parse_bytes(&self, bytes: &[u8], format: &FormatTriple) -> Result<Document> {
        let graph: Spdx3Graph = serde_json::from_slice(bytes).context("SPDX 3 JSON-LD")?;
        tracing::debug!(elements = graph.graph.len(), "decoded SPDX 3 graph");
        Ok(convert(&graph, format))
    }
}

// ============================================================================
// Native structures
// ============================================================================

#[derive(Debug, Deserialize)]
struct Spdx3Graph {
    #[serde(rename = "@graph", default)]
    graph: Vec<Element>,
}

/// Union of the element properties the adapter reads
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Element {
    #[serde(rename = "type", alias = "@type")]
    element_type: String,
    #[serde(alias = "@id")]
    spdx_id: Option<String>,
    name: Option<String>,
    comment: Option<String>,
    description: Option<String>,
    summary: Option<String>,
    creation_info: Option<Value>,

    // CreationInfo
    spec_version: Option<String>,
    created: Option<String>,
    #[serde(deserialize_with = "one_or_many")]
    created_by: Vec<String>,
    #[serde(deserialize_with = "one_or_many")]
    created_using: Vec<String>,

    // SpdxDocument / Sbom
    #[serde(deserialize_with = "one_or_many")]
    root_element: Vec<String>,
    data_license: Option<String>,
    import: Vec<ExternalMap>,

    // Relationship
    from: Option<String>,
    #[serde(deserialize_with = "one_or_many")]
    to: Vec<String>,
    relationship_type: Option<String>,

    // software_Package
    #[serde(rename = "software_packageVersion")]
    package_version: Option<String>,
    #[serde(rename = "software_downloadLocation")]
    download_location: Option<String>,
    #[serde(rename = "software_packageUrl")]
    package_url: Option<String>,
    #[serde(rename = "software_primaryPurpose")]
    primary_purpose: Option<String>,
    #[serde(rename = "software_copyrightText")]
    copyright_text: Option<String>,
    supplied_by: Option<String>,
    #[serde(deserialize_with = "one_or_many")]
    originated_by: Vec<String>,
    verified_using: Vec<IntegrityMethod>,
    external_identifier: Vec<ExternalIdentifier>,
    external_ref: Vec<ExternalRef>,

    // simplelicensing_LicenseExpression
    #[serde(rename = "simplelicensing_licenseExpression")]
    license_expression: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct IntegrityMethod {
    algorithm: String,
    hash_value: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ExternalIdentifier {
    external_identifier_type: String,
    identifier: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ExternalRef {
    external_ref_type: String,
    #[serde(deserialize_with = "one_or_many")]
    locator: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ExternalMap {
    external_spdx_id: String,
    location_hint: Option<String>,
}

/// Accept either a single string or an array of strings
fn one_or_many<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
        Other(Value),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(s) => vec![s],
        OneOrMany::Many(v) => v,
        OneOrMany::Other(_) => Vec::new(),
    })
}

impl Element {
    fn is(&self, ty: &str) -> bool {
        self.element_type == ty || self.element_type.rsplit('_').next() == Some(ty)
    }

    /// Relationship type comparison, ignoring ASCII case
    fn relationship_is(&self, ty: &str) -> bool {
        self.relationship_type
            .as_deref()
            .is_some_and(|t| t.eq_ignore_ascii_case(ty))
    }

    fn id(&self) -> Option<&str> {
        self.spdx_id.as_deref().filter(|s| !s.trim().is_empty())
    }

    fn email(&self) -> Option<String> {
        self.external_identifier
            .iter()
            .find(|e| e.external_identifier_type.eq_ignore_ascii_case("email"))
            .and_then(|e| present(Some(&e.identifier)))
    }
}

// ============================================================================
// Adapter
// ============================================================================

struct Graph<'a> {
    by_id: HashMap<&'a str, &'a Element>,
}

impl<'a> Graph<'a> {
    fn new(elements: &'a [Element]) -> Self {
        let by_id = elements
            .iter()
            .filter_map(|el| el.id().map(|id| (id, el)))
            .collect();
        Self { by_id }
    }

    fn get(&self, id: &str) -> Option<&'a Element> {
        self.by_id.get(id).copied()
    }

    fn is_package(&self, id: &str) -> bool {
        self.get(id).is_some_and(|el| el.is("Package"))
    }

    /// Expression text for a license element reference
    fn license_expression(&self, id: &str) -> Option<String> {
        if let Some(el) = self.get(id) {
            if let Some(expr) = present(el.license_expression.as_deref()) {
                return Some(expr);
            }
            if el.is("NoAssertionLicense") {
                return Some("NOASSERTION".to_string());
            }
            if el.is("NoneLicense") {
                return Some("NONE".to_string());
            }
        }
        id.rsplit_once("spdx.org/licenses/")
            .map(|(_, token)| token.to_string())
            .or_else(|| Some(id.to_string()))
    }

    fn organization(&self, id: &str) -> Option<Organization> {
        let el = self.get(id)?;
        let name = present(el.name.as_deref())?;
        Some(Organization {
            name,
            email: el.email(),
            ..Organization::default()
        })
    }
}

fn convert(native: &Spdx3Graph, format: &FormatTriple) -> Document {
    let elements = &native.graph;
    let graph = Graph::new(elements);

    let document = elements.iter().find(|el| el.is("SpdxDocument"));
    let inline_info: Option<Element> = document
        .and_then(|d| d.creation_info.clone())
        .filter(Value::is_object)
        .and_then(|v| serde_json::from_value(v).ok());
    let creation = inline_info
        .as_ref()
        .or_else(|| elements.iter().find(|el| el.is("CreationInfo")));

    let mut spec = Spec::new(SpecFormat::Spdx, format.version.clone(), FileFormat::JsonLd);
    if let Some(doc) = document {
        spec.name = present(doc.name.as_deref());
        spec.spdx_id = doc.id().map(str::to_string);
        spec.namespace = spec.spdx_id.clone();
        spec.comment = present(doc.comment.as_deref());
        spec.external_doc_refs = doc
            .import
            .iter()
            .map(|m| {
                m.location_hint
                    .clone()
                    .unwrap_or_else(|| m.external_spdx_id.clone())
            })
            .filter(|r| !r.trim().is_empty())
            .collect();
        spec.licenses = doc
            .data_license
            .as_deref()
            .and_then(|id| graph.license_expression(id))
            .map(|expr| licenses::resolve(&expr, &[]))
            .unwrap_or_default();
    }
    spec.creation_timestamp = creation.and_then(|ci| present(ci.created.as_deref()));

    let mut b = DocumentBuilder::new(spec);
    check_document_fields(document, creation, &mut b);
    if let Some(ci) = creation {
        add_agents(ci, &graph, &mut b);
    }

    let license_edges = collect_license_edges(elements, &graph);
    for el in elements.iter().filter(|el| el.is("Package")) {
        if let Some(comp) = convert_package(el, &graph, &license_edges, &mut b) {
            b.add_component(comp);
        }
    }

    add_relationships(elements, &mut b);
    if let Some(primary) = find_primary(elements, document, &graph) {
        b.primary_component(primary);
    }
    b.build()
}

fn check_document_fields(
    document: Option<&Element>,
    creation: Option<&Element>,
    b: &mut DocumentBuilder,
) {
    let checks = [
        ("CreationInfo", creation.is_some()),
        (
            "created",
            creation.is_some_and(|ci| present(ci.created.as_deref()).is_some()),
        ),
        (
            "specVersion",
            creation.is_some_and(|ci| present(ci.spec_version.as_deref()).is_some()),
        ),
        ("SpdxDocument", document.is_some()),
        ("spdxId", document.and_then(Element::id).is_some()),
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

fn add_agents(ci: &Element, graph: &Graph<'_>, b: &mut DocumentBuilder) {
    for id in &ci.created_by {
        let Some(agent) = graph.get(id) else {
            b.log(format!("createdBy references unknown agent '{id}'"));
            continue;
        };
        let Some(name) = present(agent.name.as_deref()) else {
            continue;
        };
        let entity_type = if agent.is("Organization") {
            if b.spec_mut().organization.is_none() {
                b.spec_mut().organization = Some(name.clone());
            }
            EntityType::Organization
        } else if agent.is("Person") {
            EntityType::Person
        } else {
            EntityType::Unknown
        };
        b.add_author(Author::new(name, entity_type).with_email(agent.email()));
    }
    for id in &ci.created_using {
        let name = graph
            .get(id)
            .and_then(|t| present(t.name.as_deref()))
            .unwrap_or_else(|| id.clone());
        let (name, version) = split_tool(&name);
        b.add_tool(Tool::new(name, version));
    }
}

#[derive(Default)]
struct LicenseEdges {
    declared: HashMap<String, Vec<License>>,
    concluded: HashMap<String, Vec<License>>,
}

fn collect_license_edges(elements: &[Element], graph: &Graph<'_>) -> LicenseEdges {
    let mut edges = LicenseEdges::default();
    for rel in elements.iter().filter(|el| el.is("Relationship")) {
        let Some(from) = rel.from.as_deref() else {
            continue;
        };
        let target = if rel.relationship_is("hasDeclaredLicense") {
            &mut edges.declared
        } else if rel.relationship_is("hasConcludedLicense") {
            &mut edges.concluded
        } else {
            continue;
        };
        let entry = target.entry(from.to_string()).or_default();
        for to in &rel.to {
            if let Some(expr) = graph.license_expression(to) {
                for lic in licenses::resolve(&expr, &[]) {
                    if !entry.contains(&lic) {
                        entry.push(lic);
                    }
                }
            }
        }
    }
    edges
}

fn convert_package(
    el: &Element,
    graph: &Graph<'_>,
    license_edges: &LicenseEdges,
    b: &mut DocumentBuilder,
) -> Option<Component> {
    let Some(id) = el.id() else {
        b.log(format!(
            "package '{}' has no spdxId, skipping",
            el.name.as_deref().unwrap_or_default()
        ));
        return None;
    };
    let mut comp = Component::new(id, el.name.as_deref().unwrap_or_default().trim());
    comp.version = present(el.package_version.as_deref());
    comp.description = present(el.description.as_deref()).or_else(|| present(el.summary.as_deref()));
    comp.primary_purpose = present(el.primary_purpose.as_deref());
    comp.copyright = present(el.copyright_text.as_deref());

    if let Some(purl) = present(el.package_url.as_deref()) {
        add_purl(&mut comp, &purl, b);
    }
    for ext in &el.external_identifier {
        let value = ext.identifier.trim();
        match ext.external_identifier_type.as_str() {
            "cpe22" | "cpe23" => add_cpe(&mut comp, value, b),
            "packageUrl" => {
                if !comp.purls.iter().any(|p| p.as_str() == value) {
                    add_purl(&mut comp, value, b);
                }
            }
            "swhid" => add_swhid(&mut comp, value, b),
            "gitoid" => add_omnibor(&mut comp, value, b),
            "swid" => {
                if let Some(swid) = Swid::parse(value, None) {
                    comp.swids.push(swid);
                }
            }
            _ => {}
        }
    }
    for hash in &el.verified_using {
        if !hash.hash_value.trim().is_empty() {
            comp.checksums
                .push(Checksum::new(&hash.algorithm, hash.hash_value.trim()));
        }
    }

    if let Some(location) = present(el.download_location.as_deref()) {
        if is_vcs_location(&location) {
            comp.source_code_url = Some(location.clone());
        }
        comp.download_url = Some(location);
    }
    for ext in el.external_ref.iter().filter(|r| r.external_ref_type == "vcs") {
        if let Some(url) = ext.locator.first() {
            comp.source_code_url = Some(url.clone());
        }
    }

    let originator = el.originated_by.first().and_then(|o| graph.organization(o));
    comp.manufacturer = originator.clone();
    comp.supplier = el
        .supplied_by
        .as_deref()
        .and_then(|s| graph.organization(s))
        .or(originator);

    comp.declared_licenses = license_edges.declared.get(id).cloned().unwrap_or_default();
    comp.concluded_licenses = license_edges.concluded.get(id).cloned().unwrap_or_default();
    comp.licenses = if comp.concluded_licenses.is_empty() {
        comp.declared_licenses.clone()
    } else {
        comp.concluded_licenses.clone()
    };

    comp.required_fields_present = comp.has_name();
    if !comp.required_fields_present {
        b.log(format!("package {id} is missing required field name"));
    }
    Some(comp)
}

fn add_relationships(elements: &[Element], b: &mut DocumentBuilder) {
    for rel in elements.iter().filter(|el| el.is("Relationship")) {
        let (Some(from), Some(ty)) = (rel.from.as_deref(), rel.relationship_type.as_deref())
        else {
            continue;
        };
        let ty = if rel.relationship_is("dependsOn") {
            RelationshipType::DependsOn
        } else if rel.relationship_is("contains") {
            RelationshipType::Contains
        } else if rel.relationship_is("describes") {
            RelationshipType::Describes
        } else if rel.relationship_is("hasDeclaredLicense")
            || rel.relationship_is("hasConcludedLicense")
        {
            continue;
        } else {
            RelationshipType::Other(ty.to_string())
        };
        for to in &rel.to {
            b.add_relationship(Relationship::new(from, to.as_str(), ty.clone()));
        }
    }
}

/// First package among the SBOM roots, then the document roots, then a
/// `describes` target
fn find_primary(elements: &[Element], document: Option<&Element>, graph: &Graph<'_>) -> Option<String> {
    let sbom_roots = elements
        .iter()
        .filter(|el| el.is("Sbom"))
        .flat_map(|el| el.root_element.iter());
    let doc_roots = document.into_iter().flat_map(|d| d.root_element.iter());
    if let Some(root) = sbom_roots.chain(doc_roots).find(|id| graph.is_package(id)) {
        return Some(root.clone());
    }
    elements
        .iter()
        .filter(|el| el.is("Relationship") && el.relationship_is("describes"))
        .flat_map(|el| el.to.iter())
        .find(|id| graph.is_package(id))
        .cloned()
}
