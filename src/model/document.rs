//! The unified document aggregate.
//!
//! A [`Document`] is produced once by a spec parser through a
//! [`DocumentBuilder`] and is read-only afterwards: all fields are private
//! and only shared references are handed out.

use super::{Author, Component, License, Organization, Spec, Tool};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Normalized relationship vocabulary shared by all specs
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationshipType {
    DependsOn,
    Contains,
    Describes,
    Other(String),
}

impl RelationshipType {
    /// Whether the edge contributes to the dependency graph
    #[must_use]
    pub const fn is_dependency(&self) -> bool {
        matches!(self, Self::DependsOn | Self::Contains)
    }
}

/// Directed edge between two component identities
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Relationship {
    pub from: String,
    pub to: String,
    pub relationship_type: RelationshipType,
}

impl Relationship {
    #[must_use]
    pub fn new(from: impl Into<String>, to: impl Into<String>, ty: RelationshipType) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            relationship_type: ty,
        }
    }
}

/// Vulnerability reference embedded in the SBOM
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vulnerability {
    pub id: String,
}

/// CycloneDX composition (completeness assertion)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Composition {
    pub aggregate: String,
    pub assemblies: Vec<String>,
    pub dependencies: Vec<String>,
}

/// Enveloped digital signature over the document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub algorithm: String,
    pub value: String,
    /// Public key in PEM form when it could be reconstructed, else the raw key material
    pub public_key_pem: Option<String>,
    pub certificate_path: Vec<String>,
    pub excludes: Vec<String>,
}

impl Signature {
    /// Algorithm, value and some key material are all present
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.algorithm.trim().is_empty()
            && !self.value.trim().is_empty()
            && (self.public_key_pem.is_some() || !self.certificate_path.is_empty())
    }
}

/// Root aggregate; one per input SBOM
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    spec: Spec,
    components: Vec<Component>,
    relationships: Vec<Relationship>,
    authors: Vec<Author>,
    tools: Vec<Tool>,
    supplier: Option<Organization>,
    manufacturer: Option<Organization>,
    primary_component: Option<String>,
    vulnerabilities: Vec<Vulnerability>,
    signature: Option<Signature>,
    compositions: Vec<Composition>,
    lifecycles: Vec<String>,
    schema_valid: bool,
    schema_logs: Vec<String>,
    logs: Vec<String>,
}

impl Document {
    #[must_use]
    pub const fn spec(&self) -> &Spec {
        &self.spec
    }

    #[must_use]
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    #[must_use]
    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    #[must_use]
    pub fn authors(&self) -> &[Author] {
        &self.authors
    }

    #[must_use]
    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    #[must_use]
    pub const fn supplier(&self) -> Option<&Organization> {
        self.supplier.as_ref()
    }

    #[must_use]
    pub const fn manufacturer(&self) -> Option<&Organization> {
        self.manufacturer.as_ref()
    }

    #[must_use]
    pub fn primary_component(&self) -> Option<&Component> {
        let id = self.primary_component.as_deref()?;
        self.component(id)
    }

    #[must_use]
    pub fn primary_component_id(&self) -> Option<&str> {
        self.primary_component.as_deref()
    }

    #[must_use]
    pub fn vulnerabilities(&self) -> &[Vulnerability] {
        &self.vulnerabilities
    }

    #[must_use]
    pub const fn signature(&self) -> Option<&Signature> {
        self.signature.as_ref()
    }

    #[must_use]
    pub fn compositions(&self) -> &[Composition] {
        &self.compositions
    }

    #[must_use]
    pub fn lifecycles(&self) -> &[String] {
        &self.lifecycles
    }

    /// Outcome of the structural schema validation pass
    #[must_use]
    pub const fn schema_valid(&self) -> bool {
        self.schema_valid
    }

    #[must_use]
    pub fn schema_logs(&self) -> &[String] {
        &self.schema_logs
    }

    /// Field-level anomalies recorded while parsing
    #[must_use]
    pub fn logs(&self) -> &[String] {
        &self.logs
    }

    #[must_use]
    pub fn component(&self, id: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.id == id)
    }

    /// Identities reachable over one dependency edge from `id`
    pub fn dependencies_of<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.relationships
            .iter()
            .filter(move |r| r.relationship_type.is_dependency() && r.from == id)
            .map(|r| r.to.as_str())
    }

    /// Whether any dependency edge is recorded
    #[must_use]
    pub fn has_dependency_graph(&self) -> bool {
        self.relationships
            .iter()
            .any(|r| r.relationship_type.is_dependency())
    }

    /// Longest dependency chain starting at the primary component
    #[must_use]
    pub fn dependency_depth(&self) -> usize {
        let Some(root) = self.primary_component.as_deref() else {
            return 0;
        };
        let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
        for rel in &self.relationships {
            if rel.relationship_type.is_dependency() {
                adjacency.entry(rel.from.as_str()).or_default().push(&rel.to);
            }
        }
        let mut depth = 0;
        let mut visited: HashSet<&str> = HashSet::from([root]);
        let mut frontier = vec![root];
        while !frontier.is_empty() {
            let mut next = Vec::new();
            for node in frontier {
                for &child in adjacency.get(node).into_iter().flatten() {
                    if visited.insert(child) {
                        next.push(child);
                    }
                }
            }
            if next.is_empty() {
                break;
            }
            depth += 1;
            frontier = next;
        }
        depth
    }

    /// Attach the schema validation outcome before the document is handed out
    #[must_use]
    pub(crate) fn with_schema_outcome(mut self, valid: bool, logs: Vec<String>) -> Self {
        self.schema_valid = valid;
        self.schema_logs = logs;
        self
    }

    /// SPDX external document references or CycloneDX bom-links
    #[must_use]
    pub fn external_references(&self) -> &[String] {
        &self.spec.external_doc_refs
    }

    /// Data licenses declared on the document
    #[must_use]
    pub fn licenses(&self) -> &[License] {
        &self.spec.licenses
    }
}

/// Incremental builder used by the spec parsers
#[derive(Debug)]
pub struct DocumentBuilder {
    doc: Document,
    seen: HashSet<String>,
    edges: HashSet<Relationship>,
}

impl DocumentBuilder {
    #[must_use]
    pub fn new(spec: Spec) -> Self {
        Self {
            doc: Document {
                spec,
                components: Vec::new(),
                relationships: Vec::new(),
                authors: Vec::new(),
                tools: Vec::new(),
                supplier: None,
                manufacturer: None,
                primary_component: None,
                vulnerabilities: Vec::new(),
                signature: None,
                compositions: Vec::new(),
                lifecycles: Vec::new(),
                schema_valid: true,
                schema_logs: Vec::new(),
                logs: Vec::new(),
            },
            seen: HashSet::new(),
            edges: HashSet::new(),
        }
    }

    pub fn spec_mut(&mut self) -> &mut Spec {
        &mut self.doc.spec
    }

    /// Whether a component with this identity was already registered
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    /// Register a component; the first occurrence of an identity wins.
    ///
    /// Returns `false` when the identity was already present.
    pub fn add_component(&mut self, component: Component) -> bool {
        if !self.seen.insert(component.id.clone()) {
            tracing::debug!(id = %component.id, "skipping duplicate component identity");
            return false;
        }
        self.doc.components.push(component);
        true
    }

    pub fn add_relationship(&mut self, rel: Relationship) {
        if self.edges.insert(rel.clone()) {
            self.doc.relationships.push(rel);
        }
    }

    pub fn add_author(&mut self, author: Author) {
        if author.is_present() {
            self.doc.authors.push(author);
        }
    }

    pub fn add_tool(&mut self, tool: Tool) {
        if !tool.name.trim().is_empty() {
            self.doc.tools.push(tool);
        }
    }

    pub fn supplier(&mut self, supplier: Option<Organization>) {
        self.doc.supplier = supplier.filter(Organization::is_present);
    }

    pub fn manufacturer(&mut self, manufacturer: Option<Organization>) {
        self.doc.manufacturer = manufacturer.filter(Organization::is_present);
    }

    /// Set the primary component unless one was already chosen
    pub fn primary_component(&mut self, id: impl Into<String>) {
        if self.doc.primary_component.is_none() {
            self.doc.primary_component = Some(id.into());
        }
    }

    #[must_use]
    pub fn has_primary_component(&self) -> bool {
        self.doc.primary_component.is_some()
    }

    pub fn add_vulnerability(&mut self, vuln: Vulnerability) {
        self.doc.vulnerabilities.push(vuln);
    }

    pub fn signature(&mut self, signature: Option<Signature>) {
        self.doc.signature = signature;
    }

    pub fn add_composition(&mut self, composition: Composition) {
        self.doc.compositions.push(composition);
    }

    pub fn add_lifecycle(&mut self, phase: impl Into<String>) {
        self.doc.lifecycles.push(phase.into());
    }

    /// Record a non-fatal field-level anomaly
    pub fn log(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("{}", message);
        self.doc.logs.push(message);
    }

    /// Finalize derived attributes and freeze the document
    #[must_use]
    pub fn build(mut self) -> Document {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for rel in &self.doc.relationships {
            if rel.relationship_type.is_dependency() {
                *counts.entry(rel.from.as_str()).or_default() += 1;
            }
        }
        let counts: HashMap<String, usize> =
            counts.into_iter().map(|(k, v)| (k.to_string(), v)).collect();

        let primary = self.doc.primary_component.clone();
        if primary
            .as_deref()
            .is_some_and(|id| !self.seen.contains(id))
        {
            self.doc
                .logs
                .push("primary component does not reference a known component".to_string());
        }
        for comp in &mut self.doc.components {
            comp.dependency_count = counts.get(&comp.id).copied().unwrap_or(0);
            comp.is_primary = primary.as_deref() == Some(comp.id.as_str());
        }
        self.doc
    }
}
