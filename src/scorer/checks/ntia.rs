//! NTIA minimum elements.

use crate::error::Result;
use crate::model::{Component, Document};
use crate::scorer::check::{Category, Check, Evaluation};

pub(super) fn checks() -> Vec<Check> {
    vec![
        Check::new(
            Category::Ntia,
            "comp_with_supplier",
            "components have supplier names",
            |doc| Ok(Evaluation::components(doc, Component::has_supplier)),
        ),
        Check::new(
            Category::Ntia,
            "comp_with_name",
            "components have a name",
            |doc| Ok(Evaluation::components(doc, Component::has_name)),
        ),
        Check::new(
            Category::Ntia,
            "comp_with_version",
            "components have a version",
            |doc| Ok(Evaluation::components(doc, Component::has_version)),
        ),
        Check::new(
            Category::Ntia,
            "comp_with_uniq_ids",
            "components have unique ids",
            |doc| Ok(Evaluation::components(doc, Component::has_unique_id)),
        ),
        Check::new(
            Category::Ntia,
            "sbom_dependencies",
            "primary component has dependencies",
            sbom_dependencies,
        ),
        Check::new(
            Category::Ntia,
            "sbom_authors",
            "sbom has authors",
            sbom_authors,
        ),
        Check::new(
            Category::Ntia,
            "sbom_creation_timestamp",
            "sbom has creation timestamp",
            sbom_creation_timestamp,
        ),
    ]
}

pub(super) fn sbom_dependencies(doc: &Document) -> Result<Evaluation> {
    let Some(primary) = doc.primary_component_id() else {
        return Ok(Evaluation::boolean(false, "no primary component"));
    };
    let count = doc.dependencies_of(primary).count();
    Ok(Evaluation::boolean(
        count > 0,
        format!("primary comp has {count} dependencies"),
    ))
}

fn sbom_authors(doc: &Document) -> Result<Evaluation> {
    let count = doc.authors().len();
    Ok(Evaluation::boolean(count > 0, format!("doc has {count} authors")))
}

pub(super) fn sbom_creation_timestamp(doc: &Document) -> Result<Evaluation> {
    let ts = doc.spec().creation_timestamp.as_deref().unwrap_or_default();
    let valid = doc.spec().has_valid_timestamp();
    let description = if ts.is_empty() {
        "doc has no creation timestamp".to_string()
    } else {
        format!("doc has creation timestamp {ts}")
    };
    Ok(Evaluation::boolean(valid, description))
}
