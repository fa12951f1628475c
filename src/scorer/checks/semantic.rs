//! Semantic checks: spec-mandated fields and core component attributes.

use crate::error::Result;
use crate::model::{Component, Document};
use crate::scorer::check::{Category, Check, Evaluation};

pub(super) fn checks() -> Vec<Check> {
    vec![
        Check::new(
            Category::Semantic,
            "sbom_required_fields",
            "required sbom fields",
            sbom_required_fields,
        ),
        Check::new(
            Category::Semantic,
            "comp_with_licenses",
            "components have licenses",
            |doc| Ok(Evaluation::components(doc, |c| !c.licenses().is_empty())),
        ),
        Check::new(
            Category::Semantic,
            "comp_with_checksums",
            "components have checksums",
            |doc| Ok(Evaluation::components(doc, Component::has_checksum)),
        ),
    ]
}

fn sbom_required_fields(doc: &Document) -> Result<Evaluation> {
    let doc_ok = doc.spec().required_fields;
    let total = doc.components().len();
    let missing = doc
        .components()
        .iter()
        .filter(|c| !c.required_fields_present)
        .count();
    let comps_ok = missing == 0;
    Ok(Evaluation::boolean(
        doc_ok && comps_ok,
        format!("Doc Fields:{doc_ok} Pkg Fields:{comps_ok} ({missing}/{total} comps missing fields)"),
    ))
}
