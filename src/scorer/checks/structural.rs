//! Structural checks: is the document a recognizable, well-formed SBOM.

use crate::error::Result;
use crate::model::{Document, FileFormat, SpecFormat};
use crate::scorer::check::{Category, Check, Evaluation};

pub(super) fn checks() -> Vec<Check> {
    vec![
        Check::new(
            Category::Structural,
            "sbom_spec",
            "SBOM Specification",
            sbom_spec,
        ),
        Check::new(
            Category::Structural,
            "sbom_spec_version",
            "Spec Version",
            sbom_spec_version,
        ),
        Check::new(
            Category::Structural,
            "sbom_spec_file_format",
            "Spec File Format",
            sbom_spec_file_format,
        ),
        Check::new(
            Category::Structural,
            "sbom_parsable",
            "Spec is parsable",
            sbom_parsable,
        ),
    ]
}

fn sbom_spec(doc: &Document) -> Result<Evaluation> {
    let spec = doc.spec().spec_type;
    Ok(Evaluation::boolean(
        spec != SpecFormat::Unknown,
        format!("provided sbom is in a supported sbom format of spdx,cyclonedx: {}", spec.as_str()),
    ))
}

fn sbom_spec_version(doc: &Document) -> Result<Evaluation> {
    let spec = doc.spec();
    let supported = spec.spec_type.supported_versions();
    Ok(Evaluation::boolean(
        supported.contains(&spec.version.as_str()),
        format!(
            "provided sbom should be in supported spec version for spec:{} and versions: {}",
            spec.version,
            supported.join(",")
        ),
    ))
}

fn sbom_spec_file_format(doc: &Document) -> Result<Evaluation> {
    let spec = doc.spec();
    let supported = FileFormat::supported_for(spec.spec_type);
    let names: Vec<&str> = supported.iter().map(FileFormat::as_str).collect();
    Ok(Evaluation::boolean(
        supported.contains(&spec.file_format),
        format!(
            "provided sbom should be in supported file format for spec: {} and version: {}",
            spec.file_format,
            names.join(",")
        ),
    ))
}

fn sbom_parsable(doc: &Document) -> Result<Evaluation> {
    let valid = doc.schema_valid();
    let description = if valid {
        "provided sbom is parsable".to_string()
    } else {
        format!(
            "provided sbom failed schema validation: {}",
            doc.schema_logs().first().map_or("", String::as_str)
        )
    };
    Ok(Evaluation::boolean(valid, description))
}
