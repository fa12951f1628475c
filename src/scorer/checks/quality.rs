//! Quality checks: license validity, identifiers and provenance.

use crate::error::Result;
use crate::model::{Component, Document, License};
use crate::scorer::check::{Category, Check, Evaluation};

/// Component types/purposes across CycloneDX, SPDX 2 and SPDX 3
const PRIMARY_PURPOSES: &[&str] = &[
    "application",
    "archive",
    "container",
    "cryptographic-asset",
    "data",
    "device",
    "device-driver",
    "file",
    "firmware",
    "framework",
    "install",
    "library",
    "machine-learning-model",
    "operating-system",
    "other",
    "platform",
    "source",
];

pub(super) fn checks() -> Vec<Check> {
    vec![
        Check::new(
            Category::Quality,
            "comp_valid_licenses",
            "components with valid licenses",
            |doc| Ok(Evaluation::components(doc, has_only_valid_licenses)),
        ),
        Check::new(
            Category::Quality,
            "comp_with_primary_purpose",
            "components with primary purpose",
            |doc| Ok(Evaluation::components(doc, has_primary_purpose)),
        ),
        Check::new(
            Category::Quality,
            "comp_with_deprecated_licenses",
            "components with deprecated licenses",
            |doc| {
                Ok(Evaluation::components_without(doc, |c| {
                    c.licenses().iter().any(License::is_deprecated)
                }))
            },
        ),
        Check::new(
            Category::Quality,
            "comp_with_restrictive_licenses",
            "components with restrictive licenses",
            |doc| {
                Ok(Evaluation::components_without(doc, |c| {
                    c.licenses().iter().any(License::is_restrictive)
                }))
            },
        ),
        Check::new(
            Category::Quality,
            "comp_with_any_vuln_lookup_id",
            "components with any vulnerability lookup id",
            |doc| Ok(Evaluation::components(doc, |c| c.vuln_lookup_id_count() > 0)),
        ),
        Check::new(
            Category::Quality,
            "comp_with_multi_vuln_lookup_id",
            "components with multiple vulnerability lookup id",
            |doc| Ok(Evaluation::components(doc, |c| c.vuln_lookup_id_count() > 1)),
        ),
        Check::new(
            Category::Quality,
            "sbom_with_creator_and_version",
            "sbom has creator tool name and version",
            sbom_with_creator_and_version,
        ),
        Check::new(
            Category::Quality,
            "sbom_with_primary_component",
            "sbom has a primary component",
            sbom_with_primary_component,
        ),
    ]
}

fn has_only_valid_licenses(comp: &Component) -> bool {
    let licenses = comp.licenses();
    !licenses.is_empty() && licenses.iter().all(License::is_valid)
}

fn has_primary_purpose(comp: &Component) -> bool {
    comp.primary_purpose.as_deref().is_some_and(|purpose| {
        let normalized = purpose.trim().to_ascii_lowercase().replace('_', "-");
        PRIMARY_PURPOSES.contains(&normalized.as_str())
    })
}

fn sbom_with_creator_and_version(doc: &Document) -> Result<Evaluation> {
    let total = doc.tools().len();
    let have = doc
        .tools()
        .iter()
        .filter(|t| t.has_name_and_version())
        .count();
    Ok(Evaluation::boolean(
        total > 0 && have == total,
        format!("{have}/{total} tools have creator and version"),
    ))
}

fn sbom_with_primary_component(doc: &Document) -> Result<Evaluation> {
    let description = match doc.primary_component() {
        Some(comp) => format!("primary component {} present", comp.name),
        None => "no primary component".to_string(),
    };
    Ok(Evaluation::boolean(doc.primary_component().is_some(), description))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::licenses;
    use crate::model::{DocumentBuilder, FileFormat, Spec, SpecFormat, Tool};

    fn with_licenses(exprs: &[&str]) -> Document {
        licenses::init();
        let mut b = DocumentBuilder::new(Spec::new(SpecFormat::CycloneDx, "1.6", FileFormat::Json));
        for (i, expr) in exprs.iter().enumerate() {
            let mut comp = Component::new(format!("c{i}"), format!("c{i}"));
            comp.licenses = licenses::resolve(expr, &[]);
            b.add_component(comp);
        }
        b.build()
    }

    fn eval(doc: &Document, key: &str) -> Evaluation {
        let check = checks()
            .into_iter()
            .find(|c| c.key == key)
            .expect("registered check");
        check.evaluate(doc).expect("evaluates")
    }

    #[test]
    fn test_valid_licenses_require_registry_hit() {
        let doc = with_licenses(&["MIT", "LicenseRef-internal", ""]);
        let e = eval(&doc, "comp_valid_licenses");
        assert_eq!(e.description, "1/3 comps");
    }

    #[test]
    fn test_deprecated_licenses_score_the_clean_share() {
        let doc = with_licenses(&["GPL-2.0", "MIT"]);
        let e = eval(&doc, "comp_with_deprecated_licenses");
        assert_eq!(e.description, "1/2 comps");
        assert!((e.score - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_primary_purpose_vocabulary() {
        let mut comp = Component::new("a", "a");
        comp.primary_purpose = Some("OPERATING_SYSTEM".to_string());
        assert!(has_primary_purpose(&comp));
        comp.primary_purpose = Some("gizmo".to_string());
        assert!(!has_primary_purpose(&comp));
    }

    #[test]
    fn test_creator_and_version_requires_tools() {
        let spec = Spec::new(SpecFormat::Spdx, "2.3", FileFormat::Json);
        let empty = DocumentBuilder::new(spec.clone()).build();
        assert_eq!(eval(&empty, "sbom_with_creator_and_version").score, 0.0);

        let mut b = DocumentBuilder::new(spec.clone());
        b.add_tool(Tool::new("syft", Some("1.0.0".to_string())));
        assert_eq!(eval(&b.build(), "sbom_with_creator_and_version").score, 10.0);

        let mut b = DocumentBuilder::new(spec);
        b.add_tool(Tool::new("syft", None));
        assert_eq!(eval(&b.build(), "sbom_with_creator_and_version").score, 0.0);
    }
}
