//! OWASP SCVS SBOM maturity levels.
//!
//! Each level is a pass/fail list; higher levels include every lower-level
//! requirement. A component requirement passes only when all components
//! meet it.

use crate::error::Result;
use crate::model::{Component, Document, FileFormat, SpecFormat};
use crate::scorer::check::{Category, Check, Evaluation};

/// Lowest level a requirement applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Level {
    L1,
    L2,
    L3,
}

struct Requirement {
    level: Level,
    key: &'static str,
    description: &'static str,
    eval: fn(&Document) -> Result<Evaluation>,
}

const REQUIREMENTS: &[Requirement] = &[
    Requirement {
        level: Level::L1,
        key: "scvs_sbom_machine_readable",
        description: "SBOM is in a machine-readable format",
        eval: machine_readable,
    },
    Requirement {
        level: Level::L1,
        key: "scvs_sbom_automated_creation",
        description: "SBOM creation is automated",
        eval: automated_creation,
    },
    Requirement {
        level: Level::L1,
        key: "scvs_sbom_unique_identifier",
        description: "SBOM has a unique identifier",
        eval: unique_identifier,
    },
    Requirement {
        level: Level::L1,
        key: "scvs_sbom_timestamp",
        description: "SBOM has a timestamp",
        eval: timestamp,
    },
    Requirement {
        level: Level::L1,
        key: "scvs_comp_identifiers",
        description: "components have identifiers",
        eval: |doc| {
            Ok(Evaluation::all_components(doc, |c| {
                c.vuln_lookup_id_count() > 0
            }))
        },
    },
    Requirement {
        level: Level::L1,
        key: "scvs_comp_licenses",
        description: "components have licenses",
        eval: |doc| Ok(Evaluation::all_components(doc, |c| !c.licenses().is_empty())),
    },
    Requirement {
        level: Level::L1,
        key: "scvs_comp_copyright",
        description: "components have copyright statements",
        eval: |doc| {
            Ok(Evaluation::all_components(doc, |c| {
                c.copyright.as_deref().is_some_and(|s| !s.trim().is_empty())
            }))
        },
    },
    Requirement {
        level: Level::L1,
        key: "scvs_comp_supplier",
        description: "components have suppliers",
        eval: |doc| Ok(Evaluation::all_components(doc, Component::has_supplier)),
    },
    Requirement {
        level: Level::L2,
        key: "scvs_sbom_signed",
        description: "SBOM is signed",
        eval: signed,
    },
    Requirement {
        level: Level::L2,
        key: "scvs_comp_hashes",
        description: "components have hashes",
        eval: |doc| Ok(Evaluation::all_components(doc, Component::has_checksum)),
    },
    Requirement {
        level: Level::L2,
        key: "scvs_sbom_dependency_graph",
        description: "SBOM has a dependency graph",
        eval: |doc| {
            let ok = doc.has_dependency_graph();
            Ok(Evaluation::boolean(ok, format!("dependency graph present: {ok}")))
        },
    },
    Requirement {
        level: Level::L3,
        key: "scvs_sbom_signature_verifiable",
        description: "SBOM signature can be verified",
        eval: signature_verifiable,
    },
    Requirement {
        level: Level::L3,
        key: "scvs_comp_source_url",
        description: "components have source URLs",
        eval: |doc| Ok(Evaluation::all_components(doc, |c| c.source_code_url.is_some())),
    },
];

pub(super) fn checks() -> Vec<Check> {
    [
        (Category::ScvsL1, Level::L1),
        (Category::ScvsL2, Level::L2),
        (Category::ScvsL3, Level::L3),
    ]
    .into_iter()
    .flat_map(|(category, level)| {
        REQUIREMENTS
            .iter()
            .filter(move |r| r.level <= level)
            .map(move |r| Check::new(category, r.key, r.description, r.eval))
    })
    .collect()
}

fn machine_readable(doc: &Document) -> Result<Evaluation> {
    let spec = doc.spec();
    let ok = spec.spec_type != SpecFormat::Unknown
        && FileFormat::supported_for(spec.spec_type).contains(&spec.file_format);
    Ok(Evaluation::boolean(
        ok,
        format!("{} {}", spec.spec_type.as_str(), spec.file_format),
    ))
}

fn automated_creation(doc: &Document) -> Result<Evaluation> {
    let count = doc.tools().len();
    Ok(Evaluation::boolean(count > 0, format!("doc lists {count} tools")))
}

fn unique_identifier(doc: &Document) -> Result<Evaluation> {
    let ok = doc
        .spec()
        .namespace
        .as_deref()
        .is_some_and(|ns| !ns.trim().is_empty());
    Ok(Evaluation::boolean(ok, "doc namespace or serial number"))
}

fn timestamp(doc: &Document) -> Result<Evaluation> {
    Ok(Evaluation::boolean(
        doc.spec().has_valid_timestamp(),
        "doc creation timestamp",
    ))
}

fn signed(doc: &Document) -> Result<Evaluation> {
    if doc.spec().spec_type != SpecFormat::CycloneDx {
        return Ok(Evaluation::not_applicable("signatures are CycloneDX only"));
    }
    Ok(Evaluation::boolean(doc.signature().is_some(), "doc signature"))
}

fn signature_verifiable(doc: &Document) -> Result<Evaluation> {
    if doc.spec().spec_type != SpecFormat::CycloneDx {
        return Ok(Evaluation::not_applicable("signatures are CycloneDX only"));
    }
    let ok = doc.signature().is_some_and(|s| s.is_complete());
    Ok(Evaluation::boolean(ok, "doc signature has algorithm, value and key"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DocumentBuilder, Spec};

    #[test]
    fn test_levels_are_cumulative() {
        let checks = checks();
        let count = |cat: Category| checks.iter().filter(|c| c.category == cat).count();
        assert_eq!(count(Category::ScvsL1), 8);
        assert_eq!(count(Category::ScvsL2), 11);
        assert_eq!(count(Category::ScvsL3), 13);
        assert!(checks.iter().all(Check::is_pass_fail));
    }

    #[test]
    fn test_component_requirements_need_every_component() {
        let mut b = DocumentBuilder::new(Spec::new(SpecFormat::CycloneDx, "1.6", FileFormat::Json));
        let mut a = Component::new("a", "a");
        a.copyright = Some("(c) ACME".to_string());
        b.add_component(a);
        b.add_component(Component::new("b", "b"));
        let doc = b.build();

        let check = checks()
            .into_iter()
            .find(|c| c.key == "scvs_comp_copyright")
            .expect("registered");
        let e = check.evaluate(&doc).expect("evaluates");
        assert_eq!(e.score, 0.0);
        assert_eq!(e.description, "1/2 comps");
    }
}
