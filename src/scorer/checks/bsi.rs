//! BSI TR-03183-2 v1.1 and v2.0.
//!
//! v2.0 keeps the v1.1 catalogue, tightens the accepted spec versions and
//! hash algorithm, and adds signature, vulnerability and bom-link checks.

use super::ntia::sbom_creation_timestamp;
use crate::error::{Result, SbomScoreError};
use crate::model::{Component, Document, HashAlgorithm, License, Organization, SpecFormat};
use crate::scorer::check::{Category, Check, Evaluation};
use crate::utils::{parse_lenient, version_at_least};
use std::collections::HashSet;

pub(super) fn v1_checks() -> Vec<Check> {
    let mut checks = vec![Check::new(
        Category::BsiV1,
        "sbom_spec_version",
        "SBOM Specification Version",
        |doc| spec_version_at_least(doc, "sbom_spec_version", "2.3", "1.4"),
    )];
    checks.extend(document_checks(Category::BsiV1));
    checks.extend(component_checks(Category::BsiV1));
    checks.push(Check::new(
        Category::BsiV1,
        "comp_with_license",
        "components have licenses",
        |doc| Ok(Evaluation::components(doc, |c| !c.licenses().is_empty())),
    ));
    checks.push(Check::new(
        Category::BsiV1,
        "comp_with_hash",
        "components have SHA-256 or stronger checksums",
        |doc| {
            Ok(Evaluation::components(doc, |c| {
                c.has_checksum_with(HashAlgorithm::is_strong)
            }))
        },
    ));
    checks
}

pub(super) fn v2_checks() -> Vec<Check> {
    let mut checks = vec![Check::new(
        Category::BsiV2,
        "sbom_spec_version",
        "SBOM Specification Version",
        |doc| spec_version_at_least(doc, "sbom_spec_version", "2.2.1", "1.5"),
    )];
    checks.extend(document_checks(Category::BsiV2));
    checks.extend(component_checks(Category::BsiV2));
    checks.extend([
        Check::new(
            Category::BsiV2,
            "comp_with_license",
            "components have valid licenses",
            |doc| {
                Ok(Evaluation::components(doc, |c| {
                    !c.licenses().is_empty() && c.licenses().iter().all(License::is_valid)
                }))
            },
        ),
        Check::new(
            Category::BsiV2,
            "comp_with_hash",
            "components have SHA-512 checksums",
            |doc| {
                Ok(Evaluation::components(doc, |c| {
                    c.has_checksum_with(|alg| *alg == HashAlgorithm::Sha512)
                }))
            },
        ),
        Check::new(
            Category::BsiV2,
            "comp_with_concluded_license",
            "components have concluded licenses",
            |doc| Ok(Evaluation::components(doc, |c| !c.concluded_licenses().is_empty())),
        ),
        Check::new(
            Category::BsiV2,
            "comp_with_declared_license",
            "components have declared licenses",
            |doc| Ok(Evaluation::components(doc, |c| !c.declared_licenses().is_empty())),
        ),
        Check::new(
            Category::BsiV2,
            "sbom_signature",
            "sbom is signed",
            sbom_signature,
        ),
        Check::new(
            Category::BsiV2,
            "sbom_vulnerabilities",
            "sbom carries no vulnerability data",
            sbom_vulnerabilities,
        ),
        Check::new(
            Category::BsiV2,
            "sbom_bomlinks",
            "sbom references other sboms",
            sbom_bomlinks,
        ),
    ]);
    checks
}

/// Document-level checks shared by both versions
fn document_checks(category: Category) -> Vec<Check> {
    vec![
        Check::new(category, "sbom_build_process", "SBOM build process", sbom_build_process),
        Check::new(category, "sbom_depth", "SBOM depth", sbom_depth),
        Check::new(category, "sbom_creator", "SBOM creator contact", sbom_creator),
        Check::new(category, "sbom_timestamp", "SBOM creation timestamp", sbom_creation_timestamp),
        Check::new(category, "sbom_uri", "SBOM URI", sbom_uri),
    ]
}

/// Component checks shared by both versions
fn component_checks(category: Category) -> Vec<Check> {
    vec![
        Check::new(category, "comp_with_name", "components have a name", |doc| {
            Ok(Evaluation::components(doc, Component::has_name))
        }),
        Check::new(category, "comp_with_version", "components have a version", |doc| {
            Ok(Evaluation::components(doc, Component::has_version))
        }),
        Check::new(
            category,
            "comp_with_source_code_uri",
            "components have a source code URI",
            |doc| Ok(Evaluation::components(doc, |c| c.source_code_url.is_some())),
        ),
        Check::new(
            category,
            "comp_with_source_code_hash",
            "components have a source code hash",
            |doc| Ok(Evaluation::components(doc, |c| c.source_code_hash.is_some())),
        ),
        Check::new(
            category,
            "comp_with_executable_uri",
            "components have an executable URI",
            |doc| Ok(Evaluation::components(doc, |c| c.download_url.is_some())),
        ),
        Check::new(
            category,
            "comp_with_dependencies",
            "components are part of the dependency graph",
            comp_with_dependencies,
        ),
        Check::new(category, "comp_with_uniq_ids", "components have unique ids", |doc| {
            Ok(Evaluation::components(doc, Component::has_unique_id))
        }),
        Check::new(
            category,
            "comp_with_creator",
            "components have a contactable creator",
            |doc| Ok(Evaluation::components(doc, Component::has_creator_contact)),
        ),
    ]
}

fn spec_version_at_least(
    doc: &Document,
    key: &str,
    spdx_min: &str,
    cyclonedx_min: &str,
) -> Result<Evaluation> {
    let spec = doc.spec();
    let minimum = match spec.spec_type {
        SpecFormat::Spdx => spdx_min,
        SpecFormat::CycloneDx => cyclonedx_min,
        SpecFormat::Unknown => return Ok(Evaluation::boolean(false, "unknown spec")),
    };
    if spec.version.trim().is_empty() {
        return Ok(Evaluation::boolean(false, "spec version is missing"));
    }
    if parse_lenient(&spec.version).is_none() {
        return Err(SbomScoreError::check(
            key,
            format!("unparsable spec version '{}'", spec.version),
        ));
    }
    Ok(Evaluation::boolean(
        version_at_least(&spec.version, minimum),
        format!("{} {} (minimum {minimum})", spec.spec_type.as_str(), spec.version),
    ))
}

fn sbom_build_process(doc: &Document) -> Result<Evaluation> {
    if doc.spec().spec_type != SpecFormat::CycloneDx {
        return Ok(Evaluation::not_applicable("lifecycles are CycloneDX only"));
    }
    let build = doc
        .lifecycles()
        .iter()
        .any(|phase| phase.eq_ignore_ascii_case("build"));
    Ok(Evaluation::boolean(
        build,
        format!("lifecycles: {}", doc.lifecycles().join(",")),
    ))
}

fn sbom_depth(doc: &Document) -> Result<Evaluation> {
    let depth = doc.dependency_depth();
    Ok(Evaluation::boolean(
        depth > 0,
        format!("doc has dependency depth {depth}"),
    ))
}

fn sbom_creator(doc: &Document) -> Result<Evaluation> {
    let reachable = doc.authors().iter().any(|a| a.has_contact())
        || doc.supplier().is_some_and(Organization::has_contact)
        || doc.manufacturer().is_some_and(Organization::has_contact);
    Ok(Evaluation::boolean(
        reachable,
        if reachable {
            "doc creator has contact details"
        } else {
            "doc creator has no email or url"
        },
    ))
}

fn sbom_uri(doc: &Document) -> Result<Evaluation> {
    let uri = doc
        .spec()
        .namespace
        .as_deref()
        .map(str::trim)
        .unwrap_or_default();
    Ok(Evaluation::boolean(!uri.is_empty(), format!("doc uri: {uri}")))
}

fn comp_with_dependencies(doc: &Document) -> Result<Evaluation> {
    let linked: HashSet<&str> = doc
        .relationships()
        .iter()
        .filter(|r| r.relationship_type.is_dependency())
        .flat_map(|r| [r.from.as_str(), r.to.as_str()])
        .collect();
    Ok(Evaluation::components(doc, |c| linked.contains(c.id.as_str())))
}

fn sbom_signature(doc: &Document) -> Result<Evaluation> {
    if doc.spec().spec_type != SpecFormat::CycloneDx {
        return Ok(Evaluation::not_applicable("signatures are CycloneDX only"));
    }
    Ok(match doc.signature() {
        Some(sig) => Evaluation::boolean(
            sig.is_complete(),
            format!("doc signed with {}", sig.algorithm),
        ),
        None => Evaluation::boolean(false, "doc is not signed"),
    })
}

fn sbom_vulnerabilities(doc: &Document) -> Result<Evaluation> {
    let count = doc.vulnerabilities().len();
    Ok(Evaluation::boolean(
        count == 0,
        format!("doc has {count} vulnerabilities"),
    ))
}

fn sbom_bomlinks(doc: &Document) -> Result<Evaluation> {
    let count = doc.external_references().len();
    Ok(Evaluation::boolean(count > 0, format!("doc has {count} bom links")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        Checksum, DocumentBuilder, FileFormat, Relationship, RelationshipType, Signature, Spec,
    };

    fn find(checks: Vec<Check>, key: &str) -> Check {
        checks
            .into_iter()
            .find(|c| c.key == key)
            .expect("registered check")
    }

    fn cdx(version: &str) -> DocumentBuilder {
        DocumentBuilder::new(Spec::new(SpecFormat::CycloneDx, version, FileFormat::Json))
    }

    #[test]
    fn test_spec_version_thresholds() {
        let v1 = find(v1_checks(), "sbom_spec_version");
        let v2 = find(v2_checks(), "sbom_spec_version");
        let doc = cdx("1.4").build();
        assert_eq!(v1.evaluate(&doc).expect("evaluates").score, 10.0);
        assert_eq!(v2.evaluate(&doc).expect("evaluates").score, 0.0);

        let spdx = DocumentBuilder::new(Spec::new(SpecFormat::Spdx, "2.2", FileFormat::Json)).build();
        assert_eq!(v2.evaluate(&spdx).expect("evaluates").score, 0.0);
    }

    #[test]
    fn test_unparsable_version_is_an_error() {
        let v1 = find(v1_checks(), "sbom_spec_version");
        let err = v1.evaluate(&cdx("one").build()).expect_err("unparsable");
        assert!(err.to_string().contains("sbom_spec_version"));
    }

    #[test]
    fn test_missing_version_fails_without_error() {
        let v2 = find(v2_checks(), "sbom_spec_version");
        let eval = v2.evaluate(&cdx("").build()).expect("evaluates");
        assert_eq!(eval.score, 0.0);
        assert!(!eval.ignored);
    }

    #[test]
    fn test_hash_strength_by_version() {
        let mut b = cdx("1.6");
        let mut comp = Component::new("a", "a");
        comp.checksums.push(Checksum::new("SHA-256", "abc"));
        b.add_component(comp);
        let doc = b.build();

        let v1 = find(v1_checks(), "comp_with_hash").evaluate(&doc).expect("evaluates");
        let v2 = find(v2_checks(), "comp_with_hash").evaluate(&doc).expect("evaluates");
        assert_eq!(v1.score, 10.0);
        assert_eq!(v2.score, 0.0);
    }

    #[test]
    fn test_signature_not_applicable_to_spdx() {
        let sig = find(v2_checks(), "sbom_signature");
        let spdx = DocumentBuilder::new(Spec::new(SpecFormat::Spdx, "2.3", FileFormat::Json)).build();
        assert!(sig.evaluate(&spdx).expect("evaluates").ignored);

        let mut b = cdx("1.6");
        b.signature(Some(Signature {
            algorithm: "RS256".to_string(),
            value: "sig".to_string(),
            public_key_pem: Some("-----BEGIN PUBLIC KEY-----".to_string()),
            ..Signature::default()
        }));
        assert_eq!(sig.evaluate(&b.build()).expect("evaluates").score, 10.0);
    }

    #[test]
    fn test_build_lifecycle() {
        let check = find(v1_checks(), "sbom_build_process");
        let mut b = cdx("1.5");
        b.add_lifecycle("build");
        assert_eq!(check.evaluate(&b.build()).expect("evaluates").score, 10.0);
        assert_eq!(check.evaluate(&cdx("1.5").build()).expect("evaluates").score, 0.0);
    }

    #[test]
    fn test_comp_with_dependencies_counts_both_ends() {
        let mut b = cdx("1.6");
        for id in ["app", "lib", "orphan"] {
            b.add_component(Component::new(id, id));
        }
        b.add_relationship(Relationship::new("app", "lib", RelationshipType::DependsOn));
        let e = comp_with_dependencies(&b.build()).expect("evaluates");
        assert_eq!(e.description, "2/3 comps");
    }
}
