//! Helpers shared by the spec adapters.

use crate::model::{Component, Cpe, DocumentBuilder, OmniborId, Purl, Swhid};

/// Trimmed value unless empty or an SPDX `NOASSERTION`/`NONE` marker
pub(crate) fn present(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| {
            !v.is_empty() && !v.eq_ignore_ascii_case("NOASSERTION") && !v.eq_ignore_ascii_case("NONE")
        })
        .map(str::to_string)
}

/// Fresh identity for a component that carries none
pub(crate) fn surrogate_id() -> String {
    format!("urn:uuid:{}", uuid::Uuid::new_v4())
}

/// VCS-style download location (`git+https://...`, `...repo.git`)
pub(crate) fn is_vcs_location(location: &str) -> bool {
    let lower = location.trim().to_ascii_lowercase();
    ["git+", "hg+", "svn+", "bzr+", "git://"]
        .iter()
        .any(|p| lower.starts_with(p))
        || lower.ends_with(".git")
}

/// Validate and attach a PURL, logging invalid values
pub(crate) fn add_purl(comp: &mut Component, value: &str, b: &mut DocumentBuilder) {
    match Purl::parse(value) {
        Some(purl) => comp.purls.push(purl),
        None => b.log(format!("component {}: invalid purl '{value}'", comp.id)),
    }
}

/// Validate and attach a CPE, logging invalid values
pub(crate) fn add_cpe(comp: &mut Component, value: &str, b: &mut DocumentBuilder) {
    match Cpe::parse(value) {
        Some(cpe) => comp.cpes.push(cpe),
        None => b.log(format!("component {}: invalid cpe '{value}'", comp.id)),
    }
}

pub(crate) fn add_swhid(comp: &mut Component, value: &str, b: &mut DocumentBuilder) {
    match Swhid::parse(value) {
        Some(id) => comp.swhids.push(id),
        None => b.log(format!("component {}: invalid swhid '{value}'", comp.id)),
    }
}

pub(crate) fn add_omnibor(comp: &mut Component, value: &str, b: &mut DocumentBuilder) {
    match OmniborId::parse(value) {
        Some(id) => comp.omnibor_ids.push(id),
        None => b.log(format!("component {}: invalid omnibor id '{value}'", comp.id)),
    }
}
