//! License resolver behaviour through the public API.

use sbom_score::licenses::{self, LicenseRegistry};
use sbom_score::model::{License, LicenseSource};
use std::collections::BTreeSet;

fn ids(lics: &[License]) -> BTreeSet<String> {
    lics.iter().map(|l| l.short_id().to_string()).collect()
}

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

#[test]
fn conjunction_yields_both_operands() {
    licenses::init();
    for expr in ["MIT AND Apache-2.0", "Apache-2.0 AND MIT", "(MIT and Apache-2.0)"] {
        assert_eq!(ids(&licenses::resolve(expr, &[])), set(&["MIT", "Apache-2.0"]), "{expr}");
    }
}

#[test]
fn none_and_noassertion_are_empty_in_any_case() {
    for expr in ["NONE", "none", "NOASSERTION", "NoAssertion", "  NONE  ", ""] {
        assert!(licenses::resolve(expr, &[]).is_empty(), "{expr:?}");
    }
}

#[test]
fn operators_and_parentheses_are_discarded() {
    let lics = licenses::resolve("(GPL-2.0-only WITH Classpath-exception-2.0) OR MIT", &[]);
    assert_eq!(
        ids(&lics),
        set(&["Classpath-exception-2.0", "GPL-2.0-only", "MIT"])
    );
    let exception = lics
        .iter()
        .find(|l| l.short_id() == "Classpath-exception-2.0")
        .expect("exception resolved");
    assert!(exception.is_exception());
    assert_eq!(exception.source(), LicenseSource::Spdx);
}

#[test]
fn or_later_plus_kept_for_display_only() {
    let lics = licenses::resolve("GPL-2.0+", &[]);
    assert_eq!(lics.len(), 1);
    assert!(lics[0].short_id().ends_with('+'));
    assert!(lics[0].is_spdx());
}

#[test]
fn caller_custom_list_is_consulted_before_synthesis() {
    let custom = vec![License::custom("Acme Internal License", "LicenseRef-acme")];
    let lics = licenses::resolve("LicenseRef-acme", &custom);
    assert_eq!(lics.len(), 1);
    assert_eq!(lics[0].name(), "Acme Internal License");
    assert!(lics[0].is_custom());
}

#[test]
fn unknown_token_synthesizes_custom_license() {
    let lic = licenses::lookup("Totally-Made-Up-1.0", &[]);
    assert!(lic.is_custom());
    assert!(!lic.is_valid());
    assert_eq!(lic.name(), "Totally-Made-Up-1.0");
    assert_eq!(lic.short_id(), "Totally-Made-Up-1.0");
}

#[test]
fn aboutcode_overlay_only_adds_restrictiveness() {
    let registry = LicenseRegistry::global();
    let gpl = registry.lookup("GPL-3.0-only", &[]);
    assert!(gpl.is_spdx());
    assert!(gpl.is_restrictive());

    let mit = registry.lookup("MIT", &[]);
    assert!(!mit.is_restrictive());
    assert!(mit.is_osi_approved());
    assert!(mit.is_free_any_use());
}

#[test]
fn aboutcode_only_keys_resolve() {
    let lic = licenses::lookup("LicenseRef-scancode-commercial-license", &[]);
    assert_eq!(lic.source(), LicenseSource::AboutCode);
    assert!(lic.is_restrictive());
}

#[test]
fn deprecated_spdx_ids_are_flagged() {
    let lic = licenses::lookup("GPL-2.0", &[]);
    assert!(lic.is_spdx());
    assert!(lic.is_deprecated());
}

#[test]
fn weak_copyleft_spdx_ids_are_restrictive() {
    let registry = LicenseRegistry::global();
    for id in ["OSL-3.0", "CPL-1.0", "CDDL-1.1", "EUPL-1.1", "MPL-1.0", "LGPL-2.0-or-later"] {
        let lic = registry.lookup(id, &[]);
        assert!(lic.is_spdx(), "{id}");
        assert!(lic.is_restrictive(), "{id} should be restrictive");
    }
    assert!(registry.lookup("LGPL-2.0+", &[]).is_restrictive());
    assert!(!registry.lookup("BSD-3-Clause", &[]).is_restrictive());
}

#[test]
fn scancode_only_refs_are_not_custom() {
    for token in [
        "LicenseRef-scancode-ms-visual-cpp-2015-runtime",
        "LicenseRef-scancode-oracle-bcl-javase-javafx-2013",
    ] {
        let lic = licenses::lookup(token, &[]);
        assert!(!lic.is_custom(), "{token}");
        assert_eq!(lic.source(), LicenseSource::AboutCode);
        assert_eq!(lic.short_id(), token);
        assert!(lic.is_restrictive());
        assert!(!lic.is_free_any_use());
    }
}
