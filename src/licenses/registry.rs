//! Process-wide license registry.
//!
//! Resolution order for a single token: SPDX license list, SPDX exception
//! list, AboutCode index, caller-supplied custom licenses, and finally a
//! synthesized custom license named after the token.

use super::aboutcode::{AboutCodeEntry, AboutCodeIndex};
use super::expression;
use crate::model::{License, LicenseSource};
use std::sync::LazyLock;

static REGISTRY: LazyLock<LicenseRegistry> = LazyLock::new(LicenseRegistry::load);

/// Immutable license tables shared by every parse
#[derive(Debug)]
pub struct LicenseRegistry {
    aboutcode: AboutCodeIndex,
}

impl LicenseRegistry {
    fn load() -> Self {
        let aboutcode = AboutCodeIndex::embedded();
        tracing::debug!(aboutcode = aboutcode.len(), "license registry loaded");
        Self { aboutcode }
    }

    /// The shared registry, loading it on first access
    #[must_use]
    pub fn global() -> &'static Self {
        &REGISTRY
    }

    /// Resolve every identifier of an expression.
    ///
    /// Never fails: unknown identifiers become custom licenses. `NONE` and
    /// `NOASSERTION` resolve to nothing.
    #[must_use]
    pub fn resolve(&self, expr: &str, custom: &[License]) -> Vec<License> {
        if expression::is_absent(expr) {
            return Vec::new();
        }
        expression::tokens(expr)
            .iter()
            .map(|token| self.lookup(token, custom))
            .collect()
    }

    /// Resolve a single identifier
    #[must_use]
    pub fn lookup(&self, token: &str, custom: &[License]) -> License {
        let key = expression::lookup_key(token);
        if let Some(lic) = self.lookup_spdx(token, key) {
            return lic;
        }
        if let Some(lic) = lookup_exception(token, key) {
            return lic;
        }
        if let Some(entry) = self.aboutcode.find(key) {
            return from_aboutcode(token, entry);
        }
        if let Some(lic) = custom
            .iter()
            .find(|c| c.short_id().eq_ignore_ascii_case(key) || c.short_id() == token)
        {
            return lic.clone();
        }
        tracing::debug!(token, "license not found in any registry");
        License::custom(token, token)
    }

    /// SPDX license list lookup with the AboutCode restrictive overlay applied
    fn lookup_spdx(&self, token: &str, key: &str) -> Option<License> {
        let id = spdx::license_id(key).or_else(|| {
            spdx::imprecise_license_id(key)
                .map(|(id, _)| id)
                .filter(|id| id.name.eq_ignore_ascii_case(key))
        })?;

        let osi_approved = id.is_osi_approved();
        let fsf_libre = id.is_fsf_free_libre();
        let mut lic = License {
            name: id.full_name.to_string(),
            short_id: display_id(token, id.name),
            source: LicenseSource::Spdx,
            deprecated: id.is_deprecated(),
            osi_approved,
            fsf_libre,
            restrictive: false,
            exception: false,
            free_any_use: !id.is_copyleft() && (osi_approved || fsf_libre),
        };
        if self
            .aboutcode
            .find_by_spdx(id.name)
            .is_some_and(AboutCodeEntry::is_restrictive)
        {
            lic.restrictive = true;
        }
        Some(lic)
    }
}

fn lookup_exception(token: &str, key: &str) -> Option<License> {
    let exc = spdx::exception_id(key)?;
    Some(License {
        name: exc.name.to_string(),
        short_id: display_id(token, exc.name),
        source: LicenseSource::Spdx,
        deprecated: exc.is_deprecated(),
        osi_approved: false,
        fsf_libre: false,
        restrictive: false,
        exception: true,
        free_any_use: false,
    })
}

fn from_aboutcode(token: &str, entry: &AboutCodeEntry) -> License {
    License {
        name: entry.short_name.clone(),
        short_id: token.to_string(),
        source: LicenseSource::AboutCode,
        deprecated: entry.is_deprecated,
        osi_approved: false,
        fsf_libre: false,
        restrictive: entry.is_restrictive(),
        exception: entry.is_exception,
        free_any_use: entry.is_free_any_use(),
    }
}

/// Canonical registry id, keeping an `or-later` suffix the token carried
fn display_id(token: &str, canonical: &str) -> String {
    if token.trim_end().ends_with('+') {
        format!("{canonical}+")
    } else {
        canonical.to_string()
    }
}

/// Force the one-time registry load
pub fn init() {
    LazyLock::force(&REGISTRY);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(lics: &[License]) -> Vec<&str> {
        lics.iter().map(License::short_id).collect()
    }

    #[test]
    fn test_resolve_and_expression() {
        let lics = LicenseRegistry::global().resolve("MIT AND Apache-2.0", &[]);
        assert_eq!(ids(&lics), vec!["Apache-2.0", "MIT"]);
        assert!(lics.iter().all(License::is_spdx));
    }

    #[test]
    fn test_none_and_noassertion_are_empty() {
        let reg = LicenseRegistry::global();
        assert!(reg.resolve("NONE", &[]).is_empty());
        assert!(reg.resolve("noassertion", &[]).is_empty());
        assert!(reg.resolve("(NOASSERTION)", &[]).is_empty());
    }

    #[test]
    fn test_plus_kept_for_display_only() {
        let lic = LicenseRegistry::global().lookup("LGPL-2.1+", &[]);
        assert!(lic.is_spdx());
        assert_eq!(lic.short_id(), "LGPL-2.1+");
    }

    #[test]
    fn test_exception_resolution() {
        let lics = LicenseRegistry::global()
            .resolve("GPL-2.0-or-later WITH Classpath-exception-2.0", &[]);
        let exc = lics
            .iter()
            .find(|l| l.short_id() == "Classpath-exception-2.0")
            .expect("exception resolved");
        assert!(exc.is_exception());
    }

    #[test]
    fn test_aboutcode_overlay_only_flips_restrictive() {
        let gpl = LicenseRegistry::global().lookup("GPL-3.0-only", &[]);
        assert!(gpl.is_spdx());
        assert!(gpl.is_restrictive());
        assert!(gpl.is_osi_approved());

        let mit = LicenseRegistry::global().lookup("MIT", &[]);
        assert!(!mit.is_restrictive());
        assert!(mit.is_free_any_use());
    }

    #[test]
    fn test_aboutcode_only_license() {
        let lic = LicenseRegistry::global().lookup("LicenseRef-scancode-proprietary-license", &[]);
        assert!(lic.is_aboutcode());
        assert!(lic.is_restrictive());
    }

    #[test]
    fn test_custom_list_then_synthesized() {
        let custom = vec![License::custom("Acme Internal", "LicenseRef-acme")];
        let reg = LicenseRegistry::global();
        let lic = reg.lookup("LicenseRef-acme", &custom);
        assert_eq!(lic.name(), "Acme Internal");

        let lic = reg.lookup("Totally-Made-Up", &custom);
        assert!(lic.is_custom());
        assert_eq!(lic.name(), "Totally-Made-Up");
        assert_eq!(lic.short_id(), "Totally-Made-Up");
    }
}
