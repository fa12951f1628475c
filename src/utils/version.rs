//! Version comparison utilities.
//!
//! Spec versions in SBOMs are rarely full semver (`1.6`, `SPDX-2.3`), so
//! comparison pads them to three components before handing them to `semver`.

use semver::Version;
use std::cmp::Ordering;

/// Parse `1`, `1.6` or `1.6.0` (optionally `v`-prefixed) as a semver version
#[must_use]
pub fn parse_lenient(version: &str) -> Option<Version> {
    let trimmed = version.trim().trim_start_matches(['v', 'V']);
    if let Ok(v) = Version::parse(trimmed) {
        return Some(v);
    }
    let parts: Vec<&str> = trimmed.split('.').collect();
    let padded = match parts.len() {
        1 => format!("{}.0.0", parts[0]),
        2 => format!("{}.{}.0", parts[0], parts[1]),
        _ => return None,
    };
    Version::parse(&padded).ok()
}

/// Compare two version strings
#[must_use]
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    // Try semver comparison first
    if let (Some(ver_a), Some(ver_b)) = (parse_lenient(a), parse_lenient(b)) {
        return ver_a.cmp(&ver_b);
    }

    // Fall back to string comparison
    a.cmp(b)
}

/// Whether `version` is at least `minimum`; unparsable versions never are
#[must_use]
pub fn version_at_least(version: &str, minimum: &str) -> bool {
    match (parse_lenient(version), parse_lenient(minimum)) {
        (Some(v), Some(min)) => v >= min,
        _ => false,
    }
}

/// Strip the `SPDX-` prefix and surrounding noise from a declared spec version
#[must_use]
pub fn normalize_spec_version(raw: &str) -> String {
    let trimmed = raw.trim();
    let without_prefix = trimmed
        .strip_prefix("SPDX-")
        .or_else(|| trimmed.strip_prefix("spdx-"))
        .unwrap_or(trimmed);
    without_prefix.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_versions() {
        assert_eq!(compare_versions("1.0.0", "1.0.1"), Ordering::Less);
        assert_eq!(compare_versions("1.0.1", "1.0.0"), Ordering::Greater);
        assert_eq!(compare_versions("1.0.0", "1.0.0"), Ordering::Equal);
        assert_eq!(compare_versions("1.6", "1.5"), Ordering::Greater);
    }

    #[test]
    fn test_version_at_least() {
        assert!(version_at_least("2.3", "2.2.1"));
        assert!(!version_at_least("2.2", "2.2.1"));
        assert!(version_at_least("1.5", "1.5"));
        assert!(!version_at_least("garbage", "1.0"));
    }

    #[test]
    fn test_normalize_spec_version() {
        assert_eq!(normalize_spec_version("SPDX-2.3"), "2.3");
        assert_eq!(normalize_spec_version(" 1.6 "), "1.6");
    }
}
