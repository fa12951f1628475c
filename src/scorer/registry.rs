//! Check registry.

use super::check::{Category, Check};
use super::checks;
use super::filter::CheckFilter;
use crate::error::{Result, SbomScoreError};
use indexmap::IndexSet;
use std::collections::HashSet;
use std::sync::LazyLock;

static BUILTIN: LazyLock<CheckRegistry> = LazyLock::new(|| CheckRegistry {
    checks: checks::all(),
});

/// Ordered set of checks, unique by `(category, key)`
#[derive(Debug, Clone)]
pub struct CheckRegistry {
    checks: Vec<Check>,
}

impl CheckRegistry {
    /// Build a registry, rejecting duplicate `(category, key)` pairs
    pub fn new(checks: Vec<Check>) -> Result<Self> {
        let mut seen = HashSet::new();
        for check in &checks {
            if !seen.insert((check.category, check.key)) {
                return Err(SbomScoreError::config(format!(
                    "duplicate check {}/{}",
                    check.category, check.key
                )));
            }
        }
        Ok(Self { checks })
    }

    /// Process-wide built-in catalogue
    #[must_use]
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }

    #[must_use]
    pub fn checks(&self) -> &[Check] {
        &self.checks
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    pub fn select<'a>(&'a self, filter: &'a CheckFilter) -> impl Iterator<Item = &'a Check> + 'a {
        self.checks.iter().filter(move |c| filter.matches(c))
    }

    #[must_use]
    pub fn get(&self, category: Category, key: &str) -> Option<&Check> {
        self.checks
            .iter()
            .find(|c| c.category == category && c.key == key)
    }

    /// Categories in registration order
    #[must_use]
    pub fn categories(&self) -> IndexSet<Category> {
        self.checks.iter().map(|c| c.category).collect()
    }

    pub fn in_category(&self, category: Category) -> impl Iterator<Item = &Check> + '_ {
        self.checks.iter().filter(move |c| c.category == category)
    }

    /// Whether any check in any category carries this key
    #[must_use]
    pub fn has_key(&self, key: &str) -> bool {
        self.checks.iter().any(|c| c.key.eq_ignore_ascii_case(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scorer::check::Evaluation;
    use crate::scorer::filter::FeatureSelector;

    #[test]
    fn test_builtin_keys_are_unique() {
        let builtin = CheckRegistry::builtin();
        assert!(CheckRegistry::new(builtin.checks().to_vec()).is_ok());
    }

    #[test]
    fn test_builtin_covers_every_category() {
        let cats = CheckRegistry::builtin().categories();
        for category in Category::all() {
            assert!(cats.contains(category), "missing {category}");
        }
    }

    #[test]
    fn test_catalogue_sizes() {
        let r = CheckRegistry::builtin();
        assert_eq!(r.in_category(Category::Structural).count(), 4);
        assert_eq!(r.in_category(Category::Ntia).count(), 7);
        assert_eq!(r.in_category(Category::Semantic).count(), 3);
        assert_eq!(r.in_category(Category::Quality).count(), 8);
        assert_eq!(r.in_category(Category::Sharing).count(), 1);
        assert_eq!(r.in_category(Category::BsiV1).count(), 16);
        assert_eq!(r.in_category(Category::BsiV2).count(), 21);
    }

    #[test]
    fn test_duplicate_rejected() {
        let check = Check::new(Category::Quality, "x", "", |_| Ok(Evaluation::boolean(true, "")));
        assert!(CheckRegistry::new(vec![check, check]).is_err());
    }

    #[test]
    fn test_select_by_feature() {
        let filter = CheckFilter::Features(vec![FeatureSelector::new(None, "comp_with_name")]);
        let selected: Vec<_> = CheckRegistry::builtin().select(&filter).collect();
        assert_eq!(selected.len(), 3);
        assert!(selected.iter().all(|c| c.key == "comp_with_name"));
    }
}
