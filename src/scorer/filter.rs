//! Check selection.

use super::check::{Category, Check};
use crate::error::{Result, SbomScoreError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One named check, optionally pinned to a category (`bsi-v1.1/comp_with_name`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeatureSelector {
    pub category: Option<Category>,
    pub key: String,
}

impl FeatureSelector {
    #[must_use]
    pub fn new(category: Option<Category>, key: impl Into<String>) -> Self {
        Self {
            category,
            key: key.into(),
        }
    }

    #[must_use]
    pub fn matches(&self, check: &Check) -> bool {
        check.key.eq_ignore_ascii_case(&self.key)
            && self.category.map_or(true, |c| c == check.category)
    }
}

impl FromStr for FeatureSelector {
    type Err = SbomScoreError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(SbomScoreError::config("empty feature name"));
        }
        match s.rsplit_once('/') {
            Some((category, key)) => Ok(Self::new(Some(category.parse()?), key.trim())),
            None => Ok(Self::new(None, s)),
        }
    }
}

impl fmt::Display for FeatureSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.category {
            Some(category) => write!(f, "{category}/{}", self.key),
            None => f.write_str(&self.key),
        }
    }
}

/// Which checks an evaluation runs; the three modes are mutually exclusive
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckFilter {
    #[default]
    All,
    Categories(Vec<Category>),
    Features(Vec<FeatureSelector>),
}

impl CheckFilter {
    /// Build a filter from command-line style selections
    ///
    /// Features take precedence over categories; neither means all checks.
    pub fn from_selection(categories: &[String], features: &[String]) -> Result<Self> {
        if !features.is_empty() {
            let selectors = features
                .iter()
                .map(|f| f.parse())
                .collect::<Result<Vec<FeatureSelector>>>()?;
            return Ok(Self::Features(selectors));
        }
        if !categories.is_empty() {
            let cats = categories
                .iter()
                .map(|c| c.parse())
                .collect::<Result<Vec<Category>>>()?;
            return Ok(Self::Categories(cats));
        }
        Ok(Self::All)
    }

    #[must_use]
    pub fn matches(&self, check: &Check) -> bool {
        match self {
            Self::All => true,
            Self::Categories(cats) => cats.contains(&check.category),
            Self::Features(selectors) => selectors.iter().any(|s| s.matches(check)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scorer::check::Evaluation;

    fn check(category: Category, key: &'static str) -> Check {
        Check::new(category, key, "", |_| Ok(Evaluation::boolean(true, "")))
    }

    #[test]
    fn test_feature_selector_parsing() {
        let s: FeatureSelector = "comp_with_name".parse().expect("plain key");
        assert_eq!(s, FeatureSelector::new(None, "comp_with_name"));

        let s: FeatureSelector = "bsi-v1.1/comp_with_name".parse().expect("pinned key");
        assert_eq!(s.category, Some(Category::BsiV1));
        assert_eq!(s.to_string(), "bsi-v1.1/comp_with_name");

        assert!("nope/comp_with_name".parse::<FeatureSelector>().is_err());
        assert!("  ".parse::<FeatureSelector>().is_err());
    }

    #[test]
    fn test_filter_modes() {
        let ntia = check(Category::Ntia, "comp_with_name");
        let bsi = check(Category::BsiV1, "comp_with_name");

        assert!(CheckFilter::All.matches(&ntia));

        let cats = CheckFilter::Categories(vec![Category::BsiV1]);
        assert!(!cats.matches(&ntia));
        assert!(cats.matches(&bsi));

        let unpinned = CheckFilter::Features(vec![FeatureSelector::new(None, "comp_with_name")]);
        assert!(unpinned.matches(&ntia) && unpinned.matches(&bsi));

        let pinned = CheckFilter::Features(vec![FeatureSelector::new(Some(Category::Ntia), "comp_with_name")]);
        assert!(pinned.matches(&ntia));
        assert!(!pinned.matches(&bsi));
    }

    #[test]
    fn test_from_selection_precedence() {
        let f = CheckFilter::from_selection(&["ntia".into()], &["sbom_spec".into()]).expect("valid");
        assert!(matches!(f, CheckFilter::Features(_)));
        let f = CheckFilter::from_selection(&["ntia".into()], &[]).expect("valid");
        assert_eq!(f, CheckFilter::Categories(vec![Category::Ntia]));
        assert_eq!(CheckFilter::from_selection(&[], &[]).expect("valid"), CheckFilter::All);
        assert!(CheckFilter::from_selection(&["bogus".into()], &[]).is_err());
    }
}
