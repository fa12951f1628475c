//! Scoring configuration types.
//!
//! The file format is a category -> feature -> enabled mapping:
//!
//! ```yaml
//! categories:
//!   - name: Structural
//!     enabled: true
//!     features:
//!       - name: sbom_spec
//!         enabled: true
//! ```

use crate::error::{Result, SbomScoreError};
use crate::scorer::{Category, CheckFilter, CheckRegistry, FeatureSelector};
use serde::{Deserialize, Serialize};

const fn enabled() -> bool {
    true
}

/// One check toggle inside a category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureConfig {
    pub name: String,
    #[serde(default = "enabled")]
    pub enabled: bool,
}

impl FeatureConfig {
    #[must_use]
    pub fn new(name: impl Into<String>, enabled: bool) -> Self {
        Self {
            name: name.into(),
            enabled,
        }
    }
}

/// A category toggle; an empty feature list means every check in the category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryConfig {
    pub name: String,
    #[serde(default = "enabled")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<FeatureConfig>,
}

impl CategoryConfig {
    /// Every registered check of `category`, enabled
    #[must_use]
    pub fn from_registry(category: Category, registry: &CheckRegistry) -> Self {
        Self {
            name: category.name().to_string(),
            enabled: true,
            features: registry
                .in_category(category)
                .map(|c| FeatureConfig::new(c.key, true))
                .collect(),
        }
    }

    pub fn category(&self) -> Result<Category> {
        self.name.parse()
    }
}

/// Root of a scoring config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default)]
    pub categories: Vec<CategoryConfig>,
}

impl ScoringConfig {
    /// Translate the mapping into the engine's filter
    ///
    /// Disabled categories drop all their checks and disabled features drop
    /// that single check. An empty category list selects everything.
    pub fn to_filter(&self) -> Result<CheckFilter> {
        if self.categories.is_empty() {
            return Ok(CheckFilter::All);
        }
        let registry = CheckRegistry::builtin();
        let mut selectors = Vec::new();
        for cat_config in &self.categories {
            let category = cat_config
                .category()
                .map_err(|e| SbomScoreError::config(format!("categories: {e}")))?;
            if !cat_config.enabled {
                continue;
            }
            if cat_config.features.is_empty() {
                selectors.extend(
                    registry
                        .in_category(category)
                        .map(|c| FeatureSelector::new(Some(category), c.key)),
                );
                continue;
            }
            selectors.extend(
                cat_config
                    .features
                    .iter()
                    .filter(|f| f.enabled)
                    .map(|f| FeatureSelector::new(Some(category), f.name.trim())),
            );
        }
        tracing::debug!(selected = selectors.len(), "config translated to feature filter");
        Ok(CheckFilter::Features(selectors))
    }

    #[must_use]
    pub fn category(&self, category: Category) -> Option<&CategoryConfig> {
        self.categories
            .iter()
            .find(|c| c.category().ok() == Some(category))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_shape() {
        let yaml = r"
categories:
  - name: Structural
    features:
      - name: sbom_spec
      - name: sbom_parsable
        enabled: false
  - name: NTIA-minimum-elements
    enabled: false
";
        let config: ScoringConfig = serde_yaml::from_str(yaml).expect("valid yaml");
        assert_eq!(config.categories.len(), 2);
        assert!(config.categories[0].enabled);
        assert!(config.categories[0].features[0].enabled);
        assert!(!config.categories[0].features[1].enabled);
        assert!(!config.categories[1].enabled);
    }

    #[test]
    fn test_to_filter_drops_disabled() {
        let config = ScoringConfig {
            categories: vec![
                CategoryConfig {
                    name: "Structural".to_string(),
                    enabled: true,
                    features: vec![
                        FeatureConfig::new("sbom_spec", true),
                        FeatureConfig::new("sbom_parsable", false),
                    ],
                },
                CategoryConfig {
                    name: "ntia".to_string(),
                    enabled: false,
                    features: Vec::new(),
                },
            ],
        };
        let filter = config.to_filter().expect("valid config");
        let selected: Vec<_> = CheckRegistry::builtin().select(&filter).collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].key, "sbom_spec");
    }

    #[test]
    fn test_category_without_features_selects_all_of_it() {
        let config = ScoringConfig {
            categories: vec![CategoryConfig {
                name: "Semantic".to_string(),
                enabled: true,
                features: Vec::new(),
            }],
        };
        let filter = config.to_filter().expect("valid config");
        assert_eq!(CheckRegistry::builtin().select(&filter).count(), 3);
    }

    #[test]
    fn test_unknown_category_is_an_error() {
        let config = ScoringConfig {
            categories: vec![CategoryConfig {
                name: "Vibes".to_string(),
                enabled: true,
                features: Vec::new(),
            }],
        };
        assert!(config.to_filter().is_err());
    }
}
