//! Configuration validation.

use super::types::ScoringConfig;
use crate::scorer::{Category, CheckRegistry};
use std::collections::HashSet;

// ============================================================================
// Configuration Error
// ============================================================================

/// Error type for configuration validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

impl Validatable for ScoringConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.categories.is_empty() {
            errors.push(ConfigError::new("categories", "at least one category is required"));
            return errors;
        }

        let registry = CheckRegistry::builtin();
        let mut seen: HashSet<Category> = HashSet::new();
        for (i, cat_config) in self.categories.iter().enumerate() {
            let field = format!("categories[{i}]");
            let Ok(category) = cat_config.category() else {
                let valid: Vec<&str> = Category::all().iter().map(Category::name).collect();
                errors.push(ConfigError::new(
                    format!("{field}.name"),
                    format!(
                        "Unknown category '{}'. Valid options: {}",
                        cat_config.name,
                        valid.join(", ")
                    ),
                ));
                continue;
            };
            if !seen.insert(category) {
                errors.push(ConfigError::new(
                    format!("{field}.name"),
                    format!("category '{category}' listed more than once"),
                ));
            }
            for (j, feature) in cat_config.features.iter().enumerate() {
                if registry.get(category, feature.name.trim()).is_none() {
                    errors.push(ConfigError::new(
                        format!("{field}.features[{j}]"),
                        format!("'{}' is not a check in {category}", feature.name),
                    ));
                }
            }
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CategoryConfig, FeatureConfig};

    fn category(name: &str, features: &[&str]) -> CategoryConfig {
        CategoryConfig {
            name: name.to_string(),
            enabled: true,
            features: features.iter().map(|f| FeatureConfig::new(*f, true)).collect(),
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(ScoringConfig::default().is_valid());
        assert!(ScoringConfig::full().is_valid());
    }

    #[test]
    fn test_empty_config_rejected() {
        let errors = ScoringConfig { categories: Vec::new() }.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "categories");
    }

    #[test]
    fn test_unknown_names_reported_with_paths() {
        let config = ScoringConfig {
            categories: vec![
                category("Structural", &["sbom_spec", "sbom_colour"]),
                category("Vibes", &[]),
                category("structural", &[]),
            ],
        };
        let errors = config.validate();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec!["categories[0].features[1]", "categories[1].name", "categories[2].name"]
        );
    }
}
