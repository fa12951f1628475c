//! Default configuration and named presets.

use super::types::{CategoryConfig, ScoringConfig};
use crate::scorer::{Category, CheckRegistry};

// ============================================================================
// Configuration Presets
// ============================================================================

/// Named configuration presets for common compliance targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigPreset {
    /// Structural, NTIA, semantic, quality and sharing checks
    Default,
    /// NTIA minimum elements only
    Ntia,
    /// BSI TR-03183-2 v1.1
    BsiV1,
    /// BSI TR-03183-2 v2.0
    BsiV2,
    /// OWASP SCVS levels 1 to 3
    Scvs,
}

impl ConfigPreset {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Ntia => "ntia",
            Self::BsiV1 => "bsi-v1.1",
            Self::BsiV2 => "bsi-v2.0",
            Self::Scvs => "scvs",
        }
    }

    /// Parse a preset from a string name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "default" | "quality" => Some(Self::Default),
            "ntia" => Some(Self::Ntia),
            "bsi" | "bsi-v1" | "bsi-v1.1" => Some(Self::BsiV1),
            "bsi-v2" | "bsi-v2.0" => Some(Self::BsiV2),
            "scvs" => Some(Self::Scvs),
            _ => None,
        }
    }

    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Default => "General SBOM quality: structure, NTIA, semantics, quality and sharing",
            Self::Ntia => "NTIA minimum elements for software transparency",
            Self::BsiV1 => "BSI TR-03183-2 v1.1 technical guideline",
            Self::BsiV2 => "BSI TR-03183-2 v2.0 technical guideline",
            Self::Scvs => "OWASP SCVS SBOM maturity levels",
        }
    }

    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Default, Self::Ntia, Self::BsiV1, Self::BsiV2, Self::Scvs]
    }

    #[must_use]
    pub const fn categories(&self) -> &'static [Category] {
        match self {
            Self::Default => &[
                Category::Structural,
                Category::Ntia,
                Category::Semantic,
                Category::Quality,
                Category::Sharing,
            ],
            Self::Ntia => &[Category::Ntia],
            Self::BsiV1 => &[Category::BsiV1],
            Self::BsiV2 => &[Category::BsiV2],
            Self::Scvs => &[Category::ScvsL1, Category::ScvsL2, Category::ScvsL3],
        }
    }
}

impl std::fmt::Display for ConfigPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl ScoringConfig {
    /// Config enabling every check of the given categories
    #[must_use]
    pub fn for_categories(categories: &[Category]) -> Self {
        let registry = CheckRegistry::builtin();
        Self {
            categories: categories
                .iter()
                .map(|c| CategoryConfig::from_registry(*c, registry))
                .collect(),
        }
    }

    #[must_use]
    pub fn from_preset(preset: ConfigPreset) -> Self {
        Self::for_categories(preset.categories())
    }

    /// Every registered category and check, all enabled
    #[must_use]
    pub fn full() -> Self {
        let registry = CheckRegistry::builtin();
        let categories: Vec<Category> = registry.categories().into_iter().collect();
        Self::for_categories(&categories)
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self::from_preset(ConfigPreset::Default)
    }
}
