//! Configuration module for sbom-score.
//!
//! This module provides:
//! - The category -> feature -> enabled scoring mapping
//! - Validation against the registered check catalogue
//! - Named presets for common compliance targets
//! - YAML config file loading and discovery
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use sbom_score::config::{load_or_default, ConfigPreset, ScoringConfig};
//!
//! // Use a preset
//! let config = ScoringConfig::from_preset(ConfigPreset::Ntia);
//!
//! // Load from file
//! let (config, loaded_from) = load_or_default(None);
//! let filter = config.to_filter();
//! ```
//!
//! # Configuration File
//!
//! Place a `.sbom-score.yaml` file in your project root or `~/.config/sbom-score/`:
//!
//! ```yaml
//! categories:
//!   - name: NTIA-minimum-elements
//!     features:
//!       - name: comp_with_supplier
//!         enabled: false
//!   - name: Sharing
//! ```

mod defaults;
pub mod file;
mod types;
mod validation;

pub use defaults::ConfigPreset;
pub use types::{CategoryConfig, FeatureConfig, ScoringConfig};
pub use validation::{ConfigError, Validatable};

pub use file::{
    discover_config_file, generate_example_config, load_config_file, load_or_default,
    ConfigFileError,
};
