//! **SBOM quality and compliance scoring.**
//!
//! `sbom-score` reads a Software Bill of Materials in any common encoding,
//! normalizes it into one [`Document`] model and scores it against a catalogue
//! of checks: structural soundness, NTIA minimum elements, semantic and quality
//! checks, sharability, BSI TR-03183-2 (v1.1 and v2.0) and the OWASP SCVS
//! maturity levels.
//!
//! ## Supported inputs
//!
//! - **SPDX 2.1 - 2.3**: JSON, YAML, tag-value and RDF/XML
//! - **SPDX 3.0 / 3.0.1**: JSON-LD
//! - **CycloneDX 1.0 - 1.6**: JSON and XML
//!
//! The format is detected from content, never from the file name.
//!
//! ## Core Concepts & Modules
//!
//! - **[`parsers`]**: format sniffing ([`parsers::Sniffer`]) and one adapter per
//!   spec family, all producing a [`Document`].
//! - **[`model`]**: the normalized document, component, license and identifier
//!   types.
//! - **[`licenses`]**: process-wide SPDX / AboutCode license tables and the
//!   expression resolver.
//! - **[`validation`]**: the schema validator collaborator feeding the
//!   `sbom_parsable` check.
//! - **[`scorer`]**: the check registry, filters and the scoring engine.
//! - **[`config`]**: YAML category/feature selection files.
//!
//! ## Getting Started
//!
//! ```no_run
//! use std::path::Path;
//! use sbom_score::{parse_sbom, score, CheckFilter};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let doc = parse_sbom(Path::new("path/to/your/sbom.json"))?;
//!     let report = score(&doc, &CheckFilter::All);
//!
//!     println!("{:.1}/10 ({})", report.average_score, report.grade.letter());
//!     for result in report.results.iter().filter(|r| r.is_scored()) {
//!         println!("  {:<12} {:<36} {:.1}", result.category, result.key, result.score);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ### Scoring a subset
//!
//! ```no_run
//! use std::path::Path;
//! use sbom_score::{parse_sbom, Category, CheckFilter, Scorer};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let doc = parse_sbom(Path::new("sbom.spdx"))?;
//!     let ntia = Scorer::new(CheckFilter::Categories(vec![Category::Ntia])).score(&doc);
//!     println!("NTIA: {:.1}", ntia.average_score);
//!     Ok(())
//! }
//! ```

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
// Pedantic lints: allow categories that are design choices for this codebase
#![allow(
    // Ratios over component counts: usize -> f64 casts are bounded in practice
    clippy::cast_precision_loss,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::struct_excessive_bools,
    clippy::similar_names
)]

pub mod cli;
pub mod config;
pub mod error;
pub mod licenses;
pub mod model;
pub mod parsers;
pub mod scorer;
pub mod utils;
pub mod validation;

// Re-export main types for convenience
pub use config::{ConfigError, ConfigPreset, ScoringConfig, Validatable};
pub use error::{ErrorContext, Result, SbomScoreError};
pub use model::{Component, Document, FileFormat, SpecFormat};
pub use parsers::{detect, parse_bytes, parse_reader, parse_sbom, FormatTriple, SbomParser};
pub use scorer::{
    score, Category, CheckFilter, CheckRegistry, CheckResult, FeatureSelector, ScoreGrade,
    ScoreReport, Scorer,
};
pub use validation::{BuiltinSchemaValidator, SchemaOutcome, SchemaValidator};
