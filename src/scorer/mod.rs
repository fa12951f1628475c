//! Rule/check scoring engine.
//!
//! A [`Check`] is a `(category, key, predicate)` triple. The
//! [`CheckRegistry`] holds the built-in catalogue, a [`CheckFilter`] selects
//! all checks, whole categories or individual features, and the [`Scorer`]
//! evaluates the selection into a [`ScoreReport`].
//!
//! Per-component checks score `have / total * 10` and are marked ignored
//! when there is nothing to count; ignored checks are left out of the
//! average entirely.
//!
//! ```no_run
//! use sbom_score::parsers::parse_sbom;
//! use sbom_score::scorer::{score, CheckFilter};
//! use std::path::Path;
//!
//! let doc = parse_sbom(Path::new("sbom.json")).unwrap();
//! let report = score(&doc, &CheckFilter::All);
//! println!("{:.1} ({})", report.average_score, report.grade.letter());
//! ```

mod check;
mod checks;
mod engine;
mod filter;
mod registry;
mod result;

pub use check::{Category, Check, CheckFn, Evaluation};
pub use engine::Scorer;
pub use filter::{CheckFilter, FeatureSelector};
pub use registry::CheckRegistry;
pub use result::{CheckResult, ScoreGrade, ScoreReport};

use crate::model::Document;

/// Score a document with the built-in catalogue
pub fn score(doc: &Document, filter: &CheckFilter) -> ScoreReport {
    Scorer::new(filter.clone()).score(doc)
}
