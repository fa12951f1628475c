//! Evaluation of a selected check set against one document.

use super::check::Check;
use super::filter::CheckFilter;
use super::registry::CheckRegistry;
use super::result::{CheckResult, ScoreReport};
use crate::model::Document;

/// Scores documents against the checks a filter selects
#[derive(Debug, Clone)]
pub struct Scorer<'r> {
    registry: &'r CheckRegistry,
    filter: CheckFilter,
}

impl Default for Scorer<'static> {
    fn default() -> Self {
        Self::new(CheckFilter::All)
    }
}

impl Scorer<'static> {
    /// Scorer over the built-in catalogue
    #[must_use]
    pub fn new(filter: CheckFilter) -> Self {
        Self {
            registry: CheckRegistry::builtin(),
            filter,
        }
    }
}

impl<'r> Scorer<'r> {
    #[must_use]
    pub const fn with_registry(registry: &'r CheckRegistry, filter: CheckFilter) -> Self {
        Self { registry, filter }
    }

    #[must_use]
    pub const fn filter(&self) -> &CheckFilter {
        &self.filter
    }

    /// Evaluate every selected check
    ///
    /// A failing predicate is recorded on its own result and excluded from
    /// the average; the remaining checks still run.
    pub fn score(&self, doc: &Document) -> ScoreReport {
        let results: Vec<CheckResult> = self
            .registry
            .select(&self.filter)
            .map(|check| evaluate(check, doc))
            .collect();
        let report = ScoreReport::from_results(results);

        tracing::info!(
            checks = report.count,
            scored = report.scored_count(),
            average = report.average_score,
            grade = report.grade.letter(),
            "scored SBOM"
        );
        report
    }
}

fn evaluate(check: &Check, doc: &Document) -> CheckResult {
    let pass_fail = check.is_pass_fail();
    match check.evaluate(doc) {
        Ok(eval) => CheckResult {
            category: check.category,
            key: check.key.to_string(),
            score: eval.score,
            ignored: eval.ignored,
            description: eval.description,
            error: None,
            pass_fail: (pass_fail && !eval.ignored).then_some(eval.score >= 10.0),
        },
        Err(err) => {
            tracing::warn!(category = %check.category, key = check.key, error = %err, "check failed");
            CheckResult {
                category: check.category,
                key: check.key.to_string(),
                score: 0.0,
                ignored: true,
                description: check.description.to_string(),
                error: Some(err.to_string()),
                pass_fail: pass_fail.then_some(false),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SbomScoreError;
    use crate::model::{Component, DocumentBuilder, FileFormat, Spec, SpecFormat};
    use crate::scorer::check::{Category, Evaluation};

    fn doc(components: usize) -> Document {
        let mut b = DocumentBuilder::new(Spec::new(SpecFormat::CycloneDx, "1.6", FileFormat::Json));
        for i in 0..components {
            b.add_component(Component::new(format!("c{i}"), format!("c{i}")));
        }
        b.build()
    }

    #[test]
    fn test_failing_check_is_isolated() {
        let registry = CheckRegistry::new(vec![
            Check::new(Category::Quality, "boom", "always fails", |_| {
                Err(SbomScoreError::check("boom", "predicate failed"))
            }),
            Check::new(Category::Quality, "ok", "always passes", |_| {
                Ok(Evaluation::boolean(true, "fine"))
            }),
        ])
        .expect("unique keys");
        let report = Scorer::with_registry(&registry, CheckFilter::All).score(&doc(1));

        assert_eq!(report.count, 2);
        let boom = &report.results[0];
        assert!(boom.error.as_deref().is_some_and(|e| e.contains("predicate failed")));
        assert!(boom.ignored);
        assert_eq!(report.average_score, 10.0);
    }

    #[test]
    fn test_zero_components_never_nan() {
        let filter = CheckFilter::Categories(vec![Category::Semantic]);
        let report = Scorer::new(filter).score(&doc(0));
        assert!(report.average_score.is_finite());
        assert!(report
            .results
            .iter()
            .filter(|r| r.key.starts_with("comp_"))
            .all(|r| r.ignored));
    }

    #[test]
    fn test_pass_fail_only_for_scvs() {
        let report = Scorer::new(CheckFilter::Categories(vec![Category::ScvsL1, Category::Ntia]))
            .score(&doc(2));
        for r in &report.results {
            if r.category == Category::Ntia {
                assert!(r.pass_fail.is_none());
            } else if !r.ignored {
                assert!(r.pass_fail.is_some(), "{} has no verdict", r.key);
            }
        }
    }

    #[test]
    fn test_evaluation_order_is_irrelevant() {
        let d = doc(3);
        let forward = Scorer::default().score(&d);
        let mut reversed: Vec<Check> = CheckRegistry::builtin().checks().to_vec();
        reversed.reverse();
        let registry = CheckRegistry::new(reversed).expect("unique keys");
        let backward = Scorer::with_registry(&registry, CheckFilter::All).score(&d);
        assert!((forward.average_score - backward.average_score).abs() < 1e-9);
    }
}
