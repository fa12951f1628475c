//! Scorer output.

use super::check::Category;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Letter grade derived from the 0-10 average
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ScoreGrade {
    /// Excellent: 9.0-10
    A,
    /// Good: 8.0-8.9
    B,
    /// Fair: 7.0-7.9
    C,
    /// Poor: 6.0-6.9
    D,
    /// Failing: <6.0
    F,
}

impl ScoreGrade {
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if !score.is_finite() {
            return Self::F;
        }
        match (score * 10.0) as u32 {
            90..=100 => Self::A,
            80..=89 => Self::B,
            70..=79 => Self::C,
            60..=69 => Self::D,
            _ => Self::F,
        }
    }

    #[must_use]
    pub const fn letter(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        }
    }

    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::A => "Excellent",
            Self::B => "Good",
            Self::C => "Fair",
            Self::D => "Poor",
            Self::F => "Failing",
        }
    }
}

/// Result of one check against one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub category: Category,
    pub key: String,
    pub score: f64,
    pub ignored: bool,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Pass/fail verdict for SCVS checks; `None` for graded checks
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pass_fail: Option<bool>,
}

impl CheckResult {
    /// Whether the result counts towards the average
    #[must_use]
    pub fn is_scored(&self) -> bool {
        !self.ignored && self.error.is_none()
    }
}

/// Aggregate score of one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[must_use]
pub struct ScoreReport {
    /// Number of checks evaluated, ignored ones included
    pub count: usize,
    /// Mean of the non-ignored scores; 0.0 when none apply
    pub average_score: f64,
    pub grade: ScoreGrade,
    pub results: Vec<CheckResult>,
}

impl ScoreReport {
    pub fn from_results(results: Vec<CheckResult>) -> Self {
        let average_score = mean(results.iter().filter(|r| r.is_scored()).map(|r| r.score));
        Self {
            count: results.len(),
            average_score,
            grade: ScoreGrade::from_score(average_score),
            results,
        }
    }

    /// Number of checks that contributed to the average
    #[must_use]
    pub fn scored_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_scored()).count()
    }

    /// Per-category averages in first-seen order
    #[must_use]
    pub fn category_scores(&self) -> IndexMap<Category, f64> {
        let mut grouped: IndexMap<Category, Vec<f64>> = IndexMap::new();
        for result in &self.results {
            let entry = grouped.entry(result.category).or_default();
            if result.is_scored() {
                entry.push(result.score);
            }
        }
        grouped
            .into_iter()
            .map(|(category, scores)| (category, mean(scores.into_iter())))
            .collect()
    }

    #[must_use]
    pub fn results_in(&self, category: Category) -> Vec<&CheckResult> {
        self.results
            .iter()
            .filter(|r| r.category == category)
            .collect()
    }
}

fn mean(scores: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = scores.fold((0.0, 0usize), |(sum, n), s| (sum + s, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}
