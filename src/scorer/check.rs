//! Check definitions: categories, predicates and their evaluations.

use crate::error::{Result, SbomScoreError};
use crate::model::{Component, Document};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named group of checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Category {
    Structural,
    #[serde(rename = "NTIA-minimum-elements")]
    Ntia,
    Semantic,
    Quality,
    Sharing,
    #[serde(rename = "bsi-v1.1")]
    BsiV1,
    #[serde(rename = "bsi-v2.0")]
    BsiV2,
    #[serde(rename = "SCVS-L1")]
    ScvsL1,
    #[serde(rename = "SCVS-L2")]
    ScvsL2,
    #[serde(rename = "SCVS-L3")]
    ScvsL3,
}

impl Category {
    /// Display name, also accepted in config files and on the command line
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Structural => "Structural",
            Self::Ntia => "NTIA-minimum-elements",
            Self::Semantic => "Semantic",
            Self::Quality => "Quality",
            Self::Sharing => "Sharing",
            Self::BsiV1 => "bsi-v1.1",
            Self::BsiV2 => "bsi-v2.0",
            Self::ScvsL1 => "SCVS-L1",
            Self::ScvsL2 => "SCVS-L2",
            Self::ScvsL3 => "SCVS-L3",
        }
    }

    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Structural => "Spec, version and encoding are recognized and well-formed",
            Self::Ntia => "NTIA minimum elements for software transparency",
            Self::Semantic => "Spec-mandated fields and core component attributes",
            Self::Quality => "License validity, identifiers and provenance quality",
            Self::Sharing => "Document can be shared under its data license",
            Self::BsiV1 => "BSI TR-03183-2 v1.1",
            Self::BsiV2 => "BSI TR-03183-2 v2.0",
            Self::ScvsL1 => "OWASP SCVS SBOM maturity level 1",
            Self::ScvsL2 => "OWASP SCVS SBOM maturity level 2",
            Self::ScvsL3 => "OWASP SCVS SBOM maturity level 3",
        }
    }

    /// SCVS levels report pass/fail instead of a graded score
    #[must_use]
    pub const fn is_pass_fail(&self) -> bool {
        matches!(self, Self::ScvsL1 | Self::ScvsL2 | Self::ScvsL3)
    }

    #[must_use]
    pub const fn all() -> &'static [Category] {
        &[
            Self::Structural,
            Self::Ntia,
            Self::Semantic,
            Self::Quality,
            Self::Sharing,
            Self::BsiV1,
            Self::BsiV2,
            Self::ScvsL1,
            Self::ScvsL2,
            Self::ScvsL3,
        ]
    }

    /// Case-insensitive lookup by name or short alias
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let wanted = name.trim().to_ascii_lowercase();
        let alias = match wanted.as_str() {
            "ntia" => Some(Self::Ntia),
            "bsi" | "bsi-v1" => Some(Self::BsiV1),
            "bsi-v2" => Some(Self::BsiV2),
            _ => None,
        };
        alias.or_else(|| {
            Self::all()
                .iter()
                .copied()
                .find(|c| c.name().eq_ignore_ascii_case(&wanted))
        })
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = SbomScoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s).ok_or_else(|| SbomScoreError::config(format!("unknown category '{s}'")))
    }
}

/// Outcome of one predicate
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// 0.0 to 10.0
    pub score: f64,
    /// Not applicable; excluded from the average
    pub ignored: bool,
    pub description: String,
}

impl Evaluation {
    /// Document-level boolean: 10 or 0
    #[must_use]
    pub fn boolean(ok: bool, description: impl Into<String>) -> Self {
        Self {
            score: if ok { 10.0 } else { 0.0 },
            ignored: false,
            description: description.into(),
        }
    }

    /// `have / total * 10`; ignored with a zero score when `total == 0`
    #[must_use]
    pub fn ratio(have: usize, total: usize, description: impl Into<String>) -> Self {
        if total == 0 {
            return Self::not_applicable(description);
        }
        Self {
            score: have as f64 / total as f64 * 10.0,
            ignored: false,
            description: description.into(),
        }
    }

    #[must_use]
    pub fn not_applicable(description: impl Into<String>) -> Self {
        Self {
            score: 0.0,
            ignored: true,
            description: description.into(),
        }
    }

    /// Share of components satisfying `pred`
    #[must_use]
    pub fn components(doc: &Document, pred: impl Fn(&Component) -> bool) -> Self {
        let total = doc.components().len();
        let have = doc.components().iter().filter(|&c| pred(c)).count();
        Self::ratio(have, total, format!("{have}/{total} comps"))
    }

    /// Share of components NOT satisfying `pred` (for checks that count defects)
    #[must_use]
    pub fn components_without(doc: &Document, pred: impl Fn(&Component) -> bool) -> Self {
        let total = doc.components().len();
        let bad = doc.components().iter().filter(|&c| pred(c)).count();
        Self::ratio(total - bad, total, format!("{bad}/{total} comps"))
    }

    /// Pass only when every component satisfies `pred`; ignored without components
    #[must_use]
    pub fn all_components(doc: &Document, pred: impl Fn(&Component) -> bool) -> Self {
        let total = doc.components().len();
        if total == 0 {
            return Self::not_applicable("no components");
        }
        let have = doc.components().iter().filter(|&c| pred(c)).count();
        Self::boolean(have == total, format!("{have}/{total} comps"))
    }
}

/// Predicate over a document; must not observe anything but its argument
pub type CheckFn = fn(&Document) -> Result<Evaluation>;

/// A registered scoring predicate
#[derive(Debug, Clone, Copy)]
pub struct Check {
    pub category: Category,
    pub key: &'static str,
    pub description: &'static str,
    eval: CheckFn,
}

impl Check {
    #[must_use]
    pub const fn new(
        category: Category,
        key: &'static str,
        description: &'static str,
        eval: CheckFn,
    ) -> Self {
        Self {
            category,
            key,
            description,
            eval,
        }
    }

    /// Run the predicate; errors are returned, never panicked on
    pub fn evaluate(&self, doc: &Document) -> Result<Evaluation> {
        (self.eval)(doc)
    }

    #[must_use]
    pub const fn is_pass_fail(&self) -> bool {
        self.category.is_pass_fail()
    }
}
