//! Score command handler.
//!
//! Implements the `score` subcommand: every input file is parsed and scored
//! independently, in parallel, and reported in input order.

use super::exit_codes;
use super::output::{write_output, OutputTarget};
use crate::config::{discover_config_file, load_config_file};
use crate::error::SbomScoreError;
use crate::model::Document;
use crate::parsers::parse_sbom;
use crate::scorer::{CheckFilter, ScoreGrade, ScoreReport, Scorer};
use anyhow::{Context, Result};
use rayon::prelude::*;
use serde_json::json;
use std::path::{Path, PathBuf};

/// Score command configuration
#[derive(Debug, Clone, Default)]
pub struct ScoreConfig {
    pub paths: Vec<PathBuf>,
    pub categories: Vec<String>,
    pub features: Vec<String>,
    pub config_path: Option<PathBuf>,
    pub json: bool,
    pub basic: bool,
    pub output_file: Option<PathBuf>,
    pub no_color: bool,
}

/// Outcome of one input file
struct FileOutcome<'a> {
    path: &'a Path,
    result: std::result::Result<(Document, ScoreReport), SbomScoreError>,
}

/// Run the score command, returning the desired exit code.
pub fn run_score(config: ScoreConfig) -> Result<i32> {
    let filter = resolve_filter(&config)?;
    let scorer = Scorer::new(filter);

    let outcomes: Vec<FileOutcome<'_>> = config
        .paths
        .par_iter()
        .map(|path| FileOutcome {
            path,
            result: parse_sbom(path).map(|doc| {
                let report = scorer.score(&doc);
                (doc, report)
            }),
        })
        .collect();

    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    for outcome in &outcomes {
        if let Err(e) = &outcome.result {
            tracing::error!(path = %outcome.path.display(), error = %e, "failed to score SBOM");
        }
    }

    let text = if config.json {
        format_json(&outcomes)?
    } else if config.basic {
        format_basic(&outcomes)
    } else {
        format_detailed(&outcomes, !config.no_color && std::env::var("NO_COLOR").is_err())
    };
    write_output(&text, &OutputTarget::from_option(config.output_file))?;

    if failed > 0 {
        tracing::warn!(failed, total = outcomes.len(), "some inputs could not be scored");
        return Ok(exit_codes::PARSE_FAILED);
    }
    Ok(exit_codes::SUCCESS)
}

/// Pick the check filter for a run
///
/// Explicit `--category`/`--feature` selections win. Otherwise an explicit
/// `--config` must load; a discovered config is used when it loads. With
/// neither, every check runs.
pub fn resolve_filter(config: &ScoreConfig) -> Result<CheckFilter> {
    if !config.categories.is_empty() || !config.features.is_empty() {
        return Ok(CheckFilter::from_selection(&config.categories, &config.features)?);
    }

    if let Some(path) = &config.config_path {
        let scoring = load_config_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?;
        return Ok(scoring.to_filter()?);
    }

    let Some(path) = discover_config_file(None) else {
        return Ok(CheckFilter::All);
    };
    match load_config_file(&path) {
        Ok(scoring) => {
            tracing::info!("Using config from {}", path.display());
            Ok(scoring.to_filter()?)
        }
        Err(e) => {
            tracing::warn!("Ignoring config {}: {}", path.display(), e);
            Ok(CheckFilter::All)
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
        .into_owned()
}

fn format_json(outcomes: &[FileOutcome<'_>]) -> Result<String> {
    let files: Vec<serde_json::Value> = outcomes
        .iter()
        .map(|o| match &o.result {
            Ok((doc, report)) => json!({
                "file_name": o.path.display().to_string(),
                "spec": doc.spec().spec_type.as_str(),
                "spec_version": doc.spec().version,
                "file_format": doc.spec().file_format.as_str(),
                "num_components": doc.components().len(),
                "creation_time": doc.spec().creation_timestamp,
                "schema_valid": doc.schema_valid(),
                "avg_score": report.average_score,
                "grade": report.grade.letter(),
                "scores": report.results,
            }),
            Err(e) => json!({
                "file_name": o.path.display().to_string(),
                "error": e.to_string(),
            }),
        })
        .collect();

    let output = json!({
        "tool": "sbom-score",
        "version": env!("CARGO_PKG_VERSION"),
        "creation_time": chrono::Utc::now().to_rfc3339(),
        "files": files,
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// One line per file: score, grade, spec and name
fn format_basic(outcomes: &[FileOutcome<'_>]) -> String {
    outcomes
        .iter()
        .map(|o| match &o.result {
            Ok((doc, report)) => format!(
                "{:.1}\t{}\t{} {}\t{}\t{}",
                report.average_score,
                report.grade.letter(),
                doc.spec().spec_type.as_str(),
                doc.spec().version,
                doc.spec().file_format.as_str(),
                o.path.display()
            ),
            Err(e) => format!("error\t-\t{}\t{e}", o.path.display()),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_detailed(outcomes: &[FileOutcome<'_>], use_color: bool) -> String {
    let mut lines = Vec::new();
    for o in outcomes {
        let (doc, report) = match &o.result {
            Ok(pair) => pair,
            Err(e) => {
                lines.push(format!("SBOM Score: {}", file_name(o.path)));
                lines.push(format!("  error: {e}"));
                lines.push(String::new());
                continue;
            }
        };

        let (grade_color, reset) = if use_color {
            let color = match report.grade {
                ScoreGrade::A | ScoreGrade::B => "\x1b[32m",
                ScoreGrade::C | ScoreGrade::D => "\x1b[33m",
                ScoreGrade::F => "\x1b[31m",
            };
            (color, "\x1b[0m")
        } else {
            ("", "")
        };

        lines.push(format!("SBOM Score: {}", file_name(o.path)));
        lines.push(format!(
            "Format: {} {} ({}), {} components",
            doc.spec().spec_type.as_str(),
            doc.spec().version,
            doc.spec().file_format.as_str(),
            doc.components().len()
        ));
        lines.push(format!(
            "Overall: {grade_color}{:.1}/10 (Grade: {}){reset}, {} of {} checks scored",
            report.average_score,
            report.grade.letter(),
            report.scored_count(),
            report.count
        ));
        lines.push(String::new());

        for (category, avg) in report.category_scores() {
            lines.push(format!("{} ({avg:.1})", category.name()));
            for r in report.results_in(category) {
                let score = if let Some(err) = &r.error {
                    format!("error: {err}")
                } else if r.ignored {
                    "n/a".to_string()
                } else if let Some(pass) = r.pass_fail {
                    if pass { "PASS" } else { "FAIL" }.to_string()
                } else {
                    format!("{:.1}", r.score)
                };
                lines.push(format!("  {:<36} {:>8}  {}", r.key, score, r.description));
            }
            lines.push(String::new());
        }
    }
    lines.join("\n")
}
