//! Unified error types for sbom-score.
//!
//! Parsing is the only stage that can fail outright: detection and decode
//! failures surface as [`SbomScoreError::Parse`]. Field-level anomalies are
//! recorded on the [`Document`](crate::model::Document) instead, and check
//! failures are embedded in the individual check result.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for sbom-score operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SbomScoreError {
    /// Errors during format detection or SBOM parsing
    #[error("Failed to parse SBOM: {context}")]
    Parse {
        context: String,
        #[source]
        source: ParseErrorKind,
    },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A single check predicate failed to evaluate
    #[error("Check '{key}' failed: {message}")]
    Check { key: String, message: String },
}

/// Specific parse error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ParseErrorKind {
    #[error("Unknown SBOM format - expected CycloneDX or SPDX markers")]
    UnknownFormat,

    #[error("Unsupported format version: {version} (supported: {supported})")]
    UnsupportedVersion { version: String, supported: String },

    #[error("Invalid JSON structure: {0}")]
    InvalidJson(String),

    #[error("Invalid XML structure: {0}")]
    InvalidXml(String),

    #[error("Invalid YAML structure: {0}")]
    InvalidYaml(String),

    #[error("Invalid tag-value line {line}: {message}")]
    InvalidTagValue { line: usize, message: String },

    #[error("Invalid RDF/XML structure: {0}")]
    InvalidRdf(String),
}

/// Convenient Result type for sbom-score operations
pub type Result<T> = std::result::Result<T, SbomScoreError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl SbomScoreError {
    /// Create a parse error with context
    pub fn parse(context: impl Into<String>, source: ParseErrorKind) -> Self {
        Self::Parse {
            context: context.into(),
            source,
        }
    }

    /// Create a parse error for a file whose format was not recognized
    pub fn unknown_format(path: impl Into<String>) -> Self {
        Self::parse(format!("at {}", path.into()), ParseErrorKind::UnknownFormat)
    }

    /// Create a parse error for in-memory input whose format was not recognized
    pub fn unrecognized_input() -> Self {
        Self::parse(
            "unsupported or unrecognized SBOM format",
            ParseErrorKind::UnknownFormat,
        )
    }

    /// Create a parse error for a detected but unsupported version
    pub fn unsupported_version(
        context: impl Into<String>,
        version: impl Into<String>,
        supported: &[&str],
    ) -> Self {
        Self::parse(
            context,
            ParseErrorKind::UnsupportedVersion {
                version: version.into(),
                supported: supported.join(", "),
            },
        )
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        let message = format!("{source}");
        Self::Io {
            path: Some(path),
            message,
            source,
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a check evaluation error
    pub fn check(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Check {
            key: key.into(),
            message: message.into(),
        }
    }
}

// ============================================================================
// Conversions from existing error types
// ============================================================================

impl From<std::io::Error> for SbomScoreError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<serde_json::Error> for SbomScoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse(
            "JSON deserialization",
            ParseErrorKind::InvalidJson(err.to_string()),
        )
    }
}

impl From<serde_yaml::Error> for SbomScoreError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::parse(
            "YAML deserialization",
            ParseErrorKind::InvalidYaml(err.to_string()),
        )
    }
}

impl From<quick_xml::DeError> for SbomScoreError {
    fn from(err: quick_xml::DeError) -> Self {
        Self::parse(
            "XML deserialization",
            ParseErrorKind::InvalidXml(err.to_string()),
        )
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// The context string is prepended to the error's existing context, so a
/// failure deep inside a parser reads `"parsing bom.json: CycloneDX JSON: ..."`.
///
/// ```ignore
/// use sbom_score::error::ErrorContext;
///
/// let bytes = std::fs::read(path).context("reading SBOM file")?;
/// let doc = parse_bytes(&bytes).with_context(|| format!("parsing {}", path.display()))?;
/// ```
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure, evaluated only on the error path.
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<SbomScoreError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

/// Add context to an error, chaining with any existing context.
fn add_context_to_error(err: SbomScoreError, new_ctx: &str) -> SbomScoreError {
    match err {
        SbomScoreError::Parse {
            context: existing,
            source,
        } => SbomScoreError::Parse {
            context: chain_context(new_ctx, &existing),
            source,
        },
        SbomScoreError::Io {
            path,
            message,
            source,
        } => SbomScoreError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        SbomScoreError::Config(msg) => SbomScoreError::Config(chain_context(new_ctx, &msg)),
        SbomScoreError::Validation(msg) => {
            SbomScoreError::Validation(chain_context(new_ctx, &msg))
        }
        SbomScoreError::Check { key, message } => SbomScoreError::Check {
            key,
            message: chain_context(new_ctx, &message),
        },
    }
}

/// Chain two context strings together.
///
/// If the existing context is empty, returns just the new context.
/// Otherwise, returns "`new_context`: `existing_context`".
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SbomScoreError::unknown_format("test.json");
        let display = err.to_string();
        assert!(
            display.contains("parse") && display.contains("test.json"),
            "Error message should mention parsing and the path: {display}"
        );

        let err = SbomScoreError::unrecognized_input();
        assert!(err.to_string().contains("unsupported or unrecognized SBOM format"));

        let err = SbomScoreError::check("sbom_spec", "boom");
        assert_eq!(err.to_string(), "Check 'sbom_spec' failed: boom");
    }

    #[test]
    fn test_unsupported_version_lists_supported() {
        let err = SbomScoreError::unsupported_version("CycloneDX JSON", "2.0", &["1.5", "1.6"]);
        match err {
            SbomScoreError::Parse {
                source: ParseErrorKind::UnsupportedVersion { version, supported },
                ..
            } => {
                assert_eq!(version, "2.0");
                assert_eq!(supported, "1.5, 1.6");
            }
            other => panic!("Expected UnsupportedVersion, got {other:?}"),
        }
    }

    #[test]
    fn test_error_chain() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = SbomScoreError::io("/path/to/file.json", io_err);

        assert!(err.to_string().contains("/path/to/file.json"));
    }

    #[test]
    fn test_context_chaining_multiple_levels() {
        fn inner() -> Result<()> {
            Err(SbomScoreError::parse("base", ParseErrorKind::UnknownFormat))
        }

        fn middle() -> Result<()> {
            inner().context("middle layer")
        }

        fn outer() -> Result<()> {
            middle().context("outer layer")
        }

        match outer() {
            Err(SbomScoreError::Parse { context, .. }) => {
                assert_eq!(context, "outer layer: middle layer: base");
            }
            _ => panic!("Expected Parse error"),
        }
    }

    #[test]
    fn test_with_context_lazy_evaluation() {
        let mut called = false;

        let ok_result: Result<i32> = Ok(42);
        let _ = ok_result.with_context(|| {
            called = true;
            "should not be called"
        });
        assert!(!called, "Closure should not be called for Ok result");

        let err_result: Result<i32> = Err(SbomScoreError::validation("error"));
        let _ = err_result.with_context(|| {
            called = true;
            "should be called"
        });
        assert!(called, "Closure should be called for Err result");
    }

    #[test]
    fn test_chain_context_helper() {
        assert_eq!(chain_context("new", ""), "new");
        assert_eq!(chain_context("new", "existing"), "new: existing");
    }
}
