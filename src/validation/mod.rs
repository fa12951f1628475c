//! Structural JSON-Schema validation.
//!
//! The scorer treats schema validation as an oracle: a pass/fail flag plus
//! the list of messages explaining a failure. [`BuiltinSchemaValidator`]
//! embeds top-level schemas for SPDX 2.x JSON and CycloneDX JSON; other
//! encodings are reported as valid with a note that the pass was skipped.

use crate::model::{FileFormat, SpecFormat};
use jsonschema::Validator;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::LazyLock;

const SPDX2_SCHEMA: &str = include_str!("schemas/spdx-2.json");
const CYCLONEDX_SCHEMA: &str = include_str!("schemas/cyclonedx-1.json");

/// Cap on the number of messages kept from one validation run
const MAX_LOGS: usize = 50;

/// Result of a structural validation pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaOutcome {
    pub valid: bool,
    pub logs: Vec<String>,
}

impl SchemaOutcome {
    #[must_use]
    pub fn passed() -> Self {
        Self {
            valid: true,
            logs: Vec::new(),
        }
    }

    #[must_use]
    pub fn skipped(reason: impl Into<String>) -> Self {
        Self {
            valid: true,
            logs: vec![format!("schema validation skipped: {}", reason.into())],
        }
    }

    #[must_use]
    pub fn failed(logs: Vec<String>) -> Self {
        Self { valid: false, logs }
    }
}

/// Structural validation collaborator consumed by the parse pipeline
pub trait SchemaValidator: Send + Sync {
    fn validate(
        &self,
        spec: SpecFormat,
        file_format: FileFormat,
        version: &str,
        bytes: &[u8],
    ) -> SchemaOutcome;
}

/// Validator that accepts everything; useful when structural checks are unwanted
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSchemaValidator;

impl SchemaValidator for NoopSchemaValidator {
    fn validate(&self, _: SpecFormat, _: FileFormat, _: &str, _: &[u8]) -> SchemaOutcome {
        SchemaOutcome::passed()
    }
}

static SPDX2_VALIDATOR: LazyLock<Option<Validator>> =
    LazyLock::new(|| compile("SPDX 2", SPDX2_SCHEMA));
static CYCLONEDX_VALIDATOR: LazyLock<Option<Validator>> =
    LazyLock::new(|| compile("CycloneDX", CYCLONEDX_SCHEMA));

fn compile(name: &str, source: &str) -> Option<Validator> {
    let schema: Value = match serde_json::from_str(source) {
        Ok(schema) => schema,
        Err(e) => {
            tracing::error!(schema = name, error = %e, "embedded schema is not valid JSON");
            return None;
        }
    };
    match jsonschema::validator_for(&schema) {
        Ok(validator) => Some(validator),
        Err(e) => {
            tracing::error!(schema = name, error = %e, "embedded schema failed to compile");
            None
        }
    }
}

/// Default validator backed by the `jsonschema` crate
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinSchemaValidator;

impl BuiltinSchemaValidator {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn validator_for(spec: SpecFormat, version: &str) -> Option<&'static Validator> {
        match spec {
            SpecFormat::Spdx if version.starts_with('2') => SPDX2_VALIDATOR.as_ref(),
            SpecFormat::CycloneDx => CYCLONEDX_VALIDATOR.as_ref(),
            _ => None,
        }
    }
}

impl SchemaValidator for BuiltinSchemaValidator {
    fn validate(
        &self,
        spec: SpecFormat,
        file_format: FileFormat,
        version: &str,
        bytes: &[u8],
    ) -> SchemaOutcome {
        if file_format != FileFormat::Json {
            return SchemaOutcome::skipped(format!("no schema for {spec} {file_format}"));
        }
        let Some(validator) = Self::validator_for(spec, version) else {
            return SchemaOutcome::skipped(format!("no schema for {spec} {version}"));
        };
        let instance: Value = match serde_json::from_slice(bytes) {
            Ok(v) => v,
            Err(e) => return SchemaOutcome::failed(vec![format!("not valid JSON: {e}")]),
        };

        let logs: Vec<String> = validator
            .iter_errors(&instance)
            .take(MAX_LOGS)
            .map(|e| {
                let path = e.instance_path.to_string();
                if path.is_empty() {
                    e.to_string()
                } else {
                    format!("{path}: {e}")
                }
            })
            .collect();

        tracing::debug!(%spec, version, errors = logs.len(), "schema validation finished");
        if logs.is_empty() {
            SchemaOutcome::passed()
        } else {
            SchemaOutcome::failed(logs)
        }
    }
}
