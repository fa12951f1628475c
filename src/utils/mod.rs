//! Shared utilities.

mod version;

pub use version::{compare_versions, normalize_spec_version, parse_lenient, version_at_least};
