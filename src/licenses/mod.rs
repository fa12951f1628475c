//! License expression resolution against the SPDX and AboutCode registries.
//!
//! ```
//! use sbom_score::licenses;
//!
//! licenses::init();
//! let lics = licenses::resolve("MIT OR Apache-2.0", &[]);
//! assert_eq!(lics.len(), 2);
//! ```

mod aboutcode;
mod expression;
mod registry;

pub use aboutcode::{AboutCodeEntry, AboutCodeIndex};
pub use expression::{is_absent, lookup_key, tokens};
pub use registry::{init, LicenseRegistry};

use crate::model::License;

/// Resolve an SPDX license expression through the shared registry
#[must_use]
pub fn resolve(expression: &str, custom: &[License]) -> Vec<License> {
    LicenseRegistry::global().resolve(expression, custom)
}

/// Resolve a single license identifier through the shared registry
#[must_use]
pub fn lookup(token: &str, custom: &[License]) -> License {
    LicenseRegistry::global().lookup(token, custom)
}
