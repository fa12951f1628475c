//! Embedded AboutCode (ScanCode LicenseDB) license index.
//!
//! Rows cover the SPDX license and exception lists plus the common
//! `LicenseRef-scancode-*` keys. Deprecated SPDX ids are listed as
//! `other_spdx_license_keys` of the row that replaces them.

use serde::Deserialize;
use std::collections::HashMap;

static ABOUTCODE_JSON: &str = include_str!("data/aboutcode.json");

const SCANCODE_PREFIX: &str = "licenseref-scancode-";

/// One row of the LicenseDB index
#[derive(Debug, Clone, Deserialize)]
pub struct AboutCodeEntry {
    pub license_key: String,
    pub short_name: String,
    pub category: String,
    #[serde(default)]
    pub spdx_license_key: Option<String>,
    #[serde(default)]
    pub other_spdx_license_keys: Vec<String>,
    #[serde(default)]
    pub is_exception: bool,
    #[serde(default)]
    pub is_deprecated: bool,
}

impl AboutCodeEntry {
    /// Categories whose obligations go beyond attribution
    #[must_use]
    pub fn is_restrictive(&self) -> bool {
        matches!(
            self.category.as_str(),
            "Copyleft"
                | "Copyleft Limited"
                | "Free Restricted"
                | "Source-available"
                | "Proprietary Free"
                | "Commercial"
        )
    }

    #[must_use]
    pub fn is_free_any_use(&self) -> bool {
        matches!(self.category.as_str(), "Permissive" | "Public Domain")
    }
}

/// Index over the embedded table, keyed case-insensitively
#[derive(Debug, Default)]
pub struct AboutCodeIndex {
    entries: Vec<AboutCodeEntry>,
    by_key: HashMap<String, usize>,
    by_spdx_key: HashMap<String, usize>,
}

impl AboutCodeIndex {
    /// Load the table compiled into the binary
    #[must_use]
    pub fn embedded() -> Self {
        match serde_json::from_str::<Vec<AboutCodeEntry>>(ABOUTCODE_JSON) {
            Ok(entries) => Self::from_entries(entries),
            Err(e) => {
                tracing::error!("embedded AboutCode license table is malformed: {e}");
                Self::default()
            }
        }
    }

    #[must_use]
    pub fn from_entries(entries: Vec<AboutCodeEntry>) -> Self {
        let mut by_key = HashMap::with_capacity(entries.len());
        let mut by_spdx_key = HashMap::with_capacity(entries.len());
        for (idx, entry) in entries.iter().enumerate() {
            by_key.entry(entry.license_key.to_ascii_lowercase()).or_insert(idx);
            for spdx_key in entry
                .spdx_license_key
                .iter()
                .chain(&entry.other_spdx_license_keys)
            {
                by_spdx_key.entry(spdx_key.to_ascii_lowercase()).or_insert(idx);
            }
        }
        Self {
            entries,
            by_key,
            by_spdx_key,
        }
    }

    /// Find an entry by LicenseDB key, `LicenseRef-scancode-<key>` or SPDX key
    #[must_use]
    pub fn find(&self, token: &str) -> Option<&AboutCodeEntry> {
        let lower = token.to_ascii_lowercase();
        let idx = self
            .by_key
            .get(&lower)
            .or_else(|| {
                lower
                    .strip_prefix(SCANCODE_PREFIX)
                    .and_then(|key| self.by_key.get(key))
            })
            .or_else(|| self.by_spdx_key.get(&lower))?;
        self.entries.get(*idx)
    }

    /// Entry whose SPDX key matches an SPDX license id
    #[must_use]
    pub fn find_by_spdx(&self, spdx_id: &str) -> Option<&AboutCodeEntry> {
        let idx = self.by_spdx_key.get(&spdx_id.to_ascii_lowercase())?;
        self.entries.get(*idx)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
