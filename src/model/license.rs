//! License metadata produced by the license resolver.
//!
//! A [`License`] is an immutable value: the resolver in [`crate::licenses`]
//! builds them from the SPDX and AboutCode registries, and only custom
//! (`LicenseRef-*` style) licenses may be constructed by hand through
//! [`License::custom`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Registry a license was resolved from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LicenseSource {
    Spdx,
    AboutCode,
    Custom,
}

impl fmt::Display for LicenseSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spdx => write!(f, "spdx"),
            Self::AboutCode => write!(f, "aboutcode"),
            Self::Custom => write!(f, "custom"),
        }
    }
}

/// Resolved license metadata
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct License {
    pub(crate) name: String,
    pub(crate) short_id: String,
    pub(crate) source: LicenseSource,
    pub(crate) deprecated: bool,
    pub(crate) osi_approved: bool,
    pub(crate) fsf_libre: bool,
    pub(crate) restrictive: bool,
    pub(crate) exception: bool,
    pub(crate) free_any_use: bool,
}

impl License {
    /// Create a custom license whose identity is the given name and id
    #[must_use]
    pub fn custom(name: impl Into<String>, short_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            short_id: short_id.into(),
            source: LicenseSource::Custom,
            deprecated: false,
            osi_approved: false,
            fsf_libre: false,
            restrictive: false,
            exception: false,
            free_any_use: false,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn short_id(&self) -> &str {
        &self.short_id
    }

    #[must_use]
    pub const fn source(&self) -> LicenseSource {
        self.source
    }

    #[must_use]
    pub const fn is_deprecated(&self) -> bool {
        self.deprecated
    }

    #[must_use]
    pub const fn is_osi_approved(&self) -> bool {
        self.osi_approved
    }

    #[must_use]
    pub const fn is_fsf_libre(&self) -> bool {
        self.fsf_libre
    }

    #[must_use]
    pub const fn is_restrictive(&self) -> bool {
        self.restrictive
    }

    #[must_use]
    pub const fn is_exception(&self) -> bool {
        self.exception
    }

    #[must_use]
    pub const fn is_free_any_use(&self) -> bool {
        self.free_any_use
    }

    #[must_use]
    pub fn is_spdx(&self) -> bool {
        self.source == LicenseSource::Spdx
    }

    #[must_use]
    pub fn is_aboutcode(&self) -> bool {
        self.source == LicenseSource::AboutCode
    }

    #[must_use]
    pub fn is_custom(&self) -> bool {
        self.source == LicenseSource::Custom
    }

    /// Known to one of the public registries
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.is_custom()
    }
}

impl fmt::Display for License {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short_id)
    }
}
