//! Component identifiers used for vulnerability lookup and deduplication.
//!
//! Every identifier is a validated newtype: constructors return `None` when
//! the input is not a well-formed identifier of that kind, so a [`Component`]
//! never carries an identifier that failed validation.
//!
//! [`Component`]: super::Component

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// CPE 2.3 formatted string: `cpe:2.3:part` followed by ten colon-separated
/// attributes. Attribute values may contain any character except an
/// unescaped colon or whitespace.
static CPE23_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^cpe:2\.3:[aho*\-](:(?:[^:\\\s]|\\.)+){10}$").expect("static regex")
});

/// CPE 2.2 URI binding
static CPE22_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[cC][pP][eE]:/[AHOaho]?(:[A-Za-z0-9._\-~%!()]*){0,6}$").expect("static regex")
});

static SWHID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^swh:1:(cnt|dir|rev|rel|snp):[0-9a-f]{40}(;[A-Za-z]+=[^;]+)*$")
        .expect("static regex")
});

static OMNIBOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^gitoid:(blob|tree|commit|tag):(sha1:[0-9a-f]{40}|sha256:[0-9a-f]{64})$")
        .expect("static regex")
});

/// Package URL
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Purl(String);

impl Purl {
    /// Validate and wrap a package URL
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        packageurl::PackageUrl::from_str(value)
            .ok()
            .map(|_| Self(value.to_string()))
    }

    #[must_use]
    pub fn is_valid(value: &str) -> bool {
        Self::parse(value).is_some()
    }

    /// Package type (ecosystem), e.g. `npm` or `golang`
    #[must_use]
    pub fn package_type(&self) -> Option<String> {
        packageurl::PackageUrl::from_str(&self.0)
            .ok()
            .map(|p| p.ty().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Purl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// CPE binding version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CpeVersion {
    V22,
    V23,
}

/// Common Platform Enumeration name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cpe {
    value: String,
    version: CpeVersion,
}

impl Cpe {
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if CPE23_RE.is_match(value) {
            Some(Self {
                value: value.to_string(),
                version: CpeVersion::V23,
            })
        } else if CPE22_RE.is_match(value) {
            Some(Self {
                value: value.to_string(),
                version: CpeVersion::V22,
            })
        } else {
            None
        }
    }

    #[must_use]
    pub fn is_valid(value: &str) -> bool {
        Self::parse(value).is_some()
    }

    #[must_use]
    pub const fn version(&self) -> CpeVersion {
        self.version
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for Cpe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// Software Heritage persistent identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Swhid(String);

impl Swhid {
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        SWHID_RE.is_match(value).then(|| Self(value.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// OmniBOR artifact identifier (gitoid)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OmniborId(String);

impl OmniborId {
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        OMNIBOR_RE.is_match(value).then(|| Self(value.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// ISO/IEC 19770-2 software identification tag
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Swid {
    pub tag_id: String,
    pub name: Option<String>,
}

impl Swid {
    #[must_use]
    pub fn parse(tag_id: &str, name: Option<&str>) -> Option<Self> {
        let tag_id = tag_id.trim();
        if tag_id.is_empty() {
            return None;
        }
        Some(Self {
            tag_id: tag_id.to_string(),
            name: name.map(str::to_string).filter(|n| !n.trim().is_empty()),
        })
    }
}
