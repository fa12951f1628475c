//! Document-level metadata: spec descriptor, authors, tools and organizations.

use super::License;
use serde::{Deserialize, Serialize};
use std::fmt;

/// SBOM specification family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpecFormat {
    Spdx,
    CycloneDx,
    Unknown,
}

impl SpecFormat {
    /// Lowercase name used in check descriptions and config files
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Spdx => "spdx",
            Self::CycloneDx => "cyclonedx",
            Self::Unknown => "unknown",
        }
    }

    /// Versions this crate knows how to parse
    #[must_use]
    pub const fn supported_versions(&self) -> &'static [&'static str] {
        match self {
            Self::Spdx => &["2.1", "2.2", "2.3", "3.0", "3.0.1"],
            Self::CycloneDx => &["1.0", "1.1", "1.2", "1.3", "1.4", "1.5", "1.6"],
            Self::Unknown => &[],
        }
    }
}

impl fmt::Display for SpecFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spdx => write!(f, "SPDX"),
            Self::CycloneDx => write!(f, "CycloneDX"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Serialization of the input file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileFormat {
    Json,
    Xml,
    Yaml,
    TagValue,
    Rdf,
    JsonLd,
    Unknown,
}

impl FileFormat {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Xml => "xml",
            Self::Yaml => "yaml",
            Self::TagValue => "tag-value",
            Self::Rdf => "rdf",
            Self::JsonLd => "json-ld",
            Self::Unknown => "unknown",
        }
    }

    /// Encodings a given spec family may legally be serialized in
    #[must_use]
    pub const fn supported_for(spec: SpecFormat) -> &'static [FileFormat] {
        match spec {
            SpecFormat::Spdx => &[
                Self::Json,
                Self::Yaml,
                Self::TagValue,
                Self::Rdf,
                Self::JsonLd,
            ],
            SpecFormat::CycloneDx => &[Self::Json, Self::Xml],
            SpecFormat::Unknown => &[],
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-document specification metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spec {
    pub spec_type: SpecFormat,
    /// Normalized version, e.g. `2.3` or `1.6`
    pub version: String,
    pub file_format: FileFormat,
    /// Document name (SPDX `name`, CycloneDX metadata component name)
    pub name: Option<String>,
    /// SPDX document namespace or CycloneDX serial number
    pub namespace: Option<String>,
    /// SPDX element id of the document itself
    pub spdx_id: Option<String>,
    /// Raw creation timestamp as it appeared in the document
    pub creation_timestamp: Option<String>,
    pub organization: Option<String>,
    pub comment: Option<String>,
    /// Document data license(s)
    pub licenses: Vec<License>,
    /// External document references (SPDX) or bom-links (CycloneDX)
    pub external_doc_refs: Vec<String>,
    /// CycloneDX `version` (document revision)
    pub doc_version: Option<i64>,
    pub required_fields: bool,
}

impl Spec {
    #[must_use]
    pub fn new(spec_type: SpecFormat, version: impl Into<String>, file_format: FileFormat) -> Self {
        Self {
            spec_type,
            version: version.into(),
            file_format,
            name: None,
            namespace: None,
            spdx_id: None,
            creation_timestamp: None,
            organization: None,
            comment: None,
            licenses: Vec::new(),
            external_doc_refs: Vec::new(),
            doc_version: None,
            required_fields: false,
        }
    }

    /// Whether the creation timestamp parses as RFC 3339
    #[must_use]
    pub fn has_valid_timestamp(&self) -> bool {
        self.creation_timestamp
            .as_deref()
            .is_some_and(|ts| chrono::DateTime::parse_from_rfc3339(ts.trim()).is_ok())
    }
}

/// Kind of an author or creator entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Person,
    Organization,
    Tool,
    Unknown,
}

impl EntityType {
    /// Parse the type token of an SPDX free-text entity (`Person`, `Organization`, `Tool`)
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        match token.trim().to_ascii_lowercase().as_str() {
            "person" => Self::Person,
            "organization" | "organisation" => Self::Organization,
            "tool" => Self::Tool,
            _ => Self::Unknown,
        }
    }
}

/// An SBOM author (document or component level)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub entity_type: EntityType,
}

impl Author {
    #[must_use]
    pub fn new(name: impl Into<String>, entity_type: EntityType) -> Self {
        Self {
            name: name.into(),
            email: None,
            phone: None,
            entity_type,
        }
    }

    #[must_use]
    pub fn with_email(mut self, email: Option<String>) -> Self {
        self.email = email.filter(|e| !e.trim().is_empty());
        self
    }

    /// An author is only useful when it names someone or can be reached
    #[must_use]
    pub fn is_present(&self) -> bool {
        !self.name.trim().is_empty() || self.has_contact()
    }

    #[must_use]
    pub fn has_contact(&self) -> bool {
        self.email.as_deref().is_some_and(|e| !e.trim().is_empty())
            || self.phone.as_deref().is_some_and(|p| !p.trim().is_empty())
    }
}

/// Tool that produced the SBOM
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tool {
    pub name: String,
    pub version: Option<String>,
}

impl Tool {
    #[must_use]
    pub fn new(name: impl Into<String>, version: Option<String>) -> Self {
        Self {
            name: name.into(),
            version: version.filter(|v| !v.trim().is_empty()),
        }
    }

    #[must_use]
    pub fn has_name_and_version(&self) -> bool {
        !self.name.trim().is_empty() && self.version.is_some()
    }
}

/// Point of contact attached to an organization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl Contact {
    #[must_use]
    pub fn is_reachable(&self) -> bool {
        self.email.as_deref().is_some_and(|e| !e.trim().is_empty())
            || self.phone.as_deref().is_some_and(|p| !p.trim().is_empty())
    }
}

/// Supplier or manufacturer of a document or component
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub name: String,
    pub email: Option<String>,
    pub urls: Vec<String>,
    pub contacts: Vec<Contact>,
}

impl Organization {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_present(&self) -> bool {
        !self.name.trim().is_empty()
            || self.email.is_some()
            || !self.urls.is_empty()
            || self.contacts.iter().any(Contact::is_reachable)
    }

    /// Whether the organization can be reached by email, url or a contact
    #[must_use]
    pub fn has_contact(&self) -> bool {
        self.email.as_deref().is_some_and(|e| !e.trim().is_empty())
            || self.urls.iter().any(|u| !u.trim().is_empty())
            || self.contacts.iter().any(Contact::is_reachable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_type_from_token() {
        assert_eq!(EntityType::from_token("Person"), EntityType::Person);
        assert_eq!(EntityType::from_token(" organization "), EntityType::Organization);
        assert_eq!(EntityType::from_token("TOOL"), EntityType::Tool);
        assert_eq!(EntityType::from_token("Robot"), EntityType::Unknown);
    }

    #[test]
    fn test_spec_timestamp_validation() {
        let mut spec = Spec::new(SpecFormat::Spdx, "2.3", FileFormat::Json);
        assert!(!spec.has_valid_timestamp());
        spec.creation_timestamp = Some("2023-05-04T09:33:40Z".to_string());
        assert!(spec.has_valid_timestamp());
        spec.creation_timestamp = Some("yesterday".to_string());
        assert!(!spec.has_valid_timestamp());
    }

    #[test]
    fn test_organization_contact() {
        let mut org = Organization::new("Acme");
        assert!(org.is_present());
        assert!(!org.has_contact());
        org.urls.push("https://acme.example".to_string());
        assert!(org.has_contact());
        assert!(!Organization::default().is_present());
    }

    #[test]
    fn test_tool_version_filtering() {
        let tool = Tool::new("syft", Some("  ".to_string()));
        assert!(tool.version.is_none());
        assert!(!tool.has_name_and_version());
        assert!(Tool::new("syft", Some("0.90.0".to_string())).has_name_and_version());
    }
}
