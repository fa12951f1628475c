//! Unified component model.

use super::{Author, Cpe, License, OmniborId, Organization, Purl, Swhid, Swid};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Hash algorithm of a checksum
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashAlgorithm {
    Md5,
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
    Sha3_256,
    Sha3_384,
    Sha3_512,
    Blake2b256,
    Blake2b384,
    Blake2b512,
    Blake3,
    Other(String),
}

impl HashAlgorithm {
    /// Parse an algorithm name from either SPDX (`SHA256`) or CycloneDX (`SHA-256`) spelling
    #[must_use]
    pub fn parse(name: &str) -> Self {
        let normalized: String = name
            .trim()
            .to_ascii_uppercase()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect();
        match normalized.as_str() {
            "MD5" => Self::Md5,
            "SHA1" => Self::Sha1,
            "SHA224" => Self::Sha224,
            "SHA256" => Self::Sha256,
            "SHA384" => Self::Sha384,
            "SHA512" => Self::Sha512,
            "SHA3256" => Self::Sha3_256,
            "SHA3384" => Self::Sha3_384,
            "SHA3512" => Self::Sha3_512,
            "BLAKE2B256" => Self::Blake2b256,
            "BLAKE2B384" => Self::Blake2b384,
            "BLAKE2B512" => Self::Blake2b512,
            "BLAKE3" => Self::Blake3,
            _ => Self::Other(name.trim().to_string()),
        }
    }

    /// SHA-256 or a stronger digest
    #[must_use]
    pub const fn is_strong(&self) -> bool {
        matches!(
            self,
            Self::Sha256
                | Self::Sha384
                | Self::Sha512
                | Self::Sha3_256
                | Self::Sha3_384
                | Self::Sha3_512
                | Self::Blake2b256
                | Self::Blake2b384
                | Self::Blake2b512
                | Self::Blake3
        )
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Md5 => write!(f, "MD5"),
            Self::Sha1 => write!(f, "SHA-1"),
            Self::Sha224 => write!(f, "SHA-224"),
            Self::Sha256 => write!(f, "SHA-256"),
            Self::Sha384 => write!(f, "SHA-384"),
            Self::Sha512 => write!(f, "SHA-512"),
            Self::Sha3_256 => write!(f, "SHA3-256"),
            Self::Sha3_384 => write!(f, "SHA3-384"),
            Self::Sha3_512 => write!(f, "SHA3-512"),
            Self::Blake2b256 => write!(f, "BLAKE2b-256"),
            Self::Blake2b384 => write!(f, "BLAKE2b-384"),
            Self::Blake2b512 => write!(f, "BLAKE2b-512"),
            Self::Blake3 => write!(f, "BLAKE3"),
            Self::Other(name) => write!(f, "{name}"),
        }
    }
}

/// Cryptographic checksum of a component artifact
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Checksum {
    pub algorithm: HashAlgorithm,
    pub value: String,
}

impl Checksum {
    #[must_use]
    pub fn new(algorithm: &str, value: impl Into<String>) -> Self {
        Self {
            algorithm: HashAlgorithm::parse(algorithm),
            value: value.into(),
        }
    }

    #[must_use]
    pub fn is_present(&self) -> bool {
        !self.value.trim().is_empty()
    }
}

/// A software unit inside a [`Document`](super::Document)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Component {
    /// Spec-native identifier (SPDX element id or CycloneDX bom-ref)
    pub id: String,
    pub name: String,
    pub version: Option<String>,
    pub description: Option<String>,
    pub purls: Vec<Purl>,
    pub cpes: Vec<Cpe>,
    pub swhids: Vec<Swhid>,
    pub swids: Vec<Swid>,
    pub omnibor_ids: Vec<OmniborId>,
    pub checksums: Vec<Checksum>,
    pub(crate) declared_licenses: Vec<License>,
    pub(crate) concluded_licenses: Vec<License>,
    pub(crate) licenses: Vec<License>,
    pub supplier: Option<Organization>,
    pub manufacturer: Option<Organization>,
    pub authors: Vec<Author>,
    /// CycloneDX component type / SPDX primary package purpose
    pub primary_purpose: Option<String>,
    pub source_code_url: Option<String>,
    pub source_code_hash: Option<String>,
    pub download_url: Option<String>,
    pub copyright: Option<String>,
    pub is_primary: bool,
    pub required_fields_present: bool,
    /// Number of outgoing dependency edges recorded in the document
    pub dependency_count: usize,
}

impl Component {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Licenses as stated by the author/publisher
    #[must_use]
    pub fn declared_licenses(&self) -> &[License] {
        &self.declared_licenses
    }

    /// Licenses concluded by the SBOM author
    #[must_use]
    pub fn concluded_licenses(&self) -> &[License] {
        &self.concluded_licenses
    }

    /// Unified license view used by scoring
    #[must_use]
    pub fn licenses(&self) -> &[License] {
        &self.licenses
    }

    #[must_use]
    pub fn has_name(&self) -> bool {
        !self.name.trim().is_empty()
    }

    #[must_use]
    pub fn has_version(&self) -> bool {
        self.version.as_deref().is_some_and(|v| !v.trim().is_empty())
    }

    /// Any identifier usable for vulnerability lookup
    #[must_use]
    pub fn vuln_lookup_id_count(&self) -> usize {
        usize::from(!self.purls.is_empty())
            + usize::from(!self.cpes.is_empty())
            + usize::from(!self.swhids.is_empty())
            + usize::from(!self.swids.is_empty())
            + usize::from(!self.omnibor_ids.is_empty())
    }

    #[must_use]
    pub fn has_unique_id(&self) -> bool {
        self.vuln_lookup_id_count() > 0
    }

    #[must_use]
    pub fn has_checksum(&self) -> bool {
        self.checksums.iter().any(Checksum::is_present)
    }

    #[must_use]
    pub fn has_checksum_with(&self, pred: impl Fn(&HashAlgorithm) -> bool) -> bool {
        self.checksums
            .iter()
            .any(|c| c.is_present() && pred(&c.algorithm))
    }

    #[must_use]
    pub fn has_supplier(&self) -> bool {
        self.supplier.as_ref().is_some_and(Organization::is_present)
    }

    /// Supplier, manufacturer or an author can be contacted
    #[must_use]
    pub fn has_creator_contact(&self) -> bool {
        self.supplier.as_ref().is_some_and(Organization::has_contact)
            || self
                .manufacturer
                .as_ref()
                .is_some_and(Organization::has_contact)
            || self.authors.iter().any(Author::has_contact)
    }
}
