//! SPDX 2.x native document structures.
//!
//! These mirror the JSON/YAML serialization. The tag-value and RDF readers
//! populate the same structures so that a single adapter handles every
//! SPDX 2 encoding.

use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SpdxDocument {
    #[serde(rename = "SPDXID")]
    pub spdx_id: Option<String>,
    pub spdx_version: Option<String>,
    pub data_license: Option<String>,
    pub name: Option<String>,
    pub document_namespace: Option<String>,
    pub creation_info: Option<SpdxCreationInfo>,
    pub comment: Option<String>,
    #[serde(default)]
    pub packages: Vec<SpdxPackage>,
    #[serde(default)]
    pub relationships: Vec<SpdxRelationship>,
    #[serde(default)]
    pub document_describes: Vec<String>,
    #[serde(default)]
    pub has_extracted_licensing_infos: Vec<SpdxExtractedLicense>,
    #[serde(default)]
    pub external_document_refs: Vec<SpdxExternalDocumentRef>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SpdxCreationInfo {
    pub created: Option<String>,
    #[serde(default)]
    pub creators: Vec<String>,
    pub license_list_version: Option<String>,
    pub comment: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SpdxPackage {
    #[serde(rename = "SPDXID")]
    pub spdx_id: Option<String>,
    pub name: Option<String>,
    pub version_info: Option<String>,
    pub supplier: Option<String>,
    pub originator: Option<String>,
    pub download_location: Option<String>,
    pub files_analyzed: Option<bool>,
    pub package_verification_code: Option<SpdxVerificationCode>,
    #[serde(default)]
    pub checksums: Vec<SpdxChecksum>,
    pub homepage: Option<String>,
    pub source_info: Option<String>,
    pub license_concluded: Option<String>,
    pub license_declared: Option<String>,
    pub copyright_text: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub external_refs: Vec<SpdxExternalRef>,
    pub primary_package_purpose: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SpdxVerificationCode {
    pub package_verification_code_value: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SpdxChecksum {
    pub algorithm: String,
    pub checksum_value: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SpdxExternalRef {
    pub reference_category: Option<String>,
    pub reference_type: String,
    pub reference_locator: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SpdxRelationship {
    pub spdx_element_id: String,
    pub relationship_type: String,
    pub related_spdx_element: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SpdxExtractedLicense {
    pub license_id: String,
    pub name: Option<String>,
    pub extracted_text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SpdxExternalDocumentRef {
    pub external_document_id: Option<String>,
    pub spdx_document: String,
}
