//! CycloneDX JSON structures for deserialization.
//!
//! The XML reader in [`super::xml`] converts its own wrapper-heavy structures
//! into these, so the adapter only ever sees one shape.

use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct CdxBom {
    pub bom_format: Option<String>,
    pub spec_version: Option<String>,
    pub serial_number: Option<String>,
    pub version: Option<i64>,
    pub metadata: Option<CdxMetadata>,
    pub components: Vec<CdxComponent>,
    pub dependencies: Vec<CdxDependency>,
    pub vulnerabilities: Vec<CdxVulnerability>,
    pub compositions: Vec<CdxComposition>,
    pub external_references: Vec<CdxExternalReference>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct CdxMetadata {
    pub timestamp: Option<String>,
    /// Array of tools (1.4) or an object with components/services (1.5+)
    #[serde(deserialize_with = "deserialize_tools")]
    pub tools: Vec<CdxTool>,
    pub authors: Vec<CdxContact>,
    pub component: Option<CdxComponent>,
    pub manufacturer: Option<CdxOrganization>,
    /// Pre-1.6 spelling of `manufacturer`
    pub manufacture: Option<CdxOrganization>,
    pub supplier: Option<CdxOrganization>,
    pub lifecycles: Vec<CdxLifecycle>,
    pub licenses: Vec<CdxLicenseChoice>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct CdxTool {
    pub vendor: Option<String>,
    pub name: Option<String>,
    pub version: Option<String>,
}

/// 1.5+ tools object
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct CdxToolsObject {
    components: Vec<CdxTool>,
    services: Vec<CdxTool>,
}

fn deserialize_tools<'de, D>(deserializer: D) -> Result<Vec<CdxTool>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, MapAccess, SeqAccess, Visitor};
    use std::fmt;

    struct ToolsVisitor;

    impl<'de> Visitor<'de> for ToolsVisitor {
        type Value = Vec<CdxTool>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an array of tools or an object with components/services")
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(Vec::new())
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(Vec::new())
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: SeqAccess<'de>,
        {
            let mut tools = Vec::new();
            while let Some(tool) = seq.next_element::<CdxTool>()? {
                tools.push(tool);
            }
            Ok(tools)
        }

        fn visit_map<M>(self, map: M) -> Result<Self::Value, M::Error>
        where
            M: MapAccess<'de>,
        {
            let obj: CdxToolsObject =
                Deserialize::deserialize(de::value::MapAccessDeserializer::new(map))?;
            Ok(obj.components.into_iter().chain(obj.services).collect())
        }
    }

    deserializer.deserialize_any(ToolsVisitor)
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct CdxContact {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct CdxOrganization {
    pub name: Option<String>,
    pub url: Vec<String>,
    pub contact: Vec<CdxContact>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct CdxLifecycle {
    pub phase: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct CdxComponent {
    #[serde(rename = "type")]
    pub component_type: Option<String>,
    #[serde(rename = "bom-ref")]
    pub bom_ref: Option<String>,
    pub name: Option<String>,
    pub version: Option<String>,
    pub group: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
    pub authors: Vec<CdxContact>,
    pub supplier: Option<CdxOrganization>,
    pub manufacturer: Option<CdxOrganization>,
    pub copyright: Option<String>,
    pub purl: Option<String>,
    pub cpe: Option<String>,
    pub swid: Option<CdxSwid>,
    pub omnibor_id: Vec<String>,
    pub swhid: Vec<String>,
    pub hashes: Vec<CdxHash>,
    pub licenses: Vec<CdxLicenseChoice>,
    pub external_references: Vec<CdxExternalReference>,
    pub components: Vec<CdxComponent>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct CdxSwid {
    pub tag_id: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct CdxHash {
    pub alg: String,
    pub content: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct CdxLicenseChoice {
    pub license: Option<CdxLicense>,
    pub expression: Option<String>,
    /// 1.6: `declared` or `concluded`, on expression choices
    pub acknowledgement: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct CdxLicense {
    pub id: Option<String>,
    pub name: Option<String>,
    pub url: Option<String>,
    pub acknowledgement: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct CdxExternalReference {
    #[serde(rename = "type")]
    pub ref_type: String,
    pub url: String,
    pub hashes: Vec<CdxHash>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct CdxDependency {
    #[serde(rename = "ref")]
    pub ref_field: Option<String>,
    pub depends_on: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct CdxVulnerability {
    pub id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct CdxComposition {
    pub aggregate: Option<String>,
    pub assemblies: Vec<String>,
    pub dependencies: Vec<String>,
}
