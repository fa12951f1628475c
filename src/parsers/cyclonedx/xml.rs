//! CycloneDX XML structures.
//!
//! XML wraps every collection in a container element
//! (`<components><component>...`) and carries identities as attributes.
//! These structures mirror that layout and are converted into the JSON
//! structures from [`super::model`] right after decoding.

use super::model::{
    CdxBom, CdxComponent, CdxComposition, CdxContact, CdxDependency, CdxExternalReference,
    CdxHash, CdxLicense, CdxLicenseChoice, CdxLifecycle, CdxMetadata, CdxOrganization, CdxSwid,
    CdxTool, CdxVulnerability,
};
use crate::error::{ErrorContext, Result};
use serde::Deserialize;

/// Decode a CycloneDX XML document into the shared structures
pub(crate) fn parse(bytes: &[u8]) -> Result<CdxBom> {
    let text = String::from_utf8_lossy(bytes);
    let bom: BomXml = quick_xml::de::from_str(&text).context("CycloneDX XML")?;
    Ok(bom.into())
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename = "bom", default)]
struct BomXml {
    #[serde(rename = "@serialNumber")]
    serial_number: Option<String>,
    /// Document version; the spec version comes from the namespace
    #[serde(rename = "@version")]
    version: Option<i64>,
    metadata: Option<MetadataXml>,
    components: Option<ComponentsXml>,
    dependencies: Option<DependenciesXml>,
    vulnerabilities: Option<VulnerabilitiesXml>,
    compositions: Option<CompositionsXml>,
    #[serde(rename = "externalReferences")]
    external_references: Option<ExternalReferencesXml>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MetadataXml {
    timestamp: Option<String>,
    tools: Option<ToolsXml>,
    authors: Option<ContactsXml>,
    component: Option<ComponentXml>,
    manufacturer: Option<OrganizationXml>,
    manufacture: Option<OrganizationXml>,
    supplier: Option<OrganizationXml>,
    lifecycles: Option<LifecyclesXml>,
    licenses: Option<LicensesXml>,
}

/// `<tool>` children (1.4) or `<components>`/`<services>` (1.5+)
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ToolsXml {
    tool: Vec<ToolXml>,
    components: Option<ToolComponentsXml>,
    services: Option<ToolServicesXml>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ToolXml {
    vendor: Option<String>,
    name: Option<String>,
    version: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ToolComponentsXml {
    component: Vec<ToolXml>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ToolServicesXml {
    service: Vec<ToolXml>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ContactsXml {
    author: Vec<ContactXml>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ContactXml {
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OrganizationXml {
    name: Option<String>,
    url: Vec<String>,
    contact: Vec<ContactXml>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LifecyclesXml {
    lifecycle: Vec<LifecycleXml>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LifecycleXml {
    phase: Option<String>,
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ComponentsXml {
    component: Vec<ComponentXml>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ComponentXml {
    #[serde(rename = "@type")]
    component_type: Option<String>,
    #[serde(rename = "@bom-ref")]
    bom_ref: Option<String>,
    supplier: Option<OrganizationXml>,
    manufacturer: Option<OrganizationXml>,
    author: Option<String>,
    authors: Option<ContactsXml>,
    group: Option<String>,
    name: Option<String>,
    version: Option<String>,
    description: Option<String>,
    hashes: Option<HashesXml>,
    licenses: Option<LicensesXml>,
    copyright: Option<String>,
    cpe: Option<String>,
    purl: Option<String>,
    #[serde(rename = "omniborId")]
    omnibor_id: Vec<String>,
    swhid: Vec<String>,
    swid: Option<SwidXml>,
    #[serde(rename = "externalReferences")]
    external_references: Option<ExternalReferencesXml>,
    components: Option<ComponentsXml>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SwidXml {
    #[serde(rename = "@tagId")]
    tag_id: Option<String>,
    #[serde(rename = "@name")]
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct HashesXml {
    hash: Vec<HashXml>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct HashXml {
    #[serde(rename = "@alg")]
    alg: String,
    #[serde(rename = "$text")]
    content: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LicensesXml {
    #[serde(rename = "$value")]
    choices: Vec<LicenseChoiceXml>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum LicenseChoiceXml {
    License(LicenseXml),
    Expression(ExpressionXml),
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LicenseXml {
    #[serde(rename = "@acknowledgement")]
    acknowledgement: Option<String>,
    id: Option<String>,
    name: Option<String>,
    url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ExpressionXml {
    #[serde(rename = "@acknowledgement")]
    acknowledgement: Option<String>,
    #[serde(rename = "$text")]
    value: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ExternalReferencesXml {
    reference: Vec<ExternalReferenceXml>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ExternalReferenceXml {
    #[serde(rename = "@type")]
    ref_type: String,
    url: String,
    hashes: Option<HashesXml>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DependenciesXml {
    dependency: Vec<DependencyXml>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DependencyXml {
    #[serde(rename = "@ref")]
    ref_field: Option<String>,
    dependency: Vec<DependencyXml>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct VulnerabilitiesXml {
    vulnerability: Vec<VulnerabilityXml>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct VulnerabilityXml {
    id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CompositionsXml {
    composition: Vec<CompositionXml>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CompositionXml {
    aggregate: Option<String>,
    assemblies: Option<RefsXml>,
    dependencies: Option<RefsXml>,
}

/// `<assembly ref=".."/>` / `<dependency ref=".."/>` lists
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RefsXml {
    #[serde(rename = "$value")]
    items: Vec<RefXml>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RefXml {
    #[serde(rename = "@ref")]
    ref_field: Option<String>,
}

// ============================================================================
// Conversion into the shared structures
// ============================================================================

impl From<BomXml> for CdxBom {
    fn from(x: BomXml) -> Self {
        Self {
            bom_format: None,
            spec_version: None,
            serial_number: x.serial_number,
            version: x.version,
            metadata: x.metadata.map(Into::into),
            components: components(x.components),
            dependencies: x
                .dependencies
                .map(|d| d.dependency.into_iter().map(Into::into).collect())
                .unwrap_or_default(),
            vulnerabilities: x
                .vulnerabilities
                .map(|v| {
                    v.vulnerability
                        .into_iter()
                        .map(|v| CdxVulnerability { id: v.id })
                        .collect()
                })
                .unwrap_or_default(),
            compositions: x
                .compositions
                .map(|c| c.composition.into_iter().map(Into::into).collect())
                .unwrap_or_default(),
            external_references: external_references(x.external_references),
        }
    }
}

impl From<MetadataXml> for CdxMetadata {
    fn from(x: MetadataXml) -> Self {
        let tools = x
            .tools
            .map(|t| {
                let components = t.components.map(|c| c.component).unwrap_or_default();
                let services = t.services.map(|s| s.service).unwrap_or_default();
                t.tool
                    .into_iter()
                    .chain(components)
                    .chain(services)
                    .map(Into::into)
                    .collect()
            })
            .unwrap_or_default();
        Self {
            timestamp: x.timestamp,
            tools,
            authors: contacts(x.authors),
            component: x.component.map(Into::into),
            manufacturer: x.manufacturer.map(Into::into),
            manufacture: x.manufacture.map(Into::into),
            supplier: x.supplier.map(Into::into),
            lifecycles: x
                .lifecycles
                .map(|l| {
                    l.lifecycle
                        .into_iter()
                        .map(|l| CdxLifecycle {
                            phase: l.phase,
                            name: l.name,
                        })
                        .collect()
                })
                .unwrap_or_default(),
            licenses: licenses(x.licenses),
        }
    }
}

impl From<ToolXml> for CdxTool {
    fn from(x: ToolXml) -> Self {
        Self {
            vendor: x.vendor,
            name: x.name,
            version: x.version,
        }
    }
}

impl From<ContactXml> for CdxContact {
    fn from(x: ContactXml) -> Self {
        Self {
            name: x.name,
            email: x.email,
            phone: x.phone,
        }
    }
}

impl From<OrganizationXml> for CdxOrganization {
    fn from(x: OrganizationXml) -> Self {
        Self {
            name: x.name,
            url: x.url,
            contact: x.contact.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<ComponentXml> for CdxComponent {
    fn from(x: ComponentXml) -> Self {
        Self {
            component_type: x.component_type,
            bom_ref: x.bom_ref,
            name: x.name,
            version: x.version,
            group: x.group,
            description: x.description,
            author: x.author,
            authors: contacts(x.authors),
            supplier: x.supplier.map(Into::into),
            manufacturer: x.manufacturer.map(Into::into),
            copyright: x.copyright,
            purl: x.purl,
            cpe: x.cpe,
            swid: x.swid.map(|s| CdxSwid {
                tag_id: s.tag_id,
                name: s.name,
            }),
            omnibor_id: x.omnibor_id,
            swhid: x.swhid,
            hashes: hashes(x.hashes),
            licenses: licenses(x.licenses),
            external_references: external_references(x.external_references),
            components: components(x.components),
        }
    }
}

impl From<DependencyXml> for CdxDependency {
    fn from(x: DependencyXml) -> Self {
        Self {
            ref_field: x.ref_field,
            depends_on: x
                .dependency
                .into_iter()
                .filter_map(|d| d.ref_field)
                .collect(),
        }
    }
}

impl From<CompositionXml> for CdxComposition {
    fn from(x: CompositionXml) -> Self {
        let refs = |r: Option<RefsXml>| -> Vec<String> {
            r.map(|r| r.items.into_iter().filter_map(|i| i.ref_field).collect())
                .unwrap_or_default()
        };
        Self {
            aggregate: x.aggregate,
            assemblies: refs(x.assemblies),
            dependencies: refs(x.dependencies),
        }
    }
}

fn components(x: Option<ComponentsXml>) -> Vec<CdxComponent> {
    x.map(|c| c.component.into_iter().map(Into::into).collect())
        .unwrap_or_default()
}

fn contacts(x: Option<ContactsXml>) -> Vec<CdxContact> {
    x.map(|c| c.author.into_iter().map(Into::into).collect())
        .unwrap_or_default()
}

fn hashes(x: Option<HashesXml>) -> Vec<CdxHash> {
    x.map(|h| {
        h.hash
            .into_iter()
            .map(|h| CdxHash {
                alg: h.alg,
                content: h.content,
            })
            .collect()
    })
    .unwrap_or_default()
}

fn licenses(x: Option<LicensesXml>) -> Vec<CdxLicenseChoice> {
    x.map(|l| {
        l.choices
            .into_iter()
            .map(|choice| match choice {
                LicenseChoiceXml::License(l) => CdxLicenseChoice {
                    license: Some(CdxLicense {
                        id: l.id,
                        name: l.name,
                        url: l.url,
                        acknowledgement: l.acknowledgement,
                    }),
                    expression: None,
                    acknowledgement: None,
                },
                LicenseChoiceXml::Expression(e) => CdxLicenseChoice {
                    license: None,
                    expression: Some(e.value),
                    acknowledgement: e.acknowledgement,
                },
            })
            .collect()
    })
    .unwrap_or_default()
}

fn external_references(x: Option<ExternalReferencesXml>) -> Vec<CdxExternalReference> {
    x.map(|r| {
        r.reference
            .into_iter()
            .map(|r| CdxExternalReference {
                ref_type: r.ref_type,
                url: r.url,
                hashes: hashes(r.hashes),
            })
            .collect()
    })
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<bom xmlns="http://cyclonedx.org/schema/bom/1.6" serialNumber="urn:uuid:3e671687-395b-41f5-a30f-a58921a69b79" version="1">
  <metadata>
    <timestamp>2024-01-01T00:00:00Z</timestamp>
    <tools>
      <components>
        <component type="application"><name>gen</name><version>3.1</version></component>
      </components>
    </tools>
    <component type="application" bom-ref="app">
      <name>app</name>
      <version>1.0</version>
    </component>
  </metadata>
  <components>
    <component type="library" bom-ref="lib-a">
      <name>lib-a</name>
      <version>2.0</version>
      <hashes><hash alg="SHA-256">abcd</hash></hashes>
      <licenses>
        <license acknowledgement="concluded"><id>MIT</id></license>
        <expression>Apache-2.0 OR MIT</expression>
      </licenses>
      <purl>pkg:npm/lib-a@2.0</purl>
      <components>
        <component type="library" bom-ref="lib-b"><name>lib-b</name></component>
      </components>
    </component>
  </components>
  <dependencies>
    <dependency ref="app"><dependency ref="lib-a"/></dependency>
  </dependencies>
</bom>"#;

    #[test]
    fn test_xml_converts_to_shared_shape() {
        let bom = parse(SAMPLE.as_bytes()).expect("valid xml");
        assert_eq!(bom.version, Some(1));
        let meta = bom.metadata.as_ref().expect("metadata");
        assert_eq!(meta.tools.len(), 1);
        assert_eq!(meta.component.as_ref().and_then(|c| c.bom_ref.as_deref()), Some("app"));

        let lib = &bom.components[0];
        assert_eq!(lib.hashes[0].content, "abcd");
        assert_eq!(lib.licenses.len(), 2);
        assert_eq!(
            lib.licenses[0].license.as_ref().and_then(|l| l.acknowledgement.as_deref()),
            Some("concluded")
        );
        assert_eq!(lib.licenses[1].expression.as_deref(), Some("Apache-2.0 OR MIT"));
        assert_eq!(lib.components.len(), 1);

        assert_eq!(bom.dependencies[0].depends_on, vec!["lib-a"]);
    }
}
