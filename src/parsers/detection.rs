//! Format sniffing.
//!
//! Detection runs a fixed sequence of trial decodes over the buffered input
//! and returns the first match:
//!
//! 1. SPDX 3 JSON-LD (`@context` pointing at `spdx.org/rdf/3.0`)
//! 2. SPDX 2 JSON (`SPDXID` starting with `SPDX`)
//! 3. CycloneDX JSON (`bomFormat == "CycloneDX"`)
//! 4. CycloneDX XML (`<bom>` in the CycloneDX namespace)
//! 5. SPDX RDF/XML (`rdf:RDF` declaring the SPDX terms namespace)
//! 6. SPDX tag-value (first line starts with `SPDX`)
//! 7. SPDX YAML
//!
//! Every trial reads from its own cursor over the same bytes, so a failed
//! trial never affects the next one. Nothing matching yields
//! [`SpecFormat::Unknown`].

use crate::model::{FileFormat, SpecFormat};
use crate::utils::normalize_spec_version;
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::io::{Read, Seek, SeekFrom};

const CYCLONEDX_XML_NS: &str = "http://cyclonedx.org/schema/bom/";
const SPDX_RDF_TERMS: &str = "spdx.org/rdf/terms";
const SPDX3_CONTEXT: &str = "spdx.org/rdf/3.0";
const SPDX3_DEFAULT_VERSION: &str = "3.0.1";

/// Detected (spec, encoding, version) of an input document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatTriple {
    pub spec: SpecFormat,
    pub file_format: FileFormat,
    pub version: String,
}

impl FormatTriple {
    #[must_use]
    pub fn new(spec: SpecFormat, file_format: FileFormat, version: impl Into<String>) -> Self {
        Self {
            spec,
            file_format,
            version: version.into(),
        }
    }

    #[must_use]
    pub fn unknown() -> Self {
        Self::new(SpecFormat::Unknown, FileFormat::Unknown, "")
    }

    #[must_use]
    pub fn is_known(&self) -> bool {
        self.spec != SpecFormat::Unknown
    }
}

impl fmt::Display for FormatTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.spec, self.version, self.file_format)
    }
}

/// Ordered trial-decode format detector
#[derive(Debug, Default, Clone, Copy)]
pub struct Sniffer;

impl Sniffer {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Rewind a reader, buffer it once and detect its format
    pub fn detect_reader<R: Read + Seek>(&self, reader: &mut R) -> std::io::Result<(Vec<u8>, FormatTriple)> {
        reader.seek(SeekFrom::Start(0))?;
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        let triple = self.detect(&buf);
        Ok((buf, triple))
    }

    /// Detect the format of a buffered document
    #[must_use]
    pub fn detect(&self, bytes: &[u8]) -> FormatTriple {
        let json: Option<Value> = serde_json::from_slice(bytes).ok();
        if json.is_none() {
            tracing::debug!("input is not JSON, skipping JSON trials");
        }

        let trials: [(&str, &dyn Fn() -> Option<FormatTriple>); 7] = [
            ("spdx3-jsonld", &|| json.as_ref().and_then(probe_spdx3)),
            ("spdx-json", &|| json.as_ref().and_then(probe_spdx_json)),
            ("cyclonedx-json", &|| json.as_ref().and_then(probe_cyclonedx_json)),
            ("cyclonedx-xml", &|| probe_cyclonedx_xml(bytes)),
            ("spdx-rdf", &|| probe_spdx_rdf(bytes)),
            ("spdx-tag-value", &|| probe_tag_value(bytes)),
            ("spdx-yaml", &|| probe_spdx_yaml(bytes)),
        ];

        for (name, trial) in trials {
            if let Some(triple) = trial() {
                tracing::debug!(trial = name, format = %triple, "format detected");
                return triple;
            }
            tracing::debug!(trial = name, "no match");
        }
        FormatTriple::unknown()
    }
}

fn str_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str)
}

fn probe_spdx3(json: &Value) -> Option<FormatTriple> {
    let context = json.get("@context")?;
    let context_url = match context {
        Value::String(s) => Some(s.as_str()),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .find(|s| s.contains(SPDX3_CONTEXT)),
        _ => None,
    }
    .filter(|s| s.contains(SPDX3_CONTEXT))?;
    let graph = json.get("@graph").and_then(Value::as_array)?;

    let declared = graph
        .iter()
        .filter(|el| element_type(el) == Some("CreationInfo"))
        .find_map(|el| str_field(el, "specVersion"));
    let from_context = if context_url.contains("rdf/3.0.1") {
        Some("3.0.1")
    } else if context_url.contains("rdf/3.0/") {
        Some("3.0")
    } else {
        None
    };
    let version = declared.or(from_context).unwrap_or(SPDX3_DEFAULT_VERSION);
    Some(FormatTriple::new(
        SpecFormat::Spdx,
        FileFormat::JsonLd,
        normalize_spec_version(version),
    ))
}

/// `type` or `@type` of a JSON-LD graph element
pub(crate) fn element_type(el: &Value) -> Option<&str> {
    str_field(el, "type").or_else(|| str_field(el, "@type"))
}

fn probe_spdx_json(json: &Value) -> Option<FormatTriple> {
    let spdx_id = str_field(json, "SPDXID")?;
    if !spdx_id.starts_with("SPDX") {
        return None;
    }
    let version = str_field(json, "spdxVersion")
        .map(normalize_spec_version)
        .unwrap_or_default();
    Some(FormatTriple::new(SpecFormat::Spdx, FileFormat::Json, version))
}

fn probe_cyclonedx_json(json: &Value) -> Option<FormatTriple> {
    if str_field(json, "bomFormat")? != "CycloneDX" {
        return None;
    }
    let version = str_field(json, "specVersion").unwrap_or_default();
    Some(FormatTriple::new(
        SpecFormat::CycloneDx,
        FileFormat::Json,
        version.trim(),
    ))
}

/// Name, attributes and local name of the first element in an XML document
fn first_element(bytes: &[u8]) -> Option<(String, Vec<(String, String)>)> {
    let mut reader = Reader::from_reader(bytes);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e) | Event::Empty(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                let attrs = e
                    .attributes()
                    .filter_map(std::result::Result::ok)
                    .map(|a| {
                        let key = String::from_utf8_lossy(a.key.as_ref()).into_owned();
                        let value = a
                            .unescape_value()
                            .map(|v| v.into_owned())
                            .unwrap_or_default();
                        (key, value)
                    })
                    .collect();
                return Some((name, attrs));
            }
            Ok(Event::Eof) | Err(_) => return None,
            Ok(Event::Text(t)) if !t.is_empty() => return None,
            Ok(_) => {}
        }
        buf.clear();
    }
}

fn local_name(qname: &str) -> &str {
    qname.rsplit(':').next().unwrap_or(qname)
}

fn probe_cyclonedx_xml(bytes: &[u8]) -> Option<FormatTriple> {
    let (name, attrs) = first_element(bytes)?;
    if local_name(&name) != "bom" {
        return None;
    }
    let ns = attrs
        .iter()
        .filter(|(k, _)| k == "xmlns" || k.starts_with("xmlns:"))
        .map(|(_, v)| v.as_str())
        .find(|v| v.starts_with(CYCLONEDX_XML_NS))?;
    let version = ns.trim_start_matches(CYCLONEDX_XML_NS).trim_end_matches('/');
    Some(FormatTriple::new(SpecFormat::CycloneDx, FileFormat::Xml, version))
}

fn probe_spdx_rdf(bytes: &[u8]) -> Option<FormatTriple> {
    let (name, attrs) = first_element(bytes)?;
    if local_name(&name) != "RDF" {
        return None;
    }
    if !attrs.iter().any(|(_, v)| v.contains(SPDX_RDF_TERMS)) {
        return None;
    }
    let version = rdf_spec_version(bytes).unwrap_or_default();
    Some(FormatTriple::new(SpecFormat::Spdx, FileFormat::Rdf, version))
}

/// Text of the first `specVersion` element
fn rdf_spec_version(bytes: &[u8]) -> Option<String> {
    let mut reader = Reader::from_reader(bytes);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();
    let mut inside = false;
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                inside = local_name(&String::from_utf8_lossy(e.name().as_ref())) == "specVersion";
            }
            Ok(Event::Text(t)) if inside => {
                let text = t.unescape().ok()?;
                return Some(normalize_spec_version(&text));
            }
            Ok(Event::End(_)) => inside = false,
            Ok(Event::Eof) | Err(_) => return None,
            Ok(_) => {}
        }
        buf.clear();
    }
}

fn probe_tag_value(bytes: &[u8]) -> Option<FormatTriple> {
    let text = std::str::from_utf8(bytes).ok()?;
    let first = text
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty() && !l.starts_with('#'))?;
    if !first.starts_with("SPDX") {
        return None;
    }
    let version = text
        .lines()
        .filter_map(|l| l.trim().strip_prefix("SPDXVersion:"))
        .map(normalize_spec_version)
        .next()
        .unwrap_or_default();
    Some(FormatTriple::new(SpecFormat::Spdx, FileFormat::TagValue, version))
}

fn probe_spdx_yaml(bytes: &[u8]) -> Option<FormatTriple> {
    let yaml: serde_yaml::Value = serde_yaml::from_slice(bytes).ok()?;
    let spdx_id = yaml.get("SPDXID").and_then(serde_yaml::Value::as_str)?;
    if !spdx_id.starts_with("SPDX") {
        return None;
    }
    let version = yaml
        .get("spdxVersion")
        .and_then(serde_yaml::Value::as_str)
        .map(normalize_spec_version)
        .unwrap_or_default();
    Some(FormatTriple::new(SpecFormat::Spdx, FileFormat::Yaml, version))
}
