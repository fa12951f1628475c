//! Free-text entity grammar used by SPDX creator, supplier and originator
//! fields.
//!
//! ```text
//! entities := entity ( "," entity )*
//! entity   := [ type ":" ] name [ "(" contact ")" ]
//! type     := "Person" | "Organization" | "Tool"
//! ```
//!
//! The type token binds first, then the name, then an optional trailing
//! parenthesized contact. `NOASSERTION` and `NONE` denote absence. A comma
//! only separates entities when the text after it starts with a type token,
//! so `Organization: Acme, Inc.` stays one entity.

use crate::model::{Author, EntityType, Organization, Tool};

/// A parsed free-text entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub entity_type: EntityType,
    pub name: String,
    pub email: Option<String>,
}

impl Entity {
    #[must_use]
    pub fn to_author(&self) -> Author {
        Author::new(self.name.clone(), self.entity_type).with_email(self.email.clone())
    }

    #[must_use]
    pub fn to_organization(&self) -> Organization {
        Organization {
            name: self.name.clone(),
            email: self.email.clone(),
            ..Organization::default()
        }
    }

    /// Interpret a `Tool:` entity name as `name-version`
    #[must_use]
    pub fn to_tool(&self) -> Tool {
        let (name, version) = split_tool(&self.name);
        Tool::new(name, version)
    }
}

fn is_absent(text: &str) -> bool {
    let t = text.trim();
    t.is_empty() || t.eq_ignore_ascii_case("NOASSERTION") || t.eq_ignore_ascii_case("NONE")
}

/// Split off a leading `Person:` / `Organization:` / `Tool:` token
fn split_type(text: &str) -> (EntityType, &str) {
    if let Some((head, rest)) = text.split_once(':') {
        let ty = EntityType::from_token(head);
        if ty != EntityType::Unknown {
            return (ty, rest);
        }
    }
    (EntityType::Unknown, text)
}

/// Parse a single entity. Returns `None` for absent values.
#[must_use]
pub fn parse_entity(text: &str) -> Option<Entity> {
    if is_absent(text) {
        return None;
    }
    let (entity_type, rest) = split_type(text.trim());
    let rest = rest.trim();

    let (name, contact) = match (rest.rfind('('), rest.ends_with(')')) {
        (Some(open), true) => (&rest[..open], Some(&rest[open + 1..rest.len() - 1])),
        _ => (rest, None),
    };

    let name = if is_absent(name) { "" } else { name.trim() };
    let email = contact
        .map(str::trim)
        .filter(|c| !is_absent(c))
        .map(str::to_string);

    if name.is_empty() && email.is_none() {
        return None;
    }
    Some(Entity {
        entity_type,
        name: name.to_string(),
        email,
    })
}

fn starts_with_type_token(text: &str) -> bool {
    text.split_once(':')
        .is_some_and(|(head, _)| EntityType::from_token(head) != EntityType::Unknown)
}

/// Parse a comma separated list of entities
#[must_use]
pub fn parse_entities(text: &str) -> Vec<Entity> {
    let mut segments: Vec<String> = Vec::new();
    for part in text.split(',') {
        match segments.last_mut() {
            Some(prev) if !starts_with_type_token(part.trim()) => {
                prev.push(',');
                prev.push_str(part);
            }
            _ => segments.push(part.to_string()),
        }
    }
    segments.iter().filter_map(|s| parse_entity(s)).collect()
}

/// Split a tool identifier at its last `-` when the suffix looks like a version
#[must_use]
pub fn split_tool(text: &str) -> (String, Option<String>) {
    let text = text.trim();
    match text.rsplit_once('-') {
        Some((name, version))
            if !name.trim().is_empty() && version.chars().any(|c| c.is_ascii_digit()) =>
        {
            (name.trim().to_string(), Some(version.trim().to_string()))
        }
        _ => (text.to_string(), None),
    }
}
