//! Core types for compiled content types.

use serde::{Deserialize, Serialize};

use crate::appearance::WidgetControl;
use crate::validation::Validator;

/// Schema value category of a content type field.
///
/// Serialized with the PascalCase names the Management API uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    Integer,
    Number,
    Text,
    Date,
    Boolean,
    Link,
    Array,
    Object,
    Location,
    /// Short text. Used for item kinds of scalar collections.
    Symbol,
}

impl FieldKind {
    /// Returns the wire name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Integer => "Integer",
            FieldKind::Number => "Number",
            FieldKind::Text => "Text",
            FieldKind::Date => "Date",
            FieldKind::Boolean => "Boolean",
            FieldKind::Link => "Link",
            FieldKind::Array => "Array",
            FieldKind::Object => "Object",
            FieldKind::Location => "Location",
            FieldKind::Symbol => "Symbol",
        }
    }

    /// Parse a wire name.
    ///
    /// Returns `None` for kinds this crate does not model (e.g. `RichText`).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Integer" => Some(FieldKind::Integer),
            "Number" => Some(FieldKind::Number),
            "Text" => Some(FieldKind::Text),
            "Date" => Some(FieldKind::Date),
            "Boolean" => Some(FieldKind::Boolean),
            "Link" => Some(FieldKind::Link),
            "Array" => Some(FieldKind::Array),
            "Object" => Some(FieldKind::Object),
            "Location" => Some(FieldKind::Location),
            "Symbol" => Some(FieldKind::Symbol),
            _ => None,
        }
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target of a `Link` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinkType {
    Asset,
    Entry,
}

impl LinkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkType::Asset => "Asset",
            LinkType::Entry => "Entry",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Asset" => Some(LinkType::Asset),
            "Entry" => Some(LinkType::Entry),
            _ => None,
        }
    }
}

/// Schema of the elements of a collection field.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemsSchema {
    pub kind: FieldKind,
    pub link_type: Option<LinkType>,
    /// Per-element constraints (everything except size).
    pub validations: Vec<Validator>,
}

/// A single field of a content type.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDefinition {
    pub id: String,
    pub name: String,
    pub kind: FieldKind,
    pub disabled: bool,
    pub omitted: bool,
    pub localized: bool,
    pub required: bool,
    pub link_type: Option<LinkType>,
    pub validations: Vec<Validator>,
    /// Present only on collection fields.
    pub items: Option<ItemsSchema>,
}

impl FieldDefinition {
    /// Create a field with every flag off and no validations.
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            disabled: false,
            omitted: false,
            localized: false,
            required: false,
            link_type: None,
            validations: Vec::new(),
            items: None,
        }
    }

    /// Returns true if this field holds a collection.
    pub fn is_collection(&self) -> bool {
        self.items.is_some()
    }
}

/// A normalized content type document.
///
/// `version` is the optimistic-concurrency token. It is only populated when a
/// definition with the same id exists remotely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "crate::wire::WireContentType", from = "crate::wire::WireContentType")]
pub struct ContentTypeDefinition {
    pub id: String,
    pub name: String,
    pub display_field: Option<String>,
    pub description: Option<String>,
    pub fields: Vec<FieldDefinition>,
    pub version: Option<u64>,
}

impl ContentTypeDefinition {
    /// Create an empty definition with no fields and no version.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            display_field: None,
            description: None,
            fields: Vec::new(),
            version: None,
        }
    }

    /// Look up a field by id.
    pub fn field(&self, id: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.id == id)
    }
}

/// A compiled content type together with the widget controls its fields
/// opted into.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledContentType {
    #[serde(rename = "contentType")]
    pub definition: ContentTypeDefinition,
    #[serde(rename = "editorControls")]
    pub controls: Vec<WidgetControl>,
}

impl CompiledContentType {
    /// Wrap a definition with no widget controls.
    pub fn new(definition: ContentTypeDefinition) -> Self {
        Self {
            definition,
            controls: Vec::new(),
        }
    }
}

/// Options controlling synchronization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncOptions {
    /// Upsert definitions even when their id already exists remotely.
    pub force_update: bool,
    /// Activate (publish) every definition after upserting it.
    pub publish_automatically: bool,
}

impl SyncOptions {
    /// Create options with both flags off (the default).
    ///
    /// Pre-existing remote content types are left untouched and nothing is
    /// published.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether existing content types are overwritten.
    pub fn force_update(mut self, force_update: bool) -> Self {
        self.force_update = force_update;
        self
    }

    /// Set whether upserted content types are activated.
    pub fn publish_automatically(mut self, publish: bool) -> Self {
        self.publish_automatically = publish;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_kind_wire_names() {
        assert_eq!(FieldKind::Symbol.as_str(), "Symbol");
        assert_eq!(FieldKind::parse("Location"), Some(FieldKind::Location));
        assert_eq!(FieldKind::parse("RichText"), None);
        assert_eq!(
            serde_json::to_value(FieldKind::Integer).unwrap(),
            serde_json::json!("Integer")
        );
    }

    #[test]
    fn link_type_parse() {
        assert_eq!(LinkType::parse("Asset"), Some(LinkType::Asset));
        assert_eq!(LinkType::parse("Entry"), Some(LinkType::Entry));
        assert_eq!(LinkType::parse("entry"), None);
    }

    #[test]
    fn sync_options_default_is_conservative() {
        let opts = SyncOptions::new();
        assert!(!opts.force_update);
        assert!(!opts.publish_automatically);

        let opts = SyncOptions::new()
            .force_update(true)
            .publish_automatically(true);
        assert!(opts.force_update);
        assert!(opts.publish_automatically);
    }

    #[test]
    fn definition_field_lookup() {
        let mut def = ContentTypeDefinition::new("person", "Person");
        def.fields
            .push(FieldDefinition::new("age", "Age", FieldKind::Integer));
        assert!(def.field("age").is_some());
        assert!(def.field("name").is_none());
        assert!(!def.fields[0].is_collection());
    }
}
