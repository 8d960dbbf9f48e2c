//! Declarative model descriptions.
//!
//! A [`TypeDescriptor`] is the per-type mapping table the compiler reads:
//! the type's content type annotation plus its members, in declaration
//! order, each with a declared [`DataType`] and the annotations attached to
//! it. Descriptors are built in code through [`ContentModel`] or loaded from
//! a JSON scope manifest.
//!
//! ```
//! use contentful_codefirst::{
//!     ContentModel, ContentTypeAnnotation, DataType, MemberDescriptor, TypeDescriptor,
//!     ValidationAnnotation,
//! };
//!
//! struct Person;
//!
//! impl ContentModel for Person {
//!     fn type_name() -> &'static str {
//!         "Person"
//!     }
//!
//!     fn describe() -> TypeDescriptor {
//!         TypeDescriptor::new(Self::type_name())
//!             .content_type(ContentTypeAnnotation::new())
//!             .member(MemberDescriptor::new("firstName", DataType::String))
//!             .member(
//!                 MemberDescriptor::new("age", DataType::Integer)
//!                     .validate(ValidationAnnotation::range(0.0, 150.0)),
//!             )
//!     }
//! }
//!
//! assert_eq!(Person::describe().members.len(), 2);
//! ```

use serde::{Deserialize, Serialize};

use crate::appearance::AppearanceAnnotation;
use crate::types::{FieldKind, LinkType};
use crate::validation::ValidationAnnotation;

/// Declared data type of a model member.
///
/// Manifest form is externally tagged: `"string"`, `{ "list": "string" }`,
/// `{ "entry": { "model": { "name": "Person", "contentType": true } } }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DataType {
    Integer,
    Float,
    Double,
    Decimal,
    String,
    DateTime,
    Bool,
    /// A linked binary asset.
    Asset,
    /// Generic linked-entry wrapper around a model type.
    Entry(Box<DataType>),
    /// Geographic coordinates.
    Location,
    /// Optional value; transparent to kind mapping.
    Nullable(Box<DataType>),
    List(Box<DataType>),
    Set(Box<DataType>),
    Array(Box<DataType>),
    /// Key/value collection. The value type is the element type.
    Map(Box<DataType>, Box<DataType>),
    /// Another model type. Content type models map to entry links.
    Model {
        name: String,
        #[serde(default, rename = "contentType")]
        content_type: bool,
    },
    /// Untyped or free-form value.
    Any,
}

impl DataType {
    pub fn nullable(inner: DataType) -> Self {
        DataType::Nullable(Box::new(inner))
    }

    pub fn list(element: DataType) -> Self {
        DataType::List(Box::new(element))
    }

    pub fn set(element: DataType) -> Self {
        DataType::Set(Box::new(element))
    }

    pub fn array(element: DataType) -> Self {
        DataType::Array(Box::new(element))
    }

    pub fn map(key: DataType, value: DataType) -> Self {
        DataType::Map(Box::new(key), Box::new(value))
    }

    pub fn entry(inner: DataType) -> Self {
        DataType::Entry(Box::new(inner))
    }

    /// Reference to a model type that carries a content type annotation.
    pub fn content_model<T: ContentModel>() -> Self {
        DataType::Model {
            name: T::type_name().to_string(),
            content_type: true,
        }
    }

    /// Reference to a plain (non content type) model.
    pub fn object(name: impl Into<String>) -> Self {
        DataType::Model {
            name: name.into(),
            content_type: false,
        }
    }

    /// Strip any `Nullable` wrappers.
    pub fn unwrap_nullable(&self) -> &DataType {
        let mut current = self;
        while let DataType::Nullable(inner) = current {
            current = inner;
        }
        current
    }

    /// Element type if this is a collection, `None` otherwise.
    pub fn element_type(&self) -> Option<&DataType> {
        match self.unwrap_nullable() {
            DataType::List(element) | DataType::Set(element) | DataType::Array(element) => {
                Some(element)
            }
            DataType::Map(_, value) => Some(value),
            _ => None,
        }
    }

    /// Returns true for types that enumerate their elements.
    pub fn is_collection(&self) -> bool {
        self.element_type().is_some()
    }
}

/// Annotation marking a type as a content type source.
///
/// Every property is optional; unset id and name default to the type ident.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentTypeAnnotation {
    pub id: Option<String>,
    pub name: Option<String>,
    pub display_field: Option<String>,
    pub description: Option<String>,
    /// Compile order across types. Lower first, ties keep scan order.
    pub order: i32,
}

impl ContentTypeAnnotation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn display_field(mut self, field: impl Into<String>) -> Self {
        self.display_field = Some(field.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }
}

/// Field-level overrides for a member.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentFieldAnnotation {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<FieldKind>,
    pub link_type: Option<LinkType>,
    #[serde(rename = "itemsType")]
    pub items_kind: Option<FieldKind>,
    pub items_link_type: Option<LinkType>,
    pub disabled: bool,
    pub omitted: bool,
    pub localized: bool,
    pub required: bool,
}

impl ContentFieldAnnotation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn kind(mut self, kind: FieldKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn link_type(mut self, link_type: LinkType) -> Self {
        self.link_type = Some(link_type);
        self
    }

    pub fn items_kind(mut self, kind: FieldKind) -> Self {
        self.items_kind = Some(kind);
        self
    }

    pub fn items_link_type(mut self, link_type: LinkType) -> Self {
        self.items_link_type = Some(link_type);
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn omitted(mut self, omitted: bool) -> Self {
        self.omitted = omitted;
        self
    }

    pub fn localized(mut self, localized: bool) -> Self {
        self.localized = localized;
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }
}

fn yes() -> bool {
    true
}

/// One member of a model type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberDescriptor {
    pub name: String,
    pub data_type: DataType,
    /// Members without an externally settable accessor never become fields.
    #[serde(default = "yes")]
    pub settable: bool,
    #[serde(default)]
    pub ignored: bool,
    #[serde(default)]
    pub field: Option<ContentFieldAnnotation>,
    /// Validation annotations, in declaration order.
    #[serde(default)]
    pub validations: Vec<ValidationAnnotation>,
    #[serde(default)]
    pub appearance: Option<AppearanceAnnotation>,
}

impl MemberDescriptor {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            settable: true,
            ignored: false,
            field: None,
            validations: Vec::new(),
            appearance: None,
        }
    }

    /// Mark the member as having no settable accessor.
    pub fn read_only(mut self) -> Self {
        self.settable = false;
        self
    }

    /// Exclude the member from field generation.
    pub fn ignore(mut self) -> Self {
        self.ignored = true;
        self
    }

    pub fn field(mut self, annotation: ContentFieldAnnotation) -> Self {
        self.field = Some(annotation);
        self
    }

    pub fn validate(mut self, annotation: ValidationAnnotation) -> Self {
        self.validations.push(annotation);
        self
    }

    pub fn appearance(mut self, annotation: AppearanceAnnotation) -> Self {
        self.appearance = Some(annotation);
        self
    }

    /// Returns true if the member becomes a field.
    pub fn is_eligible(&self) -> bool {
        self.settable && !self.ignored
    }
}

/// Mapping table of one model type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDescriptor {
    /// The type's own declared identifier.
    pub ident: String,
    /// Only exported types are picked up by the scanner.
    #[serde(default = "yes")]
    pub exported: bool,
    #[serde(default)]
    pub content_type: Option<ContentTypeAnnotation>,
    #[serde(default)]
    pub members: Vec<MemberDescriptor>,
}

impl TypeDescriptor {
    pub fn new(ident: impl Into<String>) -> Self {
        Self {
            ident: ident.into(),
            exported: true,
            content_type: None,
            members: Vec::new(),
        }
    }

    pub fn content_type(mut self, annotation: ContentTypeAnnotation) -> Self {
        self.content_type = Some(annotation);
        self
    }

    pub fn member(mut self, member: MemberDescriptor) -> Self {
        self.members.push(member);
        self
    }

    /// Hide the type from scanning.
    pub fn private(mut self) -> Self {
        self.exported = false;
        self
    }

    /// Compile order from the annotation, 0 when absent.
    pub fn order(&self) -> i32 {
        self.content_type.as_ref().map_or(0, |a| a.order)
    }
}

/// A Rust type that describes itself as a content model.
pub trait ContentModel {
    /// The type's declared identifier.
    fn type_name() -> &'static str;

    /// Build the type's mapping table.
    fn describe() -> TypeDescriptor;
}
