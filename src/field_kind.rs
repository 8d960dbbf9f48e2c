//! Mapping of declared data types to field kinds.

use crate::descriptor::DataType;
use crate::types::{FieldKind, LinkType};

/// Map a declared data type to its field kind.
///
/// First match wins: integer, number, text, date, boolean, link, array,
/// location, and object for everything else. `Nullable` is looked through.
pub fn field_kind(data_type: &DataType) -> FieldKind {
    let data_type = data_type.unwrap_nullable();

    match data_type {
        DataType::Integer => FieldKind::Integer,
        DataType::Float | DataType::Double | DataType::Decimal => FieldKind::Number,
        DataType::String => FieldKind::Text,
        DataType::DateTime => FieldKind::Date,
        DataType::Bool => FieldKind::Boolean,
        _ if link_type(data_type).is_some() => FieldKind::Link,
        _ if data_type.is_collection() => FieldKind::Array,
        DataType::Location => FieldKind::Location,
        _ => FieldKind::Object,
    }
}

/// Link target of a declared data type, `None` if it is not a link shape.
pub fn link_type(data_type: &DataType) -> Option<LinkType> {
    match data_type.unwrap_nullable() {
        DataType::Asset => Some(LinkType::Asset),
        DataType::Entry(_) => Some(LinkType::Entry),
        DataType::Model {
            content_type: true, ..
        } => Some(LinkType::Entry),
        _ => None,
    }
}

/// Kind of the elements of a collection.
///
/// Only links keep their kind; every other element kind degrades to
/// `Symbol`. Returns `None` for non-collections.
pub fn item_kind(data_type: &DataType) -> Option<FieldKind> {
    let element = data_type.element_type()?;
    match field_kind(element) {
        FieldKind::Link => Some(FieldKind::Link),
        _ => Some(FieldKind::Symbol),
    }
}

/// Link target of the elements of a collection.
pub fn item_link_type(data_type: &DataType) -> Option<LinkType> {
    data_type.element_type().and_then(link_type)
}
