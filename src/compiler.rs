//! Schema compilation - turns type descriptors into content type definitions.

use crate::appearance::translate_appearance;
use crate::descriptor::{ContentFieldAnnotation, MemberDescriptor, TypeDescriptor};
use crate::field_kind::{field_kind, item_kind, item_link_type, link_type};
use crate::types::{CompiledContentType, ContentTypeDefinition, FieldDefinition, FieldKind, ItemsSchema};
use crate::validation::translate_validation;

/// Compile a set of annotated types.
///
/// Types are stable-sorted by their annotation `order` (0 when absent), so
/// ties keep the input order. Each type is compiled only when the iterator
/// reaches it. Compilation never fails; calling this again re-derives the same
/// output from the descriptors.
pub fn compile<'a, I>(types: I) -> impl Iterator<Item = CompiledContentType> + 'a
where
    I: IntoIterator<Item = &'a TypeDescriptor>,
{
    let mut ordered: Vec<&'a TypeDescriptor> = types.into_iter().collect();
    ordered.sort_by_key(|t| t.order());
    ordered.into_iter().map(compile_type)
}

/// Compile a single type into its definition and widget controls.
pub fn compile_type(descriptor: &TypeDescriptor) -> CompiledContentType {
    let annotation = descriptor.content_type.clone().unwrap_or_default();

    let mut definition = ContentTypeDefinition::new(
        annotation.id.unwrap_or_else(|| descriptor.ident.clone()),
        annotation.name.unwrap_or_else(|| descriptor.ident.clone()),
    );
    definition.display_field = annotation.display_field;
    definition.description = annotation.description;

    let mut compiled = CompiledContentType::new(definition);

    for member in descriptor.members.iter().filter(|m| m.is_eligible()) {
        let field = compile_field(member);

        if let Some(appearance) = &member.appearance {
            compiled
                .controls
                .push(translate_appearance(appearance).bind(field.id.clone()));
        }

        compiled.definition.fields.push(field);
    }

    compiled
}

fn compile_field(member: &MemberDescriptor) -> FieldDefinition {
    let defaults = ContentFieldAnnotation::default();
    let annotation = member.field.as_ref().unwrap_or(&defaults);
    let data_type = &member.data_type;

    let kind = annotation.kind.unwrap_or_else(|| field_kind(data_type));

    let mut field = FieldDefinition::new(
        annotation.id.clone().unwrap_or_else(|| member.name.clone()),
        annotation.name.clone().unwrap_or_else(|| member.name.clone()),
        kind,
    );
    field.disabled = annotation.disabled;
    field.omitted = annotation.omitted;
    field.localized = annotation.localized;
    field.required = annotation.required;
    field.link_type = annotation.link_type.or_else(|| match kind {
        FieldKind::Link => link_type(data_type),
        _ => None,
    });

    if data_type.is_collection() {
        let items_kind = annotation.items_kind.or_else(|| item_kind(data_type));
        if let Some(items_kind) = items_kind {
            field.items = Some(ItemsSchema {
                kind: items_kind,
                link_type: annotation
                    .items_link_type
                    .or_else(|| item_link_type(data_type)),
                validations: Vec::new(),
            });
        }
    }

    for annotation in &member.validations {
        let validator = translate_validation(annotation);
        match field.items.as_mut() {
            Some(items) if !validator.is_size() => items.validations.push(validator),
            _ => field.validations.push(validator),
        }
    }

    field
}
