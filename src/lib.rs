//! Contentful Code-First
//!
//! Compile annotated model types into Contentful content type definitions
//! and editor controls, then create or update them through the management
//! API.
//!
//! Rust has no runtime reflection, so model types describe themselves with a
//! [`TypeDescriptor`], either in code via [`ContentModel`] or loaded from a
//! JSON scope manifest.
//!
//! # Example
//!
//! ```
//! use contentful_codefirst::{
//!     compile, ContentFieldAnnotation, ContentTypeAnnotation, DataType, FieldKind,
//!     MemberDescriptor, TypeDescriptor, ValidationAnnotation,
//! };
//!
//! let person = TypeDescriptor::new("Person")
//!     .content_type(ContentTypeAnnotation::new().display_field("name"))
//!     .member(
//!         MemberDescriptor::new("Name", DataType::String)
//!             .field(ContentFieldAnnotation::new().id("name").required(true))
//!             .validate(ValidationAnnotation::size(1, 80)),
//!     )
//!     .member(MemberDescriptor::new("Age", DataType::Integer))
//!     .member(MemberDescriptor::new("Cache", DataType::String).ignore());
//!
//! let compiled: Vec<_> = compile([&person]).collect();
//! let def = &compiled[0].definition;
//!
//! assert_eq!(def.id, "Person");
//! assert_eq!(def.fields.len(), 2);
//! assert_eq!(def.fields[0].id, "name");
//! assert_eq!(def.fields[0].kind, FieldKind::Text);
//! assert_eq!(def.fields[1].kind, FieldKind::Integer);
//! ```
//!
//! # Synchronizing
//!
//! [`sync`] pushes compiled types through any [`ManagementClient`]. With the
//! `remote` feature (enabled by default) [`HttpManagementClient`] talks to the
//! Contentful Management API.
//!
//! | Option | Effect |
//! |--------|--------|
//! | `force_update = false` | Ids already present remotely are skipped |
//! | `force_update = true` | Existing ids are updated with their remote version |
//! | `publish_automatically` | Each upserted type is activated right after |

mod appearance;
mod client;
mod compiler;
mod descriptor;
mod error;
mod field_kind;
#[cfg(feature = "remote")]
mod http;
mod loader;
mod scanner;
mod sync;
mod types;
mod validation;
mod wire;

pub use appearance::{
    translate_appearance, widget_ids, AppearanceAnnotation, DateFormat, Widget, WidgetControl,
    WidgetSettings,
};
pub use client::{mock, EditorInterface, ManagementClient};
pub use compiler::{compile, compile_type};
pub use descriptor::{
    ContentFieldAnnotation, ContentModel, ContentTypeAnnotation, DataType, MemberDescriptor,
    TypeDescriptor,
};
pub use error::{CodeFirstError, ManagementError, ScanError, SyncError};
pub use field_kind::{field_kind, item_kind, item_link_type, link_type};
pub use loader::{load_scope, load_scope_str, ScopeManifest};
pub use scanner::{content_types, load_types_from_file, ScopeRegistry};
pub use sync::{create_content_types_from_scope, sync};
pub use types::{
    CompiledContentType, ContentTypeDefinition, FieldDefinition, FieldKind, ItemsSchema, LinkType,
    SyncOptions,
};
pub use validation::{
    translate_validation, translate_validations, Constraint, FileSizeUnit, MimeTypeGroup,
    ValidationAnnotation, Validator,
};

#[cfg(feature = "remote")]
pub use http::{ClientConfig, HttpManagementClient, CONTENT_TYPE_JSON, VERSION_HEADER};
