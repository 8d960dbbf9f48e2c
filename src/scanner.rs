//! Discovery of annotated types within a scope.

use std::collections::HashMap;
use std::path::Path;

use crate::descriptor::{ContentModel, TypeDescriptor};
use crate::error::ScanError;
use crate::loader::load_scope;

/// Named scopes of model types, filled in code.
///
/// A scope plays the role of a loadable module: a named unit whose exported
/// content types get compiled together.
#[derive(Debug, Clone, Default)]
pub struct ScopeRegistry {
    scopes: HashMap<String, Vec<TypeDescriptor>>,
}

impl ScopeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a model type in a scope, creating the scope if needed.
    pub fn register<T: ContentModel>(&mut self, scope: &str) -> &mut Self {
        self.register_descriptor(scope, T::describe())
    }

    /// Register a descriptor in a scope, creating the scope if needed.
    pub fn register_descriptor(&mut self, scope: &str, descriptor: TypeDescriptor) -> &mut Self {
        self.scopes
            .entry(scope.to_string())
            .or_default()
            .push(descriptor);
        self
    }

    /// Declare a scope with the given types, replacing any previous content.
    pub fn insert_scope(&mut self, scope: &str, types: Vec<TypeDescriptor>) -> &mut Self {
        self.scopes.insert(scope.to_string(), types);
        self
    }

    /// Returns true if the scope is known.
    pub fn contains(&self, scope: &str) -> bool {
        self.scopes.contains_key(scope)
    }

    /// Load the annotated types of a scope, in registration order.
    ///
    /// # Errors
    ///
    /// Returns `ScanError::ScopeNotFound` if the scope was never registered.
    pub fn load_types(&self, scope: &str) -> Result<Vec<TypeDescriptor>, ScanError> {
        let types = self
            .scopes
            .get(scope)
            .ok_or_else(|| ScanError::ScopeNotFound {
                scope: scope.to_string(),
            })?;
        Ok(content_types(types.iter().cloned()))
    }
}

/// Keep only exported types that carry a content type annotation.
pub fn content_types<I>(types: I) -> Vec<TypeDescriptor>
where
    I: IntoIterator<Item = TypeDescriptor>,
{
    types
        .into_iter()
        .filter(|t| t.exported && t.content_type.is_some())
        .collect()
}

/// Load the annotated types of a scope manifest file.
///
/// # Errors
///
/// Returns `ScanError::ScopeNotFound` if the file doesn't exist, or a read /
/// parse error if it can't be loaded.
pub fn load_types_from_file(path: &Path) -> Result<Vec<TypeDescriptor>, ScanError> {
    let manifest = load_scope(path)?;
    Ok(content_types(manifest.types))
}
