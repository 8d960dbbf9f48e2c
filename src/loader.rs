//! Scope manifest loading.
//!
//! A scope manifest is a JSON document listing type descriptors:
//!
//! ```json
//! {
//!   "types": [
//!     {
//!       "ident": "Person",
//!       "contentType": { "displayField": "name" },
//!       "members": [{ "name": "name", "dataType": "string" }]
//!     }
//!   ]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::descriptor::TypeDescriptor;
use crate::error::ScanError;

/// Deserialized scope manifest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScopeManifest {
    #[serde(default)]
    pub types: Vec<TypeDescriptor>,
}

/// Load a scope manifest from a file path.
///
/// # Errors
///
/// Returns `ScanError::ScopeNotFound` if the file doesn't exist,
/// or `ScanError::InvalidJson` if the file isn't a valid manifest.
pub fn load_scope(path: &Path) -> Result<ScopeManifest, ScanError> {
    if !path.exists() {
        return Err(ScanError::ScopeNotFound {
            scope: path.display().to_string(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| ScanError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    load_scope_str(&content)
}

/// Load a scope manifest from a JSON string.
///
/// # Errors
///
/// Returns `ScanError::InvalidJson` if the string isn't a valid manifest.
pub fn load_scope_str(content: &str) -> Result<ScopeManifest, ScanError> {
    serde_json::from_str(content).map_err(|source| ScanError::InvalidJson { source })
}
