//! Management client abstraction.
//!
//! The synchronizer only talks to the remote service through
//! [`ManagementClient`], so any transport (the bundled HTTP client, a test
//! double) can back it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::appearance::WidgetControl;
use crate::error::ManagementError;
use crate::types::ContentTypeDefinition;

/// Editor configuration of one content type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    into = "crate::wire::WireEditorInterface",
    from = "crate::wire::WireEditorInterface"
)]
pub struct EditorInterface {
    pub controls: Vec<WidgetControl>,
    /// Version token of the configuration itself.
    pub version: u64,
}

impl EditorInterface {
    /// Replace every control whose field id matches one of `controls`.
    ///
    /// Controls for fields with no existing entry are not added; they are
    /// returned so the caller can report them. Entries not mentioned are
    /// left untouched.
    pub fn merge(&mut self, controls: &[WidgetControl]) -> Vec<WidgetControl> {
        let mut unmatched = Vec::new();
        for control in controls {
            match self
                .controls
                .iter()
                .position(|c| c.field_id == control.field_id)
            {
                Some(index) => self.controls[index] = control.clone(),
                None => unmatched.push(control.clone()),
            }
        }
        unmatched
    }
}

/// Operations the synchronizer needs from the remote service.
///
/// Every call may fail with [`ManagementError`]; implementations must not
/// retry on their own.
#[async_trait]
pub trait ManagementClient: Send + Sync {
    /// List existing content types with their current versions.
    ///
    /// `query` is an optional implementation-specific filter.
    async fn list(&self, query: Option<&str>)
        -> Result<Vec<ContentTypeDefinition>, ManagementError>;

    /// Create or update a content type.
    ///
    /// `version` must be the current remote version for existing ids and
    /// `None` for new ones; otherwise the service answers with
    /// [`ManagementError::Conflict`].
    async fn upsert(
        &self,
        definition: &ContentTypeDefinition,
        version: Option<u64>,
    ) -> Result<ContentTypeDefinition, ManagementError>;

    /// Publish a specific version of a content type.
    async fn activate(
        &self,
        id: &str,
        version: u64,
    ) -> Result<ContentTypeDefinition, ManagementError>;

    /// Fetch the editor configuration of a content type.
    async fn widget_config(&self, id: &str) -> Result<EditorInterface, ManagementError>;

    /// Replace the editor configuration of a content type.
    async fn update_widget_config(
        &self,
        config: &EditorInterface,
        id: &str,
        version: u64,
    ) -> Result<EditorInterface, ManagementError>;
}

/// An in-memory client for testing.
pub mod mock {
    use super::*;
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;

    /// A call received by [`MockClient`].
    #[derive(Debug, Clone, PartialEq)]
    pub enum Call {
        List,
        Upsert { id: String, version: Option<u64> },
        Activate { id: String, version: u64 },
        WidgetConfig { id: String },
        UpdateWidgetConfig {
            id: String,
            version: u64,
            config: EditorInterface,
        },
    }

    #[derive(Debug, Default)]
    struct State {
        calls: Vec<Call>,
        failures: VecDeque<(String, ManagementError)>,
    }

    /// Records every call and answers from preset remote state.
    ///
    /// Upserts echo the definition back with the next version, or with no
    /// version at all when `omit_versions` is set.
    #[derive(Debug, Default)]
    pub struct MockClient {
        existing: Vec<ContentTypeDefinition>,
        editor_interfaces: HashMap<String, EditorInterface>,
        omit_versions: bool,
        state: Mutex<State>,
    }

    impl MockClient {
        pub fn new() -> Self {
            Self::default()
        }

        /// Preset a remote content type.
        pub fn with_existing(mut self, id: &str, version: u64) -> Self {
            let mut def = ContentTypeDefinition::new(id, id);
            def.version = Some(version);
            self.existing.push(def);
            self
        }

        /// Preset the editor configuration of a content type.
        pub fn with_editor_interface(mut self, id: &str, config: EditorInterface) -> Self {
            self.editor_interfaces.insert(id.to_string(), config);
            self
        }

        /// Answer upserts without a version.
        pub fn omit_versions(mut self) -> Self {
            self.omit_versions = true;
            self
        }

        /// Fail the next call whose name matches (`"list"`, `"upsert"`,
        /// `"activate"`, `"widget_config"`, `"update_widget_config"`).
        pub fn fail_on(self, operation: &str, error: ManagementError) -> Self {
            self.lock()
                .failures
                .push_back((operation.to_string(), error));
            self
        }

        /// Calls received so far, in order.
        pub fn calls(&self) -> Vec<Call> {
            self.lock().calls.clone()
        }

        fn lock(&self) -> std::sync::MutexGuard<'_, State> {
            // A panicking test thread may poison the lock; the data is still usable.
            self.state.lock().unwrap_or_else(|e| e.into_inner())
        }

        fn record(&self, operation: &str, call: Call) -> Result<(), ManagementError> {
            let mut state = self.lock();
            state.calls.push(call);
            if let Some(index) = state.failures.iter().position(|(op, _)| op == operation) {
                if let Some((_, error)) = state.failures.remove(index) {
                    return Err(error);
                }
            }
            Ok(())
        }
    }

    #[async_trait]
    impl ManagementClient for MockClient {
        async fn list(
            &self,
            _query: Option<&str>,
        ) -> Result<Vec<ContentTypeDefinition>, ManagementError> {
            self.record("list", Call::List)?;
            Ok(self.existing.clone())
        }

        async fn upsert(
            &self,
            definition: &ContentTypeDefinition,
            version: Option<u64>,
        ) -> Result<ContentTypeDefinition, ManagementError> {
            self.record(
                "upsert",
                Call::Upsert {
                    id: definition.id.clone(),
                    version,
                },
            )?;
            let mut created = definition.clone();
            created.version = if self.omit_versions {
                None
            } else {
                Some(version.unwrap_or(0) + 1)
            };
            Ok(created)
        }

        async fn activate(
            &self,
            id: &str,
            version: u64,
        ) -> Result<ContentTypeDefinition, ManagementError> {
            self.record(
                "activate",
                Call::Activate {
                    id: id.to_string(),
                    version,
                },
            )?;
            let mut def = ContentTypeDefinition::new(id, id);
            def.version = Some(version + 1);
            Ok(def)
        }

        async fn widget_config(&self, id: &str) -> Result<EditorInterface, ManagementError> {
            self.record("widget_config", Call::WidgetConfig { id: id.to_string() })?;
            Ok(self
                .editor_interfaces
                .get(id)
                .cloned()
                .unwrap_or(EditorInterface {
                    controls: Vec::new(),
                    version: 1,
                }))
        }

        async fn update_widget_config(
            &self,
            config: &EditorInterface,
            id: &str,
            version: u64,
        ) -> Result<EditorInterface, ManagementError> {
            self.record(
                "update_widget_config",
                Call::UpdateWidgetConfig {
                    id: id.to_string(),
                    version,
                    config: config.clone(),
                },
            )?;
            let mut updated = config.clone();
            updated.version = version + 1;
            Ok(updated)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appearance::WidgetSettings;

    fn control(field_id: &str, widget_id: &str) -> WidgetControl {
        WidgetControl::new(field_id, widget_id, WidgetSettings::Plain { help_text: None })
    }

    #[test]
    fn merge_replaces_matching_controls_only() {
        let mut config = EditorInterface {
            controls: vec![
                control("title", "singleLine"),
                control("score", "numberEditor"),
                control("body", "markdown"),
            ],
            version: 3,
        };

        let unmatched = config.merge(&[control("score", "rating"), control("missing", "rating")]);

        assert_eq!(config.controls[0], control("title", "singleLine"));
        assert_eq!(config.controls[1], control("score", "rating"));
        assert_eq!(config.controls[2], control("body", "markdown"));
        assert_eq!(config.controls.len(), 3);
        assert_eq!(unmatched, vec![control("missing", "rating")]);
        assert_eq!(config.version, 3);
    }
}
