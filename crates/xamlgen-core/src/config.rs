//! Generation configuration.

use serde::{Deserialize, Serialize};

/// Flags controlling one generation run.
///
/// Every field has a default, so a partial JSON document is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Emit a view-model document.
    pub generate_view_model: bool,
    /// Bind view controls to view-model members.
    pub use_data_binding: bool,
    /// Load/save backend.
    pub persistence: PersistenceKind,
    /// Emit a working Add operation.
    pub enable_add: bool,
    /// Emit a working Edit operation.
    pub enable_edit: bool,
    /// Emit a working Delete operation.
    pub enable_delete: bool,
    /// Route Add/Edit through a modal dialog and confirm Delete.
    pub use_dialog: bool,
    /// Emit data-error validation hooks.
    pub enable_validation: bool,
    /// Which command set the view-model carries.
    pub command_mode: CommandMode,
    /// What to do when a context collection cannot be matched.
    pub context_fallback: ContextFallback,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            generate_view_model: true,
            use_data_binding: true,
            persistence: PersistenceKind::None,
            enable_add: true,
            enable_edit: true,
            enable_delete: true,
            use_dialog: false,
            enable_validation: false,
            command_mode: CommandMode::Crud,
            context_fallback: ContextFallback::Placeholder,
        }
    }
}

impl GenerationConfig {
    /// Whether dialog artifacts will be produced for this config.
    pub fn wants_dialog_artifacts(&self) -> bool {
        self.generate_view_model && self.use_dialog && self.command_mode == CommandMode::Crud
    }

    /// Whether the view binds to a view-model at all.
    pub fn binds_view_model(&self) -> bool {
        self.generate_view_model && self.use_data_binding
    }
}

/// Persistence backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersistenceKind {
    #[default]
    None,
    /// A JSON file holding the serialized collection.
    File,
    /// A data context exposing named collections.
    Context,
}

/// Command generation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandMode {
    /// Fixed Add/Edit/Delete/Save commands over a collection.
    #[default]
    Crud,
    /// One command per public model method.
    Legacy,
}

/// Policy for an unmatched data-context collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextFallback {
    /// Reference a conventionally named placeholder context.
    #[default]
    Placeholder,
    /// Fall back to no persistence.
    Disable,
}
