//! Target namespace resolution.

use serde::Serialize;
use xamlgen_core::{GenerationError, ModelSchema};

/// Namespaces every renderer reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamespaceSet {
    /// Project root namespace.
    pub project: String,
    /// Namespace of the model class.
    pub model: String,
    /// Namespace for generated views.
    pub views: String,
    /// Namespace for generated view-models.
    pub view_models: String,
}

impl NamespaceSet {
    /// Resolve namespaces for a schema.
    ///
    /// The project root comes from the project context when one is given,
    /// otherwise from the first segment of the model's namespace. With
    /// neither there is nothing to anchor generation to.
    pub fn resolve(schema: &ModelSchema, project: Option<&str>) -> Result<Self, GenerationError> {
        let project = project
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .or_else(|| {
                schema
                    .namespace
                    .split('.')
                    .next()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
            })
            .ok_or(GenerationError::NoSelectionContext)?;

        let model = if schema.namespace.trim().is_empty() {
            format!("{}.Models", project)
        } else {
            schema.namespace.trim().to_string()
        };

        Ok(Self {
            views: format!("{}.Views", project),
            view_models: format!("{}.ViewModels", project),
            project,
            model,
        })
    }
}
