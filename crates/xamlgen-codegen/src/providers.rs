//! Collaborator boundaries.
//!
//! The pipeline never touches the host project directly. Schema discovery,
//! data-context discovery, data-file lookup, artifact writing and user
//! notification are all reached through these traits, injected by the
//! caller.

use std::io;
use std::path::Path;
use xamlgen_core::ModelSchema;

/// Discovers model classes in the host project.
pub trait SchemaProvider {
    /// Schema for the named class, if one exists.
    fn find_class_by_name(&self, name: &str) -> Option<ModelSchema>;

    /// Every discoverable class name, in a stable order.
    fn list_all_class_names(&self) -> Vec<String>;
}

/// A data context found for a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextLookup {
    /// Context type name.
    pub type_name: String,
    /// Namespace the context type lives in.
    pub namespace: String,
    /// Collection property holding the schema's items, when one matched.
    pub collection: Option<String>,
}

/// Discovers data-context types in the host project.
pub trait ContextProvider {
    fn find_context_type(&self, schema: &ModelSchema) -> Option<ContextLookup>;
}

/// Locates an existing data file for a model.
pub trait DataFileLocator {
    /// Project-relative path of the first matching candidate.
    fn find_data_file(&self, model_name: &str) -> Option<String>;
}

impl<F> DataFileLocator for F
where
    F: Fn(&str) -> Option<String>,
{
    fn find_data_file(&self, model_name: &str) -> Option<String> {
        self(model_name)
    }
}

/// A provider with nothing to offer.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProvider;

impl ContextProvider for NoProvider {
    fn find_context_type(&self, _schema: &ModelSchema) -> Option<ContextLookup> {
        None
    }
}

impl DataFileLocator for NoProvider {
    fn find_data_file(&self, _model_name: &str) -> Option<String> {
        None
    }
}

/// Candidate data-file paths for a model, in lookup order.
pub fn data_file_candidates(model_name: &str) -> [String; 4] {
    [
        format!("{}.json", model_name),
        format!("{}s.json", model_name),
        format!("Data/{}.json", model_name),
        format!("App_Data/{}.json", model_name),
    ]
}

/// Receives finished artifact text.
pub trait ArtifactSink {
    fn write_artifact(&mut self, path: &Path, text: &str) -> io::Result<()>;

    /// Add a written file to the host project.
    fn register_in_project(&mut self, path: &Path) -> Result<(), String>;
}

/// Fire-and-forget user notifications.
pub trait Notifier {
    fn report_success(&self, message: &str);
    fn report_error(&self, message: &str);
}
