//! JSON schema catalog.
//!
//! A [`Catalog`] is a serialized snapshot of the host project's model
//! classes and data contexts. It implements both discovery traits, so a
//! generation run can be driven entirely from a file.

use crate::providers::{ContextLookup, ContextProvider, SchemaProvider};
use serde::{Deserialize, Serialize};
use xamlgen_core::{resolve_type, ModelSchema};

/// Classes and data contexts of a project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// Project root namespace.
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub classes: Vec<ModelSchema>,
    #[serde(default)]
    pub contexts: Vec<ContextDefinition>,
}

/// A data-context type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextDefinition {
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub base_types: Vec<String>,
    #[serde(default)]
    pub collections: Vec<CollectionDefinition>,
}

/// A collection property on a data context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub raw_type: String,
}

impl Catalog {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl ContextDefinition {
    /// Whether the type derives from a `DbContext`-like base.
    pub fn is_data_context(&self) -> bool {
        self.base_types
            .iter()
            .any(|base| resolve_type(base).canonical.ends_with("DbContext"))
    }

    /// Collection property holding items of the named model.
    pub fn collection_for(&self, model: &str) -> Option<&CollectionDefinition> {
        let set = format!("DbSet<{}>", model);
        let interface = format!("IDbSet<{}>", model);
        self.collections.iter().find(|c| {
            let canonical = resolve_type(&c.raw_type).canonical;
            canonical == set || canonical == interface
        })
    }
}

impl SchemaProvider for Catalog {
    fn find_class_by_name(&self, name: &str) -> Option<ModelSchema> {
        self.classes
            .iter()
            .find(|c| c.name == name || format!("{}.{}", c.namespace, c.name) == name)
            .cloned()
    }

    fn list_all_class_names(&self) -> Vec<String> {
        self.classes.iter().map(|c| c.name.clone()).collect()
    }
}

impl ContextProvider for Catalog {
    /// Prefers a context with a matching collection; otherwise the first
    /// data context, without a collection.
    fn find_context_type(&self, schema: &ModelSchema) -> Option<ContextLookup> {
        let contexts: Vec<&ContextDefinition> = self.contexts.iter().filter(|c| c.is_data_context()).collect();

        if let Some((context, collection)) = contexts
            .iter()
            .find_map(|c| c.collection_for(&schema.name).map(|coll| (c, coll)))
        {
            return Some(ContextLookup {
                type_name: context.name.clone(),
                namespace: context.namespace.clone(),
                collection: Some(collection.name.clone()),
            });
        }

        contexts.first().map(|c| ContextLookup {
            type_name: c.name.clone(),
            namespace: c.namespace.clone(),
            collection: None,
        })
    }
}
