//! Error types for xamlgen.
//!
//! [`GenerationError`] aborts a run. [`Diagnostic`] records a resolution
//! that fell back to a safe default; the run continues and the diagnostic
//! travels with the generated artifacts.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors for a generation run.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("No model class named '{name}' was found")]
    SchemaNotFound { name: String },

    #[error("No project context is available to resolve namespaces")]
    NoSelectionContext,

    #[error("Failed to write {}: {source}", .path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to register {} in the project: {reason}", .path.display())]
    RegistrationFailure { path: PathBuf, reason: String },

    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    #[error("Template error: {0}")]
    Template(String),
}

/// Non-fatal conditions resolved to a default during generation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diagnostic {
    #[error("No persistence source could be resolved for {model}; using no persistence")]
    PersistenceSourceAmbiguous { model: String },

    #[error("No data file found for {model}; defaulting to {default_path}")]
    DataFileNotFound { model: String, default_path: String },

    #[error("Context {context} has no collection of {model}; using placeholder {placeholder}")]
    ContextCollectionNotFound {
        model: String,
        context: String,
        placeholder: String,
    },

    #[error("No data context found for {model}; using placeholder {placeholder}")]
    ContextTypeNotFound { model: String, placeholder: String },

    #[error("Platform could not be detected; using {fallback}")]
    PlatformNotDetected { fallback: String },

    #[error("{document} binds '{path}', which is not declared on {target}")]
    DanglingBinding {
        document: String,
        path: String,
        target: String,
    },

    #[error("{document} declares '{member}' more than once")]
    DuplicateMember { document: String, member: String },

    #[error("Dialog artifacts require a view-model; skipped")]
    DialogRequiresViewModel,

    #[error("Dialog artifacts require CRUD command mode; skipped")]
    DialogRequiresCrudMode,
}
