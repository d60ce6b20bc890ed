//! Error types for code generation.

use thiserror::Error;
use xamlgen_core::GenerationError;

/// Result type alias for codegen operations.
pub type Result<T> = std::result::Result<T, CodegenError>;

/// Errors that can occur during code generation.
#[derive(Error, Debug)]
pub enum CodegenError {
    /// A fatal generation error from the pipeline.
    #[error(transparent)]
    Generation(#[from] GenerationError),

    /// Template rendering error.
    #[error("Template error: {0}")]
    TemplateError(#[from] handlebars::RenderError),

    /// Invalid template.
    #[error("Invalid template: {0}")]
    InvalidTemplate(#[from] handlebars::TemplateError),
}

impl From<CodegenError> for GenerationError {
    fn from(err: CodegenError) -> Self {
        match err {
            CodegenError::Generation(inner) => inner,
            other => GenerationError::Template(other.to_string()),
        }
    }
}
