//! CLI error type.

use std::path::PathBuf;
use thiserror::Error;
use xamlgen_codegen::CodegenError;
use xamlgen_core::GenerationError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Codegen(#[from] CodegenError),
}

pub type Result<T> = std::result::Result<T, CliError>;
