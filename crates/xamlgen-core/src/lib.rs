//! Core types for the xamlgen code generator.
//!
//! This crate provides the foundational types used by the generation pipeline:
//! - Model schema types (classes, properties, methods)
//! - Type descriptor resolution
//! - Generation configuration
//! - Error and diagnostic types

pub mod config;
pub mod errors;
pub mod schema;
pub mod types;

pub use config::*;
pub use errors::*;
pub use schema::*;
pub use types::*;
