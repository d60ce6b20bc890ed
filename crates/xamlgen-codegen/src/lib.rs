//! XAML view and view-model generation.
//!
//! Given a [`ModelSchema`](xamlgen_core::ModelSchema) and a
//! [`GenerationConfig`](xamlgen_core::GenerationConfig), produces:
//! - A markup view with code-behind
//! - A C# view-model with commands, properties and persistence
//! - Optionally, a modal dialog view and dialog view-model
//!
//! Supported platforms:
//! - WPF
//! - UWP
//! - .NET MAUI

pub mod catalog;
pub mod commands;
pub mod controls;
pub mod dialog_flow;
pub mod error;
pub mod fragment;
pub mod generators;
pub mod markup;
pub mod members;
pub mod namespaces;
pub mod orchestrator;
pub mod persistence;
pub mod platform;
pub mod policy;
pub mod properties;
pub mod providers;
pub mod verify;

pub use catalog::Catalog;
pub use error::{CodegenError, Result};
pub use generators::{ArtifactKind, ArtifactSet, GeneratedArtifact};
pub use orchestrator::{GenerationRequest, Orchestrator};
pub use platform::{detect_platform, Platform, PlatformProfile, ProjectMetadata};
pub use policy::FeaturePolicy;
pub use providers::{ArtifactSink, ContextProvider, DataFileLocator, NoProvider, Notifier, SchemaProvider};
