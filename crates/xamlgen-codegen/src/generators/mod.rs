//! Document assemblers.
//!
//! Each assembler composes renderer fragments into the documents of one
//! artifact kind. All of them read from a shared [`GenerationContext`] and
//! none of them performs I/O; the finished [`ArtifactSet`] is written by the
//! caller through an [`ArtifactSink`].

mod dialog;
mod templates;
mod view;
mod view_model;

pub use dialog::{DialogViewAssembler, DialogViewModelAssembler};
pub use templates::{using_block, DocumentTemplate, TemplateEngine};
pub use view::ViewAssembler;
pub use view_model::ViewModelAssembler;

use crate::commands::{CommandRenderer, CrudPolicies};
use crate::controls::ControlMapper;
use crate::error::Result;
use crate::fragment::Fragment;
use crate::markup::Element;
use crate::namespaces::NamespaceSet;
use crate::persistence::PersistencePlan;
use crate::platform::PlatformProfile;
use crate::properties::PropertyRenderer;
use crate::providers::ArtifactSink;
use serde_json::json;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;
use xamlgen_core::{Diagnostic, GenerationConfig, GenerationError, ModelSchema};

/// Common trait for document assemblers.
pub trait DocumentAssembler {
    /// Artifact kind produced.
    fn kind(&self) -> ArtifactKind;

    /// Assemble the artifact for a generation context.
    fn assemble(&self, ctx: &GenerationContext<'_>) -> Result<GeneratedArtifact>;
}

/// Everything an assembler reads.
#[derive(Clone, Copy)]
pub struct GenerationContext<'a> {
    pub schema: &'a ModelSchema,
    pub config: &'a GenerationConfig,
    pub profile: &'static PlatformProfile,
    pub namespaces: &'a NamespaceSet,
    pub persistence: &'a PersistencePlan,
    pub templates: &'a TemplateEngine<'static>,
}

impl<'a> GenerationContext<'a> {
    pub fn model(&self) -> &'a str {
        &self.schema.name
    }

    pub fn controls(&self) -> ControlMapper<'static> {
        ControlMapper::new(self.profile, self.config.enable_validation)
    }

    pub fn properties(&self) -> PropertyRenderer<'static> {
        PropertyRenderer::new(self.profile)
    }

    pub fn commands(&self) -> CommandRenderer<'static> {
        CommandRenderer::new(self.profile)
    }

    pub fn policies(&self) -> CrudPolicies {
        CrudPolicies::from_config(self.config)
    }

    /// Root element of a markup document with its namespace declarations.
    pub fn markup_root(&self, element: &str, class_name: &str) -> Element {
        let mut root = Element::new(element).attr("x:Class", format!("{}.{}", self.namespaces.views, class_name));
        for (prefix, uri) in self.profile.xml_namespaces {
            let name = if prefix.is_empty() {
                "xmlns".to_string()
            } else {
                format!("xmlns:{}", prefix)
            };
            root = root.attr(name, *uri);
        }
        root = root.attr("xmlns:local", self.profile.local_namespace(&self.namespaces.view_models));
        if self.profile.declares_design_namespaces() {
            root = root.attr("mc:Ignorable", "d");
        }
        root
    }

    /// Render a C# source document around class members.
    pub fn source_document<'u>(
        &self,
        namespace: &str,
        usings: impl IntoIterator<Item = &'u str>,
        members: &Fragment,
    ) -> Result<String> {
        let data = json!({
            "usings": using_block(usings),
            "namespace": namespace,
            "members": members.text(),
        });
        self.templates.render(DocumentTemplate::Source, &data)
    }

    /// Render the code-behind for a markup document.
    pub fn code_behind(
        &self,
        class_name: &str,
        base_class: &str,
        extra_usings: &[&str],
        body: &Fragment,
    ) -> Result<String> {
        let usings = self.profile.code_behind_usings.iter().chain(extra_usings).copied();
        let data = json!({
            "usings": using_block(usings),
            "namespace": self.namespaces.views,
            "class_name": class_name,
            "base_class": base_class,
            "body": body.text(),
        });
        self.templates.render(DocumentTemplate::CodeBehind, &data)
    }

    /// Project-relative path for a generated file.
    pub fn path(&self, folder: &str, stem: &str, extension: &str) -> PathBuf {
        Path::new(folder).join(format!("{}.{}", stem, extension))
    }
}

impl fmt::Debug for GenerationContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationContext")
            .field("schema", &self.schema.name)
            .field("platform", &self.profile.platform)
            .field("namespaces", self.namespaces)
            .finish()
    }
}

/// Kind of generated artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    View,
    ViewModel,
    DialogView,
    DialogViewModel,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::View => write!(f, "view"),
            Self::ViewModel => write!(f, "view-model"),
            Self::DialogView => write!(f, "dialog view"),
            Self::DialogViewModel => write!(f, "dialog view-model"),
        }
    }
}

/// Code-behind accompanying a markup document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBehind {
    pub path: PathBuf,
    pub text: String,
}

/// A generated document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifact {
    pub kind: ArtifactKind,
    /// Path relative to the project root.
    pub path: PathBuf,
    pub text: String,
    pub code_behind: Option<CodeBehind>,
}

impl GeneratedArtifact {
    /// Every file this artifact writes, main document first.
    pub fn files(&self) -> impl Iterator<Item = (&Path, &str)> {
        std::iter::once((self.path.as_path(), self.text.as_str())).chain(
            self.code_behind
                .iter()
                .map(|cb| (cb.path.as_path(), cb.text.as_str())),
        )
    }
}

/// Result of one generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactSet {
    pub artifacts: Vec<GeneratedArtifact>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ArtifactSet {
    pub fn get(&self, kind: ArtifactKind) -> Option<&GeneratedArtifact> {
        self.artifacts.iter().find(|a| a.kind == kind)
    }

    pub fn kinds(&self) -> Vec<ArtifactKind> {
        self.artifacts.iter().map(|a| a.kind).collect()
    }

    /// Write every file, then register each with the project.
    ///
    /// Stops at the first failing write. Returns the written paths.
    pub fn write_to(&self, sink: &mut dyn ArtifactSink) -> std::result::Result<Vec<PathBuf>, GenerationError> {
        let mut written = Vec::new();
        for artifact in &self.artifacts {
            for (path, text) in artifact.files() {
                sink.write_artifact(path, text)
                    .map_err(|source| GenerationError::WriteFailure {
                        path: path.to_path_buf(),
                        source,
                    })?;
                debug!(path = %path.display(), "wrote artifact");
                written.push(path.to_path_buf());
            }
        }

        for path in &written {
            sink.register_in_project(path)
                .map_err(|reason| GenerationError::RegistrationFailure {
                    path: path.clone(),
                    reason,
                })?;
        }
        Ok(written)
    }
}
