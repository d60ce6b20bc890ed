//! Generation runs.
//!
//! The [`Orchestrator`] is the single entry point: it looks the schema up,
//! resolves namespaces and persistence, runs every assembler, and returns
//! the finished [`ArtifactSet`]. Collaborators are injected at construction;
//! nothing here reads the file system.

use crate::error::Result;
use crate::generators::{
    ArtifactKind, ArtifactSet, DialogViewAssembler, DialogViewModelAssembler, DocumentAssembler,
    GeneratedArtifact, GenerationContext, TemplateEngine, ViewAssembler, ViewModelAssembler,
};
use crate::namespaces::NamespaceSet;
use crate::persistence::{PersistenceInputs, PersistencePlan};
use crate::platform::Platform;
use crate::providers::{ContextProvider, DataFileLocator, SchemaProvider};
use crate::verify::{dangling_bindings, duplicate_members};
use tracing::{debug, info, warn};
use xamlgen_core::{CommandMode, Diagnostic, GenerationConfig, GenerationError, ModelSchema, PersistenceKind};

/// Inputs for one run besides the schema.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationRequest {
    pub config: GenerationConfig,
    pub platform: Platform,
    /// Project root namespace, when the host knows it.
    pub project: Option<String>,
}

/// Runs the generation pipeline.
pub struct Orchestrator<'a> {
    schemas: &'a dyn SchemaProvider,
    contexts: &'a dyn ContextProvider,
    data_files: &'a dyn DataFileLocator,
    templates: TemplateEngine<'static>,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        schemas: &'a dyn SchemaProvider,
        contexts: &'a dyn ContextProvider,
        data_files: &'a dyn DataFileLocator,
    ) -> Result<Self> {
        Ok(Self {
            schemas,
            contexts,
            data_files,
            templates: TemplateEngine::new()?,
        })
    }

    /// Generate artifacts for a named class.
    pub fn generate(
        &self,
        class_name: &str,
        request: &GenerationRequest,
    ) -> std::result::Result<ArtifactSet, GenerationError> {
        let schema = self
            .schemas
            .find_class_by_name(class_name)
            .ok_or_else(|| GenerationError::SchemaNotFound {
                name: class_name.to_string(),
            })?;
        self.generate_for_schema(&schema, request)
    }

    /// Generate artifacts for a schema already in hand.
    pub fn generate_for_schema(
        &self,
        schema: &ModelSchema,
        request: &GenerationRequest,
    ) -> std::result::Result<ArtifactSet, GenerationError> {
        schema.validate()?;
        let config = &request.config;
        let profile = request.platform.profile();
        let namespaces = NamespaceSet::resolve(schema, request.project.as_deref())?;

        let inputs = match config.persistence {
            PersistenceKind::None => PersistenceInputs::default(),
            PersistenceKind::File => PersistenceInputs {
                data_file: self.data_files.find_data_file(&schema.name),
                context: None,
            },
            PersistenceKind::Context => PersistenceInputs {
                data_file: None,
                context: self.contexts.find_context_type(schema),
            },
        };
        let persistence = PersistencePlan::resolve(
            config.persistence,
            schema,
            &namespaces,
            config.context_fallback,
            inputs,
        );
        let mut diagnostics = persistence.diagnostics().to_vec();

        let ctx = GenerationContext {
            schema,
            config,
            profile,
            namespaces: &namespaces,
            persistence: &persistence,
            templates: &self.templates,
        };

        let mut assemblers: Vec<&dyn DocumentAssembler> = vec![&ViewAssembler];
        if config.generate_view_model {
            assemblers.push(&ViewModelAssembler);
        }
        if config.use_dialog {
            if !config.generate_view_model {
                diagnostics.push(Diagnostic::DialogRequiresViewModel);
            } else if config.command_mode != CommandMode::Crud {
                diagnostics.push(Diagnostic::DialogRequiresCrudMode);
            } else {
                assemblers.push(&DialogViewAssembler);
                assemblers.push(&DialogViewModelAssembler);
            }
        }

        let mut artifacts = Vec::with_capacity(assemblers.len());
        for assembler in assemblers {
            debug!(model = %schema.name, kind = %assembler.kind(), "assembling");
            artifacts.push(assembler.assemble(&ctx)?);
        }

        diagnostics.extend(check_bindings(schema, &artifacts));
        diagnostics.extend(check_members(&artifacts));
        for diagnostic in &diagnostics {
            warn!(model = %schema.name, "{}", diagnostic);
        }
        info!(
            model = %schema.name,
            platform = ?request.platform,
            artifacts = artifacts.len(),
            diagnostics = diagnostics.len(),
            "generation complete"
        );

        Ok(ArtifactSet {
            artifacts,
            diagnostics,
        })
    }
}

/// Dangling-binding diagnostics for every view/view-model pair.
fn check_bindings(schema: &ModelSchema, artifacts: &[GeneratedArtifact]) -> Vec<Diagnostic> {
    let item_members: Vec<&str> = schema.properties.iter().map(|p| p.name()).collect();
    let find = |kind| artifacts.iter().find(|a: &&GeneratedArtifact| a.kind == kind);

    let pairs = [
        (ArtifactKind::View, ArtifactKind::ViewModel),
        (ArtifactKind::DialogView, ArtifactKind::DialogViewModel),
    ];
    let mut diagnostics = Vec::new();
    for (view_kind, model_kind) in pairs {
        let (Some(view), Some(view_model)) = (find(view_kind), find(model_kind)) else {
            continue;
        };
        for path in dangling_bindings(&view.text, &view_model.text, &item_members) {
            diagnostics.push(Diagnostic::DanglingBinding {
                document: view.path.display().to_string(),
                path,
                target: view_model.path.display().to_string(),
            });
        }
    }
    diagnostics
}

/// Duplicate-declaration diagnostics for every generated source document.
fn check_members(artifacts: &[GeneratedArtifact]) -> Vec<Diagnostic> {
    artifacts
        .iter()
        .filter(|a| matches!(a.kind, ArtifactKind::ViewModel | ArtifactKind::DialogViewModel))
        .flat_map(|a| {
            duplicate_members(&a.text).into_iter().map(|member| Diagnostic::DuplicateMember {
                document: a.path.display().to_string(),
                member,
            })
        })
        .collect()
}
