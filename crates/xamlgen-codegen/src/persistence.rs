//! Persistence strategy resolution.
//!
//! Resolves the configured [`PersistenceKind`] against what the host project
//! actually contains and renders the load/save method bodies, field
//! declarations and `using` directives the view-model needs. Resolution
//! never fails: a missing data file or context collection falls back to a
//! default and leaves a [`Diagnostic`] behind.

use crate::fragment::{Fragment, FragmentKind};
use crate::namespaces::NamespaceSet;
use crate::policy::FeaturePolicy;
use crate::providers::ContextLookup;
use tracing::debug;
use xamlgen_core::{ContextFallback, Diagnostic, ModelSchema, PersistenceKind};

/// Placeholder context type used when no context could be discovered.
pub const PLACEHOLDER_CONTEXT: &str = "AppDbContext";

/// Where items are loaded from and saved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceSource {
    None,
    File {
        path: String,
    },
    Context {
        type_name: String,
        namespace: String,
        collection: String,
        /// The type or collection name is a convention, not a discovered member.
        placeholder: bool,
    },
}

/// Facts discovered in the host project.
#[derive(Debug, Clone, Default)]
pub struct PersistenceInputs {
    pub data_file: Option<String>,
    pub context: Option<ContextLookup>,
}

/// Resolved persistence for one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistencePlan {
    source: PersistenceSource,
    load: FeaturePolicy,
    save: FeaturePolicy,
    diagnostics: Vec<Diagnostic>,
}

impl PersistencePlan {
    pub fn resolve(
        kind: PersistenceKind,
        schema: &ModelSchema,
        namespaces: &NamespaceSet,
        fallback: ContextFallback,
        inputs: PersistenceInputs,
    ) -> Self {
        let mut diagnostics = Vec::new();
        let source = match kind {
            PersistenceKind::None => PersistenceSource::None,
            PersistenceKind::File => match inputs.data_file {
                Some(path) => PersistenceSource::File { path },
                None => {
                    let path = format!("{}.json", schema.name);
                    diagnostics.push(Diagnostic::DataFileNotFound {
                        model: schema.name.clone(),
                        default_path: path.clone(),
                    });
                    PersistenceSource::File { path }
                }
            },
            PersistenceKind::Context => {
                resolve_context(schema, namespaces, fallback, inputs.context, &mut diagnostics)
            }
        };

        debug!(model = %schema.name, ?source, "resolved persistence");

        let persistent = source != PersistenceSource::None;
        Self {
            load: FeaturePolicy::from_flag(persistent, "Loading items is not supported: no persistence is configured."),
            save: FeaturePolicy::from_flag(persistent, "Saving items is not supported: no persistence is configured."),
            source,
            diagnostics,
        }
    }

    pub fn source(&self) -> &PersistenceSource {
        &self.source
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn is_persistent(&self) -> bool {
        self.source != PersistenceSource::None
    }

    pub fn usings(&self) -> Vec<String> {
        match &self.source {
            PersistenceSource::None => Vec::new(),
            PersistenceSource::File { .. } => vec![
                "System.Diagnostics".to_string(),
                "System.IO".to_string(),
                "System.Text.Json".to_string(),
            ],
            PersistenceSource::Context { namespace, .. } => vec![
                "System.Data.Entity".to_string(),
                "System.Diagnostics".to_string(),
                namespace.clone(),
            ],
        }
    }

    pub fn fields(&self) -> Fragment {
        let mut fields = Fragment::new(FragmentKind::Field);
        match &self.source {
            PersistenceSource::None => {}
            PersistenceSource::File { path } => {
                fields.push(format!(
                    "private readonly string _dataFilePath = {};",
                    string_literal(&path.replace('\\', "/"))
                ));
            }
            PersistenceSource::Context { type_name, .. } => {
                fields.push(format!("private readonly {} _context = new();", type_name));
            }
        }
        fields
    }

    /// Body of `LoadItems()`.
    pub fn load_body(&self, schema: &ModelSchema) -> Fragment {
        self.load.render(|| {
            let model = &schema.name;
            let statements = match &self.source {
                PersistenceSource::File { .. } => Fragment::body([
                    "if (!File.Exists(_dataFilePath))".to_string(),
                    "{".to_string(),
                    "    Debug.WriteLine(\"Data file not found: \" + _dataFilePath);".to_string(),
                    "    return;".to_string(),
                    "}".to_string(),
                    String::new(),
                    "var json = File.ReadAllText(_dataFilePath);".to_string(),
                    format!("var items = JsonSerializer.Deserialize<List<{}>>(json);", model),
                    format!(
                        "Items = new ObservableCollection<{m}>(items ?? new List<{m}>());",
                        m = model
                    ),
                ]),
                PersistenceSource::Context { collection, .. } => Fragment::body([format!(
                    "Items = new ObservableCollection<{}>(_context.{}.ToList());",
                    model, collection
                )]),
                PersistenceSource::None => Fragment::new(FragmentKind::Body),
            };
            guarded(&statements, "loading")
        })
    }

    /// Body of `SaveChanges()`.
    pub fn save_body(&self) -> Fragment {
        self.save.render(|| {
            let statements = match &self.source {
                PersistenceSource::File { .. } => Fragment::body([
                    "var directory = Path.GetDirectoryName(_dataFilePath);",
                    "if (!string.IsNullOrEmpty(directory))",
                    "{",
                    "    Directory.CreateDirectory(directory);",
                    "}",
                    "",
                    "var json = JsonSerializer.Serialize(Items, new JsonSerializerOptions { WriteIndented = true });",
                    "File.WriteAllText(_dataFilePath, json);",
                ]),
                PersistenceSource::Context { collection, .. } => Fragment::body([
                    format!(
                        "foreach (var item in Items.Where(i => !_context.{c}.Local.Contains(i)).ToList())",
                        c = collection
                    ),
                    "{".to_string(),
                    format!("    _context.{}.Add(item);", collection),
                    "}".to_string(),
                    String::new(),
                    format!(
                        "foreach (var item in _context.{c}.Local.Where(i => !Items.Contains(i)).ToList())",
                        c = collection
                    ),
                    "{".to_string(),
                    format!("    _context.{}.Remove(item);", collection),
                    "}".to_string(),
                    String::new(),
                    "_context.SaveChanges();".to_string(),
                ]),
                PersistenceSource::None => Fragment::new(FragmentKind::Body),
            };
            guarded(&statements, "saving")
        })
    }
}

fn resolve_context(
    schema: &ModelSchema,
    namespaces: &NamespaceSet,
    fallback: ContextFallback,
    lookup: Option<ContextLookup>,
    diagnostics: &mut Vec<Diagnostic>,
) -> PersistenceSource {
    let default_namespace = format!("{}.Context", namespaces.project);
    let placeholder_collection = format!("{}s", schema.name);

    let (source, diagnostic) = match lookup {
        Some(ContextLookup {
            type_name,
            namespace,
            collection: Some(collection),
        }) => {
            let namespace = if namespace.is_empty() { default_namespace } else { namespace };
            return PersistenceSource::Context {
                type_name,
                namespace,
                collection,
                placeholder: false,
            };
        }
        Some(ContextLookup {
            type_name,
            namespace,
            collection: None,
        }) => {
            let diagnostic = Diagnostic::ContextCollectionNotFound {
                model: schema.name.clone(),
                context: type_name.clone(),
                placeholder: placeholder_collection.clone(),
            };
            let namespace = if namespace.is_empty() { default_namespace } else { namespace };
            let source = PersistenceSource::Context {
                type_name,
                namespace,
                collection: placeholder_collection,
                placeholder: true,
            };
            (source, diagnostic)
        }
        None => {
            let diagnostic = Diagnostic::ContextTypeNotFound {
                model: schema.name.clone(),
                placeholder: PLACEHOLDER_CONTEXT.to_string(),
            };
            let source = PersistenceSource::Context {
                type_name: PLACEHOLDER_CONTEXT.to_string(),
                namespace: default_namespace,
                collection: placeholder_collection,
                placeholder: true,
            };
            (source, diagnostic)
        }
    };

    match fallback {
        ContextFallback::Placeholder => {
            diagnostics.push(diagnostic);
            source
        }
        ContextFallback::Disable => {
            diagnostics.push(Diagnostic::PersistenceSourceAmbiguous {
                model: schema.name.clone(),
            });
            PersistenceSource::None
        }
    }
}

/// Wrap statements in a try/catch that logs instead of throwing.
fn guarded(statements: &Fragment, activity: &str) -> Fragment {
    let mut body = Fragment::new(FragmentKind::Body);
    body.append_block("try", statements);
    body.append_block(
        "catch (Exception ex)",
        &Fragment::body([format!("Debug.WriteLine(\"Error {} items: \" + ex.Message);", activity)]),
    );
    body
}

/// Quoted C# string literal for arbitrary text.
fn string_literal(text: &str) -> String {
    let mut literal = String::with_capacity(text.len() + 2);
    literal.push('"');
    for c in text.chars() {
        match c {
            '"' => literal.push_str("\\\""),
            '\\' => literal.push_str("\\\\"),
            '\n' => literal.push_str("\\n"),
            '\r' => literal.push_str("\\r"),
            '\t' => literal.push_str("\\t"),
            '\0' => literal.push_str("\\0"),
            c if c.is_control() => literal.push_str(&format!("\\u{:04X}", c as u32)),
            c => literal.push(c),
        }
    }
    literal.push('"');
    literal
}
