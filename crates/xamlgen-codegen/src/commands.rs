//! Command rendering.
//!
//! Two command sets exist. CRUD mode always declares the same four commands
//! (Add, Edit, Delete, Save); an operation switched off in the config keeps
//! its command and renders a stub handler. Legacy mode declares one command
//! per public model method, forwarding to the wrapped model instance.

use crate::fragment::{Fragment, FragmentKind};
use crate::platform::PlatformProfile;
use crate::policy::FeaturePolicy;
use std::collections::HashSet;
use tracing::debug;
use xamlgen_core::{GenerationConfig, MethodDescriptor, ModelSchema};

/// A fixed CRUD operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrudOperation {
    Add,
    Edit,
    Delete,
    Save,
}

impl CrudOperation {
    pub const ALL: [CrudOperation; 4] = [
        CrudOperation::Add,
        CrudOperation::Edit,
        CrudOperation::Delete,
        CrudOperation::Save,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CrudOperation::Add => "Add",
            CrudOperation::Edit => "Edit",
            CrudOperation::Delete => "Delete",
            CrudOperation::Save => "Save",
        }
    }

    pub fn command_name(self) -> String {
        format!("{}Command", self.label())
    }

    /// View-model method the command invokes.
    pub fn handler(self) -> &'static str {
        match self {
            CrudOperation::Add => "AddItem",
            CrudOperation::Edit => "EditItem",
            CrudOperation::Delete => "DeleteItem",
            CrudOperation::Save => "SaveChanges",
        }
    }

    pub fn requires_selection(self) -> bool {
        matches!(self, CrudOperation::Edit | CrudOperation::Delete)
    }
}

/// Per-operation policies for the three switchable operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrudPolicies {
    pub add: FeaturePolicy,
    pub edit: FeaturePolicy,
    pub delete: FeaturePolicy,
}

impl CrudPolicies {
    pub fn from_config(config: &GenerationConfig) -> Self {
        Self {
            add: FeaturePolicy::from_flag(config.enable_add, "Adding items is disabled."),
            edit: FeaturePolicy::from_flag(config.enable_edit, "Editing items is disabled."),
            delete: FeaturePolicy::from_flag(config.enable_delete, "Deleting items is disabled."),
        }
    }

    /// Policy for an operation. Save is governed by persistence, not here.
    pub fn get(&self, operation: CrudOperation) -> Option<&FeaturePolicy> {
        match operation {
            CrudOperation::Add => Some(&self.add),
            CrudOperation::Edit => Some(&self.edit),
            CrudOperation::Delete => Some(&self.delete),
            CrudOperation::Save => None,
        }
    }

    /// Whether the operation gets an action button in the view.
    pub fn shows_action(&self, operation: CrudOperation) -> bool {
        self.get(operation).map_or(true, FeaturePolicy::is_enabled)
    }
}

/// A command property and how it is wired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub name: String,
    pub handler: String,
    /// Boolean expression gating execution.
    pub can_execute: Option<String>,
    /// Handler takes the command argument.
    pub parameterized: bool,
}

/// A legacy command bound to one model method.
#[derive(Debug, Clone)]
pub struct LegacyCommand<'s> {
    pub method: &'s MethodDescriptor,
    pub spec: CommandSpec,
}

/// Names of the legacy view-model plumbing the handlers call into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyMembers {
    pub model_field: String,
    pub load: String,
    pub apply: String,
}

impl Default for LegacyMembers {
    fn default() -> Self {
        Self {
            model_field: "_model".to_string(),
            load: "LoadFromModel".to_string(),
            apply: "ApplyToModel".to_string(),
        }
    }
}

/// Renders command declarations, initializers and legacy handlers.
#[derive(Debug, Clone, Copy)]
pub struct CommandRenderer<'p> {
    profile: &'p PlatformProfile,
}

impl<'p> CommandRenderer<'p> {
    pub fn new(profile: &'p PlatformProfile) -> Self {
        Self { profile }
    }

    pub fn crud_commands(&self) -> Vec<CommandSpec> {
        CrudOperation::ALL
            .iter()
            .map(|op| CommandSpec {
                name: op.command_name(),
                handler: op.handler().to_string(),
                can_execute: op.requires_selection().then(|| "SelectedItem != null".to_string()),
                parameterized: false,
            })
            .collect()
    }

    /// One command per public method; later overloads of a name are skipped.
    pub fn legacy_commands<'s>(&self, schema: &'s ModelSchema) -> Vec<LegacyCommand<'s>> {
        let mut seen = HashSet::new();
        let mut commands = Vec::new();
        for method in schema.public_methods() {
            if !seen.insert(method.name.as_str()) {
                debug!(model = %schema.name, method = %method.name, "skipping overload");
                continue;
            }
            commands.push(LegacyCommand {
                method,
                spec: CommandSpec {
                    name: format!("{}Command", method.name),
                    handler: format!("Execute{}", method.name),
                    can_execute: Some(format!("CanExecute{}()", method.name)),
                    parameterized: method.parameters.len() == 1,
                },
            });
        }
        commands
    }

    pub fn declaration(&self, spec: &CommandSpec) -> String {
        format!("public {} {} {{ get; }}", self.profile.command_type, spec.name)
    }

    pub fn initialization(&self, spec: &CommandSpec) -> String {
        if spec.parameterized {
            let can = spec.can_execute.as_deref().unwrap_or("true");
            return format!(
                "{} = new {}({}, _ => {});",
                spec.name, self.profile.parameterized_command_class, spec.handler, can
            );
        }
        match &spec.can_execute {
            Some(can) => format!(
                "{} = new {}({}, () => {});",
                spec.name, self.profile.command_class, spec.handler, can
            ),
            None => format!("{} = new {}({});", spec.name, self.profile.command_class, spec.handler),
        }
    }

    pub fn declarations<'a>(&self, specs: impl IntoIterator<Item = &'a CommandSpec>) -> Fragment {
        let mut fragment = Fragment::new(FragmentKind::Command);
        for spec in specs {
            fragment.push(self.declaration(spec));
        }
        fragment
    }

    pub fn initializations<'a>(&self, specs: impl IntoIterator<Item = &'a CommandSpec>) -> Fragment {
        let mut fragment = Fragment::new(FragmentKind::Body);
        for spec in specs {
            fragment.push(self.initialization(spec));
        }
        fragment
    }

    /// Statements refreshing can-execute state of the named commands.
    pub fn refresh<'a>(&self, commands: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        commands
            .into_iter()
            .map(|name| self.profile.refresh_statement(name))
            .collect()
    }

    /// Execute and can-execute methods for a legacy command.
    pub fn legacy_handlers(&self, command: &LegacyCommand<'_>, members: &LegacyMembers) -> Fragment {
        let method = command.method;
        let arguments: Vec<String> = if command.spec.parameterized {
            method
                .parameters
                .iter()
                .map(|p| {
                    let resolved = p.resolved();
                    let local = format!("{}Argument", p.name);
                    format!(
                        "parameter is {ty} {local} ? {local} : default({decl})",
                        ty = resolved.canonical,
                        local = local,
                        decl = resolved.source_name()
                    )
                })
                .collect()
        } else {
            method
                .parameters
                .iter()
                .map(|p| format!("default({})", p.resolved().source_name()))
                .collect()
        };

        let mut body = Fragment::new(FragmentKind::Body);
        let model = &members.model_field;
        body.append_block(format!("if ({} == null)", model), &Fragment::body(["return;"]));
        body.push_blank();
        body.push(format!("{}();", members.apply));
        body.push(format!("{}.{}({});", model, method.name, arguments.join(", ")));
        body.push(format!("{}();", members.load));

        let signature = if command.spec.parameterized {
            format!("private void {}(object? parameter)", command.spec.handler)
        } else {
            format!("private void {}()", command.spec.handler)
        };

        let mut fragment = Fragment::new(FragmentKind::Method);
        fragment.append_block(signature, &body);
        fragment.push_blank();
        fragment.push(format!("private bool CanExecute{}() => {} != null;", method.name, model));
        fragment
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{MAUI, UWP, WPF};

    #[test]
    fn test_crud_commands_always_four() {
        let specs = CommandRenderer::new(&WPF).crud_commands();
        let names: Vec<_> = specs.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["AddCommand", "EditCommand", "DeleteCommand", "SaveCommand"]);
    }

    #[test]
    fn test_crud_initialization_per_profile() {
        let wpf = CommandRenderer::new(&WPF);
        let specs = wpf.crud_commands();
        assert_eq!(wpf.initialization(&specs[0]), "AddCommand = new RelayCommand(AddItem);");
        assert_eq!(
            wpf.initialization(&specs[1]),
            "EditCommand = new RelayCommand(EditItem, () => SelectedItem != null);"
        );
        assert_eq!(wpf.declaration(&specs[1]), "public IRelayCommand EditCommand { get; }");

        let maui = CommandRenderer::new(&MAUI);
        assert_eq!(
            maui.initialization(&specs[2]),
            "DeleteCommand = new Command(DeleteItem, () => SelectedItem != null);"
        );
        assert_eq!(maui.declaration(&specs[3]), "public ICommand SaveCommand { get; }");
    }

    #[test]
    fn test_policies_from_config() {
        let config = GenerationConfig {
            enable_delete: false,
            ..Default::default()
        };
        let policies = CrudPolicies::from_config(&config);
        assert!(policies.shows_action(CrudOperation::Add));
        assert!(!policies.shows_action(CrudOperation::Delete));
        assert!(policies.shows_action(CrudOperation::Save));
    }

    #[test]
    fn test_legacy_commands() {
        let schema = ModelSchema::new("Order", "Shop.Models")
            .with_method(MethodDescriptor::new("Submit"))
            .with_method(MethodDescriptor::new("Rename").with_parameter("name", "string"))
            .with_method(
                MethodDescriptor::new("Move")
                    .with_parameter("x", "int")
                    .with_parameter("y", "System.Nullable<int>"),
            )
            .with_method(MethodDescriptor::new("Submit").with_parameter("force", "bool"))
            .with_method(MethodDescriptor::new("Audit").private());

        let renderer = CommandRenderer::new(&UWP);
        let commands = renderer.legacy_commands(&schema);
        let names: Vec<_> = commands.iter().map(|c| c.spec.name.as_str()).collect();
        assert_eq!(names, ["SubmitCommand", "RenameCommand", "MoveCommand"]);

        let submit = renderer.legacy_handlers(&commands[0], &LegacyMembers::default()).text();
        assert!(submit.contains("private void ExecuteSubmit()"));
        assert!(submit.contains("_model.Submit();"));
        assert!(submit.contains("private bool CanExecuteSubmit() => _model != null;"));

        let rename = &commands[1];
        assert!(rename.spec.parameterized);
        assert_eq!(
            renderer.initialization(&rename.spec),
            "RenameCommand = new RelayCommand<object?>(ExecuteRename, _ => CanExecuteRename());"
        );
        let text = renderer.legacy_handlers(rename, &LegacyMembers::default()).text();
        assert!(text.contains("private void ExecuteRename(object? parameter)"));
        assert!(text.contains(
            "_model.Rename(parameter is string nameArgument ? nameArgument : default(string));"
        ));

        let members = LegacyMembers {
            model_field: "_sourceModel".into(),
            ..Default::default()
        };
        let moved = renderer.legacy_handlers(&commands[2], &members).text();
        assert!(moved.contains("if (_sourceModel == null)"));
        assert!(moved.contains("_sourceModel.Move(default(int), default(int?));"));
        assert!(moved.contains("private bool CanExecuteMove() => _sourceModel != null;"));
    }
}
