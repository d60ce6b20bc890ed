//! View-model assembler.

use super::{ArtifactKind, DocumentAssembler, GeneratedArtifact, GenerationContext};
use crate::commands::{CommandSpec, CrudOperation, LegacyMembers};
use crate::controls::ControlKind;
use crate::dialog_flow::{DialogFlow, DialogFlowRenderer, FlowOperation};
use crate::error::Result;
use crate::fragment::{Fragment, FragmentKind};
use crate::members::MemberScope;
use crate::platform::PropertyStyle;
use crate::policy::FeaturePolicy;
use crate::properties::PropertySpec;
use tracing::debug;
use xamlgen_core::{CommandMode, ModelSchema};

/// Assembles `ViewModels/{Name}ViewModel`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ViewModelAssembler;

impl DocumentAssembler for ViewModelAssembler {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::ViewModel
    }

    fn assemble(&self, ctx: &GenerationContext<'_>) -> Result<GeneratedArtifact> {
        let class_name = format!("{}ViewModel", ctx.model());
        let (class, extra_usings) = match ctx.config.command_mode {
            CommandMode::Crud => (self.crud_class(ctx, &class_name), self.crud_usings(ctx)),
            CommandMode::Legacy => (self.legacy_class(ctx, &class_name)?, self.legacy_usings(ctx)),
        };

        let usings = ctx
            .profile
            .view_model_usings
            .iter()
            .copied()
            .chain(extra_usings.iter().map(String::as_str));
        let text = ctx.source_document(&ctx.namespaces.view_models, usings, &class)?;
        debug!(model = %ctx.model(), mode = ?ctx.config.command_mode, "assembled view-model");

        Ok(GeneratedArtifact {
            kind: self.kind(),
            path: ctx.path("ViewModels", &class_name, ctx.profile.source_extension),
            text,
            code_behind: None,
        })
    }
}

impl ViewModelAssembler {
    fn crud_usings(&self, ctx: &GenerationContext<'_>) -> Vec<String> {
        let mut usings = ctx.persistence.usings();
        usings.push(ctx.namespaces.model.clone());
        if ctx.config.use_dialog {
            usings.push(ctx.namespaces.views.clone());
        }
        usings
    }

    fn legacy_usings(&self, ctx: &GenerationContext<'_>) -> Vec<String> {
        let mut usings = vec![ctx.namespaces.model.clone()];
        if ctx.config.enable_validation {
            usings.push("System.ComponentModel".to_string());
        }
        usings
    }

    fn crud_class(&self, ctx: &GenerationContext<'_>, class_name: &str) -> Fragment {
        let model = ctx.model();
        let properties = ctx.properties();
        let commands = ctx.commands();
        let specs = commands.crud_commands();
        let policies = ctx.policies();

        let items = properties.build(
            &PropertySpec::declared("Items", &format!("ObservableCollection<{}>", model)).initialized("new()"),
        );
        let selected = properties.build(
            &PropertySpec::declared("SelectedItem", &format!("{}?", model)).on_changed(commands.refresh(
                specs
                    .iter()
                    .filter(|s| s.can_execute.is_some())
                    .map(|s| s.name.as_str()),
            )),
        );

        let mut init = commands.initializations(&specs);
        if ctx.persistence.is_persistent() {
            init.push_blank();
            init.push("LoadItems();");
        }
        let mut constructor = Fragment::new(FragmentKind::Constructor);
        constructor.append_block(format!("public {}()", class_name), &init);

        let mut members = vec![
            ctx.persistence.fields(),
            items,
            selected,
            commands.declarations(&specs),
            constructor,
            method("private void LoadItems()", &ctx.persistence.load_body(ctx.schema)),
        ];

        let flows = DialogFlowRenderer::new(ctx.profile, ctx.schema);
        for operation in FlowOperation::ALL {
            let flow = DialogFlow::plan(
                operation,
                ctx.schema,
                ctx.config.use_dialog,
                ctx.persistence.is_persistent(),
            );
            let policy = policies
                .get(crud_operation(operation))
                .cloned()
                .unwrap_or(FeaturePolicy::Enabled);
            members.push(flows.render_method(&flow, &policy));
        }

        members.push(method("private void SaveChanges()", &ctx.persistence.save_body()));
        members.push(properties.notification_support());

        class_block(
            &format!("public partial class {} : {}", class_name, ctx.profile.view_model_base()),
            &members,
        )
    }

    fn legacy_class(&self, ctx: &GenerationContext<'_>, class_name: &str) -> Result<Fragment> {
        let model = ctx.model();
        let schema = ctx.schema;
        let properties = ctx.properties();
        let commands = ctx.commands();
        let legacy = commands.legacy_commands(schema);
        let specs: Vec<&CommandSpec> = legacy.iter().map(|c| &c.spec).collect();

        let mut scope = MemberScope::for_properties(class_name, schema, ctx.profile);
        let command_members = specs.iter().flat_map(|s| {
            [s.name.clone(), s.handler.clone()]
                .into_iter()
                .chain(s.can_execute.as_deref().map(|c| c.trim_end_matches("()").to_string()))
        });
        scope.reserve(reserved_members(ctx, &["SetModel"]).into_iter().chain(command_members))?;
        let plumbing = LegacyMembers {
            model_field: scope.claim("_model", &["_sourceModel"]),
            load: scope.claim("LoadFromModel", &["LoadFromSource"]),
            apply: scope.claim("ApplyToModel", &["ApplyToSource"]),
        };
        let model_field = plumbing.model_field.as_str();

        let rendered: Vec<Fragment> = schema.properties.iter().map(|p| properties.build_property(p)).collect();
        let mut property_fragment = Fragment::new(FragmentKind::Property);
        property_fragment.append_separated(&rendered, 0);

        let mut init = commands.initializations(specs.iter().copied());
        if !init.is_empty() {
            init.push_blank();
        }
        init.push("SetModel(model);");
        let mut constructor = Fragment::new(FragmentKind::Constructor);
        constructor.append_block(format!("public {}({}? model = null)", class_name, model), &init);

        let mut set_model = Fragment::body([format!("{} = model;", model_field), format!("{}();", plumbing.load)]);
        for statement in commands.refresh(specs.iter().map(|s| s.name.as_str())) {
            set_model.push(statement);
        }

        let load = copy_method(&format!("private void {}()", plumbing.load), model_field, schema, |name| {
            format!("{0} = {1}.{0};", name, model_field)
        });
        let apply = copy_method(&format!("private void {}()", plumbing.apply), model_field, schema, |name| {
            format!("{1}.{0} = {0};", name, model_field)
        });

        let mut members = vec![
            Fragment::new(FragmentKind::Field).line(format!("private {}? {};", model, model_field)),
            property_fragment,
            commands.declarations(specs.iter().copied()),
            constructor,
            method(&format!("public void SetModel({}? model)", model), &set_model),
            load,
            apply,
        ];
        members.extend(legacy.iter().map(|c| commands.legacy_handlers(c, &plumbing)));

        let mut bases = vec![ctx.profile.view_model_base()];
        if ctx.config.enable_validation {
            bases.push("IDataErrorInfo");
            members.push(validation_members(schema, &scope.claim("Validate", &["ValidateProperty"])));
        }
        members.push(properties.notification_support());

        Ok(class_block(
            &format!("public partial class {} : {}", class_name, bases.join(", ")),
            &members,
        ))
    }
}

fn crud_operation(operation: FlowOperation) -> CrudOperation {
    match operation {
        FlowOperation::Add => CrudOperation::Add,
        FlowOperation::Edit => CrudOperation::Edit,
        FlowOperation::Delete => CrudOperation::Delete,
    }
}

pub(super) fn method(signature: &str, body: &Fragment) -> Fragment {
    let mut fragment = Fragment::new(FragmentKind::Method);
    fragment.append_block(signature, body);
    fragment
}

pub(super) fn class_block(header: &str, members: &[Fragment]) -> Fragment {
    let mut body = Fragment::new(FragmentKind::Body);
    body.append_separated(members, 0);
    let mut class = Fragment::new(FragmentKind::Document);
    class.append_block(header, &body);
    class
}

/// Public members a class hosting schema properties declares besides
/// `names`: change notification and validation plumbing.
pub(super) fn reserved_members(ctx: &GenerationContext<'_>, names: &[&str]) -> Vec<String> {
    let mut reserved: Vec<String> = names.iter().map(|n| n.to_string()).collect();
    if ctx.profile.property_style == PropertyStyle::ExplicitNotify {
        reserved.push("PropertyChanged".to_string());
        reserved.push("OnPropertyChanged".to_string());
    }
    if ctx.config.enable_validation {
        reserved.push("HasErrors".to_string());
    }
    reserved
}

/// Method copying every schema property, guarded on the model field.
fn copy_method(
    signature: &str,
    model_field: &str,
    schema: &ModelSchema,
    statement: impl Fn(&str) -> String,
) -> Fragment {
    let mut body = Fragment::new(FragmentKind::Body);
    body.append_block(format!("if ({} == null)", model_field), &Fragment::body(["return;"]));
    body.push_blank();
    for property in &schema.properties {
        body.push(statement(property.name()));
    }
    method(signature, &body)
}

/// `IDataErrorInfo` members plus `HasErrors`.
///
/// Text properties are required; numeric properties other than `Id` must be
/// positive. The interface is implemented explicitly so its indexer does not
/// claim the member name `Item`.
pub(super) fn validation_members(schema: &ModelSchema, validator: &str) -> Fragment {
    let rules: Vec<(&str, String, String)> = schema
        .properties
        .iter()
        .filter_map(|p| {
            let name = p.name();
            let canonical = p.canonical_type();
            if ControlKind::for_type(canonical) == ControlKind::Text && matches!(canonical, "string" | "String") {
                Some((name, format!("string.IsNullOrWhiteSpace({})", name), format!("{} is required.", name)))
            } else if ControlKind::is_numeric_type(canonical) && name != "Id" {
                Some((name, format!("{} <= 0", name), format!("{} must be greater than zero.", name)))
            } else {
                None
            }
        })
        .collect();

    let mut cases = Fragment::new(FragmentKind::Body);
    for (name, condition, message) in &rules {
        cases.push(format!("case nameof({}):", name));
        let mut case = Fragment::new(FragmentKind::Body);
        case.append_block(format!("if ({})", condition), &Fragment::body([format!("return \"{}\";", message)]));
        case.push("break;");
        cases.append_indented(&case, 1);
    }

    let mut getter = Fragment::new(FragmentKind::Body);
    if !rules.is_empty() {
        getter.append_block("switch (columnName)", &cases);
        getter.push_blank();
    }
    getter.push("return string.Empty;");

    let has_errors = if rules.is_empty() {
        "false".to_string()
    } else {
        rules
            .iter()
            .map(|(name, _, _)| format!("!string.IsNullOrEmpty({}(nameof({})))", validator, name))
            .collect::<Vec<_>>()
            .join(" || ")
    };

    let mut fragment = Fragment::new(FragmentKind::Property);
    fragment.push("string IDataErrorInfo.Error => string.Empty;");
    fragment.push_blank();
    fragment.push(format!("string IDataErrorInfo.this[string columnName] => {}(columnName);", validator));
    fragment.push_blank();
    fragment.push(format!("public bool HasErrors => {};", has_errors));
    fragment.push_blank();
    fragment.append_block(format!("private string {}(string columnName)", validator), &getter);
    fragment
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::TemplateEngine;
    use crate::namespaces::NamespaceSet;
    use crate::persistence::{PersistenceInputs, PersistencePlan};
    use crate::platform::{PlatformProfile, MAUI, UWP, WPF};
    use crate::verify::{braces_balanced, duplicate_members};
    use xamlgen_core::{ContextFallback, GenerationConfig, MethodDescriptor, PersistenceKind};

    fn product() -> ModelSchema {
        ModelSchema::new("Product", "Shop.Models")
            .with_property("Id", "int")
            .with_property("Title", "string")
            .with_property("InStock", "bool")
    }

    fn assemble(schema: &ModelSchema, config: &GenerationConfig, profile: &'static PlatformProfile) -> String {
        let namespaces = NamespaceSet::resolve(schema, None).unwrap();
        let persistence = PersistencePlan::resolve(
            config.persistence,
            schema,
            &namespaces,
            ContextFallback::Placeholder,
            PersistenceInputs {
                data_file: Some("Data/Product.json".into()),
                context: None,
            },
        );
        let templates = TemplateEngine::new().unwrap();
        let ctx = GenerationContext {
            schema,
            config,
            profile,
            namespaces: &namespaces,
            persistence: &persistence,
            templates: &templates,
        };
        ViewModelAssembler.assemble(&ctx).unwrap().text
    }

    #[test]
    fn test_wpf_crud_with_file_persistence() {
        let config = GenerationConfig {
            persistence: PersistenceKind::File,
            use_dialog: true,
            ..Default::default()
        };
        let text = assemble(&product(), &config, &WPF);

        assert!(text.contains("using CommunityToolkit.Mvvm.ComponentModel;"));
        assert!(text.contains("using Shop.Models;"));
        assert!(text.contains("using Shop.Views;"));
        assert!(text.contains("using System.Text.Json;"));
        assert!(text.contains("namespace Shop.ViewModels\n{\n    public partial class ProductViewModel : ObservableObject\n    {\n"));
        assert!(text.contains("        private readonly string _dataFilePath = \"Data/Product.json\";"));
        assert!(text.contains("        private ObservableCollection<Product> items = new();"));
        assert!(text.contains("        partial void OnSelectedItemChanged(Product? value)"));
        assert!(text.contains("            DeleteCommand.NotifyCanExecuteChanged();"));
        assert_eq!(text.matches("public IRelayCommand ").count(), 4);
        assert!(text.contains("            LoadItems();"));
        assert!(text.contains("        private void EditItem()"));
        assert!(text.contains("dialog.ShowDialog();"));
        assert!(text.contains("                SaveChanges();"));
        assert!(braces_balanced(&text));
    }

    #[test]
    fn test_no_persistence_stubs() {
        let text = assemble(&product(), &GenerationConfig::default(), &UWP);
        assert!(!text.contains("LoadItems();"));
        assert!(!text.contains("SaveChanges();"));
        assert!(text.contains("throw new NotSupportedException(\"Loading items is not supported: no persistence is configured.\");"));
        assert!(text.contains("throw new NotSupportedException(\"Saving items is not supported: no persistence is configured.\");"));
        assert!(text.contains("public ICommand SaveCommand { get; }"));
        assert!(text.contains("public event PropertyChangedEventHandler? PropertyChanged;"));
        assert!(braces_balanced(&text));
    }

    #[test]
    fn test_disabled_operation_stub() {
        let config = GenerationConfig {
            enable_add: false,
            ..Default::default()
        };
        let text = assemble(&product(), &config, &MAUI);
        assert!(text.contains("public ICommand AddCommand { get; }"));
        assert!(text.contains("throw new NotSupportedException(\"Adding items is disabled.\");"));
        assert!(text.contains("(EditCommand as Command)?.ChangeCanExecute();"));
    }

    #[test]
    fn test_maui_dialog_flows_are_async() {
        let config = GenerationConfig {
            use_dialog: true,
            ..Default::default()
        };
        let text = assemble(&product(), &config, &MAUI);
        assert!(text.contains("private async void AddItem()"));
        assert!(text.contains("private async void DeleteItem()"));
        assert!(text.contains("Shell.Current.DisplayAlert"));
    }

    #[test]
    fn test_legacy_view_model() {
        let schema = product()
            .with_method(MethodDescriptor::new("Restock").with_parameter("amount", "int"))
            .with_method(MethodDescriptor::new("Archive"));
        let config = GenerationConfig {
            command_mode: CommandMode::Legacy,
            enable_validation: true,
            ..Default::default()
        };
        let text = assemble(&schema, &config, &UWP);

        assert!(text.contains("public partial class ProductViewModel : INotifyPropertyChanged, IDataErrorInfo"));
        assert!(text.contains("private Product? _model;"));
        assert!(text.contains("public ProductViewModel(Product? model = null)"));
        assert!(text.contains("public void SetModel(Product? model)"));
        assert!(text.contains("Title = _model.Title;"));
        assert!(text.contains("_model.InStock = InStock;"));
        assert!(text.contains("RestockCommand = new RelayCommand<object?>(ExecuteRestock, _ => CanExecuteRestock());"));
        assert!(text.contains("(ArchiveCommand as IRelayCommand)?.NotifyCanExecuteChanged();"));
        assert!(text.contains("case nameof(Title):"));
        assert!(!text.contains("case nameof(Id):"));
        assert!(!text.contains("Items"));
        assert!(braces_balanced(&text));
    }

    #[test]
    fn test_validation_members_without_rules() {
        let schema = ModelSchema::new("Flag", "").with_property("On", "bool");
        let text = validation_members(&schema, "Validate").text();
        assert!(!text.contains("switch"));
        assert!(text.contains("public bool HasErrors => false;"));
    }

    #[test]
    fn test_legacy_model_property_does_not_clash() {
        let schema = ModelSchema::new("Listing", "Shop.Models")
            .with_property("Model", "string")
            .with_property("Item", "string")
            .with_method(MethodDescriptor::new("Publish"));
        let config = GenerationConfig {
            command_mode: CommandMode::Legacy,
            enable_validation: true,
            ..Default::default()
        };
        for profile in [&WPF, &UWP, &MAUI] {
            let text = assemble(&schema, &config, profile);
            assert!(duplicate_members(&text).is_empty(), "{:?}: {:?}", profile.platform, duplicate_members(&text));
            assert!(braces_balanced(&text));
        }

        let text = assemble(&schema, &config, &UWP);
        assert!(text.contains("private Listing? _sourceModel;"));
        assert!(text.contains("private string _model = string.Empty;"));
        assert!(text.contains("Model = _sourceModel.Model;"));
        assert!(text.contains("_sourceModel.Publish();"));
        assert!(text.contains("private bool CanExecutePublish() => _sourceModel != null;"));
        assert!(text.contains("string IDataErrorInfo.this[string columnName] => Validate(columnName);"));
    }
}
