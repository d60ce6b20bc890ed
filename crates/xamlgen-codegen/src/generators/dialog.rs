//! Dialog view and dialog view-model assemblers.
//!
//! The dialog edits a working copy handed to it by the main view-model and
//! reports the outcome through `IsSaved` and `Completion`. It never touches
//! the collection.

use super::view_model::{class_block, method, reserved_members, validation_members};
use super::{ArtifactKind, CodeBehind, DocumentAssembler, GeneratedArtifact, GenerationContext};
use crate::commands::CommandSpec;
use crate::controls::BindMode;
use crate::error::Result;
use crate::fragment::{Fragment, FragmentKind};
use crate::markup::Element;
use crate::members::MemberScope;
use crate::properties::PropertySpec;
use tracing::debug;

/// Assembles `Views/Dialog{Name}View` and its code-behind.
#[derive(Debug, Clone, Copy, Default)]
pub struct DialogViewAssembler;

/// Assembles `ViewModels/Dialog{Name}ViewModel`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DialogViewModelAssembler;

impl DocumentAssembler for DialogViewAssembler {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::DialogView
    }

    fn assemble(&self, ctx: &GenerationContext<'_>) -> Result<GeneratedArtifact> {
        let profile = ctx.profile;
        let class_name = format!("Dialog{}View", ctx.model());
        let controls = ctx.controls();

        let mut form = Element::new(profile.form_container)
            .attrs(profile.layout_attributes)
            .children(
                ctx.schema
                    .properties
                    .iter()
                    .flat_map(|p| controls.build_field(p, BindMode::TwoWay)),
            );
        if profile.dialog_buttons {
            form = form.child(
                Element::new(profile.action_bar)
                    .attrs(profile.action_bar_attributes)
                    .child(
                        dialog_button(ctx, "Save", "SaveCommand").attrs(profile.default_button_attributes),
                    )
                    .child(
                        dialog_button(ctx, "Cancel", "CancelCommand").attrs(profile.cancel_button_attributes),
                    ),
            );
        }

        let root = ctx
            .markup_root(profile.dialog_root_element, &class_name)
            .attr("Title", "{Binding WindowTitle}")
            .attrs(profile.dialog_attributes)
            .child(form);
        debug!(model = %ctx.model(), platform = ?profile.platform, "assembled dialog view");

        let extension = profile.markup_extension;
        Ok(GeneratedArtifact {
            kind: self.kind(),
            path: ctx.path("Views", &class_name, extension),
            text: root.render().text(),
            code_behind: Some(CodeBehind {
                path: ctx.path(
                    "Views",
                    &class_name,
                    &format!("{}.{}", extension, profile.source_extension),
                ),
                text: ctx.code_behind(
                    &class_name,
                    profile.dialog_root_element,
                    &[],
                    &Fragment::body(["InitializeComponent();"]),
                )?,
            }),
        })
    }
}

/// Public members the main view-model, the dialog view and the
/// code-behind reach by name.
const DIALOG_MEMBERS: &[&str] = &[
    "WindowTitle",
    "IsSaved",
    "Completion",
    "GetItem",
    "SaveCommand",
    "CancelCommand",
];

fn dialog_button(ctx: &GenerationContext<'_>, text: &str, command: &str) -> Element {
    Element::new("Button")
        .attr(ctx.profile.button_text_attribute, text)
        .attr("Command", format!("{{Binding {}}}", command))
        .attr(ctx.profile.width_attribute, "80")
}

impl DocumentAssembler for DialogViewModelAssembler {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::DialogViewModel
    }

    fn assemble(&self, ctx: &GenerationContext<'_>) -> Result<GeneratedArtifact> {
        let model = ctx.model();
        let schema = ctx.schema;
        let class_name = format!("Dialog{}ViewModel", model);
        let properties = ctx.properties();
        let commands = ctx.commands();
        let validation = ctx.config.enable_validation;

        let mut scope = MemberScope::for_properties(&class_name, schema, ctx.profile);
        scope.reserve(reserved_members(ctx, DIALOG_MEMBERS))?;
        let item_field = scope.claim("_item", &["_sourceItem", "_dialogItem"]);
        let completion_field = scope.claim("_completion", &["_dialogCompletion"]);
        let save_handler = scope.claim("Save", &["SaveDialog"]);
        let cancel_handler = scope.claim("Cancel", &["CancelDialog"]);

        let specs = [
            CommandSpec {
                name: "SaveCommand".to_string(),
                handler: save_handler.clone(),
                can_execute: None,
                parameterized: false,
            },
            CommandSpec {
                name: "CancelCommand".to_string(),
                handler: cancel_handler.clone(),
                can_execute: None,
                parameterized: false,
            },
        ];

        let fields = Fragment::new(FragmentKind::Field)
            .line(format!("private readonly {} {};", model, item_field))
            .line(format!(
                "private readonly TaskCompletionSource<bool> {} = new();",
                completion_field
            ));

        let mut property_list: Vec<Fragment> = schema.properties.iter().map(|p| properties.build_property(p)).collect();
        property_list.push(properties.build(&PropertySpec::declared("WindowTitle", "string")));
        let mut property_fragment = Fragment::new(FragmentKind::Property);
        property_fragment.append_separated(&property_list, 0);

        let state = Fragment::new(FragmentKind::Property)
            .line("public bool IsSaved { get; private set; }")
            .line("")
            .line(format!("public Task<bool> Completion => {}.Task;", completion_field));

        let mut init = Fragment::body([format!("{} = item;", item_field), "WindowTitle = title;".to_string()]);
        for property in &schema.properties {
            init.push(format!("{0} = item.{0};", property.name()));
        }
        init.push_blank();
        init.append(&commands.initializations(&specs));
        let mut constructor = Fragment::new(FragmentKind::Constructor);
        constructor.append_block(format!("public {}({} item, string title)", class_name, model), &init);

        let mut get_item = Fragment::new(FragmentKind::Body);
        for property in &schema.properties {
            get_item.push(format!("{1}.{0} = {0};", property.name(), item_field));
        }
        get_item.push(format!("return {};", item_field));

        let mut save = Fragment::new(FragmentKind::Body);
        if validation {
            save.append_block("if (HasErrors)", &Fragment::body(["return;"]));
            save.push_blank();
        }
        save.push("IsSaved = true;");
        save.push(format!("{}.TrySetResult(true);", completion_field));
        let mut cancel = Fragment::body([
            "IsSaved = false;".to_string(),
            format!("{}.TrySetResult(false);", completion_field),
        ]);
        if let Some(close) = ctx.profile.dialog_close {
            save.push(close);
            cancel.push(close);
        }

        let mut members = vec![
            fields,
            property_fragment,
            state,
            commands.declarations(&specs),
            constructor,
            method(&format!("public {} GetItem()", model), &get_item),
            method(&format!("private void {}()", save_handler), &save),
            method(&format!("private void {}()", cancel_handler), &cancel),
        ];

        let mut bases = vec![ctx.profile.view_model_base()];
        let mut usings: Vec<&str> = ctx.profile.view_model_usings.to_vec();
        usings.push(&ctx.namespaces.model);
        if validation {
            bases.push("IDataErrorInfo");
            usings.push("System.ComponentModel");
            members.push(validation_members(schema, &scope.claim("Validate", &["ValidateProperty"])));
        }
        members.push(properties.notification_support());

        let class = class_block(
            &format!("public partial class {} : {}", class_name, bases.join(", ")),
            &members,
        );
        let text = ctx.source_document(&ctx.namespaces.view_models, usings, &class)?;
        debug!(model = %model, platform = ?ctx.profile.platform, "assembled dialog view-model");

        Ok(GeneratedArtifact {
            kind: self.kind(),
            path: ctx.path("ViewModels", &class_name, ctx.profile.source_extension),
            text,
            code_behind: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::TemplateEngine;
    use crate::namespaces::NamespaceSet;
    use crate::persistence::{PersistenceInputs, PersistencePlan};
    use crate::platform::{PlatformProfile, MAUI, UWP, WPF};
    use crate::verify::{braces_balanced, duplicate_members};
    use crate::error::CodegenError;
    use xamlgen_core::{ContextFallback, GenerationConfig, GenerationError, ModelSchema, PersistenceKind};

    fn product() -> ModelSchema {
        ModelSchema::new("Product", "Shop.Models")
            .with_property("Id", "int")
            .with_property("Title", "string")
            .with_property("Price", "decimal?")
    }

    fn try_assemble<A: DocumentAssembler>(
        assembler: A,
        schema: &ModelSchema,
        config: &GenerationConfig,
        profile: &'static PlatformProfile,
    ) -> Result<GeneratedArtifact> {
        let namespaces = NamespaceSet::resolve(schema, None).unwrap();
        let persistence = PersistencePlan::resolve(
            PersistenceKind::None,
            schema,
            &namespaces,
            ContextFallback::Placeholder,
            PersistenceInputs::default(),
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
        assembler.assemble(&ctx)
    }

    fn assemble<A: DocumentAssembler>(
        assembler: A,
        config: &GenerationConfig,
        profile: &'static PlatformProfile,
    ) -> GeneratedArtifact {
        try_assemble(assembler, &product(), config, profile).unwrap()
    }

    fn dialog_config() -> GenerationConfig {
        GenerationConfig {
            use_dialog: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_wpf_dialog_view() {
        let view = assemble(DialogViewAssembler, &dialog_config(), &WPF);
        assert_eq!(view.path, std::path::PathBuf::from("Views/DialogProductView.xaml"));
        assert!(view.text.contains("Title=\"{Binding WindowTitle}\" SizeToContent=\"WidthAndHeight\""));
        assert!(view.text.contains("<TextBox Text=\"{Binding Title, Mode=TwoWay, UpdateSourceTrigger=PropertyChanged}\" />"));
        assert!(view.text.contains("<Button Content=\"Save\" Command=\"{Binding SaveCommand}\" Width=\"80\" IsDefault=\"True\" />"));
        assert!(view.text.contains("IsCancel=\"True\""));
        let code_behind = view.code_behind.unwrap().text;
        assert!(code_behind.contains("public partial class DialogProductView : Window"));
        assert!(!code_behind.contains("DataContext"));
    }

    #[test]
    fn test_uwp_content_dialog_uses_builtin_buttons() {
        let view = assemble(DialogViewAssembler, &dialog_config(), &UWP);
        assert!(view.text.starts_with("<ContentDialog "));
        assert!(view.text.contains("PrimaryButtonCommand=\"{Binding SaveCommand}\""));
        assert!(!view.text.contains("<Button"));
    }

    #[test]
    fn test_dialog_view_model_members() {
        let vm = assemble(DialogViewModelAssembler, &dialog_config(), &MAUI);
        let text = &vm.text;
        assert_eq!(vm.path, std::path::PathBuf::from("ViewModels/DialogProductViewModel.cs"));
        assert!(text.contains("public partial class DialogProductViewModel : INotifyPropertyChanged"));
        assert!(text.contains("private readonly Product _item;"));
        assert!(text.contains("public string WindowTitle"));
        assert!(text.contains("public bool IsSaved { get; private set; }"));
        assert!(text.contains("public Task<bool> Completion => _completion.Task;"));
        assert!(text.contains("public DialogProductViewModel(Product item, string title)"));
        assert!(text.contains("Price = item.Price;"));
        assert!(text.contains("_item.Price = Price;"));
        assert!(text.contains("SaveCommand = new Command(Save);"));
        assert!(text.contains("_ = Shell.Current.Navigation.PopModalAsync();"));
        assert!(!text.contains("HasErrors"));
        assert!(braces_balanced(text));
    }

    #[test]
    fn test_dialog_validation() {
        let config = GenerationConfig {
            enable_validation: true,
            ..dialog_config()
        };
        let vm = assemble(DialogViewModelAssembler, &config, &WPF);
        assert!(vm.text.contains("public partial class DialogProductViewModel : ObservableObject, IDataErrorInfo"));
        assert!(vm.text.contains("using System.ComponentModel;"));
        assert!(vm.text.contains("if (HasErrors)"));
        assert!(vm.text.contains("case nameof(Price):"));
        assert!(vm.text.contains("if (Price <= 0)"));
        assert!(vm.text.contains("Application.Current.Windows.OfType<Window>()"));
        assert!(braces_balanced(&vm.text));

        let view = assemble(DialogViewAssembler, &config, &WPF);
        assert!(view.text.contains("ValidatesOnDataErrors=True, NotifyOnValidationError=True"));
    }

    fn order() -> ModelSchema {
        ModelSchema::new("Order", "Shop.Models")
            .with_property("Id", "int")
            .with_property("Item", "string")
            .with_property("Validate", "bool")
    }

    #[test]
    fn test_item_property_does_not_clash() {
        let config = GenerationConfig {
            enable_validation: true,
            ..dialog_config()
        };
        for profile in [&WPF, &UWP, &MAUI] {
            let vm = try_assemble(DialogViewModelAssembler, &order(), &config, profile).unwrap();
            assert!(duplicate_members(&vm.text).is_empty(), "{:?}: {:?}", profile.platform, duplicate_members(&vm.text));
            assert!(vm.text.contains("private string ValidateProperty(string columnName)"));
            assert!(!vm.text.contains("public string this["));
            assert!(braces_balanced(&vm.text));
        }

        let uwp = try_assemble(DialogViewModelAssembler, &order(), &config, &UWP).unwrap().text;
        assert!(uwp.contains("private readonly Order _sourceItem;"));
        assert!(uwp.contains("private string _item = string.Empty;"));
        assert!(uwp.contains("_sourceItem.Item = Item;"));
        assert!(uwp.contains("return _sourceItem;"));

        let wpf = try_assemble(DialogViewModelAssembler, &order(), &config, &WPF).unwrap().text;
        assert!(wpf.contains("private readonly Order _item;"));
        assert!(wpf.contains("private string item = string.Empty;"));
    }

    #[test]
    fn test_completion_property_is_rejected() {
        let schema = order().with_property("Completion", "string");
        for profile in [&WPF, &UWP, &MAUI] {
            let err = try_assemble(DialogViewModelAssembler, &schema, &dialog_config(), profile).unwrap_err();
            assert!(
                matches!(err, CodegenError::Generation(GenerationError::InvalidSchema(ref message)) if message.contains("'Completion'")),
                "{}",
                err
            );
        }
    }
}
