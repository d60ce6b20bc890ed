//! End-to-end generation through the orchestrator.

use proptest::prelude::*;
use xamlgen_codegen::verify::{braces_balanced, dangling_bindings, duplicate_members, markup_well_formed};
use xamlgen_codegen::{ArtifactKind, Catalog, GenerationRequest, NoProvider, Orchestrator, Platform};
use xamlgen_core::{
    CommandMode, Diagnostic, GenerationConfig, GenerationError, MethodDescriptor, ModelSchema, PersistenceKind,
};

fn product() -> ModelSchema {
    ModelSchema::new("Product", "Shop.Models")
        .with_property("Id", "int")
        .with_property("Title", "string")
        .with_property("InStock", "bool")
}

fn catalog(schema: ModelSchema) -> Catalog {
    Catalog {
        project: Some("Shop".into()),
        classes: vec![schema],
        contexts: Vec::new(),
    }
}

fn full_crud(persistence: PersistenceKind) -> GenerationConfig {
    GenerationConfig {
        generate_view_model: true,
        use_data_binding: true,
        persistence,
        enable_add: true,
        enable_edit: true,
        enable_delete: true,
        use_dialog: true,
        ..Default::default()
    }
}

#[test]
fn test_product_with_file_persistence_and_dialogs() {
    let catalog = catalog(product());
    let orchestrator = Orchestrator::new(&catalog, &NoProvider, &NoProvider).unwrap();
    let request = GenerationRequest {
        config: full_crud(PersistenceKind::File),
        platform: Platform::Wpf,
        project: catalog.project.clone(),
    };
    let set = orchestrator.generate("Product", &request).unwrap();

    assert_eq!(
        set.kinds(),
        [
            ArtifactKind::View,
            ArtifactKind::ViewModel,
            ArtifactKind::DialogView,
            ArtifactKind::DialogViewModel,
        ]
    );
    assert_eq!(
        set.diagnostics,
        [Diagnostic::DataFileNotFound {
            model: "Product".into(),
            default_path: "Product.json".into(),
        }]
    );

    let vm = &set.get(ArtifactKind::ViewModel).unwrap().text;
    for command in ["AddCommand", "EditCommand", "DeleteCommand", "SaveCommand"] {
        let declaration = format!("public IRelayCommand {} {{ get; }}", command);
        assert_eq!(vm.matches(&declaration).count(), 1, "{}", command);
    }
    assert!(vm.contains("private ObservableCollection<Product> items = new();"));
    assert!(vm.contains("private readonly string _dataFilePath = \"Product.json\";"));
    assert!(vm.contains("LoadItems();"));
    assert!(vm.contains("item.Id = Items.Any() ? Items.Max(p => p.Id) + 1 : 1;"));
    assert!(braces_balanced(vm));

    let view = &set.get(ArtifactKind::View).unwrap().text;
    assert_eq!(view.matches("<DataGridTextColumn ").count(), 2);
    assert_eq!(view.matches("<DataGridCheckBoxColumn ").count(), 1);
    for (label, command) in [("Add", "AddCommand"), ("Edit", "EditCommand"), ("Delete", "DeleteCommand")] {
        let button = format!("<Button Content=\"{}\" Command=\"{{Binding {}}}\"", label, command);
        assert!(view.contains(&button), "{}", label);
    }
    assert!(markup_well_formed(view));

    let dialog_vm = &set.get(ArtifactKind::DialogViewModel).unwrap().text;
    assert!(dialog_vm.contains("public DialogProductViewModel(Product item, string title)"));
    assert!(braces_balanced(dialog_vm));
    assert!(markup_well_formed(&set.get(ArtifactKind::DialogView).unwrap().text));
}

#[test]
fn test_no_persistence_renders_stubs() {
    let catalog = catalog(product());
    let orchestrator = Orchestrator::new(&catalog, &NoProvider, &NoProvider).unwrap();
    let request = GenerationRequest {
        config: full_crud(PersistenceKind::None),
        ..Default::default()
    };
    let set = orchestrator.generate("Product", &request).unwrap();
    assert!(set.diagnostics.is_empty());

    let vm = &set.get(ArtifactKind::ViewModel).unwrap().text;
    assert!(vm.contains(
        "throw new NotSupportedException(\"Loading items is not supported: no persistence is configured.\");"
    ));
    assert!(vm.contains(
        "throw new NotSupportedException(\"Saving items is not supported: no persistence is configured.\");"
    ));
    assert!(!vm.contains("LoadItems();"));
    assert!(!vm.contains("SaveChanges();"));
    for command in ["AddCommand", "EditCommand", "DeleteCommand", "SaveCommand"] {
        assert!(vm.contains(&format!("public IRelayCommand {} {{ get; }}", command)));
    }
    assert!(vm.contains("private void LoadItems()"));
    assert!(vm.contains("private void SaveChanges()"));
    assert!(braces_balanced(vm));
}

#[test]
fn test_context_persistence_from_catalog() {
    let json = r#"{
        "project": "Shop",
        "classes": [
            { "name": "Product", "namespace": "Shop.Models", "properties": [
                { "name": "Id", "type": "int" },
                { "name": "Title", "type": "string" }
            ] }
        ],
        "contexts": [
            { "name": "ShopContext", "namespace": "Shop.Data",
              "base_types": ["DbContext"],
              "collections": [ { "name": "Products", "type": "DbSet<Product>" } ] }
        ]
    }"#;
    let catalog = Catalog::from_json(json).unwrap();
    let orchestrator = Orchestrator::new(&catalog, &catalog, &NoProvider).unwrap();
    let request = GenerationRequest {
        config: GenerationConfig {
            persistence: PersistenceKind::Context,
            ..Default::default()
        },
        platform: Platform::Maui,
        project: catalog.project.clone(),
    };
    let set = orchestrator.generate("Product", &request).unwrap();
    assert!(set.diagnostics.is_empty());

    let vm = &set.get(ArtifactKind::ViewModel).unwrap().text;
    assert!(vm.contains("using Shop.Data;"));
    assert!(vm.contains("private readonly ShopContext _context = new();"));
    assert!(vm.contains("_context.Products.ToList()"));
}

#[test]
fn test_async_modal_idioms() {
    let catalog = catalog(product());
    let orchestrator = Orchestrator::new(&catalog, &NoProvider, &NoProvider).unwrap();
    for platform in [Platform::Uwp, Platform::Maui] {
        let request = GenerationRequest {
            config: full_crud(PersistenceKind::None),
            platform,
            project: None,
        };
        let set = orchestrator.generate("Product", &request).unwrap();
        let vm = &set.get(ArtifactKind::ViewModel).unwrap().text;
        assert!(vm.contains("private async void EditItem()"), "{}", platform);
        assert!(vm.contains("private async void DeleteItem()"), "{}", platform);
        assert!(braces_balanced(vm), "{}", platform);
    }
}

#[test]
fn test_legacy_mode_forwards_methods() {
    let schema = product().with_method(MethodDescriptor::new("Restock").with_parameter("amount", "int"));
    let catalog = catalog(schema);
    let orchestrator = Orchestrator::new(&catalog, &NoProvider, &NoProvider).unwrap();
    let request = GenerationRequest {
        config: GenerationConfig {
            command_mode: CommandMode::Legacy,
            ..Default::default()
        },
        ..Default::default()
    };
    let set = orchestrator.generate("Product", &request).unwrap();
    assert_eq!(set.kinds(), [ArtifactKind::View, ArtifactKind::ViewModel]);
    assert!(set.diagnostics.is_empty());

    let vm = &set.get(ArtifactKind::ViewModel).unwrap().text;
    assert!(vm.contains("public IRelayCommand RestockCommand { get; }"));
    assert!(vm.contains("private bool CanExecuteRestock() => _model != null;"));
    assert!(braces_balanced(vm));
    let view = &set.get(ArtifactKind::View).unwrap().text;
    assert!(view.contains("Command=\"{Binding RestockCommand}\""));
}

#[test]
fn test_view_only() {
    let catalog = catalog(product());
    let orchestrator = Orchestrator::new(&catalog, &NoProvider, &NoProvider).unwrap();
    let request = GenerationRequest {
        config: GenerationConfig {
            generate_view_model: false,
            ..Default::default()
        },
        ..Default::default()
    };
    let set = orchestrator.generate("Product", &request).unwrap();
    let view = set.get(ArtifactKind::View).unwrap();
    assert!(!view.text.contains("{Binding"));
    assert!(view.text.contains("x:Name=\"TitleField\""));
    let code_behind = &view.code_behind.as_ref().unwrap().text;
    assert!(!code_behind.contains("DataContext"));
}

#[test]
fn test_dialog_members_never_clash_with_properties() {
    let schema = ModelSchema::new("Order", "Shop.Models")
        .with_property("Id", "int")
        .with_property("Item", "string")
        .with_property("Quantity", "int");
    let catalog = catalog(schema);
    let orchestrator = Orchestrator::new(&catalog, &NoProvider, &NoProvider).unwrap();
    for platform in Platform::ALL {
        let request = GenerationRequest {
            config: GenerationConfig {
                enable_validation: true,
                ..full_crud(PersistenceKind::File)
            },
            platform,
            project: None,
        };
        let set = orchestrator.generate("Order", &request).unwrap();
        assert!(
            !set.diagnostics.iter().any(|d| matches!(d, Diagnostic::DuplicateMember { .. })),
            "{:?}: {:?}",
            platform,
            set.diagnostics
        );
        let dialog = set.get(ArtifactKind::DialogViewModel).unwrap();
        assert!(duplicate_members(&dialog.text).is_empty());
    }
}

#[test]
fn test_reserved_dialog_member_is_rejected() {
    let schema = ModelSchema::new("Order", "Shop.Models")
        .with_property("Id", "int")
        .with_property("Completion", "string");
    let catalog = catalog(schema);
    let orchestrator = Orchestrator::new(&catalog, &NoProvider, &NoProvider).unwrap();
    for platform in Platform::ALL {
        let request = GenerationRequest {
            config: full_crud(PersistenceKind::None),
            platform,
            project: None,
        };
        let err = orchestrator.generate("Order", &request).unwrap_err();
        assert!(matches!(err, GenerationError::InvalidSchema(ref message) if message.contains("'Completion'")), "{}", err);
    }

    // Without dialogs nothing hosts the property, so the same schema is fine.
    let request = GenerationRequest {
        config: GenerationConfig {
            use_dialog: false,
            ..full_crud(PersistenceKind::None)
        },
        platform: Platform::Maui,
        project: None,
    };
    assert!(orchestrator.generate("Order", &request).is_ok());
}

const PROPERTY_TYPES: &[&str] = &["int", "string", "bool", "DateTime", "decimal?", "int?", "double", "Guid"];

fn schema_strategy() -> impl Strategy<Value = ModelSchema> {
    prop::collection::btree_map("[A-Z][a-z]{2,8}", prop::sample::select(PROPERTY_TYPES), 1..6).prop_map(
        |properties| {
            properties
                .into_iter()
                .fold(ModelSchema::new("Widget", "Plant.Models"), |schema, (name, ty)| {
                    schema.with_property(name, ty)
                })
        },
    )
}

fn config_strategy() -> impl Strategy<Value = GenerationConfig> {
    (
        any::<bool>(),
        any::<bool>(),
        prop::sample::select(vec![PersistenceKind::None, PersistenceKind::File, PersistenceKind::Context]),
        any::<[bool; 3]>(),
        any::<bool>(),
        any::<bool>(),
        prop::sample::select(vec![CommandMode::Crud, CommandMode::Legacy]),
    )
        .prop_map(
            |(generate_view_model, use_data_binding, persistence, [add, edit, delete], use_dialog, validation, mode)| {
                GenerationConfig {
                    generate_view_model,
                    use_data_binding,
                    persistence,
                    enable_add: add,
                    enable_edit: edit,
                    enable_delete: delete,
                    use_dialog,
                    enable_validation: validation,
                    command_mode: mode,
                    ..Default::default()
                }
            },
        )
}

proptest! {
    #[test]
    fn prop_generation_is_idempotent(
        schema in schema_strategy(),
        config in config_strategy(),
        platform in prop::sample::select(Platform::ALL.to_vec()),
    ) {
        let catalog = catalog(schema.clone());
        let orchestrator = Orchestrator::new(&catalog, &NoProvider, &NoProvider).unwrap();
        let request = GenerationRequest { config, platform, project: None };
        let first = orchestrator.generate_for_schema(&schema, &request).unwrap();
        let second = orchestrator.generate_for_schema(&schema, &request).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_no_dangling_bindings(
        schema in schema_strategy(),
        config in config_strategy(),
        platform in prop::sample::select(Platform::ALL.to_vec()),
    ) {
        let catalog = catalog(schema.clone());
        let orchestrator = Orchestrator::new(&catalog, &NoProvider, &NoProvider).unwrap();
        let request = GenerationRequest { config, platform, project: None };
        let set = orchestrator.generate_for_schema(&schema, &request).unwrap();

        let dangling: Vec<_> = set
            .diagnostics
            .iter()
            .filter(|d| matches!(d, Diagnostic::DanglingBinding { .. }))
            .collect();
        prop_assert!(dangling.is_empty(), "{:?}", dangling);
        let duplicates: Vec<_> = set
            .diagnostics
            .iter()
            .filter(|d| matches!(d, Diagnostic::DuplicateMember { .. }))
            .collect();
        prop_assert!(duplicates.is_empty(), "{:?}", duplicates);

        let item_members: Vec<&str> = schema.properties.iter().map(|p| p.name()).collect();
        if let (Some(view), Some(vm)) = (set.get(ArtifactKind::View), set.get(ArtifactKind::ViewModel)) {
            prop_assert!(dangling_bindings(&view.text, &vm.text, &item_members).is_empty());
        }
        for artifact in &set.artifacts {
            if artifact.path.extension().and_then(|e| e.to_str()) == Some("xaml") {
                prop_assert!(markup_well_formed(&artifact.text), "{}", artifact.path.display());
            } else {
                prop_assert!(braces_balanced(&artifact.text), "{}", artifact.path.display());
            }
            if let Some(code_behind) = &artifact.code_behind {
                prop_assert!(braces_balanced(&code_behind.text));
            }
        }
    }
}
