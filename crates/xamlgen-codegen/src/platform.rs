//! Platform profiles.
//!
//! Each supported UI platform is described by one static [`PlatformProfile`]
//! record. Renderers read element names, idioms and directive sets from the
//! profile instead of branching on the platform themselves.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;
use xamlgen_core::Diagnostic;

/// Target UI platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Baseline profile.
    #[default]
    Wpf,
    Uwp,
    Maui,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Wpf, Platform::Uwp, Platform::Maui];

    pub fn profile(self) -> &'static PlatformProfile {
        match self {
            Platform::Wpf => &WPF,
            Platform::Uwp => &UWP,
            Platform::Maui => &MAUI,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.profile().display_name)
    }
}

/// How the main view arranges its action bar above the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutStyle {
    /// A grid with an `Auto` row for actions and a `*` row for the list.
    GridRows,
    /// A vertical stack; no row definitions.
    Stack,
}

/// List presentation for the item collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListStyle {
    /// Column-based grid with typed columns.
    DataGrid,
    /// Templated list with one cell per property.
    Templated,
}

/// How view-model properties raise change notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyStyle {
    /// `[ObservableProperty]` fields expanded by a source generator.
    Synthesized,
    /// Explicit accessors calling `OnPropertyChanged`.
    ExplicitNotify,
}

/// Backing-field naming convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldNaming {
    /// `title`; C# keywords get an underscore (`_class`).
    Camel,
    /// `_title`.
    UnderscoreCamel,
}

/// How a command's can-execute state is refreshed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanExecuteRefresh {
    /// `EditCommand.NotifyCanExecuteChanged();`
    Direct,
    /// `(EditCommand as IRelayCommand)?.NotifyCanExecuteChanged();`
    CastRelay,
    /// `(EditCommand as Command)?.ChangeCanExecute();`
    CastCommand,
}

/// Modal dialog idiom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalIdiom {
    /// Synchronous `ShowDialog()` on a window.
    BlockingWindow,
    /// Awaited `ShowAsync()` on a content dialog.
    ContentDialog,
    /// Page pushed with `PushModalAsync`, completion awaited on the view-model.
    ModalPage,
}

impl ModalIdiom {
    pub fn is_async(self) -> bool {
        !matches!(self, ModalIdiom::BlockingWindow)
    }
}

/// Binding attributes the platform's binding engine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindingDialect {
    /// Supports `UpdateSourceTrigger=PropertyChanged`.
    pub update_trigger: bool,
    /// Supports `ValidatesOnDataErrors` and `NotifyOnValidationError`.
    pub validation: bool,
}

/// Target-specific rendering constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformProfile {
    pub platform: Platform,
    pub display_name: &'static str,

    // Markup
    pub root_element: &'static str,
    pub dialog_root_element: &'static str,
    /// Root attributes for the dialog document.
    pub dialog_attributes: &'static [(&'static str, &'static str)],
    /// The dialog form carries its own Save and Cancel buttons.
    pub dialog_buttons: bool,
    pub default_button_attributes: &'static [(&'static str, &'static str)],
    pub cancel_button_attributes: &'static [(&'static str, &'static str)],
    /// `xmlns` declarations as (prefix, uri); an empty prefix is the default namespace.
    pub xml_namespaces: &'static [(&'static str, &'static str)],
    /// Prefix for mapping a CLR namespace to an XML namespace.
    pub local_namespace_scheme: &'static str,
    /// Root attributes sized for a top-level window.
    pub window_attributes: &'static [(&'static str, &'static str)],
    /// Root element takes a `Title`.
    pub titled_root: bool,
    pub layout: LayoutStyle,
    pub layout_container: &'static str,
    /// Spacing attributes for the outermost layout and form containers.
    pub layout_attributes: &'static [(&'static str, &'static str)],
    pub form_container: &'static str,
    pub action_bar: &'static str,
    pub action_bar_attributes: &'static [(&'static str, &'static str)],
    pub list: ListStyle,
    pub list_element: &'static str,
    pub list_attributes: &'static [(&'static str, &'static str)],
    /// Templated list cells carry their own header label.
    pub cell_headers: bool,
    pub label_element: &'static str,
    pub text_input: &'static str,
    pub toggle_element: &'static str,
    pub toggle_property: &'static str,
    pub date_element: &'static str,
    pub date_property: &'static str,
    pub date_attributes: &'static [(&'static str, &'static str)],
    pub numeric_hint: Option<(&'static str, &'static str)>,
    pub button_text_attribute: &'static str,
    pub width_attribute: &'static str,
    pub binding: BindingDialect,

    // Source
    pub data_context_property: &'static str,
    pub command_type: &'static str,
    pub command_class: &'static str,
    pub parameterized_command_class: &'static str,
    pub can_execute_refresh: CanExecuteRefresh,
    pub property_style: PropertyStyle,
    pub field_naming: FieldNaming,
    pub view_model_usings: &'static [&'static str],
    pub code_behind_usings: &'static [&'static str],
    pub modal: ModalIdiom,
    /// Statement that closes the active dialog from its view-model.
    pub dialog_close: Option<&'static str>,

    pub markup_extension: &'static str,
    pub source_extension: &'static str,
}

const WPF_NAMESPACES: &[(&str, &str)] = &[
    ("", "http://schemas.microsoft.com/winfx/2006/xaml/presentation"),
    ("x", "http://schemas.microsoft.com/winfx/2006/xaml"),
    ("d", "http://schemas.microsoft.com/expression/blend/2008"),
    ("mc", "http://schemas.openxmlformats.org/markup-compatibility/2006"),
];

pub static WPF: PlatformProfile = PlatformProfile {
    platform: Platform::Wpf,
    display_name: "WPF",
    root_element: "Window",
    dialog_root_element: "Window",
    dialog_attributes: &[
        ("SizeToContent", "WidthAndHeight"),
        ("WindowStartupLocation", "CenterOwner"),
        ("ResizeMode", "NoResize"),
    ],
    dialog_buttons: true,
    default_button_attributes: &[("IsDefault", "True")],
    cancel_button_attributes: &[("IsCancel", "True")],
    xml_namespaces: WPF_NAMESPACES,
    local_namespace_scheme: "clr-namespace:",
    window_attributes: &[("Height", "450"), ("Width", "800")],
    titled_root: true,
    layout: LayoutStyle::GridRows,
    layout_container: "Grid",
    layout_attributes: &[("Margin", "10")],
    form_container: "StackPanel",
    action_bar: "StackPanel",
    action_bar_attributes: &[("Orientation", "Horizontal"), ("Margin", "0,0,0,10")],
    list: ListStyle::DataGrid,
    list_element: "DataGrid",
    list_attributes: &[("AutoGenerateColumns", "False")],
    cell_headers: false,
    label_element: "TextBlock",
    text_input: "TextBox",
    toggle_element: "CheckBox",
    toggle_property: "IsChecked",
    date_element: "DatePicker",
    date_property: "SelectedDate",
    date_attributes: &[("SelectedDateFormat", "Short")],
    numeric_hint: None,
    button_text_attribute: "Content",
    width_attribute: "Width",
    binding: BindingDialect {
        update_trigger: true,
        validation: true,
    },
    data_context_property: "DataContext",
    command_type: "IRelayCommand",
    command_class: "RelayCommand",
    parameterized_command_class: "RelayCommand<object?>",
    can_execute_refresh: CanExecuteRefresh::Direct,
    property_style: PropertyStyle::Synthesized,
    field_naming: FieldNaming::Camel,
    view_model_usings: &[
        "System",
        "System.Collections.Generic",
        "System.Collections.ObjectModel",
        "System.Linq",
        "System.Threading.Tasks",
        "System.Windows",
        "CommunityToolkit.Mvvm.ComponentModel",
        "CommunityToolkit.Mvvm.Input",
    ],
    code_behind_usings: &["System.Windows"],
    modal: ModalIdiom::BlockingWindow,
    dialog_close: Some(
        "Application.Current.Windows.OfType<Window>().FirstOrDefault(w => w.DataContext == this)?.Close();",
    ),
    markup_extension: "xaml",
    source_extension: "cs",
};

pub static UWP: PlatformProfile = PlatformProfile {
    platform: Platform::Uwp,
    display_name: "UWP",
    root_element: "Page",
    dialog_root_element: "ContentDialog",
    dialog_attributes: &[
        ("PrimaryButtonText", "Save"),
        ("SecondaryButtonText", "Cancel"),
        ("PrimaryButtonCommand", "{Binding SaveCommand}"),
        ("SecondaryButtonCommand", "{Binding CancelCommand}"),
    ],
    dialog_buttons: false,
    default_button_attributes: &[],
    cancel_button_attributes: &[],
    xml_namespaces: WPF_NAMESPACES,
    local_namespace_scheme: "using:",
    window_attributes: &[],
    titled_root: false,
    layout: LayoutStyle::GridRows,
    layout_container: "Grid",
    layout_attributes: &[("Margin", "10")],
    form_container: "StackPanel",
    action_bar: "StackPanel",
    action_bar_attributes: &[("Orientation", "Horizontal"), ("Margin", "0,0,0,10")],
    list: ListStyle::Templated,
    list_element: "ListView",
    list_attributes: &[],
    cell_headers: false,
    label_element: "TextBlock",
    text_input: "TextBox",
    toggle_element: "CheckBox",
    toggle_property: "IsChecked",
    date_element: "CalendarDatePicker",
    date_property: "Date",
    date_attributes: &[],
    numeric_hint: Some(("InputScope", "Number")),
    button_text_attribute: "Content",
    width_attribute: "Width",
    binding: BindingDialect {
        update_trigger: true,
        validation: false,
    },
    data_context_property: "DataContext",
    command_type: "ICommand",
    command_class: "RelayCommand",
    parameterized_command_class: "RelayCommand<object?>",
    can_execute_refresh: CanExecuteRefresh::CastRelay,
    property_style: PropertyStyle::ExplicitNotify,
    field_naming: FieldNaming::UnderscoreCamel,
    view_model_usings: &[
        "System",
        "System.Collections.Generic",
        "System.Collections.ObjectModel",
        "System.ComponentModel",
        "System.Linq",
        "System.Runtime.CompilerServices",
        "System.Threading.Tasks",
        "System.Windows.Input",
        "Windows.UI.Xaml.Controls",
        "CommunityToolkit.Mvvm.Input",
    ],
    code_behind_usings: &["Windows.UI.Xaml.Controls"],
    modal: ModalIdiom::ContentDialog,
    dialog_close: None,
    markup_extension: "xaml",
    source_extension: "cs",
};

pub static MAUI: PlatformProfile = PlatformProfile {
    platform: Platform::Maui,
    display_name: "MAUI",
    root_element: "ContentPage",
    dialog_root_element: "ContentPage",
    dialog_attributes: &[],
    dialog_buttons: true,
    default_button_attributes: &[],
    cancel_button_attributes: &[],
    xml_namespaces: &[
        ("", "http://schemas.microsoft.com/dotnet/2021/maui"),
        ("x", "http://schemas.microsoft.com/winfx/2009/xaml"),
    ],
    local_namespace_scheme: "clr-namespace:",
    window_attributes: &[],
    titled_root: true,
    layout: LayoutStyle::Stack,
    layout_container: "VerticalStackLayout",
    layout_attributes: &[("Padding", "10"), ("Spacing", "10")],
    form_container: "VerticalStackLayout",
    action_bar: "HorizontalStackLayout",
    action_bar_attributes: &[("Spacing", "10")],
    list: ListStyle::Templated,
    list_element: "CollectionView",
    list_attributes: &[("SelectionMode", "Single")],
    cell_headers: true,
    label_element: "Label",
    text_input: "Entry",
    toggle_element: "CheckBox",
    toggle_property: "IsChecked",
    date_element: "DatePicker",
    date_property: "Date",
    date_attributes: &[],
    numeric_hint: Some(("Keyboard", "Numeric")),
    button_text_attribute: "Text",
    width_attribute: "WidthRequest",
    binding: BindingDialect {
        update_trigger: false,
        validation: false,
    },
    data_context_property: "BindingContext",
    command_type: "ICommand",
    command_class: "Command",
    parameterized_command_class: "Command",
    can_execute_refresh: CanExecuteRefresh::CastCommand,
    property_style: PropertyStyle::ExplicitNotify,
    field_naming: FieldNaming::UnderscoreCamel,
    view_model_usings: &[
        "System",
        "System.Collections.Generic",
        "System.Collections.ObjectModel",
        "System.ComponentModel",
        "System.Linq",
        "System.Runtime.CompilerServices",
        "System.Threading.Tasks",
        "System.Windows.Input",
        "Microsoft.Maui.Controls",
    ],
    code_behind_usings: &["Microsoft.Maui.Controls"],
    modal: ModalIdiom::ModalPage,
    dialog_close: Some("_ = Shell.Current.Navigation.PopModalAsync();"),
    markup_extension: "xaml",
    source_extension: "cs",
};

const CSHARP_KEYWORDS: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked",
    "class", "const", "continue", "decimal", "default", "delegate", "do", "double", "else",
    "enum", "event", "explicit", "extern", "false", "finally", "fixed", "float", "for",
    "foreach", "goto", "if", "implicit", "in", "int", "interface", "internal", "is", "lock",
    "long", "namespace", "new", "null", "object", "operator", "out", "override", "params",
    "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed", "short",
    "sizeof", "stackalloc", "static", "string", "struct", "switch", "this", "throw", "true",
    "try", "typeof", "uint", "ulong", "unchecked", "unsafe", "ushort", "using", "virtual",
    "void", "volatile", "while",
];

impl PlatformProfile {
    /// Backing field name for a property.
    pub fn field_name(&self, property: &str) -> String {
        let camel = lower_first(property);
        match self.field_naming {
            FieldNaming::UnderscoreCamel => format!("_{}", camel),
            FieldNaming::Camel if CSHARP_KEYWORDS.contains(&camel.as_str()) => format!("_{}", camel),
            FieldNaming::Camel => camel,
        }
    }

    /// Statement refreshing a command's can-execute state.
    pub fn refresh_statement(&self, command: &str) -> String {
        match self.can_execute_refresh {
            CanExecuteRefresh::Direct => format!("{}.NotifyCanExecuteChanged();", command),
            CanExecuteRefresh::CastRelay => {
                format!("({} as IRelayCommand)?.NotifyCanExecuteChanged();", command)
            }
            CanExecuteRefresh::CastCommand => format!("({} as Command)?.ChangeCanExecute();", command),
        }
    }

    /// `xmlns` value mapping a CLR namespace.
    pub fn local_namespace(&self, namespace: &str) -> String {
        format!("{}{}", self.local_namespace_scheme, namespace)
    }

    /// Whether the markup-compatibility namespace is declared, enabling `mc:Ignorable`.
    pub fn declares_design_namespaces(&self) -> bool {
        self.xml_namespaces.iter().any(|(prefix, _)| *prefix == "mc")
    }

    /// Class the view-model derives from or implements for change notification.
    pub fn view_model_base(&self) -> &'static str {
        match self.property_style {
            PropertyStyle::Synthesized => "ObservableObject",
            PropertyStyle::ExplicitNotify => "INotifyPropertyChanged",
        }
    }
}

fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Project metadata used for platform detection.
#[derive(Debug, Clone, Default)]
pub struct ProjectMetadata {
    /// Project-kind GUIDs, braces included.
    pub type_guids: Vec<String>,
    /// Contents of the project build file.
    pub build_file: String,
}

const WPF_PROJECT_GUID: &str = "{60DC8134-EBA5-43B8-BCC9-BB4BC16C2548}";
const UWP_PROJECT_GUID: &str = "{A5A43C5B-DE2A-4C0C-9213-0A381AF9435A}";

/// Detect the platform from project metadata.
///
/// Falls back to WPF with a [`Diagnostic::PlatformNotDetected`] when no
/// marker matches.
pub fn detect_platform(project: &ProjectMetadata) -> (Platform, Option<Diagnostic>) {
    let guids: Vec<String> = project
        .type_guids
        .iter()
        .map(|g| g.to_ascii_uppercase())
        .chain(extract_type_guids(&project.build_file))
        .collect();

    if guids.iter().any(|g| g.contains(WPF_PROJECT_GUID)) {
        return (Platform::Wpf, None);
    }
    if guids.iter().any(|g| g.contains(UWP_PROJECT_GUID)) {
        return (Platform::Uwp, None);
    }

    let build = &project.build_file;
    if build.contains("Microsoft.Maui") || build.contains("UseMaui>true") {
        return (Platform::Maui, None);
    }
    if build.contains("<UseWPF>true</UseWPF>") {
        return (Platform::Wpf, None);
    }
    if build.contains("<TargetPlatformIdentifier>UAP</TargetPlatformIdentifier>")
        || build.contains("Microsoft.NETCore.UniversalWindowsPlatform")
    {
        return (Platform::Uwp, None);
    }

    let fallback = Platform::default();
    (
        fallback,
        Some(Diagnostic::PlatformNotDetected {
            fallback: fallback.to_string(),
        }),
    )
}

static TYPE_GUIDS: OnceLock<Regex> = OnceLock::new();
static GUID: OnceLock<Regex> = OnceLock::new();

fn type_guids_regex() -> &'static Regex {
    TYPE_GUIDS.get_or_init(|| {
        Regex::new(r"(?s)<ProjectTypeGuids>(.*?)</ProjectTypeGuids>").expect("project type guids regex")
    })
}

fn guid_regex() -> &'static Regex {
    GUID.get_or_init(|| {
        Regex::new(r"\{?[0-9A-Fa-f]{8}(?:-[0-9A-Fa-f]{4}){3}-[0-9A-Fa-f]{12}\}?").expect("guid regex")
    })
}

/// GUIDs listed in every `ProjectTypeGuids` element, uppercased and braced.
fn extract_type_guids(build_file: &str) -> Vec<String> {
    type_guids_regex()
        .captures_iter(build_file)
        .flat_map(|element| {
            guid_regex()
                .find_iter(element.get(1).map_or("", |m| m.as_str()))
                .map(|guid| format!("{{{}}}", guid.as_str().trim_matches(&['{', '}'][..]).to_ascii_uppercase()))
                .collect::<Vec<_>>()
        })
        .collect()
}
