//! View-model property rendering.

use crate::fragment::{Fragment, FragmentKind};
use crate::platform::{PlatformProfile, PropertyStyle};
use xamlgen_core::{PropertyDescriptor, ResolvedType};

/// Renders observable properties in the profile's idiom.
///
/// Explicit getters return the backing field as declared. A nullable value
/// type comes back as `null` when unset rather than being coalesced to a
/// default, so a view can tell "empty" from zero; only the setter's
/// equality guard looks at `HasValue`.
#[derive(Debug, Clone, Copy)]
pub struct PropertyRenderer<'p> {
    profile: &'p PlatformProfile,
}

/// One property to render.
#[derive(Debug, Clone)]
pub struct PropertySpec<'a> {
    pub name: &'a str,
    /// Declared type, including any nullable marker.
    pub source_type: String,
    pub resolved: ResolvedType,
    /// Field initializer expression; defaults are chosen when absent.
    pub initializer: Option<String>,
    /// Statements to run after the value changes.
    pub on_changed: Vec<String>,
}

impl<'a> PropertySpec<'a> {
    pub fn from_descriptor(property: &'a PropertyDescriptor) -> Self {
        Self {
            name: property.name(),
            source_type: property.source_type(),
            resolved: property.resolved().clone(),
            initializer: None,
            on_changed: Vec::new(),
        }
    }

    /// Property of an arbitrary type, resolved from its declaration.
    pub fn declared(name: &'a str, source_type: &str) -> Self {
        Self {
            name,
            source_type: source_type.to_string(),
            resolved: xamlgen_core::resolve_type(source_type),
            initializer: None,
            on_changed: Vec::new(),
        }
    }

    pub fn initialized(mut self, expression: impl Into<String>) -> Self {
        self.initializer = Some(expression.into());
        self
    }

    pub fn on_changed(mut self, statements: Vec<String>) -> Self {
        self.on_changed = statements;
        self
    }
}

impl<'p> PropertyRenderer<'p> {
    pub fn new(profile: &'p PlatformProfile) -> Self {
        Self { profile }
    }

    /// Render a schema property.
    pub fn build_property(&self, property: &PropertyDescriptor) -> Fragment {
        self.build(&PropertySpec::from_descriptor(property))
    }

    /// Render a backing field plus its observable property.
    pub fn build(&self, spec: &PropertySpec<'_>) -> Fragment {
        match self.profile.property_style {
            PropertyStyle::Synthesized => self.build_synthesized(spec),
            PropertyStyle::ExplicitNotify => self.build_explicit(spec),
        }
    }

    /// Change-notification plumbing the class needs, if any.
    pub fn notification_support(&self) -> Fragment {
        let mut fragment = Fragment::new(FragmentKind::Method);
        if self.profile.property_style == PropertyStyle::ExplicitNotify {
            fragment.push("public event PropertyChangedEventHandler? PropertyChanged;");
            fragment.push_blank();
            fragment.append_block(
                "protected void OnPropertyChanged([CallerMemberName] string? propertyName = null)",
                &Fragment::body([
                    "PropertyChanged?.Invoke(this, new PropertyChangedEventArgs(propertyName));",
                ]),
            );
        }
        fragment
    }

    fn field_declaration(&self, spec: &PropertySpec<'_>) -> String {
        let field = self.profile.field_name(spec.name);
        match spec.initializer.clone().or_else(|| default_initializer(&spec.resolved)) {
            Some(init) => format!("private {} {} = {};", spec.source_type, field, init),
            None => format!("private {} {};", spec.source_type, field),
        }
    }

    fn build_synthesized(&self, spec: &PropertySpec<'_>) -> Fragment {
        let mut fragment = Fragment::new(FragmentKind::Property);
        fragment.push("[ObservableProperty]");
        fragment.push(self.field_declaration(spec));

        if !spec.on_changed.is_empty() {
            fragment.push_blank();
            fragment.append_block(
                format!("partial void On{}Changed({} value)", spec.name, spec.source_type),
                &Fragment::body(spec.on_changed.iter().cloned()),
            );
        }
        fragment
    }

    fn build_explicit(&self, spec: &PropertySpec<'_>) -> Fragment {
        let field = self.profile.field_name(spec.name);

        let mut setter = Fragment::new(FragmentKind::Body);
        setter.append_block(
            format!("if ({})", equality_guard(&field, &spec.source_type, &spec.resolved)),
            &Fragment::body(["return;"]),
        );
        setter.push_blank();
        setter.push(format!("{} = value;", field));
        setter.push("OnPropertyChanged();");
        for statement in &spec.on_changed {
            setter.push(statement.clone());
        }

        let mut accessors = Fragment::new(FragmentKind::Body);
        accessors.push(format!("get => {};", field));
        accessors.append_block("set", &setter);

        let mut fragment = Fragment::new(FragmentKind::Property);
        fragment.push(self.field_declaration(spec));
        fragment.append_block(format!("public {} {}", spec.source_type, spec.name), &accessors);
        fragment
    }
}

/// Condition that is true when `value` equals the current field value.
///
/// Nullable value types compare presence first and only read `.Value`
/// when both sides have one.
fn equality_guard(field: &str, source_type: &str, resolved: &ResolvedType) -> String {
    if resolved.is_nullable_value_type() {
        format!(
            "{f}.HasValue == value.HasValue && (!value.HasValue || {f}.Value.Equals(value.Value))",
            f = field
        )
    } else if resolved.value_type {
        format!("{} == value", field)
    } else {
        format!("EqualityComparer<{}>.Default.Equals({}, value)", source_type, field)
    }
}

fn default_initializer(resolved: &ResolvedType) -> Option<String> {
    if resolved.nullable || resolved.value_type {
        None
    } else if matches!(resolved.canonical.as_str(), "string" | "String") {
        Some("string.Empty".to_string())
    } else {
        Some("default!".to_string())
    }
}
