//! Property-to-control mapping.
//!
//! One dispatch table, [`ControlKind::for_type`], decides which control a
//! property gets. Form controls and list columns both go through it, so the
//! mapping only ever changes in one place.

use crate::markup::Element;
use crate::platform::{ListStyle, PlatformProfile};
use convert_case::{Case, Casing};
use xamlgen_core::PropertyDescriptor;

const DATE_TYPES: &[&str] = &["DateTime", "DateTimeOffset", "DateOnly"];

const NUMERIC_TYPES: &[&str] = &[
    "byte", "Byte", "sbyte", "SByte", "short", "Int16", "ushort", "UInt16", "int", "Int32",
    "uint", "UInt32", "long", "Int64", "ulong", "UInt64", "float", "Single", "double", "Double",
    "decimal", "Decimal",
];

/// UI control category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlKind {
    Toggle,
    Date,
    Numeric,
    Text,
}

impl ControlKind {
    /// Control kind for a canonical type name. Total: unknown types get a text input.
    pub fn for_type(canonical: &str) -> Self {
        if matches!(canonical, "bool" | "Boolean") {
            ControlKind::Toggle
        } else if DATE_TYPES.contains(&canonical) {
            ControlKind::Date
        } else if NUMERIC_TYPES.contains(&canonical) {
            ControlKind::Numeric
        } else {
            ControlKind::Text
        }
    }

    pub fn is_numeric_type(canonical: &str) -> bool {
        NUMERIC_TYPES.contains(&canonical)
    }

    pub fn is_integral_type(canonical: &str) -> bool {
        matches!(
            canonical,
            "byte" | "Byte" | "sbyte" | "SByte" | "short" | "Int16" | "ushort" | "UInt16" | "int"
                | "Int32" | "uint" | "UInt32" | "long" | "Int64" | "ulong" | "UInt64"
        )
    }
}

/// Binding mode for a rendered control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindMode {
    /// No binding; the control gets an `x:Name`.
    Unbound,
    OneWay,
    TwoWay,
}

/// Human-readable label for a property name (`InStock` becomes `In Stock`).
pub fn label_text(property: &str) -> String {
    property.to_case(Case::Title)
}

/// Renders controls for one platform profile.
#[derive(Debug, Clone, Copy)]
pub struct ControlMapper<'p> {
    profile: &'p PlatformProfile,
    validation: bool,
}

impl<'p> ControlMapper<'p> {
    pub fn new(profile: &'p PlatformProfile, validation: bool) -> Self {
        Self { profile, validation }
    }

    /// Binding expression for a property path.
    pub fn binding(&self, property: &PropertyDescriptor, mode: BindMode) -> Option<String> {
        let mut parts = vec![property.name().to_string()];
        match mode {
            BindMode::Unbound => return None,
            BindMode::OneWay => parts.push("Mode=OneWay".to_string()),
            BindMode::TwoWay => {
                parts.push("Mode=TwoWay".to_string());
                if self.profile.binding.update_trigger {
                    parts.push("UpdateSourceTrigger=PropertyChanged".to_string());
                }
                if self.validation && self.profile.binding.validation {
                    parts.push("ValidatesOnDataErrors=True".to_string());
                    parts.push("NotifyOnValidationError=True".to_string());
                }
            }
        }
        // An empty string only converts back for text-edited values.
        let text_edited = matches!(
            ControlKind::for_type(property.canonical_type()),
            ControlKind::Text | ControlKind::Numeric
        );
        if text_edited && property.resolved().is_nullable_value_type() {
            parts.push("TargetNullValue=''".to_string());
        }
        Some(format!("{{Binding {}}}", parts.join(", ")))
    }

    /// Input control for a form.
    pub fn build_control(&self, property: &PropertyDescriptor, mode: BindMode) -> Element {
        let profile = self.profile;
        let kind = ControlKind::for_type(property.canonical_type());
        let binding = self.binding(property, mode);

        let (element, value_attribute) = match kind {
            ControlKind::Toggle => (
                Element::new(profile.toggle_element),
                profile.toggle_property,
            ),
            ControlKind::Date => (
                Element::new(profile.date_element).attrs(profile.date_attributes),
                profile.date_property,
            ),
            ControlKind::Numeric => (
                Element::new(profile.text_input).attr_opt(profile.numeric_hint),
                "Text",
            ),
            ControlKind::Text => (Element::new(profile.text_input), "Text"),
        };

        match binding {
            None => element.attr("x:Name", format!("{}Field", property.name())),
            Some(binding) => {
                let element = element.attr(value_attribute, binding);
                match (mode, kind) {
                    (BindMode::OneWay, ControlKind::Text | ControlKind::Numeric) => {
                        element.attr("IsReadOnly", "True")
                    }
                    (BindMode::OneWay, _) => element.attr("IsEnabled", "False"),
                    _ => element,
                }
            }
        }
    }

    /// Label followed by the input control.
    pub fn build_field(&self, property: &PropertyDescriptor, mode: BindMode) -> [Element; 2] {
        [
            Element::new(self.profile.label_element).attr("Text", label_text(property.name())),
            self.build_control(property, mode),
        ]
    }

    /// Column or cell presenting the property inside the item list.
    pub fn build_column(&self, property: &PropertyDescriptor, mode: BindMode) -> Element {
        let profile = self.profile;
        let kind = ControlKind::for_type(property.canonical_type());
        let header = label_text(property.name());
        let binding = self
            .binding(property, mode)
            .unwrap_or_else(|| format!("{{Binding {}}}", property.name()));

        if profile.list == ListStyle::DataGrid {
            let column = match kind {
                ControlKind::Toggle => "DataGridCheckBoxColumn",
                _ => "DataGridTextColumn",
            };
            return Element::new(column)
                .attr("Header", header)
                .attr("Binding", binding);
        }

        let cell = match (mode, kind) {
            (BindMode::TwoWay, _) => self.build_control(property, mode),
            (_, ControlKind::Toggle) => Element::new(profile.toggle_element)
                .attr(profile.toggle_property, binding)
                .attr("IsEnabled", "False"),
            _ => Element::new(profile.label_element).attr("Text", binding),
        };

        if profile.cell_headers {
            Element::new(profile.form_container)
                .attr(profile.width_attribute, "150")
                .child(
                    Element::new(profile.label_element)
                        .attr("Text", header)
                        .attr("FontSize", "12")
                        .attr("TextColor", "Gray"),
                )
                .child(cell)
        } else {
            cell.attr(profile.width_attribute, "150")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{MAUI, UWP, WPF};
    use proptest::prelude::*;

    fn prop(name: &str, ty: &str) -> PropertyDescriptor {
        PropertyDescriptor::new(name, ty)
    }

    #[test]
    fn test_dispatch_priority() {
        assert_eq!(ControlKind::for_type("bool"), ControlKind::Toggle);
        assert_eq!(ControlKind::for_type("Boolean"), ControlKind::Toggle);
        assert_eq!(ControlKind::for_type("DateTime"), ControlKind::Date);
        assert_eq!(ControlKind::for_type("decimal"), ControlKind::Numeric);
        assert_eq!(ControlKind::for_type("string"), ControlKind::Text);
        assert_eq!(ControlKind::for_type("Guid"), ControlKind::Text);
    }

    #[test]
    fn test_wpf_two_way_text() {
        let mapper = ControlMapper::new(&WPF, false);
        let text = mapper.build_control(&prop("Title", "string"), BindMode::TwoWay).render().text();
        assert_eq!(
            text,
            "<TextBox Text=\"{Binding Title, Mode=TwoWay, UpdateSourceTrigger=PropertyChanged}\" />\n"
        );
    }

    #[test]
    fn test_wpf_validation_attributes() {
        let mapper = ControlMapper::new(&WPF, true);
        let binding = mapper.binding(&prop("Title", "string"), BindMode::TwoWay).unwrap();
        assert!(binding.contains("ValidatesOnDataErrors=True, NotifyOnValidationError=True"));

        let maui = ControlMapper::new(&MAUI, true);
        let binding = maui.binding(&prop("Title", "string"), BindMode::TwoWay).unwrap();
        assert_eq!(binding, "{Binding Title, Mode=TwoWay}");
    }

    #[test]
    fn test_nullable_value_gets_target_null_value() {
        let mapper = ControlMapper::new(&WPF, false);
        let binding = mapper.binding(&prop("Age", "int?"), BindMode::TwoWay).unwrap();
        assert!(binding.ends_with("TargetNullValue=''}"));
    }

    #[test]
    fn test_nullable_toggle_and_date_skip_target_null_value() {
        let mapper = ControlMapper::new(&WPF, false);
        let paid = mapper.build_control(&prop("Paid", "bool?"), BindMode::TwoWay).render().text();
        assert_eq!(
            paid.trim_end(),
            "<CheckBox IsChecked=\"{Binding Paid, Mode=TwoWay, UpdateSourceTrigger=PropertyChanged}\" />"
        );

        for profile in [&WPF, &UWP, &MAUI] {
            let mapper = ControlMapper::new(profile, false);
            let due = mapper.binding(&prop("Due", "DateTime?"), BindMode::TwoWay).unwrap();
            assert!(!due.contains("TargetNullValue"), "{}", due);
            let paid = mapper.binding(&prop("Paid", "System.Nullable<bool>"), BindMode::OneWay).unwrap();
            assert!(!paid.contains("TargetNullValue"), "{}", paid);
        }
    }

    #[test]
    fn test_numeric_keyboard_hint() {
        let maui = ControlMapper::new(&MAUI, false).build_control(&prop("Qty", "int"), BindMode::TwoWay);
        assert_eq!(maui.name(), "Entry");
        assert_eq!(maui.attribute("Keyboard"), Some("Numeric"));

        let uwp = ControlMapper::new(&UWP, false).build_control(&prop("Qty", "int"), BindMode::TwoWay);
        assert_eq!(uwp.attribute("InputScope"), Some("Number"));

        let wpf = ControlMapper::new(&WPF, false).build_control(&prop("Qty", "int"), BindMode::TwoWay);
        assert_eq!(wpf.attribute("InputScope"), None);
    }

    #[test]
    fn test_date_control_per_profile() {
        let born = prop("Born", "DateTime");
        let wpf = ControlMapper::new(&WPF, false).build_control(&born, BindMode::TwoWay);
        assert_eq!(wpf.name(), "DatePicker");
        assert!(wpf.attribute("SelectedDate").is_some());
        assert_eq!(wpf.attribute("SelectedDateFormat"), Some("Short"));

        let uwp = ControlMapper::new(&UWP, false).build_control(&born, BindMode::TwoWay);
        assert_eq!(uwp.name(), "CalendarDatePicker");
        assert!(uwp.attribute("Date").is_some());
    }

    #[test]
    fn test_unbound_control_is_named() {
        let control = ControlMapper::new(&WPF, false).build_control(&prop("InStock", "bool"), BindMode::Unbound);
        assert_eq!(control.name(), "CheckBox");
        assert_eq!(control.attribute("x:Name"), Some("InStockField"));
        assert_eq!(control.attribute("IsChecked"), None);
    }

    #[test]
    fn test_one_way_is_read_only() {
        let mapper = ControlMapper::new(&WPF, false);
        let text = mapper.build_control(&prop("Title", "string"), BindMode::OneWay);
        assert_eq!(text.attribute("IsReadOnly"), Some("True"));
        let toggle = mapper.build_control(&prop("InStock", "bool"), BindMode::OneWay);
        assert_eq!(toggle.attribute("IsEnabled"), Some("False"));
    }

    #[test]
    fn test_field_label() {
        let [label, _] = ControlMapper::new(&MAUI, false).build_field(&prop("InStock", "bool"), BindMode::TwoWay);
        assert_eq!(label.name(), "Label");
        assert_eq!(label.attribute("Text"), Some("In Stock"));
    }

    #[test]
    fn test_columns() {
        let in_stock = prop("InStock", "bool");
        let wpf = ControlMapper::new(&WPF, false).build_column(&in_stock, BindMode::OneWay);
        assert_eq!(wpf.name(), "DataGridCheckBoxColumn");
        assert_eq!(wpf.attribute("Header"), Some("In Stock"));

        let uwp = ControlMapper::new(&UWP, false).build_column(&prop("Title", "string"), BindMode::OneWay);
        assert_eq!(uwp.name(), "TextBlock");
        assert_eq!(uwp.attribute("Width"), Some("150"));

        let maui = ControlMapper::new(&MAUI, false).build_column(&in_stock, BindMode::OneWay);
        assert_eq!(maui.name(), "VerticalStackLayout");
        assert_eq!(maui.child_elements()[0].attribute("Text"), Some("In Stock"));
        assert_eq!(maui.child_elements()[1].name(), "CheckBox");
    }

    proptest! {
        #[test]
        fn prop_every_type_maps_to_a_rendered_control(ty in "[A-Za-z][A-Za-z0-9.]{0,20}\\??", nullable in any::<bool>()) {
            let raw = if nullable { format!("{}?", ty.trim_end_matches('?')) } else { ty };
            let property = PropertyDescriptor::new("Value", raw);
            for profile in [&WPF, &UWP, &MAUI] {
                let mapper = ControlMapper::new(profile, true);
                for mode in [BindMode::Unbound, BindMode::OneWay, BindMode::TwoWay] {
                    let control = mapper.build_control(&property, mode);
                    prop_assert!(!control.render().text().trim().is_empty());
                    prop_assert!(!mapper.build_column(&property, mode).render().is_empty());
                }
            }
        }

        #[test]
        fn prop_exactly_one_kind(ty in "(bool|Boolean|DateTime|DateOnly|int|Int64|double|decimal|string|Guid|Customer)") {
            let kinds = [
                matches!(ty.as_str(), "bool" | "Boolean"),
                DATE_TYPES.contains(&ty.as_str()),
                NUMERIC_TYPES.contains(&ty.as_str()),
            ];
            let hits = kinds.iter().filter(|k| **k).count();
            prop_assert!(hits <= 1);
            let kind = ControlKind::for_type(&ty);
            prop_assert_eq!(hits == 0, kind == ControlKind::Text);
        }
    }
}
