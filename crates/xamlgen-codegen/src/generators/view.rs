//! Main view assembler.

use super::{ArtifactKind, CodeBehind, DocumentAssembler, GeneratedArtifact, GenerationContext};
use crate::commands::CrudOperation;
use crate::controls::BindMode;
use crate::error::Result;
use crate::fragment::Fragment;
use crate::markup::Element;
use crate::platform::{LayoutStyle, ListStyle};
use tracing::debug;
use xamlgen_core::CommandMode;

/// Assembles `Views/{Name}View` and its code-behind.
///
/// Three layouts exist: a list with CRUD actions, a form with one button per
/// model method (legacy mode), and an unbound form when no view-model is
/// bound.
#[derive(Debug, Clone, Copy, Default)]
pub struct ViewAssembler;

impl DocumentAssembler for ViewAssembler {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::View
    }

    fn assemble(&self, ctx: &GenerationContext<'_>) -> Result<GeneratedArtifact> {
        let class_name = format!("{}View", ctx.model());
        let content = if !ctx.config.binds_view_model() {
            self.unbound_form(ctx)
        } else {
            match ctx.config.command_mode {
                CommandMode::Crud => self.crud_layout(ctx),
                CommandMode::Legacy => self.legacy_form(ctx),
            }
        };

        let mut root = ctx.markup_root(ctx.profile.root_element, &class_name);
        if ctx.profile.titled_root {
            root = root.attr("Title", ctx.model());
        }
        let root = root.attrs(ctx.profile.window_attributes).child(content);
        debug!(model = %ctx.model(), platform = ?ctx.profile.platform, "assembled view");

        let mut body = Fragment::body(["InitializeComponent();"]);
        let mut usings = Vec::new();
        if ctx.config.binds_view_model() {
            body.push(format!(
                "{} = new {}ViewModel();",
                ctx.profile.data_context_property,
                ctx.model()
            ));
            usings.push(ctx.namespaces.view_models.as_str());
        }

        let extension = ctx.profile.markup_extension;
        let path = ctx.path("Views", &class_name, extension);
        Ok(GeneratedArtifact {
            kind: self.kind(),
            text: root.render().text(),
            code_behind: Some(CodeBehind {
                path: ctx.path(
                    "Views",
                    &class_name,
                    &format!("{}.{}", extension, ctx.profile.source_extension),
                ),
                text: ctx.code_behind(&class_name, ctx.profile.root_element, &usings, &body)?,
            }),
            path,
        })
    }
}

impl ViewAssembler {
    fn crud_layout(&self, ctx: &GenerationContext<'_>) -> Element {
        let profile = ctx.profile;
        let policies = ctx.policies();
        let buttons: Vec<Element> = CrudOperation::ALL
            .iter()
            .filter(|op| policies.shows_action(**op))
            .map(|op| action_button(ctx, op.label(), &op.command_name()))
            .collect();

        let row_mode = if ctx.config.use_dialog {
            BindMode::OneWay
        } else {
            BindMode::TwoWay
        };
        let columns = ctx
            .schema
            .properties
            .iter()
            .map(|p| ctx.controls().build_column(p, row_mode));

        let mut list = Element::new(profile.list_element)
            .attr("ItemsSource", "{Binding Items}")
            .attr("SelectedItem", "{Binding SelectedItem, Mode=TwoWay}")
            .attrs(profile.list_attributes);
        list = match profile.list {
            ListStyle::DataGrid => {
                if ctx.config.use_dialog {
                    list = list.attr("IsReadOnly", "True");
                }
                list.child(Element::new(format!("{}.Columns", profile.list_element)).children(columns))
            }
            ListStyle::Templated => {
                let row = Element::new(profile.action_bar)
                    .attrs(profile.action_bar_attributes)
                    .children(columns);
                list.child(
                    Element::new(format!("{}.ItemTemplate", profile.list_element))
                        .child(Element::new("DataTemplate").child(row)),
                )
            }
        };

        if buttons.is_empty() {
            return list;
        }
        let actions = Element::new(profile.action_bar)
            .attrs(profile.action_bar_attributes)
            .children(buttons);
        arrange(ctx, actions, list)
    }

    fn legacy_form(&self, ctx: &GenerationContext<'_>) -> Element {
        let controls = ctx.controls();
        let fields = ctx
            .schema
            .properties
            .iter()
            .flat_map(|p| controls.build_field(p, BindMode::TwoWay));
        let form = Element::new(ctx.profile.form_container).children(fields);

        let buttons: Vec<Element> = ctx
            .commands()
            .legacy_commands(ctx.schema)
            .iter()
            .map(|c| action_button(ctx, &c.method.name, &c.spec.name))
            .collect();
        if buttons.is_empty() {
            return form.attrs(ctx.profile.layout_attributes);
        }

        let actions = Element::new(ctx.profile.action_bar)
            .attrs(ctx.profile.action_bar_attributes)
            .children(buttons);
        arrange(ctx, actions, form)
    }

    fn unbound_form(&self, ctx: &GenerationContext<'_>) -> Element {
        let controls = ctx.controls();
        Element::new(ctx.profile.form_container)
            .attrs(ctx.profile.layout_attributes)
            .children(
                ctx.schema
                    .properties
                    .iter()
                    .flat_map(|p| controls.build_field(p, BindMode::Unbound)),
            )
    }
}

fn action_button(ctx: &GenerationContext<'_>, text: &str, command: &str) -> Element {
    Element::new("Button")
        .attr(ctx.profile.button_text_attribute, text)
        .attr("Command", format!("{{Binding {}}}", command))
        .attr(ctx.profile.width_attribute, "80")
}

/// Place an action bar above the main content.
fn arrange(ctx: &GenerationContext<'_>, top: Element, main: Element) -> Element {
    let profile = ctx.profile;
    let container = Element::new(profile.layout_container).attrs(profile.layout_attributes);
    match profile.layout {
        LayoutStyle::GridRows => container
            .child(
                Element::new(format!("{}.RowDefinitions", profile.layout_container))
                    .child(Element::new("RowDefinition").attr("Height", "Auto"))
                    .child(Element::new("RowDefinition").attr("Height", "*")),
            )
            .child(top.attr("Grid.Row", "0"))
            .child(main.attr("Grid.Row", "1")),
        LayoutStyle::Stack => container.child(top).child(main),
    }
}
