//! Add/Edit/Delete dialog flows.
//!
//! A [`DialogFlow`] is planned once per operation as a sequence of steps:
//! preparation, an optional interaction (modal dialog or confirmation
//! prompt), and the commit that runs only after confirmation. The same plan
//! drives two consumers: [`DialogFlowRenderer`] turns it into view-model
//! code in the profile's modal idiom, and [`FlowSimulator`] executes it
//! against in-memory records so its guarantees can be checked directly.
//!
//! Every interaction walks `Idle -> DialogOpen -> {Confirmed, Cancelled} -> Idle`.

use crate::controls::ControlKind;
use crate::fragment::{Fragment, FragmentKind};
use crate::platform::{ModalIdiom, PlatformProfile};
use crate::policy::FeaturePolicy;
use indexmap::IndexMap;
use serde_json::Value;
use thiserror::Error;
use xamlgen_core::ModelSchema;

/// Operation a flow implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowOperation {
    Add,
    Edit,
    Delete,
}

impl FlowOperation {
    pub const ALL: [FlowOperation; 3] = [FlowOperation::Add, FlowOperation::Edit, FlowOperation::Delete];

    pub fn handler(self) -> &'static str {
        match self {
            FlowOperation::Add => "AddItem",
            FlowOperation::Edit => "EditItem",
            FlowOperation::Delete => "DeleteItem",
        }
    }
}

/// Interaction state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowState {
    Idle,
    DialogOpen,
    Confirmed,
    Cancelled,
}

/// Input driving a state transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowEvent {
    Open,
    Confirm,
    Cancel,
    Finish,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    #[error("Cannot apply {event:?} in state {state:?}")]
    InvalidTransition { state: FlowState, event: FlowEvent },
}

impl FlowState {
    pub fn on(self, event: FlowEvent) -> Result<FlowState, FlowError> {
        match (self, event) {
            (FlowState::Idle, FlowEvent::Open) => Ok(FlowState::DialogOpen),
            (FlowState::DialogOpen, FlowEvent::Confirm) => Ok(FlowState::Confirmed),
            (FlowState::DialogOpen, FlowEvent::Cancel) => Ok(FlowState::Cancelled),
            (FlowState::Confirmed | FlowState::Cancelled, FlowEvent::Finish) => Ok(FlowState::Idle),
            (state, event) => Err(FlowError::InvalidTransition { state, event }),
        }
    }
}

/// User interaction between preparation and commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    /// Commit runs immediately.
    None,
    /// Modal dialog editing a working item.
    Dialog,
    /// Yes/no confirmation prompt.
    Prompt,
}

/// One step of a flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowStep {
    /// Stop unless an item is selected.
    RequireSelection,
    /// Create a fresh working item.
    SeedFresh,
    /// Copy the selection field by field into a working item.
    CopySelection,
    /// Take the dialog's result: the working item for Add, copied onto the selection for Edit.
    CopyBack,
    /// Give the working item the next identity value.
    AssignId,
    Insert,
    /// Select the inserted item.
    SelectNew,
    Remove,
    /// Notify that the collection contents changed.
    Refresh,
    Save,
}

/// Planned flow for one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogFlow {
    pub operation: FlowOperation,
    pub prepare: Vec<FlowStep>,
    pub interaction: Interaction,
    pub commit: Vec<FlowStep>,
}

impl DialogFlow {
    /// Plan a flow.
    ///
    /// `persistent` controls whether the commit ends by saving.
    pub fn plan(operation: FlowOperation, schema: &ModelSchema, use_dialog: bool, persistent: bool) -> Self {
        use FlowStep::*;

        let assign_id = has_identity(schema);
        let (prepare, interaction, mut commit) = match (operation, use_dialog) {
            (FlowOperation::Add, true) => (vec![SeedFresh], Interaction::Dialog, vec![CopyBack, AssignId, Insert]),
            (FlowOperation::Add, false) => (vec![SeedFresh], Interaction::None, vec![AssignId, Insert, SelectNew]),
            (FlowOperation::Edit, true) => (
                vec![RequireSelection, CopySelection],
                Interaction::Dialog,
                vec![CopyBack, Refresh],
            ),
            (FlowOperation::Edit, false) => (vec![RequireSelection], Interaction::None, vec![Refresh]),
            (FlowOperation::Delete, true) => (vec![RequireSelection], Interaction::Prompt, vec![Remove]),
            (FlowOperation::Delete, false) => (vec![RequireSelection], Interaction::None, vec![Remove]),
        };

        if !assign_id {
            commit.retain(|step| *step != AssignId);
        }
        if persistent {
            commit.push(Save);
        }

        Self {
            operation,
            prepare,
            interaction,
            commit,
        }
    }

    pub fn steps(&self) -> impl Iterator<Item = &FlowStep> {
        self.prepare.iter().chain(&self.commit)
    }
}

/// Whether the schema has a non-nullable integral `Id` to assign on insert.
pub fn has_identity(schema: &ModelSchema) -> bool {
    schema
        .property("Id")
        .map_or(false, |p| !p.is_nullable() && ControlKind::is_integral_type(p.canonical_type()))
}

/// An in-memory item: property name to value.
pub type Record = IndexMap<String, Value>;

/// What the user does when the interaction is shown.
#[derive(Debug, Clone, PartialEq)]
pub enum DialogResponse {
    /// Apply these edits to the working item, then confirm.
    Confirm(Record),
    /// Apply these edits to the working item, then cancel.
    Cancel(Record),
}

/// Executes flows against in-memory records.
#[derive(Debug, Clone)]
pub struct FlowSimulator<'s> {
    schema: &'s ModelSchema,
    pub items: Vec<Record>,
    pub selected: Option<usize>,
    pub saves: usize,
    /// States visited during the last run.
    pub history: Vec<FlowState>,
}

impl<'s> FlowSimulator<'s> {
    pub fn new(schema: &'s ModelSchema, items: Vec<Record>) -> Self {
        Self {
            schema,
            items,
            selected: None,
            saves: 0,
            history: Vec::new(),
        }
    }

    pub fn select(&mut self, index: usize) {
        self.selected = (index < self.items.len()).then_some(index);
    }

    /// Run a flow. Returns the final state, which is always `Idle`.
    pub fn run(&mut self, flow: &DialogFlow, response: DialogResponse) -> Result<FlowState, FlowError> {
        let mut state = FlowState::Idle;
        self.history = vec![state];
        let mut working: Option<Record> = None;

        for step in &flow.prepare {
            match step {
                FlowStep::RequireSelection if self.selected.is_none() => return Ok(state),
                FlowStep::SeedFresh => working = Some(self.fresh_record()),
                FlowStep::CopySelection => {
                    working = self.selected.map(|i| self.items[i].clone());
                }
                _ => {}
            }
        }

        if flow.interaction != Interaction::None {
            state = self.advance(state, FlowEvent::Open)?;
            let (edits, event) = match response {
                DialogResponse::Confirm(edits) => (edits, FlowEvent::Confirm),
                DialogResponse::Cancel(edits) => (edits, FlowEvent::Cancel),
            };
            if flow.interaction == Interaction::Dialog {
                if let Some(item) = working.as_mut() {
                    for (name, value) in edits {
                        if item.contains_key(&name) {
                            item.insert(name, value);
                        }
                    }
                }
            }
            state = self.advance(state, event)?;
            if state == FlowState::Cancelled {
                return self.advance(state, FlowEvent::Finish);
            }
        }

        for step in &flow.commit {
            self.commit_step(*step, flow.operation, &mut working);
        }

        if state == FlowState::Confirmed {
            state = self.advance(state, FlowEvent::Finish)?;
        }
        Ok(state)
    }

    fn advance(&mut self, state: FlowState, event: FlowEvent) -> Result<FlowState, FlowError> {
        let next = state.on(event)?;
        self.history.push(next);
        Ok(next)
    }

    fn commit_step(&mut self, step: FlowStep, operation: FlowOperation, working: &mut Option<Record>) {
        match step {
            FlowStep::CopyBack if operation == FlowOperation::Edit => {
                if let (Some(index), Some(result)) = (self.selected, working.as_ref()) {
                    for property in &self.schema.properties {
                        if let Some(value) = result.get(property.name()) {
                            self.items[index].insert(property.name().to_string(), value.clone());
                        }
                    }
                }
            }
            FlowStep::AssignId => {
                let next = self
                    .items
                    .iter()
                    .filter_map(|r| r.get("Id").and_then(Value::as_i64))
                    .max()
                    .map_or(1, |max| max + 1);
                if let Some(item) = working.as_mut() {
                    item.insert("Id".to_string(), Value::from(next));
                }
            }
            FlowStep::Insert => {
                if let Some(item) = working.take() {
                    self.items.push(item);
                    *working = self.items.last().cloned();
                }
            }
            FlowStep::SelectNew => self.selected = self.items.len().checked_sub(1),
            FlowStep::Remove => {
                if let Some(index) = self.selected.take() {
                    self.items.remove(index);
                }
            }
            FlowStep::Save => self.saves += 1,
            _ => {}
        }
    }

    fn fresh_record(&self) -> Record {
        self.schema
            .properties
            .iter()
            .map(|p| {
                let value = if p.is_nullable() {
                    Value::Null
                } else {
                    match ControlKind::for_type(p.canonical_type()) {
                        ControlKind::Toggle => Value::Bool(false),
                        ControlKind::Numeric => Value::from(0),
                        ControlKind::Text if matches!(p.canonical_type(), "string" | "String") => {
                            Value::String(String::new())
                        }
                        _ => Value::Null,
                    }
                };
                (p.name().to_string(), value)
            })
            .collect()
    }
}

/// Renders flows as view-model methods.
#[derive(Debug, Clone, Copy)]
pub struct DialogFlowRenderer<'a> {
    profile: &'a PlatformProfile,
    schema: &'a ModelSchema,
}

impl<'a> DialogFlowRenderer<'a> {
    pub fn new(profile: &'a PlatformProfile, schema: &'a ModelSchema) -> Self {
        Self { profile, schema }
    }

    /// Whether the rendered method awaits a dialog.
    pub fn is_async(&self, flow: &DialogFlow) -> bool {
        flow.interaction != Interaction::None && self.profile.modal.is_async()
    }

    /// The handler method for a flow, or its stub under a disabled policy.
    pub fn render_method(&self, flow: &DialogFlow, policy: &FeaturePolicy) -> Fragment {
        let asynchronous = policy.is_enabled() && self.is_async(flow);
        let signature = format!(
            "private {}void {}()",
            if asynchronous { "async " } else { "" },
            flow.operation.handler()
        );
        let body = policy.render(|| self.render_body(flow));

        let mut method = Fragment::new(FragmentKind::Method);
        method.append_block(signature, &body);
        method
    }

    /// Method body for a flow.
    pub fn render_body(&self, flow: &DialogFlow) -> Fragment {
        let mut body = Fragment::new(FragmentKind::Body);
        for step in &flow.prepare {
            body.append(&self.render_step(*step, flow.operation));
        }

        let mut commit = Fragment::new(FragmentKind::Body);
        for step in &flow.commit {
            commit.append(&self.render_step(*step, flow.operation));
        }

        match flow.interaction {
            Interaction::None => body.append(&commit),
            Interaction::Dialog => {
                body.append(&self.open_dialog(flow.operation));
                body.push_blank();
                body.append_block("if (dialogViewModel.IsSaved)", &commit);
            }
            Interaction::Prompt => {
                body.append(&self.confirm_prompt());
                body.push_blank();
                body.append(&commit);
            }
        }
        body
    }

    fn model(&self) -> &str {
        &self.schema.name
    }

    fn render_step(&self, step: FlowStep, operation: FlowOperation) -> Fragment {
        let model = self.model();
        match step {
            FlowStep::RequireSelection => {
                let mut f = Fragment::body(["var selected = SelectedItem;"]);
                f.append_block("if (selected == null)", &Fragment::body(["return;"]));
                f.push_blank();
                f
            }
            FlowStep::SeedFresh => Fragment::body([format!("var item = new {}();", model)]),
            FlowStep::CopySelection => {
                let assignments = Fragment::body(
                    self.schema
                        .properties
                        .iter()
                        .map(|p| format!("{0} = selected.{0},", p.name())),
                );
                let mut f = Fragment::body([format!("var itemCopy = new {}", model)]);
                f.push("{");
                f.append_indented(&assignments, 1);
                f.push("};");
                f
            }
            FlowStep::CopyBack => match operation {
                FlowOperation::Edit => {
                    let mut f = Fragment::body(["var result = dialogViewModel.GetItem();"]);
                    for property in &self.schema.properties {
                        f.push(format!("selected.{0} = result.{0};", property.name()));
                    }
                    f
                }
                _ => Fragment::body(["item = dialogViewModel.GetItem();"]),
            },
            FlowStep::AssignId => {
                Fragment::body(["item.Id = Items.Any() ? Items.Max(p => p.Id) + 1 : 1;"])
            }
            FlowStep::Insert => Fragment::body(["Items.Add(item);"]),
            FlowStep::SelectNew => Fragment::body(["SelectedItem = item;"]),
            FlowStep::Remove => Fragment::body(["Items.Remove(selected);"]),
            FlowStep::Refresh => Fragment::body(["OnPropertyChanged(nameof(Items));"]),
            FlowStep::Save => Fragment::body(["SaveChanges();"]),
        }
    }

    fn open_dialog(&self, operation: FlowOperation) -> Fragment {
        let model = self.model();
        let (seed, title) = match operation {
            FlowOperation::Edit => ("itemCopy", format!("Edit {}", model)),
            _ => ("item", format!("Add {}", model)),
        };

        let mut f = Fragment::body([format!(
            "var dialogViewModel = new Dialog{}ViewModel({}, \"{}\");",
            model, seed, title
        )]);
        f.push(format!("var dialog = new Dialog{}View", model));
        f.push("{");
        if self.profile.modal == ModalIdiom::BlockingWindow {
            f.push("    Owner = Application.Current.MainWindow,");
        }
        f.push(format!("    {} = dialogViewModel,", self.profile.data_context_property));
        f.push("};");

        match self.profile.modal {
            ModalIdiom::BlockingWindow => f.push("dialog.ShowDialog();"),
            ModalIdiom::ContentDialog => f.push("await dialog.ShowAsync();"),
            ModalIdiom::ModalPage => {
                f.push("await Shell.Current.Navigation.PushModalAsync(dialog);");
                f.push("await dialogViewModel.Completion;");
            }
        }
        f
    }

    fn confirm_prompt(&self) -> Fragment {
        let question = format!("Delete the selected {}?", self.model());
        let mut f = Fragment::new(FragmentKind::Body);
        let condition = match self.profile.modal {
            ModalIdiom::BlockingWindow => format!(
                "if (MessageBox.Show(\"{}\", \"Confirm Delete\", MessageBoxButton.YesNo, MessageBoxImage.Question) != MessageBoxResult.Yes)",
                question
            ),
            ModalIdiom::ContentDialog => {
                f.push("var confirm = new ContentDialog");
                f.push("{");
                f.push("    Title = \"Confirm Delete\",");
                f.push(format!("    Content = \"{}\",", question));
                f.push("    PrimaryButtonText = \"Yes\",");
                f.push("    CloseButtonText = \"No\",");
                f.push("};");
                "if (await confirm.ShowAsync() != ContentDialogResult.Primary)".to_string()
            }
            ModalIdiom::ModalPage => format!(
                "if (!await Shell.Current.DisplayAlert(\"Confirm Delete\", \"{}\", \"Yes\", \"No\"))",
                question
            ),
        };
        f.append_block(condition, &Fragment::body(["return;"]));
        f
    }
}
