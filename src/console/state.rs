//! View-model state and the snapshot handed to front ends

use serde_json::Value;

use model_console_api::{FieldKind, ListQuery, ModelDescriptor, Record, RecordPage};

use super::draft::{Draft, EditMode};
use crate::table::{self, Pagination};
use crate::widget::{widget_for, Widget, WidgetValue};

/// Identity of an in-flight page load.
///
/// A response is applied only while the state epoch it was issued under is
/// still current.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub epoch: u64,
    pub model: String,
    pub skip: usize,
    pub take: usize,
    pub reset: bool,
}

impl PageRequest {
    pub fn query(&self) -> ListQuery {
        ListQuery::new(&self.model, self.skip, self.take)
    }
}

/// Result of a page load that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLoad {
    /// The response replaced the displayed page
    Applied,
    /// The selection or window changed while the request was in flight
    Stale,
}

#[derive(Debug)]
pub(crate) struct ConsoleState {
    pub models: Vec<ModelDescriptor>,
    pub connected: bool,
    pub selected_model: Option<String>,
    pub page: RecordPage,
    pub skip: usize,
    pub take: usize,
    pub epoch: u64,
    pub draft: Draft,
    pub mode: EditMode,
    pub last_error: Option<String>,
}

impl ConsoleState {
    pub fn new(take: usize) -> Self {
        Self {
            models: Vec::new(),
            connected: false,
            selected_model: None,
            page: RecordPage::default(),
            skip: 0,
            take,
            epoch: 0,
            draft: Draft::new(),
            mode: EditMode::Creating,
            last_error: None,
        }
    }

    pub fn model(&self, name: &str) -> Option<&ModelDescriptor> {
        self.models.iter().find(|m| m.name == name)
    }

    pub fn selected_descriptor(&self) -> Option<&ModelDescriptor> {
        self.selected_model.as_deref().and_then(|name| self.model(name))
    }

    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.skip, self.take, self.page.total)
    }

    pub fn cancel_edit(&mut self) {
        self.mode = EditMode::Creating;
        self.draft.clear();
    }

    /// Record the window a load is about to request. Changing the model,
    /// `take`, or the offset starts a new epoch. A reset load targets offset
    /// zero; the stored offset follows once its response is applied.
    pub fn begin_request(&mut self, model: &str, skip: usize, take: usize, reset: bool) -> PageRequest {
        let target_skip = if reset { 0 } else { skip };
        let model_changed = self.selected_model.as_deref() != Some(model);
        let changed = model_changed || self.take != take || self.skip != target_skip;

        if model_changed {
            self.cancel_edit();
        }
        if changed {
            self.selected_model = Some(model.to_string());
            self.take = take;
            if !reset {
                self.skip = skip;
            }
            self.epoch += 1;
        }

        PageRequest {
            epoch: self.epoch,
            model: model.to_string(),
            skip: target_skip,
            take,
            reset,
        }
    }

    pub fn is_current(&self, request: &PageRequest) -> bool {
        request.epoch == self.epoch
    }

    pub fn apply_page(&mut self, request: &PageRequest, page: RecordPage) {
        self.page = page;
        if request.reset {
            self.skip = 0;
        }
    }

    /// Store a fresh model list. The first model becomes the selection when
    /// nothing is selected or the selected model is no longer listed.
    pub fn set_models(&mut self, models: Vec<ModelDescriptor>) {
        let listed = self
            .selected_model
            .as_deref()
            .map_or(false, |name| models.iter().any(|m| m.name == name));

        if !listed {
            if self.selected_model.is_some() {
                self.cancel_edit();
                self.page = RecordPage::default();
                self.skip = 0;
            }
            self.selected_model = models.first().map(|m| m.name.clone());
            self.epoch += 1;
        }
        self.models = models;
    }

    /// Kind of an editable field, or `None` when the field is not on the form
    pub fn form_field_kind(&self, name: &str) -> Option<FieldKind> {
        if name == self.page.id_field_name {
            return None;
        }
        let descriptor = self.selected_descriptor();
        let on_page = self.page.scalar_fields.iter().any(|f| f == name);
        let declared = descriptor.and_then(|m| m.field(name)).is_some();

        (on_page || declared).then(|| {
            descriptor
                .map(|m| m.kind_of(name))
                .unwrap_or(FieldKind::String)
        })
    }

    fn form_fields(&self) -> Vec<FormField> {
        let descriptor = self.selected_descriptor();
        self.page
            .scalar_fields
            .iter()
            .filter(|f| **f != self.page.id_field_name)
            .map(|name| {
                let kind = descriptor
                    .map(|m| m.kind_of(name))
                    .unwrap_or(FieldKind::String);
                let widget = widget_for(&kind);
                FormField {
                    value: widget.display(self.draft.get(name)),
                    name: name.clone(),
                    kind,
                    widget,
                }
            })
            .collect()
    }

    pub fn view(&self, saving: bool) -> ConsoleView {
        ConsoleView {
            connected: self.connected,
            models: self.models.iter().map(|m| m.name.clone()).collect(),
            selected_model: self.selected_model.clone(),
            columns: table::columns(&self.page.id_field_name, &self.page.scalar_fields),
            rows: self.page.items.clone(),
            id_field_name: self.page.id_field_name.clone(),
            pagination: self.pagination(),
            form_title: self.mode.title(),
            form_fields: self.form_fields(),
            mode: self.mode.clone(),
            draft: self.draft.clone(),
            last_error: self.last_error.clone(),
            saving,
        }
    }
}

/// One input on the create/edit form
#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub name: String,
    pub kind: FieldKind,
    pub widget: Widget,
    pub value: WidgetValue,
}

/// Snapshot of everything an authenticated console displays
#[derive(Debug, Clone, PartialEq)]
pub struct ConsoleView {
    pub connected: bool,
    pub models: Vec<String>,
    pub selected_model: Option<String>,
    pub columns: Vec<String>,
    pub rows: Vec<Record>,
    pub id_field_name: String,
    pub pagination: Pagination,
    pub form_title: String,
    pub form_fields: Vec<FormField>,
    pub mode: EditMode,
    pub draft: Draft,
    pub last_error: Option<String>,
    pub saving: bool,
}

impl ConsoleView {
    /// Id value of a displayed row
    pub fn row_id<'a>(&self, row: &'a Record) -> Option<&'a Value> {
        row.get(&self.id_field_name)
    }
}

/// What the console shows
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    /// No token: only the login form
    Login,
    Console(Box<ConsoleView>),
}
