//! The model console view-model
//!
//! One [`Console`] drives one session against one [`AdminApi`]. All state
//! lives behind a single lock that is never held across a network call, so
//! several operations may be in flight at once. Page loads are tagged with
//! the window they asked for and dropped if the user has moved on before
//! they complete; saves are guarded against double submission.

mod draft;
mod state;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Mutex;

use model_console_api::{AdminClient, ModelDescriptor, Record};

use crate::api::AdminApi;
use crate::config::ConsoleOptions;
use crate::error::{Error, Result};
use crate::session::{FileTokenStore, Session, TokenStore};
use crate::table::cell_text;
use crate::widget::{widget_for, WidgetValue};

pub use draft::*;
pub use state::{ConsoleView, FormField, PageLoad, PageRequest, Screen};

use state::ConsoleState;

/// Asks the user to approve a destructive action
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Outcome of a delete request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The confirmation was declined; nothing was sent
    Cancelled,
}

/// Clears the pending-save flag when a save finishes, however it finishes
struct SavingGuard<'a>(&'a AtomicBool);

impl Drop for SavingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct Console<A> {
    api: A,
    session: Mutex<Session>,
    state: Mutex<ConsoleState>,
    saving: AtomicBool,
    initial_take: usize,
}

impl Console<AdminClient> {
    /// Build an HTTP-backed console persisting its token to `options.token_file`
    pub fn from_options(options: &ConsoleOptions) -> Result<Self> {
        let store: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(&options.token_file));
        Self::with_store(options, store)
    }

    /// Build an HTTP-backed console over a caller-supplied token store
    pub fn with_store(options: &ConsoleOptions, store: Arc<dyn TokenStore>) -> Result<Self> {
        options.validate()?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = options.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder
            .build()
            .map_err(|e| Error::Api(e.into()))?;

        let api = AdminClient::new(&options.base_url, http_client)
            .with_paths(&options.introspect_path, &options.records_path)
            .with_token_header(&options.token_header);

        Ok(Console::new(api, Session::load(store)?, options.page_size))
    }
}

impl<A: AdminApi> Console<A> {
    pub fn new(api: A, session: Session, page_size: usize) -> Self {
        let take = page_size.max(1);
        Self {
            api,
            session: Mutex::new(session),
            state: Mutex::new(ConsoleState::new(take)),
            saving: AtomicBool::new(false),
            initial_take: take,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Login form without a token, the console otherwise
    pub async fn screen(&self) -> Screen {
        if self.session.lock().await.is_authenticated() {
            Screen::Console(Box::new(self.view().await))
        } else {
            Screen::Login
        }
    }

    pub async fn view(&self) -> ConsoleView {
        self.state
            .lock()
            .await
            .view(self.saving.load(Ordering::SeqCst))
    }

    pub async fn is_authenticated(&self) -> bool {
        self.session.lock().await.is_authenticated()
    }

    /// Persist and activate a token
    pub async fn save_token(&self, value: &str) -> Result<()> {
        self.session.lock().await.save_token(value)
    }

    /// Drop the token and everything loaded with it
    pub async fn sign_out(&self) -> Result<()> {
        self.session.lock().await.clear_token()?;
        *self.state.lock().await = ConsoleState::new(self.initial_take);
        Ok(())
    }

    async fn token(&self) -> Result<String> {
        self.session
            .lock()
            .await
            .token()
            .map(str::to_string)
            .ok_or(Error::Unauthenticated)
    }

    /// Store a failure in the last-error slot and hand it back
    fn fail<T>(state: &mut ConsoleState, err: Error) -> Result<T> {
        tracing::warn!(error = %err, "admin request failed");
        state.last_error = Some(err.to_string());
        Err(err)
    }

    /// Fetch model descriptors; selects the first model if none is selected
    pub async fn load_models(&self) -> Result<Vec<ModelDescriptor>> {
        let token = self.token().await?;
        let result = self.api.introspect(&token).await;

        let mut state = self.state.lock().await;
        match result {
            Ok(models) => {
                tracing::debug!(count = models.len(), "models loaded");
                state.last_error = None;
                state.set_models(models.clone());
                Ok(models)
            }
            Err(e) => Self::fail(&mut state, e),
        }
    }

    /// Test the connection by loading the models, then load the first page
    /// of the selected model
    pub async fn connect(&self) -> Result<()> {
        if let Err(e) = self.load_models().await {
            self.state.lock().await.connected = false;
            return Err(e);
        }

        let selected = {
            let mut state = self.state.lock().await;
            state.connected = true;
            state.selected_model.clone()
        };
        if selected.is_some() {
            self.reload(true).await?;
        }
        Ok(())
    }

    /// Load `take` records of `model` starting at `skip`.
    ///
    /// With `reset` the request starts at zero and the stored offset is reset
    /// once the response is applied.
    pub async fn load_page(&self, model: &str, skip: usize, take: usize, reset: bool) -> Result<PageLoad> {
        let token = self.token().await?;

        let request = {
            let mut state = self.state.lock().await;
            if state.model(model).is_none() {
                return Err(Error::invalid(format!("unknown model: {}", model)));
            }
            if take == 0 {
                return Err(Error::invalid("take must be greater than zero"));
            }
            state.begin_request(model, skip, take, reset)
        };

        tracing::debug!(model, skip = request.skip, take, reset, "loading page");
        let result = self.api.list_records(&token, &request.query()).await;

        let mut state = self.state.lock().await;
        if !state.is_current(&request) {
            tracing::debug!(model, skip = request.skip, take, "discarding stale page");
            return Ok(PageLoad::Stale);
        }
        match result {
            Ok(page) => {
                state.apply_page(&request, page);
                state.last_error = None;
                Ok(PageLoad::Applied)
            }
            Err(e) => Self::fail(&mut state, e),
        }
    }

    async fn current_window(&self) -> Result<(String, usize, usize, usize)> {
        let state = self.state.lock().await;
        let model = state
            .selected_model
            .clone()
            .ok_or_else(|| Error::invalid("no model selected"))?;
        Ok((model, state.skip, state.take, state.page.total))
    }

    /// Reload the selected model at the current window
    pub async fn reload(&self, reset: bool) -> Result<PageLoad> {
        let (model, skip, take, _) = self.current_window().await?;
        self.load_page(&model, skip, take, reset).await
    }

    pub async fn refresh(&self) -> Result<PageLoad> {
        self.reload(true).await
    }

    /// Switch to another model and show its first page
    pub async fn select_model(&self, name: &str) -> Result<PageLoad> {
        let take = self.state.lock().await.take;
        self.load_page(name, 0, take, true).await
    }

    pub async fn set_page_size(&self, take: usize) -> Result<PageLoad> {
        let (model, skip, _, _) = self.current_window().await?;
        self.load_page(&model, skip, take, true).await
    }

    pub async fn next_page(&self) -> Result<PageLoad> {
        let (model, skip, take, total) = self.current_window().await?;
        let next = crate::table::Pagination::new(skip, take, total)
            .next_skip()
            .ok_or_else(|| Error::invalid("already on the last page"))?;
        self.load_page(&model, next, take, false).await
    }

    pub async fn previous_page(&self) -> Result<PageLoad> {
        let (model, skip, take, total) = self.current_window().await?;
        let previous = crate::table::Pagination::new(skip, take, total)
            .previous_skip()
            .ok_or_else(|| Error::invalid("already on the first page"))?;
        self.load_page(&model, previous, take, false).await
    }

    /// Start editing `record`, seeding the draft from its scalar fields
    pub async fn start_edit(&self, record: &Record) -> Result<()> {
        let mut state = self.state.lock().await;
        let id_field = state.page.id_field_name.clone();
        let id = record
            .get(&id_field)
            .cloned()
            .ok_or_else(|| Error::invalid(format!("record has no {} field", id_field)))?;

        state.draft = seed_draft(record, &id_field, &state.page.scalar_fields);
        state.mode = EditMode::Editing(id);
        Ok(())
    }

    /// Abandon the edit and go back to creating
    pub async fn cancel_edit(&self) {
        self.state.lock().await.cancel_edit();
    }

    /// Put user input for one form field into the draft
    pub async fn set_field(&self, name: &str, input: WidgetValue) -> Result<()> {
        let mut state = self.state.lock().await;
        let kind = state
            .form_field_kind(name)
            .ok_or_else(|| Error::invalid(format!("{} is not an editable field", name)))?;
        let value = widget_for(&kind).accept(input)?;
        state.draft.insert(name.to_string(), value);
        Ok(())
    }

    /// Create or update from the draft.
    ///
    /// On success the draft is cleared, the form returns to creating and the
    /// first page is reloaded. On failure the draft and mode are kept.
    pub async fn save(&self) -> Result<Value> {
        if self
            .saving
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(Error::SaveInProgress);
        }
        let _guard = SavingGuard(&self.saving);

        let token = self.token().await?;
        let (model, mode, draft) = {
            let state = self.state.lock().await;
            let model = state
                .selected_model
                .clone()
                .ok_or_else(|| Error::invalid("no model selected"))?;
            (model, state.mode.clone(), state.draft.clone())
        };

        let result = match &mode {
            EditMode::Creating => self.api.create_record(&token, &model, &draft).await,
            EditMode::Editing(id) => self.api.update_record(&token, &model, id, &draft).await,
        };

        let saved = {
            let mut state = self.state.lock().await;
            match result {
                Ok(saved) => {
                    tracing::info!(model = %model, editing = mode.is_editing(), "record saved");
                    state.last_error = None;
                    state.cancel_edit();
                    saved
                }
                Err(e) => return Self::fail(&mut state, e),
            }
        };

        self.reload(true).await?;
        Ok(saved)
    }

    /// Delete `record` once `confirm` approves; reloads the current page
    /// without resetting the offset
    pub async fn delete<C: Confirm + ?Sized>(&self, record: &Record, confirm: &C) -> Result<DeleteOutcome> {
        let token = self.token().await?;
        let (model, id) = {
            let state = self.state.lock().await;
            let model = state
                .selected_model
                .clone()
                .ok_or_else(|| Error::invalid("no model selected"))?;
            let id_field = &state.page.id_field_name;
            let id = record
                .get(id_field)
                .cloned()
                .ok_or_else(|| Error::invalid(format!("record has no {} field", id_field)))?;
            (model, id)
        };

        let prompt = format!("Delete {} record {}?", model, cell_text(Some(&id)));
        if !confirm.confirm(&prompt) {
            return Ok(DeleteOutcome::Cancelled);
        }

        let result = self.api.delete_record(&token, &model, &id).await;
        {
            let mut state = self.state.lock().await;
            match result {
                Ok(_) => {
                    tracing::info!(model = %model, id = %cell_text(Some(&id)), "record deleted");
                    state.last_error = None;
                }
                Err(e) => return Self::fail(&mut state, e),
            }
        }

        self.reload(false).await?;
        Ok(DeleteOutcome::Deleted)
    }
}
