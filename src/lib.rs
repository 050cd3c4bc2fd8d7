//! Model Console
//!
//! A token-protected console for a relational schema exposed through two
//! admin endpoints: an introspection endpoint describing every model and its
//! scalar fields, and a records endpoint for paging, creating, updating and
//! deleting rows.
//!
//! The [`Console`] view-model picks a form widget for each field type, keeps
//! a paginated table of records, and turns edits into record calls.
//!
//! # Example
//!
//! ```no_run
//! use model_console::prelude::*;
//!
//! # async fn run() -> Result<(), Error> {
//! let options = ConsoleOptions::default().with_base_url("http://localhost:3000");
//! let console = ModelConsole::from_options(&options)?;
//!
//! console.save_token("my-admin-token").await?;
//! console.connect().await?;
//!
//! let view = console.view().await;
//! println!("{}", view.pagination.range_label());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod console;
pub mod error;
pub mod session;
pub mod table;
pub mod widget;

pub use model_console_api as client;

pub use crate::api::AdminApi;
pub use crate::config::ConsoleOptions;
pub use crate::console::{Confirm, Console, ConsoleView, DeleteOutcome, EditMode, PageLoad, Screen};
pub use crate::error::{Error, Result};
pub use crate::session::Session;

/// Console talking to the admin endpoints over HTTP
pub type ModelConsole = Console<model_console_api::AdminClient>;

/// A convenience module for common imports
pub mod prelude {
    pub use crate::config::ConsoleOptions;
    pub use crate::console::{Confirm, Console, ConsoleView, DeleteOutcome, EditMode, PageLoad, Screen};
    pub use crate::error::Error;
    pub use crate::widget::{Widget, WidgetValue};
    pub use crate::ModelConsole;
}
