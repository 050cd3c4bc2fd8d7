use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::{Map, Value};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use model_console::console::{DeleteOutcome, Screen};
use model_console::table;
use model_console::widget::{widget_for, WidgetValue};
use model_console::{ConsoleOptions, ConsoleView, ModelConsole};

#[derive(Parser, Debug)]
#[command(name = "model-console", version)]
#[command(about = "Browse and edit ORM models through the admin endpoints", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Base URL of the admin application. Falls back to MODEL_CONSOLE_URL.
    #[arg(long)]
    url: Option<String>,

    /// File the admin token is persisted to. Falls back to MODEL_CONSOLE_TOKEN_FILE.
    #[arg(long)]
    token_file: Option<PathBuf>,

    /// Output debug logs to stderr
    #[arg(long)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Store the admin token (read from stdin when omitted)
    Login { token: Option<String> },
    /// Forget the stored admin token
    Logout,
    /// Test the connection and show the models found
    Status,
    /// Show every model with its fields and form widgets
    Models,
    /// List a page of records
    List {
        /// Model to list; defaults to the first model
        #[arg(long)]
        model: Option<String>,
        #[arg(long, default_value_t = 0)]
        skip: usize,
        /// Rows per page; defaults to the configured page size
        #[arg(long)]
        take: Option<usize>,
    },
    /// Create a record from name=value pairs
    Create {
        #[arg(long)]
        model: String,
        /// Field value as name=value; repeatable
        #[arg(long = "set", value_name = "NAME=VALUE")]
        fields: Vec<String>,
    },
    /// Update the given fields of a record
    Edit {
        #[arg(long)]
        model: String,
        #[arg(long)]
        id: String,
        #[arg(long = "set", value_name = "NAME=VALUE")]
        fields: Vec<String>,
    },
    /// Delete a record
    Delete {
        #[arg(long)]
        model: String,
        #[arg(long)]
        id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn options_from(cli: &Cli) -> anyhow::Result<ConsoleOptions> {
    let mut options = ConsoleOptions::from_env()?;
    if let Some(url) = &cli.url {
        options = options.with_base_url(url);
    }
    if let Some(path) = &cli.token_file {
        options = options.with_token_file(path.clone());
    }
    Ok(options)
}

/// Numbers and quoted JSON strings keep their JSON type; anything else is a
/// plain string id
fn parse_id(raw: &str) -> Value {
    match serde_json::from_str::<Value>(raw) {
        Ok(v @ (Value::Number(_) | Value::String(_))) => v,
        _ => Value::String(raw.to_string()),
    }
}

fn split_assignment(pair: &str) -> anyhow::Result<(&str, &str)> {
    pair.split_once('=')
        .ok_or_else(|| anyhow::anyhow!("expected NAME=VALUE, got {}", pair))
}

fn read_line(prompt: &str) -> anyhow::Result<String> {
    eprint!("{}", prompt);
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn confirm_on_terminal(prompt: &str) -> bool {
    matches!(
        read_line(&format!("{} [y/N] ", prompt)).as_deref(),
        Ok("y") | Ok("Y") | Ok("yes")
    )
}

fn print_table(view: &ConsoleView) {
    let rows: Vec<Vec<String>> = view
        .rows
        .iter()
        .map(|row| table::row_cells(row, &view.columns))
        .collect();

    let widths: Vec<usize> = view
        .columns
        .iter()
        .enumerate()
        .map(|(i, col)| {
            rows.iter()
                .map(|r| r[i].chars().count())
                .chain(std::iter::once(col.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<width$}", c, width = *w))
            .collect::<Vec<_>>()
            .join("  ")
    };

    println!("{}", line(view.columns.as_slice()));
    for row in &rows {
        println!("{}", line(row.as_slice()));
    }
    println!();
    println!("{}", view.pagination.range_label());
}

/// Connect and select `model`, failing loudly instead of leaving a
/// half-loaded view
async fn open_model(console: &ModelConsole, model: Option<&str>) -> anyhow::Result<()> {
    console.connect().await.context("Connection failed")?;
    if let Some(model) = model {
        console.select_model(model).await?;
    }
    Ok(())
}

async fn fill_draft(console: &ModelConsole, fields: &[String]) -> anyhow::Result<()> {
    for pair in fields {
        let (name, value) = split_assignment(pair)?;
        console
            .set_field(name, WidgetValue::Text(value.to_string()))
            .await?;
    }
    Ok(())
}

async fn require_login(console: &ModelConsole) -> anyhow::Result<()> {
    if let Screen::Login = console.screen().await {
        anyhow::bail!("Not signed in. Run `model-console login` first.");
    }
    Ok(())
}

async fn execute(console: &ModelConsole, options: &ConsoleOptions, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Login { token } => {
            let token = match token {
                Some(t) => t,
                None => read_line("Admin token: ")?,
            };
            console.save_token(&token).await?;
            println!("Token saved to {}", options.token_file.display());
        }
        Commands::Logout => {
            console.sign_out().await?;
            println!("Signed out.");
        }
        Commands::Status => {
            require_login(console).await?;
            let result = console.connect().await;
            let view = console.view().await;
            println!(
                "Status: {}",
                if view.connected { "connected" } else { "not connected" }
            );
            if let Some(error) = &view.last_error {
                println!("Error: {}", error);
            }
            result?;
            println!("Models: {}", view.models.join(", "));
        }
        Commands::Models => {
            require_login(console).await?;
            for model in console.load_models().await? {
                println!("{}", model.name);
                for field in &model.scalar_fields {
                    println!(
                        "  {:<24} {:<10} {}",
                        field.name,
                        field.kind,
                        widget_for(&field.kind).name()
                    );
                }
            }
        }
        Commands::List { model, skip, take } => {
            require_login(console).await?;
            open_model(console, model.as_deref()).await?;
            let view = console.view().await;
            let model = view
                .selected_model
                .clone()
                .ok_or_else(|| anyhow::anyhow!("No models available"))?;
            let take = take.unwrap_or(view.pagination.take);
            if skip != 0 || take != view.pagination.take {
                console.load_page(&model, skip, take, false).await?;
            }
            let view = console.view().await;
            println!("{}", model);
            print_table(&view);
        }
        Commands::Create { model, fields } => {
            require_login(console).await?;
            open_model(console, Some(model.as_str())).await?;
            fill_draft(console, &fields).await?;
            let created = console.save().await?;
            println!("Saved: {}", created);
        }
        Commands::Edit { model, id, fields } => {
            require_login(console).await?;
            open_model(console, Some(model.as_str())).await?;
            let id_field = console.view().await.id_field_name;
            let mut record = Map::new();
            record.insert(id_field, parse_id(&id));
            console.start_edit(&record).await?;
            fill_draft(console, &fields).await?;
            let updated = console.save().await?;
            println!("Updated: {}", updated);
        }
        Commands::Delete { model, id, yes } => {
            require_login(console).await?;
            open_model(console, Some(model.as_str())).await?;
            let id_field = console.view().await.id_field_name;
            let mut record = Map::new();
            record.insert(id_field, parse_id(&id));

            let outcome = if yes {
                console.delete(&record, &|_: &str| true).await?
            } else {
                console.delete(&record, &confirm_on_terminal).await?
            };
            match outcome {
                DeleteOutcome::Deleted => println!("Deleted."),
                DeleteOutcome::Cancelled => println!("Cancelled."),
            }
        }
    }

    Ok(())
}

async fn run() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let options = options_from(&cli)?;
    let console = ModelConsole::from_options(&options)?;
    execute(&console, &options, cli.command).await
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model_console::session::{MemoryTokenStore, TokenStore};
    use std::sync::Arc;

    fn offline_console(store: Arc<dyn TokenStore>) -> ModelConsole {
        let options = ConsoleOptions::default().with_base_url("http://127.0.0.1:9");
        ModelConsole::with_store(&options, store).unwrap()
    }

    #[tokio::test]
    async fn test_data_commands_need_a_token() {
        let console = offline_console(Arc::new(MemoryTokenStore::new()));
        let options = ConsoleOptions::default();

        let err = execute(&console, &options, Commands::Models).await.unwrap_err();
        assert!(err.to_string().starts_with("Not signed in"));

        let err = execute(
            &console,
            &options,
            Commands::Delete {
                model: "User".to_string(),
                id: "1".to_string(),
                yes: true,
            },
        )
        .await
        .unwrap_err();
        assert!(err.to_string().starts_with("Not signed in"));
    }

    #[tokio::test]
    async fn test_login_and_logout_commands() {
        let store: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::new());
        let console = offline_console(store.clone());
        let options = ConsoleOptions::default();

        execute(
            &console,
            &options,
            Commands::Login {
                token: Some("abc123".to_string()),
            },
        )
        .await
        .unwrap();
        assert_eq!(store.load().unwrap(), Some("abc123".to_string()));

        execute(&console, &options, Commands::Logout).await.unwrap();
        assert_eq!(store.load().unwrap(), None);
        assert_eq!(console.screen().await, Screen::Login);
    }

    #[test]
    fn test_parse_id_and_assignment() {
        assert_eq!(parse_id("42"), serde_json::json!(42));
        assert_eq!(parse_id("\"42\""), serde_json::json!("42"));
        assert_eq!(parse_id("c1b2"), serde_json::json!("c1b2"));
        assert_eq!(split_assignment("name=a=b").unwrap(), ("name", "a=b"));
        assert!(split_assignment("name").is_err());
    }
}
