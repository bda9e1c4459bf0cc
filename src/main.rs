use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde_json::to_string_pretty;

use notes_client::{
    CreateNoteRequest, NoteClient, Theme, ThemeEnvironment, ThemeStore, UpdateNoteRequest,
    config,
    theme::{
        DARK_CLASS,
        environment::{ClassList, FileStorage, TerminalColorScheme},
    },
};

#[derive(Debug, Parser)]
#[command(name = "notes-client", about = "Manage notes on a remote notes API")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List all notes
    List,
    /// Show one note
    Get { id: u64 },
    /// Create a note
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
    },
    /// Update some fields of a note
    Update {
        id: u64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
    },
    /// Delete a note
    Delete { id: u64 },
    /// Show or change the theme preference
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,
    },
}

#[derive(Debug, Subcommand)]
enum ThemeAction {
    Show,
    Set { theme: Theme },
    Toggle,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Log setup
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    // Load config
    let cfg = config::load_config()?;
    tracing::debug!("Loaded config: {:?}", cfg);

    let client = NoteClient::new(cfg.api_url.clone());

    match cli.command {
        Command::List => {
            let notes = client.list().await?;
            println!("{}", to_string_pretty(&notes)?);
        }
        Command::Get { id } => {
            let note = client.get(id).await?;
            println!("{}", to_string_pretty(&note)?);
        }
        Command::Create { title, content } => {
            let note = client
                .create(&CreateNoteRequest::new(title, content))
                .await?;
            println!("{}", to_string_pretty(&note)?);
        }
        Command::Update { id, title, content } => {
            let patch = UpdateNoteRequest {
                title,
                content,
                ..UpdateNoteRequest::default()
            };
            if patch.is_empty() {
                tracing::warn!("Nothing to update, sending an empty body");
            }
            let note = client.update(id, &patch).await?;
            println!("{}", to_string_pretty(&note)?);
        }
        Command::Delete { id } => {
            client.delete(id).await?;
            println!("Deleted note {id}");
        }
        Command::Theme { action } => {
            let root = Arc::new(ClassList::new());
            let env = ThemeEnvironment::new(
                Arc::new(FileStorage::new(&cfg.preferences_path)),
                Arc::new(TerminalColorScheme::from_env()),
                root.clone(),
            );
            let store = ThemeStore::initialize(&env);

            match action.unwrap_or(ThemeAction::Show) {
                ThemeAction::Show => {}
                ThemeAction::Set { theme } => store.set(theme),
                ThemeAction::Toggle => {
                    store.toggle();
                }
            }

            println!(
                "{}",
                to_string_pretty(&serde_json::json!({
                    "theme": store.get(),
                    "darkClass": root.contains(DARK_CLASS),
                }))?
            );
        }
    }

    Ok(())
}
