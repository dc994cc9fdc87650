use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use noteful::config::ensure_database_directory;
use noteful::{
    Config, Database, FolderId, NewNote, NoteFilter, NoteId, NoteService, NoteUpdate, TagId,
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// noteful - notes, folders and tags
#[derive(Parser)]
#[command(name = "noteful")]
#[command(about = "Notes organised in folders and tagged many-to-many")]
#[command(version)]
struct Cli {
    /// Database file (overrides NOTEFUL_DATABASE)
    #[arg(long, global = true, value_name = "PATH")]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Read and write notes
    #[command(subcommand)]
    Notes(NoteCommand),
    /// Manage folders
    #[command(subcommand)]
    Folders(CatalogCommand),
    /// Manage tags
    #[command(subcommand)]
    Tags(CatalogCommand),
}

#[derive(Subcommand)]
enum NoteCommand {
    /// List notes with their folder and tags
    List {
        /// Only notes whose title contains this text
        #[arg(long)]
        search: Option<String>,
        /// Only notes in this folder
        #[arg(long, value_name = "ID")]
        folder: Option<i64>,
        /// Only notes carrying this tag
        #[arg(long, value_name = "ID")]
        tag: Option<i64>,
    },
    /// Show one note
    Show { id: i64 },
    /// Create a note
    Add(NoteFields),
    /// Update a note; options left out keep their stored value
    Edit {
        id: i64,
        #[command(flatten)]
        fields: NoteFields,
        /// Remove the note's content
        #[arg(long, conflicts_with = "content")]
        clear_content: bool,
        /// Take the note out of its folder
        #[arg(long, conflicts_with = "folder")]
        unfile: bool,
        /// Remove every tag from the note
        #[arg(long, conflicts_with = "tags")]
        clear_tags: bool,
    },
    /// Delete a note
    Rm { id: i64 },
    /// Replace the tags of a note; no --tags removes them all
    SetTags {
        id: i64,
        #[arg(long, value_name = "IDS", value_delimiter = ',')]
        tags: Vec<i64>,
    },
}

#[derive(Args)]
struct NoteFields {
    #[arg(long)]
    title: String,
    #[arg(long)]
    content: Option<String>,
    #[arg(long, value_name = "ID")]
    folder: Option<i64>,
    /// Comma-separated tag ids
    #[arg(long, value_name = "IDS", value_delimiter = ',')]
    tags: Vec<i64>,
}

#[derive(Subcommand)]
enum CatalogCommand {
    /// List all entries
    List,
    /// Show one entry
    Show { id: i64 },
    /// Create an entry
    Add { name: String },
    /// Rename an entry
    Rename { id: i64, name: String },
    /// Delete an entry
    Rm { id: i64 },
}

/// A lookup by id found nothing.
#[derive(Debug, thiserror::Error)]
#[error("{kind} {id} not found")]
struct NotFound {
    kind: &'static str,
    id: i64,
}

fn main() {
    let cli = Cli::parse();

    let result = Config::from_env().and_then(|config| {
        let config = match cli.database.clone() {
            Some(path) => config.with_database_path(path),
            None => config,
        };
        init_logging(&config.log_filter);
        run(cli.command, &config)
    });

    if let Err(e) = result {
        let exit_code = if is_user_error(&e) { 1 } else { 2 };
        eprintln!("Error: {e:#}");
        std::process::exit(exit_code);
    }
}

fn init_logging(filter: &str) {
    let env_filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("noteful=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Determines if an error is a user error (vs internal error).
///
/// User errors are failed lookups, validation failures and references to
/// ids that do not exist. Everything else is a store or I/O failure.
fn is_user_error(error: &anyhow::Error) -> bool {
    error.chain().any(|cause| {
        cause.is::<NotFound>()
            || cause
                .downcast_ref::<noteful::Error>()
                .is_some_and(noteful::Error::is_user_error)
    })
}

fn run(command: Commands, config: &Config) -> Result<()> {
    ensure_database_directory(&config.database_path)?;
    let db = Database::open(&config.database_path).with_context(|| {
        format!(
            "Failed to open database: {}",
            config.database_path.display()
        )
    })?;

    execute(command, &NoteService::new(db))
}

/// Executes a command against a service.
///
/// Separated from `run` to allow testing with in-memory databases.
fn execute(command: Commands, service: &NoteService) -> Result<()> {
    match command {
        Commands::Notes(cmd) => execute_note(cmd, service),
        Commands::Folders(cmd) => execute_folder(cmd, service),
        Commands::Tags(cmd) => execute_tag(cmd, service),
    }
}

fn execute_note(command: NoteCommand, service: &NoteService) -> Result<()> {
    match command {
        NoteCommand::List {
            search,
            folder,
            tag,
        } => {
            let filter = NoteFilter {
                search_term: search,
                folder_id: folder.map(FolderId::new),
                tag_id: tag.map(TagId::new),
            };
            print_json(&service.list_notes(&filter)?)
        }
        NoteCommand::Show { id } => {
            let note = service.get_note(NoteId::new(id))?.ok_or(NotFound { kind: "Note", id })?;
            print_json(&note)
        }
        NoteCommand::Add(fields) => {
            let note = service
                .create_note(NewNote {
                    title: fields.title,
                    content: fields.content,
                    folder_id: fields.folder.map(FolderId::new),
                    tags: tag_ids(&fields.tags),
                })
                .context("Failed to create note")?;
            print_json(&note)
        }
        NoteCommand::Edit {
            id,
            fields,
            clear_content,
            unfile,
            clear_tags,
        } => {
            let tags = if clear_tags {
                Some(Vec::new())
            } else if fields.tags.is_empty() {
                None
            } else {
                Some(tag_ids(&fields.tags))
            };
            let content = if clear_content {
                Some(None)
            } else {
                fields.content.map(Some)
            };
            let folder_id = if unfile {
                Some(None)
            } else {
                fields.folder.map(|folder| Some(FolderId::new(folder)))
            };
            let update = NoteUpdate {
                title: fields.title,
                content,
                folder_id,
                tags,
            };
            let note = service
                .update_note(NoteId::new(id), update)
                .context("Failed to update note")?
                .ok_or(NotFound { kind: "Note", id })?;
            print_json(&note)
        }
        NoteCommand::Rm { id } => {
            if !service.delete_note(NoteId::new(id))? {
                return Err(NotFound { kind: "Note", id }.into());
            }
            Ok(())
        }
        NoteCommand::SetTags { id, tags } => {
            let note_id = NoteId::new(id);
            service
                .set_tags(note_id, &tag_ids(&tags))
                .context("Failed to set note tags")?;
            let note = service.get_note(note_id)?.ok_or(NotFound { kind: "Note", id })?;
            print_json(&note)
        }
    }
}

fn execute_folder(command: CatalogCommand, service: &NoteService) -> Result<()> {
    let not_found = |id| NotFound { kind: "Folder", id };
    match command {
        CatalogCommand::List => print_json(&service.list_folders()?),
        CatalogCommand::Show { id } => {
            print_json(&service.get_folder(FolderId::new(id))?.ok_or(not_found(id))?)
        }
        CatalogCommand::Add { name } => print_json(&service.create_folder(&name)?),
        CatalogCommand::Rename { id, name } => print_json(
            &service
                .rename_folder(FolderId::new(id), &name)?
                .ok_or(not_found(id))?,
        ),
        CatalogCommand::Rm { id } => {
            if !service.delete_folder(FolderId::new(id))? {
                return Err(not_found(id).into());
            }
            Ok(())
        }
    }
}

fn execute_tag(command: CatalogCommand, service: &NoteService) -> Result<()> {
    let not_found = |id| NotFound { kind: "Tag", id };
    match command {
        CatalogCommand::List => print_json(&service.list_tags()?),
        CatalogCommand::Show { id } => {
            print_json(&service.get_tag(TagId::new(id))?.ok_or(not_found(id))?)
        }
        CatalogCommand::Add { name } => print_json(&service.create_tag(&name)?),
        CatalogCommand::Rename { id, name } => print_json(
            &service
                .rename_tag(TagId::new(id), &name)?
                .ok_or(not_found(id))?,
        ),
        CatalogCommand::Rm { id } => {
            if !service.delete_tag(TagId::new(id))? {
                return Err(not_found(id).into());
            }
            Ok(())
        }
    }
}

fn tag_ids(raw: &[i64]) -> Vec<TagId> {
    raw.iter().copied().map(TagId::new).collect()
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
