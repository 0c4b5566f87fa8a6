pub mod add;
pub mod backup;
pub mod delete;
pub mod done;
pub mod edit;
pub mod export;
pub mod focus;
pub mod init;
pub mod journal;
pub mod list;
pub mod subtask;
pub mod tag;

use crate::db::db::Db;
use crate::libs::config::Config;
use crate::libs::error::StoreError;
use crate::libs::messages::{describe, Message};
use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Create a task")]
    Add(add::AddArgs),
    #[command(about = "Mark a task as done")]
    Done(done::DoneArgs),
    #[command(about = "Change the fields of a task")]
    Edit(edit::EditArgs),
    #[command(about = "List tasks")]
    List(list::ListArgs),
    #[command(about = "Delete a task with its subtasks and tags")]
    Delete(delete::DeleteArgs),
    #[command(about = "Manage the subtasks of a task")]
    Subtask(subtask::SubtaskArgs),
    #[command(about = "Manage the tags of a task")]
    Tag(tag::TagArgs),
    #[command(about = "Write and read the daily journal")]
    Journal(journal::JournalArgs),
    #[command(about = "Run and review focus sessions")]
    Focus(focus::FocusArgs),
    #[command(about = "Export tasks and journal as Markdown or JSON")]
    Export(export::ExportArgs),
    #[command(about = "Back up the database and prune old backups")]
    Backup(backup::BackupArgs),
    #[command(about = "Configuration initialization")]
    Init,
}

#[derive(Debug, Parser)]
#[command(name = "todo", author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Parses the command line and runs the selected command.
    ///
    /// The database is opened once, shared by every repository the command
    /// uses and closed before returning, also when the command fails.
    pub fn menu() -> Result<()> {
        let cli = Self::parse();
        let config = Config::read()?;
        let db = Db::new()?;
        let explicit_backup = matches!(cli.command, Commands::Backup(_));

        let result = match cli.command {
            Commands::Add(args) => add::cmd(&db, args),
            Commands::Done(args) => done::cmd(&db, args),
            Commands::Edit(args) => edit::cmd(&db, args),
            Commands::List(args) => list::cmd(&db, &config, args),
            Commands::Delete(args) => delete::cmd(&db, args),
            Commands::Subtask(args) => subtask::cmd(&db, args),
            Commands::Tag(args) => tag::cmd(&db, args),
            Commands::Journal(args) => journal::cmd(&db, args),
            Commands::Focus(args) => focus::cmd(&db, &config, args),
            Commands::Export(args) => export::cmd(&db, args),
            Commands::Backup(args) => backup::cmd(&db, &config, args),
            Commands::Init => init::cmd(),
        };

        if result.is_ok() && !explicit_backup {
            backup::auto(&db, &config);
        }

        let closed = db.close();
        result?;
        closed?;
        Ok(())
    }
}

/// Exit code for an error returned by [`Cli::menu`].
pub fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<StoreError>().map(|e| e.kind().exit_code()).unwrap_or(1)
}

/// User-facing text for an error returned by [`Cli::menu`].
pub fn error_message(err: &anyhow::Error) -> String {
    match err.downcast_ref::<StoreError>() {
        Some(store_error) => describe(store_error).to_string(),
        None => format!("{err:#}"),
    }
}

/// Parses `today` or an ISO `YYYY-MM-DD` date.
pub(crate) fn parse_date(value: &str) -> Result<NaiveDate> {
    if value.eq_ignore_ascii_case("today") {
        return Ok(Local::now().date_naive());
    }
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| StoreError::validation(Message::InvalidDate(value.to_string()).to_string()))?;
    Ok(date)
}
