use crate::{
    db::{db::Db, journal::Journal, tasks::Tasks},
    libs::{
        export::{ExportFormat, Exporter},
        messages::Message,
        task::{TaskFilter, TaskSort},
    },
    msg_success,
};
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ExportArgs {
    #[arg(short, long, value_enum, default_value = "markdown")]
    format: ExportFormat,

    /// Output file; the document is printed when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Include journal notes, hidden ones too
    #[arg(long)]
    journal: bool,
}

pub fn cmd(db: &Db, args: ExportArgs) -> Result<()> {
    let tasks = Tasks::new(db)?.list(TaskFilter::All, TaskSort::Created)?;
    let notes = if args.journal {
        Some(Journal::new(db)?.list_notes(true)?)
    } else {
        None
    };

    let exporter = Exporter::new(args.format, args.output);
    if let Some(path) = exporter.export(&tasks, notes.as_deref())? {
        msg_success!(Message::DataExported(path.display().to_string()));
    }
    Ok(())
}
