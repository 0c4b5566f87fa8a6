//! Daily journal command.
//!
//! Without a subcommand the visible notes are printed, newest day first.
//! `write` appends to today's note, creating it on the first entry of the day.

use crate::{
    db::{db::Db, journal::Journal},
    libs::messages::Message,
    msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct JournalArgs {
    #[command(subcommand)]
    command: Option<JournalCommand>,
}

#[derive(Debug, Subcommand)]
enum JournalCommand {
    /// Append an entry to today's note
    Write {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Print notes and their entries
    List {
        /// Include hidden notes
        #[arg(short, long)]
        all: bool,
    },
    /// Hide a note from the default listing
    Hide { note_id: i64 },
    /// Make a hidden note visible again
    Restore { note_id: i64 },
    /// Replace the text of an entry
    Edit {
        entry_id: i64,
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Delete a single entry
    Remove { entry_id: i64 },
}

pub fn cmd(db: &Db, args: JournalArgs) -> Result<()> {
    let journal = Journal::new(db)?;
    match args.command {
        Some(JournalCommand::Write { text }) => {
            let note = journal.get_or_create_today()?;
            journal.add_entry(note.id, &text.join(" "))?;
            msg_success!(Message::JournalEntryAdded(note.date.to_string()));
        }
        Some(JournalCommand::List { all }) => print_notes(&journal, all)?,
        Some(JournalCommand::Hide { note_id }) => {
            journal.hide(note_id)?;
            msg_success!(Message::JournalNoteHidden(note_id));
        }
        Some(JournalCommand::Restore { note_id }) => {
            journal.restore(note_id)?;
            msg_success!(Message::JournalNoteRestored(note_id));
        }
        Some(JournalCommand::Edit { entry_id, text }) => {
            journal.edit_entry(entry_id, &text.join(" "))?;
            msg_success!(Message::JournalEntryUpdated(entry_id));
        }
        Some(JournalCommand::Remove { entry_id }) => {
            journal.delete_entry(entry_id)?;
            msg_success!(Message::JournalEntryDeleted(entry_id));
        }
        None => print_notes(&journal, false)?,
    }
    Ok(())
}

fn print_notes(journal: &Journal, include_hidden: bool) -> Result<()> {
    let notes = journal.list_notes(include_hidden)?;
    if notes.is_empty() {
        msg_info!(Message::JournalEmpty);
        return Ok(());
    }

    for note in notes {
        msg_print!(Message::JournalNoteHeader(note.id, note.date.to_string(), note.hidden));
        for entry in &note.entries {
            msg_print!(Message::JournalEntryLine(
                entry.id,
                entry.created_at.format("%H:%M").to_string(),
                entry.body.clone()
            ));
        }
    }
    Ok(())
}
