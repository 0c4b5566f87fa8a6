//! Journal repository: one note per calendar day, each holding timestamped
//! entries.
//!
//! The `UNIQUE` constraint on `journal_notes.date` is the source of truth for
//! "one note per day". [`Journal::get_or_create_for`] looks the note up first
//! and only inserts when it is missing; an insert that still collides is
//! reported by the engine as a conflict and resolved with a second lookup.

use super::db::Db;
use super::migrations::{migrate, Domain};
use super::rows::{query_all, query_all_by_ids, query_one, FromRow};
use crate::libs::error::{Context, Entity, StoreError, StoreResult};
use crate::libs::journal::{validate_body, JournalEntry, JournalNote};
use chrono::{Local, NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection, Row};
use std::collections::HashMap;
use tracing::debug;

const INSERT_NOTE: &str = "INSERT INTO journal_notes (date) VALUES (?1)";
const INSERT_ENTRY: &str = "INSERT INTO journal_entries (note_id, body, created_at) VALUES (?1, ?2, ?3)";
const UPDATE_HIDDEN: &str = "UPDATE journal_notes SET hidden = ?2 WHERE id = ?1";
const UPDATE_ENTRY: &str = "UPDATE journal_entries SET body = ?2 WHERE id = ?1";
const DELETE_ENTRY: &str = "DELETE FROM journal_entries WHERE id = ?1";
const SELECT_NOTES: &str = "SELECT id, date, hidden FROM journal_notes";
const SELECT_ENTRIES_IN: &str = "SELECT id, note_id, body, created_at FROM journal_entries WHERE note_id IN";
const SELECT_NOTE_EXISTS: &str = "SELECT EXISTS(SELECT 1 FROM journal_notes WHERE id = ?1)";

impl FromRow for JournalNote {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(JournalNote {
            id: row.get("id")?,
            date: row.get("date")?,
            hidden: row.get("hidden")?,
            entries: Vec::new(),
        })
    }
}

impl FromRow for JournalEntry {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(JournalEntry {
            id: row.get("id")?,
            note_id: row.get("note_id")?,
            body: row.get("body")?,
            created_at: row.get("created_at")?,
        })
    }
}

pub struct Journal<'a> {
    db: &'a Db,
}

impl<'a> Journal<'a> {
    pub fn new(db: &'a Db) -> StoreResult<Self> {
        migrate(&db.conn, Domain::Journal)?;
        Ok(Journal { db })
    }

    fn conn(&self) -> &Connection {
        &self.db.conn
    }

    /// Returns the note for the current local date, creating it on first use.
    pub fn get_or_create_today(&self) -> StoreResult<JournalNote> {
        self.get_or_create_for(Local::now().date_naive())
    }

    /// Returns the note for `date`, creating it if missing. The lookup, the
    /// insert and the re-read share one transaction.
    pub fn get_or_create_for(&self, date: NaiveDate) -> StoreResult<JournalNote> {
        let tx = self
            .conn()
            .unchecked_transaction()
            .with_context(|| format!("begin journal note for {date}"))?;
        if let Some(note) = self.find_by_date(date)? {
            return Ok(note);
        }

        match tx.execute(INSERT_NOTE, params![date]) {
            Ok(_) => debug!(%date, "journal note created"),
            Err(e) => match StoreError::from_sqlite(format!("insert journal note for {date}"), e) {
                // Another connection created it between the lookup and the insert.
                StoreError::Conflict(_) => debug!(%date, "journal note already exists"),
                other => return Err(other),
            },
        }

        let note = self
            .find_by_date(date)?
            .ok_or_else(|| StoreError::not_found(Entity::JournalNote, date))?;
        tx.commit().with_context(|| format!("commit journal note for {date}"))?;
        Ok(note)
    }

    /// The note for `date` with its entries, if one exists.
    pub fn find_by_date(&self, date: NaiveDate) -> StoreResult<Option<JournalNote>> {
        let note: Option<JournalNote> = query_one(
            self.conn(),
            &format!("{SELECT_NOTES} WHERE date = ?1"),
            params![date],
            &format!("select journal note for {date}"),
        )?;
        self.populate(note)
    }

    /// Loads a note by id; `NotFound` if it does not exist.
    pub fn get_note(&self, id: i64) -> StoreResult<JournalNote> {
        let note: Option<JournalNote> = query_one(
            self.conn(),
            &format!("{SELECT_NOTES} WHERE id = ?1"),
            params![id],
            &format!("select journal note {id}"),
        )?;
        self.populate(note)?
            .ok_or_else(|| StoreError::not_found(Entity::JournalNote, id))
    }

    /// Adds an entry stamped with the current local time.
    pub fn add_entry(&self, note_id: i64, body: &str) -> StoreResult<i64> {
        self.add_entry_at(note_id, body, Local::now().naive_local())
    }

    pub fn add_entry_at(&self, note_id: i64, body: &str, at: NaiveDateTime) -> StoreResult<i64> {
        validate_body(body)?;
        self.ensure_note(note_id)?;
        self.conn()
            .execute(INSERT_ENTRY, params![note_id, body, at])
            .with_context(|| format!("insert entry into note {note_id}"))?;
        Ok(self.conn().last_insert_rowid())
    }

    /// Notes ordered newest date first, each with its entries in the order
    /// they were written. Hidden notes are skipped unless `include_hidden`.
    pub fn list_notes(&self, include_hidden: bool) -> StoreResult<Vec<JournalNote>> {
        let sql = if include_hidden {
            format!("{SELECT_NOTES} ORDER BY date DESC")
        } else {
            format!("{SELECT_NOTES} WHERE hidden = FALSE ORDER BY date DESC")
        };
        let mut notes: Vec<JournalNote> = query_all(self.conn(), &sql, [], "select journal notes")?;
        self.attach_entries(&mut notes)?;
        Ok(notes)
    }

    /// Hides the note from default listings. Its entries are kept.
    pub fn hide(&self, note_id: i64) -> StoreResult<()> {
        self.set_hidden(note_id, true)
    }

    /// Makes a hidden note visible again.
    pub fn restore(&self, note_id: i64) -> StoreResult<()> {
        self.set_hidden(note_id, false)
    }

    fn set_hidden(&self, note_id: i64, hidden: bool) -> StoreResult<()> {
        let affected = self
            .conn()
            .execute(UPDATE_HIDDEN, params![note_id, hidden])
            .with_context(|| format!("set hidden on note {note_id}"))?;
        if affected == 0 {
            return Err(StoreError::not_found(Entity::JournalNote, note_id));
        }
        Ok(())
    }

    /// Replaces the body of an entry; its timestamp is unchanged.
    pub fn edit_entry(&self, entry_id: i64, body: &str) -> StoreResult<()> {
        validate_body(body)?;
        let affected = self
            .conn()
            .execute(UPDATE_ENTRY, params![entry_id, body])
            .with_context(|| format!("update entry {entry_id}"))?;
        if affected == 0 {
            return Err(StoreError::not_found(Entity::JournalEntry, entry_id));
        }
        Ok(())
    }

    /// Removes a single entry from its note.
    pub fn delete_entry(&self, entry_id: i64) -> StoreResult<()> {
        let affected = self
            .conn()
            .execute(DELETE_ENTRY, params![entry_id])
            .with_context(|| format!("delete entry {entry_id}"))?;
        if affected == 0 {
            return Err(StoreError::not_found(Entity::JournalEntry, entry_id));
        }
        Ok(())
    }

    fn ensure_note(&self, id: i64) -> StoreResult<()> {
        let exists: bool = self
            .conn()
            .query_row(SELECT_NOTE_EXISTS, params![id], |row| row.get(0))
            .with_context(|| format!("look up journal note {id}"))?;
        if !exists {
            return Err(StoreError::not_found(Entity::JournalNote, id));
        }
        Ok(())
    }

    fn populate(&self, note: Option<JournalNote>) -> StoreResult<Option<JournalNote>> {
        let Some(note) = note else { return Ok(None) };
        let mut notes = vec![note];
        self.attach_entries(&mut notes)?;
        Ok(notes.pop())
    }

    /// Loads the entries of every given note with batched queries.
    fn attach_entries(&self, notes: &mut [JournalNote]) -> StoreResult<()> {
        if notes.is_empty() {
            return Ok(());
        }
        let ids: Vec<i64> = notes.iter().map(|n| n.id).collect();
        let entries: Vec<JournalEntry> = query_all_by_ids(
            self.conn(),
            SELECT_ENTRIES_IN,
            "ORDER BY note_id, created_at, id",
            &ids,
            "select journal entries",
        )?;

        let mut by_note: HashMap<i64, Vec<JournalEntry>> = HashMap::new();
        for entry in entries {
            by_note.entry(entry.note_id).or_default().push(entry);
        }
        for note in notes.iter_mut() {
            note.entries = by_note.remove(&note.id).unwrap_or_default();
        }
        Ok(())
    }
}
