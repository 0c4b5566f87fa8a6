//! Idempotent schema creation for each storage domain.
//!
//! Every repository owns one [`Domain`]. Its constructor calls [`migrate`],
//! which runs the domain's statements inside a single transaction: either all
//! of them take effect or repository construction fails and nothing changes.
//! Statements use `IF NOT EXISTS`, so migrating an already initialized
//! database is a no-op.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use todo_app::db::db::Db;
//! use todo_app::db::migrations::{migrate, Domain};
//!
//! let db = Db::open_in_memory()?;
//! migrate(&db.conn, Domain::Tasks)?;
//! # Ok::<(), todo_app::libs::error::StoreError>(())
//! ```

use crate::libs::error::{Context, StoreResult};
use rusqlite::{params, Connection, Transaction};
use tracing::debug;

/// Storage domains sharing the database file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    Tasks,
    Journal,
    Focus,
}

impl Domain {
    pub fn name(self) -> &'static str {
        match self {
            Domain::Tasks => "tasks",
            Domain::Journal => "journal",
            Domain::Focus => "focus",
        }
    }
}

/// A named schema step applied inside the domain transaction.
#[derive(Debug, Clone)]
struct Migration {
    name: &'static str,
    up: fn(&Transaction) -> rusqlite::Result<()>,
}

/// Ordered schema steps for one domain.
pub struct MigrationManager {
    domain: Domain,
    migrations: Vec<Migration>,
}

impl MigrationManager {
    pub fn new(domain: Domain) -> Self {
        let mut manager = Self {
            domain,
            migrations: Vec::new(),
        };
        match domain {
            Domain::Tasks => manager.register_tasks(),
            Domain::Journal => manager.register_journal(),
            Domain::Focus => manager.register_focus(),
        }
        manager
    }

    fn register_tasks(&mut self) {
        self.add_migration("create_tasks", |tx| {
            // AUTOINCREMENT keeps deleted ids from being handed out again.
            tx.execute(
                "CREATE TABLE IF NOT EXISTS tasks (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    title TEXT NOT NULL CHECK (length(trim(title)) > 0),
                    description TEXT,
                    status TEXT NOT NULL DEFAULT 'pending',
                    priority INTEGER NOT NULL DEFAULT 1,
                    created_at TIMESTAMP NOT NULL,
                    due_date DATE
                )",
                [],
            )?;
            Ok(())
        });

        self.add_migration("create_subtasks", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS subtasks (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    task_id INTEGER NOT NULL,
                    title TEXT NOT NULL,
                    completed BOOLEAN NOT NULL DEFAULT FALSE,
                    position INTEGER NOT NULL DEFAULT 0,
                    FOREIGN KEY (task_id) REFERENCES tasks(id) ON DELETE CASCADE
                )",
                [],
            )?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_subtasks_task_id ON subtasks(task_id)", [])?;
            Ok(())
        });

        self.add_migration("create_task_tags", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS task_tags (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    task_id INTEGER NOT NULL,
                    name TEXT NOT NULL,
                    UNIQUE (task_id, name),
                    FOREIGN KEY (task_id) REFERENCES tasks(id) ON DELETE CASCADE
                )",
                [],
            )?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_task_tags_task_id ON task_tags(task_id)", [])?;
            Ok(())
        });
    }

    fn register_journal(&mut self) {
        self.add_migration("create_journal_notes", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS journal_notes (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    date DATE NOT NULL UNIQUE,
                    hidden BOOLEAN NOT NULL DEFAULT FALSE
                )",
                [],
            )?;
            Ok(())
        });

        self.add_migration("create_journal_entries", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS journal_entries (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    note_id INTEGER NOT NULL,
                    body TEXT NOT NULL,
                    created_at TIMESTAMP NOT NULL,
                    FOREIGN KEY (note_id) REFERENCES journal_notes(id) ON DELETE CASCADE
                )",
                [],
            )?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_journal_entries_note_id ON journal_entries(note_id)", [])?;
            Ok(())
        });
    }

    fn register_focus(&mut self) {
        self.add_migration("create_focus_sessions", |tx| {
            // task_id is a soft reference: sessions outlive the tasks they were logged against.
            tx.execute(
                "CREATE TABLE IF NOT EXISTS focus_sessions (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    task_id INTEGER,
                    duration_secs INTEGER NOT NULL CHECK (duration_secs >= 0),
                    started_at TIMESTAMP NOT NULL,
                    completed_at TIMESTAMP CHECK (completed_at IS NULL OR completed_at >= started_at)
                )",
                [],
            )?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_focus_sessions_task_id ON focus_sessions(task_id)", [])?;
            tx.execute(
                "CREATE INDEX IF NOT EXISTS idx_focus_sessions_completed_at ON focus_sessions(completed_at)",
                [],
            )?;
            Ok(())
        });
    }

    fn add_migration(&mut self, name: &'static str, up: fn(&Transaction) -> rusqlite::Result<()>) {
        self.migrations.push(Migration { name, up });
    }

    /// Applies every step of the domain in one transaction.
    pub fn run_migrations(&self, conn: &Connection) -> StoreResult<()> {
        let domain = self.domain.name();
        let tx = conn
            .unchecked_transaction()
            .with_context(|| format!("begin {domain} migration"))?;

        for migration in &self.migrations {
            debug!(domain, migration = migration.name, "applying schema step");
            (migration.up)(&tx).with_context(|| format!("migrate {domain}: {}", migration.name))?;
        }

        tx.commit().with_context(|| format!("commit {domain} migration"))?;
        debug!(domain, steps = self.migrations.len(), "schema up to date");
        Ok(())
    }

    pub fn step_names(&self) -> Vec<&'static str> {
        self.migrations.iter().map(|m| m.name).collect()
    }
}

/// Creates the tables and indexes of `domain` if they are missing.
pub fn migrate(conn: &Connection, domain: Domain) -> StoreResult<()> {
    MigrationManager::new(domain).run_migrations(conn)
}

pub fn table_exists(conn: &Connection, name: &str) -> StoreResult<bool> {
    schema_object_exists(conn, "table", name)
}

pub fn index_exists(conn: &Connection, name: &str) -> StoreResult<bool> {
    schema_object_exists(conn, "index", name)
}

fn schema_object_exists(conn: &Connection, kind: &str, name: &str) -> StoreResult<bool> {
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = ?1 AND name = ?2",
            params![kind, name],
            |row| row.get(0),
        )
        .with_context(|| format!("inspect {kind} {name}"))?;
    Ok(count > 0)
}
