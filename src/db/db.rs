//! Connection management for the application database.
//!
//! A [`Db`] owns the single physical SQLite connection of the process. It is
//! opened once at startup, handed by reference to every repository and closed
//! at shutdown, either explicitly through [`Db::close`] or implicitly when it
//! goes out of scope.
//!
//! Every connection is configured with:
//!
//! - `journal_mode = WAL`, so readers are not blocked by an in-flight write
//! - `foreign_keys = ON`, so cascade rules are enforced by the engine

use crate::libs::data_storage::DataStorage;
use crate::libs::error::{Context, StoreError, StoreResult};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

pub const DB_FILE_NAME: &str = "todo.db";

/// How long a statement waits on a locked database file before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

pub struct Db {
    pub conn: Connection,
    path: Option<PathBuf>,
}

impl Db {
    /// Opens the database at its fixed per-user location,
    /// `<home>/.todo-app/todo.db`.
    pub fn new() -> StoreResult<Db> {
        let db_file_path = DataStorage::new()?.get_path(DB_FILE_NAME)?;
        Self::open(db_file_path)
    }

    /// Opens (or creates) the database file at `path`, creating missing
    /// parent directories.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Db> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
        }

        let conn = Connection::open(path).with_context(|| format!("open {}", path.display()))?;
        configure(&conn)?;
        debug!(path = %path.display(), "database opened");

        Ok(Db {
            conn,
            path: Some(path.to_path_buf()),
        })
    }

    /// Opens a private in-memory database with the same settings.
    pub fn open_in_memory() -> StoreResult<Db> {
        let conn = Connection::open_in_memory().context("open in-memory database")?;
        configure(&conn)?;
        Ok(Db { conn, path: None })
    }

    /// Location of the database file, `None` for in-memory databases.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Reports the journal mode the engine actually applied.
    pub fn journal_mode(&self) -> StoreResult<String> {
        self.conn
            .pragma_query_value(None, "journal_mode", |row| row.get(0))
            .context("read journal_mode")
    }

    pub fn foreign_keys_enabled(&self) -> StoreResult<bool> {
        self.conn
            .pragma_query_value(None, "foreign_keys", |row| row.get(0))
            .context("read foreign_keys")
    }

    /// Closes the connection, surfacing any error the engine reports while
    /// finalizing.
    pub fn close(self) -> StoreResult<()> {
        let path = self.path;
        self.conn.close().map_err(|(_, e)| StoreError::Storage {
            context: "close database".to_string(),
            source: e,
        })?;
        if let Some(path) = path {
            debug!(path = %path.display(), "database closed");
        }
        Ok(())
    }
}

fn configure(conn: &Connection) -> StoreResult<()> {
    // journal_mode reports the resulting mode as a row; in-memory databases answer "memory".
    let mode: String = conn
        .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))
        .context("enable write-ahead logging")?;
    conn.pragma_update(None, "foreign_keys", true).context("enable foreign keys")?;
    conn.busy_timeout(BUSY_TIMEOUT).context("set busy timeout")?;
    debug!(journal_mode = %mode, "connection configured");
    Ok(())
}
