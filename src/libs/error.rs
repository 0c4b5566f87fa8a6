//! Error taxonomy shared by the persistence layer.
//!
//! Every repository operation returns [`StoreError`]. The variants fall into
//! five classes exposed through [`ErrorKind`]:
//!
//! - **Config**: the application directory could not be resolved
//! - **Storage**: engine or filesystem failures (open, migrate, statements,
//!   commits, snapshot and prune I/O)
//! - **NotFound**: a referenced id does not exist
//! - **Conflict**: a uniqueness constraint was violated
//! - **Validation**: caller-supplied data violates a precondition
//!
//! Errors carry the operation and target id that failed; they never contain
//! user-facing wording. Translating them into messages and exit codes is the
//! job of the command layer.

use rusqlite::ErrorCode;
use std::fmt;
use std::io;
use std::path::PathBuf;

pub type StoreResult<T> = Result<T, StoreError>;

/// Coarse classification of a [`StoreError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Storage,
    NotFound,
    Conflict,
    Validation,
}

impl ErrorKind {
    /// Process exit code used by the `todo` binary for this class.
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorKind::Config => 2,
            ErrorKind::Storage => 3,
            ErrorKind::NotFound => 4,
            ErrorKind::Conflict => 5,
            ErrorKind::Validation => 6,
        }
    }
}

/// Entity names used in [`StoreError::NotFound`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Task,
    Subtask,
    Tag,
    JournalNote,
    JournalEntry,
    FocusSession,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Entity::Task => "task",
            Entity::Subtask => "subtask",
            Entity::Tag => "tag",
            Entity::JournalNote => "journal note",
            Entity::JournalEntry => "journal entry",
            Entity::FocusSession => "focus session",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("storage error during {context}: {source}")]
    Storage {
        context: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("io error during {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    #[error("{entity} {id} not found")]
    NotFound { entity: Entity, id: String },

    #[error("conflict during {0}")]
    Conflict(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("failed to prune {} backup file(s)", .failures.len())]
    Prune { failures: Vec<(PathBuf, io::Error)> },
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::Config(_) => ErrorKind::Config,
            StoreError::Storage { .. } | StoreError::Io { .. } | StoreError::Prune { .. } => ErrorKind::Storage,
            StoreError::NotFound { .. } => ErrorKind::NotFound,
            StoreError::Conflict(_) => ErrorKind::Conflict,
            StoreError::Validation(_) => ErrorKind::Validation,
        }
    }

    pub fn not_found(entity: Entity, id: impl ToString) -> Self {
        StoreError::NotFound { entity, id: id.to_string() }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        StoreError::Validation(message.into())
    }

    /// Builds a storage error, promoting unique-constraint violations to
    /// [`StoreError::Conflict`].
    pub fn from_sqlite(context: impl Into<String>, source: rusqlite::Error) -> Self {
        let context = context.into();
        if is_unique_violation(&source) {
            return StoreError::Conflict(context);
        }
        StoreError::Storage { context, source }
    }
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(e, _) => {
            e.code == ErrorCode::ConstraintViolation
                && matches!(
                    e.extended_code,
                    rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE | rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                )
        }
        _ => false,
    }
}

/// Attaches operation context to engine and filesystem results.
pub trait Context<T> {
    fn context<C: Into<String>>(self, context: C) -> StoreResult<T>;

    fn with_context<C: Into<String>, F: FnOnce() -> C>(self, f: F) -> StoreResult<T>;
}

impl<T> Context<T> for Result<T, rusqlite::Error> {
    fn context<C: Into<String>>(self, context: C) -> StoreResult<T> {
        self.map_err(|e| StoreError::from_sqlite(context, e))
    }

    fn with_context<C: Into<String>, F: FnOnce() -> C>(self, f: F) -> StoreResult<T> {
        self.map_err(|e| StoreError::from_sqlite(f(), e))
    }
}

impl<T> Context<T> for Result<T, io::Error> {
    fn context<C: Into<String>>(self, context: C) -> StoreResult<T> {
        self.map_err(|source| StoreError::Io {
            context: context.into(),
            source,
        })
    }

    fn with_context<C: Into<String>, F: FnOnce() -> C>(self, f: F) -> StoreResult<T> {
        self.map_err(|source| StoreError::Io { context: f().into(), source })
    }
}
