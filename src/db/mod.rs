//! Persistence layer built on a single SQLite file.
//!
//! One [`db::Db`] owns the connection for the whole process; each repository
//! borrows it and migrates its own tables when constructed, so opening a
//! repository on a fresh file is enough to get a usable schema.
//!
//! ```rust
//! use todo_app::db::{db::Db, tasks::Tasks};
//! use todo_app::libs::task::Task;
//!
//! let db = Db::open_in_memory()?;
//! let tasks = Tasks::new(&db)?;
//! let id = tasks.create(&Task::new("Review code").with_subtask("Read the diff"))?;
//! assert_eq!(tasks.get_by_id(id)?.subtasks.len(), 1);
//! # Ok::<(), todo_app::libs::error::StoreError>(())
//! ```

/// Connection manager: opening, pragmas and closing.
pub mod db;

/// Per-domain schema migrations.
pub mod migrations;

/// Row decoding shared by the repositories.
pub mod rows;

/// Tasks with their subtasks and tags.
pub mod tasks;

/// Daily journal notes and their entries.
pub mod journal;

/// Focus sessions and the per-day completion queries.
pub mod focus;

/// Dated snapshots and retention.
pub mod backup;
