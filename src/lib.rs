//! # todo-app - local tasks, journal and focus sessions
//!
//! A command-line organiser backed by a single SQLite file.
//!
//! ## Features
//!
//! - **Tasks**: status, priority, due date, ordered subtasks and tags
//! - **Journal**: one note per day holding timestamped entries
//! - **Focus Sessions**: Pomodoro-style sessions with daily statistics
//! - **Backups**: dated daily snapshots with age-based retention
//! - **Export**: Markdown and JSON documents
//!
//! ## Usage
//!
//! ```rust,no_run
//! use todo_app::commands::Cli;
//!
//! fn main() -> anyhow::Result<()> {
//!     Cli::menu()
//! }
//! ```

pub mod commands;
pub mod db;
pub mod libs;
