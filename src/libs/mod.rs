//! Domain values and the collaborators around the persistence core.
//!
//! Nothing in here opens the database; repositories live in [`crate::db`].

pub mod config;
pub mod data_storage;
pub mod error;
pub mod export;
pub mod focus;
pub mod formatter;
pub mod journal;
pub mod messages;
pub mod task;
pub mod view;
