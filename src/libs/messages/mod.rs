pub mod display;
pub mod macros;
pub mod types;

pub use types::Message;

use crate::libs::error::{Entity, StoreError};

/// User-facing message for a repository error.
pub fn describe(err: &StoreError) -> Message {
    match err {
        StoreError::NotFound { entity, .. } => match entity {
            Entity::Task => Message::TaskNotFound,
            Entity::Subtask => Message::SubtaskNotFound,
            Entity::Tag => Message::TagNotFound,
            Entity::JournalNote => Message::JournalNoteNotFound,
            Entity::JournalEntry => Message::JournalEntryNotFound,
            Entity::FocusSession => Message::FocusSessionNotFound,
        },
        StoreError::Config(detail) => Message::ConfigurationFailed(detail.clone()),
        StoreError::Validation(detail) => Message::ValidationFailed(detail.clone()),
        StoreError::Conflict(detail) => Message::ConflictDetected(detail.clone()),
        StoreError::Storage { .. } | StoreError::Io { .. } | StoreError::Prune { .. } => {
            Message::StorageFailed(err.to_string())
        }
    }
}
