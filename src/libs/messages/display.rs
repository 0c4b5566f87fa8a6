//! Display text for [`Message`].
//!
//! All user-facing wording lives here; the rest of the crate passes
//! structured messages around.

use super::types::Message;
use std::fmt;

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            // === TASK MESSAGES ===
            Message::TaskCreated(id) => format!("Task {id} created"),
            Message::TaskUpdated(id) => format!("Task {id} updated"),
            Message::TaskCompleted(id) => format!("Task {id} marked as done"),
            Message::TaskDeleted(id) => format!("Task {id} deleted"),
            Message::TaskNotFound => "task not found".to_string(),
            Message::TasksNotFound => "No tasks found".to_string(),
            Message::TasksHeader => "Tasks".to_string(),
            Message::ConfirmDeleteTask(title) => format!("Delete task '{title}' with all its subtasks and tags?"),
            Message::SubtaskAdded(task_id, id) => format!("Subtask {id} added to task {task_id}"),
            Message::SubtaskToggled(id, true) => format!("Subtask {id} completed"),
            Message::SubtaskToggled(id, false) => format!("Subtask {id} reopened"),
            Message::SubtaskRemoved(id) => format!("Subtask {id} removed"),
            Message::SubtaskNotFound => "subtask not found".to_string(),
            Message::TagAdded(tag, task_id) => format!("Tag '{tag}' added to task {task_id}"),
            Message::TagRemoved(tag, task_id) => format!("Tag '{tag}' removed from task {task_id}"),
            Message::TagNotFound => "tag not found".to_string(),

            // === JOURNAL MESSAGES ===
            Message::JournalEntryAdded(date) => format!("Entry added to journal for {date}"),
            Message::JournalEmpty => "Journal is empty".to_string(),
            Message::JournalNoteHeader(id, date, false) => format!("📓 {date} [note {id}]"),
            Message::JournalNoteHeader(id, date, true) => format!("📓 {date} [note {id}] (hidden)"),
            Message::JournalEntryLine(id, time, body) => format!("  {id:>4}  {time}  {body}"),
            Message::JournalNoteHidden(id) => format!("Journal note {id} hidden"),
            Message::JournalNoteRestored(id) => format!("Journal note {id} restored"),
            Message::JournalNoteNotFound => "journal note not found".to_string(),
            Message::JournalEntryUpdated(id) => format!("Journal entry {id} updated"),
            Message::JournalEntryDeleted(id) => format!("Journal entry {id} deleted"),
            Message::JournalEntryNotFound => "journal entry not found".to_string(),

            // === FOCUS MESSAGES ===
            Message::FocusStarted(id, planned) => format!("Focus session {id} started ({planned})"),
            Message::FocusCompleted(id) => format!("Focus session {id} completed"),
            Message::FocusSessionNotFound => "focus session not found or already completed".to_string(),
            Message::FocusHistoryHeader(task_id) => format!("Focus sessions for task {task_id}"),
            Message::FocusHistoryEmpty(task_id) => format!("No focus sessions recorded for task {task_id}"),
            Message::FocusStatsHeader(days) => format!("Focus completions over the last {days} day(s)"),
            Message::FocusTodayCount(count) => format!("Completed today: {count}"),
            Message::FocusStreak(days) => format!("Current streak: {days} day(s)"),
            Message::FocusDayCount(date, count) => format!("  {date}  {count}"),
            Message::FocusRemaining(id, left) => format!("Focus session {id}: {left} remaining"),
            Message::FocusUnassignedHeader => "Focus sessions without a task".to_string(),
            Message::FocusNoCompletions => "No completed focus sessions in this period".to_string(),

            // === EXPORT MESSAGES ===
            Message::DataExported(path) => format!("Data exported to {path}"),

            // === BACKUP MESSAGES ===
            Message::BackupCreated(path) => format!("Backup created: {path}"),
            Message::BackupAlreadyExists(date) => format!("Backup for {date} already exists"),
            Message::BackupsPruned(count) => format!("Removed {count} expired backup(s)"),
            Message::BackupDisabled => "Backups are disabled in the configuration".to_string(),
            Message::AutoBackupFailed(error) => format!("Automatic backup failed: {error}"),

            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved".to_string(),
            Message::ConfigParseError(error) => format!("Failed to parse configuration: {error}"),
            Message::PromptBackupEnabled => "Create a daily backup automatically?".to_string(),
            Message::PromptRetentionDays => "Days to keep backups".to_string(),
            Message::PromptFocusMinutes => "Default focus session length (minutes)".to_string(),
            Message::PromptDefaultSort => "Default task order".to_string(),

            // === GENERAL MESSAGES ===
            Message::OperationCancelled => "Operation cancelled".to_string(),
            Message::InvalidDate(value) => format!("Invalid date '{value}', expected YYYY-MM-DD"),
            Message::StorageFailed(error) => format!("Storage error: {error}"),
            Message::ConfigurationFailed(error) => format!("Configuration error: {error}"),
            Message::ValidationFailed(error) => format!("Invalid input: {error}"),
            Message::ConflictDetected(error) => format!("Conflict: {error}"),
        };
        f.write_str(&text)
    }
}
