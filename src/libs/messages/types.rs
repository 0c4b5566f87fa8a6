#[derive(Debug, Clone)]
pub enum Message {
    // === TASK MESSAGES ===
    TaskCreated(i64),
    TaskUpdated(i64),
    TaskCompleted(i64),
    TaskDeleted(i64),
    TaskNotFound,
    TasksNotFound,
    TasksHeader,
    ConfirmDeleteTask(String), // title
    SubtaskAdded(i64, i64),    // task id, subtask id
    SubtaskToggled(i64, bool), // subtask id, completed
    SubtaskRemoved(i64),
    SubtaskNotFound,
    TagAdded(String, i64),   // tag, task id
    TagRemoved(String, i64), // tag, task id
    TagNotFound,

    // === JOURNAL MESSAGES ===
    JournalEntryAdded(String), // date
    JournalEmpty,
    JournalNoteHeader(i64, String, bool), // note id, date, hidden
    JournalEntryLine(i64, String, String), // entry id, HH:MM, body
    JournalNoteHidden(i64),
    JournalNoteRestored(i64),
    JournalNoteNotFound,
    JournalEntryUpdated(i64),
    JournalEntryDeleted(i64),
    JournalEntryNotFound,

    // === FOCUS MESSAGES ===
    FocusStarted(i64, String), // session id, planned MM:SS
    FocusCompleted(i64),
    FocusSessionNotFound,
    FocusHistoryHeader(i64),
    FocusHistoryEmpty(i64),
    FocusStatsHeader(u32), // window days
    FocusTodayCount(u32),
    FocusStreak(u32),
    FocusDayCount(String, u32), // date, completions
    FocusRemaining(i64, String), // session id, MM:SS left
    FocusUnassignedHeader,
    FocusNoCompletions,

    // === EXPORT MESSAGES ===
    DataExported(String), // path

    // === BACKUP MESSAGES ===
    BackupCreated(String),       // path
    BackupAlreadyExists(String), // date
    BackupsPruned(usize),
    BackupDisabled,
    AutoBackupFailed(String), // error

    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigParseError(String),
    PromptBackupEnabled,
    PromptRetentionDays,
    PromptFocusMinutes,
    PromptDefaultSort,

    // === GENERAL MESSAGES ===
    OperationCancelled,
    InvalidDate(String),
    StorageFailed(String),
    ConfigurationFailed(String),
    ValidationFailed(String),
    ConflictDetected(String),
}
