//! Task, subtask and tag values plus the read-time views over them.
//!
//! Sorting and searching operate on already loaded tasks; nothing here
//! touches the database.

use crate::libs::error::{StoreError, StoreResult};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Done,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
        }
    }

    /// Position in the status sort: open work first.
    fn rank(self) -> u8 {
        match self {
            TaskStatus::Pending => 0,
            TaskStatus::InProgress => 1,
            TaskStatus::Done => 2,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "pending" | "todo" => Ok(TaskStatus::Pending),
            "in_progress" | "inprogress" | "doing" => Ok(TaskStatus::InProgress),
            "done" | "completed" => Ok(TaskStatus::Done),
            other => Err(StoreError::validation(format!("unknown task status '{other}'"))),
        }
    }
}

/// Task priority; the discriminant is the stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low = 0,
    Medium = 1,
    High = 2,
    Urgent = 3,
}

impl Priority {
    pub fn as_i64(self) -> i64 {
        self as i64
    }

    pub fn from_i64(value: i64) -> Option<Self> {
        match value {
            0 => Some(Priority::Low),
            1 => Some(Priority::Medium),
            2 => Some(Priority::High),
            3 => Some(Priority::Urgent),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" | "normal" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            "urgent" => Ok(Priority::Urgent),
            other => Err(StoreError::validation(format!("unknown priority '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subtask {
    pub id: Option<i64>,
    pub task_id: Option<i64>,
    pub title: String,
    pub completed: bool,
}

impl Subtask {
    pub fn new(title: &str) -> Self {
        Subtask {
            id: None,
            task_id: None,
            title: title.to_string(),
            completed: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: Priority,
    /// Assigned by the repository on insert and never changed afterwards.
    pub created_at: Option<NaiveDateTime>,
    pub due_date: Option<NaiveDate>,
    pub subtasks: Vec<Subtask>,
    pub tags: Vec<String>,
}

impl Task {
    pub fn new(title: &str) -> Self {
        Task {
            id: None,
            title: title.to_string(),
            description: None,
            status: TaskStatus::Pending,
            priority: Priority::Medium,
            created_at: None,
            due_date: None,
            subtasks: Vec::new(),
            tags: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn with_subtask(mut self, title: &str) -> Self {
        self.subtasks.push(Subtask::new(title));
        self
    }

    pub fn with_tag(mut self, tag: &str) -> Self {
        self.tags.push(tag.to_string());
        self
    }

    /// Checks the caller-supplied fields before they are written.
    pub fn validate(&self) -> StoreResult<()> {
        validate_title(&self.title, "task title")?;
        for subtask in &self.subtasks {
            validate_title(&subtask.title, "subtask title")?;
        }
        for tag in &self.tags {
            validate_tag(tag)?;
        }
        Ok(())
    }

    pub fn is_done(&self) -> bool {
        self.status == TaskStatus::Done
    }

    pub fn completed_subtasks(&self) -> usize {
        self.subtasks.iter().filter(|s| s.completed).count()
    }
}

pub fn validate_title(title: &str, what: &str) -> StoreResult<()> {
    if title.trim().is_empty() {
        return Err(StoreError::validation(format!("{what} must not be empty")));
    }
    Ok(())
}

pub fn validate_tag(tag: &str) -> StoreResult<()> {
    if tag.trim().is_empty() {
        return Err(StoreError::validation("tag must not be empty"));
    }
    Ok(())
}

/// Row selection pushed down to the storage engine.
#[derive(Debug, Clone, Default)]
pub enum TaskFilter {
    #[default]
    All,
    Status(TaskStatus),
    ByIds(Vec<i64>),
}

/// Read-time ordering of a task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum TaskSort {
    /// Creation order.
    #[default]
    Created,
    /// Earliest due date first, undated tasks last.
    Due,
    /// Highest priority first.
    Priority,
    /// Pending, then in progress, then done.
    Status,
}

/// Sorts `tasks` in place. Every mode falls back to the id so the result
/// is deterministic.
pub fn sort_tasks(tasks: &mut [Task], sort: TaskSort) {
    tasks.sort_by(|a, b| compare(a, b, sort).then_with(|| a.id.cmp(&b.id)));
}

fn compare(a: &Task, b: &Task, sort: TaskSort) -> Ordering {
    match sort {
        TaskSort::Created => Ordering::Equal,
        TaskSort::Due => match (a.due_date, b.due_date) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
        TaskSort::Priority => b.priority.cmp(&a.priority),
        TaskSort::Status => a.status.rank().cmp(&b.status.rank()),
    }
}

/// Case-insensitive substring search over title, description and tags.
/// An empty query matches everything.
pub fn search_tasks<'a>(tasks: &'a [Task], query: &str) -> Vec<&'a Task> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return tasks.iter().collect();
    }
    tasks.iter().filter(|task| matches_query(task, &needle)).collect()
}

fn matches_query(task: &Task, needle: &str) -> bool {
    task.title.to_lowercase().contains(needle)
        || task
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(needle))
        || task.tags.iter().any(|t| t.to_lowercase().contains(needle))
}
