use super::focus::FocusSession;
use super::formatter::{format_clock, format_duration};
use super::task::Task;
use prettytable::{row, Table};

pub struct View {}

impl View {
    pub fn tasks(tasks: &[&Task]) {
        let mut table = Table::new();

        table.add_row(row!["ID", "TITLE", "STATUS", "PRIORITY", "DUE", "SUBTASKS", "TAGS"]);
        for task in tasks {
            table.add_row(row![
                task.id.unwrap_or(0),
                task.title,
                task.status,
                task.priority,
                task.due_date.map(|d| d.to_string()).unwrap_or_default(),
                format!("{}/{}", task.completed_subtasks(), task.subtasks.len()),
                task.tags.join(", ")
            ]);
        }
        table.printstd();
    }

    pub fn focus_sessions(sessions: &[FocusSession]) {
        let mut table = Table::new();

        table.add_row(row!["ID", "STARTED", "PLANNED", "COMPLETED", "SPENT"]);
        for session in sessions {
            table.add_row(row![
                session.id.unwrap_or(0),
                session.started_at.format("%Y-%m-%d %H:%M"),
                format_clock(&session.duration),
                session
                    .completed_at
                    .map(|c| c.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|| "-".to_string()),
                session
                    .completed_at
                    .map(|c| format_duration(&(c - session.started_at)))
                    .unwrap_or_else(|| "-".to_string())
            ]);
        }
        table.printstd();
    }
}
