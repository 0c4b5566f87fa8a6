//! Markdown and JSON export of loaded tasks and journal notes.
//!
//! Rendering is a pure function of the data passed in; [`Exporter::export`]
//! only adds writing the result to a file or stdout.
//!
//! ```rust
//! use todo_app::libs::export::{Exporter, ExportFormat};
//! use todo_app::libs::task::Task;
//!
//! let exporter = Exporter::new(ExportFormat::Markdown, None);
//! let doc = exporter.render(&[Task::new("Ship it")], None).unwrap();
//! assert!(doc.starts_with("# Tasks"));
//! ```

use crate::libs::journal::JournalNote;
use crate::libs::task::Task;
use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Markdown,
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Markdown => "md",
            ExportFormat::Json => "json",
        }
    }
}

#[derive(Debug, Serialize)]
struct ExportDocument<'a> {
    exported_at: NaiveDateTime,
    tasks: &'a [Task],
    #[serde(skip_serializing_if = "Option::is_none")]
    journal: Option<&'a [JournalNote]>,
}

pub struct Exporter {
    format: ExportFormat,
    output_path: Option<PathBuf>,
}

impl Exporter {
    pub fn new(format: ExportFormat, output_path: Option<PathBuf>) -> Self {
        Self { format, output_path }
    }

    pub fn render(&self, tasks: &[Task], notes: Option<&[JournalNote]>) -> Result<String> {
        match self.format {
            ExportFormat::Markdown => Ok(render_markdown(tasks, notes)),
            ExportFormat::Json => {
                let document = ExportDocument {
                    exported_at: Local::now().naive_local(),
                    tasks,
                    journal: notes,
                };
                Ok(serde_json::to_string_pretty(&document)?)
            }
        }
    }

    /// Writes the rendered document and returns where it went; `None` means
    /// stdout.
    pub fn export(&self, tasks: &[Task], notes: Option<&[JournalNote]>) -> Result<Option<PathBuf>> {
        let document = self.render(tasks, notes)?;
        match &self.output_path {
            Some(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
                }
                fs::write(path, document).with_context(|| format!("write {}", path.display()))?;
                Ok(Some(path.clone()))
            }
            None => {
                println!("{document}");
                Ok(None)
            }
        }
    }
}

fn render_markdown(tasks: &[Task], notes: Option<&[JournalNote]>) -> String {
    let mut out = String::from("# Tasks\n\n");
    if tasks.is_empty() {
        out.push_str("_No tasks._\n");
    }
    for task in tasks {
        let check = if task.is_done() { "x" } else { " " };
        let _ = write!(out, "- [{check}] **{}** ({}, {})", task.title, task.status, task.priority);
        if let Some(due) = task.due_date {
            let _ = write!(out, " due {due}");
        }
        if !task.tags.is_empty() {
            let tags: Vec<String> = task.tags.iter().map(|t| format!("#{t}")).collect();
            let _ = write!(out, " {}", tags.join(" "));
        }
        out.push('\n');
        if let Some(description) = task.description.as_deref().filter(|d| !d.trim().is_empty()) {
            let _ = writeln!(out, "  {description}");
        }
        for subtask in &task.subtasks {
            let check = if subtask.completed { "x" } else { " " };
            let _ = writeln!(out, "  - [{check}] {}", subtask.title);
        }
    }

    if let Some(notes) = notes {
        out.push_str("\n# Journal\n");
        for note in notes {
            let _ = writeln!(out, "\n## {}\n", note.date);
            for entry in &note.entries {
                let _ = writeln!(out, "- {} {}", entry.created_at.format("%H:%M"), entry.body);
            }
        }
    }
    out
}
