use super::parse_date;
use crate::{
    db::{db::Db, tasks::Tasks},
    libs::{
        messages::Message,
        task::{Priority, Task},
    },
    msg_success,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Task title
    #[arg(required = true)]
    title: String,

    /// Longer description
    #[arg(short, long)]
    description: Option<String>,

    #[arg(short, long, value_enum, default_value = "medium")]
    priority: Priority,

    /// Due date (YYYY-MM-DD or "today")
    #[arg(long)]
    due: Option<String>,

    /// Tag to attach; may be repeated
    #[arg(short, long = "tag")]
    tags: Vec<String>,

    /// Subtask to create; may be repeated
    #[arg(short, long = "subtask")]
    subtasks: Vec<String>,
}

pub fn cmd(db: &Db, args: AddArgs) -> Result<()> {
    let mut task = Task::new(&args.title).with_priority(args.priority);
    if let Some(description) = &args.description {
        task = task.with_description(description);
    }
    if let Some(due) = &args.due {
        task = task.with_due_date(parse_date(due)?);
    }
    task = args.subtasks.iter().fold(task, |task, title| task.with_subtask(title));
    task = args.tags.iter().fold(task, |task, tag| task.with_tag(tag));

    let id = Tasks::new(db)?.create(&task)?;
    msg_success!(Message::TaskCreated(id));
    Ok(())
}
