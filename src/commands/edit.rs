use super::parse_date;
use crate::{
    db::{db::Db, tasks::Tasks},
    libs::{
        messages::Message,
        task::{Priority, TaskStatus},
    },
    msg_success,
};
use anyhow::Result;
use clap::Args;

/// Changes the task's own fields; options left out keep their value.
#[derive(Debug, Args)]
pub struct EditArgs {
    /// Task id
    id: i64,

    #[arg(long)]
    title: Option<String>,

    #[arg(short, long)]
    description: Option<String>,

    #[arg(short, long, value_enum)]
    priority: Option<Priority>,

    #[arg(short, long, value_enum)]
    status: Option<TaskStatus>,

    /// Due date (YYYY-MM-DD or "today")
    #[arg(long, conflicts_with = "clear_due")]
    due: Option<String>,

    /// Remove the due date
    #[arg(long)]
    clear_due: bool,
}

pub fn cmd(db: &Db, args: EditArgs) -> Result<()> {
    let tasks = Tasks::new(db)?;
    let mut task = tasks.get_by_id(args.id)?;

    if let Some(title) = args.title {
        task.title = title;
    }
    if let Some(description) = args.description {
        task.description = Some(description);
    }
    if let Some(priority) = args.priority {
        task.priority = priority;
    }
    if let Some(status) = args.status {
        task.status = status;
    }
    if let Some(due) = &args.due {
        task.due_date = Some(parse_date(due)?);
    }
    if args.clear_due {
        task.due_date = None;
    }

    tasks.update(&task)?;
    msg_success!(Message::TaskUpdated(args.id));
    Ok(())
}
