use crate::{
    db::{db::Db, tasks::Tasks},
    libs::messages::Message,
    msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct SubtaskArgs {
    #[command(subcommand)]
    command: SubtaskCommand,
}

#[derive(Debug, Subcommand)]
enum SubtaskCommand {
    /// Add a subtask to a task
    Add {
        /// Parent task id
        task_id: i64,
        /// Subtask title
        title: String,
    },
    /// Flip the completion flag of a subtask
    Toggle { task_id: i64, subtask_id: i64 },
    /// Remove a subtask
    Remove { task_id: i64, subtask_id: i64 },
}

pub fn cmd(db: &Db, args: SubtaskArgs) -> Result<()> {
    let tasks = Tasks::new(db)?;
    match args.command {
        SubtaskCommand::Add { task_id, title } => {
            let id = tasks.add_subtask(task_id, &title)?;
            msg_success!(Message::SubtaskAdded(task_id, id));
        }
        SubtaskCommand::Toggle { task_id, subtask_id } => {
            let completed = tasks.toggle_subtask(task_id, subtask_id)?;
            msg_success!(Message::SubtaskToggled(subtask_id, completed));
        }
        SubtaskCommand::Remove { task_id, subtask_id } => {
            tasks.remove_subtask(task_id, subtask_id)?;
            msg_success!(Message::SubtaskRemoved(subtask_id));
        }
    }
    Ok(())
}
