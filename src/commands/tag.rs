use crate::{
    db::{db::Db, tasks::Tasks},
    libs::messages::Message,
    msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct TagArgs {
    #[command(subcommand)]
    command: TagCommand,
}

#[derive(Debug, Subcommand)]
enum TagCommand {
    /// Attach a tag to a task; adding an existing tag does nothing
    Add { task_id: i64, tag: String },
    /// Detach a tag from a task
    Remove { task_id: i64, tag: String },
}

pub fn cmd(db: &Db, args: TagArgs) -> Result<()> {
    let tasks = Tasks::new(db)?;
    match args.command {
        TagCommand::Add { task_id, tag } => {
            tasks.add_tag(task_id, &tag)?;
            msg_success!(Message::TagAdded(tag, task_id));
        }
        TagCommand::Remove { task_id, tag } => {
            tasks.remove_tag(task_id, &tag)?;
            msg_success!(Message::TagRemoved(tag, task_id));
        }
    }
    Ok(())
}
