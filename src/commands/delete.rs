use crate::{
    db::{db::Db, tasks::Tasks},
    libs::messages::Message,
    msg_info, msg_success,
};
use anyhow::Result;
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Confirm};

#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Task id
    id: i64,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    yes: bool,
}

/// Deletes a task together with its subtasks and tags after confirmation.
pub fn cmd(db: &Db, args: DeleteArgs) -> Result<()> {
    let tasks = Tasks::new(db)?;
    let task = tasks.get_by_id(args.id)?;

    if !args.yes {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::ConfirmDeleteTask(task.title.clone()).to_string())
            .default(false)
            .interact()?;
        if !confirmed {
            msg_info!(Message::OperationCancelled);
            return Ok(());
        }
    }

    tasks.delete(args.id)?;
    msg_success!(Message::TaskDeleted(args.id));
    Ok(())
}
