use crate::{
    db::{db::Db, tasks::Tasks},
    libs::{messages::Message, task::TaskStatus},
    msg_success,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct DoneArgs {
    /// Task id
    id: i64,
}

pub fn cmd(db: &Db, args: DoneArgs) -> Result<()> {
    Tasks::new(db)?.set_status(args.id, TaskStatus::Done)?;
    msg_success!(Message::TaskCompleted(args.id));
    Ok(())
}
