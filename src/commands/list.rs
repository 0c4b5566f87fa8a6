use crate::{
    db::{db::Db, tasks::Tasks},
    libs::{
        config::Config,
        messages::Message,
        task::{search_tasks, TaskFilter, TaskSort, TaskStatus},
        view::View,
    },
    msg_info, msg_print,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Only show tasks with this status
    #[arg(long, value_enum)]
    status: Option<TaskStatus>,

    /// Ordering; defaults to the configured one
    #[arg(long, value_enum)]
    sort: Option<TaskSort>,

    /// Case-insensitive text to look for in titles, descriptions and tags
    #[arg(long)]
    search: Option<String>,
}

pub fn cmd(db: &Db, config: &Config, args: ListArgs) -> Result<()> {
    let filter = args.status.map(TaskFilter::Status).unwrap_or_default();
    let sort = args.sort.unwrap_or_else(|| config.default_sort());
    let tasks = Tasks::new(db)?.list(filter, sort)?;
    let shown = search_tasks(&tasks, args.search.as_deref().unwrap_or_default());

    if shown.is_empty() {
        msg_info!(Message::TasksNotFound);
        return Ok(());
    }

    msg_print!(Message::TasksHeader, true);
    View::tasks(&shown);
    Ok(())
}
