//! Database backup command and the automatic daily backup.

use crate::{
    db::{backup, db::Db},
    libs::{config::Config, data_storage::DataStorage, messages::Message},
    msg_debug, msg_info, msg_success, msg_warning,
};
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct BackupArgs {
    /// Days to keep backups; defaults to the configured retention
    #[arg(short, long)]
    retention_days: Option<u32>,

    /// Backup directory; defaults to the configured one
    #[arg(short, long)]
    dir: Option<PathBuf>,
}

pub fn cmd(db: &Db, config: &Config, args: BackupArgs) -> Result<()> {
    let settings = config.backup();
    let dir = match args.dir {
        Some(dir) => dir,
        None => config.backup_dir(&DataStorage::new()?),
    };
    let retention = args.retention_days.unwrap_or(settings.retention_days);

    let report = backup::backup(db, &dir, retention)?;
    match report.created {
        Some(path) => msg_success!(Message::BackupCreated(path.display().to_string())),
        None => msg_info!(Message::BackupAlreadyExists(chrono::Local::now().date_naive().to_string())),
    }
    if !report.pruned.is_empty() {
        msg_info!(Message::BackupsPruned(report.pruned.len()));
    }
    Ok(())
}

/// Runs today's backup when enabled. Failures are reported as warnings
/// and never fail the command that triggered it.
pub fn auto(db: &Db, config: &Config) {
    let settings = config.backup();
    if !settings.enabled {
        msg_debug!(Message::BackupDisabled);
        return;
    }

    let result = DataStorage::new()
        .map(|storage| config.backup_dir(&storage))
        .and_then(|dir| backup::backup(db, &dir, settings.retention_days));
    match result {
        Ok(report) => {
            if let Some(path) = report.created {
                msg_debug!(Message::BackupCreated(path.display().to_string()));
            }
        }
        Err(e) => msg_warning!(Message::AutoBackupFailed(e.to_string())),
    }
}
