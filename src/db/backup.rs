//! Daily database snapshots with age-based retention.
//!
//! A backup run:
//!
//! 1. creates the backup directory if needed
//! 2. writes `backup-<YYYY-MM-DD>.db` for today unless it already exists
//! 3. removes dated backups older than the retention window
//!
//! The snapshot is produced with `VACUUM INTO` on the live connection into a
//! hidden temporary file that is renamed into place once complete, so a
//! partially written file never appears under a final backup name. Only the
//! snapshot statement itself occupies the connection.
//!
//! Pruning attempts every expired file even when some removals fail; the
//! failures are returned together as [`StoreError::Prune`].

use super::db::Db;
use crate::libs::error::{Context, StoreError, StoreResult};
use chrono::{Days, Local, NaiveDate};
use rusqlite::params;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const BACKUP_PREFIX: &str = "backup-";
const BACKUP_SUFFIX: &str = ".db";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Outcome of a successful backup run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BackupReport {
    /// The snapshot written by this run; `None` when today's file existed.
    pub created: Option<PathBuf>,
    /// Expired backups that were removed.
    pub pruned: Vec<PathBuf>,
}

/// Backs up `db` into `dir` for the current local date and prunes backups
/// older than `retention_days`.
pub fn backup(db: &Db, dir: &Path, retention_days: u32) -> StoreResult<BackupReport> {
    backup_on(db, dir, retention_days, Local::now().date_naive())
}

pub fn backup_on(db: &Db, dir: &Path, retention_days: u32, today: NaiveDate) -> StoreResult<BackupReport> {
    fs::create_dir_all(dir).with_context(|| format!("create backup directory {}", dir.display()))?;

    let target = dir.join(backup_file_name(today));
    let created = if target.exists() {
        debug!(path = %target.display(), "backup for today already exists");
        None
    } else {
        snapshot(db, &target)?;
        info!(path = %target.display(), "backup created");
        Some(target)
    };

    let pruned = prune(dir, retention_days, today)?;
    Ok(BackupReport { created, pruned })
}

/// `backup-YYYY-MM-DD.db`
pub fn backup_file_name(date: NaiveDate) -> String {
    format!("{BACKUP_PREFIX}{}{BACKUP_SUFFIX}", date.format(DATE_FORMAT))
}

/// Extracts the date from a backup file name; `None` for any other name.
pub fn parse_backup_date(file_name: &str) -> Option<NaiveDate> {
    let date = file_name.strip_prefix(BACKUP_PREFIX)?.strip_suffix(BACKUP_SUFFIX)?;
    NaiveDate::parse_from_str(date, DATE_FORMAT).ok()
}

/// Dated backups in `dir`, oldest first.
pub fn list_backups(dir: &Path) -> StoreResult<Vec<(NaiveDate, PathBuf)>> {
    let mut backups = dated_entries(dir)?;
    backups.retain(|(_, path)| path.is_file());
    Ok(backups)
}

/// Every entry in `dir` whose name parses as a backup name, whatever its
/// file type, oldest first.
fn dated_entries(dir: &Path) -> StoreResult<Vec<(NaiveDate, PathBuf)>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("read backup directory {}", dir.display()))? {
        let entry = entry.with_context(|| format!("read backup directory {}", dir.display()))?;
        let path = entry.path();
        let date = path.file_name().and_then(|n| n.to_str()).and_then(parse_backup_date);
        if let Some(date) = date {
            entries.push((date, path));
        }
    }
    entries.sort();
    Ok(entries)
}

fn snapshot(db: &Db, target: &Path) -> StoreResult<()> {
    let file_name = target
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| StoreError::validation(format!("invalid backup path {}", target.display())))?;
    let temp = target.with_file_name(format!(".{file_name}.tmp"));

    // VACUUM INTO refuses to overwrite an existing file.
    if temp.is_file() {
        fs::remove_file(&temp).with_context(|| format!("remove stale {}", temp.display()))?;
    }

    let temp_str = temp
        .to_str()
        .ok_or_else(|| StoreError::validation(format!("backup path is not valid UTF-8: {}", temp.display())))?;

    let result = db
        .conn
        .execute("VACUUM INTO ?1", params![temp_str])
        .with_context(|| format!("snapshot database into {}", temp.display()))
        .and_then(|_| fs::rename(&temp, target).with_context(|| format!("move snapshot to {}", target.display())));

    if result.is_err() && temp.is_file() {
        let _ = fs::remove_file(&temp);
    }
    result
}

fn prune(dir: &Path, retention_days: u32, today: NaiveDate) -> StoreResult<Vec<PathBuf>> {
    let Some(cutoff) = today.checked_sub_days(Days::new(u64::from(retention_days))) else {
        return Ok(Vec::new());
    };

    let mut pruned = Vec::new();
    let mut failures = Vec::new();
    for (date, path) in dated_entries(dir)? {
        if date >= cutoff {
            continue;
        }
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(path = %path.display(), %date, "expired backup removed");
                pruned.push(path);
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to remove expired backup");
                failures.push((path, e));
            }
        }
    }

    if !failures.is_empty() {
        return Err(StoreError::Prune { failures });
    }
    if !pruned.is_empty() {
        info!(count = pruned.len(), retention_days, "expired backups pruned");
    }
    Ok(pruned)
}
