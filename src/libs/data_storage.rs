use crate::libs::error::{Context, StoreError, StoreResult};
use serde::Deserialize;
use std::env::var;
use std::fs;
use std::path::{Path, PathBuf};

pub const APP_DIR_NAME: &str = ".todo-app";
pub const BACKUP_DIR_NAME: &str = "backups";

/// Per-user application directory, `<home>/.todo-app`.
#[derive(Deserialize, Clone, Debug)]
pub struct DataStorage {
    base_path: PathBuf,
}

impl DataStorage {
    /// Resolves the application directory from the user's home.
    ///
    /// `HOME` is consulted first, then `USERPROFILE` for Windows shells.
    pub fn new() -> StoreResult<Self> {
        let home = var("HOME")
            .ok()
            .filter(|h| !h.is_empty())
            .or_else(|| var("USERPROFILE").ok().filter(|h| !h.is_empty()))
            .ok_or_else(|| StoreError::Config("home directory is not set".to_string()))?;

        Ok(Self::at(Path::new(&home).join(APP_DIR_NAME)))
    }

    pub fn at(base_path: impl Into<PathBuf>) -> Self {
        Self { base_path: base_path.into() }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Returns the path of `file_name` inside the directory, creating the
    /// directory when it is missing.
    pub fn get_path(&self, file_name: &str) -> StoreResult<PathBuf> {
        if !self.base_path.exists() {
            fs::create_dir_all(&self.base_path).with_context(|| format!("create {}", self.base_path.display()))?;
        }
        Ok(self.base_path.join(file_name))
    }

    pub fn backup_dir(&self) -> PathBuf {
        self.base_path.join(BACKUP_DIR_NAME)
    }
}
