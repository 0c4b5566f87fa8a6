//! Application configuration stored as `config.json` in the app directory.
//!
//! Every section is optional; a missing file or section falls back to
//! defaults, so the tool works without ever running `todo init`.
//!
//! ```json
//! {
//!   "backup": { "enabled": true, "retention_days": 7 },
//!   "tasks": { "default_sort": "priority" },
//!   "focus": { "duration_minutes": 25 }
//! }
//! ```

use super::data_storage::DataStorage;
use super::error::StoreError;
use super::task::TaskSort;
use crate::libs::messages::Message;
use anyhow::{Context, Result};
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "config.json";

pub const DEFAULT_RETENTION_DAYS: u32 = 7;
pub const DEFAULT_FOCUS_MINUTES: u32 = 25;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct BackupConfig {
    /// Run a backup automatically after each command (at most one per day).
    pub enabled: bool,
    pub retention_days: u32,
    /// Defaults to `<app dir>/backups`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            retention_days: DEFAULT_RETENTION_DAYS,
            directory: None,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct TaskConfig {
    #[serde(default)]
    pub default_sort: TaskSort,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FocusConfig {
    pub duration_minutes: u32,
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            duration_minutes: DEFAULT_FOCUS_MINUTES,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup: Option<BackupConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tasks: Option<TaskConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus: Option<FocusConfig>,
}

impl Config {
    /// Reads the configuration from the app directory.
    pub fn read() -> Result<Self> {
        Self::read_from(&Self::path()?)
    }

    pub fn read_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let config = serde_json::from_str(&contents)
            .map_err(|e| StoreError::Config(Message::ConfigParseError(e.to_string()).to_string()))?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
        Ok(())
    }

    pub fn path() -> Result<PathBuf> {
        Ok(DataStorage::new()?.get_path(CONFIG_FILE_NAME)?)
    }

    pub fn backup(&self) -> BackupConfig {
        self.backup.clone().unwrap_or_default()
    }

    pub fn default_sort(&self) -> TaskSort {
        self.tasks.as_ref().map(|t| t.default_sort).unwrap_or_default()
    }

    pub fn focus_minutes(&self) -> u32 {
        self.focus.as_ref().map(|f| f.duration_minutes).unwrap_or(DEFAULT_FOCUS_MINUTES)
    }

    /// Resolved backup directory: the configured one or `<app dir>/backups`.
    pub fn backup_dir(&self, storage: &DataStorage) -> PathBuf {
        self.backup().directory.unwrap_or_else(|| storage.backup_dir())
    }

    /// Interactive setup starting from the current values.
    pub fn init() -> Result<Self> {
        let mut config = Self::read()?;
        let theme = ColorfulTheme::default();

        let current = config.backup();
        let enabled = Confirm::with_theme(&theme)
            .with_prompt(Message::PromptBackupEnabled.to_string())
            .default(current.enabled)
            .interact()?;
        let retention_days: u32 = Input::with_theme(&theme)
            .with_prompt(Message::PromptRetentionDays.to_string())
            .default(current.retention_days)
            .interact_text()?;
        config.backup = Some(BackupConfig {
            enabled,
            retention_days,
            directory: current.directory,
        });

        let sorts = [TaskSort::Created, TaskSort::Due, TaskSort::Priority, TaskSort::Status];
        let labels = ["creation order", "due date", "priority", "status"];
        let selected = sorts.iter().position(|s| *s == config.default_sort()).unwrap_or(0);
        let choice = Select::with_theme(&theme)
            .with_prompt(Message::PromptDefaultSort.to_string())
            .items(&labels)
            .default(selected)
            .interact()?;
        config.tasks = Some(TaskConfig {
            default_sort: sorts[choice],
        });

        let duration_minutes: u32 = Input::with_theme(&theme)
            .with_prompt(Message::PromptFocusMinutes.to_string())
            .default(config.focus_minutes())
            .interact_text()?;
        config.focus = Some(FocusConfig { duration_minutes });

        Ok(config)
    }
}
