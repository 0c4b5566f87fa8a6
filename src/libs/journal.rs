use crate::libs::error::{StoreError, StoreResult};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// One journal page; at most one exists per calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalNote {
    pub id: i64,
    pub date: NaiveDate,
    pub hidden: bool,
    pub entries: Vec<JournalEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: i64,
    pub note_id: i64,
    pub body: String,
    pub created_at: NaiveDateTime,
}

pub fn validate_body(body: &str) -> StoreResult<()> {
    if body.trim().is_empty() {
        return Err(StoreError::validation("journal entry must not be empty"));
    }
    Ok(())
}
