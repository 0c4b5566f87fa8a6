//! Focus session repository.
//!
//! Timestamps are stored as local wall-clock time, so per-day aggregation
//! buckets completions by the day the user experienced rather than by UTC
//! boundaries.

use super::db::Db;
use super::migrations::{migrate, Domain};
use super::rows::{query_all, query_one, FromRow};
use crate::libs::error::{Context, Entity, StoreError, StoreResult};
use crate::libs::focus::FocusSession;
use chrono::{Days, Duration, Local, NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection, Row};
use std::collections::BTreeMap;
use tracing::debug;

const INSERT_SESSION: &str = "INSERT INTO focus_sessions (task_id, duration_secs, started_at) VALUES (?1, ?2, ?3)";
// MAX keeps completed_at from landing before started_at.
const COMPLETE_SESSION: &str =
    "UPDATE focus_sessions SET completed_at = MAX(?2, started_at) WHERE id = ?1 AND completed_at IS NULL";
const SELECT_SESSIONS: &str = "SELECT id, task_id, duration_secs, started_at, completed_at FROM focus_sessions";
const COUNT_COMPLETED_ON: &str =
    "SELECT COUNT(*) FROM focus_sessions WHERE completed_at IS NOT NULL AND date(completed_at) = ?1";
const COMPLETIONS_BY_DAY: &str = "SELECT date(completed_at) AS day, COUNT(*) AS completions
    FROM focus_sessions
    WHERE completed_at IS NOT NULL AND date(completed_at) BETWEEN ?1 AND ?2
    GROUP BY day
    ORDER BY day";

impl FromRow for FocusSession {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(FocusSession {
            id: Some(row.get("id")?),
            task_id: row.get("task_id")?,
            duration: Duration::seconds(row.get("duration_secs")?),
            started_at: row.get("started_at")?,
            completed_at: row.get("completed_at")?,
        })
    }
}

struct DayCount {
    day: NaiveDate,
    completions: u32,
}

impl FromRow for DayCount {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(DayCount {
            day: row.get("day")?,
            completions: row.get("completions")?,
        })
    }
}

pub struct FocusSessions<'a> {
    db: &'a Db,
}

impl<'a> FocusSessions<'a> {
    pub fn new(db: &'a Db) -> StoreResult<Self> {
        migrate(&db.conn, Domain::Focus)?;
        Ok(FocusSessions { db })
    }

    fn conn(&self) -> &Connection {
        &self.db.conn
    }

    pub fn create(&self, session: &FocusSession) -> StoreResult<i64> {
        if session.duration < Duration::zero() {
            return Err(StoreError::validation("focus duration must not be negative"));
        }
        let task_id = session.task_id.filter(|id| *id != 0);

        self.conn()
            .execute(
                INSERT_SESSION,
                params![task_id, session.duration.num_seconds(), session.started_at],
            )
            .context("insert focus session")?;
        let id = self.conn().last_insert_rowid();
        debug!(session_id = id, ?task_id, "focus session started");
        Ok(id)
    }

    pub fn get_by_id(&self, id: i64) -> StoreResult<FocusSession> {
        let session: Option<FocusSession> = query_one(
            self.conn(),
            &format!("{SELECT_SESSIONS} WHERE id = ?1"),
            params![id],
            &format!("select focus session {id}"),
        )?;
        session.ok_or_else(|| StoreError::not_found(Entity::FocusSession, id))
    }

    /// Marks the session completed now. A session can be completed once; a
    /// second call fails with `NotFound`.
    pub fn complete(&self, id: i64) -> StoreResult<()> {
        self.complete_at(id, Local::now().naive_local())
    }

    pub fn complete_at(&self, id: i64, now: NaiveDateTime) -> StoreResult<()> {
        let affected = self
            .conn()
            .execute(COMPLETE_SESSION, params![id, now])
            .with_context(|| format!("complete focus session {id}"))?;
        if affected == 0 {
            return Err(StoreError::not_found(Entity::FocusSession, id));
        }
        debug!(session_id = id, "focus session completed");
        Ok(())
    }

    /// Sessions logged against `task_id`, most recent start first. Task id
    /// 0 selects the sessions not tied to any task.
    pub fn list_by_task(&self, task_id: i64) -> StoreResult<Vec<FocusSession>> {
        let stored_id = Some(task_id).filter(|id| *id != 0);
        query_all(
            self.conn(),
            &format!("{SELECT_SESSIONS} WHERE task_id IS ?1 ORDER BY started_at DESC, id DESC"),
            params![stored_id],
            &format!("select focus sessions for task {task_id}"),
        )
    }

    /// Number of sessions completed on the current local date.
    pub fn today_count(&self) -> StoreResult<u32> {
        self.count_completed_on(Local::now().date_naive())
    }

    pub fn count_completed_on(&self, date: NaiveDate) -> StoreResult<u32> {
        self.conn()
            .query_row(COUNT_COMPLETED_ON, params![date], |row| row.get(0))
            .with_context(|| format!("count focus completions on {date}"))
    }

    /// Completions per local day over the trailing `window_days` days,
    /// today included.
    pub fn completions_by_day(&self, window_days: u32) -> StoreResult<BTreeMap<NaiveDate, u32>> {
        self.completions_by_day_until(window_days, Local::now().date_naive())
    }

    pub fn completions_by_day_until(&self, window_days: u32, today: NaiveDate) -> StoreResult<BTreeMap<NaiveDate, u32>> {
        if window_days == 0 {
            return Ok(BTreeMap::new());
        }
        let first_day = today
            .checked_sub_days(Days::new(u64::from(window_days - 1)))
            .unwrap_or(NaiveDate::MIN);

        let rows: Vec<DayCount> = query_all(
            self.conn(),
            COMPLETIONS_BY_DAY,
            params![first_day, today],
            "group focus completions by day",
        )?;
        Ok(rows.into_iter().map(|r| (r.day, r.completions)).collect())
    }
}
