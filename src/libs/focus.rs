//! Focus (Pomodoro) session values and the time arithmetic on them.

use chrono::{Duration, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FocusSession {
    pub id: Option<i64>,
    /// `None` when the session is not tied to a task.
    pub task_id: Option<i64>,
    /// Planned length of the session.
    #[serde(with = "duration_secs")]
    pub duration: Duration,
    pub started_at: NaiveDateTime,
    /// Set once on completion; never cleared afterwards.
    pub completed_at: Option<NaiveDateTime>,
}

impl FocusSession {
    /// A session starting now.
    pub fn new(task_id: Option<i64>, duration: Duration) -> Self {
        Self::start_at(task_id, duration, Local::now().naive_local())
    }

    pub fn start_at(task_id: Option<i64>, duration: Duration, started_at: NaiveDateTime) -> Self {
        FocusSession {
            id: None,
            // Id 0 means "no task".
            task_id: task_id.filter(|id| *id != 0),
            duration,
            started_at,
            completed_at: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Time spent so far, clamped to `[0, duration]`.
    pub fn elapsed(&self, now: NaiveDateTime) -> Duration {
        let planned = self.duration.max(Duration::zero());
        (now - self.started_at).clamp(Duration::zero(), planned)
    }

    /// Time left, never negative.
    pub fn remaining(&self, now: NaiveDateTime) -> Duration {
        (self.duration - self.elapsed(now)).max(Duration::zero())
    }

    pub fn ends_at(&self) -> NaiveDateTime {
        self.started_at + self.duration
    }
}

/// Consecutive days with at least one completion, counted back from
/// `today`. A day without completions yet does not break a streak that
/// ran through yesterday.
pub fn current_streak(completions: &BTreeMap<NaiveDate, u32>, today: NaiveDate) -> u32 {
    let has_completion = |day: NaiveDate| completions.get(&day).is_some_and(|count| *count > 0);

    let mut day = if has_completion(today) {
        today
    } else {
        match today.pred_opt() {
            Some(yesterday) => yesterday,
            None => return 0,
        }
    };

    let mut streak = 0;
    while has_completion(day) {
        streak += 1;
        match day.pred_opt() {
            Some(previous) => day = previous,
            None => break,
        }
    }
    streak
}

mod duration_secs {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(duration.num_seconds())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = i64::deserialize(deserializer)?;
        Ok(Duration::seconds(secs))
    }
}
