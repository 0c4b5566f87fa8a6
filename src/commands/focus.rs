//! Focus session command: start, complete, and review Pomodoro-style
//! sessions.

use crate::{
    db::{db::Db, focus::FocusSessions},
    libs::{
        config::Config,
        focus::{current_streak, FocusSession},
        formatter::format_clock,
        messages::Message,
        view::View,
    },
    msg_info, msg_print, msg_success,
};
use anyhow::Result;
use chrono::{Duration, Local};
use clap::{Args, Subcommand};

/// Days of history considered when computing the streak.
const STREAK_LOOKBACK_DAYS: u32 = 366;

#[derive(Debug, Args)]
pub struct FocusArgs {
    #[command(subcommand)]
    command: FocusCommand,
}

#[derive(Debug, Subcommand)]
enum FocusCommand {
    /// Start a session
    Start {
        /// Task the session works on
        #[arg(short, long)]
        task: Option<i64>,
        /// Planned length; defaults to the configured one
        #[arg(short, long)]
        minutes: Option<u32>,
    },
    /// Mark a running session as completed
    Complete { id: i64 },
    /// Show the time left in a session
    Status { id: i64 },
    /// List the sessions of a task, newest first; 0 lists sessions without a task
    History { task_id: i64 },
    /// Completion counts per day
    Stats {
        #[arg(short, long, default_value_t = 7)]
        days: u32,
    },
}

pub fn cmd(db: &Db, config: &Config, args: FocusArgs) -> Result<()> {
    let sessions = FocusSessions::new(db)?;
    match args.command {
        FocusCommand::Start { task, minutes } => {
            let minutes = minutes.unwrap_or_else(|| config.focus_minutes());
            let session = FocusSession::new(task, Duration::minutes(i64::from(minutes)));
            let id = sessions.create(&session)?;
            msg_success!(Message::FocusStarted(id, format_clock(&session.duration)));
        }
        FocusCommand::Complete { id } => {
            sessions.complete(id)?;
            msg_success!(Message::FocusCompleted(id));
        }
        FocusCommand::Status { id } => {
            let session = sessions.get_by_id(id)?;
            if session.is_completed() {
                msg_info!(Message::FocusCompleted(id));
            } else {
                let left = session.remaining(Local::now().naive_local());
                msg_print!(Message::FocusRemaining(id, format_clock(&left)));
            }
        }
        FocusCommand::History { task_id } => {
            if task_id == 0 {
                msg_print!(Message::FocusUnassignedHeader, true);
            } else {
                msg_print!(Message::FocusHistoryHeader(task_id), true);
            }
            let history = sessions.list_by_task(task_id)?;
            if history.is_empty() {
                msg_info!(Message::FocusHistoryEmpty(task_id));
            } else {
                View::focus_sessions(&history);
            }
        }
        FocusCommand::Stats { days } => show_stats(&sessions, days)?,
    }
    Ok(())
}

fn show_stats(sessions: &FocusSessions, days: u32) -> Result<()> {
    let today = Local::now().date_naive();
    let by_day = sessions.completions_by_day_until(days, today)?;
    let history = sessions.completions_by_day_until(STREAK_LOOKBACK_DAYS.max(days), today)?;

    msg_print!(Message::FocusTodayCount(sessions.count_completed_on(today)?));
    msg_print!(Message::FocusStreak(current_streak(&history, today)));
    msg_print!(Message::FocusStatsHeader(days), true);
    if by_day.is_empty() {
        msg_info!(Message::FocusNoCompletions);
        return Ok(());
    }
    for (date, count) in by_day.iter().rev() {
        msg_print!(Message::FocusDayCount(date.to_string(), *count));
    }
    Ok(())
}
