//! Duration formatting for timers and statistics.
//!
//! - [`format_clock`] renders a countdown as `MM:SS`
//! - [`format_duration`] renders accumulated time as `HH:MM`
//!
//! Both pad to two digits, let the leading field grow past 59 (or 99), and
//! render negative durations as zero.
//!
//! ```rust
//! use todo_app::libs::formatter::{format_clock, format_duration};
//! use chrono::Duration;
//!
//! assert_eq!(format_clock(&Duration::seconds(90)), "01:30");
//! assert_eq!(format_duration(&Duration::minutes(150)), "02:30");
//! ```

use chrono::Duration;

/// Renders total seconds as zero-padded `minutes:seconds`; minutes may
/// exceed 59 (an hour is `"60:00"`).
pub fn format_clock(duration: &Duration) -> String {
    let total = duration.num_seconds().max(0);
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// Renders a duration as zero-padded `hours:minutes`.
pub fn format_duration(duration: &Duration) -> String {
    let total = duration.num_minutes().max(0);
    format!("{:02}:{:02}", total / 60, total % 60)
}
