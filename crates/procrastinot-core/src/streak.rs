//! Consecutive-day activity streak.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Local, NaiveDate};

use crate::models::{PomodoroSession, Task};
use crate::window::local_day;

/// Scan horizon. A streak can never be reported above this, and sparse
/// histories don't trigger an unbounded walk.
const MAX_STREAK_DAYS: i64 = 365;

/// Number of consecutive local calendar days, counting backward from today,
/// with at least one qualifying activity: a completed task (keyed by
/// `completedAt`, falling back to `updatedAt`) or a completed pomodoro
/// session (keyed by `createdAt`).
///
/// Today is special-cased: a day with no activity ends the scan, except when
/// that day is today itself. A user who hasn't logged anything yet this
/// morning keeps yesterday's streak instead of dropping to zero at midnight.
pub fn activity_streak(tasks: &[Task], sessions: &[PomodoroSession], now: DateTime<Local>) -> u32 {
    let active_days = qualifying_days(tasks, sessions);
    if active_days.is_empty() {
        return 0;
    }

    let today = now.date_naive();
    let mut streak = 0u32;

    for offset in 0..MAX_STREAK_DAYS {
        let day = today - Duration::days(offset);
        if active_days.contains(&day) {
            streak += 1;
        } else if offset > 0 {
            break;
        }
    }

    streak
}

fn qualifying_days(tasks: &[Task], sessions: &[PomodoroSession]) -> HashSet<NaiveDate> {
    let mut days = HashSet::new();

    for task in tasks {
        if task.is_completed() {
            if let Some(ts) = task.completion_time() {
                days.insert(local_day(ts));
            }
        }
    }

    for session in sessions {
        if session.is_completed() {
            if let Some(ts) = session.created_at {
                days.insert(local_day(ts));
            }
        }
    }

    days
}
