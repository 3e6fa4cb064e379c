//! Dashboard statistics reduction.
//!
//! Pure functions over already-fetched record slices. Inputs are never
//! mutated and absent optional fields degrade to zero contributions.

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::models::{PomodoroSession, Task, TaskStatus};
use crate::streak::activity_streak;
use crate::window::{TimeWindow, Timeframe};

/// Tasks+sessions needed per level. `level = completed items / 10 + 1`.
const ITEMS_PER_LEVEL: u32 = 10;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub tasks_completed: u32,
    pub today_tasks_completed: u32,
    pub weekly_tasks_completed: u32,
    /// Completed focus time in hours, one decimal.
    pub total_focus_time: f64,
    pub today_focus_time: f64,
    pub total_sessions: u32,
    pub today_sessions: u32,
    pub weekly_sessions: u32,
    pub streak: u32,
    pub level: u32,
    /// Weekly completed/created ratio as a percentage. 100 when nothing was
    /// created this week; not clamped above 100 (a task completed this week
    /// but created earlier can push it past).
    pub productivity_score: u32,
    pub pending_tasks: u32,
    pub in_progress_tasks: u32,
}

/// Reduce raw records into the flat dashboard statistics block.
pub fn dashboard_stats(
    tasks: &[Task],
    sessions: &[PomodoroSession],
    now: DateTime<Local>,
) -> DashboardStats {
    let today = TimeWindow::today(now);
    let week = TimeWindow::last_days(now, 7);

    let mut tasks_completed = 0u32;
    let mut today_tasks_completed = 0u32;
    let mut weekly_tasks_completed = 0u32;
    let mut weekly_tasks_created = 0u32;
    let mut pending_tasks = 0u32;
    let mut in_progress_tasks = 0u32;

    for task in tasks {
        match task.status {
            TaskStatus::Completed => {
                tasks_completed += 1;
                let done_at = task.completion_time();
                if today.contains_opt(done_at) {
                    today_tasks_completed += 1;
                }
                if week.contains_opt(done_at) {
                    weekly_tasks_completed += 1;
                }
            }
            TaskStatus::Pending => pending_tasks += 1,
            TaskStatus::InProgress => in_progress_tasks += 1,
            TaskStatus::ReviseAgain | TaskStatus::Unknown => {}
        }
        if week.contains_opt(task.created_at) {
            weekly_tasks_created += 1;
        }
    }

    let mut total_sessions = 0u32;
    let mut today_sessions = 0u32;
    let mut weekly_sessions = 0u32;
    let mut total_focus_seconds = 0i64;
    let mut today_focus_seconds = 0i64;

    for session in sessions {
        if !session.is_completed() {
            continue;
        }
        total_sessions += 1;
        total_focus_seconds = total_focus_seconds.saturating_add(session.duration.max(0));
        if today.contains_opt(session.created_at) {
            today_sessions += 1;
            today_focus_seconds = today_focus_seconds.saturating_add(session.duration.max(0));
        }
        if week.contains_opt(session.created_at) {
            weekly_sessions += 1;
        }
    }

    let productivity_score = if weekly_tasks_created == 0 {
        100
    } else {
        let ratio = f64::from(weekly_tasks_completed) / f64::from(weekly_tasks_created);
        (ratio * 100.0).round() as u32
    };

    DashboardStats {
        tasks_completed,
        today_tasks_completed,
        weekly_tasks_completed,
        total_focus_time: seconds_to_hours(total_focus_seconds),
        today_focus_time: seconds_to_hours(today_focus_seconds),
        total_sessions,
        today_sessions,
        weekly_sessions,
        streak: activity_streak(tasks, sessions, now),
        level: (tasks_completed + total_sessions) / ITEMS_PER_LEVEL + 1,
        productivity_score,
        pending_tasks,
        in_progress_tasks,
    }
}

/// Pomodoro rollup for a named timeframe. Sessions are windowed by
/// `createdAt`; only completed sessions contribute focus time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusReport {
    pub timeframe: Timeframe,
    /// Sessions started in the window, any status.
    pub sessions_started: u32,
    pub sessions_completed: u32,
    pub focus_seconds: i64,
    pub focus_hours: f64,
    pub average_session_minutes: f64,
}

pub fn focus_report(
    sessions: &[PomodoroSession],
    timeframe: Timeframe,
    now: DateTime<Local>,
) -> FocusReport {
    let window = TimeWindow::timeframe(now, timeframe);

    let mut sessions_started = 0u32;
    let mut sessions_completed = 0u32;
    let mut focus_seconds = 0i64;

    for session in sessions {
        if !window.contains_opt(session.created_at) {
            continue;
        }
        sessions_started += 1;
        if session.is_completed() {
            sessions_completed += 1;
            focus_seconds = focus_seconds.saturating_add(session.duration.max(0));
        }
    }

    let average_session_minutes = if sessions_completed == 0 {
        0.0
    } else {
        round_one_decimal(focus_seconds as f64 / 60.0 / f64::from(sessions_completed))
    };

    FocusReport {
        timeframe,
        sessions_started,
        sessions_completed,
        focus_seconds,
        focus_hours: seconds_to_hours(focus_seconds),
        average_session_minutes,
    }
}

/// Seconds to hours at one decimal, half-up.
fn seconds_to_hours(seconds: i64) -> f64 {
    round_one_decimal(seconds as f64 / 3600.0)
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SessionStatus;
    use chrono::{Duration, TimeZone, Utc};

    fn anchor() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 6, 15, 18, 0, 0).unwrap()
    }

    fn utc_hours_ago(hours: i64) -> DateTime<Utc> {
        (anchor() - Duration::hours(hours)).with_timezone(&Utc)
    }

    fn task(status: TaskStatus, completed_hours_ago: Option<i64>) -> Task {
        let ts = completed_hours_ago.map(utc_hours_ago);
        Task {
            id: "t".to_string(),
            title: "task".to_string(),
            status,
            created_at: ts.map(|t| t - Duration::hours(2)),
            updated_at: ts,
            completed_at: ts,
            due_date: None,
        }
    }

    fn session(status: SessionStatus, duration: i64, created_hours_ago: i64) -> PomodoroSession {
        PomodoroSession {
            id: "s".to_string(),
            status,
            duration,
            created_at: Some(utc_hours_ago(created_hours_ago)),
            task_id: None,
        }
    }

    #[test]
    fn empty_inputs_yield_baseline_stats() {
        let stats = dashboard_stats(&[], &[], anchor());
        assert_eq!(stats.tasks_completed, 0);
        assert_eq!(stats.total_sessions, 0);
        assert_eq!(stats.total_focus_time, 0.0);
        assert_eq!(stats.streak, 0);
        assert_eq!(stats.level, 1);
        assert_eq!(stats.productivity_score, 100);
    }

    #[test]
    fn completed_tasks_are_counted_per_window() {
        let tasks = vec![
            task(TaskStatus::Completed, Some(2)),   // today
            task(TaskStatus::Completed, Some(48)),  // this week, not today
            task(TaskStatus::Completed, Some(200)), // older than a week
            task(TaskStatus::Pending, None),
        ];
        let stats = dashboard_stats(&tasks, &[], anchor());
        assert_eq!(stats.tasks_completed, 3);
        assert_eq!(stats.today_tasks_completed, 1);
        assert_eq!(stats.weekly_tasks_completed, 2);
        assert_eq!(stats.pending_tasks, 1);
    }

    #[test]
    fn task_without_any_timestamp_is_excluded_from_windows() {
        let bare = Task {
            id: "bare".to_string(),
            title: String::new(),
            status: TaskStatus::Completed,
            created_at: None,
            updated_at: None,
            completed_at: None,
            due_date: None,
        };
        let stats = dashboard_stats(&[bare], &[], anchor());
        assert_eq!(stats.tasks_completed, 1);
        assert_eq!(stats.today_tasks_completed, 0);
        assert_eq!(stats.weekly_tasks_completed, 0);
    }

    #[test]
    fn focus_time_rounds_half_up_to_one_decimal() {
        // 5410 s = 1.5027 h -> 1.5
        let sessions = vec![
            session(SessionStatus::Completed, 5410, 2),
            session(SessionStatus::Paused, 9999, 2),
        ];
        let stats = dashboard_stats(&[], &sessions, anchor());
        assert_eq!(stats.total_focus_time, 1.5);
        assert_eq!(stats.today_focus_time, 1.5);
        assert_eq!(stats.total_sessions, 1);
    }

    #[test]
    fn only_completed_sessions_count() {
        let sessions = vec![
            session(SessionStatus::Completed, 1500, 1),
            session(SessionStatus::InProgress, 1500, 1),
            session(SessionStatus::Paused, 1500, 1),
        ];
        let stats = dashboard_stats(&[], &sessions, anchor());
        assert_eq!(stats.total_sessions, 1);
        assert_eq!(stats.today_sessions, 1);
        assert_eq!(stats.weekly_sessions, 1);
    }

    #[test]
    fn session_windows_use_created_at() {
        let sessions = vec![
            session(SessionStatus::Completed, 1500, 2),   // today
            session(SessionStatus::Completed, 1500, 72),  // this week
            session(SessionStatus::Completed, 1500, 300), // older
        ];
        let stats = dashboard_stats(&[], &sessions, anchor());
        assert_eq!(stats.total_sessions, 3);
        assert_eq!(stats.today_sessions, 1);
        assert_eq!(stats.weekly_sessions, 2);
    }

    #[test]
    fn level_advances_every_ten_completed_items() {
        let tasks: Vec<Task> = (0..7).map(|_| task(TaskStatus::Completed, Some(2))).collect();
        let sessions: Vec<PomodoroSession> = (0..3)
            .map(|_| session(SessionStatus::Completed, 1500, 2))
            .collect();
        let stats = dashboard_stats(&tasks, &sessions, anchor());
        assert_eq!(stats.level, 2);

        let stats = dashboard_stats(&tasks[..6], &sessions, anchor());
        assert_eq!(stats.level, 1);
    }

    #[test]
    fn productivity_score_is_completed_over_created() {
        let mut tasks = vec![
            task(TaskStatus::Completed, Some(10)),
            task(TaskStatus::Pending, None),
        ];
        // Pending task created this week.
        tasks[1].created_at = Some(utc_hours_ago(5));
        let stats = dashboard_stats(&tasks, &[], anchor());
        // 1 completed / 2 created = 50
        assert_eq!(stats.productivity_score, 50);
    }

    #[test]
    fn productivity_score_exceeds_hundred_when_backlog_is_cleared() {
        // Two tasks completed this week but created long ago, one task
        // created this week: 2/1 = 200. The formula is deliberately
        // unclamped.
        let old = utc_hours_ago(24 * 30);
        let mut a = task(TaskStatus::Completed, Some(10));
        a.created_at = Some(old);
        let mut b = task(TaskStatus::Completed, Some(20));
        b.created_at = Some(old);
        let mut c = task(TaskStatus::Pending, None);
        c.created_at = Some(utc_hours_ago(5));

        let stats = dashboard_stats(&[a, b, c], &[], anchor());
        assert_eq!(stats.productivity_score, 200);
    }

    #[test]
    fn adding_a_completed_task_never_decreases_totals() {
        let mut tasks = vec![task(TaskStatus::Completed, Some(2))];
        let before = dashboard_stats(&tasks, &[], anchor());
        tasks.push(task(TaskStatus::Completed, Some(3)));
        let after = dashboard_stats(&tasks, &[], anchor());

        assert!(after.tasks_completed > before.tasks_completed);
        assert!(after.level >= before.level);
        assert!(after.weekly_tasks_completed >= before.weekly_tasks_completed);
    }

    #[test]
    fn identical_inputs_produce_identical_output() {
        let tasks = vec![
            task(TaskStatus::Completed, Some(2)),
            task(TaskStatus::InProgress, None),
        ];
        let sessions = vec![session(SessionStatus::Completed, 1500, 4)];
        let a = dashboard_stats(&tasks, &sessions, anchor());
        let b = dashboard_stats(&tasks, &sessions, anchor());
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn focus_report_today_excludes_yesterday() {
        let sessions = vec![
            session(SessionStatus::Completed, 1500, 2),
            session(SessionStatus::Completed, 1500, 30),
            session(SessionStatus::InProgress, 1500, 1),
        ];
        let report = focus_report(&sessions, Timeframe::Today, anchor());
        assert_eq!(report.sessions_started, 2);
        assert_eq!(report.sessions_completed, 1);
        assert_eq!(report.focus_seconds, 1500);
        assert_eq!(report.average_session_minutes, 25.0);
    }

    #[test]
    fn focus_report_empty_window_has_zero_average() {
        let report = focus_report(&[], Timeframe::Week, anchor());
        assert_eq!(report.sessions_started, 0);
        assert_eq!(report.average_session_minutes, 0.0);
        assert_eq!(report.focus_hours, 0.0);
    }

    #[test]
    fn negative_durations_are_ignored() {
        let sessions = vec![session(SessionStatus::Completed, -900, 2)];
        let stats = dashboard_stats(&[], &sessions, anchor());
        assert_eq!(stats.total_focus_time, 0.0);
        assert_eq!(stats.total_sessions, 1);
    }
}
