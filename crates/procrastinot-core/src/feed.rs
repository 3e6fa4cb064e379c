//! Unified recent-activity feed.

use chrono::{DateTime, Local, Utc};
use serde::Serialize;

use crate::models::{PomodoroSession, Task, TaskStatus};
use crate::window::TimeWindow;

pub const DEFAULT_FEED_LIMIT: usize = 10;

/// Pending tasks older than this are kept out of the feed so a stale backlog
/// doesn't drown recent activity.
const CREATED_RECENCY_HOURS: i64 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    TaskCompleted,
    PomodoroCompleted,
    TaskCreated,
}

impl ActivityKind {
    pub fn icon(&self) -> &'static str {
        match self {
            ActivityKind::TaskCompleted => "check-circle",
            ActivityKind::PomodoroCompleted => "timer",
            ActivityKind::TaskCreated => "plus-circle",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            ActivityKind::TaskCompleted => "#22c55e",
            ActivityKind::PomodoroCompleted => "#ef4444",
            ActivityKind::TaskCreated => "#3b82f6",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub title: String,
    pub description: String,
    pub timestamp: DateTime<Utc>,
    pub icon: &'static str,
    pub color: &'static str,
}

impl ActivityEntry {
    fn new(
        id: String,
        kind: ActivityKind,
        title: String,
        description: String,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            kind,
            title,
            description,
            timestamp,
            icon: kind.icon(),
            color: kind.color(),
        }
    }
}

/// Merge tasks and sessions into a time-descending feed, truncated to
/// `limit`. Ties are broken by input order (the sort is stable).
pub fn build_activity_feed(
    tasks: &[Task],
    sessions: &[PomodoroSession],
    limit: usize,
    now: DateTime<Local>,
) -> Vec<ActivityEntry> {
    let recent = TimeWindow::last_hours(now, CREATED_RECENCY_HOURS);
    let mut entries: Vec<ActivityEntry> = Vec::new();

    for task in tasks {
        match task.status {
            TaskStatus::Completed => {
                if let Some(ts) = task.completion_time() {
                    entries.push(ActivityEntry::new(
                        format!("task-{}", task.id),
                        ActivityKind::TaskCompleted,
                        task.title.clone(),
                        "Completed task".to_string(),
                        ts,
                    ));
                }
            }
            TaskStatus::Pending => {
                if let Some(ts) = task.created_at {
                    if recent.contains(ts) {
                        entries.push(ActivityEntry::new(
                            format!("task-created-{}", task.id),
                            ActivityKind::TaskCreated,
                            task.title.clone(),
                            "Added a new task".to_string(),
                            ts,
                        ));
                    }
                }
            }
            _ => {}
        }
    }

    for session in sessions {
        if !session.is_completed() {
            continue;
        }
        if let Some(ts) = session.created_at {
            let minutes = (session.duration.max(0) as f64 / 60.0).round() as i64;
            entries.push(ActivityEntry::new(
                format!("pomodoro-{}", session.id),
                ActivityKind::PomodoroCompleted,
                "Focus session".to_string(),
                format!("Focused for {minutes} minutes"),
                ts,
            ));
        }
    }

    entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    entries.truncate(limit);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SessionStatus;
    use chrono::{Duration, TimeZone};

    fn anchor() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 6, 15, 18, 0, 0).unwrap()
    }

    fn utc_hours_ago(hours: i64) -> DateTime<Utc> {
        (anchor() - Duration::hours(hours)).with_timezone(&Utc)
    }

    fn completed_task(id: &str, hours_ago: i64) -> Task {
        Task {
            id: id.to_string(),
            title: format!("Task {id}"),
            status: TaskStatus::Completed,
            created_at: Some(utc_hours_ago(hours_ago + 1)),
            updated_at: Some(utc_hours_ago(hours_ago)),
            completed_at: Some(utc_hours_ago(hours_ago)),
            due_date: None,
        }
    }

    fn pending_task(id: &str, created_hours_ago: i64) -> Task {
        Task {
            id: id.to_string(),
            title: format!("Task {id}"),
            status: TaskStatus::Pending,
            created_at: Some(utc_hours_ago(created_hours_ago)),
            updated_at: None,
            completed_at: None,
            due_date: None,
        }
    }

    fn completed_session(id: &str, duration: i64, hours_ago: i64) -> PomodoroSession {
        PomodoroSession {
            id: id.to_string(),
            status: SessionStatus::Completed,
            duration,
            created_at: Some(utc_hours_ago(hours_ago)),
            task_id: None,
        }
    }

    #[test]
    fn empty_inputs_yield_empty_feed() {
        assert!(build_activity_feed(&[], &[], DEFAULT_FEED_LIMIT, anchor()).is_empty());
    }

    #[test]
    fn feed_is_sorted_newest_first_across_categories() {
        let tasks = vec![completed_task("a", 1)];
        let sessions = vec![completed_session("b", 1500, 2)];
        let feed = build_activity_feed(&tasks, &sessions, DEFAULT_FEED_LIMIT, anchor());

        assert_eq!(feed.len(), 2);
        assert_eq!(feed[0].kind, ActivityKind::TaskCompleted);
        assert_eq!(feed[1].kind, ActivityKind::PomodoroCompleted);
    }

    #[test]
    fn pending_recency_filter_is_24_hours() {
        let tasks = vec![pending_task("old", 25), pending_task("fresh", 23)];
        let feed = build_activity_feed(&tasks, &[], DEFAULT_FEED_LIMIT, anchor());

        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].id, "task-created-fresh");
        assert_eq!(feed[0].kind, ActivityKind::TaskCreated);
    }

    #[test]
    fn session_description_embeds_rounded_minutes() {
        let sessions = vec![completed_session("s", 1510, 1)];
        let feed = build_activity_feed(&[], &sessions, DEFAULT_FEED_LIMIT, anchor());
        assert_eq!(feed[0].description, "Focused for 25 minutes");
    }

    #[test]
    fn limit_truncates_after_sorting() {
        let tasks: Vec<Task> = (0..15)
            .map(|i| completed_task(&format!("t{i}"), i))
            .collect();
        let feed = build_activity_feed(&tasks, &[], 5, anchor());

        assert_eq!(feed.len(), 5);
        // Newest (smallest hours-ago) survive the cut.
        assert_eq!(feed[0].id, "task-t0");
        assert_eq!(feed[4].id, "task-t4");
    }

    #[test]
    fn completed_task_without_timestamps_is_skipped() {
        let task = Task {
            id: "bare".to_string(),
            title: "Bare".to_string(),
            status: TaskStatus::Completed,
            created_at: None,
            updated_at: None,
            completed_at: None,
            due_date: None,
        };
        assert!(build_activity_feed(&[task], &[], DEFAULT_FEED_LIMIT, anchor()).is_empty());
    }

    #[test]
    fn non_qualifying_records_are_excluded() {
        let mut revise = completed_task("r", 1);
        revise.status = TaskStatus::ReviseAgain;
        let mut paused = completed_session("p", 1500, 1);
        paused.status = SessionStatus::Paused;

        let feed = build_activity_feed(&[revise], &[paused], DEFAULT_FEED_LIMIT, anchor());
        assert!(feed.is_empty());
    }

    #[test]
    fn entry_metadata_matches_kind() {
        let feed = build_activity_feed(&[completed_task("a", 1)], &[], 10, anchor());
        assert_eq!(feed[0].icon, "check-circle");
        assert_eq!(feed[0].color, "#22c55e");
    }
}
