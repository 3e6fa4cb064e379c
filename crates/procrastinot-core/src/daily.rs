//! Aggregation of activity into per-day contributions.

use std::collections::HashMap;

use chrono::{DateTime, Local, NaiveDate};
use serde::Serialize;

use crate::models::{PomodoroSession, Task};
use crate::window::local_day;

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyActivity {
    pub date: NaiveDate,
    pub tasks_completed: u32,
    pub sessions_completed: u32,
    pub focus_seconds: i64,
    /// 0-4 bucket relative to the most active day, for heat-map rendering.
    pub intensity: u8,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivitySummary {
    pub total_days: u32,
    pub active_days: u32,
    pub tasks_completed: u32,
    pub sessions_completed: u32,
    pub total_focus_seconds: i64,
    pub max_focus_in_single_day: i64,
    pub average_focus_per_active_day: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphMeta {
    pub generated_at: String,
    pub version: String,
    pub date_range_start: Option<NaiveDate>,
    pub date_range_end: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityGraph {
    pub meta: GraphMeta,
    pub summary: ActivitySummary,
    pub days: Vec<DailyActivity>,
}

/// Group qualifying activity by local calendar day, sorted ascending.
pub fn aggregate_daily(tasks: &[Task], sessions: &[PomodoroSession]) -> Vec<DailyActivity> {
    let mut daily_map: HashMap<NaiveDate, DayAccumulator> = HashMap::new();

    for task in tasks {
        if task.is_completed() {
            if let Some(ts) = task.completion_time() {
                daily_map.entry(local_day(ts)).or_default().tasks += 1;
            }
        }
    }

    for session in sessions {
        if session.is_completed() {
            if let Some(ts) = session.created_at {
                let acc = daily_map.entry(local_day(ts)).or_default();
                acc.sessions += 1;
                acc.focus_seconds = acc.focus_seconds.saturating_add(session.duration.max(0));
            }
        }
    }

    let mut days: Vec<DailyActivity> = daily_map
        .into_iter()
        .map(|(date, acc)| DailyActivity {
            date,
            tasks_completed: acc.tasks,
            sessions_completed: acc.sessions,
            focus_seconds: acc.focus_seconds,
            intensity: 0,
        })
        .collect();

    days.sort_by(|a, b| a.date.cmp(&b.date));
    calculate_intensities(&mut days);
    days
}

pub fn summarize(days: &[DailyActivity]) -> ActivitySummary {
    let tasks_completed: u32 = days.iter().map(|d| d.tasks_completed).sum();
    let sessions_completed: u32 = days.iter().map(|d| d.sessions_completed).sum();
    let total_focus_seconds: i64 = days.iter().map(|d| d.focus_seconds).sum();
    let active_days = days
        .iter()
        .filter(|d| d.tasks_completed > 0 || d.sessions_completed > 0)
        .count() as u32;
    let max_focus = days.iter().map(|d| d.focus_seconds).max().unwrap_or(0);

    ActivitySummary {
        total_days: days.len() as u32,
        active_days,
        tasks_completed,
        sessions_completed,
        total_focus_seconds,
        max_focus_in_single_day: max_focus,
        average_focus_per_active_day: if active_days > 0 {
            total_focus_seconds as f64 / f64::from(active_days)
        } else {
            0.0
        },
    }
}

/// Complete export envelope for the daily rollup.
pub fn build_activity_graph(
    tasks: &[Task],
    sessions: &[PomodoroSession],
    now: DateTime<Local>,
) -> ActivityGraph {
    let days = aggregate_daily(tasks, sessions);
    let summary = summarize(&days);

    ActivityGraph {
        meta: GraphMeta {
            generated_at: now.to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            date_range_start: days.first().map(|d| d.date),
            date_range_end: days.last().map(|d| d.date),
        },
        summary,
        days,
    }
}

#[derive(Default)]
struct DayAccumulator {
    tasks: u32,
    sessions: u32,
    focus_seconds: i64,
}

fn calculate_intensities(days: &mut [DailyActivity]) {
    let max_score = days.iter().map(activity_score).fold(0u32, u32::max);
    if max_score == 0 {
        return;
    }

    for day in days.iter_mut() {
        let ratio = f64::from(activity_score(day)) / f64::from(max_score);
        day.intensity = if ratio >= 0.75 {
            4
        } else if ratio >= 0.5 {
            3
        } else if ratio >= 0.25 {
            2
        } else if ratio > 0.0 {
            1
        } else {
            0
        };
    }
}

fn activity_score(day: &DailyActivity) -> u32 {
    day.tasks_completed + day.sessions_completed
}
