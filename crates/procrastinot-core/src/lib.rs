#![deny(clippy::all)]

//! Core library for procrastinot: dashboard statistics, streak computation,
//! and activity feeds derived from backend task and pomodoro records.
//!
//! All aggregation is pure and clock-injected; only the `get_*` boundary
//! operations below touch the network and read `Local::now()`, once per
//! call, before handing off to the computation layer.

pub mod client;
mod daily;
mod feed;
pub mod models;
mod stats;
mod streak;
pub mod window;

pub use client::{ApiClient, ApiError, DashboardInputs, LoginResponse};
pub use daily::*;
pub use feed::*;
pub use stats::*;
pub use streak::*;

use std::time::Instant;

use chrono::Local;
use serde::Serialize;

use crate::models::UserProfile;
use crate::window::Timeframe;

pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[derive(Debug, Clone, Default)]
pub struct DashboardOptions {
    /// Activity feed length; `None` means [`DEFAULT_FEED_LIMIT`].
    pub feed_limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub user: UserProfile,
    pub stats: DashboardStats,
    pub recent_activity: Vec<ActivityEntry>,
    pub processing_time_ms: u32,
}

/// Fetch a user's records and compute the full dashboard view.
pub async fn get_dashboard(
    client: &ApiClient,
    user_id: &str,
    options: DashboardOptions,
) -> Result<Dashboard, ApiError> {
    let start = Instant::now();

    let inputs = client.fetch_dashboard_inputs(user_id).await?;
    let now = Local::now();

    let stats = dashboard_stats(&inputs.tasks, &inputs.sessions, now);
    let recent_activity = build_activity_feed(
        &inputs.tasks,
        &inputs.sessions,
        options.feed_limit.unwrap_or(DEFAULT_FEED_LIMIT),
        now,
    );

    Ok(Dashboard {
        user: inputs.user,
        stats,
        recent_activity,
        processing_time_ms: start.elapsed().as_millis() as u32,
    })
}

/// Fetch a user's sessions and compute the pomodoro rollup for a timeframe.
pub async fn get_focus_report(
    client: &ApiClient,
    user_id: &str,
    timeframe: Timeframe,
) -> Result<FocusReport, ApiError> {
    let sessions = client.fetch_sessions(user_id).await?;
    Ok(focus_report(&sessions, timeframe, Local::now()))
}

/// Fetch a user's records and build the daily activity graph export.
pub async fn get_activity_graph(
    client: &ApiClient,
    user_id: &str,
) -> Result<ActivityGraph, ApiError> {
    let (tasks, sessions) = tokio::try_join!(
        client.fetch_tasks(user_id),
        client.fetch_sessions(user_id),
    )?;
    Ok(build_activity_graph(&tasks, &sessions, Local::now()))
}
