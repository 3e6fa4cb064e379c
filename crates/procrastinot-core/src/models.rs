//! Typed mirrors of the backend's JSON documents.
//!
//! The backend stores Mongo-style documents: `_id` identifiers, camelCase
//! field names, ISO-8601 timestamps. Optional fields default to `None` so a
//! record missing a timestamp deserializes instead of failing the whole
//! fetch; unrecognized status strings land in `Unknown`, which never counts
//! as completed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    ReviseAgain,
    Unknown,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Completed => "Completed",
            TaskStatus::ReviseAgain => "Revise Again",
            TaskStatus::Unknown => "Unknown",
        }
    }
}

impl From<String> for TaskStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Pending" => TaskStatus::Pending,
            "In Progress" => TaskStatus::InProgress,
            "Completed" => TaskStatus::Completed,
            "Revise Again" => TaskStatus::ReviseAgain,
            _ => TaskStatus::Unknown,
        }
    }
}

impl From<TaskStatus> for String {
    fn from(value: TaskStatus) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
}

impl Task {
    /// Timestamp a completed task is keyed by: `completedAt` when set,
    /// `updatedAt` otherwise. `None` means the record carries neither and is
    /// excluded from windowed counts.
    pub fn completion_time(&self) -> Option<DateTime<Utc>> {
        self.completed_at.or(self.updated_at)
    }

    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SessionStatus {
    #[default]
    InProgress,
    Paused,
    Completed,
    Unknown,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::InProgress => "In Progress",
            SessionStatus::Paused => "Paused",
            SessionStatus::Completed => "Completed",
            SessionStatus::Unknown => "Unknown",
        }
    }
}

impl From<String> for SessionStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "In Progress" => SessionStatus::InProgress,
            "Paused" => SessionStatus::Paused,
            "Completed" => SessionStatus::Completed,
            _ => SessionStatus::Unknown,
        }
    }
}

impl From<SessionStatus> for String {
    fn from(value: SessionStatus) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PomodoroSession {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub status: SessionStatus,
    /// Planned/actual session length in seconds.
    #[serde(default)]
    pub duration: i64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, rename = "task")]
    pub task_id: Option<String>,
}

impl PomodoroSession {
    pub fn is_completed(&self) -> bool {
        self.status == SessionStatus::Completed
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
}
