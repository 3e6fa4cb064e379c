//! HTTP client for the Procrastinot backend.
//!
//! The aggregation engine itself never performs I/O; this module is the
//! record-fetching boundary in front of it. The three dashboard inputs
//! (tasks, sessions, profile) are fetched concurrently and fail together:
//! the engine is never handed a partial set of collections.

use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

use crate::models::{PomodoroSession, Task, UserProfile};

const REQUEST_TIMEOUT_SECS: u64 = 30;
const CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status} for {url}")]
    Status { status: u16, url: String },
    #[error("unauthorized - log in again")]
    Unauthorized,
}

/// Raw collections consumed by the stats engine, fetched as one unit.
#[derive(Debug, Clone)]
pub struct DashboardInputs {
    pub user: UserProfile,
    pub tasks: Vec<Task>,
    pub sessions: Vec<PomodoroSession>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserProfile,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();

        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn fetch_tasks(&self, user_id: &str) -> Result<Vec<Task>, ApiError> {
        self.get_json(&format!("/tasks/user/{user_id}")).await
    }

    pub async fn fetch_sessions(&self, user_id: &str) -> Result<Vec<PomodoroSession>, ApiError> {
        self.get_json(&format!("/pomodoro/user/{user_id}")).await
    }

    pub async fn fetch_profile(&self, user_id: &str) -> Result<UserProfile, ApiError> {
        self.get_json(&format!("/users/{user_id}")).await
    }

    /// Fan-out fetch of the three dashboard inputs. Any single failure fails
    /// the combined fetch; no partial results are surfaced.
    pub async fn fetch_dashboard_inputs(
        &self,
        user_id: &str,
    ) -> Result<DashboardInputs, ApiError> {
        let (user, tasks, sessions) = tokio::try_join!(
            self.fetch_profile(user_id),
            self.fetch_tasks(user_id),
            self.fetch_sessions(user_id),
        )?;

        Ok(DashboardInputs {
            user,
            tasks,
            sessions,
        })
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let url = format!("{}/users/login", self.base_url);
        tracing::debug!(%url, "logging in");

        let response = self
            .http
            .post(&url)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                url,
            });
        }

        Ok(response.json().await?)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "fetching");

        let mut request = self.http.get(&url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                url,
            });
        }

        Ok(response.json::<T>().await?)
    }
}
