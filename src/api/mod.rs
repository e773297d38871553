//! Access to the remote detox API. Everything the application stores lives behind it.
//! [DetoxApi] is the seam the rest of the crate depends on, [http::HttpApi] is the real thing.

pub mod dto;
pub mod http;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::StatusCode;
use thiserror::Error;

use crate::{
    screen_time::{entities::RawDayEntry, entry_form::Submission, limit::Limit},
    todo::entities::Task,
};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid API url {0}")]
    InvalidUrl(String),
    #[error("Failed to call {call}: {source}")]
    Request {
        call: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{call} returned {status}: {message}")]
    Status {
        call: &'static str,
        status: StatusCode,
        message: String,
    },
    #[error("Failed to parse {call} response: {reason}")]
    Decode { call: &'static str, reason: String },
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Status { status, .. } if *status == StatusCode::NOT_FOUND)
    }
}

/// Operations offered by the detox API.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DetoxApi: Send + Sync {
    /// Raw per-day usage, not merged.
    async fn fetch_usage(&self) -> Result<Vec<RawDayEntry>, ApiError>;

    async fn submit_usage(&self, submission: &Submission) -> Result<(), ApiError>;

    /// [None] when the user never stored a limit.
    async fn fetch_limit(&self) -> Result<Option<Limit>, ApiError>;

    async fn update_limit(&self, limit: Limit) -> Result<(), ApiError>;

    async fn list_tasks(&self) -> Result<Vec<Task>, ApiError>;

    async fn create_task(&self, task: &Task) -> Result<(), ApiError>;

    async fn set_task_status(&self, task_name: &str, status: bool) -> Result<(), ApiError>;

    async fn set_task_priority(&self, task_name: &str, priority: bool) -> Result<(), ApiError>;

    async fn delete_task(&self, task_name: &str) -> Result<(), ApiError>;

    async fn edit_task(
        &self,
        old_task_name: &str,
        new_task_name: &str,
        new_due_date: Option<NaiveDate>,
    ) -> Result<(), ApiError>;
}
