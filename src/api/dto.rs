use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{screen_time::entities::RawDayEntry, todo::entities::Task};

#[derive(Debug, Deserialize)]
pub struct UsageResponse {
    #[serde(default)]
    pub data: Vec<RawDayEntry>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct LimitBody {
    #[serde(rename = "limitedUsage")]
    pub limited_usage: f64,
}

/// The task list arrives as `{ tasks: [...] }`. Anything other than an array is treated as no
/// tasks at all, and tasks that can't be decoded are skipped.
#[derive(Debug, Deserialize)]
pub struct TasksResponse {
    #[serde(default)]
    pub tasks: serde_json::Value,
}

impl TasksResponse {
    pub fn into_tasks(self) -> Vec<Task> {
        let serde_json::Value::Array(tasks) = self.tasks else {
            warn!("Task list isn't an array, treating it as empty");
            return Vec::new();
        };
        tasks
            .into_iter()
            .filter_map(|v| {
                serde_json::from_value(v)
                    .inspect_err(|e| warn!("Skipping malformed task {e}"))
                    .ok()
            })
            .collect()
    }
}

#[derive(Debug, Serialize)]
pub struct StatusUpdate<'a> {
    pub task_name: &'a str,
    pub status: bool,
}

#[derive(Debug, Serialize)]
pub struct PriorityUpdate<'a> {
    pub task_name: &'a str,
    pub priority: bool,
}

#[derive(Debug, Serialize)]
pub struct TaskKey<'a> {
    pub task_name: &'a str,
}

#[derive(Debug, Serialize)]
pub struct TaskEdit<'a> {
    pub old_task_name: &'a str,
    pub new_task_name: &'a str,
    /// `YYYY-MM-DD` or empty.
    pub new_due_date: String,
}

/// Error bodies carry a human readable `message`.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use chrono::NaiveDate;

    use super::{LimitBody, TasksResponse, UsageResponse};

    #[test]
    fn usage_without_data_is_empty() -> Result<()> {
        let response: UsageResponse = serde_json::from_str("{}")?;
        assert!(response.data.is_empty());
        Ok(())
    }

    #[test]
    fn limit_uses_camel_case() -> Result<()> {
        let body: LimitBody = serde_json::from_str(r#"{"limitedUsage": 5.5}"#)?;
        assert_eq!(body, LimitBody { limited_usage: 5.5 });
        Ok(())
    }

    #[test]
    fn non_array_tasks_are_empty() -> Result<()> {
        let response: TasksResponse = serde_json::from_str(r#"{"tasks": "nope"}"#)?;
        assert!(response.into_tasks().is_empty());
        let response: TasksResponse = serde_json::from_str("{}")?;
        assert!(response.into_tasks().is_empty());

        let response: TasksResponse =
            serde_json::from_str(r#"{"tasks": [{"task_name": "Walk", "due_date": ""}]}"#)?;
        assert_eq!(response.into_tasks().len(), 1);
        Ok(())
    }

    #[test]
    fn bad_task_does_not_hide_the_others() -> Result<()> {
        let response: TasksResponse = serde_json::from_str(
            r#"{"tasks": [
                {"task_name": "A", "due_date": "2024-01-01"},
                {"task_name": "B", "due_date": "soon"},
                {"due_date": "2024-01-02"},
                {"task_name": "C", "priority": true}
            ]}"#,
        )?;

        let tasks = response.into_tasks();

        let names = tasks.iter().map(|v| v.task_name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec!["A", "B", "C"]);
        assert_eq!(tasks[0].due_date, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(tasks[1].due_date, None);
        assert!(tasks[2].priority);
        Ok(())
    }
}
