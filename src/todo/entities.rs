use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single todo item. Tasks are identified by their name.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
pub struct Task {
    pub task_name: String,
    /// Completed.
    #[serde(default)]
    pub status: bool,
    #[serde(default)]
    pub priority: bool,
    #[serde(default, with = "due_date_ser")]
    pub due_date: Option<NaiveDate>,
}

impl Task {
    pub fn new(task_name: impl Into<String>, due_date: Option<NaiveDate>) -> Self {
        Self {
            task_name: task_name.into(),
            status: false,
            priority: false,
            due_date,
        }
    }

    /// Incomplete and due before `today`.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.status && self.due_date.is_some_and(|due| due < today)
    }

    pub fn with_status(self, status: bool) -> Self {
        Self { status, ..self }
    }

    pub fn with_priority(self, priority: bool) -> Self {
        Self { priority, ..self }
    }
}

/// The API stores due dates as timestamps and accepts plain dates. Only the date part is kept and
/// an empty string means there is no due date. A due date that can't be read is dropped so the
/// task itself still shows up.
mod due_date_ser {
    use chrono::NaiveDate;
    use serde::{self, Deserialize, Deserializer, Serializer};
    use tracing::warn;

    use crate::utils::time::{format_date, parse_api_date};

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(date) => serializer.serialize_str(&format_date(*date)),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = Option::<String>::deserialize(deserializer)?;
        match s.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => {
                let date = parse_api_date(s);
                if date.is_none() {
                    warn!("Ignoring malformed due date {s:?}");
                }
                Ok(date)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use chrono::NaiveDate;

    use super::Task;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn due_date_keeps_date_part_of_timestamp() -> Result<()> {
        let task: Task = serde_json::from_str(
            r#"{"task_name":"Read","status":true,"priority":false,"due_date":"2024-07-01T00:00:00.000Z"}"#,
        )?;
        assert_eq!(task.due_date, Some(date(2024, 7, 1)));
        assert!(task.status);
        Ok(())
    }

    #[test]
    fn empty_or_missing_due_date_is_none() -> Result<()> {
        let task: Task = serde_json::from_str(r#"{"task_name":"Walk","due_date":""}"#)?;
        assert_eq!(task.due_date, None);
        let task: Task = serde_json::from_str(r#"{"task_name":"Walk","due_date":null}"#)?;
        assert_eq!(task.due_date, None);
        let task: Task = serde_json::from_str(r#"{"task_name":"Walk"}"#)?;
        assert_eq!(task.due_date, None);
        assert!(!task.priority);
        Ok(())
    }

    #[test]
    fn unreadable_due_date_keeps_the_task() -> Result<()> {
        let task: Task =
            serde_json::from_str(r#"{"task_name":"Walk","status":true,"due_date":"soon"}"#)?;
        assert_eq!(task.task_name, "Walk");
        assert!(task.status);
        assert_eq!(task.due_date, None);
        Ok(())
    }

    #[test]
    fn serializes_plain_date() -> Result<()> {
        let json = serde_json::to_value(Task::new("Walk", Some(date(2024, 7, 1))))?;
        assert_eq!(json["due_date"], "2024-07-01");
        assert_eq!(json["status"], false);
        Ok(())
    }

    #[test]
    fn overdue_only_when_incomplete() {
        let task = Task::new("Walk", Some(date(2024, 7, 1)));
        assert!(task.is_overdue(date(2024, 7, 2)));
        assert!(!task.is_overdue(date(2024, 7, 1)));
        assert!(!task.clone().with_status(true).is_overdue(date(2024, 7, 2)));
        assert!(!Task::new("Walk", None).is_overdue(date(2024, 7, 2)));
    }
}
