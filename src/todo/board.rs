use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;
use tracing::{error, info};

use crate::{
    api::{ApiError, DetoxApi},
    state::snapshot::Snapshot,
    utils::clock::Clock,
};

use super::{entities::Task, ordering::sort_tasks};

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("Please enter a task name.")]
    EmptyName,
    #[error("A task named \"{0}\" already exists.")]
    DuplicateName(String),
    #[error("Due date {0} cannot be in the past.")]
    DueDateInPast(NaiveDate),
    #[error("No task named \"{0}\".")]
    NotFound(String),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// The todo list. Every change is validated first, then sent to the API, and only applied locally
/// once the API accepted it, so a failure at any point leaves the list as it was. The list is
/// re-sorted as a whole after each change.
pub struct TaskBoard<A: DetoxApi> {
    api: A,
    clock: Box<dyn Clock>,
    tasks: Snapshot<Vec<Task>>,
}

impl<A: DetoxApi> TaskBoard<A> {
    pub fn new(api: A, clock: Box<dyn Clock>) -> Self {
        Self {
            api,
            clock,
            tasks: Snapshot::default(),
        }
    }

    pub fn tasks(&self) -> Arc<Vec<Task>> {
        self.tasks.current()
    }

    pub fn pending(&self) -> Vec<Task> {
        self.tasks().iter().filter(|v| !v.status).cloned().collect()
    }

    pub fn completed(&self) -> Vec<Task> {
        self.tasks().iter().filter(|v| v.status).cloned().collect()
    }

    pub fn completed_count(&self) -> usize {
        self.tasks().iter().filter(|v| v.status).count()
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn time(&self) -> NaiveDateTime {
        self.clock.time()
    }

    pub fn is_overdue(&self, task: &Task) -> bool {
        task.is_overdue(self.today())
    }

    pub async fn refresh(&mut self) -> Result<(), TaskError> {
        let ticket = self.tasks.begin();
        let mut tasks = self
            .api
            .list_tasks()
            .await
            .inspect_err(|e| error!("Failed to fetch tasks, keeping previous list {e}"))?;
        sort_tasks(&mut tasks);
        info!("Fetched {} tasks", tasks.len());
        self.tasks.commit(ticket, tasks);
        Ok(())
    }

    pub async fn add(&mut self, name: &str, due_date: NaiveDate) -> Result<(), TaskError> {
        let name = self.valid_new_name(name, None)?;
        if due_date < self.clock.today() {
            return Err(TaskError::DueDateInPast(due_date));
        }

        let task = Task::new(name, Some(due_date));
        self.api.create_task(&task).await?;
        info!("Added task {}", task.task_name);

        self.replace(|tasks| tasks.push(task));
        Ok(())
    }

    pub async fn toggle(&mut self, name: &str) -> Result<bool, TaskError> {
        let status = !self.find(name)?.status;
        self.api.set_task_status(name, status).await?;
        self.replace(|tasks| {
            if let Some(task) = tasks.iter_mut().find(|v| v.task_name == name) {
                task.status = status;
            }
        });
        Ok(status)
    }

    pub async fn toggle_priority(&mut self, name: &str) -> Result<bool, TaskError> {
        let priority = !self.find(name)?.priority;
        self.api.set_task_priority(name, priority).await?;
        self.replace(|tasks| {
            if let Some(task) = tasks.iter_mut().find(|v| v.task_name == name) {
                task.priority = priority;
            }
        });
        Ok(priority)
    }

    pub async fn delete(&mut self, name: &str) -> Result<(), TaskError> {
        self.find(name)?;
        self.api.delete_task(name).await?;
        self.replace(|tasks| tasks.retain(|v| v.task_name != name));
        Ok(())
    }

    /// Renames the task and sets its due date.
    pub async fn edit(
        &mut self,
        name: &str,
        new_name: &str,
        new_due_date: Option<NaiveDate>,
    ) -> Result<(), TaskError> {
        self.find(name)?;
        let new_name = self.valid_new_name(new_name, Some(name))?;
        self.api.edit_task(name, &new_name, new_due_date).await?;
        self.replace(|tasks| {
            if let Some(task) = tasks.iter_mut().find(|v| v.task_name == name) {
                task.task_name = new_name;
                task.due_date = new_due_date;
            }
        });
        Ok(())
    }

    fn find(&self, name: &str) -> Result<Task, TaskError> {
        self.tasks()
            .iter()
            .find(|v| v.task_name == name)
            .cloned()
            .ok_or_else(|| TaskError::NotFound(name.to_string()))
    }

    /// Trimmed name, if it's non-empty and not used by a task other than `current`.
    fn valid_new_name(&self, name: &str, current: Option<&str>) -> Result<String, TaskError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TaskError::EmptyName);
        }
        let taken = self
            .tasks()
            .iter()
            .any(|v| v.task_name == name && Some(v.task_name.as_str()) != current);
        if taken {
            return Err(TaskError::DuplicateName(name.to_string()));
        }
        Ok(name.to_string())
    }

    /// Applies a change to a copy of the list, re-sorts it and swaps it in.
    fn replace(&mut self, change: impl FnOnce(&mut Vec<Task>)) {
        let mut tasks = self.tasks().as_ref().clone();
        change(&mut tasks);
        sort_tasks(&mut tasks);
        let ticket = self.tasks.begin();
        self.tasks.commit(ticket, tasks);
    }
}
