use super::entities::Task;

/// Sorts tasks for display: incomplete before completed, then priority before the rest. The sort
/// is stable, so tasks that compare equal keep their relative order. The whole list is re-sorted
/// after every change instead of moving a single task around.
pub fn sort_tasks(tasks: &mut [Task]) {
    tasks.sort_by_key(|v| (v.status, !v.priority));
}
