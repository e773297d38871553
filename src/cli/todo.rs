use anyhow::{Context, Result};
use clap::Subcommand;

use crate::{
    api::DetoxApi,
    todo::board::{TaskBoard, TaskError},
};

use super::{
    output::{notify_success, print_tasks},
    parse_date_arg, validation_error, DateStyle,
};

#[derive(Debug, Subcommand)]
pub enum TodoCommand {
    #[command(about = "List tasks, highest priority first")]
    List {
        #[arg(long, short, help = "Also list completed tasks")]
        completed: bool,
    },
    #[command(about = "Add a task")]
    Add {
        name: String,
        #[arg(
            long,
            short,
            help = "Due date. Examples are \"tomorrow\", \"next friday\", \"15/03/2025\""
        )]
        due: String,
    },
    #[command(about = "Mark a task as done, or as not done again")]
    Toggle { name: String },
    #[command(about = "Star or unstar a task")]
    Priority { name: String },
    #[command(about = "Delete a task")]
    Delete { name: String },
    #[command(about = "Rename a task or change its due date")]
    Edit {
        name: String,
        #[arg(long = "name", short, help = "New name. Defaults to the current one")]
        new_name: Option<String>,
        #[arg(long, short, help = "New due date. Defaults to the current one")]
        due: Option<String>,
    },
}

pub async fn process_todo_command(
    command: TodoCommand,
    date_style: DateStyle,
    board: &mut TaskBoard<impl DetoxApi>,
) -> Result<()> {
    board
        .refresh()
        .await
        .context("Failed to fetch the todo list")?;

    let mut show_completed = false;
    match command {
        TodoCommand::List { completed } => show_completed = completed,
        TodoCommand::Add { name, due } => {
            let due = parse_date_arg(&due, date_style, board.time(), "due date")?;
            board.add(&name, due).await.map_err(task_error)?;
            notify_success(format!("Added {:?}", name.trim()));
        }
        TodoCommand::Toggle { name } => {
            let done = board.toggle(&name).await.map_err(task_error)?;
            show_completed = done;
            notify_success(if done {
                format!("Completed {name:?}")
            } else {
                format!("Reopened {name:?}")
            });
        }
        TodoCommand::Priority { name } => {
            let priority = board.toggle_priority(&name).await.map_err(task_error)?;
            notify_success(if priority {
                format!("Starred {name:?}")
            } else {
                format!("Unstarred {name:?}")
            });
        }
        TodoCommand::Delete { name } => {
            board.delete(&name).await.map_err(task_error)?;
            notify_success(format!("Deleted {name:?}"));
        }
        TodoCommand::Edit {
            name,
            new_name,
            due,
        } => {
            let current = board
                .tasks()
                .iter()
                .find(|v| v.task_name == name)
                .cloned()
                .ok_or_else(|| validation_error(TaskError::NotFound(name.clone())))?;
            let due_date = match due {
                Some(v) => Some(parse_date_arg(&v, date_style, board.time(), "due date")?),
                None => current.due_date,
            };
            let new_name = new_name.unwrap_or_else(|| current.task_name.clone());
            board
                .edit(&name, &new_name, due_date)
                .await
                .map_err(task_error)?;
            notify_success(format!("Updated {:?}", new_name.trim()));
        }
    }

    let today = board.today();
    println!();
    print_tasks("Tasks", &board.pending(), today);
    if show_completed {
        println!();
        print_tasks("Completed", &board.completed(), today);
    } else {
        println!("Completed: {}", board.completed_count());
    }
    Ok(())
}

/// Validation failures are reported like bad arguments, API failures keep their cause chain.
fn task_error(error: TaskError) -> anyhow::Error {
    match error {
        TaskError::Api(e) => anyhow::Error::new(e).context("The todo list could not be updated"),
        e => validation_error(e),
    }
}
