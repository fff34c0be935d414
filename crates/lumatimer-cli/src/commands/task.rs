//! Task management commands for CLI.

use clap::Subcommand;
use lumatimer_core::TaskId;

use crate::app::{print_json, App, CliResult};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task
    Add {
        /// Task text
        text: String,
        /// Estimated pomodoros (values below 1 become 1)
        #[arg(long, short, default_value_t = 1, allow_negative_numbers = true)]
        estimate: i64,
    },
    /// List tasks
    List,
    /// Flip a task's completed flag
    Toggle {
        /// Task ID
        id: TaskId,
    },
    /// Make a task the one credited with finished pomodoros
    Activate {
        /// Task ID
        id: TaskId,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: TaskId,
    },
    /// Remove every completed task
    ClearCompleted {
        /// Confirm the removal
        #[arg(long)]
        yes: bool,
    },
}

pub fn run(action: TaskAction, app: &mut App) -> CliResult {
    match action {
        TaskAction::Add { text, estimate } => {
            let id = app
                .add_task(&text, estimate)?
                .ok_or("task text must not be empty")?;
            print_json(&app.task(id))?;
        }
        TaskAction::List => {
            print_json(app.tasks())?;
        }
        TaskAction::Toggle { id } => {
            if !app.toggle_task(id)? {
                return Err(format!("task not found: {id}").into());
            }
            print_json(&app.task(id))?;
        }
        TaskAction::Activate { id } => {
            app.set_active_task(id)?
                .ok_or_else(|| format!("task {id} is missing or already completed"))?;
            print_json(&app.task(id))?;
        }
        TaskAction::Delete { id } => {
            if !app.delete_task(id)? {
                return Err(format!("task not found: {id}").into());
            }
            println!("Task deleted: {id}");
        }
        TaskAction::ClearCompleted { yes } => {
            if !yes {
                return Err("refusing to clear completed tasks without --yes".into());
            }
            let removed = app.clear_completed_tasks()?;
            println!("Removed {removed} completed task(s)");
        }
    }
    Ok(())
}
