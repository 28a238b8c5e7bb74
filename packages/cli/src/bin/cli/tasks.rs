// ABOUTME: Task subcommands for the crm CLI
// ABOUTME: Listing, creation, editing, completion toggling and deletion of follow-up tasks

use anyhow::anyhow;
use chrono::Utc;
use clap::Subcommand;
use colored::*;
use crm_cli::Session;
use crm_core::{
    format_relative_date, truncate, Task, TaskCreateInput, TaskPriority, TaskUpdateInput,
};
use crm_tasks::TaskListError;

use super::utils::{confirm, dash, fail_declined, new_table, parse_date};

#[derive(Subcommand)]
pub enum TasksCommands {
    /// List tasks
    List {
        /// Only show tasks whose title or description matches
        #[arg(short, long)]
        search: Option<String>,
        /// Hide completed tasks
        #[arg(long)]
        pending: bool,
    },
    /// Add a new task
    Add {
        /// Task title
        #[arg(short, long)]
        title: String,
        #[arg(short, long)]
        description: Option<String>,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
        /// Priority: high, medium or low
        #[arg(short, long)]
        priority: Option<String>,
        /// Related customer ID
        #[arg(long)]
        customer_id: Option<String>,
        /// Related deal ID
        #[arg(long)]
        deal_id: Option<String>,
    },
    /// Change fields of an existing task
    Edit {
        /// Task ID to edit
        id: String,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
        /// Priority: high, medium or low
        #[arg(short, long)]
        priority: Option<String>,
        /// Related customer ID
        #[arg(long)]
        customer_id: Option<String>,
        /// Related deal ID
        #[arg(long)]
        deal_id: Option<String>,
    },
    /// Mark a task complete, or reopen it
    Toggle {
        /// Task ID to toggle
        id: String,
    },
    /// Delete a task
    Delete {
        /// Task ID to delete
        id: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

pub async fn handle_tasks_command(session: &Session, command: TasksCommands) -> anyhow::Result<()> {
    match command {
        TasksCommands::List { search, pending } => {
            list_tasks(session, search.as_deref().unwrap_or(""), pending).await
        }
        TasksCommands::Add {
            title,
            description,
            due,
            priority,
            customer_id,
            deal_id,
        } => {
            let input = TaskCreateInput {
                title,
                description,
                due_date: due.as_deref().map(parse_date).transpose()?,
                priority: priority.as_deref().map(parse_priority).transpose()?,
                customer_id,
                deal_id,
            };
            add_task(session, input).await
        }
        TasksCommands::Edit {
            id,
            title,
            description,
            due,
            priority,
            customer_id,
            deal_id,
        } => {
            let input = TaskUpdateInput {
                title,
                description,
                due_date: due.as_deref().map(parse_date).transpose()?,
                priority: priority.as_deref().map(parse_priority).transpose()?,
                customer_id,
                deal_id,
                ..Default::default()
            };
            edit_task(session, &id, input).await
        }
        TasksCommands::Toggle { id } => toggle_task(session, &id).await,
        TasksCommands::Delete { id, yes } => delete_task(session, &id, yes).await,
    }
}

fn parse_priority(raw: &str) -> anyhow::Result<TaskPriority> {
    raw.trim()
        .to_lowercase()
        .parse::<TaskPriority>()
        .map_err(|_| anyhow!("Unknown priority '{}'. Use high, medium or low", raw))
}

fn has_changes(input: &TaskUpdateInput) -> bool {
    input.title.is_some()
        || input.description.is_some()
        || input.due_date.is_some()
        || input.priority.is_some()
        || input.customer_id.is_some()
        || input.deal_id.is_some()
}

pub fn colored_priority(priority: TaskPriority) -> ColoredString {
    match priority {
        TaskPriority::High => priority.as_str().red(),
        TaskPriority::Medium => priority.as_str().yellow(),
        TaskPriority::Low => priority.as_str().green(),
    }
}

pub fn due_text(task: &Task) -> String {
    let today = Utc::now().date_naive();
    task.due_date
        .as_ref()
        .map_or_else(dash, |due| format_relative_date(due, today))
}

async fn list_tasks(session: &Session, query: &str, pending_only: bool) -> anyhow::Result<()> {
    let list = session.tasks().await?;
    let tasks: Vec<Task> = list
        .filtered(query)
        .await
        .into_iter()
        .filter(|task| !pending_only || !task.completed)
        .collect();

    if tasks.is_empty() {
        println!("{}", "No tasks found".yellow());
        return Ok(());
    }

    let mut table = new_table();
    table.set_header(vec!["ID", "Done", "Title", "Priority", "Due"]);
    for task in &tasks {
        table.add_row(vec![
            task.id.clone(),
            if task.completed { "✓".green().to_string() } else { String::new() },
            truncate(&task.title, 40),
            colored_priority(task.priority).to_string(),
            due_text(task),
        ]);
    }

    println!("{}", table);
    let open = tasks.iter().filter(|task| !task.completed).count();
    println!(
        "Total: {} tasks ({} open)",
        tasks.len().to_string().cyan(),
        open
    );
    Ok(())
}

async fn add_task(session: &Session, input: TaskCreateInput) -> anyhow::Result<()> {
    let list = session.tasks().await?;

    match list.create(input).await {
        Ok(task) => {
            println!(
                "{} Created task '{}' ({})",
                "✓".green(),
                task.title.bold(),
                task.id
            );
            Ok(())
        }
        Err(TaskListError::Invalid(errors)) => fail_declined("task", &errors),
        Err(e) => Err(e.into()),
    }
}

async fn edit_task(session: &Session, id: &str, input: TaskUpdateInput) -> anyhow::Result<()> {
    if !has_changes(&input) {
        anyhow::bail!("Nothing to change. Pass at least one field to edit");
    }
    let list = session.tasks().await?;

    match list.update(id, input).await {
        Ok(task) => {
            println!(
                "{} Updated task '{}' ({}, due {})",
                "✓".green(),
                task.title.bold(),
                colored_priority(task.priority),
                due_text(&task)
            );
            Ok(())
        }
        Err(TaskListError::Invalid(errors)) => fail_declined("task", &errors),
        Err(TaskListError::NotFound(_)) => anyhow::bail!("Task with ID '{}' not found", id),
        Err(e) => Err(e.into()),
    }
}

async fn toggle_task(session: &Session, id: &str) -> anyhow::Result<()> {
    let list = session.tasks().await?;
    let task = list.toggle_completion(id).await?;

    let state = if task.completed {
        "complete".green()
    } else {
        "open".yellow()
    };
    println!("{} Task '{}' is now {}", "✓".green(), task.title, state);
    Ok(())
}

async fn delete_task(session: &Session, id: &str, yes: bool) -> anyhow::Result<()> {
    let list = session.tasks().await?;
    let Some(task) = list.task(id).await else {
        anyhow::bail!("Task with ID '{}' not found", id);
    };

    if !confirm(&format!("Delete task '{}'?", task.title), yes)? {
        println!("{}", "Cancelled".dimmed());
        return Ok(());
    }

    list.delete(id).await?;
    println!("{} Deleted task '{}'", "✓".green(), task.title);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("high", TaskPriority::High)]
    #[case(" Medium", TaskPriority::Medium)]
    #[case("LOW", TaskPriority::Low)]
    fn test_parse_priority(#[case] raw: &str, #[case] expected: TaskPriority) {
        assert_eq!(parse_priority(raw).unwrap(), expected);
    }

    #[test]
    fn test_parse_priority_rejects_unknown() {
        assert!(parse_priority("urgent").is_err());
    }

    #[test]
    fn test_edit_needs_a_field() {
        assert!(!has_changes(&TaskUpdateInput::default()));
        // completion is changed through toggle, not edit
        assert!(!has_changes(&TaskUpdateInput {
            completed: Some(true),
            ..Default::default()
        }));
        assert!(has_changes(&TaskUpdateInput {
            deal_id: Some("d1".to_string()),
            ..Default::default()
        }));
    }
}
