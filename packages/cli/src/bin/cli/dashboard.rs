// ABOUTME: Dashboard subcommand for the crm CLI
// ABOUTME: Pipeline statistics, per-stage totals, upcoming tasks and recent activity

use chrono::Utc;
use colored::*;
use crm_cli::Session;
use crm_core::{format_currency, format_number, format_relative_date, truncate};
use crm_pipeline::{recent_activity, ActivityItem, RECENT_ACTIVITY_LIMIT};

use super::tasks::{colored_priority, due_text};
use super::utils::{colored_stage, dash, new_table};

const UPCOMING_TASKS: usize = 4;

pub async fn show_dashboard(session: &Session) -> anyhow::Result<()> {
    let controller = session.pipeline().await?;
    let customers = session.customers().await?;
    let tasks = session.tasks().await?;

    let summary = controller.summary(Utc::now()).await;

    println!("{}", "Dashboard".blue().bold());
    println!();
    println!("  Customers:          {}", customers.len().await.to_string().cyan());
    println!("  Active deals:       {}", summary.active_deals.to_string().cyan());
    println!(
        "  Closed this month:  {}",
        summary.closed_this_month.to_string().cyan()
    );
    println!(
        "  Open pipeline:      {}",
        format_currency(summary.open_pipeline_value()).cyan()
    );
    println!();

    let mut stages = new_table();
    stages.set_header(vec!["Stage", "Deals", "Value"]);
    for totals in &summary.stages {
        stages.add_row(vec![
            colored_stage(totals.stage).to_string(),
            totals.count.to_string(),
            format!("${}", format_number(totals.value)),
        ]);
    }
    println!("{}", stages);
    println!();

    let upcoming = tasks.upcoming(UPCOMING_TASKS).await;
    println!("{}", "Upcoming tasks".blue().bold());
    if upcoming.is_empty() {
        println!("{}", "  Nothing due".dimmed());
    } else {
        let mut table = new_table();
        table.set_header(vec!["Title", "Priority", "Due"]);
        for task in &upcoming {
            table.add_row(vec![
                truncate(&task.title, 40),
                colored_priority(task.priority).to_string(),
                due_text(task),
            ]);
        }
        println!("{}", table);
    }
    println!();

    let activity = recent_activity(
        &controller.search("").await,
        &customers.customers().await,
        &tasks.tasks().await,
        RECENT_ACTIVITY_LIMIT,
    );
    print_activity(&activity);
    Ok(())
}

fn print_activity(activity: &[ActivityItem]) {
    println!("{}", "Recent activity".blue().bold());
    if activity.is_empty() {
        println!("{}", "  No recent activity".dimmed());
        return;
    }

    let today = Utc::now().date_naive();
    for item in activity {
        let when = item
            .at
            .as_ref()
            .map_or_else(dash, |at| format_relative_date(at, today));
        println!(
            "  {} {}  {}",
            item.kind.title().bold(),
            truncate(&item.description, 60),
            when.as_str().dimmed()
        );
    }
}
