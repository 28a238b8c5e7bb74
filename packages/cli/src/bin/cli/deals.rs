// ABOUTME: Deal subcommands for the crm CLI
// ABOUTME: Board view, listing, creation, stage moves and deletion

use clap::Subcommand;
use colored::*;
use comfy_table::Cell;
use crm_cli::Session;
use crm_core::{format_currency, format_date, truncate, DealCreateInput};
use crm_pipeline::{CreateOutcome, DropZone, PipelineController, RemoteAck, TransitionOutcome};

use super::utils::{colored_stage, confirm, dash, fail_declined, new_table, parse_date, parse_stage};

#[derive(Subcommand)]
pub enum DealsCommands {
    /// Show deals as a board with one column per stage
    Board {
        /// Only show deals whose title or customer matches
        #[arg(short, long)]
        search: Option<String>,
    },
    /// List deals
    List {
        /// Only show deals whose title or customer matches
        #[arg(short, long)]
        search: Option<String>,
        /// Only show deals in this stage
        #[arg(long)]
        stage: Option<String>,
    },
    /// Add a new deal
    Add {
        /// Deal title
        #[arg(short, long)]
        title: String,
        /// Deal value in dollars
        #[arg(short, long, default_value = "0")]
        value: f64,
        /// Customer name shown on the card
        #[arg(short, long)]
        customer: String,
        /// Existing customer ID
        #[arg(long)]
        customer_id: Option<String>,
        /// Initial stage (defaults to open)
        #[arg(long)]
        stage: Option<String>,
        /// Expected closing date (YYYY-MM-DD)
        #[arg(long)]
        closing_date: Option<String>,
    },
    /// Move a deal to another stage
    Move {
        /// Deal ID to move
        id: String,
        /// Target stage: open, pending, won or lost
        stage: String,
    },
    /// Delete a deal
    Delete {
        /// Deal ID to delete
        id: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

pub async fn handle_deals_command(session: &Session, command: DealsCommands) -> anyhow::Result<()> {
    match command {
        DealsCommands::Board { search } => show_board(session, search.as_deref()).await,
        DealsCommands::List { search, stage } => {
            list_deals(session, search.as_deref(), stage.as_deref()).await
        }
        DealsCommands::Add {
            title,
            value,
            customer,
            customer_id,
            stage,
            closing_date,
        } => {
            let input = DealCreateInput {
                title,
                value,
                stage: stage.as_deref().map(parse_stage).transpose()?,
                customer_id,
                customer_name: Some(customer),
                closing_date: closing_date.as_deref().map(parse_date).transpose()?,
            };
            add_deal(session, input).await
        }
        DealsCommands::Move { id, stage } => move_deal(session, &id, &stage).await,
        DealsCommands::Delete { id, yes } => delete_deal(session, &id, yes).await,
    }
}

async fn show_board(session: &Session, search: Option<&str>) -> anyhow::Result<()> {
    let controller = session.pipeline().await?;
    let buckets = controller.buckets_matching(search.unwrap_or("")).await;

    println!("{}", "Deal Pipeline".blue().bold());
    println!();

    let mut table = new_table();
    let header: Vec<Cell> = buckets
        .iter()
        .map(|(stage, deals)| {
            Cell::new(format!(
                "{} ({})\n{}",
                stage.label(),
                deals.len(),
                format_currency(buckets.value(stage))
            ))
        })
        .collect();
    table.set_header(header);

    let rows = buckets.iter().map(|(_, deals)| deals.len()).max().unwrap_or(0);
    for row in 0..rows {
        let cells: Vec<String> = buckets
            .iter()
            .map(|(_, deals)| match deals.get(row) {
                Some(deal) => format!(
                    "{}\n{}\n{}",
                    truncate(&deal.title, 24),
                    truncate(&deal.customer_label(), 24),
                    format_currency(deal.value)
                ),
                None => String::new(),
            })
            .collect();
        table.add_row(cells);
    }

    println!("{}", table);
    if buckets.is_empty() {
        println!("{}", "No deals yet".yellow());
        println!("{}", "Use 'crm deals add' to create your first deal".dimmed());
    }
    report_rejected(&controller).await;
    Ok(())
}

async fn list_deals(
    session: &Session,
    search: Option<&str>,
    stage: Option<&str>,
) -> anyhow::Result<()> {
    let stage = stage.map(parse_stage).transpose()?;
    let controller = session.pipeline().await?;
    let deals: Vec<_> = controller
        .search(search.unwrap_or(""))
        .await
        .into_iter()
        .filter(|deal| stage.map_or(true, |wanted| deal.stage == wanted))
        .collect();

    if deals.is_empty() {
        println!("{}", "No deals found".yellow());
        return Ok(());
    }

    let mut table = new_table();
    table.set_header(vec!["ID", "Title", "Customer", "Value", "Stage", "Closing", "Created"]);
    for deal in &deals {
        table.add_row(vec![
            deal.id.clone(),
            truncate(&deal.title, 30),
            truncate(&deal.customer_label(), 24),
            format_currency(deal.value),
            colored_stage(deal.stage).to_string(),
            deal.closing_date.as_ref().map_or_else(dash, format_date),
            deal.created_at.as_ref().map_or_else(dash, format_date),
        ]);
    }

    println!("{}", table);
    println!("Total: {} deals", deals.len().to_string().cyan());
    report_rejected(&controller).await;
    Ok(())
}

async fn add_deal(session: &Session, input: DealCreateInput) -> anyhow::Result<()> {
    let controller = session.pipeline().await?;

    match controller.create(input).await? {
        CreateOutcome::Created(deal) => {
            println!(
                "{} Created deal '{}' ({}) in {}",
                "✓".green(),
                deal.title.bold(),
                deal.id,
                colored_stage(deal.stage)
            );
            Ok(())
        }
        CreateOutcome::Declined(errors) => fail_declined("deal", &errors),
    }
}

/// Routes the move through the keyboard drag path so the CLI and the board
/// share one way of producing move intents.
async fn move_deal(session: &Session, id: &str, stage: &str) -> anyhow::Result<()> {
    let target = DropZone::new(parse_stage(stage)?);
    let controller = session.pipeline().await?;

    let mut tracker = session.drag_tracker();
    tracker.keyboard_pick_up(id);
    let Some(intent) = tracker.keyboard_drop(target) else {
        anyhow::bail!("Move of deal {} was cancelled", id);
    };

    match controller.apply(&intent).await? {
        TransitionOutcome::Unchanged => {
            println!("Deal {} is already in {}", id, colored_stage(target.stage()));
        }
        TransitionOutcome::Moved { from, to, remote } => {
            println!(
                "{} Moved deal {} from {} to {}",
                "✓".green(),
                id,
                colored_stage(from),
                colored_stage(to)
            );
            warn_unsaved(&remote, "stage change");
        }
    }
    Ok(())
}

async fn delete_deal(session: &Session, id: &str, yes: bool) -> anyhow::Result<()> {
    let controller = session.pipeline().await?;
    let Some(deal) = controller.deal(id).await else {
        anyhow::bail!("Deal with ID '{}' not found", id);
    };

    if !confirm(&format!("Delete deal '{}'?", deal.title), yes)? {
        println!("{}", "Cancelled".dimmed());
        return Ok(());
    }

    let remote = controller.delete(id).await?;
    println!("{} Deleted deal '{}'", "✓".green(), deal.title);
    warn_unsaved(&remote, "deletion");
    Ok(())
}

fn warn_unsaved(remote: &RemoteAck, what: &str) {
    if let RemoteAck::Failed(reason) = remote {
        eprintln!(
            "{} The {} was not saved: {}",
            "Warning:".yellow().bold(),
            what,
            reason
        );
    }
}

async fn report_rejected(controller: &PipelineController) {
    let rejected = controller.rejected_records().await;
    if rejected.is_empty() {
        return;
    }
    eprintln!(
        "{} {} stored deals could not be read:",
        "Warning:".yellow().bold(),
        rejected.len()
    );
    for record in rejected {
        eprintln!("  {} {}", record.id, record.reason.dimmed());
    }
}

