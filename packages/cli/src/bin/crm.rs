use clap::{Parser, Subcommand};
use colored::*;
use std::process;

mod cli;

use cli::customers::CustomersCommands;
use cli::deals::DealsCommands;
use cli::tasks::TasksCommands;
use crm_cli::{init_logging, Config, Session};

#[derive(Parser)]
#[command(name = "crm")]
#[command(about = "CRM CLI - deal pipeline, customers and follow-up tasks")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage deals and the pipeline board
    #[command(subcommand)]
    Deals(DealsCommands),
    /// Manage customers
    #[command(subcommand)]
    Customers(CustomersCommands),
    /// Manage follow-up tasks
    #[command(subcommand)]
    Tasks(TasksCommands),
    /// Show pipeline statistics and upcoming tasks
    Dashboard,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_logging();

    let cli = Cli::parse();

    if let Err(e) = run(cli.command).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

async fn run(command: Commands) -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let session = Session::open(config).await?;

    match command {
        Commands::Deals(command) => cli::deals::handle_deals_command(&session, command).await,
        Commands::Customers(command) => {
            cli::customers::handle_customers_command(&session, command).await
        }
        Commands::Tasks(command) => cli::tasks::handle_tasks_command(&session, command).await,
        Commands::Dashboard => cli::dashboard::show_dashboard(&session).await,
    }
}
