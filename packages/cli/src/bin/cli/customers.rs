// ABOUTME: Customer subcommands for the crm CLI
// ABOUTME: Search, creation, editing and deletion of customers

use anyhow::anyhow;
use clap::Subcommand;
use colored::*;
use crm_cli::Session;
use crm_core::{format_date, truncate, CustomerCreateInput, CustomerStatus, CustomerUpdateInput};
use crm_customers::{DirectoryError, StatusFilter};

use super::utils::{confirm, dash, fail_declined, new_table};

#[derive(Subcommand)]
pub enum CustomersCommands {
    /// List customers
    List {
        /// Only show customers whose name, email or company matches
        #[arg(short, long)]
        search: Option<String>,
        /// Only show customers with this status (lead, prospect, active, inactive)
        #[arg(long)]
        status: Option<String>,
    },
    /// Add a new customer
    Add {
        /// Customer name
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        email: Option<String>,
        #[arg(short, long)]
        phone: Option<String>,
        #[arg(short, long)]
        company: Option<String>,
        /// Status (defaults to lead)
        #[arg(long)]
        status: Option<String>,
    },
    /// Update fields of an existing customer
    Update {
        /// Customer ID to update
        id: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        email: Option<String>,
        #[arg(short, long)]
        phone: Option<String>,
        #[arg(short, long)]
        company: Option<String>,
        /// New status (lead, prospect, active, inactive)
        #[arg(long)]
        status: Option<String>,
    },
    /// Delete a customer
    Delete {
        /// Customer ID to delete
        id: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

pub async fn handle_customers_command(
    session: &Session,
    command: CustomersCommands,
) -> anyhow::Result<()> {
    match command {
        CustomersCommands::List { search, status } => {
            let filter = match status {
                Some(raw) => StatusFilter::Only(parse_status(&raw)?),
                None => StatusFilter::All,
            };
            list_customers(session, search.as_deref().unwrap_or(""), filter).await
        }
        CustomersCommands::Add {
            name,
            email,
            phone,
            company,
            status,
        } => {
            let input = CustomerCreateInput {
                name,
                email,
                phone,
                company,
                status: status.as_deref().map(parse_status).transpose()?,
            };
            add_customer(session, input).await
        }
        CustomersCommands::Update {
            id,
            name,
            email,
            phone,
            company,
            status,
        } => {
            let input = CustomerUpdateInput {
                name,
                email,
                phone,
                company,
                status: status.as_deref().map(parse_status).transpose()?,
            };
            update_customer(session, &id, input).await
        }
        CustomersCommands::Delete { id, yes } => delete_customer(session, &id, yes).await,
    }
}

fn has_changes(input: &CustomerUpdateInput) -> bool {
    input.name.is_some()
        || input.email.is_some()
        || input.phone.is_some()
        || input.company.is_some()
        || input.status.is_some()
}

fn parse_status(raw: &str) -> anyhow::Result<CustomerStatus> {
    raw.trim().to_uppercase().parse::<CustomerStatus>().map_err(|_| {
        anyhow!(
            "Unknown status '{}'. Use one of: lead, prospect, active, inactive",
            raw
        )
    })
}

fn colored_status(status: CustomerStatus) -> ColoredString {
    match status {
        CustomerStatus::Lead => status.as_str().blue(),
        CustomerStatus::Prospect => status.as_str().yellow(),
        CustomerStatus::Active => status.as_str().green(),
        CustomerStatus::Inactive => status.as_str().dimmed(),
    }
}

async fn list_customers(session: &Session, query: &str, filter: StatusFilter) -> anyhow::Result<()> {
    let directory = session.customers().await?;
    let customers = directory.filtered(query, filter).await;

    if customers.is_empty() {
        println!("{}", "No customers found".yellow());
        if directory.is_empty().await {
            println!("{}", "Use 'crm customers add' to create your first customer".dimmed());
        }
        return Ok(());
    }

    let mut table = new_table();
    table.set_header(vec!["ID", "Name", "Email", "Company", "Status", "Created"]);
    for customer in &customers {
        table.add_row(vec![
            customer.id.clone(),
            truncate(&customer.name, 25),
            customer.email.clone().unwrap_or_else(dash),
            customer
                .company
                .as_deref()
                .map_or_else(dash, |company| truncate(company, 20)),
            colored_status(customer.status).to_string(),
            customer.created_at.as_ref().map_or_else(dash, format_date),
        ]);
    }

    println!("{}", table);
    println!("Total: {} customers", customers.len().to_string().cyan());
    Ok(())
}

async fn add_customer(session: &Session, input: CustomerCreateInput) -> anyhow::Result<()> {
    let directory = session.customers().await?;

    match directory.create(input).await {
        Ok(customer) => {
            println!(
                "{} Created customer '{}' ({})",
                "✓".green(),
                customer.name.bold(),
                customer.id
            );
            Ok(())
        }
        Err(DirectoryError::Invalid(errors)) => fail_declined("customer", &errors),
        Err(e) => Err(e.into()),
    }
}

async fn update_customer(
    session: &Session,
    id: &str,
    input: CustomerUpdateInput,
) -> anyhow::Result<()> {
    if !has_changes(&input) {
        anyhow::bail!("Nothing to update. Pass at least one field to change");
    }
    let directory = session.customers().await?;

    match directory.update(id, input).await {
        Ok(customer) => {
            println!(
                "{} Updated customer '{}' ({})",
                "✓".green(),
                customer.name.bold(),
                colored_status(customer.status)
            );
            Ok(())
        }
        Err(DirectoryError::Invalid(errors)) => fail_declined("customer", &errors),
        Err(DirectoryError::NotFound(_)) => anyhow::bail!("Customer with ID '{}' not found", id),
        Err(e) => Err(e.into()),
    }
}

async fn delete_customer(session: &Session, id: &str, yes: bool) -> anyhow::Result<()> {
    let directory = session.customers().await?;
    let Some(customer) = directory.customer(id).await else {
        anyhow::bail!("Customer with ID '{}' not found", id);
    };

    if !confirm(&format!("Delete customer '{}'?", customer.name), yes)? {
        println!("{}", "Cancelled".dimmed());
        return Ok(());
    }

    directory.delete(id).await?;
    println!("{} Deleted customer '{}'", "✓".green(), customer.name);
    Ok(())
}
