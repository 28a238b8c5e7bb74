// ABOUTME: Shared helpers for the crm subcommands
// ABOUTME: Table construction, argument parsing and confirmation prompts

use anyhow::{anyhow, bail};
use chrono::{DateTime, NaiveDate, Utc};
use colored::*;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, ContentArrangement, Table};
use crm_core::{DealStage, ValidationError};
use inquire::Confirm;

pub fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Parse a stage name, ignoring case ("won" and "WON" both work)
pub fn parse_stage(raw: &str) -> anyhow::Result<DealStage> {
    raw.trim()
        .to_uppercase()
        .parse::<DealStage>()
        .map_err(|_| anyhow!("Unknown stage '{}'. Use one of: open, pending, won, lost", raw))
}

/// Parse a YYYY-MM-DD date as midnight UTC
pub fn parse_date(raw: &str) -> anyhow::Result<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| anyhow!("Invalid date '{}'. Expected YYYY-MM-DD", raw))?;
    date.and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc())
        .ok_or_else(|| anyhow!("Invalid date '{}'", raw))
}

pub fn colored_stage(stage: DealStage) -> ColoredString {
    match stage {
        DealStage::Open => stage.label().blue(),
        DealStage::Pending => stage.label().yellow(),
        DealStage::Won => stage.label().green(),
        DealStage::Lost => stage.label().red(),
    }
}

pub fn print_validation_errors(errors: &[ValidationError]) {
    for error in errors {
        eprintln!("  {} {}", "*".red(), error.message);
    }
}

/// Ask before a destructive action unless `--yes` was given
pub fn confirm(prompt: &str, skip: bool) -> anyhow::Result<bool> {
    if skip {
        return Ok(true);
    }
    Ok(Confirm::new(prompt).with_default(false).prompt()?)
}

pub fn fail_declined(what: &str, errors: &[ValidationError]) -> anyhow::Result<()> {
    eprintln!("{}", format!("Could not create {}:", what).red());
    print_validation_errors(errors);
    bail!("{} input is incomplete", what)
}

pub fn dash() -> String {
    "-".dimmed().to_string()
}
