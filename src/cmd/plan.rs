//! Ticket plan preview for `autocoder plan --spec <file.json>`.

use std::path::Path;

use anyhow::{Context, Result};
use autocoder::planner::{TicketPlanner, total_estimated_minutes};
use autocoder_common::TechnicalSpec;
use console::style;

pub fn cmd_plan(spec_file: &Path, json: bool) -> Result<()> {
    let content = std::fs::read_to_string(spec_file)
        .with_context(|| format!("Failed to read spec file: {}", spec_file.display()))?;
    let spec: TechnicalSpec = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse technical spec: {}", spec_file.display()))?;

    let tickets = TicketPlanner::new().plan(&spec);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&tickets).context("Failed to serialize tickets")?
        );
        return Ok(());
    }

    println!();
    println!("Ticket plan ({} tickets)", tickets.len());
    println!("============");
    println!();
    for ticket in &tickets {
        let deps = if ticket.dependencies.is_empty() {
            String::new()
        } else {
            format!(" <- {}", ticket.dependencies.join(", "))
        };
        println!(
            "  {:<4} {:<11} {:<7} {:>3}m  {}{}",
            style(&ticket.id).cyan(),
            ticket.kind.as_str(),
            ticket.priority.as_str(),
            ticket.estimated_time,
            ticket.title,
            style(deps).dim()
        );
    }
    println!();
    println!(
        "Total estimated time: {} minutes",
        total_estimated_minutes(&tickets)
    );
    println!();
    Ok(())
}
