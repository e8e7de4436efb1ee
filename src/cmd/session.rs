//! Interactive loop for `autocoder session`.
//!
//! Reads ideas until the user quits. A failed run stays in the error state
//! for the configured delay and then returns to idle.

use std::path::Path;

use anyhow::Result;
use autocoder::catalog::{self, TEMPLATES};
use autocoder::errors::PipelineError;
use autocoder::ui::icons::{CROSS, WARN};
use console::style;
use dialoguer::{Input, Select, theme::ColorfulTheme};

use super::run::{RunOptions, build_orchestrator, print_report, run_with_progress};

enum Choice {
    Idea(String),
    Quit,
}

pub async fn cmd_session(project_dir: &Path, options: &RunOptions) -> Result<()> {
    let config = options.config(project_dir)?;
    let mut pipeline = build_orchestrator(&config);
    let delay = config.error_reset_delay();

    println!();
    println!("{}", style("Autocoder session").bold());
    println!("Describe an app, type a template name, or leave empty to pick one.");
    println!();

    loop {
        let idea = match next_idea()? {
            Choice::Idea(idea) => idea,
            Choice::Quit => break,
        };

        match run_with_progress(&mut pipeline, &idea, options.verbose).await {
            Ok(report) => {
                print_report(&report);
                pipeline.reset();
            }
            Err(PipelineError::Validation(e)) => {
                println!("{} {}", WARN, e);
            }
            Err(e) => {
                println!("{} {}", CROSS, style(&e).red());
                println!(
                    "{}",
                    style(format!("Resetting in {}s...", delay.as_secs())).dim()
                );
                pipeline.reset_after_error().await;
            }
        }
    }

    println!("Bye.");
    Ok(())
}

fn next_idea() -> Result<Choice> {
    let theme = ColorfulTheme::default();
    let input: String = Input::with_theme(&theme)
        .with_prompt("Idea")
        .allow_empty(true)
        .interact_text()?;
    let input = input.trim();

    if matches!(input, "quit" | "exit" | "q") {
        return Ok(Choice::Quit);
    }
    if !input.is_empty() {
        let idea = catalog::find(input)
            .map(|t| t.idea.to_string())
            .unwrap_or_else(|| input.to_string());
        return Ok(Choice::Idea(idea));
    }

    let mut items: Vec<String> = TEMPLATES
        .iter()
        .map(|t| format!("{}{} - {}", t.icon, t.title, t.description))
        .collect();
    items.push("Quit".to_string());

    let selection = Select::with_theme(&theme)
        .with_prompt("Quick start templates")
        .items(&items)
        .default(0)
        .interact()?;

    Ok(TEMPLATES
        .get(selection)
        .map(|t| Choice::Idea(t.idea.to_string()))
        .unwrap_or(Choice::Quit))
}
