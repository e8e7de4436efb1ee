//! One idea end to end for `autocoder run`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Result, bail};
use autocoder::catalog;
use autocoder::config::AutocoderConfig;
use autocoder::errors::PipelineError;
use autocoder::llm::{GeminiClient, OfflineClient, PromptClient};
use autocoder::packager::DirectoryPackager;
use autocoder::pipeline::{PipelineEvent, PipelineOrchestrator, RunReport};
use autocoder::planner::total_estimated_minutes;
use autocoder::ui::PipelineUI;
use autocoder::ui::icons::{CHECK, CLOCK, FOLDER, ROCKET, SPARKLE, WARN};
use console::style;
use tracing::{debug, info, warn};

/// Settings shared by `run` and `session`.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub offline: bool,
    pub model: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub verbose: bool,
}

impl RunOptions {
    pub fn config(&self, project_dir: &Path) -> Result<AutocoderConfig> {
        AutocoderConfig::with_cli_args(
            project_dir.to_path_buf(),
            self.offline,
            self.model.clone(),
            self.output_dir.clone(),
        )
    }
}

pub async fn cmd_run(
    project_dir: &Path,
    idea: Option<&str>,
    template: Option<&str>,
    options: &RunOptions,
) -> Result<()> {
    let idea = resolve_idea(idea, template)?;
    let config = options.config(project_dir)?;
    let mut pipeline = build_orchestrator(&config);

    let report = run_with_progress(&mut pipeline, &idea, options.verbose).await?;
    print_report(&report);
    Ok(())
}

/// The idea text from either a positional argument or a catalog template.
pub fn resolve_idea(idea: Option<&str>, template: Option<&str>) -> Result<String> {
    match (idea, template) {
        (Some(_), Some(_)) => bail!("Pass either an idea or --template, not both"),
        (None, Some(name)) => match catalog::find(name) {
            Some(template) => Ok(template.idea.to_string()),
            None => bail!(
                "Unknown template '{}'. Available: {}",
                name,
                catalog::slugs().join(", ")
            ),
        },
        (Some(idea), None) => Ok(idea.to_string()),
        (None, None) => bail!("Describe the app to build, or pass --template <name>"),
    }
}

/// The hosted client, or the offline client when `--offline` is set or no
/// API key is available.
pub fn prompt_client(config: &AutocoderConfig) -> Arc<dyn PromptClient> {
    if config.offline {
        info!("Offline mode, every stage uses its fallback");
        return Arc::new(OfflineClient);
    }
    match GeminiClient::from_config(config) {
        Ok(client) => {
            info!(model = client.model(), "Using hosted model");
            Arc::new(client)
        }
        Err(e) => {
            warn!(error = %e, "Hosted model unavailable, running offline");
            eprintln!("{} {} Running offline.", WARN, e);
            Arc::new(OfflineClient)
        }
    }
}

pub fn build_orchestrator(config: &AutocoderConfig) -> PipelineOrchestrator {
    let packager = DirectoryPackager::new(config.output_dir(), config.provider());
    PipelineOrchestrator::new(
        prompt_client(config),
        config.completion_options(),
        Arc::new(packager),
    )
    .with_reset_delay(config.error_reset_delay())
}

/// Submit `idea`, rendering pipeline events while the run is in flight.
pub async fn run_with_progress(
    pipeline: &mut PipelineOrchestrator,
    idea: &str,
    verbose: bool,
) -> Result<RunReport, PipelineError> {
    let ui = PipelineUI::new(verbose);
    let mut events = pipeline.subscribe();

    let submit = pipeline.submit(idea);
    tokio::pin!(submit);
    let result = loop {
        tokio::select! {
            result = &mut submit => break result,
            Ok(event) = events.recv() => render(&ui, &event),
        }
    };
    while let Ok(event) = events.try_recv() {
        render(&ui, &event);
    }
    ui.finish();
    result
}

fn render(ui: &PipelineUI, event: &PipelineEvent) {
    debug!(event = event.kind(), "Pipeline event");
    ui.handle(event);
}

pub fn print_report(report: &RunReport) {
    let pitch = &report.pitch.value;
    let minutes = total_estimated_minutes(&report.tickets);
    let completed = report.tickets.iter().filter(|t| t.is_completed()).count();

    println!();
    println!("{} {}", SPARKLE, style(&pitch.title).bold());
    if !pitch.description.is_empty() {
        println!("  {}", pitch.description);
    }
    println!();
    println!("  Run:        {}", report.run_id);
    println!("  Status:     {}", style("completed").green());
    println!(
        "  Tickets:    {}/{} completed {}{} min estimated",
        completed,
        report.tickets.len(),
        CLOCK,
        minutes
    );
    println!(
        "  Files:      {} ({} bytes)",
        report.files.len(),
        report.files.total_bytes()
    );
    println!("  Fallbacks:  {}", report.fallback_count);
    match &report.validation {
        Ok(()) => println!("  Validation: {} passed", CHECK),
        Err(failure) => println!("  Validation: {} {}", WARN, style(failure).yellow()),
    }
    if let Some(location) = &report.deployment.location {
        println!("  Output:     {}{}", FOLDER, location.display());
    }
    println!(
        "  Digest:     {}",
        report
            .deployment
            .digest
            .get(..12)
            .unwrap_or(&report.deployment.digest)
    );
    println!(
        "  URL:        {}{}",
        ROCKET,
        style(&report.deployment.url).cyan().underlined()
    );
    println!();
}
