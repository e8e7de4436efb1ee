use crate::packager::DeploymentHandle;
use crate::pipeline::PipelineEvent;
use crate::synthesis::Provenance;
use crate::ui::icons::{CHECK, CROSS, FALLBACK, FILE_NEW, RESET, ROCKET, RUNNING, WARN};
use autocoder_common::{PipelineStatus, STAGES, Ticket};
use console::style;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

/// Terminal UI for a pipeline run, rendered via `indicatif` progress bars.
///
/// Two bars are stacked vertically:
/// - Stage bar, one step per pipeline stage
/// - Ticket bar, a spinner with the ticket being coded
///
/// Feed it every [`PipelineEvent`] through [`Self::handle`].
pub struct PipelineUI {
    multi: MultiProgress,
    stage_bar: ProgressBar,
    ticket_bar: ProgressBar,
    verbose: bool,
}

impl PipelineUI {
    pub fn new(verbose: bool) -> Self {
        Self::with_draw_target(ProgressDrawTarget::stderr(), verbose)
    }

    /// A UI that draws nothing.
    pub fn hidden() -> Self {
        Self::with_draw_target(ProgressDrawTarget::hidden(), false)
    }

    fn with_draw_target(target: ProgressDrawTarget, verbose: bool) -> Self {
        let multi = MultiProgress::with_draw_target(target);

        let stage_style = ProgressStyle::default_bar()
            .template("{prefix:.bold.dim} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .expect("progress bar template is a valid static string")
            .progress_chars("█▓▒░");

        let stage_bar = multi.add(ProgressBar::new(STAGES.len() as u64));
        stage_bar.set_style(stage_style);
        stage_bar.set_prefix(" Stage");

        let ticket_style = ProgressStyle::default_spinner()
            .template("{prefix:.bold.dim} {spinner} {msg}")
            .expect("progress bar template is a valid static string");

        let ticket_bar = multi.add(ProgressBar::new_spinner());
        ticket_bar.set_style(ticket_style);
        ticket_bar.set_prefix("Ticket");

        Self {
            multi,
            stage_bar,
            ticket_bar,
            verbose,
        }
    }

    /// Print a line via `MultiProgress`, falling back to `eprintln!` if the rich UI fails.
    fn print_line(&self, msg: impl AsRef<str>) {
        if self.multi.println(msg.as_ref()).is_err() {
            eprintln!("{}", msg.as_ref());
        }
    }

    pub fn handle(&self, event: &PipelineEvent) {
        match event {
            PipelineEvent::StageChanged { snapshot } => {
                self.stage_changed(snapshot.status, snapshot.tickets.len())
            }
            PipelineEvent::TicketStarted { ticket } => self.ticket_started(ticket),
            PipelineEvent::TicketCompleted {
                ticket,
                paths,
                provenance,
            } => self.ticket_completed(ticket, paths, provenance),
            PipelineEvent::ValidationFinished { passed, failure } => match failure {
                Some(failure) if !passed => self.print_line(format!(
                    "  {} Validation failed: {}",
                    WARN,
                    style(failure).yellow()
                )),
                _ => self.print_line(format!("  {} Validation passed", CHECK)),
            },
            PipelineEvent::Deployed { handle } => self.deployed(handle),
            PipelineEvent::Failed { message } => {
                self.ticket_bar.finish_and_clear();
                self.stage_bar
                    .abandon_with_message(format!("{}", style("failed").red().bold()));
                self.print_line(format!("{} {}", CROSS, style(message).red()));
            }
            PipelineEvent::Reset => {
                self.print_line(format!("{} {}", RESET, style("Ready for a new idea").dim()));
            }
        }
    }

    fn stage_changed(&self, status: PipelineStatus, ticket_count: usize) {
        if let Some(index) = status.stage_index() {
            self.stage_bar.set_position(index as u64);
        }
        self.stage_bar.set_message(format!(
            "{} {}",
            style(status.label()).yellow(),
            style(format!("({}%)", status.progress_percent())).dim()
        ));

        match status {
            PipelineStatus::Coding => {
                self.ticket_bar.set_length(ticket_count as u64);
                self.ticket_bar.set_position(0);
                self.ticket_bar.enable_steady_tick(Duration::from_millis(100));
            }
            PipelineStatus::Testing => {
                self.ticket_bar.finish_and_clear();
            }
            PipelineStatus::Completed => {
                self.stage_bar
                    .finish_with_message(format!("{}", style(status.label()).green().bold()));
            }
            _ => {}
        }

        if status != PipelineStatus::Completed {
            self.print_line(format!("{} {}", RUNNING, style(status.label()).bold()));
        }
    }

    fn ticket_started(&self, ticket: &Ticket) {
        self.ticket_bar.set_message(format!(
            "{} {}",
            style(&ticket.id).cyan(),
            ticket.title
        ));
    }

    fn ticket_completed(&self, ticket: &Ticket, paths: &[String], provenance: &Provenance) {
        self.ticket_bar.inc(1);
        let icon = if provenance.is_fallback() { FALLBACK } else { CHECK };
        self.print_line(format!(
            "    {} {} {} {}",
            icon,
            style(&ticket.id).cyan(),
            ticket.title,
            style(format!("[{}]", provenance_tag(provenance))).dim()
        ));
        if self.verbose {
            for path in paths {
                self.print_line(format!("        {} {}", FILE_NEW, style(path).dim()));
            }
            if let Provenance::Fallback { reason } = provenance {
                self.print_line(format!("        {}", style(reason).dim()));
            }
        }
    }

    fn deployed(&self, handle: &DeploymentHandle) {
        self.print_line(format!(
            "  {} Packaged {} files as {}",
            ROCKET,
            handle.file_count,
            style(&handle.name).bold()
        ));
    }

    /// Clear any bars still drawing.
    pub fn finish(&self) {
        self.ticket_bar.finish_and_clear();
        if !self.stage_bar.is_finished() {
            self.stage_bar.finish_and_clear();
        }
    }
}

/// Short label for where a ticket's files came from.
pub fn provenance_tag(provenance: &Provenance) -> &'static str {
    match provenance {
        Provenance::Model => "model",
        Provenance::Fallback { .. } => "fallback",
        Provenance::Static => "static",
    }
}
