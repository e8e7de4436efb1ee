//! The run state machine.
//!
//! One [`PipelineOrchestrator`] drives one run at a time through
//! `analyzing → planning → generating-tickets → coding → testing →
//! deploying → completed`. Tickets execute strictly in planner order and
//! their patches are merged into one [`FileMapping`], later writes winning.
//! Only a [`StageError`] moves the run to `error`; model trouble is absorbed
//! by fallbacks further down.

use std::sync::Arc;
use std::time::Duration;

use autocoder_common::{FileMapping, Idea, Pitch, PipelineStatus, TechnicalSpec, Ticket};
use tokio::sync::broadcast;
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

use crate::errors::{PipelineError, StageError, ValidationFailure};
use crate::executor::TicketExecutor;
use crate::llm::{CompletionOptions, PromptClient};
use crate::packager::{DeploymentHandle, ProjectPackager};
use crate::planner::TicketPlanner;
use crate::synthesis::{SpecSynthesizer, Synthesized};
use crate::validator;

mod events;

pub use events::{EVENT_CHANNEL_CAPACITY, PipelineEvent, PipelineSnapshot};

/// Default wait before an errored run returns to idle.
pub const DEFAULT_RESET_DELAY: Duration = Duration::from_secs(5);

/// Everything a completed run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub run_id: Uuid,
    pub pitch: Synthesized<Pitch>,
    pub spec: Synthesized<TechnicalSpec>,
    pub tickets: Vec<Ticket>,
    pub files: FileMapping,
    pub validation: Result<(), ValidationFailure>,
    pub deployment: DeploymentHandle,
    /// Pitch, spec and ticket outputs that came from a fallback
    pub fallback_count: usize,
}

impl RunReport {
    pub fn validation_passed(&self) -> bool {
        self.validation.is_ok()
    }
}

pub struct PipelineOrchestrator {
    synthesizer: SpecSynthesizer,
    planner: TicketPlanner,
    executor: TicketExecutor,
    packager: Arc<dyn ProjectPackager>,
    events: broadcast::Sender<PipelineEvent>,
    reset_delay: Duration,

    status: PipelineStatus,
    run_id: Option<Uuid>,
    tickets: Vec<Ticket>,
    files: FileMapping,
    error: Option<String>,
    deployment: Option<DeploymentHandle>,
}

impl PipelineOrchestrator {
    pub fn new(
        client: Arc<dyn PromptClient>,
        options: CompletionOptions,
        packager: Arc<dyn ProjectPackager>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            synthesizer: SpecSynthesizer::new(client.clone(), options),
            planner: TicketPlanner::new(),
            executor: TicketExecutor::new(client, options),
            packager,
            events,
            reset_delay: DEFAULT_RESET_DELAY,
            status: PipelineStatus::Idle,
            run_id: None,
            tickets: Vec::new(),
            files: FileMapping::new(),
            error: None,
            deployment: None,
        }
    }

    pub fn with_reset_delay(mut self, delay: Duration) -> Self {
        self.reset_delay = delay;
        self
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PipelineEvent> {
        self.events.subscribe()
    }

    pub fn status(&self) -> PipelineStatus {
        self.status
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn snapshot(&self) -> PipelineSnapshot {
        PipelineSnapshot {
            run_id: self.run_id,
            status: self.status,
            tickets: self.tickets.clone(),
            files: self.files.clone(),
            error: self.error.clone(),
            deployment: self.deployment.clone(),
        }
    }

    /// Run one idea to completion.
    ///
    /// Only accepted while idle. A rejected idea leaves the orchestrator idle;
    /// a stage failure leaves it in `error` until [`reset`](Self::reset).
    pub async fn submit(&mut self, idea: &str) -> Result<RunReport, PipelineError> {
        if self.status != PipelineStatus::Idle {
            return Err(PipelineError::NotReady {
                status: self.status,
            });
        }
        let idea = Idea::parse(idea)?;

        let run_id = Uuid::new_v4();
        self.run_id = Some(run_id);
        self.tickets.clear();
        self.files = FileMapping::new();
        self.error = None;
        self.deployment = None;

        let span = info_span!("run", run_id = %run_id);
        match self.run(run_id, idea).instrument(span).await {
            Ok(report) => Ok(report),
            Err(source) => {
                let stage = self.status;
                let err = PipelineError::Stage { stage, source };
                self.fail(&err);
                Err(err)
            }
        }
    }

    async fn run(&mut self, run_id: Uuid, idea: Idea) -> Result<RunReport, StageError> {
        info!(idea = %idea.truncated(80), "Run started");

        self.transition(PipelineStatus::Analyzing)?;
        let pitch = self.synthesizer.pitch_for(&idea).await;
        let mut fallback_count = usize::from(pitch.provenance.is_fallback());

        self.transition(PipelineStatus::Planning)?;
        let spec = self.synthesizer.build_spec(&pitch.value).await;
        fallback_count += usize::from(spec.provenance.is_fallback());

        self.transition(PipelineStatus::GeneratingTickets)?;
        self.tickets = self.planner.plan(&spec.value);
        info!(tickets = self.tickets.len(), "Tickets planned");

        self.transition(PipelineStatus::Coding)?;
        for index in 0..self.tickets.len() {
            self.tickets[index].start()?;
            events::emit(
                &self.events,
                PipelineEvent::TicketStarted {
                    ticket: self.tickets[index].clone(),
                },
            );

            let output = self
                .executor
                .execute(&self.tickets[index], &self.files)
                .await;
            fallback_count += usize::from(output.provenance.is_fallback());
            let paths = self.files.merge(output.files);

            self.tickets[index].complete()?;
            info!(
                ticket = %self.tickets[index].id,
                files = paths.len(),
                "Ticket completed"
            );
            events::emit(
                &self.events,
                PipelineEvent::TicketCompleted {
                    ticket: self.tickets[index].clone(),
                    paths,
                    provenance: output.provenance,
                },
            );
        }

        self.transition(PipelineStatus::Testing)?;
        let validation = validator::check(&self.files);
        if let Err(failure) = &validation {
            warn!(failure = %failure, "Generated project failed validation");
        }
        events::emit(
            &self.events,
            PipelineEvent::ValidationFinished {
                passed: validation.is_ok(),
                failure: validation.clone().err(),
            },
        );

        self.transition(PipelineStatus::Deploying)?;
        let handle = self
            .packager
            .package(&self.files)
            .await
            .map_err(StageError::Packaging)?;
        self.deployment = Some(handle.clone());
        events::emit(
            &self.events,
            PipelineEvent::Deployed {
                handle: handle.clone(),
            },
        );

        self.transition(PipelineStatus::Completed)?;
        info!(url = %handle.url, fallbacks = fallback_count, "Run completed");

        Ok(RunReport {
            run_id,
            pitch,
            spec,
            tickets: self.tickets.clone(),
            files: self.files.clone(),
            validation,
            deployment: handle,
            fallback_count,
        })
    }

    fn transition(&mut self, to: PipelineStatus) -> Result<(), StageError> {
        if !self.status.can_transition_to(to) {
            return Err(StageError::InvalidTransition {
                from: self.status,
                to,
            });
        }
        info!(from = %self.status, to = %to, "Stage transition");
        self.status = to;
        events::emit(
            &self.events,
            PipelineEvent::StageChanged {
                snapshot: self.snapshot(),
            },
        );
        Ok(())
    }

    fn fail(&mut self, err: &PipelineError) {
        let message = err.to_string();
        warn!(error = %message, "Run failed");
        self.status = PipelineStatus::Error;
        self.error = Some(message.clone());
        events::emit(&self.events, PipelineEvent::Failed { message });
    }

    /// Return a finished or failed run to idle. Returns false when there was
    /// nothing to reset.
    pub fn reset(&mut self) -> bool {
        if !self.status.can_transition_to(PipelineStatus::Idle) {
            return false;
        }
        info!(from = %self.status, "Pipeline reset");
        self.status = PipelineStatus::Idle;
        self.error = None;
        events::emit(&self.events, PipelineEvent::Reset);
        true
    }

    /// Wait the configured delay, then reset an errored run.
    pub async fn reset_after_error(&mut self) -> bool {
        if self.status != PipelineStatus::Error {
            return false;
        }
        tokio::time::sleep(self.reset_delay).await;
        self.reset()
    }
}
