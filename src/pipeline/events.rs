use autocoder_common::{FileMapping, PipelineStatus, Ticket};
use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::errors::ValidationFailure;
use crate::packager::DeploymentHandle;
use crate::synthesis::Provenance;

/// Capacity of the event channel. Slow subscribers lag rather than block
/// the run.
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

/// What the view layer sees of a run at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineSnapshot {
    pub run_id: Option<Uuid>,
    pub status: PipelineStatus,
    pub tickets: Vec<Ticket>,
    pub files: FileMapping,
    pub error: Option<String>,
    pub deployment: Option<DeploymentHandle>,
}

// ── Event types ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum PipelineEvent {
    StageChanged {
        snapshot: PipelineSnapshot,
    },
    TicketStarted {
        ticket: Ticket,
    },
    TicketCompleted {
        ticket: Ticket,
        paths: Vec<String>,
        provenance: Provenance,
    },
    ValidationFinished {
        passed: bool,
        failure: Option<ValidationFailure>,
    },
    Deployed {
        handle: DeploymentHandle,
    },
    Failed {
        message: String,
    },
    Reset,
}

impl PipelineEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineEvent::StageChanged { .. } => "stage_changed",
            PipelineEvent::TicketStarted { .. } => "ticket_started",
            PipelineEvent::TicketCompleted { .. } => "ticket_completed",
            PipelineEvent::ValidationFinished { .. } => "validation_finished",
            PipelineEvent::Deployed { .. } => "deployed",
            PipelineEvent::Failed { .. } => "failed",
            PipelineEvent::Reset => "reset",
        }
    }
}

/// Send an event to all subscribers. Having none is not an error.
pub fn emit(tx: &broadcast::Sender<PipelineEvent>, event: PipelineEvent) {
    let _ = tx.send(event);
}
