//! Typed error hierarchy for the autocoder pipeline.
//!
//! The enums map onto how far a failure is allowed to travel:
//! - `ValidationError` rejects an idea before any stage starts
//! - `LlmError` comes out of a `PromptClient`
//! - `SynthesisError` and `ExecutionError` are always recovered via fallbacks
//! - `ValidationFailure` is advisory and only reported
//! - `StageError` is the only one that moves a run to `error`
//! - `PipelineError` is what `PipelineOrchestrator::submit` returns

use autocoder_common::{PipelineStatus, TicketTransitionError};
use serde::Serialize;
use thiserror::Error;

pub use autocoder_common::ValidationError;

/// Errors from a hosted model call.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Model API returned HTTP {code}: {body}")]
    Status { code: u16, body: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Model returned an empty completion")]
    EmptyResponse,

    #[error("Model client misconfigured: {0}")]
    Misconfiguration(String),
}

/// Why pitch or spec synthesis fell back to its fixed value.
#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("Model call failed: {0}")]
    Model(#[from] LlmError),

    #[error("No JSON object found in model response")]
    NoJson,

    #[error("Model response is not a valid {what}: {source}")]
    Parse {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Why a ticket's code generation fell back to its template.
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("Model call failed: {0}")]
    Model(#[from] LlmError),

    #[error("Model returned no code for {path}")]
    EmptyCode { path: String },
}

/// The first structural check a file mapping failed.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationFailure {
    #[error("Missing required files: {}", .paths.join(", "))]
    MissingFiles { paths: Vec<String> },

    #[error("Malformed index.html: {reason}")]
    MalformedHtml { reason: String },

    #[error("Syntax error in {path} at line {line}: {message}")]
    ScriptSyntax {
        path: String,
        line: usize,
        message: String,
    },
}

/// Unexpected failure inside a stage.
#[derive(Debug, Error)]
pub enum StageError {
    #[error("Invalid pipeline transition from {from} to {to}")]
    InvalidTransition {
        from: PipelineStatus,
        to: PipelineStatus,
    },

    #[error(transparent)]
    Ticket(#[from] TicketTransitionError),

    #[error("Packaging failed: {0:#}")]
    Packaging(#[source] anyhow::Error),
}

/// Errors surfaced to the caller of `submit`.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("A run is not accepted while the pipeline is {status}")]
    NotReady { status: PipelineStatus },

    #[error("Stage {stage} failed: {source}")]
    Stage {
        stage: PipelineStatus,
        #[source]
        source: StageError,
    },
}
