use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Format the dense, 1-based ticket id used throughout a run (`T1`, `T2`, …).
pub fn ticket_id(n: usize) -> String {
    format!("T{}", n)
}

/// Type tag that drives code generation for a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketKind {
    Model,
    View,
    Controller,
    Route,
    Migration,
    Test,
    Deployment,
}

impl TicketKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::View => "view",
            Self::Controller => "controller",
            Self::Route => "route",
            Self::Migration => "migration",
            Self::Test => "test",
            Self::Deployment => "deployment",
        }
    }
}

impl std::fmt::Display for TicketKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TicketStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
        }
    }

    /// Ticket status only moves forward, one step at a time.
    pub fn can_transition_to(&self, to: TicketStatus) -> bool {
        matches!(
            (self, to),
            (TicketStatus::Pending, TicketStatus::InProgress)
                | (TicketStatus::InProgress, TicketStatus::Completed)
        )
    }
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Ticket {id} cannot move from {from} to {to}")]
pub struct TicketTransitionError {
    pub id: String,
    pub from: TicketStatus,
    pub to: TicketStatus,
}

/// A unit of planned work.
///
/// `dependencies` is declarative: ids refer to other tickets of the same run,
/// but nothing orders execution by them. Tickets run in list order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: TicketKind,
    pub priority: Priority,
    #[serde(default)]
    pub status: TicketStatus,
    /// Minutes, informational only.
    pub estimated_time: u32,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl Ticket {
    /// Create a pending ticket.
    pub fn new(
        id: String,
        title: impl Into<String>,
        description: impl Into<String>,
        kind: TicketKind,
        priority: Priority,
        estimated_time: u32,
        dependencies: Vec<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            kind,
            priority,
            status: TicketStatus::Pending,
            estimated_time,
            dependencies,
        }
    }

    /// pending → in-progress
    pub fn start(&mut self) -> Result<(), TicketTransitionError> {
        self.transition(TicketStatus::InProgress)
    }

    /// in-progress → completed
    pub fn complete(&mut self) -> Result<(), TicketTransitionError> {
        self.transition(TicketStatus::Completed)
    }

    pub fn is_completed(&self) -> bool {
        self.status == TicketStatus::Completed
    }

    fn transition(&mut self, to: TicketStatus) -> Result<(), TicketTransitionError> {
        if !self.status.can_transition_to(to) {
            return Err(TicketTransitionError {
                id: self.id.clone(),
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }
}
