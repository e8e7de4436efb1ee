use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The stage a run is currently in.
///
/// Runs move strictly forward through [`STAGES`]; any active stage may fail
/// into `Error`, and the terminal states reset back to `Idle`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PipelineStatus {
    #[default]
    Idle,
    Analyzing,
    Planning,
    GeneratingTickets,
    Coding,
    Testing,
    Deploying,
    Completed,
    Error,
}

/// The displayed stages, in run order.
pub const STAGES: [PipelineStatus; 7] = [
    PipelineStatus::Analyzing,
    PipelineStatus::Planning,
    PipelineStatus::GeneratingTickets,
    PipelineStatus::Coding,
    PipelineStatus::Testing,
    PipelineStatus::Deploying,
    PipelineStatus::Completed,
];

impl PipelineStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Analyzing => "analyzing",
            Self::Planning => "planning",
            Self::GeneratingTickets => "generating-tickets",
            Self::Coding => "coding",
            Self::Testing => "testing",
            Self::Deploying => "deploying",
            Self::Completed => "completed",
            Self::Error => "error",
        }
    }

    /// Short label for progress displays.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Analyzing => "Analyzing",
            Self::Planning => "Planning",
            Self::GeneratingTickets => "Tickets",
            Self::Coding => "Coding",
            Self::Testing => "Testing",
            Self::Deploying => "Deploying",
            Self::Completed => "Live!",
            Self::Error => "Error",
        }
    }

    /// The next stage on the happy path, if any.
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Idle => Some(Self::Analyzing),
            Self::Analyzing => Some(Self::Planning),
            Self::Planning => Some(Self::GeneratingTickets),
            Self::GeneratingTickets => Some(Self::Coding),
            Self::Coding => Some(Self::Testing),
            Self::Testing => Some(Self::Deploying),
            Self::Deploying => Some(Self::Completed),
            Self::Completed | Self::Error => None,
        }
    }

    /// A run is in flight between `Analyzing` and `Deploying` inclusive.
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle | Self::Completed | Self::Error)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Error)
    }

    pub fn can_transition_to(&self, to: PipelineStatus) -> bool {
        if self.next() == Some(to) {
            return true;
        }
        match to {
            Self::Error => self.is_active(),
            Self::Idle => self.is_terminal(),
            _ => false,
        }
    }

    /// Position in [`STAGES`], 1-based.
    pub fn stage_index(&self) -> Option<usize> {
        STAGES.iter().position(|s| s == self).map(|i| i + 1)
    }

    /// Share of displayed stages reached, 0 when outside a run.
    pub fn progress_percent(&self) -> u8 {
        match self.stage_index() {
            Some(i) => ((i * 100) / STAGES.len()) as u8,
            None => 0,
        }
    }
}

impl std::fmt::Display for PipelineStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PipelineStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "idle" => Ok(Self::Idle),
            "analyzing" => Ok(Self::Analyzing),
            "planning" => Ok(Self::Planning),
            "generating-tickets" => Ok(Self::GeneratingTickets),
            "coding" => Ok(Self::Coding),
            "testing" => Ok(Self::Testing),
            "deploying" => Ok(Self::Deploying),
            "completed" => Ok(Self::Completed),
            "error" => Ok(Self::Error),
            _ => Err(format!("Invalid pipeline status: {}", s)),
        }
    }
}
