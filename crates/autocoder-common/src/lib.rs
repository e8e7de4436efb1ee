//! Shared domain types for the autocoder pipeline.
//!
//! Everything a run produces lives here as plain data: the user's [`Idea`],
//! the synthesized [`Pitch`] and [`TechnicalSpec`], the planned [`Ticket`]s,
//! the accumulated [`FileMapping`], and the run's [`PipelineStatus`].
//! The types carry serde derives with camelCase field names so that model
//! responses deserialize straight into them.

pub mod files;
pub mod idea;
pub mod pitch;
pub mod spec;
pub mod status;
pub mod ticket;

pub use files::FileMapping;
pub use idea::{Idea, MIN_IDEA_LENGTH, ValidationError};
pub use pitch::{Complexity, Pitch, TechStack};
pub use spec::{
    Architecture, Controller, Feature, HttpMethod, Model, Relationship, RelationshipKind, Route,
    TechnicalSpec, View,
};
pub use status::{PipelineStatus, STAGES};
pub use ticket::{Priority, Ticket, TicketKind, TicketStatus, TicketTransitionError, ticket_id};
