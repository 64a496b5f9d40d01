//! Errors raised while reading or attaching schedules.

use thiserror::Error;

/// Error produced when a schedule cannot be read or does not fit a catalog.
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML error: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("line {line}: invalid token `{token}`")]
    InvalidToken { line: usize, token: String },

    #[error("expected {expected} teams, found {found}")]
    TeamCount { expected: usize, found: usize },

    #[error("team {team}: expected {expected} slots, found {found}")]
    SlotCount {
        team: usize,
        expected: usize,
        found: usize,
    },

    #[error("team {team} slot {slot}: opponent {opponent} out of range")]
    InvalidOpponent {
        team: usize,
        slot: usize,
        opponent: usize,
    },

    #[error("schedule belongs to instance `{found}`, expected `{expected}`")]
    InstanceMismatch { expected: String, found: String },

    #[error("unknown {kind} id `{id}`")]
    UnknownId { kind: &'static str, id: String },

    #[error("missing element <{0}>")]
    MissingElement(String),

    #[error("missing attribute `{attribute}` on <{element}>")]
    MissingAttribute { element: String, attribute: String },

    #[error("slot {slot}: team {team} has no game")]
    Unassigned { team: usize, slot: usize },
}

/// Result type for schedule operations.
pub type Result<T> = std::result::Result<T, ScheduleError>;
