//! Solver errors.

use thiserror::Error;

use sportsched_config::ConfigError;
use sportsched_core::CatalogError;
use sportsched_scoring::ScheduleError;

/// Failure of a single neighborhood.
///
/// `EmptyNeighborhood` is recoverable: the caller tries another move kind or
/// ends the stage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("no feasible {0} move found")]
    EmptyNeighborhood(&'static str),

    #[error("invalid move `{0}`")]
    Parse(String),
}

/// Error raised while preparing or running the stages of a solve.
#[derive(Debug, Error)]
pub enum SolveError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("initial schedule is inconsistent:\n{0}")]
    Inconsistent(String),
}

/// Result type for stage orchestration.
pub type Result<T> = std::result::Result<T, SolveError>;
