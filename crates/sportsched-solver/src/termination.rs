//! Stop conditions of an annealing stage.

use std::fmt::Debug;

use sportsched_scoring::ScheduleState;

/// Snapshot handed to a [`Termination`] before every evaluation.
#[derive(Debug, Clone, Copy)]
pub struct SearchProgress<'a> {
    /// Moves evaluated so far in the stage.
    pub evaluations: u64,
    /// The current state.
    pub state: &'a ScheduleState,
}

/// Decides when an annealing stage stops.
pub trait Termination: Debug {
    fn is_terminated(&self, progress: &SearchProgress<'_>) -> bool;
}

/// Stops once `limit` moves have been evaluated.
///
/// # Example
///
/// ```
/// use sportsched_solver::termination::EvaluationCountTermination;
///
/// let budget = EvaluationCountTermination::new(40_000);
/// assert_eq!(budget.limit(), 40_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluationCountTermination {
    limit: u64,
}

impl EvaluationCountTermination {
    pub fn new(limit: u64) -> Self {
        Self { limit }
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }
}

impl Termination for EvaluationCountTermination {
    fn is_terminated(&self, progress: &SearchProgress<'_>) -> bool {
        progress.evaluations >= self.limit
    }
}

/// Stops as soon as the hard and phase costs are both zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ZeroHardTermination;

impl Termination for ZeroHardTermination {
    fn is_terminated(&self, progress: &SearchProgress<'_>) -> bool {
        progress.state.zero_hard_reached()
    }
}

/// Stops when either condition holds.
#[derive(Debug, Clone, Copy)]
pub struct OrTermination<A, B>(pub A, pub B);

impl<A: Termination, B: Termination> Termination for OrTermination<A, B> {
    fn is_terminated(&self, progress: &SearchProgress<'_>) -> bool {
        self.0.is_terminated(progress) || self.1.is_terminated(progress)
    }
}
