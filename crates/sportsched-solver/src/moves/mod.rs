//! Move system for modifying timetables.
//!
//! Every neighborhood is a move type implementing [`Move`]:
//! - [`SwapHomes`] - reverses home and away in both meetings of a pair
//! - [`SwapTeams`] - exchanges the complete calendars of two teams
//! - [`SwapRounds`] - exchanges two complete rounds
//! - [`SwapMatchesNotPhased`] - exchanges one game of two teams and repairs
//!   the pairing along a chain of slots
//! - [`SwapMatchesPhased`] - the same exchange restricted to games of one leg
//! - [`SwapMatchRound`] - moves a closed cycle of games between two slots
//!
//! [`ScheduleMove`] wraps the six kinds and [`NeighborhoodUnion`] draws them
//! by configured rates.
//!
//! A move is applied in two steps: [`Move::execute`] runs the mutation
//! primitives and the leg fix-up on a bare [`Timetable`], then the costs are
//! updated over [`Move::affected`], or recomputed in full when the move is
//! too long for a partial update.

mod kind;
mod swap_homes;
mod swap_match_round;
mod swap_matches;
mod swap_matches_phased;
mod swap_rounds;
mod swap_teams;
mod union;

#[cfg(test)]
mod tests;

use std::fmt::{Debug, Display};

use rand::Rng;
use smallvec::SmallVec;
use sportsched_core::ConstraintFamily;
use sportsched_scoring::cost::constraint_cost;
use sportsched_scoring::{AffectedConstraints, ScheduleState, Timetable};

use crate::error::MoveError;

pub use kind::{MoveKind, ScheduleMove};
pub use swap_homes::SwapHomes;
pub use swap_match_round::SwapMatchRound;
pub use swap_matches::SwapMatchesNotPhased;
pub use swap_matches_phased::SwapMatchesPhased;
pub use swap_rounds::SwapRounds;
pub use swap_teams::SwapTeams;
pub use union::{NeighborhoodRates, NeighborhoodUnion};

/// Slots or teams forced into a move by its repair chain.
pub type Chain = SmallVec<[usize; 8]>;

/// Random draws per call when nothing else bounds the search.
pub const RANDOM_ATTEMPTS: usize = 1_000;

/// Random draws per call while hard-worsening moves are forbidden.
pub const FORBID_HARD_ATTEMPTS: usize = 100;

/// A schedule move.
///
/// Implementors provide the structural part: random draws, validity, the
/// mutation itself and the constraints it touches. Feasibility under the
/// "forbid hard worsening" flag and the feasible-only enumeration are
/// derived from those.
pub trait Move: Sized + Clone + Debug + Display {
    /// Neighborhood name used in logs and errors.
    const NAME: &'static str;

    /// Draws one candidate, or `None` when the draw is structurally invalid.
    fn draw<R: Rng + ?Sized>(state: &ScheduleState, rng: &mut R) -> Option<Self>;

    /// Maximum number of draws per [`random`](Self::random) call.
    fn attempts(_state: &ScheduleState) -> usize {
        RANDOM_ATTEMPTS
    }

    /// Returns true if the move, including its chain, matches `state`.
    fn is_valid(&self, state: &ScheduleState) -> bool;

    /// Runs the mutation primitives and the leg fix-up. Costs are not
    /// touched.
    fn execute(&self, tt: &mut Timetable);

    /// Constraints whose cost may change, read from the pre-move state.
    /// `None` requests a full recomputation.
    fn affected(&self, state: &ScheduleState) -> Option<AffectedConstraints>;

    /// First structurally valid move in enumeration order.
    fn first_candidate(state: &ScheduleState) -> Option<Self>;

    /// Advances to the next structurally valid move. Returns false when the
    /// neighborhood is exhausted.
    fn next_candidate(&mut self, state: &ScheduleState) -> bool;

    /// Draws a feasible move, giving up after a bounded number of draws.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::EmptyNeighborhood`] when no draw succeeds.
    fn random<R: Rng + ?Sized>(state: &ScheduleState, rng: &mut R) -> Result<Self, MoveError> {
        let mut attempts = Self::attempts(state);
        if state.flags().forbid_hard_worsening {
            attempts = attempts.min(FORBID_HARD_ATTEMPTS);
        }
        for _ in 0..attempts {
            if let Some(mv) = Self::draw(state, rng) {
                if mv.keeps_hard_feasible(state) {
                    return Ok(mv);
                }
            }
        }
        Err(MoveError::EmptyNeighborhood(Self::NAME))
    }

    /// Structural validity plus, when the stage forbids hard-worsening
    /// moves, a simulation on a copy of the timetable.
    fn is_feasible(&self, state: &ScheduleState) -> bool {
        self.is_valid(state) && self.keeps_hard_feasible(state)
    }

    /// Returns true if hard-worsening moves are allowed or every hard
    /// constraint costs zero after the move.
    fn keeps_hard_feasible(&self, state: &ScheduleState) -> bool {
        if !state.flags().forbid_hard_worsening {
            return true;
        }
        let mut scratch = state.timetable().clone();
        self.execute(&mut scratch);
        hard_constraints_hold(state, &scratch)
    }

    /// Executes the move and brings the costs up to date.
    fn apply(&self, state: &mut ScheduleState) {
        let affected = self.affected(state);
        self.execute(state.timetable_mut());
        match affected {
            Some(affected) => state.update_costs(&affected),
            None => {
                state.full_recompute();
            }
        }
    }

    /// First feasible move in enumeration order.
    fn first(state: &ScheduleState) -> Option<Self> {
        let mut mv = Self::first_candidate(state)?;
        if mv.keeps_hard_feasible(state) || mv.next(state) {
            Some(mv)
        } else {
            None
        }
    }

    /// Advances to the next feasible move.
    fn next(&mut self, state: &ScheduleState) -> bool {
        while self.next_candidate(state) {
            if self.keeps_hard_feasible(state) {
                return true;
            }
        }
        false
    }
}

/// Returns true if every hard constraint of the state's catalog costs zero
/// on `tt`.
pub fn hard_constraints_hold(state: &ScheduleState, tt: &Timetable) -> bool {
    let catalog = state.catalog();
    ConstraintFamily::ALL.into_iter().all(|family| {
        catalog
            .hard_indices(family)
            .iter()
            .all(|&index| constraint_cost(catalog, tt, state.weights(), family, index) == 0)
    })
}

/// Union of the reverse-index entries of the given cells.
pub(crate) fn cells_affected(
    state: &ScheduleState,
    cells: impl IntoIterator<Item = (usize, usize)>,
) -> AffectedConstraints {
    let index = state.catalog().index();
    let mut affected = AffectedConstraints::new();
    for (team, slot) in cells {
        affected.extend(index.team_slot(team, slot));
    }
    affected
}

/// Two distinct teams, sorted.
pub(crate) fn random_team_pair<R: Rng + ?Sized>(
    num_teams: usize,
    rng: &mut R,
) -> Option<(usize, usize)> {
    if num_teams < 2 {
        return None;
    }
    let t1 = rng.random_range(0..num_teams);
    let mut t2 = rng.random_range(0..num_teams - 1);
    if t2 >= t1 {
        t2 += 1;
    }
    Some((t1.min(t2), t1.max(t2)))
}

/// A second slot distinct from `r1`, in the same half unless `mix_phase`.
pub(crate) fn random_partner_slot<R: Rng + ?Sized>(
    r1: usize,
    num_slots: usize,
    mix_phase: bool,
    rng: &mut R,
) -> Option<usize> {
    let (lo, hi) = if mix_phase {
        (0, num_slots)
    } else if r1 < num_slots / 2 {
        (0, num_slots / 2)
    } else {
        (num_slots / 2, num_slots)
    };
    if hi - lo < 2 {
        return None;
    }
    let r2 = rng.random_range(lo..hi - 1);
    Some(if r2 >= r1 { r2 + 1 } else { r2 })
}

/// Next `(a, b)` with `a < b < n` in lexicographic order.
pub(crate) fn next_pair(a: usize, b: usize, n: usize) -> Option<(usize, usize)> {
    if b + 1 < n {
        Some((a, b + 1))
    } else if a + 2 < n {
        Some((a + 1, a + 2))
    } else {
        None
    }
}

/// Parses `"[a,b,c]"` into a chain.
pub(crate) fn parse_list(text: &str) -> Option<Chain> {
    let inner = text.strip_prefix('[')?.strip_suffix(']')?;
    inner
        .split(',')
        .map(|token| token.trim().parse().ok())
        .collect()
}

/// Writes `[a,b,c]`.
pub(crate) fn write_list(f: &mut std::fmt::Formatter<'_>, items: &[usize]) -> std::fmt::Result {
    f.write_str("[")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write!(f, "{}", item)?;
    }
    f.write_str("]")
}

/// Parses `"<a-b>"`.
pub(crate) fn parse_pair(text: &str) -> Option<(usize, usize)> {
    let inner = text.trim().strip_prefix('<')?.strip_suffix('>')?;
    let (a, b) = inner.split_once('-')?;
    Some((a.trim().parse().ok()?, b.trim().parse().ok()?))
}
