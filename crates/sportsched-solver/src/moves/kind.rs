//! ScheduleMove - a monomorphized union of the six move kinds.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use sportsched_scoring::{AffectedConstraints, ScheduleState, Timetable};

use super::{
    Move, SwapHomes, SwapMatchRound, SwapMatchesNotPhased, SwapMatchesPhased, SwapRounds,
    SwapTeams,
};
use crate::error::MoveError;

/// The six neighborhoods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MoveKind {
    SwapHomes,
    SwapTeams,
    SwapRounds,
    SwapMatchesNotPhased,
    SwapMatchesPhased,
    SwapMatchRound,
}

impl MoveKind {
    pub const ALL: [MoveKind; 6] = [
        MoveKind::SwapHomes,
        MoveKind::SwapTeams,
        MoveKind::SwapRounds,
        MoveKind::SwapMatchesNotPhased,
        MoveKind::SwapMatchesPhased,
        MoveKind::SwapMatchRound,
    ];

    pub const COUNT: usize = Self::ALL.len();

    /// Position in [`ALL`](Self::ALL).
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            MoveKind::SwapHomes => SwapHomes::NAME,
            MoveKind::SwapTeams => SwapTeams::NAME,
            MoveKind::SwapRounds => SwapRounds::NAME,
            MoveKind::SwapMatchesNotPhased => SwapMatchesNotPhased::NAME,
            MoveKind::SwapMatchesPhased => SwapMatchesPhased::NAME,
            MoveKind::SwapMatchRound => SwapMatchRound::NAME,
        }
    }

    /// Draws a feasible move of this kind.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::EmptyNeighborhood`] when the bounded draws fail.
    pub fn random<R: Rng + ?Sized>(
        self,
        state: &ScheduleState,
        rng: &mut R,
    ) -> Result<ScheduleMove, MoveError> {
        Ok(match self {
            MoveKind::SwapHomes => SwapHomes::random(state, rng)?.into(),
            MoveKind::SwapTeams => SwapTeams::random(state, rng)?.into(),
            MoveKind::SwapRounds => SwapRounds::random(state, rng)?.into(),
            MoveKind::SwapMatchesNotPhased => SwapMatchesNotPhased::random(state, rng)?.into(),
            MoveKind::SwapMatchesPhased => SwapMatchesPhased::random(state, rng)?.into(),
            MoveKind::SwapMatchRound => SwapMatchRound::random(state, rng)?.into(),
        })
    }

    /// First feasible move of this kind in enumeration order.
    pub fn first(self, state: &ScheduleState) -> Option<ScheduleMove> {
        match self {
            MoveKind::SwapHomes => SwapHomes::first(state).map(Into::into),
            MoveKind::SwapTeams => SwapTeams::first(state).map(Into::into),
            MoveKind::SwapRounds => SwapRounds::first(state).map(Into::into),
            MoveKind::SwapMatchesNotPhased => SwapMatchesNotPhased::first(state).map(Into::into),
            MoveKind::SwapMatchesPhased => SwapMatchesPhased::first(state).map(Into::into),
            MoveKind::SwapMatchRound => SwapMatchRound::first(state).map(Into::into),
        }
    }
}

impl fmt::Display for MoveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MoveKind {
    type Err = MoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MoveKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| MoveError::Parse(s.to_string()))
    }
}

/// Any of the six moves.
///
/// Delegates to the inner move so the annealing loop handles every kind
/// through one type without trait objects.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScheduleMove {
    SwapHomes(SwapHomes),
    SwapTeams(SwapTeams),
    SwapRounds(SwapRounds),
    SwapMatchesNotPhased(SwapMatchesNotPhased),
    SwapMatchesPhased(SwapMatchesPhased),
    SwapMatchRound(SwapMatchRound),
}

macro_rules! delegate {
    ($self:expr, $mv:ident => $body:expr) => {
        match $self {
            ScheduleMove::SwapHomes($mv) => $body,
            ScheduleMove::SwapTeams($mv) => $body,
            ScheduleMove::SwapRounds($mv) => $body,
            ScheduleMove::SwapMatchesNotPhased($mv) => $body,
            ScheduleMove::SwapMatchesPhased($mv) => $body,
            ScheduleMove::SwapMatchRound($mv) => $body,
        }
    };
}

impl ScheduleMove {
    pub fn kind(&self) -> MoveKind {
        match self {
            ScheduleMove::SwapHomes(_) => MoveKind::SwapHomes,
            ScheduleMove::SwapTeams(_) => MoveKind::SwapTeams,
            ScheduleMove::SwapRounds(_) => MoveKind::SwapRounds,
            ScheduleMove::SwapMatchesNotPhased(_) => MoveKind::SwapMatchesNotPhased,
            ScheduleMove::SwapMatchesPhased(_) => MoveKind::SwapMatchesPhased,
            ScheduleMove::SwapMatchRound(_) => MoveKind::SwapMatchRound,
        }
    }

    pub fn is_valid(&self, state: &ScheduleState) -> bool {
        delegate!(self, mv => mv.is_valid(state))
    }

    pub fn is_feasible(&self, state: &ScheduleState) -> bool {
        delegate!(self, mv => mv.is_feasible(state))
    }

    pub fn execute(&self, tt: &mut Timetable) {
        delegate!(self, mv => mv.execute(tt))
    }

    pub fn affected(&self, state: &ScheduleState) -> Option<AffectedConstraints> {
        delegate!(self, mv => mv.affected(state))
    }

    pub fn apply(&self, state: &mut ScheduleState) {
        delegate!(self, mv => mv.apply(state))
    }

    /// Advances to the next feasible move of the same kind.
    pub fn next(&mut self, state: &ScheduleState) -> bool {
        delegate!(self, mv => mv.next(state))
    }
}

impl fmt::Display for ScheduleMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        delegate!(self, mv => fmt::Display::fmt(mv, f))
    }
}

macro_rules! impl_from {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for ScheduleMove {
                fn from(mv: $variant) -> Self {
                    ScheduleMove::$variant(mv)
                }
            }
        )*
    };
}

impl_from!(
    SwapHomes,
    SwapTeams,
    SwapRounds,
    SwapMatchesNotPhased,
    SwapMatchesPhased,
    SwapMatchRound
);
