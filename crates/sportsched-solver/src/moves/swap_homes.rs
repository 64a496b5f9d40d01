//! SwapHomes - reverses the venues of both meetings of a pair.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use sportsched_scoring::{AffectedConstraints, ScheduleState, Timetable};

use super::{cells_affected, next_pair, parse_pair, random_team_pair, Move};
use crate::error::MoveError;

/// Swaps home and away in the two games between `t1` and `t2`.
///
/// Applying the same move twice restores the schedule.
///
/// # Example
///
/// ```
/// use sportsched_solver::moves::SwapHomes;
///
/// let mv: SwapHomes = "<1-3>".parse().unwrap();
/// assert_eq!(mv, SwapHomes::new(1, 3));
/// assert_eq!(mv.to_string(), "<1-3>");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SwapHomes {
    pub t1: usize,
    pub t2: usize,
}

impl SwapHomes {
    pub fn new(t1: usize, t2: usize) -> Self {
        Self { t1, t2 }
    }
}

impl Move for SwapHomes {
    const NAME: &'static str = "swap_homes";

    fn draw<R: Rng + ?Sized>(state: &ScheduleState, rng: &mut R) -> Option<Self> {
        let (t1, t2) = random_team_pair(state.timetable().num_teams(), rng)?;
        Some(Self::new(t1, t2))
    }

    fn is_valid(&self, state: &ScheduleState) -> bool {
        self.t1 < self.t2 && self.t2 < state.timetable().num_teams()
    }

    fn execute(&self, tt: &mut Timetable) {
        tt.swap_homes(self.t1, self.t2);
    }

    fn affected(&self, state: &ScheduleState) -> Option<AffectedConstraints> {
        let tt = state.timetable();
        let first = tt.match_slot(self.t1, self.t2);
        let second = tt.match_slot(self.t2, self.t1);
        Some(cells_affected(
            state,
            [
                (self.t1, first),
                (self.t2, first),
                (self.t1, second),
                (self.t2, second),
            ],
        ))
    }

    fn first_candidate(state: &ScheduleState) -> Option<Self> {
        (state.timetable().num_teams() >= 2).then(|| Self::new(0, 1))
    }

    fn next_candidate(&mut self, state: &ScheduleState) -> bool {
        match next_pair(self.t1, self.t2, state.timetable().num_teams()) {
            Some((t1, t2)) => {
                *self = Self::new(t1, t2);
                true
            }
            None => false,
        }
    }
}

impl fmt::Display for SwapHomes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}-{}>", self.t1, self.t2)
    }
}

impl FromStr for SwapHomes {
    type Err = MoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (t1, t2) = parse_pair(s).ok_or_else(|| MoveError::Parse(s.to_string()))?;
        Ok(Self::new(t1, t2))
    }
}
