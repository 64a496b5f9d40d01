//! SwapTeams - relabels two teams across the whole calendar.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use sportsched_scoring::{AffectedConstraints, ScheduleState, Timetable};

use super::{next_pair, parse_pair, random_team_pair, Move};
use crate::error::MoveError;

/// Exchanges the complete calendars of `t1` and `t2`: in every slot `t1`
/// takes over the game of `t2` with its venue, and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SwapTeams {
    pub t1: usize,
    pub t2: usize,
}

impl SwapTeams {
    pub fn new(t1: usize, t2: usize) -> Self {
        Self { t1, t2 }
    }
}

impl Move for SwapTeams {
    const NAME: &'static str = "swap_teams";

    fn draw<R: Rng + ?Sized>(state: &ScheduleState, rng: &mut R) -> Option<Self> {
        let (t1, t2) = random_team_pair(state.timetable().num_teams(), rng)?;
        Some(Self::new(t1, t2))
    }

    fn is_valid(&self, state: &ScheduleState) -> bool {
        self.t1 < self.t2 && self.t2 < state.timetable().num_teams()
    }

    fn execute(&self, tt: &mut Timetable) {
        for slot in 0..tt.num_slots() {
            tt.swap_opponents_at_slot(self.t1, self.t2, slot, false, false);
        }
        for slot in 0..tt.num_slots() {
            tt.recompute_leg_and_mirror(self.t1, slot);
            tt.recompute_leg_and_mirror(self.t2, slot);
        }
    }

    fn affected(&self, state: &ScheduleState) -> Option<AffectedConstraints> {
        let index = state.catalog().index();
        let mut affected = AffectedConstraints::new();
        affected.extend(index.team(self.t1));
        affected.extend(index.team(self.t2));
        Some(affected)
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

impl fmt::Display for SwapTeams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}-{}>", self.t1, self.t2)
    }
}

impl FromStr for SwapTeams {
    type Err = MoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (t1, t2) = parse_pair(s).ok_or_else(|| MoveError::Parse(s.to_string()))?;
        Ok(Self::new(t1, t2))
    }
}
