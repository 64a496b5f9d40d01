//! SwapRounds - exchanges two complete rounds.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use sportsched_scoring::{AffectedConstraints, ScheduleState, Timetable};

use super::{next_pair, parse_pair, random_partner_slot, Move};
use crate::error::MoveError;

/// Exchanges every game of slot `r1` with the games of slot `r2`.
///
/// Without phase mixing both slots must lie in the same half.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SwapRounds {
    pub r1: usize,
    pub r2: usize,
}

impl SwapRounds {
    pub fn new(r1: usize, r2: usize) -> Self {
        Self { r1, r2 }
    }
}

impl Move for SwapRounds {
    const NAME: &'static str = "swap_rounds";

    fn draw<R: Rng + ?Sized>(state: &ScheduleState, rng: &mut R) -> Option<Self> {
        let num_slots = state.timetable().num_slots();
        if num_slots < 2 {
            return None;
        }
        let r1 = rng.random_range(0..num_slots);
        let r2 = random_partner_slot(r1, num_slots, state.flags().mix_phase, rng)?;
        Some(Self::new(r1.min(r2), r1.max(r2)))
    }

    fn is_valid(&self, state: &ScheduleState) -> bool {
        self.r1 < self.r2
            && self.r2 < state.timetable().num_slots()
            && (state.flags().mix_phase || state.catalog().same_phase(self.r1, self.r2))
    }

    fn execute(&self, tt: &mut Timetable) {
        tt.swap_slots(self.r1, self.r2);
    }

    fn affected(&self, state: &ScheduleState) -> Option<AffectedConstraints> {
        let index = state.catalog().index();
        let mut affected = AffectedConstraints::new();
        affected.extend(index.slot(self.r1));
        affected.extend(index.slot(self.r2));
        Some(affected)
    }

    fn first_candidate(state: &ScheduleState) -> Option<Self> {
        let mut mv = Self::new(0, 1);
        if state.timetable().num_slots() < 2 {
            return None;
        }
        if mv.is_valid(state) || mv.next_candidate(state) {
            Some(mv)
        } else {
            None
        }
    }

    fn next_candidate(&mut self, state: &ScheduleState) -> bool {
        let num_slots = state.timetable().num_slots();
        let (mut r1, mut r2) = (self.r1, self.r2);
        while let Some(pair) = next_pair(r1, r2, num_slots) {
            (r1, r2) = pair;
            let candidate = Self::new(r1, r2);
            if candidate.is_valid(state) {
                *self = candidate;
                return true;
            }
        }
        false
    }
}

impl fmt::Display for SwapRounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}-{}>", self.r1, self.r2)
    }
}

impl FromStr for SwapRounds {
    type Err = MoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (r1, r2) = parse_pair(s).ok_or_else(|| MoveError::Parse(s.to_string()))?;
        Ok(Self::new(r1, r2))
    }
}
