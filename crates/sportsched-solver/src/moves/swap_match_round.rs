//! SwapMatchRound - moves a closed cycle of games between two slots.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use sportsched_scoring::{AffectedConstraints, ScheduleState, Timetable};

use super::{parse_list, random_partner_slot, write_list, Chain, Move};
use crate::error::MoveError;

/// Draws per call when the halves may not be mixed. Most draws close no
/// short cycle there.
const SAME_HALF_ATTEMPTS: usize = 30;

/// Exchanges the games of the teams in `teams` between slots `r1` and `r2`.
///
/// The teams form a cycle: starting from `teams[0]`, follow the opponent
/// at `r2`, then that team's opponent at `r1`, and so on until the walk
/// returns to `teams[0]`. Swapping the two slots for exactly these teams
/// keeps every round complete. `teams[0]` must be the smallest team of the
/// cycle.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SwapMatchRound {
    pub teams: Chain,
    pub r1: usize,
    pub r2: usize,
}

impl SwapMatchRound {
    /// Builds the move for `(team, r1, r2)`, or `None` if its cycle is
    /// rejected.
    pub fn seeded(state: &ScheduleState, team: usize, r1: usize, r2: usize) -> Option<Self> {
        let teams = Self::compute_cycle(state, team, r1, r2)?;
        Some(Self { teams, r1, r2 })
    }

    /// Walks the cycle through `team`.
    pub fn compute_cycle(state: &ScheduleState, team: usize, r1: usize, r2: usize) -> Option<Chain> {
        let tt = state.timetable();
        if team >= tt.num_teams() || r1 >= r2 || r2 >= tt.num_slots() {
            return None;
        }
        if !state.flags().mix_phase && !state.catalog().same_phase(r1, r2) {
            return None;
        }
        // Longer cycles come close to a full round swap.
        let cap = state.flags().limits.cycle_cap(tt.num_teams());

        let mut teams = Chain::new();
        teams.push(team);
        let mut t = team;
        loop {
            t = tt.opponent(t, r2);
            if t < team {
                return None;
            }
            teams.push(t);
            t = tt.opponent(t, r1);
            if t < team {
                return None;
            }
            if t == team {
                return Some(teams);
            }
            teams.push(t);
            if teams.len() > cap {
                return None;
            }
        }
    }
}

impl Move for SwapMatchRound {
    const NAME: &'static str = "swap_match_round";

    fn draw<R: Rng + ?Sized>(state: &ScheduleState, rng: &mut R) -> Option<Self> {
        let tt = state.timetable();
        if tt.num_teams() == 0 || tt.num_slots() < 2 {
            return None;
        }
        let team = rng.random_range(0..tt.num_teams());
        let r1 = rng.random_range(0..tt.num_slots());
        let r2 = random_partner_slot(r1, tt.num_slots(), state.flags().mix_phase, rng)?;
        Self::seeded(state, team, r1.min(r2), r1.max(r2))
    }

    fn attempts(state: &ScheduleState) -> usize {
        if state.flags().mix_phase {
            super::RANDOM_ATTEMPTS
        } else {
            SAME_HALF_ATTEMPTS
        }
    }

    fn is_valid(&self, state: &ScheduleState) -> bool {
        self.teams.first().is_some_and(|&team| {
            Self::compute_cycle(state, team, self.r1, self.r2).as_ref() == Some(&self.teams)
        })
    }

    fn execute(&self, tt: &mut Timetable) {
        for &t in &self.teams {
            let (o1, h1) = (tt.opponent(t, self.r1), tt.is_home(t, self.r1));
            let (o2, h2) = (tt.opponent(t, self.r2), tt.is_home(t, self.r2));
            tt.set_assignment(t, self.r1, o2, h2);
            tt.set_assignment(t, self.r2, o1, h1);
        }
        for &t in &self.teams {
            tt.recompute_leg_and_mirror(t, self.r1);
            tt.recompute_leg_and_mirror(t, self.r2);
        }
    }

    fn affected(&self, state: &ScheduleState) -> Option<AffectedConstraints> {
        let index = state.catalog().index();
        let mut affected = AffectedConstraints::new();
        affected.extend(index.slot(self.r1));
        affected.extend(index.slot(self.r2));
        Some(affected)
    }

    fn first_candidate(state: &ScheduleState) -> Option<Self> {
        let tt = state.timetable();
        if tt.num_teams() == 0 || tt.num_slots() < 2 {
            return None;
        }
        Self::seeded(state, 0, 0, 1).or_else(|| next_key(state, (0, 0, 1)))
    }

    fn next_candidate(&mut self, state: &ScheduleState) -> bool {
        let Some(&team) = self.teams.first() else {
            return false;
        };
        match next_key(state, (team, self.r1, self.r2)) {
            Some(mv) => {
                *self = mv;
                true
            }
            None => false,
        }
    }
}

/// Next move after `(team, r1, r2)` in lexicographic order with `r2`
/// varying fastest.
fn next_key(state: &ScheduleState, key: (usize, usize, usize)) -> Option<SwapMatchRound> {
    let tt = state.timetable();
    let (num_teams, num_slots) = (tt.num_teams(), tt.num_slots());
    let (mut team, mut r1, mut r2) = key;
    loop {
        if r2 + 1 < num_slots {
            r2 += 1;
        } else if r1 + 2 < num_slots {
            r1 += 1;
            r2 = r1 + 1;
        } else if team + 1 < num_teams {
            team += 1;
            r1 = 0;
            r2 = 1;
        } else {
            return None;
        }
        if let Some(mv) = SwapMatchRound::seeded(state, team, r1, r2) {
            return Some(mv);
        }
    }
}

impl fmt::Display for SwapMatchRound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<")?;
        write_list(f, &self.teams)?;
        write!(f, "^{}-{}>", self.r1, self.r2)
    }
}

impl FromStr for SwapMatchRound {
    type Err = MoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse = || {
            let inner = s.trim().strip_prefix('<')?.strip_suffix('>')?;
            let (teams, slots) = inner.split_once('^')?;
            let (r1, r2) = slots.split_once('-')?;
            let teams = parse_list(teams)?;
            (!teams.is_empty()).then_some(())?;
            Some(SwapMatchRound {
                teams,
                r1: r1.trim().parse().ok()?,
                r2: r2.trim().parse().ok()?,
            })
        };
        parse().ok_or_else(|| MoveError::Parse(s.to_string()))
    }
}
