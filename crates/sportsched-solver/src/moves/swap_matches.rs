//! SwapMatchesNotPhased - exchanges one game of two teams and repairs the
//! pairing along a chain of slots.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use sportsched_scoring::{AffectedConstraints, ScheduleState, Timetable};

use super::{cells_affected, next_pair, parse_list, parse_pair, random_team_pair, write_list, Chain, Move};
use crate::error::MoveError;

/// Exchanges the opponents of `t1` and `t2` in slot `rounds[0]`.
///
/// After the first exchange `t1` meets one of `t2`'s opponents a third time
/// and vice versa; the chain lists every further slot where the two teams
/// must exchange opponents for each pair to meet exactly twice again. Venues
/// travel with the games.
///
/// The chain is rejected when it reaches a slot before the seed, when it
/// grows past the chain cap of the state's move limits, and, without phase
/// mixing, when it leaves the half of the seed. A seed where `t1` and `t2`
/// meet each other is rejected too: exchanging opponents there only swaps
/// venues, which [`SwapHomes`](super::SwapHomes) already covers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SwapMatchesNotPhased {
    pub t1: usize,
    pub t2: usize,
    pub rounds: Chain,
}

impl SwapMatchesNotPhased {
    /// Builds the move seeded at `(t1, t2, seed)`, or `None` if its chain is
    /// rejected.
    pub fn seeded(state: &ScheduleState, t1: usize, t2: usize, seed: usize) -> Option<Self> {
        let rounds = Self::compute_chain(state, t1, t2, seed)?;
        Some(Self { t1, t2, rounds })
    }

    /// Walks the repair chain from `seed`. The seed is the first element.
    pub fn compute_chain(state: &ScheduleState, t1: usize, t2: usize, seed: usize) -> Option<Chain> {
        let tt = state.timetable();
        let num_slots = tt.num_slots();
        if !seed_is_valid(tt, t1, t2, seed) {
            return None;
        }
        let flags = state.flags();
        let mix_phase = flags.mix_phase;
        let cap = flags.limits.chain_cap(num_slots);

        let stop = (tt.opponent(t1, seed), tt.is_home(t1, seed));
        let (mut t, mut home) = (tt.opponent(t2, seed), tt.is_home(t2, seed));
        let mut rounds = Chain::new();
        rounds.push(seed);

        while (t, home) != stop {
            let r = if home {
                tt.match_slot(t1, t)
            } else {
                tt.match_slot(t, t1)
            };
            if r >= num_slots || r < seed {
                return None;
            }
            (t, home) = (tt.opponent(t2, r), tt.is_home(t2, r));
            if !mix_phase && !state.catalog().same_phase(r, seed) {
                return None;
            }
            rounds.push(r);
            if rounds.len() > cap {
                return None;
            }
        }
        Some(rounds)
    }

    pub fn seed(&self) -> usize {
        self.rounds[0]
    }
}

impl Move for SwapMatchesNotPhased {
    const NAME: &'static str = "swap_matches_not_phased";

    fn draw<R: Rng + ?Sized>(state: &ScheduleState, rng: &mut R) -> Option<Self> {
        let tt = state.timetable();
        let (t1, t2) = random_team_pair(tt.num_teams(), rng)?;
        let seed = random_non_meeting_slot(tt, t1, t2, rng)?;
        Self::seeded(state, t1, t2, seed)
    }

    fn is_valid(&self, state: &ScheduleState) -> bool {
        !self.rounds.is_empty()
            && Self::compute_chain(state, self.t1, self.t2, self.seed()).as_ref() == Some(&self.rounds)
    }

    fn execute(&self, tt: &mut Timetable) {
        for &r in &self.rounds {
            tt.swap_opponents_at_slot(self.t1, self.t2, r, false, false);
        }
        for &r in &self.rounds {
            tt.recompute_leg_and_mirror(self.t1, r);
            tt.recompute_leg_and_mirror(self.t2, r);
        }
    }

    fn affected(&self, state: &ScheduleState) -> Option<AffectedConstraints> {
        if self.rounds.len() > state.flags().limits.partial_cost_threshold {
            return None;
        }
        // Opponents keep their venues, so the cells of t1 and t2 cover
        // every constraint that can change.
        let cells = self
            .rounds
            .iter()
            .flat_map(|&r| [(self.t1, r), (self.t2, r)]);
        Some(cells_affected(state, cells))
    }

    fn first_candidate(state: &ScheduleState) -> Option<Self> {
        first_seeded(state, Self::seeded)
    }

    fn next_candidate(&mut self, state: &ScheduleState) -> bool {
        match next_seeded(state, (self.t1, self.t2, self.seed()), Self::seeded) {
            Some(mv) => {
                *self = mv;
                true
            }
            None => false,
        }
    }
}

impl fmt::Display for SwapMatchesNotPhased {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}-{}%", self.t1, self.t2)?;
        write_list(f, &self.rounds)?;
        f.write_str(">")
    }
}

impl FromStr for SwapMatchesNotPhased {
    type Err = MoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (t1, t2, rounds) = parse_matches(s).ok_or_else(|| MoveError::Parse(s.to_string()))?;
        Ok(Self { t1, t2, rounds })
    }
}

/// Basic seed checks shared by both swap-matches kinds.
pub(super) fn seed_is_valid(tt: &Timetable, t1: usize, t2: usize, seed: usize) -> bool {
    t1 < t2 && t2 < tt.num_teams() && seed < tt.num_slots() && tt.opponent(t1, seed) != t2
}

/// A uniform slot in which `t1` and `t2` do not meet.
pub(super) fn random_non_meeting_slot<R: Rng + ?Sized>(
    tt: &Timetable,
    t1: usize,
    t2: usize,
    rng: &mut R,
) -> Option<usize> {
    let num_slots = tt.num_slots();
    let a = tt.match_slot(t1, t2);
    let b = tt.match_slot(t2, t1);
    if a >= num_slots || b >= num_slots || num_slots <= 2 {
        return None;
    }
    let (lo, hi) = (a.min(b), a.max(b));
    let mut slot = rng.random_range(0..num_slots - 2);
    if slot >= lo {
        slot += 1;
    }
    if slot >= hi {
        slot += 1;
    }
    Some(slot)
}

/// First move of the `(t1, t2, seed)` enumeration accepted by `build`.
pub(super) fn first_seeded<M>(
    state: &ScheduleState,
    build: impl Fn(&ScheduleState, usize, usize, usize) -> Option<M>,
) -> Option<M> {
    if state.timetable().num_teams() < 2 {
        return None;
    }
    build(state, 0, 1, 0).or_else(|| next_seeded(state, (0, 1, 0), build))
}

/// Next move after `key` in the `(t1, t2, seed)` enumeration accepted by
/// `build`. The seed varies fastest.
pub(super) fn next_seeded<M>(
    state: &ScheduleState,
    key: (usize, usize, usize),
    build: impl Fn(&ScheduleState, usize, usize, usize) -> Option<M>,
) -> Option<M> {
    let tt = state.timetable();
    let (num_teams, num_slots) = (tt.num_teams(), tt.num_slots());
    let (mut t1, mut t2, mut seed) = key;
    loop {
        if seed + 1 < num_slots {
            seed += 1;
        } else {
            (t1, t2) = next_pair(t1, t2, num_teams)?;
            seed = 0;
        }
        if let Some(mv) = build(state, t1, t2, seed) {
            return Some(mv);
        }
    }
}

/// Parses `"<t1-t2%[r0,r1,...]>"`.
pub(super) fn parse_matches(text: &str) -> Option<(usize, usize, Chain)> {
    let inner = text.trim().strip_prefix('<')?.strip_suffix('>')?;
    let (pair, rounds) = inner.split_once('%')?;
    let (t1, t2) = parse_pair(&format!("<{}>", pair))?;
    let rounds = parse_list(rounds)?;
    if rounds.is_empty() {
        return None;
    }
    Some((t1, t2, rounds))
}
