//! SwapMatchesPhased - the swap-matches exchange restricted to one leg.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use smallvec::SmallVec;
use sportsched_scoring::{AffectedConstraints, ScheduleState, Timetable};

use super::swap_matches::{first_seeded, next_seeded, parse_matches, seed_is_valid};
use super::{cells_affected, random_team_pair, write_list, Chain, Move};
use crate::error::MoveError;

/// Home flips `(t1, t2)` applied at each slot of the chain.
pub type Flips = SmallVec<[(bool, bool); 8]>;

/// Exchanges the opponents of `t1` and `t2` in slot `rounds[0]` and repairs
/// the pairing using only games of the seed's leg.
///
/// Both teams must play a game of the same leg at the seed, and every game
/// the chain touches must belong to that leg as well. When a team takes
/// over a game whose venue would put two meetings of a pair in the same
/// leg, its home status is flipped; `flips` records those decisions per
/// slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SwapMatchesPhased {
    pub t1: usize,
    pub t2: usize,
    pub rounds: Chain,
    pub flips: Flips,
}

impl SwapMatchesPhased {
    /// Builds the move seeded at `(t1, t2, seed)`, or `None` if its chain is
    /// rejected.
    pub fn seeded(state: &ScheduleState, t1: usize, t2: usize, seed: usize) -> Option<Self> {
        let (rounds, flips) = Self::compute_chain(state, t1, t2, seed)?;
        Some(Self {
            t1,
            t2,
            rounds,
            flips,
        })
    }

    /// Walks the repair chain from `seed`, returning the slots and the home
    /// flips to apply at each of them.
    pub fn compute_chain(
        state: &ScheduleState,
        t1: usize,
        t2: usize,
        seed: usize,
    ) -> Option<(Chain, Flips)> {
        let tt = state.timetable();
        let num_slots = tt.num_slots();
        if !seed_is_valid(tt, t1, t2, seed) {
            return None;
        }
        let leg = tt.is_return(t1, seed);
        if tt.is_return(t2, seed) != leg {
            return None;
        }
        let cap = state.flags().limits.chain_cap(num_slots);

        let stop = tt.opponent(t1, seed);
        let mut t = tt.opponent(t2, seed);
        let mut r = seed;
        let mut rounds = Chain::new();
        let mut flips = Flips::new();
        rounds.push(seed);
        flips.push(flips_at(tt, t1, t2, seed));

        while t != stop {
            r = tt.match_slot(t1, t);
            if r >= num_slots || tt.is_return(t1, r) != leg {
                r = tt.match_slot(t, t1);
            }
            if r >= num_slots || r < seed || tt.is_return(t2, r) != leg {
                return None;
            }
            t = tt.opponent(t2, r);
            rounds.push(r);
            if rounds.len() > cap {
                return None;
            }
            flips.push(flips_at(tt, t1, t2, r));
        }
        // The chain closes on t1's original opponent, whose game must share
        // the leg too.
        (tt.is_return(t, r) == leg).then_some((rounds, flips))
    }

    pub fn seed(&self) -> usize {
        self.rounds[0]
    }
}

/// Leg of the meeting hosted by `host` against `guest`.
fn hosted_leg(tt: &Timetable, host: usize, guest: usize) -> bool {
    tt.is_return(host, tt.match_slot(host, guest))
}

/// Flips for `t1` and `t2` at slot `r`. A team is flipped when the game it
/// takes over would otherwise sit in a different leg than the meeting it
/// replaces.
fn flips_at(tt: &Timetable, t1: usize, t2: usize, r: usize) -> (bool, bool) {
    let o1 = tt.opponent(t1, r);
    let o2 = tt.opponent(t2, r);
    let flip_t2 = if tt.is_home(t1, r) {
        hosted_leg(tt, t2, o1) != hosted_leg(tt, t1, o1)
    } else {
        hosted_leg(tt, o1, t2) != hosted_leg(tt, o1, t1)
    };
    let flip_t1 = if tt.is_home(t2, r) {
        hosted_leg(tt, t1, o2) != hosted_leg(tt, t2, o2)
    } else {
        hosted_leg(tt, o2, t1) != hosted_leg(tt, o2, t2)
    };
    (flip_t1, flip_t2)
}

impl Move for SwapMatchesPhased {
    const NAME: &'static str = "swap_matches_phased";

    fn draw<R: Rng + ?Sized>(state: &ScheduleState, rng: &mut R) -> Option<Self> {
        let tt = state.timetable();
        let (t1, t2) = random_team_pair(tt.num_teams(), rng)?;
        let admissible: Chain = (0..tt.num_slots())
            .filter(|&s| tt.opponent(t1, s) != t2 && tt.is_return(t1, s) == tt.is_return(t2, s))
            .collect();
        if admissible.is_empty() {
            return None;
        }
        let seed = admissible[rng.random_range(0..admissible.len())];
        Self::seeded(state, t1, t2, seed)
    }

    fn is_valid(&self, state: &ScheduleState) -> bool {
        !self.rounds.is_empty()
            && self.rounds.len() == self.flips.len()
            && Self::compute_chain(state, self.t1, self.t2, self.seed())
                .is_some_and(|(rounds, flips)| rounds == self.rounds && flips == self.flips)
    }

    fn execute(&self, tt: &mut Timetable) {
        for (&r, &(flip_t1, flip_t2)) in self.rounds.iter().zip(&self.flips) {
            tt.swap_opponents_at_slot(self.t1, self.t2, r, flip_t1, flip_t2);
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
        // Flips change the venue of the opponents as well.
        let tt = state.timetable();
        let cells = self.rounds.iter().flat_map(|&r| {
            [
                (self.t1, r),
                (self.t2, r),
                (tt.opponent(self.t1, r), r),
                (tt.opponent(self.t2, r), r),
            ]
        });
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

impl fmt::Display for SwapMatchesPhased {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}-{}%", self.t1, self.t2)?;
        write_list(f, &self.rounds)?;
        f.write_str(">")
    }
}

/// Parses the move key. Flips are not part of the text form and are left
/// unset; recompute them with [`SwapMatchesPhased::seeded`] against a state.
impl FromStr for SwapMatchesPhased {
    type Err = MoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (t1, t2, rounds) = parse_matches(s).ok_or_else(|| MoveError::Parse(s.to_string()))?;
        let flips = rounds.iter().map(|_| (false, false)).collect();
        Ok(Self {
            t1,
            t2,
            rounds,
            flips,
        })
    }
}
