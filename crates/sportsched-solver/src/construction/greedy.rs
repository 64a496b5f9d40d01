//! Greedy round-by-round construction.

use std::ops::Range;
use std::sync::{Mutex, PoisonError};

use rand::seq::SliceRandom;
use rand::Rng;
use rayon::iter::{ParallelBridge, ParallelIterator};
use smallvec::SmallVec;
use sportsched_core::Catalog;
use sportsched_scoring::{prefix_estimate, Timetable, Weights};
use tracing::{trace, warn};

use super::coloring::{polygon_rounds, vizing_rounds, ColoringCache, RoundPattern};

/// How the candidate rounds of one single round robin are generated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CandidateSource {
    #[default]
    Polygon,
    Vizing,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GreedyOptions {
    pub source: CandidateSource,
    /// Score the candidates of a slot on the rayon pool.
    pub parallel: bool,
}

/// Games of one round, as `(home, away)`.
pub type Games = SmallVec<[(usize, usize); 16]>;

/// A candidate round with its venues decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundCandidate {
    /// Index of the round in the remaining pool.
    pub pool_index: usize,
    pub games: Games,
}

impl RoundCandidate {
    /// Writes the games into `slot`.
    pub fn place(&self, tt: &mut Timetable, slot: usize) {
        for &(home, away) in &self.games {
            tt.set_assignment(home, slot, away, true);
            tt.set_assignment(away, slot, home, false);
        }
    }
}

/// Every venue assignment of every pool round for one slot.
///
/// A pair that already met before `slot` is forced to the reverse venue.
/// The free pairs run through all `2^k` assignments, the last free pair
/// varying fastest; a clear bit lets the second team of the pair host.
pub struct RoundCandidates<'a> {
    tt: &'a Timetable,
    slot: usize,
    pool: &'a [RoundPattern],
    order: &'a [(usize, usize)],
    next_pool: usize,
    current: Option<Expansion>,
}

struct Expansion {
    pool_index: usize,
    games: Games,
    free: SmallVec<[usize; 16]>,
    mask: u64,
    end: u64,
}

impl<'a> RoundCandidates<'a> {
    pub fn new(
        tt: &'a Timetable,
        slot: usize,
        pool: &'a [RoundPattern],
        order: &'a [(usize, usize)],
    ) -> Self {
        Self {
            tt,
            slot,
            pool,
            order,
            next_pool: 0,
            current: None,
        }
    }

    fn expand(&self, pool_index: usize) -> Expansion {
        let round = &self.pool[pool_index];
        let mut games = Games::new();
        let mut free = SmallVec::new();
        for &(p1, p2) in self.order {
            let (t1, t2) = (round[p1], round[p2]);
            if self.tt.match_slot(t1, t2) < self.slot {
                games.push((t2, t1));
            } else if self.tt.match_slot(t2, t1) < self.slot {
                games.push((t1, t2));
            } else {
                free.push(games.len());
                games.push((t2, t1));
            }
        }
        let end = 1u64.checked_shl(free.len() as u32).unwrap_or(u64::MAX);
        Expansion {
            pool_index,
            games,
            free,
            mask: 0,
            end,
        }
    }
}

impl Expansion {
    fn candidate(&self) -> RoundCandidate {
        let mut games = self.games.clone();
        let k = self.free.len();
        for (i, &game) in self.free.iter().enumerate() {
            if self.mask >> (k - 1 - i) & 1 == 1 {
                let (home, away) = games[game];
                games[game] = (away, home);
            }
        }
        RoundCandidate {
            pool_index: self.pool_index,
            games,
        }
    }
}

impl Iterator for RoundCandidates<'_> {
    type Item = RoundCandidate;

    fn next(&mut self) -> Option<RoundCandidate> {
        loop {
            if let Some(expansion) = &mut self.current {
                if expansion.mask < expansion.end {
                    let candidate = expansion.candidate();
                    expansion.mask += 1;
                    return Some(candidate);
                }
                self.current = None;
            }
            if self.next_pool >= self.pool.len() {
                return None;
            }
            let expansion = self.expand(self.next_pool);
            self.next_pool += 1;
            self.current = Some(expansion);
        }
    }
}

/// Builds a timetable one slot at a time, placing the candidate round with
/// the lowest prefix estimate.
///
/// Two single round robins are drawn over independently shuffled team
/// orders. On a phased instance the first fills the first half and the
/// second the other; otherwise both form one pool for the whole calendar.
/// Ties are broken by a coin flip, or by enumeration order when scoring in
/// parallel.
pub fn greedy_timetable<R: Rng + ?Sized>(
    catalog: &Catalog,
    weights: &Weights,
    options: GreedyOptions,
    cache: &mut ColoringCache,
    rng: &mut R,
) -> Timetable {
    let n = catalog.num_teams();
    let mut tt = Timetable::unassigned(n);
    if n < 2 {
        return tt;
    }

    let mut permutation: Vec<usize> = (0..n).collect();
    permutation.shuffle(rng);
    let mut first = single_round_robin(&permutation, options.source, cache, rng);
    permutation.shuffle(rng);
    let mut second = single_round_robin(&permutation, options.source, cache, rng);

    let greedy = Greedy {
        catalog,
        weights,
        order: cache.order(n),
        parallel: options.parallel,
    };
    let (half, num_slots) = (tt.half(), tt.num_slots());
    if catalog.is_phased() {
        greedy.fill(&mut tt, 0..half, &mut first, rng);
        greedy.fill(&mut tt, half..num_slots, &mut second, rng);
    } else {
        first.append(&mut second);
        greedy.fill(&mut tt, 0..num_slots, &mut first, rng);
    }
    tt.refresh_legs();
    tt
}

fn single_round_robin<R: Rng + ?Sized>(
    permutation: &[usize],
    source: CandidateSource,
    cache: &mut ColoringCache,
    rng: &mut R,
) -> Vec<RoundPattern> {
    match source {
        CandidateSource::Polygon => polygon_rounds(permutation),
        CandidateSource::Vizing => vizing_rounds(permutation, cache, rng).unwrap_or_else(|| {
            warn!(
                event = "vizing_fallback",
                teams = permutation.len(),
                "edge colouring did not converge, using polygon rounds"
            );
            polygon_rounds(permutation)
        }),
    }
}

struct Greedy<'a> {
    catalog: &'a Catalog,
    weights: &'a Weights,
    order: &'a [(usize, usize)],
    parallel: bool,
}

impl Greedy<'_> {
    fn fill<R: Rng + ?Sized>(
        &self,
        tt: &mut Timetable,
        slots: Range<usize>,
        pool: &mut Vec<RoundPattern>,
        rng: &mut R,
    ) {
        for slot in slots {
            let best = if self.parallel {
                self.best_parallel(tt, slot, pool)
            } else {
                self.best_sequential(tt, slot, pool, rng)
            };
            let Some((estimate, candidate)) = best else {
                return;
            };
            trace!(event = "greedy_round", slot, estimate);
            candidate.place(tt, slot);
            pool.remove(candidate.pool_index);
        }
    }

    fn best_sequential<R: Rng + ?Sized>(
        &self,
        tt: &Timetable,
        slot: usize,
        pool: &[RoundPattern],
        rng: &mut R,
    ) -> Option<(f64, RoundCandidate)> {
        let mut scratch = tt.clone();
        let mut best: Option<(f64, RoundCandidate)> = None;
        for candidate in RoundCandidates::new(tt, slot, pool, self.order) {
            let estimate = self.score(&mut scratch, slot, &candidate);
            let better = match &best {
                None => true,
                Some((lowest, _)) => {
                    estimate < *lowest || (estimate == *lowest && rng.random_bool(0.5))
                }
            };
            if better {
                best = Some((estimate, candidate));
            }
        }
        best
    }

    fn best_parallel(
        &self,
        tt: &Timetable,
        slot: usize,
        pool: &[RoundPattern],
    ) -> Option<(f64, RoundCandidate)> {
        let best: Mutex<Option<(f64, usize, RoundCandidate)>> = Mutex::new(None);
        RoundCandidates::new(tt, slot, pool, self.order)
            .enumerate()
            .par_bridge()
            .for_each_init(
                || tt.clone(),
                |scratch, (ordinal, candidate)| {
                    let estimate = self.score(scratch, slot, &candidate);
                    let mut best = best.lock().unwrap_or_else(PoisonError::into_inner);
                    let better = match &*best {
                        None => true,
                        Some((lowest, first, _)) => {
                            estimate < *lowest || (estimate == *lowest && ordinal < *first)
                        }
                    };
                    if better {
                        *best = Some((estimate, ordinal, candidate));
                    }
                },
            );
        best.into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .map(|(estimate, _, candidate)| (estimate, candidate))
    }

    fn score(&self, scratch: &mut Timetable, slot: usize, candidate: &RoundCandidate) -> f64 {
        scratch.clear_slot(slot);
        candidate.place(scratch, slot);
        prefix_estimate(self.catalog, scratch, self.weights, slot)
    }
}
