//! Construction heuristics for the initial timetable.
//!
//! - [`canonical_pattern`] / [`random_pattern`] - the circle method with
//!   optional relabeling and slot shuffling
//! - [`greedy_timetable`] - slot by slot, placing the candidate round with
//!   the lowest prefix estimate; candidates come from polygon rotation or
//!   a randomized edge colouring of K_n
//!
//! [`initial_timetable`] picks one by [`StartType`].

mod canonical;
mod coloring;
mod greedy;

#[cfg(test)]
mod tests;

use rand::Rng;
use sportsched_core::Catalog;
use sportsched_scoring::{Timetable, Weights};
use tracing::debug;

pub use canonical::{canonical_pattern, random_pattern};
pub use coloring::{canonical_order, polygon_rounds, vizing_rounds, ColoringCache, RoundPattern};
pub use greedy::{
    greedy_timetable, CandidateSource, Games, GreedyOptions, RoundCandidate, RoundCandidates,
};
pub use sportsched_config::StartType;

/// Builds the starting timetable of a solve.
///
/// `mix_phase` only affects the random pattern, and is ignored on phased
/// instances, whose starting point always respects the halves.
pub fn initial_timetable<R: Rng + ?Sized>(
    catalog: &Catalog,
    weights: &Weights,
    start: StartType,
    mix_phase: bool,
    parallel: bool,
    cache: &mut ColoringCache,
    rng: &mut R,
) -> Timetable {
    let source = match start {
        StartType::Random => {
            let mix_phase = mix_phase && !catalog.is_phased();
            debug!(event = "construction", start = %start, mix_phase);
            return random_pattern(catalog.num_teams(), mix_phase, rng);
        }
        StartType::Greedy => CandidateSource::Polygon,
        StartType::Vizing => CandidateSource::Vizing,
    };
    debug!(event = "construction", start = %start, parallel);
    greedy_timetable(catalog, weights, GreedyOptions { source, parallel }, cache, rng)
}
