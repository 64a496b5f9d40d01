//! Tests for the move module.

use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sportsched_core::{Catalog, ConstraintFamily};
use sportsched_scoring::{check_consistency, ScheduleState, SearchFlags, Weights};
use sportsched_test::{empty_catalog, mixed_catalog, random_catalog};

use super::*;
use crate::construction::random_pattern;

mod kind;
mod swap_match_round;
mod swap_matches;
mod swap_rounds;
mod swap_teams;

fn weights() -> Weights {
    Weights::new(10, 100)
        .with_family_weight(ConstraintFamily::Ca1, 7)
        .with_family_weight(ConstraintFamily::Br2, 3)
}

/// A relabeled circle schedule bound to `catalog`.
fn state_with(catalog: Catalog, flags: SearchFlags, seed: u64) -> ScheduleState {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let tt = random_pattern(catalog.num_teams(), flags.mix_phase, &mut rng);
    ScheduleState::new(Arc::new(catalog), tt, weights(), flags).unwrap()
}

/// Six phased teams, halves kept apart.
fn phased_state(seed: u64) -> ScheduleState {
    state_with(mixed_catalog(), SearchFlags::default(), seed)
}

/// Eight teams with constraints of every family, halves mixed.
fn mixed_state(seed: u64) -> ScheduleState {
    state_with(
        random_catalog(8, false, 3, seed),
        SearchFlags::default().with_mix_phase(true),
        seed,
    )
}

fn bare_state(num_teams: usize, phased: bool) -> ScheduleState {
    state_with(
        empty_catalog(num_teams, phased),
        SearchFlags::default().with_mix_phase(!phased),
        0,
    )
}

fn assert_consistent(state: &ScheduleState) {
    let report = check_consistency(state);
    assert!(report.is_consistent(), "{}", report);
}

/// Applies up to `steps` random moves of kind `M`, checking the state after
/// each one. Returns the number of moves applied.
fn run_random<M: Move>(state: &mut ScheduleState, steps: usize, seed: u64) -> usize {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut applied = 0;
    for _ in 0..steps {
        let Ok(mv) = M::random(state, &mut rng) else {
            continue;
        };
        assert!(mv.is_valid(state), "drawn move {} is not valid", mv);
        mv.apply(state);
        assert_consistent(state);
        applied += 1;
    }
    applied
}

/// Every feasible move of kind `M` in enumeration order.
fn enumerate<M: Move>(state: &ScheduleState) -> Vec<M> {
    let mut moves = Vec::new();
    let Some(mut mv) = M::first(state) else {
        return moves;
    };
    moves.push(mv.clone());
    while mv.next(state) {
        moves.push(mv.clone());
    }
    moves
}
