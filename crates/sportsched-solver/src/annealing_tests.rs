use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sportsched_config::{AnnealingConfig, NeighborhoodConfig};
use sportsched_core::{Catalog, CatalogBuilder, ConstraintDef, HomeMode, Severity};
use sportsched_scoring::{check_consistency, ScheduleState, SearchFlags, Weights};
use sportsched_test::{empty_catalog, random_catalog};

use super::*;
use crate::construction::random_pattern;
use crate::moves::NeighborhoodRates;

fn union(phased: bool) -> NeighborhoodUnion {
    NeighborhoodUnion::new(NeighborhoodRates::from(&NeighborhoodConfig::tuned(phased)))
}

fn state(catalog: Catalog, flags: SearchFlags, seed: u64) -> ScheduleState {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let tt = random_pattern(catalog.num_teams(), flags.mix_phase, &mut rng);
    ScheduleState::new(Arc::new(catalog), tt, Weights::new(10, 100), flags).unwrap()
}

fn short_schedule(max_evaluations: u64) -> AnnealingConfig {
    AnnealingConfig {
        cooling_rate: 0.5,
        ..AnnealingConfig::new(10.0, 1.0)
    }
    .with_max_evaluations(max_evaluations)
}

#[test]
fn test_schedule_sizes() {
    let sa = SimulatedAnnealing::new(AnnealingConfig::default(), union(true));
    assert_eq!(sa.temperature_levels(), 512);
    assert_eq!(sa.samples_per_level(), 1953);
    assert_eq!(sa.accepted_per_level(), 195);

    let sa = SimulatedAnnealing::new(short_schedule(500), union(true));
    assert_eq!(sa.temperature_levels(), 4);
    assert_eq!(sa.samples_per_level(), 125);
    assert_eq!(sa.accepted_per_level(), 12);
}

#[test]
fn test_degenerate_schedule_has_one_level() {
    let config = AnnealingConfig::new(1.0, 5.0).with_max_evaluations(0);
    let sa = SimulatedAnnealing::new(config, union(false));
    assert_eq!(sa.temperature_levels(), 1);
    assert_eq!(sa.samples_per_level(), 1);
    assert_eq!(sa.accepted_per_level(), 1);
}

#[test]
fn test_stage_spends_budget_and_keeps_best() {
    let flags = SearchFlags::default().with_mix_phase(true);
    let mut state = state(random_catalog(8, false, 3, 4), flags, 4);
    let initial = state.total_cost();
    let mut rng = ChaCha8Rng::seed_from_u64(9);

    let sa = SimulatedAnnealing::new(short_schedule(500), union(false));
    let stats = sa.solve("stage0", &mut state, &mut rng);

    assert_eq!(stats.evaluations, 500);
    assert!(stats.temperature_levels >= 4);
    assert!(state.total_cost() <= initial);

    let report = check_consistency(&state);
    assert!(report.is_consistent(), "{}", report);
    let mut recomputed = state.clone();
    assert_eq!(recomputed.full_recompute(), state.total_cost());
}

#[test]
fn test_stage_is_reproducible() {
    let flags = SearchFlags::default().with_mix_phase(true);
    let sa = SimulatedAnnealing::new(short_schedule(300), union(false));
    let run = || {
        let mut state = state(random_catalog(6, false, 2, 1), flags, 1);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        sa.solve("stage0", &mut state, &mut rng);
        state
    };
    assert_eq!(run().timetable(), run().timetable());
}

#[test]
fn test_stops_at_zero_hard() {
    let flags = SearchFlags::default().with_stop_at_zero_hard(true);
    let mut state = state(empty_catalog(6, true), flags, 0);
    assert!(state.zero_hard_reached());

    let sa = SimulatedAnnealing::new(short_schedule(1_000), union(true));
    let stats = sa.solve("stage1", &mut state, &mut ChaCha8Rng::seed_from_u64(0));
    assert_eq!(stats.evaluations, 0);
}

#[test]
fn test_forbidding_stage_ends_when_no_move_is_feasible() {
    // Team 0 plays in every slot, so this never holds.
    let catalog = CatalogBuilder::anonymous(4)
        .with_phased(true)
        .with_constraint(ConstraintDef::Ca1 {
            teams: vec![0],
            slots: (0..6).collect(),
            k_min: None,
            k_max: Some(0),
            mode: HomeMode::Any,
            severity: Severity::hard(1),
        })
        .build()
        .unwrap();
    let flags = SearchFlags::default().with_forbid_hard_worsening(true);
    let mut state = state(catalog, flags, 2);
    let before = state.timetable().clone();

    let sa = SimulatedAnnealing::new(short_schedule(1_000), union(true));
    let stats = sa.solve("stage2", &mut state, &mut ChaCha8Rng::seed_from_u64(2));

    assert_eq!(stats.evaluations, 0);
    assert_eq!(stats.empty_draws, 1);
    assert_eq!(state.timetable(), &before);
}

#[test]
fn test_custom_termination() {
    let flags = SearchFlags::default();
    let mut state = state(empty_catalog(6, true), flags, 3);
    let sa = SimulatedAnnealing::new(short_schedule(1_000), union(true));

    let stats = sa.run(
        "stage0",
        &mut state,
        &EvaluationCountTermination::new(42),
        &mut ChaCha8Rng::seed_from_u64(3),
    );
    assert_eq!(stats.evaluations, 42);
    assert_eq!(state.total_cost(), 0);
}
