use std::sync::Arc;

use sportsched_core::{CatalogBuilder, ConstraintDef, ConstraintFamily, HomeMode, Severity};
use sportsched_test::{double_round_robin, empty_catalog, mixed_catalog, random_catalog};

use crate::consistency::Inconsistency;
use crate::*;

fn circle(n: usize) -> Timetable {
    Timetable::from_rows(&double_round_robin(n)).unwrap()
}

fn mixed_state(flags: SearchFlags) -> ScheduleState {
    ScheduleState::new(Arc::new(mixed_catalog()), circle(6), Weights::default(), flags).unwrap()
}

fn touched_by_pair(state: &ScheduleState, t1: usize, t2: usize) -> AffectedConstraints {
    let tt = state.timetable();
    let index = state.catalog().index();
    let mut affected = AffectedConstraints::new();
    for slot in [tt.match_slot(t1, t2), tt.match_slot(t2, t1)] {
        affected.extend(index.team_slot(t1, slot));
        affected.extend(index.team_slot(t2, slot));
    }
    affected
}

#[test]
fn test_new_rejects_team_count() {
    let result = ScheduleState::new(
        Arc::new(empty_catalog(6, true)),
        circle(4),
        Weights::default(),
        SearchFlags::default(),
    );
    assert!(matches!(
        result,
        Err(ScheduleError::TeamCount { expected: 6, found: 4 })
    ));
}

#[test]
fn test_circle_schedule_is_consistent() {
    let state = mixed_state(SearchFlags::default());
    let report = check_consistency(&state);
    assert!(report.is_consistent(), "{}", report);
    assert_eq!(state.phase_cost(), 0);
}

#[test]
fn test_hard_cost_matches_hard_check() {
    let state = mixed_state(SearchFlags::default());
    assert_eq!(state.hard_cost() == 0, state.hard_constraints_hold());
    assert_eq!(state.zero_hard_reached(), state.hard_cost() == 0);
}

#[test]
fn test_stale_costs_are_reported() {
    let mut state = mixed_state(SearchFlags::default());
    let before = state.total_cost();
    state.timetable_mut().swap_homes(0, 4);
    let fresh = CostState::compute(state.catalog(), state.timetable(), state.weights());

    let report = check_consistency(&state);
    if fresh.total() != before {
        assert!(report
            .issues
            .iter()
            .any(|issue| matches!(issue, Inconsistency::Aggregate { name: "total", .. })));
    }
    state.full_recompute();
    assert!(check_consistency(&state).is_consistent());
}

#[test]
fn test_broken_pairing_is_reported() {
    let mut state = mixed_state(SearchFlags::default());
    let opponent = state.timetable().opponent(0, 0);
    state.timetable_mut().set_assignment(0, 0, opponent, false);

    let report = check_consistency(&state);
    assert!(report
        .issues
        .contains(&Inconsistency::SameVenue { team: 0, slot: 0, opponent }));
}

#[test]
fn test_phase_checked_only_without_mixing() {
    let mut state = mixed_state(SearchFlags::default());
    state.timetable_mut().swap_slots(1, 7);
    state.full_recompute();
    assert!(state.phase_cost() > 0);
    assert!(!state.zero_hard_reached());
    assert!(check_consistency(&state)
        .issues
        .iter()
        .any(|issue| matches!(issue, Inconsistency::Phase { .. })));

    state.set_flags(SearchFlags::default().with_mix_phase(true));
    assert!(check_consistency(&state).is_consistent());
}

#[test]
fn test_incremental_update_matches_recompute() {
    for seed in 0..4 {
        let catalog = Arc::new(random_catalog(8, true, 3, seed));
        let weights = Weights::new(1000, 100).with_family_weight(ConstraintFamily::Br2, 3);
        let flags = SearchFlags::default().with_mix_phase(true);
        let mut state = ScheduleState::new(catalog, circle(8), weights, flags).unwrap();

        for t1 in 0..8 {
            for t2 in t1 + 1..8 {
                if (t1 + t2 + seed as usize) % 3 != 0 {
                    continue;
                }
                let affected = touched_by_pair(&state, t1, t2);
                state.timetable_mut().swap_homes(t1, t2);
                state.update_costs(&affected);
                let report = check_consistency(&state);
                assert!(report.is_consistent(), "seed {} swap_homes({}, {}): {}", seed, t1, t2, report);
            }
        }

        for (r1, r2) in [(0, 13), (2, 5), (7, 8)] {
            let mut affected = AffectedConstraints::new();
            let index = state.catalog().index();
            affected.extend(index.slot(r1));
            affected.extend(index.slot(r2));
            state.timetable_mut().swap_slots(r1, r2);
            state.update_costs(&affected);
            let report = check_consistency(&state);
            assert!(report.is_consistent(), "seed {} swap_slots({}, {}): {}", seed, r1, r2, report);
        }
    }
}

#[test]
fn test_set_weights_recomputes() {
    let mut state = mixed_state(SearchFlags::default());
    let total = state.total_cost();
    state.set_weights(Weights::new(1, 1));
    assert!(state.total_cost() <= total);
    assert!(check_consistency(&state).is_consistent());
}

#[test]
fn test_replace_timetable() {
    let mut state = mixed_state(SearchFlags::default());
    let mut other = circle(6);
    other.swap_homes(1, 2);
    state.replace_timetable(other.clone()).unwrap();
    assert_eq!(state.timetable().rows(), other.rows());
    assert!(check_consistency(&state).is_consistent());

    assert!(state.replace_timetable(circle(4)).is_err());
}

#[test]
fn test_violations_hard_first() {
    // Team 0 of the four-team circle schedule breaks at slots 1, 3 and 4.
    let catalog = CatalogBuilder::anonymous(4)
        .with_phased(true)
        .with_constraint(ConstraintDef::Br1 {
            teams: vec![0],
            slots: (0..6).collect(),
            k: 0,
            mode: HomeMode::Home,
            severity: Severity::soft(2),
        })
        .with_constraint(ConstraintDef::Br1 {
            teams: vec![0],
            slots: vec![3, 4],
            k: 0,
            mode: HomeMode::Away,
            severity: Severity::hard(1),
        })
        .with_constraint(ConstraintDef::Br2 {
            teams: vec![0],
            slots: vec![1],
            k: 5,
            severity: Severity::soft(1),
        })
        .build()
        .unwrap();
    let state = ScheduleState::new(
        Arc::new(catalog),
        circle(4),
        Weights::new(10, 1),
        SearchFlags::default(),
    )
    .unwrap();

    let found = violations(&state);
    assert_eq!(found.len(), 2);
    assert_eq!((found[0].family, found[0].index, found[0].hard), (ConstraintFamily::Br1, 1, true));
    assert_eq!((found[0].amount, found[0].cost), (2, 20));
    assert_eq!(found[0].both_phases, Some(false));
    assert_eq!((found[1].index, found[1].amount, found[1].cost), (0, 1, 2));
    assert_eq!(found[1].both_phases, Some(true));
    assert!(found[0].to_string().starts_with("BR1* #1: violation 2 (cost 20)"));
}

#[test]
fn test_copy_from_restores_scratch() {
    let state = mixed_state(SearchFlags::default().with_mix_phase(true));
    let mut scratch = state.clone();
    scratch.timetable_mut().swap_slots(0, 3);
    scratch.set_weights(Weights::new(3, 5));
    assert_ne!(scratch.timetable(), state.timetable());

    scratch.copy_from(&state);
    assert_eq!(scratch.timetable(), state.timetable());
    assert_eq!(scratch.costs(), state.costs());
    assert_eq!(scratch.weights(), state.weights());
    assert!(check_consistency(&scratch).is_consistent());
}
