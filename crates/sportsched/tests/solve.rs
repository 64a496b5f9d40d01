//! End-to-end runs through the public facade.

use std::sync::Arc;

use sportsched::prelude::*;
use sportsched::{check_timetable, load_solution, load_timetable, write_timetable, Move, SwapHomes};
use sportsched_test::SAMPLE_INSTANCE;

fn sample_instance(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let path = dir.path().join("sample6.xml");
    std::fs::write(&path, SAMPLE_INSTANCE).unwrap();
    path
}

fn quick_config(method: Method) -> RunConfig {
    RunConfig::tuned(method)
        .with_seed(5)
        .with_max_evaluations(3_000)
}

#[test]
fn canonical_four_team_schedule_is_phase_aligned() {
    let catalog = Arc::new(CatalogBuilder::anonymous(4).with_phased(true).build().unwrap());
    let tt = canonical_pattern(4);
    assert_eq!(tt.num_slots(), 6);
    assert!(check_timetable(&tt, true).is_consistent());

    let state =
        ScheduleState::new(catalog, tt, Weights::default(), SearchFlags::default()).unwrap();
    assert_eq!(state.phase_cost(), 0);
}

#[test]
fn swap_homes_twice_is_identity() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = Arc::new(load_instance(sample_instance(&dir)).unwrap());
    let mut state = ScheduleState::new(
        catalog,
        canonical_pattern(6),
        Weights::default(),
        SearchFlags::default(),
    )
    .unwrap();
    let before = state.timetable().clone();
    let cost = state.total_cost();

    let mv = SwapHomes::new(2, 5);
    mv.apply(&mut state);
    mv.apply(&mut state);

    assert_eq!(state.timetable(), &before);
    assert_eq!(state.total_cost(), cost);
}

#[test]
fn every_method_solves_the_sample_instance() {
    let dir = tempfile::tempdir().unwrap();
    let path = sample_instance(&dir);

    for method in [Method::Esa0, Method::Esa2s, Method::Esa2sOh, Method::Esa3s] {
        let (catalog, outcome) = solve_instance(&path, quick_config(method)).unwrap();
        assert_eq!(catalog.name(), "Sample6");
        assert!(check_timetable(outcome.timetable(), false).is_consistent());
        assert_eq!(
            outcome.total_cost(),
            outcome.family_costs().iter().map(|(_, cost)| cost).sum::<i64>()
                + outcome.phase_cost(),
            "{}",
            method
        );
        assert!(!outcome.stages.is_empty());
    }
}

#[test]
fn written_timetables_load_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = sample_instance(&dir);
    let (catalog, outcome) = solve_instance(&path, quick_config(Method::Esa2sOh)).unwrap();

    let xml = dir.path().join("best.xml");
    write_timetable(&catalog, &outcome, &xml).unwrap();
    assert_eq!(&load_solution(&catalog, &xml).unwrap(), outcome.timetable());

    let text = dir.path().join("best.txt");
    write_timetable(&catalog, &outcome, &text).unwrap();
    assert_eq!(&load_timetable(&catalog, &text).unwrap(), outcome.timetable());
}

#[test]
fn written_timetable_warm_starts_a_run() {
    let dir = tempfile::tempdir().unwrap();
    let path = sample_instance(&dir);
    let (catalog, first) = solve_instance(&path, quick_config(Method::Esa0)).unwrap();

    let saved = dir.path().join("first.txt");
    write_timetable(&catalog, &first, &saved).unwrap();

    let mut config = quick_config(Method::Esa0).with_max_evaluations(0);
    config.init_state = Some(saved);
    let (_, second) = solve_instance(&path, config).unwrap();
    assert_eq!(second.timetable(), first.timetable());
    assert_eq!(second.total_cost(), first.total_cost());
}
