use std::sync::Arc;

use sportsched_config::StartType;
use sportsched_core::{parse_instance, CatalogBuilder, ConstraintDef, HomeMode, Severity};
use sportsched_scoring::check_consistency;
use sportsched_scoring::io::write_solution;
use sportsched_test::{
    double_round_robin, empty_catalog, mixed_catalog, random_catalog, rows_to_text, SAMPLE_INSTANCE,
};

use super::*;

fn config(method: Method) -> RunConfig {
    RunConfig::tuned(method)
        .with_seed(17)
        .with_max_evaluations(2_000)
}

fn expected_stages(method: Method) -> Vec<Stage> {
    match method {
        Method::Esa0 => vec![Stage::Stage0],
        Method::Esa2s | Method::Esa2sOh => vec![Stage::Stage1, Stage::Stage2],
        Method::Esa3s => vec![Stage::Stage1, Stage::Stage1_2, Stage::Stage2],
    }
}

#[test]
fn test_every_method_runs_its_stages() {
    let catalog = Arc::new(mixed_catalog());
    for method in Method::ALL {
        let outcome = StagedSolver::new(config(method))
            .solve(Arc::clone(&catalog))
            .unwrap();

        let stages: Vec<Stage> = outcome.stages.iter().map(|report| report.stage).collect();
        assert_eq!(stages, expected_stages(method), "{}", method);
        assert_eq!(outcome.stats.stages, stages.len());
        assert_eq!(outcome.seed, 17);

        assert_eq!(outcome.state.weights(), &Weights::default());
        let report = check_consistency(&outcome.state);
        assert!(report.is_consistent(), "{}: {}", method, report);

        let mut recomputed = outcome.state.clone();
        assert_eq!(recomputed.full_recompute(), outcome.total_cost());
        let last = outcome.stages.last().unwrap();
        assert_eq!(last.cost, outcome.total_cost());
    }
}

#[test]
fn test_phased_outcome_keeps_halves() {
    let catalog = Arc::new(mixed_catalog());
    let config = RunConfig {
        mix_initial_phase: false,
        mix_phase_during_search: false,
        ..config(Method::Esa2s)
    };
    let outcome = StagedSolver::new(config).solve(catalog).unwrap();
    assert_eq!(outcome.phase_cost(), 0);
}

#[test]
fn test_seeded_runs_are_reproducible() {
    let catalog = Arc::new(parse_instance(SAMPLE_INSTANCE).unwrap());
    let solve = || {
        StagedSolver::new(config(Method::Esa3s).with_start_type(StartType::Greedy))
            .solve(Arc::clone(&catalog))
            .unwrap()
    };
    let (a, b) = (solve(), solve());
    assert_eq!(a.timetable(), b.timetable());
    assert_eq!(a.total_cost(), b.total_cost());
}

#[test]
fn test_hard_only_stage_stops_when_feasible() {
    let catalog = Arc::new(empty_catalog(6, true));
    let outcome = StagedSolver::new(config(Method::Esa2sOh))
        .solve(catalog)
        .unwrap();

    let stage1 = outcome.stage(Stage::Stage1).unwrap();
    assert_eq!(stage1.stats.evaluations, 0);
    assert_eq!(outcome.total_cost(), 0);
}

#[test]
fn test_config_must_fit_instance() {
    let catalog = Arc::new(random_catalog(6, false, 1, 3));
    let config = RunConfig {
        mix_initial_phase: false,
        mix_phase_during_search: false,
        ..config(Method::Esa0)
    };
    let err = StagedSolver::new(config).solve(catalog).unwrap_err();
    assert!(matches!(err, SolveError::Config(_)));
}

#[test]
fn test_text_init_state_is_the_starting_point() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("start.txt");
    let rows = double_round_robin(6);
    std::fs::write(&path, rows_to_text(&rows)).unwrap();

    let config = RunConfig {
        init_state: Some(path),
        ..config(Method::Esa0).with_max_evaluations(0)
    };
    let outcome = StagedSolver::new(config)
        .solve(Arc::new(mixed_catalog()))
        .unwrap();
    assert_eq!(outcome.timetable().rows(), rows);
}

#[test]
fn test_xml_init_state_is_read() {
    let catalog = Arc::new(parse_instance(SAMPLE_INSTANCE).unwrap());
    let tt = Timetable::from_rows(&double_round_robin(6)).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("start.xml");
    std::fs::write(&path, write_solution(&catalog, &tt, "warm")).unwrap();

    let loaded = load_timetable(&catalog, &path).unwrap();
    assert_eq!(loaded.rows(), tt.rows());
}

#[test]
fn test_inconsistent_init_state_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.txt");
    let mut rows = double_round_robin(6);
    rows[0].swap(0, 1);
    std::fs::write(&path, rows_to_text(&rows)).unwrap();

    let config = RunConfig {
        init_state: Some(path),
        ..config(Method::Esa0)
    };
    let err = StagedSolver::new(config)
        .solve(Arc::new(mixed_catalog()))
        .unwrap_err();
    assert!(matches!(err, SolveError::Inconsistent(_)));
}

#[test]
fn test_init_state_team_count_must_match() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("small.txt");
    std::fs::write(&path, rows_to_text(&double_round_robin(4))).unwrap();

    let err = load_timetable(&mixed_catalog(), &path).unwrap_err();
    assert!(matches!(
        err,
        SolveError::Schedule(ScheduleError::TeamCount { expected: 6, found: 4 })
    ));
}

#[test]
fn test_stage2_starts_from_strictly_cheaper_result() {
    // Team 0 plays in every slot, so this always costs.
    let violated = CatalogBuilder::anonymous(6)
        .with_phased(true)
        .with_constraint(ConstraintDef::Ca1 {
            teams: vec![0],
            slots: (0..10).collect(),
            k_min: None,
            k_max: Some(0),
            mode: HomeMode::Any,
            severity: Severity::hard(1),
        })
        .build()
        .unwrap();
    let state = |catalog: Catalog| {
        ScheduleState::new(
            Arc::new(catalog),
            Timetable::from_rows(&double_round_robin(6)).unwrap(),
            Weights::default(),
            SearchFlags::default(),
        )
        .unwrap()
    };
    let cheap = state(empty_catalog(6, true));
    let dear = state(violated);
    assert!(cheap.total_cost() < dear.total_cost());

    assert!(std::ptr::eq(cheaper_start(&cheap, &dear), &cheap));
    assert!(std::ptr::eq(cheaper_start(&dear, &cheap), &cheap));

    let tie = cheap.clone();
    assert!(std::ptr::eq(cheaper_start(&cheap, &tie), &tie));
}

#[test]
fn test_stage_weights() {
    let catalog = Arc::new(mixed_catalog());
    let mut config = RunConfig::tuned(Method::Esa3s);
    let run = |config: &RunConfig| {
        let run = Run {
            config,
            catalog: Arc::clone(&catalog),
            neighborhood: NeighborhoodUnion::new(NeighborhoodRates::default()),
            cache: ColoringCache::new(),
            stats: SolverStats::default(),
            stages: Vec::new(),
        };
        (
            run.weights(config.stage1.hard_weight, config.stage1.phased_weight),
            run.weights(None, None),
            run.intermediate_weights(),
        )
    };

    let (stage1, stage2, intermediate) = run(&config);
    assert_eq!((stage1.hard, stage1.phased), (10, 117));
    assert_eq!((stage2.hard, stage2.phased), (40, 400));
    assert_eq!((intermediate.hard, intermediate.phased), (40, 400));
    assert_eq!(stage1.family[ConstraintFamily::Ga1.index()], 10);

    config.correlate_with_hard_count = true;
    let hard = (catalog.hard_count() as f64 * config.correlation_factor) as i64;
    let (_, _, intermediate) = run(&config);
    assert_eq!((intermediate.hard, intermediate.phased), (hard, 10 * hard));

    let (_, stage2, _) = run(&RunConfig::default());
    assert_eq!(stage2.hard, DEFAULT_HARD_WEIGHT);
}

#[test]
fn test_move_limits_reach_search_flags() {
    let catalog = Arc::new(mixed_catalog());
    let mut config = RunConfig::tuned(Method::Esa0);
    config.move_limits.max_chain_len = Some(3);
    config.move_limits.partial_cost_threshold = 2;
    let run = Run {
        config: &config,
        catalog: Arc::clone(&catalog),
        neighborhood: NeighborhoodUnion::new(NeighborhoodRates::default()),
        cache: ColoringCache::new(),
        stats: SolverStats::default(),
        stages: Vec::new(),
    };

    let limits = run.search_flags().limits;
    assert_eq!(limits.chain_cap(catalog.num_slots()), 3);
    assert_eq!(limits.partial_cost_threshold, 2);
    assert_eq!(limits.cycle_cap(6), MoveLimits::default().cycle_cap(6));

    let outcome = StagedSolver::new(config.clone().with_seed(5).with_max_evaluations(1_000))
        .solve(catalog)
        .unwrap();
    assert!(check_consistency(&outcome.state).is_consistent());
}
