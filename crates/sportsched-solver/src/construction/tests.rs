//! Tests for the construction heuristics.

use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sportsched_scoring::{check_timetable, ScheduleState, SearchFlags, Timetable, Weights};
use sportsched_test::{empty_catalog, mixed_catalog, random_catalog};

use super::*;

fn assert_valid(tt: &Timetable, check_phase: bool) {
    let report = check_timetable(tt, check_phase);
    assert!(report.is_consistent(), "{}", report);
}

#[test]
fn test_canonical_four_teams() {
    let tt = canonical_pattern(4);
    assert_valid(&tt, true);

    assert_eq!(tt.opponent(0, 0), 3);
    assert!(tt.is_home(0, 0));
    assert_eq!(tt.opponent(2, 0), 1);
    assert!(tt.is_home(2, 0));
    assert_eq!(tt.opponent(3, 3), 0);
    assert!(tt.is_home(3, 3));

    let state = ScheduleState::new(
        Arc::new(empty_catalog(4, true)),
        tt,
        Weights::default(),
        SearchFlags::default(),
    )
    .unwrap();
    assert_eq!(state.phase_cost(), 0);
    assert_eq!(state.total_cost(), 0);
}

#[test]
fn test_canonical_pattern_is_valid() {
    for n in [2, 4, 6, 8, 10, 20] {
        assert_valid(&canonical_pattern(n), true);
    }
}

#[test]
fn test_random_pattern_keeps_halves_unless_mixing() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    for _ in 0..20 {
        assert_valid(&random_pattern(8, false, &mut rng), true);
        assert_valid(&random_pattern(8, true, &mut rng), false);
    }
}

#[test]
fn test_round_candidates_enumerate_free_venues() {
    let tt = Timetable::unassigned(4);
    let pool = polygon_rounds(&[0, 1, 2, 3]);
    let order = canonical_order(4);

    let candidates: Vec<RoundCandidate> = RoundCandidates::new(&tt, 0, &pool, &order).collect();
    assert_eq!(candidates.len(), 3 * 4);

    // The second team of each pair hosts first; the last pair flips fastest.
    assert_eq!(candidates[0].games.as_slice(), &[(1, 0), (3, 2)]);
    assert_eq!(candidates[1].games.as_slice(), &[(1, 0), (2, 3)]);
    assert_eq!(candidates[2].games.as_slice(), &[(0, 1), (3, 2)]);
    assert_eq!(candidates[4].pool_index, 1);
}

#[test]
fn test_round_candidates_force_return_venue() {
    let mut tt = Timetable::unassigned(4);
    let pool = polygon_rounds(&[0, 1, 2, 3]);
    let order = canonical_order(4);

    let first = RoundCandidates::new(&tt, 0, &pool, &order).next().unwrap();
    first.place(&mut tt, 0);

    let replay = [pool[0].clone()];
    let candidates: Vec<RoundCandidate> = RoundCandidates::new(&tt, 1, &replay, &order).collect();
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].games.as_slice(), &[(0, 1), (2, 3)]);
}

#[test]
fn test_greedy_phased_respects_halves() {
    let catalog = mixed_catalog();
    let weights = Weights::new(40, 400);
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let mut cache = ColoringCache::new();

    for source in [CandidateSource::Polygon, CandidateSource::Vizing] {
        let options = GreedyOptions {
            source,
            parallel: false,
        };
        let tt = greedy_timetable(&catalog, &weights, options, &mut cache, &mut rng);
        assert_valid(&tt, true);
    }
}

#[test]
fn test_greedy_not_phased_is_valid() {
    let catalog = random_catalog(8, false, 2, 5);
    let weights = Weights::default();
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let mut cache = ColoringCache::new();

    for source in [CandidateSource::Polygon, CandidateSource::Vizing] {
        let options = GreedyOptions {
            source,
            parallel: false,
        };
        let tt = greedy_timetable(&catalog, &weights, options, &mut cache, &mut rng);
        assert_valid(&tt, false);
    }
}

#[test]
fn test_greedy_is_reproducible() {
    let catalog = random_catalog(8, true, 2, 9);
    let weights = Weights::new(10, 100);

    for parallel in [false, true] {
        let options = GreedyOptions {
            source: CandidateSource::Vizing,
            parallel,
        };
        let build = || {
            let mut rng = ChaCha8Rng::seed_from_u64(21);
            greedy_timetable(&catalog, &weights, options, &mut ColoringCache::new(), &mut rng)
        };
        let tt = build();
        assert_valid(&tt, true);
        assert_eq!(tt, build());
    }
}

#[test]
fn test_initial_timetable_keeps_halves_on_phased_instances() {
    let catalog = mixed_catalog();
    let weights = Weights::default();
    let mut rng = ChaCha8Rng::seed_from_u64(2);
    let mut cache = ColoringCache::new();

    for start in [StartType::Random, StartType::Greedy, StartType::Vizing] {
        let tt = initial_timetable(&catalog, &weights, start, true, false, &mut cache, &mut rng);
        assert_valid(&tt, true);
    }
}
