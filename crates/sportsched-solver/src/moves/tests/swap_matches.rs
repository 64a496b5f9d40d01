//! Tests for SwapMatchesNotPhased and SwapMatchesPhased.

use super::*;
use sportsched_scoring::MoveLimits;

#[test]
fn test_not_phased_chain_shape() {
    let state = phased_state(11);
    let num_slots = state.timetable().num_slots();
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let mut seen = 0;
    for _ in 0..200 {
        let Ok(mv) = SwapMatchesNotPhased::random(&state, &mut rng) else {
            continue;
        };
        seen += 1;
        let seed = mv.seed();
        assert!(mv.t1 < mv.t2);
        assert!(mv.rounds.len() <= state.flags().limits.chain_cap(num_slots));
        assert!(mv.rounds.iter().all(|&r| r >= seed));
        assert!(mv.rounds.iter().all(|&r| state.catalog().same_phase(r, seed)));
        assert_ne!(state.timetable().opponent(mv.t1, seed), mv.t2);
    }
    assert!(seen > 0);
}

#[test]
fn test_not_phased_exchanges_seed_games() {
    let mut state = mixed_state(12);
    let mut rng = ChaCha8Rng::seed_from_u64(12);
    let mv = SwapMatchesNotPhased::random(&state, &mut rng).unwrap();
    let before = state.timetable().clone();
    let seed = mv.seed();

    mv.apply(&mut state);

    let tt = state.timetable();
    assert_eq!(tt.opponent(mv.t1, seed), before.opponent(mv.t2, seed));
    assert_eq!(tt.opponent(mv.t2, seed), before.opponent(mv.t1, seed));
    assert_consistent(&state);
}

#[test]
fn test_random_not_phased_keep_state_consistent() {
    let mut state = mixed_state(13);
    assert!(run_random::<SwapMatchesNotPhased>(&mut state, 300, 13) > 0);

    let mut state = phased_state(14);
    assert!(run_random::<SwapMatchesNotPhased>(&mut state, 300, 14) > 0);
    assert_eq!(state.phase_cost(), 0);
}

#[test]
fn test_random_phased_keep_state_consistent() {
    let mut state = phased_state(15);
    assert!(run_random::<SwapMatchesPhased>(&mut state, 300, 15) > 0);
    assert_eq!(state.phase_cost(), 0);

    let mut state = mixed_state(16);
    assert!(run_random::<SwapMatchesPhased>(&mut state, 300, 16) > 0);
}

#[test]
fn test_phased_chain_stays_in_one_leg() {
    let state = mixed_state(17);
    let tt = state.timetable();
    let mut rng = ChaCha8Rng::seed_from_u64(17);
    for _ in 0..100 {
        let Ok(mv) = SwapMatchesPhased::random(&state, &mut rng) else {
            continue;
        };
        let leg = tt.is_return(mv.t1, mv.seed());
        assert_eq!(mv.rounds.len(), mv.flips.len());
        for &r in &mv.rounds {
            assert_eq!(tt.is_return(mv.t2, r), leg, "{}", mv);
        }
    }
}

#[test]
fn test_swap_matches_enumeration_is_ordered() {
    let state = phased_state(18);
    let moves = enumerate::<SwapMatchesNotPhased>(&state);
    assert!(!moves.is_empty());
    let keys: Vec<(usize, usize, usize)> = moves.iter().map(|mv| (mv.t1, mv.t2, mv.seed())).collect();
    assert!(keys.windows(2).all(|pair| pair[0] < pair[1]));
    assert!(moves.iter().all(|mv| mv.is_valid(&state)));

    let phased = enumerate::<SwapMatchesPhased>(&state);
    assert!(phased.iter().all(|mv| mv.is_valid(&state)));
}

#[test]
fn test_tampered_chain_is_invalid() {
    let state = mixed_state(19);
    let mut mv = SwapMatchesNotPhased::first(&state).unwrap();
    assert!(mv.is_valid(&state));
    mv.rounds.push(0);
    assert!(!mv.is_valid(&state));
}

#[test]
fn test_swap_matches_parse() {
    let mv: SwapMatchesNotPhased = "<0-3%[2,5]>".parse().unwrap();
    assert_eq!((mv.t1, mv.t2), (0, 3));
    assert_eq!(mv.rounds.as_slice(), &[2, 5]);
    assert_eq!(mv.to_string(), "<0-3%[2,5]>");
    assert!("<0-3%[]>".parse::<SwapMatchesNotPhased>().is_err());
    assert!("<0-3>".parse::<SwapMatchesNotPhased>().is_err());

    let phased: SwapMatchesPhased = "<1-2%[4]>".parse().unwrap();
    assert_eq!(phased.flips.as_slice(), &[(false, false)]);
    assert_eq!(phased.to_string(), "<1-2%[4]>");
}

#[test]
fn test_seed_where_pair_meets_is_rejected() {
    let state = mixed_state(30);
    let tt = state.timetable();
    let (t1, t2) = (1, 4);
    let first = tt.match_slot(t1, t2).min(tt.match_slot(t2, t1));
    assert_eq!(tt.opponent(t1, first), t2);

    assert!(SwapMatchesNotPhased::seeded(&state, t1, t2, first).is_none());
    assert!(SwapMatchesPhased::seeded(&state, t1, t2, first).is_none());
}

#[test]
fn test_exchange_where_pair_meets_is_swap_homes() {
    let mut state = mixed_state(31);
    let (t1, t2) = (1, 4);
    let first = state.timetable().match_slot(t1, t2);
    let second = state.timetable().match_slot(t2, t1);

    let mut exchanged = state.timetable().clone();
    exchanged.swap_opponents_at_slot(t1, t2, first, false, false);
    exchanged.swap_opponents_at_slot(t1, t2, second, false, false);
    exchanged.recompute_leg_and_mirror(t1, first);

    SwapHomes::new(t1, t2).apply(&mut state);
    assert_eq!(state.timetable(), &exchanged);
    assert_consistent(&state);
}

#[test]
fn test_smaller_chain_cap_rejects_default_chain() {
    let mut state = mixed_state(32);
    let mv = SwapMatchesNotPhased::first(&state).unwrap();
    let len = mv.rounds.len();
    assert!(len >= 2);

    let limits = MoveLimits::default().with_max_chain_len(Some(len - 1));
    state.set_flags(state.flags().with_limits(limits));
    assert!(SwapMatchesNotPhased::seeded(&state, mv.t1, mv.t2, mv.seed()).is_none());
    assert!(!mv.is_valid(&state));

    let limits = MoveLimits::default().with_max_chain_len(Some(len));
    state.set_flags(state.flags().with_limits(limits));
    assert_eq!(
        SwapMatchesNotPhased::seeded(&state, mv.t1, mv.t2, mv.seed()),
        Some(mv)
    );
}

#[test]
fn test_long_chain_falls_back_to_full_recompute() {
    let mut state = mixed_state(33);
    let mv = SwapMatchesNotPhased::first(&state).unwrap();
    assert!(mv.affected(&state).is_some());

    let limits = MoveLimits::default().with_partial_cost_threshold(1);
    state.set_flags(state.flags().with_limits(limits));
    assert!(mv.affected(&state).is_none());

    mv.apply(&mut state);
    assert_consistent(&state);
}
