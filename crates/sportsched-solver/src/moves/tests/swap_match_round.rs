//! Tests for SwapMatchRound.

use super::*;

#[test]
fn test_cycle_shape() {
    let state = phased_state(21);
    let cap = state.flags().limits.cycle_cap(6);
    let mut rng = ChaCha8Rng::seed_from_u64(21);
    let mut seen = 0;
    for _ in 0..200 {
        let Ok(mv) = SwapMatchRound::random(&state, &mut rng) else {
            continue;
        };
        seen += 1;
        assert!(mv.r1 < mv.r2);
        assert!(state.catalog().same_phase(mv.r1, mv.r2), "{}", mv);
        assert_eq!(mv.teams.len() % 2, 0);
        assert!(mv.teams.len() <= cap);
        assert!(mv.teams.iter().all(|&t| t >= mv.teams[0]));
    }
    assert!(seen > 0);
}

#[test]
fn test_cycle_games_change_slots() {
    let mut state = mixed_state(22);
    let mut rng = ChaCha8Rng::seed_from_u64(22);
    let mv = SwapMatchRound::random(&state, &mut rng).unwrap();
    let before = state.timetable().clone();

    mv.apply(&mut state);

    let tt = state.timetable();
    for &t in &mv.teams {
        assert_eq!(tt.opponent(t, mv.r1), before.opponent(t, mv.r2));
        assert_eq!(tt.opponent(t, mv.r2), before.opponent(t, mv.r1));
        assert_eq!(tt.is_home(t, mv.r1), before.is_home(t, mv.r2));
    }
    assert_consistent(&state);
}

#[test]
fn test_random_swap_match_round_keep_state_consistent() {
    let mut state = phased_state(23);
    assert!(run_random::<SwapMatchRound>(&mut state, 300, 23) > 0);
    assert_eq!(state.phase_cost(), 0);

    let mut state = mixed_state(24);
    assert!(run_random::<SwapMatchRound>(&mut state, 300, 24) > 0);
}

#[test]
fn test_swap_match_round_enumeration_is_ordered() {
    let state = mixed_state(25);
    let moves = enumerate::<SwapMatchRound>(&state);
    assert!(!moves.is_empty());
    let keys: Vec<(usize, usize, usize)> =
        moves.iter().map(|mv| (mv.teams[0], mv.r1, mv.r2)).collect();
    assert!(keys.windows(2).all(|pair| pair[0] < pair[1]));
    assert!(moves.iter().all(|mv| mv.is_valid(&state)));
}

#[test]
fn test_cross_half_cycle_rejected_without_mixing() {
    let state = phased_state(26);
    for team in 0..6 {
        assert!(SwapMatchRound::seeded(&state, team, 2, 7).is_none());
    }
}

#[test]
fn test_swap_match_round_parse() {
    let mv: SwapMatchRound = "<[0,3,1,4]^2-5>".parse().unwrap();
    assert_eq!(mv.teams.as_slice(), &[0, 3, 1, 4]);
    assert_eq!((mv.r1, mv.r2), (2, 5));
    assert_eq!(mv.to_string(), "<[0,3,1,4]^2-5>");
    assert!("<[]^2-5>".parse::<SwapMatchRound>().is_err());
    assert!("<[0,1]^2>".parse::<SwapMatchRound>().is_err());
}

#[test]
fn test_cycle_cap_override() {
    let mut state = mixed_state(29);
    let limits = sportsched_scoring::MoveLimits::default().with_max_cycle_len(Some(2));
    state.set_flags(state.flags().with_limits(limits));
    let moves = enumerate::<SwapMatchRound>(&state);
    assert!(moves.iter().all(|mv| mv.teams.len() == 2));
}
