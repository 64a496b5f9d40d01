//! Tests for SwapRounds.

use super::*;

#[test]
fn test_swap_rounds_exchanges_slots() {
    let mut state = phased_state(7);
    let before = state.timetable().clone();

    SwapRounds::new(1, 3).apply(&mut state);

    let tt = state.timetable();
    for t in 0..tt.num_teams() {
        assert_eq!(tt.opponent(t, 1), before.opponent(t, 3));
        assert_eq!(tt.opponent(t, 3), before.opponent(t, 1));
        assert_eq!(tt.is_home(t, 3), before.is_home(t, 1));
    }
    assert_consistent(&state);
}

#[test]
fn test_swap_rounds_draws_stay_in_half() {
    let state = phased_state(8);
    let mut rng = ChaCha8Rng::seed_from_u64(8);
    for _ in 0..200 {
        let mv = SwapRounds::random(&state, &mut rng).unwrap();
        assert!(mv.r1 < mv.r2);
        assert!(state.catalog().same_phase(mv.r1, mv.r2), "{}", mv);
    }
}

#[test]
fn test_random_swap_rounds_keep_state_consistent() {
    let mut state = phased_state(9);
    assert_eq!(run_random::<SwapRounds>(&mut state, 300, 9), 300);
    assert_eq!(state.phase_cost(), 0);

    let mut state = mixed_state(10);
    assert_eq!(run_random::<SwapRounds>(&mut state, 300, 10), 300);
}

#[test]
fn test_swap_rounds_enumeration() {
    let phased = enumerate::<SwapRounds>(&bare_state(6, true));
    assert_eq!(phased.len(), 20);
    assert_eq!(phased[0], SwapRounds::new(0, 1));
    assert_eq!(phased[19], SwapRounds::new(8, 9));
    assert!(phased.iter().all(|mv| (mv.r1 < 5) == (mv.r2 < 5)));

    let mixed = enumerate::<SwapRounds>(&bare_state(6, false));
    assert_eq!(mixed.len(), 45);
}

#[test]
fn test_swap_rounds_validity() {
    let state = bare_state(6, true);
    assert!(SwapRounds::new(2, 4).is_valid(&state));
    assert!(!SwapRounds::new(4, 5).is_valid(&state));
    assert!(!SwapRounds::new(4, 2).is_valid(&state));
    assert!(!SwapRounds::new(8, 10).is_valid(&state));
}
