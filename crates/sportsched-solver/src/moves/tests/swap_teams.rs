//! Tests for SwapTeams.

use super::*;

#[test]
fn test_swap_teams_exchanges_calendars() {
    let mut state = bare_state(6, true);
    let before = state.timetable().clone();

    SwapTeams::new(1, 3).apply(&mut state);

    let tt = state.timetable();
    for s in 0..tt.num_slots() {
        let expected = match before.opponent(3, s) {
            1 => 3,
            other => other,
        };
        assert_eq!(tt.opponent(1, s), expected);
        assert_eq!(tt.is_home(1, s), before.is_home(3, s));
    }
    assert_consistent(&state);
}

#[test]
fn test_swap_teams_twice_restores() {
    let mut state = phased_state(4);
    let before = state.timetable().clone();

    let mv = SwapTeams::new(0, 2);
    mv.apply(&mut state);
    mv.apply(&mut state);
    assert_eq!(state.timetable(), &before);
}

#[test]
fn test_random_swap_teams_keep_state_consistent() {
    let mut state = phased_state(5);
    assert_eq!(run_random::<SwapTeams>(&mut state, 300, 5), 300);

    let mut state = mixed_state(6);
    assert_eq!(run_random::<SwapTeams>(&mut state, 300, 6), 300);
}

#[test]
fn test_swap_teams_parse() {
    let mv: SwapTeams = "<1-4>".parse().unwrap();
    assert_eq!(mv, SwapTeams::new(1, 4));
    assert_eq!(mv.to_string(), "<1-4>");
    assert!("<1-x>".parse::<SwapTeams>().is_err());
}
