//! Tests for MoveKind and ScheduleMove.

use super::*;

#[test]
fn test_kind_names_round_trip() {
    for kind in MoveKind::ALL {
        assert_eq!(kind.name().parse::<MoveKind>().unwrap(), kind);
    }
    assert_eq!(MoveKind::SwapMatchRound.to_string(), "swap_match_round");
    assert_eq!(
        "swap_everything".parse::<MoveKind>(),
        Err(MoveError::Parse("swap_everything".to_string()))
    );
}

#[test]
fn test_first_move_of_every_kind() {
    let state = mixed_state(31);
    for kind in MoveKind::ALL {
        let mv = kind.first(&state).unwrap_or_else(|| panic!("no {} move", kind));
        assert_eq!(mv.kind(), kind);
        assert!(mv.is_feasible(&state));

        let mut next = state.clone();
        mv.apply(&mut next);
        assert_consistent(&next);
    }
}

#[test]
fn test_schedule_move_delegates() {
    let mut state = phased_state(32);
    let inner = SwapHomes::new(0, 3);
    let mv = ScheduleMove::from(inner);

    assert_eq!(mv.to_string(), inner.to_string());
    assert_eq!(mv.kind(), MoveKind::SwapHomes);
    assert!(mv.is_valid(&state));

    let expected = {
        let mut copy = state.clone();
        inner.apply(&mut copy);
        copy.total_cost()
    };
    mv.apply(&mut state);
    assert_eq!(state.total_cost(), expected);
}

#[test]
fn test_schedule_move_enumeration_advances() {
    let state = mixed_state(33);
    let mut mv = MoveKind::SwapRounds.first(&state).unwrap();
    assert_eq!(mv, ScheduleMove::from(SwapRounds::new(0, 1)));
    assert!(mv.next(&state));
    assert_eq!(mv, ScheduleMove::from(SwapRounds::new(0, 2)));
}

#[test]
fn test_random_by_kind() {
    let state = mixed_state(34);
    let mut rng = ChaCha8Rng::seed_from_u64(34);
    for kind in MoveKind::ALL {
        if let Ok(mv) = kind.random(&state, &mut rng) {
            assert_eq!(mv.kind(), kind);
        }
    }
    assert!(MoveKind::SwapHomes.random(&state, &mut rng).is_ok());
}
