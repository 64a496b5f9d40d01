use super::*;
use sportsched_test::double_round_robin;

fn circle(n: usize) -> Timetable {
    Timetable::from_rows(&double_round_robin(n)).unwrap()
}

fn assert_legs_consistent(tt: &Timetable) {
    for t in 0..tt.num_teams() {
        for s in 0..tt.num_slots() {
            assert_eq!(tt.is_return(t, s), tt.expected_leg(t, s), "leg of ({}, {})", t, s);
        }
    }
}

#[test]
fn test_from_rows_fills_matches_and_legs() {
    let tt = circle(4);

    assert_eq!(tt.num_slots(), 6);
    assert_eq!(tt.opponent(0, 0), 3);
    assert!(tt.is_home(0, 0));
    assert_eq!(tt.match_slot(0, 3), 0);
    assert_eq!(tt.match_slot(3, 0), 3);
    assert!(!tt.is_return(0, 0));
    assert!(tt.is_return(0, 3));
    assert!(tt.is_return(3, 3));
    assert_legs_consistent(&tt);
}

#[test]
fn test_from_rows_rejects_bad_dimensions() {
    let mut rows = double_round_robin(4);
    rows[2].pop();
    assert!(matches!(
        Timetable::from_rows(&rows),
        Err(ScheduleError::SlotCount { team: 2, .. })
    ));

    let mut rows = double_round_robin(4);
    rows[1][0] = (1, true);
    assert!(matches!(
        Timetable::from_rows(&rows),
        Err(ScheduleError::InvalidOpponent { team: 1, slot: 0, .. })
    ));
}

#[test]
fn test_unassigned() {
    let tt = Timetable::unassigned(6);
    assert_eq!(tt.num_slots(), 10);
    assert!(!tt.is_assigned(5, 9));
    assert_eq!(tt.match_slot(0, 1), UNSET);
}

#[test]
fn test_swap_homes_twice_restores() {
    let original = circle(6);
    let mut tt = original.clone();

    tt.swap_homes(1, 4);
    assert_ne!(tt, original);
    let (r1, r2) = (original.match_slot(1, 4), original.match_slot(4, 1));
    assert!(!tt.is_home(1, r1));
    assert!(tt.is_home(1, r2));
    assert_eq!(tt.match_slot(1, 4), r2);
    assert_legs_consistent(&tt);

    tt.swap_homes(1, 4);
    assert_eq!(tt, original);
}

#[test]
fn test_swap_opponents_at_mutual_slot_flips_homes() {
    let original = circle(4);
    let mut tt = original.clone();
    let (first, second) = (tt.match_slot(0, 3), tt.match_slot(3, 0));

    tt.swap_opponents_at_slot(0, 3, first, false, false);
    tt.swap_opponents_at_slot(0, 3, second, false, false);
    tt.recompute_leg_and_mirror(0, first);

    let mut expected = original;
    expected.swap_homes(0, 3);
    assert_eq!(tt, expected);
}

#[test]
fn test_swap_opponents_keeps_round_structure() {
    let mut tt = circle(6);
    let s = 2;
    let (o1, o2) = (tt.opponent(0, s), tt.opponent(1, s));
    assert_ne!(o1, 1);
    let h2 = tt.is_home(1, s);

    tt.swap_opponents_at_slot(0, 1, s, true, false);

    assert_eq!(tt.opponent(0, s), o2);
    assert_eq!(tt.opponent(o2, s), 0);
    assert_eq!(tt.opponent(1, s), o1);
    assert_eq!(tt.opponent(o1, s), 1);
    assert_eq!(tt.is_home(0, s), !h2);
    assert_eq!(tt.is_home(o2, s), h2);
    for t in 0..6 {
        let o = tt.opponent(t, s);
        assert_eq!(tt.opponent(o, s), t);
        assert_ne!(tt.is_home(t, s), tt.is_home(o, s));
    }
}

#[test]
fn test_swap_slots() {
    let original = circle(6);
    let mut tt = original.clone();

    tt.swap_slots(1, 7);

    for t in 0..6 {
        assert_eq!(tt.opponent(t, 1), original.opponent(t, 7));
        assert_eq!(tt.is_home(t, 7), original.is_home(t, 1));
        if tt.is_home(t, 1) {
            assert_eq!(tt.match_slot(t, tt.opponent(t, 1)), 1);
        }
    }
    assert_legs_consistent(&tt);

    tt.swap_slots(1, 7);
    assert_eq!(tt, original);
}

#[test]
fn test_rows_round_trip() {
    let rows = double_round_robin(8);
    assert_eq!(Timetable::from_rows(&rows).unwrap().rows(), rows);
}

#[test]
fn test_clear_slot_forgets_meetings() {
    let mut tt = circle(4);
    tt.clear_slot(0);

    for t in 0..4 {
        assert!(!tt.is_assigned(t, 0));
        assert!(tt.is_assigned(t, 1));
    }
    assert_eq!(tt.match_slot(0, 3), UNSET);
    assert_eq!(tt.match_slot(3, 0), 3);
}
