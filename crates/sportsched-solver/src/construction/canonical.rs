//! Closed-form circle pattern.

use rand::seq::SliceRandom;
use rand::Rng;
use sportsched_scoring::Timetable;

/// The circle-method double round robin for an even `num_teams`.
///
/// Team `n - 1` is the fixed vertex; the second half mirrors the first with
/// venues reversed, so both legs of every pair fall in different halves and
/// every team alternates home and away against the fixed vertex.
pub fn canonical_pattern(num_teams: usize) -> Timetable {
    let teams: Vec<usize> = (0..num_teams).collect();
    let slots: Vec<usize> = (0..2 * num_teams.saturating_sub(1)).collect();
    build(num_teams, &teams, &slots)
}

/// The circle pattern with shuffled team labels and slot order.
///
/// With `mix_phase` the slots are shuffled over the whole calendar;
/// otherwise each half is shuffled on its own and the phase structure is
/// kept.
pub fn random_pattern<R: Rng + ?Sized>(num_teams: usize, mix_phase: bool, rng: &mut R) -> Timetable {
    let mut teams: Vec<usize> = (0..num_teams).collect();
    let mut slots: Vec<usize> = (0..2 * num_teams.saturating_sub(1)).collect();
    teams.shuffle(rng);
    if mix_phase {
        slots.shuffle(rng);
    } else {
        let half = slots.len() / 2;
        let (first, second) = slots.split_at_mut(half);
        first.shuffle(rng);
        second.shuffle(rng);
    }
    build(num_teams, &teams, &slots)
}

/// Writes the pattern through the team permutation `tp` and slot
/// permutation `rp`.
fn build(num_teams: usize, tp: &[usize], rp: &[usize]) -> Timetable {
    debug_assert!(num_teams % 2 == 0, "compact round robin needs an even team count");
    let mut tt = Timetable::unassigned(num_teams);
    if num_teams < 2 {
        return tt;
    }
    let n = num_teams;
    let half = tt.half();
    let mut place = |slot: usize, home: usize, away: usize| {
        tt.set_assignment(tp[home], rp[slot], tp[away], true);
        tt.set_assignment(tp[away], rp[slot], tp[home], false);
    };

    for i in 0..half {
        // (home, away) of the first leg; the second leg reverses it.
        let fixed = if i % 2 == 0 { (i, n - 1) } else { (n - 1, i) };
        place(i, fixed.0, fixed.1);
        place(i + half, fixed.1, fixed.0);

        for k in 1..n / 2 {
            let a = (i + k) % (n - 1);
            let b = (i + n - 1 - k) % (n - 1);
            let (home, away) = if k % 2 == 0 { (a, b) } else { (b, a) };
            place(i, home, away);
            place(i + half, away, home);
        }
    }
    tt.refresh_legs();
    tt
}
