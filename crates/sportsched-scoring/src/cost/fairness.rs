//! Fairness constraint FA2.

use sportsched_core::{Catalog, Fa2};

use crate::timetable::Timetable;

/// Largest home-game difference of two teams over the prefixes of `slots`.
pub(crate) fn max_home_difference(tt: &Timetable, t1: usize, t2: usize, slots: &[usize]) -> i64 {
    let mut difference = 0i64;
    let mut max = 0;
    for &s in slots {
        difference += tt.is_home(t1, s) as i64 - tt.is_home(t2, s) as i64;
        max = max.max(difference.abs());
    }
    max
}

pub fn fa2(catalog: &Catalog, tt: &Timetable, c: &Fa2) -> i64 {
    let slots = catalog.slot_group(c.slots);
    let teams = catalog.team_group(c.teams);
    let mut total = 0;
    for (i, &t1) in teams.iter().enumerate() {
        for &t2 in &teams[i + 1..] {
            total += (max_home_difference(tt, t1, t2, slots) - c.k).max(0);
        }
    }
    total
}
