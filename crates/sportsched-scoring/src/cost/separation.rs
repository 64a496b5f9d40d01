//! Separation constraint SE1.

use sportsched_core::{Catalog, Se1};

use super::outside;
use crate::timetable::Timetable;

/// Slots of the first two meetings of `t1` and `t2` up to `last_slot`.
pub(crate) fn meetings(
    tt: &Timetable,
    t1: usize,
    t2: usize,
    last_slot: usize,
) -> (Option<usize>, Option<usize>) {
    let mut found = (0..=last_slot).filter(|&s| tt.opponent(t1, s) == t2);
    let first = found.next();
    (first, found.next())
}

pub fn se1(catalog: &Catalog, tt: &Timetable, c: &Se1) -> i64 {
    let teams = catalog.team_group(c.teams);
    let last_slot = tt.num_slots() - 1;
    let mut total = 0;
    for (i, &t1) in teams.iter().enumerate() {
        for &t2 in &teams[i + 1..] {
            if let (Some(first), Some(second)) = meetings(tt, t1, t2, last_slot) {
                let gap = (second - first - 1) as i64;
                total += outside(gap, c.m_min, c.m_max);
            }
        }
    }
    total
}
