//! Break constraints BR1 and BR2.
//!
//! A break at slot `s > 0` means the team's home status at `s` repeats the
//! one at `s - 1`.

use sportsched_core::{Br1, Br2, Catalog, HomeMode};

use crate::timetable::Timetable;

/// Returns true if `team` has a break of `mode` at `slot`.
#[inline]
pub(crate) fn is_break(tt: &Timetable, team: usize, slot: usize, mode: HomeMode) -> bool {
    if slot == 0 {
        return false;
    }
    let previous = tt.is_home(team, slot - 1);
    let current = tt.is_home(team, slot);
    match mode {
        HomeMode::Home => previous && current,
        HomeMode::Away => !previous && !current,
        HomeMode::Any => previous == current,
    }
}

pub(crate) fn count_breaks(tt: &Timetable, team: usize, slots: &[usize], mode: HomeMode) -> i64 {
    slots.iter().filter(|&&s| is_break(tt, team, s, mode)).count() as i64
}

pub fn br1(catalog: &Catalog, tt: &Timetable, c: &Br1) -> i64 {
    let slots = catalog.slot_group(c.slots);
    catalog
        .team_group(c.teams)
        .iter()
        .map(|&t| (count_breaks(tt, t, slots, c.mode) - c.k).max(0))
        .sum()
}

pub fn br2(catalog: &Catalog, tt: &Timetable, c: &Br2) -> i64 {
    let slots = catalog.slot_group(c.slots);
    let total: i64 = catalog
        .team_group(c.teams)
        .iter()
        .map(|&t| count_breaks(tt, t, slots, HomeMode::Any))
        .sum();
    (total - c.k).max(0)
}
