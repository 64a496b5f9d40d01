//! Game constraint GA1.

use sportsched_core::{Catalog, Ga1};

use super::outside;
use crate::timetable::Timetable;

/// Returns true if `host` receives `guest` at `slot`.
#[inline]
pub(crate) fn hosts(tt: &Timetable, host: usize, guest: usize, slot: usize) -> bool {
    tt.is_home(host, slot) && tt.opponent(host, slot) == guest
}

pub fn ga1(catalog: &Catalog, tt: &Timetable, c: &Ga1) -> i64 {
    let slots = catalog.slot_group(c.slots);
    let games = c
        .meetings
        .iter()
        .map(|&(host, guest)| slots.iter().filter(|&&s| hosts(tt, host, guest, s)).count())
        .sum::<usize>() as i64;
    outside(games, c.k_min, c.k_max)
}
