//! Capacity constraints CA1-CA4.

use sportsched_core::{Ca1, Ca2, Ca3, Ca4, Ca4Scope, Catalog, HomeMode};

use super::outside;
use crate::timetable::{Timetable, UNSET};

/// Returns true if `team` plays a counted game against a member of
/// `opponents` at `slot`.
#[inline]
pub(crate) fn plays_against(
    tt: &Timetable,
    team: usize,
    slot: usize,
    opponents: &[usize],
    mode: HomeMode,
) -> bool {
    let opponent = tt.opponent(team, slot);
    opponent != UNSET
        && mode.counts(tt.is_home(team, slot))
        && opponents.binary_search(&opponent).is_ok()
}

pub fn ca1(catalog: &Catalog, tt: &Timetable, c: &Ca1) -> i64 {
    let slots = catalog.slot_group(c.slots);
    catalog
        .team_group(c.teams)
        .iter()
        .map(|&t| {
            let games = slots
                .iter()
                .filter(|&&s| tt.is_assigned(t, s) && c.mode.counts(tt.is_home(t, s)))
                .count() as i64;
            outside(games, c.k_min, c.k_max)
        })
        .sum()
}

pub fn ca2(catalog: &Catalog, tt: &Timetable, c: &Ca2) -> i64 {
    let slots = catalog.slot_group(c.slots);
    let opponents = catalog.team_group(c.teams2);
    catalog
        .team_group(c.teams1)
        .iter()
        .map(|&t| {
            let games = slots
                .iter()
                .filter(|&&s| plays_against(tt, t, s, opponents, c.mode))
                .count() as i64;
            outside(games, c.k_min, c.k_max)
        })
        .sum()
}

/// Every window of `c.window` consecutive slots lying inside the calendar
/// is checked separately.
pub fn ca3(catalog: &Catalog, tt: &Timetable, c: &Ca3) -> i64 {
    let num_slots = tt.num_slots();
    let opponents = catalog.team_group(c.teams2);
    let mut total = 0;
    for &t in catalog.team_group(c.teams1) {
        let games: Vec<i64> = (0..num_slots)
            .map(|s| plays_against(tt, t, s, opponents, c.mode) as i64)
            .collect();
        total += games
            .windows(c.window)
            .map(|window| outside(window.iter().sum(), c.k_min, c.k_max))
            .sum::<i64>();
    }
    total
}

/// Pairs are counted from the side of `teams1`; a game between two teams
/// present in both groups counts once from each side.
pub fn ca4(catalog: &Catalog, tt: &Timetable, c: &Ca4) -> i64 {
    let slots = catalog.slot_group(c.slots);
    let teams = catalog.team_group(c.teams1);
    let opponents = catalog.team_group(c.teams2);
    let games_at = |s: usize| {
        teams
            .iter()
            .filter(|&&t| plays_against(tt, t, s, opponents, c.mode))
            .count() as i64
    };
    match c.scope {
        Ca4Scope::Global => outside(slots.iter().map(|&s| games_at(s)).sum(), c.k_min, c.k_max),
        Ca4Scope::Every => slots
            .iter()
            .map(|&s| outside(games_at(s), c.k_min, c.k_max))
            .sum(),
    }
}
