//! Prefix cost estimator for greedy construction.
//!
//! Scores a timetable whose slots `0..=last_slot` are filled. Counts that
//! can still change are extrapolated from the remaining capacity, so the
//! value is a heuristic guide and never compared with exact costs.

use sportsched_core::{Ca4Scope, Catalog, ConstraintFamily, HomeMode};

use super::breaks::count_breaks;
use super::capacity::plays_against;
use super::fairness::max_home_difference;
use super::game::hosts;
use super::outside;
use super::separation::meetings;
use crate::timetable::Timetable;
use crate::weights::Weights;

/// Estimated weighted cost of the prefix ending at `last_slot`.
pub fn prefix_estimate(catalog: &Catalog, tt: &Timetable, weights: &Weights, last_slot: usize) -> f64 {
    let estimator = Estimator {
        catalog,
        tt,
        last_slot,
        available: tt.num_slots() - 1 - last_slot,
    };
    let mut total = 0.0;
    for family in ConstraintFamily::ALL {
        for index in 0..catalog.family_len(family) {
            let scale = weights.scale(family, catalog.severity(family, index)) as f64;
            total += scale * estimator.amount(family, index);
        }
    }
    total
}

/// A bounded count over `total` cells, `considered` of them in the prefix.
#[derive(Debug, Clone, Copy)]
struct PartialCount {
    games: i64,
    considered: usize,
    total: usize,
}

impl PartialCount {
    fn estimate(self, k_min: i64, k_max: i64, available: usize) -> f64 {
        if self.considered == self.total || self.games > k_max {
            return outside(self.games, k_min, k_max) as f64;
        }
        let remaining = self.total - self.considered;
        if self.games < k_min && available < remaining {
            (k_min - self.games) as f64 * available as f64 / remaining as f64
        } else if self.games >= k_min {
            self.games as f64 / k_max.max(1) as f64
        } else {
            0.0
        }
    }
}

// Excess over an upper bound, or the fill ratio while below it.
fn upper_bound_estimate(value: i64, k: i64) -> f64 {
    if value > k {
        (value - k) as f64
    } else {
        value as f64 / k.max(1) as f64
    }
}

struct Estimator<'a> {
    catalog: &'a Catalog,
    tt: &'a Timetable,
    last_slot: usize,
    available: usize,
}

impl Estimator<'_> {
    fn prefix<'s>(&self, slots: &'s [usize]) -> impl Iterator<Item = usize> + 's {
        let last = self.last_slot;
        slots.iter().copied().filter(move |&s| s <= last)
    }

    fn count_against(&self, team: usize, opponents: &[usize], slots: &[usize], mode: HomeMode) -> PartialCount {
        let considered = self.prefix(slots).count();
        let games = self
            .prefix(slots)
            .filter(|&s| plays_against(self.tt, team, s, opponents, mode))
            .count() as i64;
        PartialCount {
            games,
            considered: considered * opponents.len(),
            total: slots.len() * opponents.len(),
        }
    }

    fn amount(&self, family: ConstraintFamily, index: usize) -> f64 {
        let catalog = self.catalog;
        let tt = self.tt;
        match family {
            ConstraintFamily::Ca1 => {
                let c = &catalog.ca1()[index];
                let slots = catalog.slot_group(c.slots);
                catalog
                    .team_group(c.teams)
                    .iter()
                    .map(|&t| {
                        let games = self
                            .prefix(slots)
                            .filter(|&s| c.mode.counts(tt.is_home(t, s)))
                            .count() as i64;
                        let count = PartialCount {
                            games,
                            considered: self.prefix(slots).count(),
                            total: slots.len(),
                        };
                        count.estimate(c.k_min, c.k_max, self.available)
                    })
                    .sum()
            }
            ConstraintFamily::Ca2 => {
                let c = &catalog.ca2()[index];
                let slots = catalog.slot_group(c.slots);
                let opponents = catalog.team_group(c.teams2);
                catalog
                    .team_group(c.teams1)
                    .iter()
                    .map(|&t| {
                        self.count_against(t, opponents, slots, c.mode).estimate(
                            c.k_min,
                            c.k_max,
                            self.available * opponents.len(),
                        )
                    })
                    .sum()
            }
            ConstraintFamily::Ca3 => {
                let c = &catalog.ca3()[index];
                let opponents = catalog.team_group(c.teams2);
                let mut amount = 0.0;
                for &t in catalog.team_group(c.teams1) {
                    let games: Vec<i64> = (0..=self.last_slot)
                        .map(|s| plays_against(tt, t, s, opponents, c.mode) as i64)
                        .collect();
                    for start in 0..games.len() {
                        let end = (start + c.window).min(games.len());
                        let total: i64 = games[start..end].iter().sum();
                        amount += outside(total, c.k_min, c.k_max) as f64;
                    }
                }
                amount
            }
            ConstraintFamily::Ca4 => {
                let c = &catalog.ca4()[index];
                let slots = catalog.slot_group(c.slots);
                let teams = catalog.team_group(c.teams1);
                let opponents = catalog.team_group(c.teams2);
                match c.scope {
                    Ca4Scope::Global => {
                        let mut count = PartialCount {
                            games: 0,
                            considered: 0,
                            total: 0,
                        };
                        for &t in teams {
                            let team = self.count_against(t, opponents, slots, c.mode);
                            count.games += team.games;
                            count.considered += team.considered;
                            count.total += team.total;
                        }
                        count.estimate(c.k_min, c.k_max, self.available * opponents.len())
                    }
                    Ca4Scope::Every => self
                        .prefix(slots)
                        .map(|s| {
                            let games = teams
                                .iter()
                                .filter(|&&t| plays_against(tt, t, s, opponents, c.mode))
                                .count() as i64;
                            outside(games, c.k_min, c.k_max) as f64
                        })
                        .sum(),
                }
            }
            ConstraintFamily::Ga1 => {
                let c = &catalog.ga1()[index];
                let slots = catalog.slot_group(c.slots);
                let games = c
                    .meetings
                    .iter()
                    .map(|&(host, guest)| {
                        self.prefix(slots)
                            .filter(|&s| hosts(tt, host, guest, s))
                            .count()
                    })
                    .sum::<usize>() as i64;
                let count = PartialCount {
                    games,
                    considered: self.prefix(slots).count() * c.meetings.len(),
                    total: slots.len() * c.meetings.len(),
                };
                count.estimate(c.k_min, c.k_max, self.available * c.meetings.len())
            }
            ConstraintFamily::Br1 => {
                let c = &catalog.br1()[index];
                let slots: Vec<usize> = self.prefix(catalog.slot_group(c.slots)).collect();
                catalog
                    .team_group(c.teams)
                    .iter()
                    .map(|&t| upper_bound_estimate(count_breaks(tt, t, &slots, c.mode), c.k))
                    .sum()
            }
            ConstraintFamily::Br2 => {
                let c = &catalog.br2()[index];
                let slots: Vec<usize> = self.prefix(catalog.slot_group(c.slots)).collect();
                let breaks = catalog
                    .team_group(c.teams)
                    .iter()
                    .map(|&t| count_breaks(tt, t, &slots, HomeMode::Any))
                    .sum();
                upper_bound_estimate(breaks, c.k)
            }
            ConstraintFamily::Fa2 => {
                let c = &catalog.fa2()[index];
                let slots: Vec<usize> = self.prefix(catalog.slot_group(c.slots)).collect();
                let teams = catalog.team_group(c.teams);
                let mut amount = 0.0;
                for (i, &t1) in teams.iter().enumerate() {
                    for &t2 in &teams[i + 1..] {
                        let difference = max_home_difference(tt, t1, t2, &slots);
                        amount += upper_bound_estimate(difference, c.k);
                    }
                }
                amount
            }
            ConstraintFamily::Se1 => {
                let c = &catalog.se1()[index];
                let teams = catalog.team_group(c.teams);
                let remaining = tt.num_slots() - self.last_slot;
                let mut amount = 0.0;
                for (i, &t1) in teams.iter().enumerate() {
                    for &t2 in &teams[i + 1..] {
                        amount += match meetings(tt, t1, t2, self.last_slot) {
                            (Some(first), Some(second)) => {
                                let gap = (second - first - 1) as i64;
                                if gap > c.m_max {
                                    (gap - c.m_max) as f64
                                } else if gap < c.m_min {
                                    (c.m_min - gap) as f64 * self.available as f64
                                        / remaining as f64
                                } else {
                                    gap as f64 / c.m_max.max(1) as f64
                                }
                            }
                            // The second meeting lies after the prefix.
                            (Some(first), None) => {
                                let gap = (self.last_slot - first) as i64;
                                (gap - c.m_max).max(0) as f64
                            }
                            _ => 0.0,
                        };
                    }
                }
                amount
            }
        }
    }
}
