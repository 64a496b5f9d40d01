//! Reverse index from (team, slot) cells to the constraints reading them.

use std::collections::BTreeSet;
use std::ops::{Index, IndexMut};

use crate::catalog::Catalog;
use crate::constraint::ConstraintFamily;

/// One sorted, duplicate-free list of constraint indices per family.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FamilySets([Vec<usize>; ConstraintFamily::COUNT]);

impl FamilySets {
    pub fn get(&self, family: ConstraintFamily) -> &[usize] {
        &self.0[family.index()]
    }

    /// Total number of indices over all families.
    pub fn total_len(&self) -> usize {
        self.0.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(Vec::is_empty)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ConstraintFamily, &[usize])> {
        ConstraintFamily::ALL
            .into_iter()
            .map(move |family| (family, self.get(family)))
    }

    fn from_sets(sets: [BTreeSet<usize>; ConstraintFamily::COUNT]) -> Self {
        Self(sets.map(|set| set.into_iter().collect()))
    }
}

impl Index<ConstraintFamily> for FamilySets {
    type Output = Vec<usize>;

    fn index(&self, family: ConstraintFamily) -> &Vec<usize> {
        &self.0[family.index()]
    }
}

impl IndexMut<ConstraintFamily> for FamilySets {
    fn index_mut(&mut self, family: ConstraintFamily) -> &mut Vec<usize> {
        &mut self.0[family.index()]
    }
}

type Cell = [BTreeSet<usize>; ConstraintFamily::COUNT];

/// Maps every (team, slot) cell, team and slot to the constraint instances
/// whose cost may change when that cell changes.
///
/// Break constraints are registered at slot `s` and at `s - 1`, since a
/// break at `s` depends on both. CA3 and SE1 depend on the whole calendar
/// and are registered at every slot of their teams.
#[derive(Debug, Clone, Default)]
pub struct ReverseIndex {
    num_slots: usize,
    team_slot: Vec<FamilySets>,
    team: Vec<FamilySets>,
    slot: Vec<FamilySets>,
}

impl ReverseIndex {
    pub fn build(catalog: &Catalog) -> Self {
        let num_teams = catalog.num_teams();
        let num_slots = catalog.num_slots();
        let mut cells: Vec<Cell> = vec![Cell::default(); num_teams * num_slots];
        let all_slots: Vec<usize> = (0..num_slots).collect();

        {
            let mut mark = |family: ConstraintFamily, i: usize, teams: &[usize], slots: &[usize]| {
                for &t in teams {
                    for &s in slots {
                        cells[t * num_slots + s][family.index()].insert(i);
                    }
                }
            };

            for (i, c) in catalog.ca1().iter().enumerate() {
                let slots = catalog.slot_group(c.slots);
                mark(ConstraintFamily::Ca1, i, catalog.team_group(c.teams), slots);
            }
            for (i, c) in catalog.ca2().iter().enumerate() {
                let slots = catalog.slot_group(c.slots);
                mark(ConstraintFamily::Ca2, i, catalog.team_group(c.teams1), slots);
                mark(ConstraintFamily::Ca2, i, catalog.team_group(c.teams2), slots);
            }
            for (i, c) in catalog.ca3().iter().enumerate() {
                mark(ConstraintFamily::Ca3, i, catalog.team_group(c.teams1), &all_slots);
                mark(ConstraintFamily::Ca3, i, catalog.team_group(c.teams2), &all_slots);
            }
            for (i, c) in catalog.ca4().iter().enumerate() {
                let slots = catalog.slot_group(c.slots);
                mark(ConstraintFamily::Ca4, i, catalog.team_group(c.teams1), slots);
                mark(ConstraintFamily::Ca4, i, catalog.team_group(c.teams2), slots);
            }
            for (i, c) in catalog.ga1().iter().enumerate() {
                let slots = catalog.slot_group(c.slots);
                for &(home, away) in &c.meetings {
                    mark(ConstraintFamily::Ga1, i, &[home, away], slots);
                }
            }
            for (i, c) in catalog.br1().iter().enumerate() {
                let slots = with_previous(catalog.slot_group(c.slots));
                mark(ConstraintFamily::Br1, i, catalog.team_group(c.teams), &slots);
            }
            for (i, c) in catalog.br2().iter().enumerate() {
                let slots = with_previous(catalog.slot_group(c.slots));
                mark(ConstraintFamily::Br2, i, catalog.team_group(c.teams), &slots);
            }
            for (i, c) in catalog.fa2().iter().enumerate() {
                let slots = catalog.slot_group(c.slots);
                mark(ConstraintFamily::Fa2, i, catalog.team_group(c.teams), slots);
            }
            for (i, c) in catalog.se1().iter().enumerate() {
                mark(ConstraintFamily::Se1, i, catalog.team_group(c.teams), &all_slots);
            }
        }

        let mut by_team: Vec<Cell> = vec![Cell::default(); num_teams];
        let mut by_slot: Vec<Cell> = vec![Cell::default(); num_slots];
        for t in 0..num_teams {
            for s in 0..num_slots {
                for (f, set) in cells[t * num_slots + s].iter().enumerate() {
                    by_team[t][f].extend(set.iter().copied());
                    by_slot[s][f].extend(set.iter().copied());
                }
            }
        }

        Self {
            num_slots,
            team_slot: cells.into_iter().map(FamilySets::from_sets).collect(),
            team: by_team.into_iter().map(FamilySets::from_sets).collect(),
            slot: by_slot.into_iter().map(FamilySets::from_sets).collect(),
        }
    }

    /// Constraints reading cell `(team, slot)`.
    #[inline]
    pub fn team_slot(&self, team: usize, slot: usize) -> &FamilySets {
        &self.team_slot[team * self.num_slots + slot]
    }

    /// Constraints reading any cell of `team`.
    #[inline]
    pub fn team(&self, team: usize) -> &FamilySets {
        &self.team[team]
    }

    /// Constraints reading any cell of `slot`.
    #[inline]
    pub fn slot(&self, slot: usize) -> &FamilySets {
        &self.slot[slot]
    }
}

// Each break slot `s > 0` also reads slot `s - 1`.
fn with_previous(slots: &[usize]) -> Vec<usize> {
    let mut out: BTreeSet<usize> = BTreeSet::new();
    for &s in slots {
        if s > 0 {
            out.insert(s);
            out.insert(s - 1);
        }
    }
    out.into_iter().collect()
}
