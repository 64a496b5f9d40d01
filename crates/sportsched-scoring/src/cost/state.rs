//! Materialized costs of a timetable.

use sportsched_core::{Catalog, ConstraintFamily};

use super::{constraint_cost, phase};
use crate::affected::AffectedConstraints;
use crate::timetable::Timetable;
use crate::weights::Weights;

/// Per-constraint costs plus per-family and global aggregates.
///
/// `components` sums every constraint, `components_hard` the hard ones.
/// The phase cost is kept apart and only enters [`total`](Self::total).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CostState {
    constraint: [Vec<i64>; ConstraintFamily::COUNT],
    family: [i64; ConstraintFamily::COUNT],
    family_hard: [i64; ConstraintFamily::COUNT],
    components: i64,
    components_hard: i64,
    phase: i64,
}

impl CostState {
    /// Computes every cost from scratch.
    pub fn compute(catalog: &Catalog, tt: &Timetable, weights: &Weights) -> Self {
        let mut state = Self::default();
        for family in ConstraintFamily::ALL {
            state.constraint[family.index()] = vec![0; catalog.family_len(family)];
            state.recompute_family(catalog, tt, weights, family);
            state.components += state.family[family.index()];
            state.components_hard += state.family_hard[family.index()];
        }
        state.phase = phase::cost(catalog, tt, weights.phased);
        state
    }

    /// Recomputes the listed constraints and applies the deltas to the
    /// aggregates. FA2 and the phase cost are always recomputed in full.
    pub fn update(
        &mut self,
        catalog: &Catalog,
        tt: &Timetable,
        weights: &Weights,
        affected: &AffectedConstraints,
    ) {
        for family in ConstraintFamily::ALL {
            let f = family.index();
            if family == ConstraintFamily::Fa2 {
                self.components -= self.family[f];
                self.components_hard -= self.family_hard[f];
                self.recompute_family(catalog, tt, weights, family);
                self.components += self.family[f];
                self.components_hard += self.family_hard[f];
                continue;
            }

            let mut delta = 0;
            let mut delta_hard = 0;
            for &index in affected.get(family) {
                let new_cost = constraint_cost(catalog, tt, weights, family, index);
                let change = new_cost - self.constraint[f][index];
                delta += change;
                if catalog.severity(family, index).hard {
                    delta_hard += change;
                }
                self.constraint[f][index] = new_cost;
            }
            self.family[f] += delta;
            self.family_hard[f] += delta_hard;
            self.components += delta;
            self.components_hard += delta_hard;
        }
        self.phase = phase::cost(catalog, tt, weights.phased);
    }

    fn recompute_family(
        &mut self,
        catalog: &Catalog,
        tt: &Timetable,
        weights: &Weights,
        family: ConstraintFamily,
    ) {
        let f = family.index();
        let mut all = 0;
        let mut hard = 0;
        for index in 0..catalog.family_len(family) {
            let cost = constraint_cost(catalog, tt, weights, family, index);
            self.constraint[f][index] = cost;
            all += cost;
            if catalog.severity(family, index).hard {
                hard += cost;
            }
        }
        self.family[f] = all;
        self.family_hard[f] = hard;
    }

    /// Overwrites `self` with `other`, reusing the allocations.
    pub fn copy_from(&mut self, other: &CostState) {
        for (mine, theirs) in self.constraint.iter_mut().zip(&other.constraint) {
            mine.clone_from(theirs);
        }
        self.family = other.family;
        self.family_hard = other.family_hard;
        self.components = other.components;
        self.components_hard = other.components_hard;
        self.phase = other.phase;
    }

    /// Constraint costs plus the phase cost.
    #[inline]
    pub fn total(&self) -> i64 {
        self.components + self.phase
    }

    /// Cost of the hard constraints.
    #[inline]
    pub fn hard(&self) -> i64 {
        self.components_hard
    }

    #[inline]
    pub fn phase(&self) -> i64 {
        self.phase
    }

    /// Cost of every constraint, without the phase cost.
    #[inline]
    pub fn components(&self) -> i64 {
        self.components
    }

    pub fn family(&self, family: ConstraintFamily) -> i64 {
        self.family[family.index()]
    }

    pub fn family_hard(&self, family: ConstraintFamily) -> i64 {
        self.family_hard[family.index()]
    }

    pub fn constraint(&self, family: ConstraintFamily, index: usize) -> i64 {
        self.constraint[family.index()][index]
    }
}
