//! Timetable with materialized costs.

use std::sync::Arc;

use sportsched_core::{Catalog, ConstraintFamily};

use crate::affected::AffectedConstraints;
use crate::cost::{self, CostState};
use crate::error::{Result, ScheduleError};
use crate::timetable::Timetable;
use crate::weights::{SearchFlags, Weights};

/// A timetable bound to a catalog, its weights, its search flags and its
/// current costs.
///
/// Costs are kept in sync by the callers that mutate the timetable: after
/// a sequence of primitives on [`timetable_mut`](Self::timetable_mut), call
/// [`update_costs`](Self::update_costs) with every touched constraint or
/// [`full_recompute`](Self::full_recompute).
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use sportsched_core::CatalogBuilder;
/// use sportsched_scoring::{ScheduleState, SearchFlags, Timetable, Weights};
///
/// let catalog = Arc::new(CatalogBuilder::anonymous(2).with_phased(true).build().unwrap());
/// let timetable: Timetable = "+1 -1\n-0 +0\n".parse().unwrap();
/// let state = ScheduleState::new(catalog, timetable, Weights::default(), SearchFlags::default()).unwrap();
///
/// assert_eq!(state.total_cost(), 0);
/// assert!(state.zero_hard_reached());
/// ```
#[derive(Debug, Clone)]
pub struct ScheduleState {
    catalog: Arc<Catalog>,
    timetable: Timetable,
    weights: Weights,
    flags: SearchFlags,
    costs: CostState,
}

impl ScheduleState {
    /// Binds a timetable to a catalog and computes its costs.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::TeamCount`] if the dimensions differ.
    pub fn new(
        catalog: Arc<Catalog>,
        timetable: Timetable,
        weights: Weights,
        flags: SearchFlags,
    ) -> Result<Self> {
        if timetable.num_teams() != catalog.num_teams() {
            return Err(ScheduleError::TeamCount {
                expected: catalog.num_teams(),
                found: timetable.num_teams(),
            });
        }
        let costs = CostState::compute(&catalog, &timetable, &weights);
        Ok(Self {
            catalog,
            timetable,
            weights,
            flags,
            costs,
        })
    }

    /// Overwrites `self` with `other` without reallocating the schedule or
    /// the cost vectors. Used for scratch states on the move path.
    pub fn copy_from(&mut self, other: &ScheduleState) {
        if !Arc::ptr_eq(&self.catalog, &other.catalog) {
            self.catalog = Arc::clone(&other.catalog);
        }
        self.timetable.copy_from(&other.timetable);
        self.weights = other.weights;
        self.flags = other.flags;
        self.costs.copy_from(&other.costs);
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn shared_catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn timetable(&self) -> &Timetable {
        &self.timetable
    }

    /// Mutable access to the schedule. Costs are stale until updated.
    pub fn timetable_mut(&mut self) -> &mut Timetable {
        &mut self.timetable
    }

    /// Replaces the schedule and recomputes every cost.
    pub fn replace_timetable(&mut self, timetable: Timetable) -> Result<()> {
        if timetable.num_teams() != self.catalog.num_teams() {
            return Err(ScheduleError::TeamCount {
                expected: self.catalog.num_teams(),
                found: timetable.num_teams(),
            });
        }
        self.timetable = timetable;
        self.full_recompute();
        Ok(())
    }

    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    /// Changes the weights and recomputes every cost.
    pub fn set_weights(&mut self, weights: Weights) {
        self.weights = weights;
        self.full_recompute();
    }

    pub fn flags(&self) -> SearchFlags {
        self.flags
    }

    pub fn set_flags(&mut self, flags: SearchFlags) {
        self.flags = flags;
    }

    pub fn costs(&self) -> &CostState {
        &self.costs
    }

    /// Recomputes every cost from the schedule and returns the total.
    pub fn full_recompute(&mut self) -> i64 {
        self.costs = CostState::compute(&self.catalog, &self.timetable, &self.weights);
        self.costs.total()
    }

    /// Recomputes the touched constraints, FA2 and the phase cost.
    pub fn update_costs(&mut self, affected: &AffectedConstraints) {
        self.costs
            .update(&self.catalog, &self.timetable, &self.weights, affected);
    }

    #[inline]
    pub fn total_cost(&self) -> i64 {
        self.costs.total()
    }

    #[inline]
    pub fn hard_cost(&self) -> i64 {
        self.costs.hard()
    }

    #[inline]
    pub fn phase_cost(&self) -> i64 {
        self.costs.phase()
    }

    pub fn family_cost(&self, family: ConstraintFamily) -> i64 {
        self.costs.family(family)
    }

    pub fn family_hard_cost(&self, family: ConstraintFamily) -> i64 {
        self.costs.family_hard(family)
    }

    pub fn constraint_cost(&self, family: ConstraintFamily, index: usize) -> i64 {
        self.costs.constraint(family, index)
    }

    /// Evaluates every hard constraint on the current schedule, ignoring
    /// the materialized costs.
    pub fn hard_constraints_hold(&self) -> bool {
        ConstraintFamily::ALL.into_iter().all(|family| {
            self.catalog.hard_indices(family).iter().all(|&index| {
                cost::constraint_cost(&self.catalog, &self.timetable, &self.weights, family, index)
                    == 0
            })
        })
    }

    /// Returns true if hard and phase costs are both zero.
    pub fn zero_hard_reached(&self) -> bool {
        self.costs.hard() == 0 && self.costs.phase() == 0
    }
}
