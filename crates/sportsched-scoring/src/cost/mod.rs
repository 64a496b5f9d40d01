//! Exact per-constraint cost functions and the materialized cost state.
//!
//! Every family function returns the raw violation of one constraint
//! instance; [`constraint_cost`] applies the [`Weights`].

pub mod breaks;
pub mod capacity;
pub mod estimate;
pub mod fairness;
pub mod game;
pub mod phase;
pub mod separation;

mod state;


pub use estimate::prefix_estimate;
pub use state::CostState;

use sportsched_core::{Catalog, ConstraintFamily};

use crate::timetable::Timetable;
use crate::weights::Weights;

/// Raw violation of constraint `index` of `family`.
pub fn violation(catalog: &Catalog, tt: &Timetable, family: ConstraintFamily, index: usize) -> i64 {
    match family {
        ConstraintFamily::Ca1 => capacity::ca1(catalog, tt, &catalog.ca1()[index]),
        ConstraintFamily::Ca2 => capacity::ca2(catalog, tt, &catalog.ca2()[index]),
        ConstraintFamily::Ca3 => capacity::ca3(catalog, tt, &catalog.ca3()[index]),
        ConstraintFamily::Ca4 => capacity::ca4(catalog, tt, &catalog.ca4()[index]),
        ConstraintFamily::Ga1 => game::ga1(catalog, tt, &catalog.ga1()[index]),
        ConstraintFamily::Br1 => breaks::br1(catalog, tt, &catalog.br1()[index]),
        ConstraintFamily::Br2 => breaks::br2(catalog, tt, &catalog.br2()[index]),
        ConstraintFamily::Fa2 => fairness::fa2(catalog, tt, &catalog.fa2()[index]),
        ConstraintFamily::Se1 => separation::se1(catalog, tt, &catalog.se1()[index]),
    }
}

/// Weighted cost of constraint `index` of `family`.
#[inline]
pub fn constraint_cost(
    catalog: &Catalog,
    tt: &Timetable,
    weights: &Weights,
    family: ConstraintFamily,
    index: usize,
) -> i64 {
    weights.scale(family, catalog.severity(family, index)) * violation(catalog, tt, family, index)
}

/// Distance of `value` from the range `[min, max]`.
#[inline]
pub(crate) fn outside(value: i64, min: i64, max: i64) -> i64 {
    (min - value).max(value - max).max(0)
}
