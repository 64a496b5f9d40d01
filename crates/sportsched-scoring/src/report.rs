//! Listing of violated constraints.

use std::fmt;

use sportsched_core::{Catalog, ConstraintFamily};

use crate::cost;
use crate::state::ScheduleState;

/// A constraint instance with a positive violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub family: ConstraintFamily,
    pub index: usize,
    pub hard: bool,
    /// Unweighted amount of violation.
    pub amount: i64,
    /// Weighted cost under the state's weights.
    pub cost: i64,
    /// For phased instances, whether the constraint's slots span both
    /// halves. `None` when it does not apply.
    pub both_phases: Option<bool>,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{} #{}: violation {} (cost {})",
            self.family,
            if self.hard { "*" } else { "" },
            self.index,
            self.amount,
            self.cost
        )?;
        if let Some(both) = self.both_phases {
            write!(f, " across both phases: {}", if both { "yes" } else { "no" })?;
        }
        Ok(())
    }
}

fn slot_group(catalog: &Catalog, family: ConstraintFamily, index: usize) -> Option<usize> {
    match family {
        ConstraintFamily::Ca1 => Some(catalog.ca1()[index].slots),
        ConstraintFamily::Ca2 => Some(catalog.ca2()[index].slots),
        ConstraintFamily::Ca4 => Some(catalog.ca4()[index].slots),
        ConstraintFamily::Ga1 => Some(catalog.ga1()[index].slots),
        ConstraintFamily::Br1 => Some(catalog.br1()[index].slots),
        ConstraintFamily::Br2 => Some(catalog.br2()[index].slots),
        ConstraintFamily::Fa2 => Some(catalog.fa2()[index].slots),
        ConstraintFamily::Ca3 | ConstraintFamily::Se1 => None,
    }
}

/// Lists every violated constraint, hard ones first, in catalog order.
pub fn violations(state: &ScheduleState) -> Vec<Violation> {
    let catalog = state.catalog();
    let mut out = Vec::new();
    for family in ConstraintFamily::ALL {
        for index in 0..catalog.family_len(family) {
            let amount = cost::violation(catalog, state.timetable(), family, index);
            if amount == 0 {
                continue;
            }
            let severity = catalog.severity(family, index);
            let both_phases = slot_group(catalog, family, index)
                .filter(|_| catalog.is_phased())
                .map(|group| catalog.spans_both_phases(group));
            out.push(Violation {
                family,
                index,
                hard: severity.hard,
                amount,
                cost: state.weights().scale(family, severity) * amount,
                both_phases,
            });
        }
    }
    out.sort_by_key(|v| !v.hard);
    out
}
