//! Constraint instances touched by a move.

use std::collections::BTreeSet;

use sportsched_core::{ConstraintFamily, FamilySets};

/// Deduplicated set of constraint indices per family.
///
/// # Example
///
/// ```
/// use sportsched_core::ConstraintFamily;
/// use sportsched_scoring::AffectedConstraints;
///
/// let mut affected = AffectedConstraints::new();
/// affected.insert(ConstraintFamily::Br1, 3);
/// affected.insert(ConstraintFamily::Br1, 1);
/// affected.insert(ConstraintFamily::Br1, 3);
///
/// assert_eq!(affected.get(ConstraintFamily::Br1).collect::<Vec<_>>(), vec![&1, &3]);
/// assert_eq!(affected.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AffectedConstraints {
    sets: [BTreeSet<usize>; ConstraintFamily::COUNT],
}

impl AffectedConstraints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, family: ConstraintFamily, index: usize) {
        self.sets[family.index()].insert(index);
    }

    /// Adds every index of a reverse-index entry.
    pub fn extend(&mut self, sets: &FamilySets) {
        for (family, indices) in sets.iter() {
            self.sets[family.index()].extend(indices.iter().copied());
        }
    }

    pub fn get(&self, family: ConstraintFamily) -> impl Iterator<Item = &usize> {
        self.sets[family.index()].iter()
    }

    pub fn len(&self) -> usize {
        self.sets.iter().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.iter().all(BTreeSet::is_empty)
    }

    pub fn clear(&mut self) {
        for set in &mut self.sets {
            set.clear();
        }
    }
}
