//! Interned team and slot groups.

use std::collections::HashMap;

/// Table of deduplicated, sorted index groups.
///
/// Interning the same member set twice returns the same group index, so
/// constraints referring to identical groups share one physical copy.
///
/// # Example
///
/// ```
/// use sportsched_core::GroupTable;
///
/// let mut groups = GroupTable::default();
/// let a = groups.intern([3, 1, 1, 2]);
/// let b = groups.intern([1, 2, 3]);
///
/// assert_eq!(a, b);
/// assert_eq!(groups.get(a), &[1, 2, 3]);
/// assert_eq!(groups.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct GroupTable {
    groups: Vec<Vec<usize>>,
    lookup: HashMap<Vec<usize>, usize>,
}

impl GroupTable {
    /// Interns a member set and returns its group index.
    pub fn intern(&mut self, members: impl IntoIterator<Item = usize>) -> usize {
        let mut members: Vec<usize> = members.into_iter().collect();
        members.sort_unstable();
        members.dedup();
        if let Some(&index) = self.lookup.get(&members) {
            return index;
        }
        let index = self.groups.len();
        self.lookup.insert(members.clone(), index);
        self.groups.push(members);
        index
    }

    /// Returns the members of a group.
    ///
    /// # Panics
    ///
    /// Panics if `index` was not returned by [`intern`](Self::intern).
    pub fn get(&self, index: usize) -> &[usize] {
        &self.groups[index]
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &[usize]> {
        self.groups.iter().map(Vec::as_slice)
    }
}
