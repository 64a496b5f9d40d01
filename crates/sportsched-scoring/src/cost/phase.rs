//! Phase violations.

use sportsched_core::Catalog;

use crate::timetable::Timetable;

/// Number of pairs whose two meetings fall in the same half.
///
/// Always zero for instances that are not phased.
pub fn violations(catalog: &Catalog, tt: &Timetable) -> i64 {
    if !catalog.is_phased() {
        return 0;
    }
    let n = tt.num_teams();
    let mut count = 0;
    for i in 0..n {
        for j in i + 1..n {
            if catalog.same_phase(tt.match_slot(i, j), tt.match_slot(j, i)) {
                count += 1;
            }
        }
    }
    count
}

/// Phase cost; each violating pair counts twice.
pub fn cost(catalog: &Catalog, tt: &Timetable, phased_weight: i64) -> i64 {
    2 * phased_weight * violations(catalog, tt)
}
