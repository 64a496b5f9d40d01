//! Full consistency check of a state against a recomputation.

use std::fmt;

use sportsched_core::ConstraintFamily;

use crate::cost::CostState;
use crate::state::ScheduleState;
use crate::timetable::{Timetable, UNSET};

/// One discrepancy found by [`check_consistency`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inconsistency {
    Unassigned {
        team: usize,
        slot: usize,
    },
    Asymmetric {
        team: usize,
        slot: usize,
        opponent: usize,
    },
    SameVenue {
        team: usize,
        slot: usize,
        opponent: usize,
    },
    MeetingCount {
        t1: usize,
        t2: usize,
        count: usize,
    },
    SameHost {
        t1: usize,
        t2: usize,
        first: usize,
        second: usize,
    },
    MatchSlot {
        host: usize,
        guest: usize,
        expected: usize,
        found: usize,
    },
    Leg {
        team: usize,
        slot: usize,
        expected: bool,
        found: bool,
    },
    Phase {
        t1: usize,
        t2: usize,
        first: usize,
        second: usize,
    },
    ConstraintCost {
        family: ConstraintFamily,
        index: usize,
        expected: i64,
        found: i64,
    },
    FamilyCost {
        family: ConstraintFamily,
        hard: bool,
        expected: i64,
        found: i64,
    },
    Aggregate {
        name: &'static str,
        expected: i64,
        found: i64,
    },
}

impl fmt::Display for Inconsistency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unassigned { team, slot } => {
                write!(f, "team {} has no game at slot {}", team, slot)
            }
            Self::Asymmetric {
                team,
                slot,
                opponent,
            } => write!(
                f,
                "team {} plays {} at slot {}, but not the other way round",
                team, opponent, slot
            ),
            Self::SameVenue {
                team,
                slot,
                opponent,
            } => write!(
                f,
                "teams {} and {} share the same venue status at slot {}",
                team, opponent, slot
            ),
            Self::MeetingCount { t1, t2, count } => {
                write!(f, "teams {} and {} meet {} times", t1, t2, count)
            }
            Self::SameHost {
                t1,
                t2,
                first,
                second,
            } => write!(
                f,
                "teams {} and {} play in the same home-away order at slots {} and {}",
                t1, t2, first, second
            ),
            Self::MatchSlot {
                host,
                guest,
                expected,
                found,
            } => write!(
                f,
                "team {} hosts {} at slot {}, meeting table says {}",
                host, guest, expected, found
            ),
            Self::Leg {
                team,
                slot,
                expected,
                found,
            } => write!(
                f,
                "leg of team {} at slot {} is {}, expected {}",
                team, slot, found, expected
            ),
            Self::Phase {
                t1,
                t2,
                first,
                second,
            } => write!(
                f,
                "teams {} and {} meet twice in the same half (slots {} and {})",
                t1, t2, first, second
            ),
            Self::ConstraintCost {
                family,
                index,
                expected,
                found,
            } => write!(
                f,
                "{} #{} costs {}, recomputed {}",
                family, index, found, expected
            ),
            Self::FamilyCost {
                family,
                hard,
                expected,
                found,
            } => write!(
                f,
                "{}{} family cost is {}, recomputed {}",
                family,
                if *hard { " hard" } else { "" },
                found,
                expected
            ),
            Self::Aggregate {
                name,
                expected,
                found,
            } => write!(f, "{} cost is {}, recomputed {}", name, found, expected),
        }
    }
}

/// Discrepancies found in a state. Empty when the state is consistent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsistencyReport {
    pub issues: Vec<Inconsistency>,
}

impl ConsistencyReport {
    pub fn is_consistent(&self) -> bool {
        self.issues.is_empty()
    }
}

impl fmt::Display for ConsistencyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.issues.is_empty() {
            return write!(f, "consistent");
        }
        writeln!(f, "{} inconsistencies:", self.issues.len())?;
        for issue in &self.issues {
            writeln!(f, "  {}", issue)?;
        }
        Ok(())
    }
}

/// Checks the structural invariants of a timetable.
///
/// Covers the round structure, the pairing, the meeting table and the legs.
/// When `check_phase` is set, also requires the two meetings of every pair
/// to fall in different halves.
pub fn check_timetable(tt: &Timetable, check_phase: bool) -> ConsistencyReport {
    let mut issues = Vec::new();
    let n = tt.num_teams();
    let half = tt.half();

    for t in 0..n {
        for s in 0..tt.num_slots() {
            let o = tt.opponent(t, s);
            if o == UNSET {
                issues.push(Inconsistency::Unassigned { team: t, slot: s });
            } else if tt.opponent(o, s) != t {
                issues.push(Inconsistency::Asymmetric {
                    team: t,
                    slot: s,
                    opponent: o,
                });
            } else if t < o && tt.is_home(t, s) == tt.is_home(o, s) {
                issues.push(Inconsistency::SameVenue {
                    team: t,
                    slot: s,
                    opponent: o,
                });
            }
        }
    }
    if !issues.is_empty() {
        return ConsistencyReport { issues };
    }

    for t1 in 0..n {
        for t2 in t1 + 1..n {
            let slots: Vec<usize> = (0..tt.num_slots())
                .filter(|&s| tt.opponent(t1, s) == t2)
                .collect();
            let &[first, second] = slots.as_slice() else {
                issues.push(Inconsistency::MeetingCount {
                    t1,
                    t2,
                    count: slots.len(),
                });
                continue;
            };
            if tt.is_home(t1, first) == tt.is_home(t1, second) {
                issues.push(Inconsistency::SameHost {
                    t1,
                    t2,
                    first,
                    second,
                });
                continue;
            }
            let (hosted, visited) = if tt.is_home(t1, first) {
                (first, second)
            } else {
                (second, first)
            };
            for (host, guest, expected) in [(t1, t2, hosted), (t2, t1, visited)] {
                let found = tt.match_slot(host, guest);
                if found != expected {
                    issues.push(Inconsistency::MatchSlot {
                        host,
                        guest,
                        expected,
                        found,
                    });
                }
            }
            if check_phase && (first < half) == (second < half) {
                issues.push(Inconsistency::Phase {
                    t1,
                    t2,
                    first,
                    second,
                });
            }
        }
    }

    for t in 0..n {
        for s in 0..tt.num_slots() {
            let expected = tt.expected_leg(t, s);
            let found = tt.is_return(t, s);
            if expected != found {
                issues.push(Inconsistency::Leg {
                    team: t,
                    slot: s,
                    expected,
                    found,
                });
            }
        }
    }

    ConsistencyReport { issues }
}

/// Checks the timetable invariants and compares every materialized cost
/// with a recomputation from scratch.
pub fn check_consistency(state: &ScheduleState) -> ConsistencyReport {
    let catalog = state.catalog();
    let check_phase = catalog.is_phased() && !state.flags().mix_phase;
    let mut report = check_timetable(state.timetable(), check_phase);

    let fresh = CostState::compute(catalog, state.timetable(), state.weights());
    let costs = state.costs();
    let issues = &mut report.issues;

    for family in ConstraintFamily::ALL {
        for index in 0..catalog.family_len(family) {
            let expected = fresh.constraint(family, index);
            let found = costs.constraint(family, index);
            if expected != found {
                issues.push(Inconsistency::ConstraintCost {
                    family,
                    index,
                    expected,
                    found,
                });
            }
        }
        for (hard, expected, found) in [
            (false, fresh.family(family), costs.family(family)),
            (true, fresh.family_hard(family), costs.family_hard(family)),
        ] {
            if expected != found {
                issues.push(Inconsistency::FamilyCost {
                    family,
                    hard,
                    expected,
                    found,
                });
            }
        }
    }
    for (name, expected, found) in [
        ("total", fresh.total(), costs.total()),
        ("hard", fresh.hard(), costs.hard()),
        ("phase", fresh.phase(), costs.phase()),
    ] {
        if expected != found {
            issues.push(Inconsistency::Aggregate {
                name,
                expected,
                found,
            });
        }
    }

    report
}
