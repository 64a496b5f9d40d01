//! The schedule and its derived matrices.

use crate::error::{Result, ScheduleError};

/// Marker for a cell or meeting that has not been assigned.
pub const UNSET: usize = usize::MAX;

/// Compact double round-robin schedule.
///
/// Stores, for `N` teams and `R = 2(N-1)` slots:
/// - `opponent(t, s)` and `is_home(t, s)` for every cell,
/// - `match_slot(host, guest)`, the slot where `host` receives `guest`,
/// - `is_return(t, s)`, whether the game at a cell is the later meeting of
///   its pair.
///
/// `is_return` is derived from `match_slot`. The mutation primitives keep
/// `match_slot` in sync with the cells they write, and the leg fix-ups
/// ([`recompute_leg`](Self::recompute_leg),
/// [`recompute_leg_and_mirror`](Self::recompute_leg_and_mirror)) must run
/// after every sequence of primitives that moves a meeting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timetable {
    num_teams: usize,
    num_slots: usize,
    opponent: Vec<usize>,
    home: Vec<bool>,
    matches: Vec<usize>,
    leg: Vec<bool>,
}

impl Timetable {
    /// Creates a timetable with every cell unassigned.
    pub fn unassigned(num_teams: usize) -> Self {
        let num_slots = 2 * num_teams.saturating_sub(1);
        Self {
            num_teams,
            num_slots,
            opponent: vec![UNSET; num_teams * num_slots],
            home: vec![false; num_teams * num_slots],
            matches: vec![UNSET; num_teams * num_teams],
            leg: vec![false; num_teams * num_slots],
        }
    }

    /// Builds a timetable from one `(opponent, is_home)` row per team.
    ///
    /// Only dimensions and opponent ranges are checked; the pairing and
    /// round structure is left to [`check_consistency`](crate::check_consistency).
    pub fn from_rows(rows: &[Vec<(usize, bool)>]) -> Result<Self> {
        let num_teams = rows.len();
        let mut timetable = Self::unassigned(num_teams);
        for (t, row) in rows.iter().enumerate() {
            if row.len() != timetable.num_slots {
                return Err(ScheduleError::SlotCount {
                    team: t,
                    expected: timetable.num_slots,
                    found: row.len(),
                });
            }
            for (s, &(opponent, home)) in row.iter().enumerate() {
                if opponent >= num_teams || opponent == t {
                    return Err(ScheduleError::InvalidOpponent {
                        team: t,
                        slot: s,
                        opponent,
                    });
                }
                timetable.set_assignment(t, s, opponent, home);
            }
        }
        timetable.refresh_legs();
        Ok(timetable)
    }

    /// Overwrites `self` with `other`, reusing the allocations.
    pub fn copy_from(&mut self, other: &Timetable) {
        self.num_teams = other.num_teams;
        self.num_slots = other.num_slots;
        self.opponent.clone_from(&other.opponent);
        self.home.clone_from(&other.home);
        self.matches.clone_from(&other.matches);
        self.leg.clone_from(&other.leg);
    }

    /// Returns one `(opponent, is_home)` row per team.
    pub fn rows(&self) -> Vec<Vec<(usize, bool)>> {
        (0..self.num_teams)
            .map(|t| {
                (0..self.num_slots)
                    .map(|s| (self.opponent(t, s), self.is_home(t, s)))
                    .collect()
            })
            .collect()
    }

    #[inline]
    pub fn num_teams(&self) -> usize {
        self.num_teams
    }

    #[inline]
    pub fn num_slots(&self) -> usize {
        self.num_slots
    }

    #[inline]
    pub fn half(&self) -> usize {
        self.num_slots / 2
    }

    #[inline]
    fn cell(&self, team: usize, slot: usize) -> usize {
        team * self.num_slots + slot
    }

    #[inline]
    pub fn opponent(&self, team: usize, slot: usize) -> usize {
        self.opponent[self.cell(team, slot)]
    }

    #[inline]
    pub fn is_home(&self, team: usize, slot: usize) -> bool {
        self.home[self.cell(team, slot)]
    }

    #[inline]
    pub fn is_assigned(&self, team: usize, slot: usize) -> bool {
        self.opponent(team, slot) != UNSET
    }

    /// Slot in which `host` receives `guest`, or [`UNSET`].
    #[inline]
    pub fn match_slot(&self, host: usize, guest: usize) -> usize {
        self.matches[host * self.num_teams + guest]
    }

    /// Returns true if the game at `(team, slot)` is the second meeting of
    /// the pair.
    #[inline]
    pub fn is_return(&self, team: usize, slot: usize) -> bool {
        self.leg[self.cell(team, slot)]
    }

    /// Writes one cell. Records the meeting slot only when `team` hosts.
    pub fn set_assignment(&mut self, team: usize, slot: usize, opponent: usize, is_home: bool) {
        let cell = self.cell(team, slot);
        self.opponent[cell] = opponent;
        self.home[cell] = is_home;
        if is_home {
            self.matches[team * self.num_teams + opponent] = slot;
        }
    }

    /// Unassigns every cell of `slot` and forgets the meetings hosted there.
    pub fn clear_slot(&mut self, slot: usize) {
        for t in 0..self.num_teams {
            let cell = self.cell(t, slot);
            let opponent = self.opponent[cell];
            if opponent != UNSET && self.home[cell] {
                let meeting = t * self.num_teams + opponent;
                if self.matches[meeting] == slot {
                    self.matches[meeting] = UNSET;
                }
            }
            self.opponent[cell] = UNSET;
            self.home[cell] = false;
            self.leg[cell] = false;
        }
    }

    /// Exchanges the games of `t1` and `t2` at `slot`.
    ///
    /// With `o1`, `o2` the current opponents, `t1` takes over the game
    /// against `o2` and `t2` the game against `o1`. Each team inherits the
    /// home status of the game it takes over, negated when its flip flag is
    /// set. When `t1` and `t2` meet at `slot` the two teams exchange their
    /// home status instead.
    ///
    /// Legs are not touched.
    pub fn swap_opponents_at_slot(
        &mut self,
        t1: usize,
        t2: usize,
        slot: usize,
        flip1: bool,
        flip2: bool,
    ) {
        let o1 = self.opponent(t1, slot);
        let o2 = self.opponent(t2, slot);
        let h1 = self.is_home(t1, slot);
        let h2 = self.is_home(t2, slot);

        if o1 == t2 {
            self.set_assignment(t1, slot, t2, h2);
            self.set_assignment(t2, slot, t1, h1);
            return;
        }

        let home1 = h2 ^ flip1;
        let home2 = h1 ^ flip2;
        self.set_assignment(t1, slot, o2, home1);
        self.set_assignment(o2, slot, t1, !home1);
        self.set_assignment(t2, slot, o1, home2);
        self.set_assignment(o1, slot, t2, !home2);
    }

    /// Leg of the game at `(team, slot)` as implied by the meeting slots.
    pub fn expected_leg(&self, team: usize, slot: usize) -> bool {
        let opponent = self.opponent(team, slot);
        if opponent == UNSET {
            return false;
        }
        let hosted = self.match_slot(team, opponent);
        let visited = self.match_slot(opponent, team);
        if self.is_home(team, slot) {
            hosted > visited
        } else {
            visited > hosted
        }
    }

    pub fn recompute_leg(&mut self, team: usize, slot: usize) {
        let leg = self.expected_leg(team, slot);
        let cell = self.cell(team, slot);
        self.leg[cell] = leg;
    }

    /// Recomputes the legs of both sides of the game at `(team, slot)` and
    /// of the other meeting of the same pair.
    pub fn recompute_leg_and_mirror(&mut self, team: usize, slot: usize) {
        let opponent = self.opponent(team, slot);
        if opponent == UNSET {
            return;
        }
        self.recompute_leg(team, slot);
        self.recompute_leg(opponent, slot);

        let mirror = if self.is_home(team, slot) {
            self.match_slot(opponent, team)
        } else {
            self.match_slot(team, opponent)
        };
        if mirror < self.num_slots {
            self.recompute_leg(team, mirror);
            self.recompute_leg(opponent, mirror);
        }
    }

    /// Recomputes every leg.
    pub fn refresh_legs(&mut self) {
        for t in 0..self.num_teams {
            for s in 0..self.num_slots {
                self.recompute_leg(t, s);
            }
        }
    }

    /// Reverses home and away in both meetings of `t1` and `t2`.
    pub fn swap_homes(&mut self, t1: usize, t2: usize) {
        let r1 = self.match_slot(t1, t2);
        let r2 = self.match_slot(t2, t1);
        self.set_assignment(t1, r1, t2, false);
        self.set_assignment(t1, r2, t2, true);
        self.set_assignment(t2, r1, t1, true);
        self.set_assignment(t2, r2, t1, false);
        self.recompute_leg_and_mirror(t1, r1);
    }

    /// Exchanges the complete rounds played in `r1` and `r2`.
    pub fn swap_slots(&mut self, r1: usize, r2: usize) {
        for t in 0..self.num_teams {
            let (a, b) = (self.cell(t, r1), self.cell(t, r2));
            self.opponent.swap(a, b);
            self.home.swap(a, b);
        }
        for t in 0..self.num_teams {
            for r in [r1, r2] {
                if self.is_home(t, r) {
                    let opponent = self.opponent(t, r);
                    self.matches[t * self.num_teams + opponent] = r;
                }
            }
        }
        for t in 0..self.num_teams {
            self.recompute_leg_and_mirror(t, r1);
            self.recompute_leg_and_mirror(t, r2);
        }
    }
}

#[cfg(test)]
#[path = "timetable_tests.rs"]
mod tests;
