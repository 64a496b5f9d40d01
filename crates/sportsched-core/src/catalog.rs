//! The immutable constraint catalog and its builder.

use crate::constraint::{
    Br1, Br2, Ca1, Ca2, Ca3, Ca4, ConstraintDef, ConstraintFamily, Fa2, Ga1, Se1, Severity,
};
use crate::error::{CatalogError, Result};
use crate::group::GroupTable;
use crate::index::{FamilySets, ReverseIndex};
use crate::resource::{Slot, Team};

/// Read-only description of a compact double round-robin instance.
///
/// Built once by [`CatalogBuilder`] (or the XML loader) and shared by every
/// timetable state of a run. Constraint indices are positions inside the
/// per-family vectors.
#[derive(Debug, Clone)]
pub struct Catalog {
    name: String,
    league: String,
    teams: Vec<Team>,
    slots: Vec<Slot>,
    phased: bool,
    team_groups: GroupTable,
    slot_groups: GroupTable,
    ca1: Vec<Ca1>,
    ca2: Vec<Ca2>,
    ca3: Vec<Ca3>,
    ca4: Vec<Ca4>,
    ga1: Vec<Ga1>,
    br1: Vec<Br1>,
    br2: Vec<Br2>,
    fa2: Vec<Fa2>,
    se1: Vec<Se1>,
    hard_indices: FamilySets,
    index: ReverseIndex,
}

impl Catalog {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn league(&self) -> &str {
        &self.league
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    #[inline]
    pub fn num_teams(&self) -> usize {
        self.teams.len()
    }

    #[inline]
    pub fn num_slots(&self) -> usize {
        self.slots.len()
    }

    /// Number of slots in each half of the calendar.
    #[inline]
    pub fn half(&self) -> usize {
        self.slots.len() / 2
    }

    /// Returns true if the instance requires the two legs of every pair in
    /// different halves.
    pub fn is_phased(&self) -> bool {
        self.phased
    }

    /// Returns true if both slots lie in the same half of the calendar.
    #[inline]
    pub fn same_phase(&self, s1: usize, s2: usize) -> bool {
        let half = self.half();
        (s1 < half) == (s2 < half)
    }

    /// Returns true if a slot group has members in both halves.
    pub fn spans_both_phases(&self, slot_group: usize) -> bool {
        let slots = self.slot_groups.get(slot_group);
        slots.windows(2).any(|w| !self.same_phase(w[0], w[1]))
    }

    pub fn team_group(&self, group: usize) -> &[usize] {
        self.team_groups.get(group)
    }

    pub fn slot_group(&self, group: usize) -> &[usize] {
        self.slot_groups.get(group)
    }

    pub fn team_groups(&self) -> &GroupTable {
        &self.team_groups
    }

    pub fn slot_groups(&self) -> &GroupTable {
        &self.slot_groups
    }

    pub fn ca1(&self) -> &[Ca1] {
        &self.ca1
    }

    pub fn ca2(&self) -> &[Ca2] {
        &self.ca2
    }

    pub fn ca3(&self) -> &[Ca3] {
        &self.ca3
    }

    pub fn ca4(&self) -> &[Ca4] {
        &self.ca4
    }

    pub fn ga1(&self) -> &[Ga1] {
        &self.ga1
    }

    pub fn br1(&self) -> &[Br1] {
        &self.br1
    }

    pub fn br2(&self) -> &[Br2] {
        &self.br2
    }

    pub fn fa2(&self) -> &[Fa2] {
        &self.fa2
    }

    pub fn se1(&self) -> &[Se1] {
        &self.se1
    }

    /// Number of constraints of a family.
    pub fn family_len(&self, family: ConstraintFamily) -> usize {
        match family {
            ConstraintFamily::Ca1 => self.ca1.len(),
            ConstraintFamily::Ca2 => self.ca2.len(),
            ConstraintFamily::Ca3 => self.ca3.len(),
            ConstraintFamily::Ca4 => self.ca4.len(),
            ConstraintFamily::Ga1 => self.ga1.len(),
            ConstraintFamily::Br1 => self.br1.len(),
            ConstraintFamily::Br2 => self.br2.len(),
            ConstraintFamily::Fa2 => self.fa2.len(),
            ConstraintFamily::Se1 => self.se1.len(),
        }
    }

    /// Total number of constraints over all families.
    pub fn constraint_count(&self) -> usize {
        ConstraintFamily::ALL
            .iter()
            .map(|&family| self.family_len(family))
            .sum()
    }

    pub fn severity(&self, family: ConstraintFamily, index: usize) -> Severity {
        match family {
            ConstraintFamily::Ca1 => self.ca1[index].severity,
            ConstraintFamily::Ca2 => self.ca2[index].severity,
            ConstraintFamily::Ca3 => self.ca3[index].severity,
            ConstraintFamily::Ca4 => self.ca4[index].severity,
            ConstraintFamily::Ga1 => self.ga1[index].severity,
            ConstraintFamily::Br1 => self.br1[index].severity,
            ConstraintFamily::Br2 => self.br2[index].severity,
            ConstraintFamily::Fa2 => self.fa2[index].severity,
            ConstraintFamily::Se1 => self.se1[index].severity,
        }
    }

    /// Indices of the hard constraints of a family.
    pub fn hard_indices(&self, family: ConstraintFamily) -> &[usize] {
        &self.hard_indices[family]
    }

    pub fn hard_count(&self) -> usize {
        self.hard_indices.total_len()
    }

    pub fn index(&self) -> &ReverseIndex {
        &self.index
    }

    pub fn team_index(&self, id: &str) -> Option<usize> {
        self.teams.iter().position(|t| t.id == id)
    }

    pub fn slot_index(&self, id: &str) -> Option<usize> {
        self.slots.iter().position(|s| s.id == id)
    }

    /// Returns a copy of the catalog restricted to its hard constraints.
    pub fn hard_subset(&self) -> Catalog {
        fn hard<T: Clone>(items: &[T], severity: impl Fn(&T) -> Severity) -> Vec<T> {
            items.iter().filter(|c| severity(c).hard).cloned().collect()
        }

        let mut catalog = Catalog {
            name: self.name.clone(),
            league: self.league.clone(),
            teams: self.teams.clone(),
            slots: self.slots.clone(),
            phased: self.phased,
            team_groups: self.team_groups.clone(),
            slot_groups: self.slot_groups.clone(),
            ca1: hard(&self.ca1, |c| c.severity),
            ca2: hard(&self.ca2, |c| c.severity),
            ca3: hard(&self.ca3, |c| c.severity),
            ca4: hard(&self.ca4, |c| c.severity),
            ga1: hard(&self.ga1, |c| c.severity),
            br1: hard(&self.br1, |c| c.severity),
            br2: hard(&self.br2, |c| c.severity),
            fa2: hard(&self.fa2, |c| c.severity),
            se1: hard(&self.se1, |c| c.severity),
            hard_indices: FamilySets::default(),
            index: ReverseIndex::default(),
        };
        catalog.finish();
        catalog
    }

    // Derives the hard index lists and the reverse index from the families.
    fn finish(&mut self) {
        let mut hard_indices = FamilySets::default();
        for family in ConstraintFamily::ALL {
            hard_indices[family] = (0..self.family_len(family))
                .filter(|&i| self.severity(family, i).hard)
                .collect();
        }
        self.hard_indices = hard_indices;
        self.index = ReverseIndex::build(self);
    }
}

/// Builder validating constraint definitions into a [`Catalog`].
///
/// # Example
///
/// ```
/// use sportsched_core::{CatalogBuilder, ConstraintDef, HomeMode, Severity};
///
/// let catalog = CatalogBuilder::anonymous(4)
///     .with_phased(true)
///     .with_constraint(ConstraintDef::Ca1 {
///         teams: vec![0],
///         slots: vec![0, 1],
///         k_min: None,
///         k_max: Some(1),
///         mode: HomeMode::Home,
///         severity: Severity::hard(1),
///     })
///     .build()
///     .unwrap();
///
/// assert_eq!(catalog.num_slots(), 6);
/// assert_eq!(catalog.ca1().len(), 1);
/// assert_eq!(catalog.hard_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CatalogBuilder {
    name: String,
    league: String,
    teams: Vec<Team>,
    slots: Vec<Slot>,
    phased: bool,
    only_hard: bool,
    constraints: Vec<ConstraintDef>,
}

impl CatalogBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Creates a builder with `num_teams` teams and the matching number of
    /// compact slots, identified by their indices.
    pub fn anonymous(num_teams: usize) -> Self {
        let num_slots = 2 * num_teams.saturating_sub(1);
        Self::new(format!("anonymous-{}", num_teams))
            .with_teams((0..num_teams).map(|t| Team::new(t.to_string(), format!("Team{}", t))))
            .with_slots((0..num_slots).map(|s| Slot::new(s.to_string(), format!("Slot{}", s))))
    }

    pub fn with_league(mut self, league: impl Into<String>) -> Self {
        self.league = league.into();
        self
    }

    pub fn with_teams(mut self, teams: impl IntoIterator<Item = Team>) -> Self {
        self.teams.extend(teams);
        self
    }

    pub fn with_slots(mut self, slots: impl IntoIterator<Item = Slot>) -> Self {
        self.slots.extend(slots);
        self
    }

    pub fn with_phased(mut self, phased: bool) -> Self {
        self.phased = phased;
        self
    }

    /// Drops soft constraints at build time.
    pub fn with_only_hard(mut self, only_hard: bool) -> Self {
        self.only_hard = only_hard;
        self
    }

    pub fn with_constraint(mut self, constraint: ConstraintDef) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn add_constraint(&mut self, constraint: ConstraintDef) {
        self.constraints.push(constraint);
    }

    /// Validates every definition and builds the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Structure`] for an odd team count or a slot
    /// count that is not `2(N-1)`, and [`CatalogError::InvalidConstraint`]
    /// for out-of-range members or inconsistent bounds.
    pub fn build(self) -> Result<Catalog> {
        let num_teams = self.teams.len();
        let num_slots = self.slots.len();
        if num_teams < 2 || num_teams % 2 != 0 {
            return Err(CatalogError::Structure(format!(
                "expected an even number of teams (at least 2), found {}",
                num_teams
            )));
        }
        if num_slots != 2 * (num_teams - 1) {
            return Err(CatalogError::Structure(format!(
                "a compact double round robin of {} teams needs {} slots, found {}",
                num_teams,
                2 * (num_teams - 1),
                num_slots
            )));
        }

        let mut catalog = Catalog {
            name: self.name,
            league: self.league,
            teams: self.teams,
            slots: self.slots,
            phased: self.phased,
            team_groups: GroupTable::default(),
            slot_groups: GroupTable::default(),
            ca1: Vec::new(),
            ca2: Vec::new(),
            ca3: Vec::new(),
            ca4: Vec::new(),
            ga1: Vec::new(),
            br1: Vec::new(),
            br2: Vec::new(),
            fa2: Vec::new(),
            se1: Vec::new(),
            hard_indices: FamilySets::default(),
            index: ReverseIndex::default(),
        };

        let mut seen = [0usize; ConstraintFamily::COUNT];
        for def in self.constraints {
            let family = def.family();
            let position = seen[family.index()];
            seen[family.index()] += 1;
            let check = Checker {
                family,
                position,
                num_teams,
                num_slots,
            };
            check.severity(def.severity())?;
            if self.only_hard && !def.severity().hard {
                continue;
            }
            catalog.insert(def, &check)?;
        }

        catalog.finish();
        Ok(catalog)
    }
}

impl Catalog {
    fn insert(&mut self, def: ConstraintDef, check: &Checker) -> Result<()> {
        match def {
            ConstraintDef::Ca1 {
                teams,
                slots,
                k_min,
                k_max,
                mode,
                severity,
            } => {
                check.teams(&teams)?;
                check.slots(&slots)?;
                let (k_min, k_max) = check.bounds(k_min, k_max, UNBOUNDED)?;
                let teams = self.team_groups.intern(teams);
                let slots = self.slot_groups.intern(slots);
                self.ca1.push(Ca1 {
                    teams,
                    slots,
                    k_min,
                    k_max,
                    mode,
                    severity,
                });
            }
            ConstraintDef::Ca2 {
                teams1,
                teams2,
                slots,
                k_min,
                k_max,
                mode,
                severity,
            } => {
                check.teams(&teams1)?;
                check.teams(&teams2)?;
                check.slots(&slots)?;
                let (k_min, k_max) = check.bounds(k_min, k_max, UNBOUNDED)?;
                let teams1 = self.team_groups.intern(teams1);
                let teams2 = self.team_groups.intern(teams2);
                let slots = self.slot_groups.intern(slots);
                self.ca2.push(Ca2 {
                    teams1,
                    teams2,
                    slots,
                    k_min,
                    k_max,
                    mode,
                    severity,
                });
            }
            ConstraintDef::Ca3 {
                teams1,
                teams2,
                window,
                k_min,
                k_max,
                mode,
                severity,
            } => {
                check.teams(&teams1)?;
                check.teams(&teams2)?;
                if window == 0 || window > check.num_slots {
                    return Err(check.invalid(format!(
                        "window of {} slots outside 1..={}",
                        window, check.num_slots
                    )));
                }
                let (k_min, k_max) = check.bounds(k_min, k_max, UNBOUNDED)?;
                let teams1 = self.team_groups.intern(teams1);
                let teams2 = self.team_groups.intern(teams2);
                self.ca3.push(Ca3 {
                    teams1,
                    teams2,
                    window,
                    k_min,
                    k_max,
                    mode,
                    severity,
                });
            }
            ConstraintDef::Ca4 {
                teams1,
                teams2,
                slots,
                k_min,
                k_max,
                mode,
                scope,
                severity,
            } => {
                check.teams(&teams1)?;
                check.teams(&teams2)?;
                check.slots(&slots)?;
                let (k_min, k_max) = check.bounds(k_min, k_max, UNBOUNDED)?;
                let teams1 = self.team_groups.intern(teams1);
                let teams2 = self.team_groups.intern(teams2);
                let slots = self.slot_groups.intern(slots);
                self.ca4.push(Ca4 {
                    teams1,
                    teams2,
                    slots,
                    k_min,
                    k_max,
                    mode,
                    scope,
                    severity,
                });
            }
            ConstraintDef::Ga1 {
                mut meetings,
                slots,
                k_min,
                k_max,
                severity,
            } => {
                for &(home, away) in &meetings {
                    check.teams(&[home, away])?;
                    if home == away {
                        return Err(check.invalid(format!("team {} meets itself", home)));
                    }
                }
                check.slots(&slots)?;
                let (k_min, k_max) = check.bounds(k_min, k_max, UNBOUNDED)?;
                meetings.sort_unstable();
                meetings.dedup();
                let slots = self.slot_groups.intern(slots);
                self.ga1.push(Ga1 {
                    meetings,
                    slots,
                    k_min,
                    k_max,
                    severity,
                });
            }
            ConstraintDef::Br1 {
                teams,
                slots,
                k,
                mode,
                severity,
            } => {
                check.teams(&teams)?;
                check.slots(&slots)?;
                check.limit(k)?;
                let teams = self.team_groups.intern(teams);
                let slots = self.slot_groups.intern(slots);
                self.br1.push(Br1 {
                    teams,
                    slots,
                    k,
                    mode,
                    severity,
                });
            }
            ConstraintDef::Br2 {
                teams,
                slots,
                k,
                severity,
            } => {
                check.teams(&teams)?;
                check.slots(&slots)?;
                check.limit(k)?;
                let teams = self.team_groups.intern(teams);
                let slots = self.slot_groups.intern(slots);
                self.br2.push(Br2 {
                    teams,
                    slots,
                    k,
                    severity,
                });
            }
            ConstraintDef::Fa2 {
                teams,
                slots,
                k,
                severity,
            } => {
                check.teams(&teams)?;
                check.slots(&slots)?;
                check.limit(k)?;
                let teams = self.team_groups.intern(teams);
                let slots = self.slot_groups.intern(slots);
                self.fa2.push(Fa2 {
                    teams,
                    slots,
                    k,
                    severity,
                });
            }
            ConstraintDef::Se1 {
                teams,
                m_min,
                m_max,
                severity,
            } => {
                check.teams(&teams)?;
                let (m_min, m_max) = check.bounds(m_min, m_max, check.num_slots as i64)?;
                let teams = self.team_groups.intern(teams);
                self.se1.push(Se1 {
                    teams,
                    m_min,
                    m_max,
                    severity,
                });
            }
        }
        Ok(())
    }
}

/// Upper bound of a count whose `max` attribute is missing.
const UNBOUNDED: i64 = i64::MAX;

// Validation context for one constraint definition.
struct Checker {
    family: ConstraintFamily,
    position: usize,
    num_teams: usize,
    num_slots: usize,
}

impl Checker {
    fn invalid(&self, reason: String) -> CatalogError {
        CatalogError::InvalidConstraint {
            family: self.family,
            index: self.position,
            reason,
        }
    }

    fn severity(&self, severity: Severity) -> Result<()> {
        if severity.penalty < 0 {
            return Err(self.invalid(format!("negative penalty {}", severity.penalty)));
        }
        Ok(())
    }

    fn teams(&self, teams: &[usize]) -> Result<()> {
        match teams.iter().find(|&&t| t >= self.num_teams) {
            Some(t) => Err(self.invalid(format!("team index {} out of range", t))),
            None => Ok(()),
        }
    }

    fn slots(&self, slots: &[usize]) -> Result<()> {
        match slots.iter().find(|&&s| s >= self.num_slots) {
            Some(s) => Err(self.invalid(format!("slot index {} out of range", s))),
            None => Ok(()),
        }
    }

    /// Fills in a missing `min` with zero and a missing `max` with
    /// `ceiling`, the largest value the constrained quantity can take.
    fn bounds(&self, min: Option<i64>, max: Option<i64>, ceiling: i64) -> Result<(i64, i64)> {
        let min = min.unwrap_or(0);
        let max = max.unwrap_or(ceiling);
        if min < 0 || min > max {
            return Err(self.invalid(format!("bounds [{}, {}] are empty", min, max)));
        }
        Ok((min, max))
    }

    fn limit(&self, k: i64) -> Result<()> {
        if k < 0 {
            return Err(self.invalid(format!("negative limit {}", k)));
        }
        Ok(())
    }
}
