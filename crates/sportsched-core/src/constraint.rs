//! Constraint families and their parameters.
//!
//! Constraints reference teams and slots through group indices into the
//! catalog's [`GroupTable`](crate::GroupTable)s. The builder-side
//! [`ConstraintDef`] carries explicit member lists instead and is turned into
//! the family structs by [`CatalogBuilder`](crate::CatalogBuilder).

use std::fmt;
use std::str::FromStr;

/// The nine constraint families, in catalog order.
///
/// # Example
///
/// ```
/// use sportsched_core::ConstraintFamily;
///
/// assert_eq!(ConstraintFamily::ALL.len(), ConstraintFamily::COUNT);
/// assert_eq!("BR2".parse::<ConstraintFamily>(), Ok(ConstraintFamily::Br2));
/// assert_eq!(ConstraintFamily::Fa2.to_string(), "FA2");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConstraintFamily {
    Ca1,
    Ca2,
    Ca3,
    Ca4,
    Ga1,
    Br1,
    Br2,
    Fa2,
    Se1,
}

impl ConstraintFamily {
    pub const COUNT: usize = 9;

    pub const ALL: [ConstraintFamily; Self::COUNT] = [
        Self::Ca1,
        Self::Ca2,
        Self::Ca3,
        Self::Ca4,
        Self::Ga1,
        Self::Br1,
        Self::Br2,
        Self::Fa2,
        Self::Se1,
    ];

    /// Dense index of the family, matching its position in [`ALL`](Self::ALL).
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::Ca1 => "CA1",
            Self::Ca2 => "CA2",
            Self::Ca3 => "CA3",
            Self::Ca4 => "CA4",
            Self::Ga1 => "GA1",
            Self::Br1 => "BR1",
            Self::Br2 => "BR2",
            Self::Fa2 => "FA2",
            Self::Se1 => "SE1",
        }
    }
}

impl fmt::Display for ConstraintFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for ConstraintFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|family| family.code().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown constraint family `{}`", s))
    }
}

/// Which games of a team are counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HomeMode {
    Home,
    Away,
    Any,
}

impl HomeMode {
    /// Returns true if a game played with the given home status counts.
    #[inline]
    pub fn counts(self, is_home: bool) -> bool {
        match self {
            Self::Home => is_home,
            Self::Away => !is_home,
            Self::Any => true,
        }
    }
}

/// CA4 aggregation: one count over the whole slot group or one per slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ca4Scope {
    Global,
    Every,
}

/// Hard/soft flag and integer penalty shared by every constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Severity {
    pub hard: bool,
    pub penalty: i64,
}

impl Severity {
    pub fn hard(penalty: i64) -> Self {
        Self {
            hard: true,
            penalty,
        }
    }

    pub fn soft(penalty: i64) -> Self {
        Self {
            hard: false,
            penalty,
        }
    }
}

/// Each team of `teams` plays between `k_min` and `k_max` games of `mode`
/// in `slots`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ca1 {
    pub teams: usize,
    pub slots: usize,
    pub k_min: i64,
    pub k_max: i64,
    pub mode: HomeMode,
    pub severity: Severity,
}

/// Each team of `teams1` plays between `k_min` and `k_max` games of `mode`
/// against teams of `teams2` in `slots`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ca2 {
    pub teams1: usize,
    pub teams2: usize,
    pub slots: usize,
    pub k_min: i64,
    pub k_max: i64,
    pub mode: HomeMode,
    pub severity: Severity,
}

/// Each team of `teams1` plays between `k_min` and `k_max` games of `mode`
/// against `teams2` in every window of `window` consecutive slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ca3 {
    pub teams1: usize,
    pub teams2: usize,
    pub window: usize,
    pub k_min: i64,
    pub k_max: i64,
    pub mode: HomeMode,
    pub severity: Severity,
}

/// Teams of `teams1` play between `k_min` and `k_max` games of `mode`
/// against `teams2`, over all of `slots` or in each slot of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ca4 {
    pub teams1: usize,
    pub teams2: usize,
    pub slots: usize,
    pub k_min: i64,
    pub k_max: i64,
    pub mode: HomeMode,
    pub scope: Ca4Scope,
    pub severity: Severity,
}

/// Between `k_min` and `k_max` of the listed `(home, away)` meetings take
/// place in `slots`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ga1 {
    pub meetings: Vec<(usize, usize)>,
    pub slots: usize,
    pub k_min: i64,
    pub k_max: i64,
    pub severity: Severity,
}

/// Each team of `teams` has at most `k` breaks of `mode` in `slots`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Br1 {
    pub teams: usize,
    pub slots: usize,
    pub k: i64,
    pub mode: HomeMode,
    pub severity: Severity,
}

/// Teams of `teams` have at most `k` breaks in total in `slots`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Br2 {
    pub teams: usize,
    pub slots: usize,
    pub k: i64,
    pub severity: Severity,
}

/// The home-game difference between any two teams of `teams` never
/// exceeds `k` over the prefixes of `slots`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fa2 {
    pub teams: usize,
    pub slots: usize,
    pub k: i64,
    pub severity: Severity,
}

/// The two meetings of any pair of `teams` are separated by at least
/// `m_min` and at most `m_max` slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Se1 {
    pub teams: usize,
    pub m_min: i64,
    pub m_max: i64,
    pub severity: Severity,
}

/// Constraint description with explicit team/slot members.
///
/// When the catalog is built, a missing lower bound becomes `0`. A missing
/// upper bound leaves game counts unbounded and caps separations at the
/// number of slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstraintDef {
    Ca1 {
        teams: Vec<usize>,
        slots: Vec<usize>,
        k_min: Option<i64>,
        k_max: Option<i64>,
        mode: HomeMode,
        severity: Severity,
    },
    Ca2 {
        teams1: Vec<usize>,
        teams2: Vec<usize>,
        slots: Vec<usize>,
        k_min: Option<i64>,
        k_max: Option<i64>,
        mode: HomeMode,
        severity: Severity,
    },
    Ca3 {
        teams1: Vec<usize>,
        teams2: Vec<usize>,
        window: usize,
        k_min: Option<i64>,
        k_max: Option<i64>,
        mode: HomeMode,
        severity: Severity,
    },
    Ca4 {
        teams1: Vec<usize>,
        teams2: Vec<usize>,
        slots: Vec<usize>,
        k_min: Option<i64>,
        k_max: Option<i64>,
        mode: HomeMode,
        scope: Ca4Scope,
        severity: Severity,
    },
    Ga1 {
        meetings: Vec<(usize, usize)>,
        slots: Vec<usize>,
        k_min: Option<i64>,
        k_max: Option<i64>,
        severity: Severity,
    },
    Br1 {
        teams: Vec<usize>,
        slots: Vec<usize>,
        k: i64,
        mode: HomeMode,
        severity: Severity,
    },
    Br2 {
        teams: Vec<usize>,
        slots: Vec<usize>,
        k: i64,
        severity: Severity,
    },
    Fa2 {
        teams: Vec<usize>,
        slots: Vec<usize>,
        k: i64,
        severity: Severity,
    },
    Se1 {
        teams: Vec<usize>,
        m_min: Option<i64>,
        m_max: Option<i64>,
        severity: Severity,
    },
}

impl ConstraintDef {
    pub fn family(&self) -> ConstraintFamily {
        match self {
            Self::Ca1 { .. } => ConstraintFamily::Ca1,
            Self::Ca2 { .. } => ConstraintFamily::Ca2,
            Self::Ca3 { .. } => ConstraintFamily::Ca3,
            Self::Ca4 { .. } => ConstraintFamily::Ca4,
            Self::Ga1 { .. } => ConstraintFamily::Ga1,
            Self::Br1 { .. } => ConstraintFamily::Br1,
            Self::Br2 { .. } => ConstraintFamily::Br2,
            Self::Fa2 { .. } => ConstraintFamily::Fa2,
            Self::Se1 { .. } => ConstraintFamily::Se1,
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Self::Ca1 { severity, .. }
            | Self::Ca2 { severity, .. }
            | Self::Ca3 { severity, .. }
            | Self::Ca4 { severity, .. }
            | Self::Ga1 { severity, .. }
            | Self::Br1 { severity, .. }
            | Self::Br2 { severity, .. }
            | Self::Fa2 { severity, .. }
            | Self::Se1 { severity, .. } => *severity,
        }
    }
}
