//! Cost weights and search flags.

use sportsched_core::{ConstraintFamily, Severity};

/// Hard and phase weight used for final, comparable costs.
pub const DEFAULT_HARD_WEIGHT: i64 = 1_000_000;

/// Multipliers applied to raw constraint violations.
///
/// A hard constraint costs `hard * family[F] * penalty * violation`, a soft
/// one `penalty * violation`. Every pair of teams whose two meetings fall in
/// the same half of a phased calendar costs `2 * phased`.
///
/// # Example
///
/// ```
/// use sportsched_core::{ConstraintFamily, Severity};
/// use sportsched_scoring::Weights;
///
/// let weights = Weights::new(10, 100).with_family_weight(ConstraintFamily::Ca1, 7);
///
/// assert_eq!(weights.scale(ConstraintFamily::Ca1, Severity::hard(2)), 140);
/// assert_eq!(weights.scale(ConstraintFamily::Ca1, Severity::soft(2)), 2);
/// assert_eq!(weights.scale(ConstraintFamily::Ca2, Severity::hard(1)), 10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Weights {
    pub hard: i64,
    pub phased: i64,
    pub family: [i64; ConstraintFamily::COUNT],
}

impl Weights {
    pub fn new(hard: i64, phased: i64) -> Self {
        Self {
            hard,
            phased,
            family: [1; ConstraintFamily::COUNT],
        }
    }

    pub fn with_family_weight(mut self, family: ConstraintFamily, weight: i64) -> Self {
        self.family[family.index()] = weight;
        self
    }

    pub fn with_family_weights(mut self, family: [i64; ConstraintFamily::COUNT]) -> Self {
        self.family = family;
        self
    }

    /// Multiplier of one unit of violation of a constraint.
    #[inline]
    pub fn scale(&self, family: ConstraintFamily, severity: Severity) -> i64 {
        if severity.hard {
            self.hard * self.family[family.index()] * severity.penalty
        } else {
            severity.penalty
        }
    }
}

impl Default for Weights {
    fn default() -> Self {
        Self::new(DEFAULT_HARD_WEIGHT, DEFAULT_HARD_WEIGHT)
    }
}

/// Policy switches of a search stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchFlags {
    /// Legs of a pair may share a half of the calendar.
    pub mix_phase: bool,
    /// Moves leaving any hard constraint violated are infeasible.
    pub forbid_hard_worsening: bool,
    /// The stage ends once hard and phase costs reach zero.
    pub stop_at_zero_hard: bool,
    /// Size caps of the chained moves.
    pub limits: MoveLimits,
}

impl SearchFlags {
    pub fn with_mix_phase(mut self, mix_phase: bool) -> Self {
        self.mix_phase = mix_phase;
        self
    }

    pub fn with_forbid_hard_worsening(mut self, forbid: bool) -> Self {
        self.forbid_hard_worsening = forbid;
        self
    }

    pub fn with_stop_at_zero_hard(mut self, stop: bool) -> Self {
        self.stop_at_zero_hard = stop;
        self
    }

    pub fn with_limits(mut self, limits: MoveLimits) -> Self {
        self.limits = limits;
        self
    }
}

/// Size caps of the chained moves.
///
/// A chain or cycle longer than its cap is rejected as infeasible. Moves
/// touching more rounds than `partial_cost_threshold` are costed by a full
/// recomputation instead of through their affected constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveLimits {
    /// Rounds a match-swap chain may span; `None` scales with the calendar.
    pub max_chain_len: Option<usize>,
    pub partial_cost_threshold: usize,
    /// Teams a round-swap cycle may span; `None` scales with the league.
    pub max_cycle_len: Option<usize>,
}

impl MoveLimits {
    pub const DEFAULT_PARTIAL_COST_THRESHOLD: usize = 8;

    pub fn with_max_chain_len(mut self, len: Option<usize>) -> Self {
        self.max_chain_len = len;
        self
    }

    pub fn with_partial_cost_threshold(mut self, threshold: usize) -> Self {
        self.partial_cost_threshold = threshold;
        self
    }

    pub fn with_max_cycle_len(mut self, len: Option<usize>) -> Self {
        self.max_cycle_len = len;
        self
    }

    /// Longest chain accepted on a calendar of `num_slots` rounds.
    pub fn chain_cap(&self, num_slots: usize) -> usize {
        self.max_chain_len.unwrap_or_else(|| 8.max(num_slots / 2))
    }

    /// Longest cycle accepted in a league of `num_teams` teams.
    pub fn cycle_cap(&self, num_teams: usize) -> usize {
        self.max_cycle_len
            .unwrap_or_else(|| 4.max((num_teams / 2).saturating_sub(1)))
    }
}

impl Default for MoveLimits {
    fn default() -> Self {
        Self {
            max_chain_len: None,
            partial_cost_threshold: Self::DEFAULT_PARTIAL_COST_THRESHOLD,
            max_cycle_len: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_caps_scale_with_the_instance() {
        let limits = MoveLimits::default();
        assert_eq!(limits.chain_cap(10), 8);
        assert_eq!(limits.chain_cap(38), 19);
        assert_eq!(limits.cycle_cap(6), 4);
        assert_eq!(limits.cycle_cap(20), 9);
        assert_eq!(limits.partial_cost_threshold, 8);
    }

    #[test]
    fn overrides_replace_the_scaled_caps() {
        let limits = MoveLimits::default()
            .with_max_chain_len(Some(3))
            .with_max_cycle_len(Some(2));
        assert_eq!(limits.chain_cap(38), 3);
        assert_eq!(limits.cycle_cap(20), 2);
    }
}
