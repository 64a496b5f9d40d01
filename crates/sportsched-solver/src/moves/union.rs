//! Rate-weighted union of the six neighborhoods.

use rand::Rng;
use sportsched_config::NeighborhoodConfig;
use sportsched_scoring::ScheduleState;
use tracing::trace;

use super::{MoveKind, ScheduleMove};
use crate::error::MoveError;

/// Selection probability of each move kind, indexed by [`MoveKind::index`].
///
/// `SwapHomes` receives whatever the other five rates leave.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeighborhoodRates {
    rates: [f64; MoveKind::COUNT],
}

impl NeighborhoodRates {
    /// Builds the rates from the five explicit kinds. Negative inputs are
    /// clamped to zero.
    pub fn new(
        swap_teams: f64,
        swap_rounds: f64,
        swap_matches_not_phased: f64,
        swap_matches_phased: f64,
        swap_match_round: f64,
    ) -> Self {
        let explicit = [
            swap_teams,
            swap_rounds,
            swap_matches_not_phased,
            swap_matches_phased,
            swap_match_round,
        ]
        .map(|rate| rate.max(0.0));
        let swap_homes = (1.0 - explicit.iter().sum::<f64>()).max(0.0);
        let mut rates = [0.0; MoveKind::COUNT];
        rates[0] = swap_homes;
        rates[1..].copy_from_slice(&explicit);
        Self { rates }
    }

    pub fn rate(&self, kind: MoveKind) -> f64 {
        self.rates[kind.index()]
    }

    /// Only `kind` is ever drawn.
    pub fn only(kind: MoveKind) -> Self {
        let mut rates = [0.0; MoveKind::COUNT];
        rates[kind.index()] = 1.0;
        Self { rates }
    }

    fn total(&self) -> f64 {
        self.rates.iter().sum()
    }
}

impl Default for NeighborhoodRates {
    fn default() -> Self {
        Self::from(&NeighborhoodConfig::default())
    }
}

impl From<&NeighborhoodConfig> for NeighborhoodRates {
    fn from(config: &NeighborhoodConfig) -> Self {
        Self::new(
            config.swap_teams,
            config.swap_rounds,
            config.swap_matches_not_phased,
            config.swap_matches_phased,
            config.swap_match_round,
        )
    }
}

/// Draws moves from the six neighborhoods by rate.
///
/// When the drawn kind reports an empty neighborhood, the remaining kinds
/// with a positive rate are tried from the highest rate down.
#[derive(Debug, Clone)]
pub struct NeighborhoodUnion {
    rates: NeighborhoodRates,
}

impl NeighborhoodUnion {
    pub fn new(rates: NeighborhoodRates) -> Self {
        Self { rates }
    }

    pub fn rates(&self) -> &NeighborhoodRates {
        &self.rates
    }

    /// Roulette selection of a kind with a positive rate.
    pub fn select_kind<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<MoveKind> {
        let total = self.rates.total();
        if total <= 0.0 {
            return None;
        }
        let mut pick = rng.random::<f64>() * total;
        let mut last = None;
        for kind in MoveKind::ALL {
            let rate = self.rates.rate(kind);
            if rate <= 0.0 {
                continue;
            }
            if pick < rate {
                return Some(kind);
            }
            pick -= rate;
            last = Some(kind);
        }
        last
    }

    /// Draws a feasible move.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::EmptyNeighborhood`] if every kind with a
    /// positive rate fails.
    pub fn random<R: Rng + ?Sized>(
        &self,
        state: &ScheduleState,
        rng: &mut R,
    ) -> Result<ScheduleMove, MoveError> {
        let first = self
            .select_kind(rng)
            .ok_or(MoveError::EmptyNeighborhood("union"))?;
        match first.random(state, rng) {
            Ok(mv) => return Ok(mv),
            Err(err) => trace!(event = "empty_neighborhood", kind = first.name(), error = %err),
        }

        let mut fallback: Vec<MoveKind> = MoveKind::ALL
            .into_iter()
            .filter(|&kind| kind != first && self.rates.rate(kind) > 0.0)
            .collect();
        fallback.sort_by(|a, b| self.rates.rate(*b).total_cmp(&self.rates.rate(*a)));
        for kind in fallback {
            if let Ok(mv) = kind.random(state, rng) {
                return Ok(mv);
            }
        }
        Err(MoveError::EmptyNeighborhood("union"))
    }
}
