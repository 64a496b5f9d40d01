//! Evaluation-budget simulated annealing.

use std::mem;

use rand::Rng;
use sportsched_config::AnnealingConfig;
use sportsched_scoring::ScheduleState;
use tracing::{debug, info, trace};

use crate::acceptor::SimulatedAnnealingAcceptor;
use crate::error::MoveError;
use crate::moves::NeighborhoodUnion;
use crate::stats::StageStats;
use crate::termination::{
    EvaluationCountTermination, OrTermination, SearchProgress, Termination, ZeroHardTermination,
};

#[cfg(test)]
#[path = "annealing_tests.rs"]
mod tests;

/// One annealing stage over a neighborhood union.
///
/// The schedule runs from `start_temperature` down to
/// `expected_min_temperature` in `levels` steps of `cooling_rate`, where
/// `levels = ceil(ln(min / start) / ln(cooling_rate))`. The evaluation
/// budget is split evenly across the levels. A level ends after its share
/// of samples, or earlier once `neighbors_accepted_ratio` of that share has
/// been accepted.
#[derive(Debug, Clone)]
pub struct SimulatedAnnealing {
    config: AnnealingConfig,
    neighborhood: NeighborhoodUnion,
}

impl SimulatedAnnealing {
    pub fn new(config: AnnealingConfig, neighborhood: NeighborhoodUnion) -> Self {
        Self {
            config,
            neighborhood,
        }
    }

    pub fn config(&self) -> &AnnealingConfig {
        &self.config
    }

    /// Number of temperature levels of the schedule, at least one.
    pub fn temperature_levels(&self) -> u64 {
        let AnnealingConfig {
            start_temperature: start,
            expected_min_temperature: min,
            cooling_rate,
            ..
        } = self.config;
        if !(start > min && min > 0.0 && cooling_rate > 0.0 && cooling_rate < 1.0) {
            return 1;
        }
        let levels = ((min / start).ln() / cooling_rate.ln()).ceil();
        (levels as u64).max(1)
    }

    /// Evaluations sampled at each temperature.
    pub fn samples_per_level(&self) -> u64 {
        (self.config.max_evaluations / self.temperature_levels()).max(1)
    }

    /// Accepted moves after which the temperature drops early.
    pub fn accepted_per_level(&self) -> u64 {
        let samples = self.samples_per_level() as f64;
        ((self.config.neighbors_accepted_ratio * samples) as u64).max(1)
    }

    /// Runs the stage until the evaluation budget is spent, or until hard
    /// and phase costs vanish when the state's flags ask for it.
    ///
    /// `state` is left holding the best state seen.
    pub fn solve<R: Rng + ?Sized>(
        &self,
        name: &'static str,
        state: &mut ScheduleState,
        rng: &mut R,
    ) -> StageStats {
        let budget = EvaluationCountTermination::new(self.config.max_evaluations);
        if state.flags().stop_at_zero_hard {
            self.run(name, state, &OrTermination(budget, ZeroHardTermination), rng)
        } else {
            self.run(name, state, &budget, rng)
        }
    }

    /// Runs the stage until `termination` fires or no feasible move can be
    /// drawn.
    pub fn run<T: Termination, R: Rng + ?Sized>(
        &self,
        name: &'static str,
        state: &mut ScheduleState,
        termination: &T,
        rng: &mut R,
    ) -> StageStats {
        let mut stats = StageStats::new(name);
        let mut acceptor = SimulatedAnnealingAcceptor::new(self.config.start_temperature);
        let samples_per_level = self.samples_per_level();
        let accepted_per_level = self.accepted_per_level();

        info!(
            event = "stage_start",
            stage = name,
            cost = state.total_cost(),
            hard_cost = state.hard_cost(),
            temperature = acceptor.temperature(),
            levels = self.temperature_levels(),
            max_evaluations = self.config.max_evaluations,
        );

        let mut best = state.clone();
        let mut candidate = state.clone();
        let (mut level_samples, mut level_accepted) = (0u64, 0u64);

        loop {
            let progress = SearchProgress {
                evaluations: stats.evaluations,
                state,
            };
            if termination.is_terminated(&progress) {
                break;
            }

            let mv = match self.neighborhood.random(state, rng) {
                Ok(mv) => mv,
                Err(MoveError::EmptyNeighborhood(kind)) => {
                    stats.record_empty_draw();
                    debug!(event = "empty_neighborhood", stage = name, kind);
                    break;
                }
                Err(err) => {
                    debug!(event = "move_error", stage = name, error = %err);
                    break;
                }
            };

            candidate.copy_from(state);
            mv.apply(&mut candidate);
            let delta = candidate.total_cost() - state.total_cost();
            let accepted = acceptor.is_accepted(delta, rng);
            let mut improved = false;
            if accepted {
                mem::swap(state, &mut candidate);
                level_accepted += 1;
                if state.total_cost() < best.total_cost() {
                    best.copy_from(state);
                    improved = true;
                }
            }
            stats.record_evaluation(accepted, improved);
            level_samples += 1;

            trace!(
                event = "step",
                stage = name,
                step = stats.evaluations,
                mv = %mv,
                delta,
                accepted,
            );

            if level_samples >= samples_per_level || level_accepted >= accepted_per_level {
                acceptor.cool(self.config.cooling_rate);
                stats.record_level();
                debug!(
                    event = "progress",
                    stage = name,
                    evaluations = stats.evaluations,
                    temperature = acceptor.temperature(),
                    accepted = level_accepted,
                    cost = state.total_cost(),
                    best_cost = best.total_cost(),
                );
                level_samples = 0;
                level_accepted = 0;
            }
        }

        if best.total_cost() < state.total_cost() {
            state.copy_from(&best);
        }

        info!(
            event = "stage_end",
            stage = name,
            duration_ms = stats.elapsed_ms(),
            evaluations = stats.evaluations,
            speed = stats.evaluations_per_second(),
            acceptance = stats.acceptance_rate(),
            cost = state.total_cost(),
            hard_cost = state.hard_cost(),
        );
        stats
    }
}
