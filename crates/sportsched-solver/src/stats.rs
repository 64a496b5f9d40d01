//! Counters of a solve and of its annealing stages.

use std::time::{Duration, Instant};

/// Counters accumulated over every stage of a solve.
///
/// # Example
///
/// ```
/// use sportsched_solver::stats::{SolverStats, StageStats};
///
/// let mut stage = StageStats::new("stage1");
/// stage.record_evaluation(true, true);
/// stage.record_evaluation(false, false);
///
/// let mut stats = SolverStats::default();
/// stats.start();
/// stats.absorb(&stage);
///
/// assert_eq!(stats.evaluations, 2);
/// assert_eq!(stats.accepted, 1);
/// assert_eq!(stats.stages, 1);
/// ```
#[derive(Debug, Default, Clone)]
pub struct SolverStats {
    start_time: Option<Instant>,
    /// Stages run so far.
    pub stages: usize,
    pub evaluations: u64,
    pub accepted: u64,
    /// Accepted moves that lowered the stage's best cost.
    pub improvements: u64,
}

impl SolverStats {
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.map(|t| t.elapsed()).unwrap_or_default()
    }

    /// Adds the counters of a finished stage.
    pub fn absorb(&mut self, stage: &StageStats) {
        self.stages += 1;
        self.evaluations += stage.evaluations;
        self.accepted += stage.accepted;
        self.improvements += stage.improvements;
    }

    pub fn evaluations_per_second(&self) -> f64 {
        let secs = self.elapsed().as_secs_f64();
        if secs > 0.0 {
            self.evaluations as f64 / secs
        } else {
            0.0
        }
    }

    pub fn acceptance_rate(&self) -> f64 {
        if self.evaluations == 0 {
            0.0
        } else {
            self.accepted as f64 / self.evaluations as f64
        }
    }
}

/// Counters of one annealing stage.
///
/// # Example
///
/// ```
/// use sportsched_solver::stats::StageStats;
///
/// let mut stats = StageStats::new("stage2");
/// stats.record_evaluation(true, false);
/// stats.record_level();
///
/// assert_eq!(stats.name, "stage2");
/// assert_eq!(stats.temperature_levels, 1);
/// assert_eq!(stats.acceptance_rate(), 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct StageStats {
    pub name: &'static str,
    start_time: Instant,
    pub evaluations: u64,
    pub accepted: u64,
    pub improvements: u64,
    /// Temperature decreases performed.
    pub temperature_levels: u64,
    /// Draws that found no feasible move.
    pub empty_draws: u64,
}

impl StageStats {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            start_time: Instant::now(),
            evaluations: 0,
            accepted: 0,
            improvements: 0,
            temperature_levels: 0,
            empty_draws: 0,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.start_time.elapsed().as_millis() as u64
    }

    /// Records one evaluated move.
    pub fn record_evaluation(&mut self, accepted: bool, improved: bool) {
        self.evaluations += 1;
        if accepted {
            self.accepted += 1;
        }
        if improved {
            self.improvements += 1;
        }
    }

    pub fn record_level(&mut self) {
        self.temperature_levels += 1;
    }

    pub fn record_empty_draw(&mut self) {
        self.empty_draws += 1;
    }

    pub fn evaluations_per_second(&self) -> u64 {
        let secs = self.elapsed().as_secs_f64();
        if secs > 0.0 {
            (self.evaluations as f64 / secs) as u64
        } else {
            0
        }
    }

    pub fn acceptance_rate(&self) -> f64 {
        if self.evaluations == 0 {
            0.0
        } else {
            self.accepted as f64 / self.evaluations as f64
        }
    }
}
