//! Staged annealing runs.
//!
//! A [`StagedSolver`] builds (or loads) a starting timetable and runs the
//! annealing stages of its [`Method`]:
//!
//! | method      | stages                                                   |
//! |-------------|----------------------------------------------------------|
//! | `ESA-0`     | stage 0 over every constraint                            |
//! | `ESA-2S`    | stage 1 over every constraint, stage 2                   |
//! | `ESA-2S-OH` | stage 1 over hard constraints until they hold, stage 2   |
//! | `ESA-3S`    | hard-only stage 1, stage 1-2 over every constraint, stage 2 |
//!
//! Stage 2 forbids moves that leave a hard constraint violated and keeps
//! the halves of a phased calendar apart. Each stage starts from the text
//! form of the previous stage's best timetable. The outcome is re-costed at
//! [`DEFAULT_HARD_WEIGHT`] with every family weight at one, so costs of
//! different runs compare directly.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sportsched_config::{AnnealingConfig, Method, RunConfig};
use sportsched_core::{Catalog, ConstraintFamily};
use sportsched_scoring::io::load_solution;
use sportsched_scoring::{
    check_timetable, MoveLimits, ScheduleError, ScheduleState, SearchFlags, Timetable, Weights,
    DEFAULT_HARD_WEIGHT,
};
use tracing::info;

use crate::annealing::SimulatedAnnealing;
use crate::construction::{initial_timetable, ColoringCache};
use crate::error::{Result, SolveError};
use crate::moves::{NeighborhoodRates, NeighborhoodUnion};
use crate::stats::{SolverStats, StageStats};

#[cfg(test)]
#[path = "stage_tests.rs"]
mod tests;

/// One annealing stage of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// The only stage of `ESA-0`.
    Stage0,
    Stage1,
    /// The intermediate stage of `ESA-3S`.
    Stage1_2,
    Stage2,
}

impl Stage {
    pub fn name(self) -> &'static str {
        match self {
            Stage::Stage0 => "stage0",
            Stage::Stage1 => "stage1",
            Stage::Stage1_2 => "stage1_2",
            Stage::Stage2 => "stage2",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a stage did, with its best timetable costed at the final weights.
#[derive(Debug, Clone)]
pub struct StageReport {
    pub stage: Stage,
    pub stats: StageStats,
    pub cost: i64,
    pub hard_cost: i64,
}

/// Result of a [`StagedSolver`] run.
#[derive(Debug, Clone)]
pub struct SolveOutcome {
    /// The final timetable over every constraint at the final weights.
    pub state: ScheduleState,
    pub stages: Vec<StageReport>,
    pub stats: SolverStats,
    /// Seed of the run's random generator.
    pub seed: u64,
}

impl SolveOutcome {
    pub fn timetable(&self) -> &Timetable {
        self.state.timetable()
    }

    pub fn total_cost(&self) -> i64 {
        self.state.total_cost()
    }

    pub fn hard_cost(&self) -> i64 {
        self.state.hard_cost()
    }

    pub fn phase_cost(&self) -> i64 {
        self.state.phase_cost()
    }

    /// Cost of every family at the final weights.
    pub fn family_costs(&self) -> [(ConstraintFamily, i64); ConstraintFamily::COUNT] {
        ConstraintFamily::ALL.map(|family| (family, self.state.family_cost(family)))
    }

    /// Report of `stage`, if the run's method has one.
    pub fn stage(&self, stage: Stage) -> Option<&StageReport> {
        self.stages.iter().find(|report| report.stage == stage)
    }
}

/// Runs the stages of a [`RunConfig`] on a catalog.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use sportsched_config::{Method, RunConfig};
/// use sportsched_core::CatalogBuilder;
/// use sportsched_solver::stage::StagedSolver;
///
/// let catalog = Arc::new(CatalogBuilder::anonymous(4).with_phased(true).build().unwrap());
/// let config = RunConfig::new()
///     .with_method(Method::Esa2sOh)
///     .with_seed(3)
///     .with_max_evaluations(200);
///
/// let outcome = StagedSolver::new(config).solve(catalog).unwrap();
/// assert_eq!(outcome.total_cost(), 0);
/// assert_eq!(outcome.stages.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct StagedSolver {
    config: RunConfig,
}

impl StagedSolver {
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Solves `catalog` with a generator seeded from the configuration, or
    /// from the operating system when no seed is set.
    ///
    /// # Errors
    ///
    /// Returns [`SolveError::Config`] when the configuration does not fit the
    /// instance, [`SolveError::Schedule`] when the starting schedule cannot
    /// be read, and [`SolveError::Inconsistent`] when it is not a compact
    /// double round robin.
    pub fn solve(&self, catalog: Arc<Catalog>) -> Result<SolveOutcome> {
        let seed = self.config.seed.unwrap_or_else(|| rand::rng().random());
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut outcome = self.solve_with_rng(catalog, &mut rng)?;
        outcome.seed = seed;
        Ok(outcome)
    }

    /// Solves `catalog` drawing from `rng`. The outcome's seed is left at
    /// zero.
    pub fn solve_with_rng<R: Rng + ?Sized>(
        &self,
        catalog: Arc<Catalog>,
        rng: &mut R,
    ) -> Result<SolveOutcome> {
        let phased = catalog.is_phased();
        let mut config = self.config.clone();
        config.validate(phased)?;
        config.resolve_budgets(phased, catalog.hard_count());

        let rates = NeighborhoodRates::from(&config.neighborhood_for(phased));
        let mut run = Run {
            config: &config,
            catalog,
            neighborhood: NeighborhoodUnion::new(rates),
            cache: ColoringCache::new(),
            stats: SolverStats::default(),
            stages: Vec::new(),
        };
        run.stats.start();

        info!(
            event = "solve_start",
            method = %config.method,
            teams = run.catalog.num_teams(),
            hard_constraints = run.catalog.hard_count(),
            phased,
        );

        let last = match config.method {
            Method::Esa0 => run.single_stage(rng)?,
            Method::Esa2s | Method::Esa2sOh | Method::Esa3s => run.staged(rng)?,
        };
        let state = run.final_state(last.timetable().clone())?;

        info!(
            event = "solve_end",
            method = %config.method,
            duration_ms = run.stats.elapsed().as_millis() as u64,
            evaluations = run.stats.evaluations,
            cost = state.total_cost(),
            hard_cost = state.hard_cost(),
            phase_cost = state.phase_cost(),
        );

        Ok(SolveOutcome {
            state,
            stages: run.stages,
            stats: run.stats,
            seed: 0,
        })
    }
}

/// Working data of one solve.
struct Run<'a> {
    config: &'a RunConfig,
    catalog: Arc<Catalog>,
    neighborhood: NeighborhoodUnion,
    cache: ColoringCache,
    stats: SolverStats,
    stages: Vec<StageReport>,
}

impl Run<'_> {
    fn single_stage<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<ScheduleState> {
        let config = self.config;
        let weights = self.weights(None, None);
        let flags = self.search_flags().with_mix_phase(config.mix_phase_during_search);
        let catalog = Arc::clone(&self.catalog);
        let mut state = self.starting_state(catalog, weights, flags, rng)?;
        self.anneal(Stage::Stage0, &config.stage0, &mut state, rng)?;
        Ok(state)
    }

    fn staged<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<ScheduleState> {
        let config = self.config;
        let hard_only = config.method.hard_only_first_stage();

        let stage1_catalog = if hard_only {
            Arc::new(self.catalog.hard_subset())
        } else {
            Arc::clone(&self.catalog)
        };
        let stage1_config = match config.method {
            Method::Esa2s => config
                .stage1
                .clone()
                .with_max_evaluations(config.stage0.max_evaluations),
            _ => config.stage1.clone(),
        };
        let weights = self.weights(config.stage1.hard_weight, config.stage1.phased_weight);
        let flags = self.search_flags()
            .with_mix_phase(config.mix_phase_during_search)
            .with_stop_at_zero_hard(hard_only);
        let mut stage1 = self.starting_state(stage1_catalog, weights, flags, rng)?;
        self.anneal(Stage::Stage1, &stage1_config, &mut stage1, rng)?;
        let out1 = stage1.timetable().to_string();

        let mut stage2_start = out1;
        if config.method == Method::Esa3s {
            let out1_bis = self.final_state(warm_start(&stage2_start)?)?;

            let weights = self.intermediate_weights();
            let flags = self.search_flags().with_mix_phase(config.mix_phase_during_search);
            let mut stage1_2 = ScheduleState::new(
                Arc::clone(&self.catalog),
                warm_start(&stage2_start)?,
                weights,
                flags,
            )?;
            self.anneal(Stage::Stage1_2, &config.stage1_2, &mut stage1_2, rng)?;
            let out1_2 = self.final_state(warm_start(&stage1_2.timetable().to_string())?)?;

            let start = cheaper_start(&out1_bis, &out1_2);
            info!(
                event = "stage2_start_selected",
                stage1_cost = out1_bis.total_cost(),
                stage1_2_cost = out1_2.total_cost(),
                from = if std::ptr::eq(start, &out1_bis) { "stage1" } else { "stage1_2" },
            );
            stage2_start = start.timetable().to_string();
        }

        let weights = self.weights(None, None);
        let flags = self.search_flags()
            .with_mix_phase(!self.catalog.is_phased() && config.mix_phase_during_search)
            .with_forbid_hard_worsening(true);
        let mut stage2 = ScheduleState::new(
            Arc::clone(&self.catalog),
            warm_start(&stage2_start)?,
            weights,
            flags,
        )?;
        self.anneal(Stage::Stage2, &config.stage2, &mut stage2, rng)?;
        Ok(stage2)
    }

    /// Runs one stage on `state` and records its report.
    fn anneal<R: Rng + ?Sized>(
        &mut self,
        stage: Stage,
        config: &AnnealingConfig,
        state: &mut ScheduleState,
        rng: &mut R,
    ) -> Result<()> {
        let sa = SimulatedAnnealing::new(config.clone(), self.neighborhood.clone());
        let stats = sa.solve(stage.name(), state, rng);
        self.stats.absorb(&stats);

        let costed = self.final_state(state.timetable().clone())?;
        self.stages.push(StageReport {
            stage,
            stats,
            cost: costed.total_cost(),
            hard_cost: costed.hard_cost(),
        });
        Ok(())
    }

    /// The configured starting timetable, or a constructed one.
    fn starting_state<R: Rng + ?Sized>(
        &mut self,
        catalog: Arc<Catalog>,
        weights: Weights,
        flags: SearchFlags,
        rng: &mut R,
    ) -> Result<ScheduleState> {
        let timetable = match &self.config.init_state {
            Some(path) => {
                let timetable = load_timetable(&catalog, path)?;
                let report = check_timetable(&timetable, false);
                if !report.is_consistent() {
                    return Err(SolveError::Inconsistent(report.to_string()));
                }
                info!(event = "construction", start = "file", path = %path.display());
                timetable
            }
            None => initial_timetable(
                &catalog,
                &weights,
                self.config.start_type,
                self.config.mix_initial_phase,
                self.config.parallel_greedy,
                &mut self.cache,
                rng,
            ),
        };
        Ok(ScheduleState::new(catalog, timetable, weights, flags)?)
    }

    /// Flags shared by every search stage: the configured move limits.
    fn search_flags(&self) -> SearchFlags {
        let limits = &self.config.move_limits;
        SearchFlags::default().with_limits(
            MoveLimits::default()
                .with_max_chain_len(limits.max_chain_len)
                .with_partial_cost_threshold(limits.partial_cost_threshold)
                .with_max_cycle_len(limits.max_cycle_len),
        )
    }

    /// Stage weights: the stage override, then the run's weight, then
    /// [`DEFAULT_HARD_WEIGHT`].
    fn weights(&self, hard: Option<i64>, phased: Option<i64>) -> Weights {
        let hard = hard.or(self.config.hard_weight).unwrap_or(DEFAULT_HARD_WEIGHT);
        let phased = phased
            .or(self.config.phased_weight)
            .unwrap_or(DEFAULT_HARD_WEIGHT);
        Weights::new(hard, phased).with_family_weights(self.config.family_weights.to_array())
    }

    /// Weights of stage 1-2, scaled by the number of hard constraints when
    /// configured to.
    fn intermediate_weights(&self) -> Weights {
        let stage = &self.config.stage1_2;
        if !self.config.correlate_with_hard_count {
            return self.weights(stage.hard_weight, stage.phased_weight);
        }
        let hard = (self.catalog.hard_count() as f64 * self.config.correlation_factor) as i64;
        self.weights(Some(hard), Some(10 * hard))
    }

    /// `timetable` over every constraint at the final weights.
    fn final_state(&self, timetable: Timetable) -> Result<ScheduleState> {
        Ok(ScheduleState::new(
            Arc::clone(&self.catalog),
            timetable,
            Weights::default(),
            SearchFlags::default(),
        )?)
    }
}

/// The stage 1 result when strictly cheaper, the stage 1-2 result
/// otherwise.
fn cheaper_start<'a>(out1: &'a ScheduleState, out1_2: &'a ScheduleState) -> &'a ScheduleState {
    if out1.total_cost() < out1_2.total_cost() {
        out1
    } else {
        out1_2
    }
}

fn warm_start(text: &str) -> Result<Timetable> {
    Ok(text.parse::<Timetable>()?)
}

/// Reads a starting timetable: the solution XML format for `.xml` files,
/// the text format otherwise.
pub fn load_timetable(catalog: &Catalog, path: &Path) -> Result<Timetable> {
    let is_xml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"));
    if is_xml {
        return Ok(load_solution(catalog, path)?);
    }
    let text = std::fs::read_to_string(path).map_err(ScheduleError::from)?;
    let timetable: Timetable = text.parse()?;
    if timetable.num_teams() != catalog.num_teams() {
        return Err(ScheduleError::TeamCount {
            expected: catalog.num_teams(),
            found: timetable.num_teams(),
        }
        .into());
    }
    Ok(timetable)
}
