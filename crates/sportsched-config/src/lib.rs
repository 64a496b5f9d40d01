//! Configuration system for sportsched.
//!
//! Load run configuration from TOML or YAML to choose the stage method, the
//! construction heuristic, cost weights, annealing schedules and
//! neighborhood rates without code changes.
//!
//! # Examples
//!
//! Load configuration from a TOML string:
//!
//! ```
//! use sportsched_config::{Method, RunConfig, StartType};
//!
//! let config = RunConfig::from_toml_str(r#"
//!     method = "ESA-2S-OH"
//!     seed = 7
//!     start_type = "vizing"
//!
//!     [stage1]
//!     start_temperature = 179.0
//!     expected_min_temperature = 2.1
//!     max_evaluations = 200000
//!     hard_weight = 10
//! "#).unwrap();
//!
//! assert_eq!(config.method, Method::Esa2sOh);
//! assert_eq!(config.start_type, StartType::Vizing);
//! assert_eq!(config.stage1.max_evaluations, 200_000);
//! assert_eq!(config.stage1.hard_weight, Some(10));
//! ```
//!
//! Use the tuned parameter set:
//!
//! ```
//! use sportsched_config::{Method, RunConfig};
//!
//! let config = RunConfig::tuned(Method::Esa3s);
//! assert_eq!(config.hard_weight, Some(40));
//! assert_eq!(config.family_weights.ga1, 10);
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sportsched_core::ConstraintFamily;
use thiserror::Error;


/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main run configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", default)]
pub struct RunConfig {
    /// Stage sequence to run.
    pub method: Method,

    /// Random seed for reproducible results.
    pub seed: Option<u64>,

    /// Constructor of the initial schedule.
    pub start_type: StartType,

    /// Warm-start schedule in text or XML form, used instead of the
    /// constructor.
    pub init_state: Option<PathBuf>,

    /// Random starts may put both legs of a pair in the same half. Ignored
    /// on phased instances.
    pub mix_initial_phase: bool,

    /// Moves may put both legs of a pair in the same half.
    pub mix_phase_during_search: bool,

    /// Score greedy candidates on the rayon pool.
    pub parallel_greedy: bool,

    /// Hard weight of the search stages. `None` uses the default hard weight.
    pub hard_weight: Option<i64>,

    /// Phase weight of the search stages. `None` uses the default hard
    /// weight.
    pub phased_weight: Option<i64>,

    /// Per-family multipliers of hard violations.
    pub family_weights: FamilyWeights,

    /// Single-stage annealing (`ESA-0`).
    pub stage0: AnnealingConfig,

    /// First stage of the multi-stage methods.
    pub stage1: AnnealingConfig,

    /// Intermediate stage of `ESA-3S`.
    pub stage1_2: AnnealingConfig,

    /// Final stage, hard-worsening moves forbidden.
    pub stage2: AnnealingConfig,

    /// Explicit neighborhood rates. `None` picks rates by whether the
    /// instance is phased.
    pub neighborhood: Option<NeighborhoodConfig>,

    /// Size caps of the chained moves.
    pub move_limits: MoveLimitsConfig,

    /// Derive the `ESA-3S` intermediate weights from the number of hard
    /// constraints.
    pub correlate_with_hard_count: bool,

    /// Hard weight per hard constraint when correlating.
    pub correlation_factor: f64,

    /// Fill stage budgets from the instance size.
    pub auto_budget: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            method: Method::default(),
            seed: None,
            start_type: StartType::default(),
            init_state: None,
            mix_initial_phase: true,
            mix_phase_during_search: true,
            parallel_greedy: false,
            hard_weight: None,
            phased_weight: None,
            family_weights: FamilyWeights::default(),
            stage0: AnnealingConfig::default(),
            stage1: AnnealingConfig::default(),
            stage1_2: AnnealingConfig::default(),
            stage2: AnnealingConfig::default(),
            neighborhood: None,
            move_limits: MoveLimitsConfig::default(),
            correlate_with_hard_count: false,
            correlation_factor: 0.5,
            auto_budget: false,
        }
    }
}

impl RunConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// The tuned parameter set for `method`.
    ///
    /// Stage budgets are left to [`resolve_budgets`](Self::resolve_budgets)
    /// since they depend on the instance.
    pub fn tuned(method: Method) -> Self {
        let hot = AnnealingConfig::new(600.0, 3.52);
        Self {
            method,
            start_type: StartType::Vizing,
            hard_weight: Some(40),
            phased_weight: Some(400),
            family_weights: FamilyWeights {
                ca1: 7,
                ca2: 8,
                ca3: 2,
                ca4: 8,
                ga1: 10,
                br1: 1,
                br2: 6,
                fa2: 1,
                se1: 1,
            },
            stage0: hot.clone(),
            stage1: AnnealingConfig {
                hard_weight: Some(10),
                phased_weight: Some(117),
                ..AnnealingConfig::new(179.0, 2.1)
            },
            stage1_2: AnnealingConfig {
                hard_weight: Some(40),
                phased_weight: Some(400),
                ..hot
            },
            stage2: AnnealingConfig::new(17.9, 0.21),
            auto_budget: true,
            ..Self::default()
        }
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist or contains invalid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml" | "yml") => Self::from_yaml_file(path),
            _ => Self::from_toml_file(path),
        }
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_start_type(mut self, start_type: StartType) -> Self {
        self.start_type = start_type;
        self
    }

    /// Sets the evaluation budget of every stage.
    pub fn with_max_evaluations(mut self, max_evaluations: u64) -> Self {
        for stage in [
            &mut self.stage0,
            &mut self.stage1,
            &mut self.stage1_2,
            &mut self.stage2,
        ] {
            stage.max_evaluations = max_evaluations;
        }
        self.auto_budget = false;
        self
    }

    /// Neighborhood rates to use on an instance.
    pub fn neighborhood_for(&self, phased: bool) -> NeighborhoodConfig {
        self.neighborhood
            .clone()
            .unwrap_or_else(|| NeighborhoodConfig::tuned(phased))
    }

    /// Fills the stage budgets from the instance when `auto_budget` is set.
    ///
    /// Phased instances with at least 200 hard constraints get a long first
    /// stage; every other instance spends most of its budget in the
    /// intermediate stage.
    pub fn resolve_budgets(&mut self, phased: bool, hard_count: usize) {
        if !self.auto_budget {
            return;
        }
        if phased && hard_count >= 200 {
            self.stage1.max_evaluations = 500_000_000;
            self.stage1_2.max_evaluations = 50_000_000;
        } else {
            self.stage1.max_evaluations = 20_000_000;
            self.stage1_2.max_evaluations = 250_000_000;
        }
        self.stage2.max_evaluations = 40_000;
    }

    /// Checks the configuration against an instance.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for contradictory phase settings,
    /// out-of-range annealing parameters or neighborhood rates.
    pub fn validate(&self, phased: bool) -> Result<(), ConfigError> {
        if !phased && !self.mix_phase_during_search {
            return Err(ConfigError::Invalid(
                "instance is not phased and mix_phase_during_search is false".to_string(),
            ));
        }
        if self.mix_initial_phase && !self.mix_phase_during_search {
            return Err(ConfigError::Invalid(
                "mix_initial_phase requires mix_phase_during_search".to_string(),
            ));
        }
        for (name, stage) in [
            ("stage0", &self.stage0),
            ("stage1", &self.stage1),
            ("stage1_2", &self.stage1_2),
            ("stage2", &self.stage2),
        ] {
            stage
                .validate()
                .map_err(|reason| ConfigError::Invalid(format!("{}: {}", name, reason)))?;
        }
        if let Some(neighborhood) = &self.neighborhood {
            neighborhood.validate().map_err(ConfigError::Invalid)?;
        }
        self.move_limits.validate().map_err(ConfigError::Invalid)?;
        if self.family_weights.to_array().iter().any(|&w| w < 0) {
            return Err(ConfigError::Invalid("family weights must be non-negative".to_string()));
        }
        Ok(())
    }
}

/// Stage sequence of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Method {
    /// One annealing stage over every constraint.
    #[default]
    #[serde(rename = "ESA-0", alias = "esa-0")]
    Esa0,

    /// Every constraint first, then a stage forbidding hard-worsening moves.
    #[serde(rename = "ESA-2S", alias = "esa-2s")]
    Esa2s,

    /// Hard constraints only until they hold, then the forbidding stage.
    #[serde(rename = "ESA-2S-OH", alias = "esa-2s-oh")]
    Esa2sOh,

    /// Hard constraints only, every constraint, then the forbidding stage.
    #[serde(rename = "ESA-3S", alias = "esa-3s")]
    Esa3s,
}

impl Method {
    pub const ALL: [Method; 4] = [Method::Esa0, Method::Esa2s, Method::Esa2sOh, Method::Esa3s];

    pub fn name(self) -> &'static str {
        match self {
            Method::Esa0 => "ESA-0",
            Method::Esa2s => "ESA-2S",
            Method::Esa2sOh => "ESA-2S-OH",
            Method::Esa3s => "ESA-3S",
        }
    }

    /// The first stage sees only hard constraints and stops once they hold.
    pub fn hard_only_first_stage(self) -> bool {
        matches!(self, Method::Esa2sOh | Method::Esa3s)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Method {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::ALL
            .into_iter()
            .find(|method| method.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::Invalid(format!("unknown method `{}`", s)))
    }
}

/// Constructor of the initial schedule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StartType {
    /// Canonical pattern with shuffled teams and slots.
    #[default]
    Random,

    /// Greedy rounds from polygon rotations.
    Greedy,

    /// Greedy rounds from edge colourings.
    Vizing,
}

impl fmt::Display for StartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StartType::Random => "random",
            StartType::Greedy => "greedy",
            StartType::Vizing => "vizing",
        })
    }
}

impl FromStr for StartType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "random" => Ok(StartType::Random),
            "greedy" => Ok(StartType::Greedy),
            "vizing" => Ok(StartType::Vizing),
            other => Err(ConfigError::Invalid(format!(
                "unknown start type `{}`, expected random, greedy or vizing",
                other
            ))),
        }
    }
}

/// Multipliers of hard violations per constraint family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct FamilyWeights {
    pub ca1: i64,
    pub ca2: i64,
    pub ca3: i64,
    pub ca4: i64,
    pub ga1: i64,
    pub br1: i64,
    pub br2: i64,
    pub fa2: i64,
    pub se1: i64,
}

impl Default for FamilyWeights {
    fn default() -> Self {
        Self {
            ca1: 1,
            ca2: 1,
            ca3: 1,
            ca4: 1,
            ga1: 1,
            br1: 1,
            br2: 1,
            fa2: 1,
            se1: 1,
        }
    }
}

impl FamilyWeights {
    /// Weights in [`ConstraintFamily::ALL`] order.
    pub fn to_array(&self) -> [i64; ConstraintFamily::COUNT] {
        [
            self.ca1, self.ca2, self.ca3, self.ca4, self.ga1, self.br1, self.br2, self.fa2,
            self.se1,
        ]
    }

    pub fn get(&self, family: ConstraintFamily) -> i64 {
        self.to_array()[family.index()]
    }
}

/// Simulated annealing schedule of one stage.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", default)]
pub struct AnnealingConfig {
    pub start_temperature: f64,

    /// Temperature at which the schedule ends if the budget lasts.
    pub expected_min_temperature: f64,

    /// Temperature multiplier between levels.
    pub cooling_rate: f64,

    /// Share of the samples of a level that may be accepted before cooling
    /// early.
    pub neighbors_accepted_ratio: f64,

    /// Move evaluations of the stage.
    pub max_evaluations: u64,

    /// Hard weight override for this stage.
    pub hard_weight: Option<i64>,

    /// Phase weight override for this stage.
    pub phased_weight: Option<i64>,
}

impl Default for AnnealingConfig {
    fn default() -> Self {
        Self {
            start_temperature: 600.0,
            expected_min_temperature: 3.52,
            cooling_rate: 0.99,
            neighbors_accepted_ratio: 0.1,
            max_evaluations: 1_000_000,
            hard_weight: None,
            phased_weight: None,
        }
    }
}

impl AnnealingConfig {
    /// Default schedule between the two temperatures.
    pub fn new(start_temperature: f64, expected_min_temperature: f64) -> Self {
        Self {
            start_temperature,
            expected_min_temperature,
            ..Self::default()
        }
    }

    pub fn with_max_evaluations(mut self, max_evaluations: u64) -> Self {
        self.max_evaluations = max_evaluations;
        self
    }

    fn validate(&self) -> Result<(), String> {
        if !(self.expected_min_temperature > 0.0) {
            return Err("expected_min_temperature must be positive".to_string());
        }
        if !(self.start_temperature > self.expected_min_temperature) {
            return Err("start_temperature must exceed expected_min_temperature".to_string());
        }
        if !(self.cooling_rate > 0.0 && self.cooling_rate < 1.0) {
            return Err("cooling_rate must lie in (0, 1)".to_string());
        }
        if !(self.neighbors_accepted_ratio > 0.0 && self.neighbors_accepted_ratio <= 1.0) {
            return Err("neighbors_accepted_ratio must lie in (0, 1]".to_string());
        }
        Ok(())
    }
}

/// Selection rates of the move kinds. `swap_homes` takes the remainder.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", default)]
pub struct NeighborhoodConfig {
    pub swap_teams: f64,
    pub swap_rounds: f64,
    pub swap_matches_not_phased: f64,
    pub swap_matches_phased: f64,
    pub swap_match_round: f64,
}

impl Default for NeighborhoodConfig {
    fn default() -> Self {
        Self {
            swap_teams: 0.1,
            swap_rounds: 0.1,
            swap_matches_not_phased: 0.2,
            swap_matches_phased: 0.2,
            swap_match_round: 0.2,
        }
    }
}

impl NeighborhoodConfig {
    /// Tuned rates for phased and non-phased instances.
    pub fn tuned(phased: bool) -> Self {
        if phased {
            Self {
                swap_teams: 0.02,
                swap_rounds: 0.08,
                swap_matches_not_phased: 0.12,
                swap_matches_phased: 0.13,
                swap_match_round: 0.52,
            }
        } else {
            Self {
                swap_teams: 0.07,
                swap_rounds: 0.025,
                swap_matches_not_phased: 0.319,
                swap_matches_phased: 0.07,
                swap_match_round: 0.35,
            }
        }
    }

    /// Rate left for `swap_homes`.
    pub fn swap_homes(&self) -> f64 {
        (1.0 - self.explicit_sum()).max(0.0)
    }

    fn explicit_sum(&self) -> f64 {
        self.swap_teams
            + self.swap_rounds
            + self.swap_matches_not_phased
            + self.swap_matches_phased
            + self.swap_match_round
    }

    fn validate(&self) -> Result<(), String> {
        let rates = [
            self.swap_teams,
            self.swap_rounds,
            self.swap_matches_not_phased,
            self.swap_matches_phased,
            self.swap_match_round,
        ];
        if rates.iter().any(|rate| !(*rate >= 0.0)) {
            return Err("neighborhood rates must be non-negative".to_string());
        }
        if self.explicit_sum() > 1.0 + 1e-9 {
            return Err("neighborhood rates must not sum above 1".to_string());
        }
        Ok(())
    }
}

/// Size caps of the chained moves.
///
/// An unset chain cap scales as `max(8, slots / 2)` and an unset cycle cap
/// as `max(4, teams / 2 - 1)`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", default)]
pub struct MoveLimitsConfig {
    /// Longest match-swap chain, in rounds.
    pub max_chain_len: Option<usize>,

    /// Longest chain costed through its affected constraints; longer ones
    /// recompute every cost.
    pub partial_cost_threshold: usize,

    /// Longest round-swap cycle, in teams.
    pub max_cycle_len: Option<usize>,
}

impl Default for MoveLimitsConfig {
    fn default() -> Self {
        Self {
            max_chain_len: None,
            partial_cost_threshold: 8,
            max_cycle_len: None,
        }
    }
}

impl MoveLimitsConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_chain_len.is_some_and(|len| len < 2) {
            return Err("move_limits.max_chain_len must be at least 2".to_string());
        }
        if self.max_cycle_len.is_some_and(|len| len < 2) {
            return Err("move_limits.max_cycle_len must be at least 2".to_string());
        }
        Ok(())
    }
}
