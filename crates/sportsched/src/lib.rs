//! sportsched - Compact Double Round-Robin Timetabling in Rust
//!
//! Load an ITC2021 instance, pick a stage method and call [`solve_instance`].
//!
//! # Example
//!
//! ```rust
//! use sportsched::prelude::*;
//!
//! let catalog = CatalogBuilder::anonymous(4).build().unwrap();
//! let state = ScheduleState::new(
//!     std::sync::Arc::new(catalog),
//!     canonical_pattern(4),
//!     Weights::default(),
//!     SearchFlags::default(),
//! )
//! .unwrap();
//! assert_eq!(state.total_cost(), 0);
//! ```

// Instance model
pub use sportsched_core::{
    load_instance, parse_instance, Catalog, CatalogBuilder, CatalogError, ConstraintDef,
    ConstraintFamily, HomeMode, Severity,
};

// Timetable state and costs
pub use sportsched_scoring::io::{format_fixtures, load_solution, parse_solution, write_solution};
pub use sportsched_scoring::{
    check_timetable, violations, ConsistencyReport, MoveLimits, ScheduleError, ScheduleState,
    SearchFlags, Timetable, Violation, Weights, DEFAULT_HARD_WEIGHT,
};

// Run configuration
pub use sportsched_config::{
    AnnealingConfig, ConfigError, FamilyWeights, Method, MoveLimitsConfig, NeighborhoodConfig,
    RunConfig, StartType,
};

// Search
pub use sportsched_solver::{
    canonical_pattern, initial_timetable, load_timetable, random_pattern, Move, MoveKind,
    NeighborhoodUnion, ScheduleMove, SimulatedAnnealing, SwapHomes, SolveError, SolveOutcome, SolverStats,
    Stage, StageReport, StageStats, StagedSolver,
};

/// Terminal rendering of solver events.
#[cfg(feature = "console")]
pub use sportsched_console as console;

mod solver;
pub use solver::{solve_instance, write_timetable};

pub mod prelude {
    pub use super::{
        canonical_pattern, load_instance, solve_instance, CatalogBuilder, ConstraintFamily,
        Method, RunConfig, ScheduleState, SearchFlags, SolveOutcome, StagedSolver, StartType,
        Timetable, Weights,
    };
}
