//! sportsched Solver Engine
//!
//! This crate provides the search side of the timetabler:
//! - Moves with repair chains and their rate-weighted union
//! - Construction heuristics for the starting timetable
//! - Simulated annealing with evaluation-budget schedules
//! - Termination conditions and stage statistics
//! - Staged runs (`ESA-0`, `ESA-2S`, `ESA-2S-OH`, `ESA-3S`)

pub mod acceptor;
pub mod annealing;
pub mod construction;
pub mod error;
pub mod moves;
pub mod stage;
pub mod stats;
pub mod termination;

pub use acceptor::SimulatedAnnealingAcceptor;
pub use annealing::SimulatedAnnealing;
pub use construction::{
    canonical_pattern, greedy_timetable, initial_timetable, random_pattern, CandidateSource,
    ColoringCache, GreedyOptions, StartType,
};
pub use error::{MoveError, Result, SolveError};
pub use moves::{
    Move, MoveKind, NeighborhoodRates, NeighborhoodUnion, ScheduleMove, SwapHomes,
    SwapMatchRound, SwapMatchesNotPhased, SwapMatchesPhased, SwapRounds, SwapTeams,
};
pub use stage::{load_timetable, SolveOutcome, Stage, StageReport, StagedSolver};
pub use stats::{SolverStats, StageStats};
pub use termination::{
    EvaluationCountTermination, OrTermination, SearchProgress, Termination, ZeroHardTermination,
};
