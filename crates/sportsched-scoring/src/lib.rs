//! sportsched Scoring - timetable state and cost engine
//!
//! This crate holds everything that reads or writes a schedule:
//! - [`Timetable`] with its mutation primitives and derived legs
//! - Exact per-constraint costs and the greedy prefix estimator ([`cost`])
//! - [`ScheduleState`], a timetable bound to a catalog with materialized,
//!   incrementally maintained costs
//! - The consistency check and the violation listing
//! - Text and XML schedule formats ([`io`])

pub mod affected;
pub mod consistency;
pub mod cost;
pub mod error;
pub mod io;
pub mod report;
pub mod state;
pub mod timetable;
pub mod weights;

#[cfg(test)]
mod state_tests;

pub use affected::AffectedConstraints;
pub use consistency::{check_consistency, check_timetable, ConsistencyReport, Inconsistency};
pub use cost::{prefix_estimate, CostState};
pub use error::{Result, ScheduleError};
pub use report::{violations, Violation};
pub use state::ScheduleState;
pub use timetable::{Timetable, UNSET};
pub use weights::{MoveLimits, SearchFlags, Weights, DEFAULT_HARD_WEIGHT};
