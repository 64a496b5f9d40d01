//! Solver entry point that hides the wiring between crates.

use std::path::Path;
use std::sync::Arc;

use sportsched_config::RunConfig;
use sportsched_core::{load_instance, Catalog};
use sportsched_scoring::io::write_solution;
use sportsched_scoring::ScheduleError;
use sportsched_solver::{SolveError, SolveOutcome, StagedSolver};

/// Loads the ITC2021 instance at `path` and runs the stages of `config`
/// on it.
///
/// # Errors
///
/// Fails when the instance cannot be read, the configuration does not fit
/// the instance, or `config.init_state` cannot be used.
pub fn solve_instance(
    path: impl AsRef<Path>,
    config: RunConfig,
) -> Result<(Arc<Catalog>, SolveOutcome), SolveError> {
    let catalog = Arc::new(load_instance(path)?);
    let outcome = StagedSolver::new(config).solve(Arc::clone(&catalog))?;
    Ok((catalog, outcome))
}

/// Writes the outcome's timetable to `path`.
///
/// `.xml` paths get the ITC2021 solution format, named after the file
/// stem; any other path gets the text format, which
/// [`load_timetable`](sportsched_solver::load_timetable) reads back.
pub fn write_timetable(
    catalog: &Catalog,
    outcome: &SolveOutcome,
    path: impl AsRef<Path>,
) -> Result<(), ScheduleError> {
    let path = path.as_ref();
    let is_xml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"));
    let contents = if is_xml {
        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("solution");
        write_solution(catalog, outcome.timetable(), name)
    } else {
        outcome.timetable().to_string()
    };
    std::fs::write(path, contents)?;
    Ok(())
}
