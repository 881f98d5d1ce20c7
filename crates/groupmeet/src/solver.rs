//! Solver entry point that hides configuration wiring.

use std::path::Path;

use groupmeet_config::SchedulerConfig;
use groupmeet_core::{Assignment, Result, SchedulingError, SchedulingProblem};
use groupmeet_solver::GroupAssignmentSolver;

/// Configuration file read by [`run`] from the working directory.
pub const CONFIG_FILE: &str = "groupmeet.toml";

/// Solves one round with `groupmeet.toml` if present, defaults otherwise.
pub fn run(problem: &SchedulingProblem) -> Result<Assignment> {
    run_with_config_file(problem, CONFIG_FILE)
}

/// Solves one round with the configuration at `path`, or defaults if there
/// is no file there.
///
/// A file that exists but cannot be read, parsed or validated is reported as
/// [`SchedulingError::Config`].
pub fn run_with_config_file(
    problem: &SchedulingProblem,
    path: impl AsRef<Path>,
) -> Result<Assignment> {
    let path = path.as_ref();
    let config = SchedulerConfig::load_or_default(path)
        .map_err(|err| SchedulingError::Config(format!("{}: {err}", path.display())))?;

    #[cfg(feature = "console")]
    crate::console::init();

    GroupAssignmentSolver::new(&config).solve(problem)
}
