//! Group assignment solver.
//!
//! Logging levels:
//! - **INFO**: solve start/end, problem scale, verdict
//! - **DEBUG**: model size, backend runs, diagnosis
//! - **TRACE**: incumbent improvements

use std::fmt;
use std::time::Instant;

use groupmeet_config::{BackendKind, SchedulerConfig};
use groupmeet_core::{
    Assignment, ConflictMatrix, Participant, PreGroup, Result, SchedulingError,
    SchedulingProblem, SizeCostTable, Slot,
};
use tracing::{info, warn};

use crate::backend::{run_guarded, Backend, BranchAndBound, GoodLpBackend, Verdict};
use crate::builder::ModelBuilder;
use crate::diagnose::diagnose;
use crate::problem::SolverParameters;
use crate::stats::SearchStats;
use crate::termination::SearchLimits;
use crate::verify::verify;

/// Assignment plus the counters of every backend run behind it.
#[derive(Debug, Clone)]
pub struct SolveReport {
    pub assignment: Assignment,
    pub stats: SearchStats,
}

/// Partitions participants into groups of 2 to 4 and schedules every group
/// into a slot at minimum cost.
///
/// Each call builds a fresh model; the solver holds no state between calls
/// and can be shared across threads.
///
/// # Example
///
/// ```
/// use groupmeet_config::{BackendKind, SchedulerConfig};
/// use groupmeet_core::{ConflictMatrix, Participant, SchedulingProblem, Slot};
/// use groupmeet_solver::GroupAssignmentSolver;
///
/// let problem = SchedulingProblem::new(
///     ["A", "B", "C", "D"].map(Participant::named).to_vec(),
///     Slot::catalog(["S1", "S2"]),
/// )
/// .with_conflicts(ConflictMatrix::new().with_busy("A", 0));
///
/// let config = SchedulerConfig::new().with_max_groups_per_slot(1);
/// let assignment = GroupAssignmentSolver::new(&config).solve(&problem).unwrap();
///
/// assert_eq!(assignment.participant_count(), 4);
/// let (slot, _) = assignment.group_of(&"A".into()).unwrap();
/// assert!(slot.is_overflow());
/// ```
pub struct GroupAssignmentSolver {
    params: SolverParameters,
    limits: SearchLimits,
    backend: Box<dyn Backend>,
}

impl fmt::Debug for GroupAssignmentSolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupAssignmentSolver")
            .field("params", &self.params)
            .field("limits", &self.limits)
            .field("backend", &self.backend.name())
            .finish()
    }
}

impl GroupAssignmentSolver {
    /// Creates a solver with the configured backend, integer programming by
    /// default.
    ///
    /// The random seed only drives branch-and-bound tie-breaking.
    pub fn new(config: &SchedulerConfig) -> Self {
        match (config.backend, config.random_seed) {
            (BackendKind::Ilp, _) => Self::with_backend(config, GoodLpBackend::new()),
            (BackendKind::BranchAndBound, Some(seed)) => {
                Self::with_backend(config, BranchAndBound::with_seed(seed))
            }
            (BackendKind::BranchAndBound, None) => {
                Self::with_backend(config, BranchAndBound::new())
            }
        }
    }

    /// Creates a solver with a custom backend.
    pub fn with_backend(config: &SchedulerConfig, backend: impl Backend + 'static) -> Self {
        Self {
            params: SolverParameters::from_config(config),
            limits: SearchLimits::from_config(config),
            backend: Box::new(backend),
        }
    }

    /// Overrides the configured search limits.
    pub fn with_limits(mut self, limits: SearchLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Overrides the configured capacity and costs.
    pub fn with_parameters(mut self, params: SolverParameters) -> Self {
        self.params = params;
        self
    }

    pub fn parameters(&self) -> &SolverParameters {
        &self.params
    }

    pub fn limits(&self) -> &SearchLimits {
        &self.limits
    }

    /// Returns an optimal assignment, or why none was produced.
    pub fn solve(&self, problem: &SchedulingProblem) -> Result<Assignment> {
        self.solve_detailed(problem).map(|report| report.assignment)
    }

    /// Like [`solve`](Self::solve), also returning search statistics.
    pub fn solve_detailed(&self, problem: &SchedulingProblem) -> Result<SolveReport> {
        let start = Instant::now();
        info!(
            event = "solve_start",
            participants = problem.participants().len(),
            slots = problem.slots().len(),
            pre_groups = problem.pre_groups().len(),
            busy_participants = problem.conflicts().len(),
            max_groups_per_slot = self.params.max_groups_per_slot,
            backend = self.backend.name(),
            time_limit_ms = self.limits.time_limit().as_millis() as u64,
        );

        let grouping = ModelBuilder::new(problem, self.params).build().map_err(|err| {
            warn!(event = "validation_failed", error = %err);
            SchedulingError::from(err)
        })?;

        let outcome = run_guarded(self.backend.as_ref(), grouping.model(), &self.limits)?;
        let mut stats = outcome.stats;

        match outcome.verdict {
            Verdict::Optimal(solution) => {
                let assignment = grouping.decode(&solution, problem)?;
                verify(&assignment, problem, &self.params)?;
                info!(
                    event = "solve_end",
                    verdict = "optimal",
                    cost = assignment.cost(),
                    groups = assignment.group_count(),
                    overflow_groups = assignment.overflow_group_count(),
                    nodes = stats.nodes_explored,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                );
                Ok(SolveReport { assignment, stats })
            }
            Verdict::Infeasible => {
                let remaining = self
                    .limits
                    .remaining_after(start.elapsed(), stats.nodes_explored);
                let cause = diagnose(
                    problem,
                    &self.params,
                    &grouping,
                    self.backend.as_ref(),
                    &remaining,
                    &mut stats,
                )?;
                info!(
                    event = "solve_end",
                    verdict = "infeasible",
                    cause = %cause,
                    nodes = stats.nodes_explored,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                );
                Err(SchedulingError::Infeasible { cause })
            }
            Verdict::LimitReached { incumbent } => {
                let best_known_cost = incumbent.map(|solution| solution.objective());
                info!(
                    event = "solve_end",
                    verdict = "timeout",
                    best_known_cost = ?best_known_cost,
                    nodes = stats.nodes_explored,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                );
                Err(SchedulingError::Timeout {
                    elapsed: start.elapsed(),
                    nodes_explored: stats.nodes_explored,
                    best_known_cost,
                })
            }
        }
    }
}

impl Default for GroupAssignmentSolver {
    fn default() -> Self {
        Self::new(&SchedulerConfig::default())
    }
}

/// Solves one scheduling round with the default search limits.
///
/// # Example
///
/// ```
/// use groupmeet_core::{ConflictMatrix, Participant, SizeCostTable, Slot};
///
/// let assignment = groupmeet_solver::solve(
///     ["A", "B", "C", "D", "E", "F"].map(Participant::named).to_vec(),
///     Slot::catalog(["Thu PM"]),
///     ConflictMatrix::new(),
///     Vec::new(),
///     2,
///     SizeCostTable::default(),
///     2,
/// )
/// .unwrap();
///
/// assert_eq!(assignment.participant_count(), 6);
/// assert_eq!(assignment.groups_in(0).len(), assignment.group_count());
/// ```
pub fn solve(
    participants: Vec<Participant>,
    slots: Vec<Slot>,
    conflicts: ConflictMatrix,
    pre_groups: Vec<PreGroup>,
    max_groups_per_slot: usize,
    size_costs: SizeCostTable,
    overflow_cost_per_group: u64,
) -> Result<Assignment> {
    let problem = SchedulingProblem::new(participants, slots)
        .with_conflicts(conflicts)
        .with_pre_groups(pre_groups);
    let params = SolverParameters::new(max_groups_per_slot, size_costs, overflow_cost_per_group);
    GroupAssignmentSolver::default()
        .with_parameters(params)
        .solve(&problem)
}
