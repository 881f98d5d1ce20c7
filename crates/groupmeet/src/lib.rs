//! groupmeet - Group-meeting assignment in Rust
//!
//! Partitions participants into groups of 2 to 4 and schedules every group
//! into a time slot at minimum total cost.
//!
//! # Example
//!
//! ```rust
//! use groupmeet::prelude::*;
//!
//! let problem = SchedulingProblem::new(
//!     ["A", "B", "C", "D", "E"].map(Participant::named).to_vec(),
//!     Slot::catalog(["Thu AM", "Thu PM"]),
//! )
//! .with_conflicts(ConflictMatrix::new().with_busy("E", 0));
//!
//! let assignment = GroupAssignmentSolver::default().solve(&problem).unwrap();
//! assert_eq!(assignment.participant_count(), 5);
//! // E is busy in the morning, so E's group pays the overflow cost.
//! assert_eq!(assignment.cost(), 5);
//! ```

// Domain types and errors
pub use groupmeet_core::{
    Assignment, BackendError, ConflictMatrix, CourseSchedule, Group, GroupSize, HalfDay,
    InfeasibilityCause, Participant, ParticipantId, PreGroup, Result, SchedulingError,
    SchedulingProblem, SizeCostTable, Slot, SlotAssignment, ValidationError,
};

// Configuration
pub use groupmeet_config::{
    BackendKind, ConfigError, SchedulerConfig, SlotConfig, TerminationConfig,
};

// Solver
pub use groupmeet_solver::{
    solve, Backend, BackendOutcome, BranchAndBound, GoodLpBackend, GroupAssignmentSolver,
    SearchLimits, SearchStats, SolveReport, SolverParameters, Verdict, DEFAULT_TIME_LIMIT_SECS,
};

#[cfg(feature = "console")]
pub mod console;

mod solver;
pub use solver::{run, run_with_config_file, CONFIG_FILE};

pub mod prelude {
    pub use super::{
        Assignment, ConflictMatrix, Group, Participant, ParticipantId, PreGroup,
        SchedulingError, SchedulingProblem, SizeCostTable, Slot,
    };
    pub use super::{GroupAssignmentSolver, SchedulerConfig, SolverParameters};
}
