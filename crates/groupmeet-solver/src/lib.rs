//! groupmeet Solver Engine
//!
//! This crate turns a scheduling round into an optimal group assignment:
//! - Input validation
//! - `ModelBuilder` producing a backend-neutral 0-1 `BinaryModel`
//! - The `Backend` trait, an integer programming backend on `good_lp` and an
//!   exact branch-and-bound backend
//! - Decoding and independent verification of the result
//! - Diagnosis of infeasible rounds
//! - Search limits and statistics

pub mod backend;
pub mod builder;
pub mod diagnose;
pub mod model;
pub mod problem;
pub mod solver;
pub mod stats;
pub mod termination;
pub mod validation;
pub mod verify;


pub use backend::{
    Backend, BackendOutcome, BranchAndBound, GoodLpBackend, ModelSolution, Verdict,
};
pub use builder::{GroupingModel, ModelBuilder};
pub use model::{BinaryModel, Comparison, ConstraintClass, VarId};
pub use problem::SolverParameters;
pub use solver::{solve, GroupAssignmentSolver, SolveReport};
pub use stats::SearchStats;
pub use termination::{SearchLimits, DEFAULT_TIME_LIMIT_SECS};
pub use validation::{validate, MAX_TOTAL_COST};
pub use verify::{assignment_cost, verify};
