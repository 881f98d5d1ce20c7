//! Optimization backends for `BinaryModel`.
//!
//! A backend receives a fully built model and a search budget and reports
//! one of three verdicts: a proven optimum, proven infeasibility, or an
//! exhausted budget. Backends are stateless between calls.

mod branch_and_bound;
mod ilp;

use std::any::Any;
use std::fmt::Debug;
use std::panic::{catch_unwind, AssertUnwindSafe};

use groupmeet_core::BackendError;

use crate::model::BinaryModel;
use crate::stats::SearchStats;
use crate::termination::SearchLimits;

pub use branch_and_bound::BranchAndBound;
pub use ilp::GoodLpBackend;

/// Solves 0-1 linear minimization problems.
pub trait Backend: Send + Sync + Debug {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Minimizes the model's objective within the given limits.
    fn solve(
        &self,
        model: &BinaryModel,
        limits: &SearchLimits,
    ) -> Result<BackendOutcome, BackendError>;
}

/// Runs a backend, turning a panic into `BackendError::Panicked`.
pub(crate) fn run_guarded(
    backend: &dyn Backend,
    model: &BinaryModel,
    limits: &SearchLimits,
) -> Result<BackendOutcome, BackendError> {
    catch_unwind(AssertUnwindSafe(|| backend.solve(model, limits))).unwrap_or_else(|payload| {
        let message = panic_message(payload.as_ref());
        Err(BackendError::Panicked(format!("{}: {message}", backend.name())))
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_string())
}

/// A complete assignment of every model variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSolution {
    values: Vec<bool>,
    objective: u64,
}

impl ModelSolution {
    pub fn new(values: Vec<bool>, objective: u64) -> Self {
        Self { values, objective }
    }

    pub fn values(&self) -> &[bool] {
        &self.values
    }

    pub fn value(&self, var: crate::model::VarId) -> bool {
        self.values[var.index()]
    }

    pub fn objective(&self) -> u64 {
        self.objective
    }
}

/// What a backend proved about a model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Best solution over the whole search space.
    Optimal(ModelSolution),
    /// No assignment satisfies the constraints.
    Infeasible,
    /// The budget ran out first.
    LimitReached { incumbent: Option<ModelSolution> },
}

impl Verdict {
    pub fn is_optimal(&self) -> bool {
        matches!(self, Verdict::Optimal(_))
    }

    pub fn is_infeasible(&self) -> bool {
        matches!(self, Verdict::Infeasible)
    }
}

/// Verdict plus the counters of the run that produced it.
#[derive(Debug, Clone)]
pub struct BackendOutcome {
    pub verdict: Verdict,
    pub stats: SearchStats,
}

#[cfg(test)]
mod tests;
