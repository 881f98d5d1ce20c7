//! Integer programming backend built on `good_lp`.
//!
//! Every model variable becomes a binary column, every constraint a row, and
//! fixings become column bounds. The solver runs on a worker thread so that
//! the time limit and the terminate flag are honored while it works; a worker
//! abandoned on either finishes in the background and its answer is dropped.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use good_lp::{
    default_solver, variable, variables, Expression, ResolutionError, Solution, SolverModel,
    Variable,
};
use groupmeet_core::BackendError;
use tracing::{debug, trace};

use super::{panic_message, Backend, BackendOutcome, ModelSolution, Verdict};
use crate::model::{BinaryModel, Comparison};
use crate::stats::SearchStats;
use crate::termination::SearchLimits;

/// How often the caller looks at the clock and the terminate flag.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Column values above this read as 1.
const ONE_THRESHOLD: f64 = 0.5;

/// Mixed-integer backend on `good_lp`'s default solver.
///
/// The node limit of [`SearchLimits`] only matters when it is zero; the
/// solver's own search is not counted.
///
/// # Example
///
/// ```
/// use groupmeet_solver::backend::{Backend, GoodLpBackend, Verdict};
/// use groupmeet_solver::model::{BinaryModel, Comparison, ConstraintClass};
/// use groupmeet_solver::termination::SearchLimits;
///
/// let mut model = BinaryModel::new("cheapest_two");
/// let vars: Vec<_> = [5, 1, 3, 2]
///     .into_iter()
///     .enumerate()
///     .map(|(i, cost)| model.add_variable(format!("x{i}"), cost))
///     .collect();
/// model.add_constraint(
///     ConstraintClass::Membership,
///     vars.iter().map(|&v| (v, 1)),
///     Comparison::Equal,
///     2,
/// );
///
/// let outcome = GoodLpBackend::new().solve(&model, &SearchLimits::seconds(5)).unwrap();
/// match outcome.verdict {
///     Verdict::Optimal(solution) => assert_eq!(solution.objective(), 3),
///     other => panic!("unexpected verdict {other:?}"),
/// }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct GoodLpBackend;

impl GoodLpBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Backend for GoodLpBackend {
    fn name(&self) -> &'static str {
        "good_lp"
    }

    fn solve(
        &self,
        model: &BinaryModel,
        limits: &SearchLimits,
    ) -> Result<BackendOutcome, BackendError> {
        model.validate()?;

        let started = Instant::now();
        let mut stats = SearchStats::default();
        stats.start();

        debug!(
            event = "search_start",
            model = model.name(),
            variables = model.variable_count(),
            constraints = model.constraint_count(),
            lower_bound = model.objective_lower_bound(),
        );

        let answer = if limits.is_exhausted() {
            None
        } else {
            self.run_worker(model, limits, started)?
        };

        let verdict = match answer {
            None => Verdict::LimitReached { incumbent: None },
            Some(Answer::Infeasible) => Verdict::Infeasible,
            Some(Answer::Solved(values)) => {
                if let Some(index) = model.first_violation(&values) {
                    return Err(BackendError::InvalidSolution(format!(
                        "optimizer answer for '{}' violates constraint #{index}",
                        model.name()
                    )));
                }
                let objective = model.objective(&values);
                stats.record_incumbent(objective);
                trace!(
                    event = "incumbent",
                    cost = objective,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                );
                Verdict::Optimal(ModelSolution::new(values, objective))
            }
        };
        stats.finish();

        debug!(
            event = "search_end",
            model = model.name(),
            best_cost = ?stats.best_cost,
            optimal = verdict.is_optimal(),
            infeasible = verdict.is_infeasible(),
            elapsed_ms = stats.elapsed().as_millis() as u64,
        );

        Ok(BackendOutcome { verdict, stats })
    }
}

impl GoodLpBackend {
    /// Solves on a worker thread; `None` means the budget ran out first.
    fn run_worker(
        &self,
        model: &BinaryModel,
        limits: &SearchLimits,
        started: Instant,
    ) -> Result<Option<Answer>, BackendError> {
        let (sender, receiver) = mpsc::channel();
        let owned = model.clone();
        let worker = thread::Builder::new()
            .name("groupmeet-ilp".into())
            .spawn(move || {
                // The caller may have given up already.
                let _ = sender.send(solve_ilp(&owned));
            })
            .map_err(|err| BackendError::Failed(format!("cannot start solver thread: {err}")))?;

        loop {
            match receiver.recv_timeout(POLL_INTERVAL) {
                Ok(answer) => return answer.map(Some),
                Err(RecvTimeoutError::Timeout) => {
                    if limits.is_time_limit_reached(started) || limits.is_terminate_requested() {
                        return Ok(None);
                    }
                }
                Err(RecvTimeoutError::Disconnected) => {
                    let message = match worker.join() {
                        Err(payload) => panic_message(payload.as_ref()),
                        Ok(()) => "solver thread exited without an answer".to_string(),
                    };
                    return Err(BackendError::Panicked(format!("{}: {message}", self.name())));
                }
            }
        }
    }
}

/// What the optimizer proved, before it is checked against the model.
enum Answer {
    Solved(Vec<bool>),
    Infeasible,
}

fn solve_ilp(model: &BinaryModel) -> Result<Answer, BackendError> {
    let mut fixed: Vec<Option<bool>> = vec![None; model.variable_count()];
    for &(var, value) in model.fixings() {
        match fixed[var.index()].replace(value) {
            Some(previous) if previous != value => return Ok(Answer::Infeasible),
            _ => {}
        }
    }

    let mut vars = variables!();
    let columns: Vec<Variable> = model
        .variables()
        .iter()
        .zip(&fixed)
        .map(|(v, fixing)| {
            let column = variable().binary().name(v.name());
            let column = match fixing {
                Some(value) => {
                    let bound = f64::from(u8::from(*value));
                    column.min(bound).max(bound)
                }
                None => column,
            };
            vars.add(column)
        })
        .collect();

    let objective = model
        .variables()
        .iter()
        .zip(&columns)
        .fold(Expression::from(0.0), |acc, (v, &x)| acc + v.cost() as f64 * x);
    let mut problem = vars.minimise(objective).using(default_solver);

    for constraint in model.constraints() {
        let lhs = constraint
            .terms()
            .iter()
            .fold(Expression::from(0.0), |acc, term| {
                acc + f64::from(term.coefficient) * columns[term.var.index()]
            });
        let rhs = constraint.rhs() as f64;
        problem.add_constraint(match constraint.comparison() {
            Comparison::LessEq => lhs.leq(rhs),
            Comparison::Equal => lhs.eq(rhs),
            Comparison::GreaterEq => lhs.geq(rhs),
        });
    }

    match problem.solve() {
        Ok(solution) => Ok(Answer::Solved(
            columns
                .iter()
                .map(|&x| solution.value(x) > ONE_THRESHOLD)
                .collect(),
        )),
        Err(ResolutionError::Infeasible) => Ok(Answer::Infeasible),
        Err(err) => Err(BackendError::Failed(err.to_string())),
    }
}
