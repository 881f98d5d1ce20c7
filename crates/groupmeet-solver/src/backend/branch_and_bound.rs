//! Exact depth-first branch and bound over binary variables.
//!
//! Each node fixes one variable and runs bound propagation over the linear
//! constraints until a fixpoint or a conflict. A node is pruned when a lower
//! bound on its completions reaches the incumbent's cost: the cost of the
//! variables already set to 1, or the model's partition bound when it has
//! one. The search stops early once an incumbent meets the model's objective
//! lower bound.

use std::ops::ControlFlow;
use std::time::Instant;

use groupmeet_core::BackendError;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

use super::{Backend, BackendOutcome, ModelSolution, Verdict};
use crate::model::{BinaryModel, Comparison, VarId};
use crate::stats::SearchStats;
use crate::termination::SearchLimits;

/// Nodes between two clock reads.
const TIME_CHECK_INTERVAL: u64 = 256;

/// Chance that a seeded search flips the preferred value of a free variable.
const FLIP_PROBABILITY: f64 = 0.25;

/// Depth-first branch and bound with bound propagation.
///
/// Without a seed the search is fully deterministic: variables are branched
/// in the model's branch order and each one tries its preferred value first.
/// With a seed, zero-cost variables sometimes try the other value first,
/// which changes which of several equally cheap optima is returned.
///
/// # Example
///
/// ```
/// use groupmeet_solver::backend::{Backend, BranchAndBound, Verdict};
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
/// let outcome = BranchAndBound::new().solve(&model, &SearchLimits::seconds(5)).unwrap();
/// match outcome.verdict {
///     Verdict::Optimal(solution) => assert_eq!(solution.objective(), 3),
///     other => panic!("unexpected verdict {other:?}"),
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct BranchAndBound {
    seed: Option<u64>,
}

impl BranchAndBound {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}

impl Backend for BranchAndBound {
    fn name(&self) -> &'static str {
        "branch_and_bound"
    }

    fn solve(
        &self,
        model: &BinaryModel,
        limits: &SearchLimits,
    ) -> Result<BackendOutcome, BackendError> {
        model.validate()?;

        debug!(
            event = "search_start",
            model = model.name(),
            variables = model.variable_count(),
            constraints = model.constraint_count(),
            lower_bound = model.objective_lower_bound(),
            seed = ?self.seed,
        );

        let mut search = Search::new(model, limits, self.seed);
        let verdict = search.run();

        debug!(
            event = "search_end",
            model = model.name(),
            nodes = search.stats.nodes_explored,
            backtracks = search.stats.backtracks,
            propagations = search.stats.propagations,
            best_cost = ?search.stats.best_cost,
            optimal = verdict.is_optimal(),
            infeasible = verdict.is_infeasible(),
        );

        Ok(BackendOutcome {
            verdict,
            stats: search.stats,
        })
    }
}

/// Why the depth-first walk stopped before exhausting the tree.
enum Stop {
    BoundReached,
    LimitReached,
}

/// Propagation found an unsatisfiable constraint.
struct Conflict;

struct Search<'a> {
    model: &'a BinaryModel,
    limits: &'a SearchLimits,
    values: Vec<Option<bool>>,
    /// `(constraint, coefficient)` for every occurrence of a variable.
    occurrences: Vec<Vec<(usize, i64)>>,
    min_activity: Vec<i64>,
    max_activity: Vec<i64>,
    trail: Vec<VarId>,
    queue: Vec<usize>,
    queued: Vec<bool>,
    order: Vec<VarId>,
    first_values: Vec<bool>,
    fixed_cost: u64,
    best: Option<ModelSolution>,
    stats: SearchStats,
    started: Instant,
}

impl<'a> Search<'a> {
    fn new(model: &'a BinaryModel, limits: &'a SearchLimits, seed: Option<u64>) -> Self {
        let var_count = model.variable_count();
        let constraint_count = model.constraint_count();

        let mut occurrences = vec![Vec::new(); var_count];
        let mut min_activity = vec![0; constraint_count];
        let mut max_activity = vec![0; constraint_count];
        for (c, constraint) in model.constraints().iter().enumerate() {
            for term in constraint.terms() {
                let coefficient = i64::from(term.coefficient);
                occurrences[term.var.index()].push((c, coefficient));
                min_activity[c] += coefficient.min(0);
                max_activity[c] += coefficient.max(0);
            }
        }

        let mut seen = vec![false; var_count];
        let mut order = Vec::with_capacity(var_count);
        for &var in model.branch_order() {
            if !std::mem::replace(&mut seen[var.index()], true) {
                order.push(var);
            }
        }
        order.extend(
            (0..var_count)
                .filter(|&i| !seen[i])
                .map(VarId::from_index),
        );

        let mut rng = seed.map(ChaCha8Rng::seed_from_u64);
        let first_values = model
            .variables()
            .iter()
            .map(|variable| match rng.as_mut() {
                Some(rng) if variable.cost() == 0 => {
                    variable.preferred() ^ rng.random_bool(FLIP_PROBABILITY)
                }
                _ => variable.preferred(),
            })
            .collect();

        Self {
            model,
            limits,
            values: vec![None; var_count],
            occurrences,
            min_activity,
            max_activity,
            trail: Vec::with_capacity(var_count),
            queue: Vec::with_capacity(constraint_count),
            queued: vec![false; constraint_count],
            order,
            first_values,
            fixed_cost: 0,
            best: None,
            stats: SearchStats::default(),
            started: Instant::now(),
        }
    }

    fn run(&mut self) -> Verdict {
        self.stats.start();
        self.started = Instant::now();

        let verdict = if self.root().is_err() {
            Verdict::Infeasible
        } else {
            match self.search(0) {
                ControlFlow::Continue(()) | ControlFlow::Break(Stop::BoundReached) => {
                    match self.best.take() {
                        Some(solution) => Verdict::Optimal(solution),
                        None => Verdict::Infeasible,
                    }
                }
                ControlFlow::Break(Stop::LimitReached) => Verdict::LimitReached {
                    incumbent: self.best.take(),
                },
            }
        };

        self.stats.finish();
        verdict
    }

    /// Applies fixings and propagates every constraint once.
    fn root(&mut self) -> Result<(), Conflict> {
        let model = self.model;
        for &(var, value) in model.fixings() {
            if let Err(conflict) = self.assign(var, value) {
                self.clear_queue();
                return Err(conflict);
            }
        }
        for c in 0..model.constraint_count() {
            self.enqueue(c);
        }
        self.propagate()
    }

    fn search(&mut self, from: usize) -> ControlFlow<Stop> {
        self.check_limits()?;
        self.stats.record_node();

        if let Some(best) = &self.best {
            let bound = match self.model.partition_bound() {
                Some(partition) => partition.evaluate(&self.values).max(self.fixed_cost),
                None => self.fixed_cost,
            };
            if bound >= best.objective() {
                self.stats.record_backtrack();
                return ControlFlow::Continue(());
            }
        }

        let next = self.order[from..]
            .iter()
            .position(|var| self.values[var.index()].is_none())
            .map(|offset| from + offset);
        let Some(pos) = next else {
            return self.record_solution();
        };

        let var = self.order[pos];
        let first = self.first_values[var.index()];
        for value in [first, !first] {
            let mark = self.trail.len();
            let consistent = self
                .assign(var, value)
                .and_then(|()| self.propagate())
                .is_ok();
            let flow = if consistent {
                self.search(pos + 1)
            } else {
                self.clear_queue();
                self.stats.record_backtrack();
                ControlFlow::Continue(())
            };
            self.undo_to(mark);
            flow?;
        }
        ControlFlow::Continue(())
    }

    fn check_limits(&self) -> ControlFlow<Stop> {
        let nodes = self.stats.nodes_explored;
        if self.limits.is_node_limit_reached(nodes) {
            return ControlFlow::Break(Stop::LimitReached);
        }
        if nodes % TIME_CHECK_INTERVAL == 0
            && (self.limits.is_time_limit_reached(self.started)
                || self.limits.is_terminate_requested())
        {
            return ControlFlow::Break(Stop::LimitReached);
        }
        ControlFlow::Continue(())
    }

    fn record_solution(&mut self) -> ControlFlow<Stop> {
        let values: Vec<bool> = self.values.iter().map(|v| v.unwrap_or(false)).collect();
        if !self.model.is_satisfied_by(&values) {
            self.stats.record_backtrack();
            return ControlFlow::Continue(());
        }

        let cost = self.fixed_cost;
        self.stats.record_incumbent(cost);
        trace!(
            event = "incumbent",
            cost,
            nodes = self.stats.nodes_explored,
            elapsed_ms = self.started.elapsed().as_millis() as u64,
        );
        self.best = Some(ModelSolution::new(values, cost));

        if cost <= self.model.objective_lower_bound() {
            return ControlFlow::Break(Stop::BoundReached);
        }
        ControlFlow::Continue(())
    }

    fn assign(&mut self, var: VarId, value: bool) -> Result<(), Conflict> {
        match self.values[var.index()] {
            Some(current) if current == value => return Ok(()),
            Some(_) => return Err(Conflict),
            None => {}
        }

        self.values[var.index()] = Some(value);
        self.trail.push(var);
        if value {
            self.fixed_cost += self.model.variable(var).cost();
        }
        for &(c, coefficient) in &self.occurrences[var.index()] {
            let (min_delta, max_delta) = activity_delta(coefficient, value);
            self.min_activity[c] += min_delta;
            self.max_activity[c] += max_delta;
            if !self.queued[c] {
                self.queued[c] = true;
                self.queue.push(c);
            }
        }
        Ok(())
    }

    fn undo_to(&mut self, mark: usize) {
        while self.trail.len() > mark {
            let Some(var) = self.trail.pop() else {
                break;
            };
            let Some(value) = self.values[var.index()].take() else {
                continue;
            };
            if value {
                self.fixed_cost -= self.model.variable(var).cost();
            }
            for &(c, coefficient) in &self.occurrences[var.index()] {
                let (min_delta, max_delta) = activity_delta(coefficient, value);
                self.min_activity[c] -= min_delta;
                self.max_activity[c] -= max_delta;
            }
        }
    }

    fn enqueue(&mut self, c: usize) {
        if !self.queued[c] {
            self.queued[c] = true;
            self.queue.push(c);
        }
    }

    fn clear_queue(&mut self) {
        for c in self.queue.drain(..) {
            self.queued[c] = false;
        }
    }

    fn propagate(&mut self) -> Result<(), Conflict> {
        while let Some(c) = self.queue.pop() {
            self.queued[c] = false;
            if let Err(conflict) = self.propagate_constraint(c) {
                self.clear_queue();
                return Err(conflict);
            }
        }
        Ok(())
    }

    /// Fixes every free variable whose other value would break constraint `c`.
    ///
    /// Bounds read at entry may go stale while fixing; a stale bound is looser,
    /// so deductions stay valid and the re-queued constraint catches the rest.
    fn propagate_constraint(&mut self, c: usize) -> Result<(), Conflict> {
        let model = self.model;
        let constraint = &model.constraints()[c];
        let rhs = constraint.rhs();
        let (upper, lower) = match constraint.comparison() {
            Comparison::LessEq => (true, false),
            Comparison::Equal => (true, true),
            Comparison::GreaterEq => (false, true),
        };

        let min = self.min_activity[c];
        let max = self.max_activity[c];
        if (upper && min > rhs) || (lower && max < rhs) {
            return Err(Conflict);
        }

        for term in constraint.terms() {
            if self.values[term.var.index()].is_some() {
                continue;
            }
            let coefficient = i64::from(term.coefficient);
            let forced = if upper && coefficient > 0 && min + coefficient > rhs {
                Some(false)
            } else if upper && coefficient < 0 && min - coefficient > rhs {
                Some(true)
            } else if lower && coefficient > 0 && max - coefficient < rhs {
                Some(true)
            } else if lower && coefficient < 0 && max + coefficient < rhs {
                Some(false)
            } else {
                None
            };
            if let Some(value) = forced {
                self.assign(term.var, value)?;
                self.stats.record_propagations(1);
            }
        }
        Ok(())
    }
}

/// Change of `(min, max)` activity when a free variable gets `value`.
///
/// A free variable spans `[min(c, 0), max(c, 0)]`.
#[inline]
fn activity_delta(coefficient: i64, value: bool) -> (i64, i64) {
    if value {
        (coefficient.max(0), coefficient.min(0))
    } else {
        (-coefficient.min(0), -coefficient.max(0))
    }
}
