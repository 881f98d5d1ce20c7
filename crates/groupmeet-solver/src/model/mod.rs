//! Backend-neutral 0-1 linear model.
//!
//! A `BinaryModel` holds binary variables with non-negative objective
//! coefficients and linear constraints over them. Model builders produce it,
//! backends consume it; nothing in here knows about participants or slots.

mod bound;

use std::fmt;

use groupmeet_core::BackendError;
use smallvec::SmallVec;

pub use bound::{cheapest_mixes, PartVars, PartitionBound};

/// Handle of a binary variable inside one model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(u32);

impl VarId {
    #[inline]
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Relation between the left-hand side and the right-hand side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    LessEq,
    Equal,
    GreaterEq,
}

/// Which part of the formulation a constraint belongs to.
///
/// Backends ignore the class; it lets callers count, relax or report
/// constraints by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintClass {
    /// Every participant joins exactly one potential group.
    Membership,
    /// Member count matches exactly one size indicator of an active group.
    GroupSize,
    /// An active group meets in exactly one slot.
    SlotChoice,
    /// Non-overflow slots hold a bounded number of groups.
    Capacity,
    /// Busy members keep their group out of a slot.
    Conflict,
    /// Pre-group members share every membership decision.
    CoGrouping,
    /// Ties the overflow indicator to the overflow placement.
    OverflowUsage,
    /// Removes relabelings of the same grouping.
    Symmetry,
}

impl fmt::Display for ConstraintClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConstraintClass::Membership => "Membership",
            ConstraintClass::GroupSize => "GroupSize",
            ConstraintClass::SlotChoice => "SlotChoice",
            ConstraintClass::Capacity => "Capacity",
            ConstraintClass::Conflict => "Conflict",
            ConstraintClass::CoGrouping => "CoGrouping",
            ConstraintClass::OverflowUsage => "OverflowUsage",
            ConstraintClass::Symmetry => "Symmetry",
        };
        f.write_str(name)
    }
}

/// `coefficient * var` on the left-hand side of a constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Term {
    pub var: VarId,
    pub coefficient: i32,
}

/// `Σ terms  (<= | == | >=)  rhs`
#[derive(Debug, Clone)]
pub struct LinearConstraint {
    class: ConstraintClass,
    terms: SmallVec<[Term; 4]>,
    comparison: Comparison,
    rhs: i64,
}

impl LinearConstraint {
    pub fn class(&self) -> ConstraintClass {
        self.class
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn comparison(&self) -> Comparison {
        self.comparison
    }

    pub fn rhs(&self) -> i64 {
        self.rhs
    }

    /// Evaluates the left-hand side under a complete assignment.
    pub fn activity(&self, values: &[bool]) -> i64 {
        self.terms
            .iter()
            .filter(|t| values[t.var.index()])
            .map(|t| i64::from(t.coefficient))
            .sum()
    }

    pub fn is_satisfied_by(&self, values: &[bool]) -> bool {
        let lhs = self.activity(values);
        match self.comparison {
            Comparison::LessEq => lhs <= self.rhs,
            Comparison::Equal => lhs == self.rhs,
            Comparison::GreaterEq => lhs >= self.rhs,
        }
    }
}

/// A binary decision variable.
#[derive(Debug, Clone)]
pub struct Variable {
    name: String,
    cost: u64,
    preferred: bool,
}

impl Variable {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Objective coefficient, paid when the variable is 1.
    pub fn cost(&self) -> u64 {
        self.cost
    }

    /// Value a backend should try first when branching.
    pub fn preferred(&self) -> bool {
        self.preferred
    }
}

/// Minimize `Σ cost(v) · v` subject to linear constraints over binaries.
///
/// # Examples
///
/// ```
/// use groupmeet_solver::model::{BinaryModel, Comparison, ConstraintClass};
///
/// let mut model = BinaryModel::new("pick_one");
/// let a = model.add_variable("a", 3);
/// let b = model.add_variable("b", 1);
/// model.add_constraint(
///     ConstraintClass::Membership,
///     [(a, 1), (b, 1)],
///     Comparison::Equal,
///     1,
/// );
///
/// assert_eq!(model.variable_count(), 2);
/// assert_eq!(model.objective(&[false, true]), 1);
/// assert!(model.is_satisfied_by(&[false, true]));
/// assert!(!model.is_satisfied_by(&[true, true]));
/// ```
#[derive(Debug, Clone)]
pub struct BinaryModel {
    name: String,
    variables: Vec<Variable>,
    constraints: Vec<LinearConstraint>,
    fixings: Vec<(VarId, bool)>,
    branch_order: Vec<VarId>,
    objective_lower_bound: u64,
    partition_bound: Option<PartitionBound>,
}

impl BinaryModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variables: Vec::new(),
            constraints: Vec::new(),
            fixings: Vec::new(),
            branch_order: Vec::new(),
            objective_lower_bound: 0,
            partition_bound: None,
        }
    }

    /// Adds a binary variable with the given objective coefficient.
    pub fn add_variable(&mut self, name: impl Into<String>, cost: u64) -> VarId {
        let id = VarId(self.variables.len() as u32);
        self.variables.push(Variable {
            name: name.into(),
            cost,
            preferred: false,
        });
        id
    }

    /// Sets the value a backend should branch on first.
    pub fn set_preferred(&mut self, var: VarId, value: bool) {
        self.variables[var.index()].preferred = value;
    }

    /// Adds `Σ coefficient · var  comparison  rhs`.
    pub fn add_constraint<I>(
        &mut self,
        class: ConstraintClass,
        terms: I,
        comparison: Comparison,
        rhs: i64,
    ) where
        I: IntoIterator<Item = (VarId, i32)>,
    {
        let terms = terms
            .into_iter()
            .map(|(var, coefficient)| Term { var, coefficient })
            .collect();
        self.constraints.push(LinearConstraint {
            class,
            terms,
            comparison,
            rhs,
        });
    }

    /// Fixes a variable before search starts.
    pub fn fix(&mut self, var: VarId, value: bool) {
        self.fixings.push((var, value));
    }

    /// Sets the order in which a backend should branch on variables.
    ///
    /// Variables missing from the order are branched on last, by id.
    pub fn set_branch_order(&mut self, order: Vec<VarId>) {
        self.branch_order = order;
    }

    /// Records a proven lower bound on the optimal objective.
    ///
    /// A backend may stop as soon as an incumbent reaches it.
    pub fn set_objective_lower_bound(&mut self, bound: u64) {
        self.objective_lower_bound = bound;
    }

    /// Attaches a completion bound used to prune partial assignments.
    pub fn set_partition_bound(&mut self, bound: PartitionBound) {
        self.partition_bound = Some(bound);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn variable(&self, var: VarId) -> &Variable {
        &self.variables[var.index()]
    }

    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    pub fn fixings(&self) -> &[(VarId, bool)] {
        &self.fixings
    }

    pub fn branch_order(&self) -> &[VarId] {
        &self.branch_order
    }

    pub fn objective_lower_bound(&self) -> u64 {
        self.objective_lower_bound
    }

    pub fn partition_bound(&self) -> Option<&PartitionBound> {
        self.partition_bound.as_ref()
    }

    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Counts constraints of one class.
    pub fn constraint_count_of(&self, class: ConstraintClass) -> usize {
        self.constraints.iter().filter(|c| c.class == class).count()
    }

    /// Returns a copy without the constraints of `class`.
    ///
    /// The objective lower bound is reset since it may rely on them. The
    /// partition bound survives relaxations it does not read.
    pub fn relaxed(&self, class: ConstraintClass) -> BinaryModel {
        let mut model = self.clone();
        model.constraints.retain(|c| c.class != class);
        model.objective_lower_bound = 0;
        model.partition_bound = match class {
            ConstraintClass::Capacity => model.partition_bound.map(PartitionBound::uncapped),
            ConstraintClass::Conflict | ConstraintClass::CoGrouping | ConstraintClass::Symmetry => {
                model.partition_bound
            }
            _ => None,
        };
        model
    }

    /// Returns a copy with every objective coefficient set to zero.
    ///
    /// Any feasible solution of the copy is optimal, which turns a backend
    /// into a feasibility check.
    pub fn feasibility_only(&self) -> BinaryModel {
        let mut model = self.clone();
        for variable in &mut model.variables {
            variable.cost = 0;
        }
        model.objective_lower_bound = 0;
        model.partition_bound = None;
        model
    }

    /// Evaluates the objective under a complete assignment.
    ///
    /// Saturates at `u64::MAX`; [`validate`](Self::validate) rejects models
    /// whose total cost could get there.
    pub fn objective(&self, values: &[bool]) -> u64 {
        self.variables
            .iter()
            .zip(values)
            .filter(|(_, &value)| value)
            .fold(0u64, |total, (variable, _)| total.saturating_add(variable.cost))
    }

    /// Returns the index of the first violated constraint or fixing.
    pub fn first_violation(&self, values: &[bool]) -> Option<usize> {
        if values.len() != self.variables.len() {
            return Some(0);
        }
        if let Some(pos) = self
            .fixings
            .iter()
            .position(|&(var, value)| values[var.index()] != value)
        {
            return Some(pos);
        }
        self.constraints
            .iter()
            .position(|c| !c.is_satisfied_by(values))
    }

    pub fn is_satisfied_by(&self, values: &[bool]) -> bool {
        self.first_violation(values).is_none()
    }

    /// Checks that every referenced variable exists and that the objective
    /// cannot overflow.
    pub fn validate(&self) -> Result<(), BackendError> {
        if self
            .variables
            .iter()
            .try_fold(0u64, |total, variable| total.checked_add(variable.cost))
            .is_none()
        {
            return Err(BackendError::MalformedModel(format!(
                "objective of '{}' can exceed {}",
                self.name,
                u64::MAX
            )));
        }

        let count = self.variables.len();
        let out_of_range = |var: VarId| var.index() >= count;

        for (i, constraint) in self.constraints.iter().enumerate() {
            if let Some(term) = constraint.terms.iter().find(|t| out_of_range(t.var)) {
                return Err(BackendError::MalformedModel(format!(
                    "constraint #{i} ({}) references unknown variable {}",
                    constraint.class, term.var
                )));
            }
        }
        if let Some(&(var, _)) = self.fixings.iter().find(|&&(var, _)| out_of_range(var)) {
            return Err(BackendError::MalformedModel(format!(
                "fixing references unknown variable {var}"
            )));
        }
        if let Some(&var) = self.branch_order.iter().find(|&&var| out_of_range(var)) {
            return Err(BackendError::MalformedModel(format!(
                "branch order references unknown variable {var}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
