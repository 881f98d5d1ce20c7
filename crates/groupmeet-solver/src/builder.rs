//! Builds the 0-1 grouping model from a scheduling problem.
//!
//! Variables, per potential group `g` (there are `ceil(n / 2)` of them):
//!
//! - `member[i][g]`: participant `i` belongs to `g`
//! - `active[g]`: `g` has members
//! - `size[g][k]`: `g` has exactly `k` members, `k` in 2..=4
//! - `slot[g][p]`: `g` meets in the slot at position `p`
//! - `overflow[g]`: `g` meets in the overflow slot
//!
//! Groups are labeled canonically by their lowest-indexed member, so
//! participant `i` never joins a group with index above `i` and active
//! groups occupy a prefix of the index space. Both restrictions remove
//! relabelings only; every grouping keeps exactly one representation.

use std::collections::HashMap;

use groupmeet_core::{
    Assignment, BackendError, Group, GroupSize, ParticipantId, SchedulingProblem,
    ValidationError,
};
use tracing::debug;

use crate::backend::ModelSolution;
use crate::model::{
    cheapest_mixes, BinaryModel, Comparison, ConstraintClass, PartVars, PartitionBound, VarId,
};
use crate::problem::SolverParameters;
use crate::validation::validate;

/// Turns a validated problem into a `GroupingModel`.
///
/// # Example
///
/// ```
/// use groupmeet_core::{Participant, SchedulingProblem, Slot};
/// use groupmeet_solver::builder::ModelBuilder;
/// use groupmeet_solver::model::ConstraintClass;
/// use groupmeet_solver::SolverParameters;
///
/// let problem = SchedulingProblem::new(
///     ["A", "B", "C", "D", "E"].map(Participant::named).to_vec(),
///     Slot::catalog(["Thu AM", "Thu PM"]),
/// );
/// let grouping = ModelBuilder::new(&problem, SolverParameters::default())
///     .build()
///     .unwrap();
///
/// assert_eq!(grouping.potential_groups(), 3);
/// assert_eq!(grouping.model().constraint_count_of(ConstraintClass::Membership), 5);
/// ```
#[derive(Debug)]
pub struct ModelBuilder<'p> {
    problem: &'p SchedulingProblem,
    params: SolverParameters,
}

impl<'p> ModelBuilder<'p> {
    pub fn new(problem: &'p SchedulingProblem, params: SolverParameters) -> Self {
        Self { problem, params }
    }

    /// Validates the inputs and builds the model.
    pub fn build(self) -> Result<GroupingModel, ValidationError> {
        validate(self.problem, &self.params)?;

        let problem = self.problem;
        let params = self.params;
        let n = problem.participants().len();
        let slot_count = problem.slots().len();
        let groups = n.div_ceil(GroupSize::MIN_MEMBERS);
        let overflow_pos = problem
            .overflow_position()
            .ok_or(ValidationError::NoOverflowSlot)?;

        let mut model = BinaryModel::new("group_meeting");

        let membership: Vec<Vec<VarId>> = (0..n)
            .map(|i| {
                (0..groups)
                    .map(|g| model.add_variable(format!("member[{i}][{g}]"), 0))
                    .collect()
            })
            .collect();
        let active: Vec<VarId> = (0..groups)
            .map(|g| model.add_variable(format!("active[{g}]"), 0))
            .collect();
        let size: Vec<[VarId; 3]> = (0..groups)
            .map(|g| {
                GroupSize::ALL.map(|k| {
                    model.add_variable(format!("size[{g}][{k}]"), params.size_costs.cost(k))
                })
            })
            .collect();
        let placement: Vec<Vec<VarId>> = (0..groups)
            .map(|g| {
                (0..slot_count)
                    .map(|p| model.add_variable(format!("slot[{g}][{p}]"), 0))
                    .collect()
            })
            .collect();
        let overflow: Vec<VarId> = (0..groups)
            .map(|g| model.add_variable(format!("overflow[{g}]"), params.overflow_cost_per_group))
            .collect();

        for row in &membership {
            model.add_constraint(
                ConstraintClass::Membership,
                row.iter().map(|&y| (y, 1)),
                Comparison::Equal,
                1,
            );
        }

        for g in 0..groups {
            let member_count = (0..n).map(|i| (membership[i][g], 1));
            let size_terms = GroupSize::ALL
                .iter()
                .zip(size[g])
                .map(|(k, s)| (s, -(k.members() as i32)));
            model.add_constraint(
                ConstraintClass::GroupSize,
                member_count.chain(size_terms),
                Comparison::Equal,
                0,
            );
            model.add_constraint(
                ConstraintClass::GroupSize,
                size[g].iter().map(|&s| (s, 1)).chain([(active[g], -1)]),
                Comparison::Equal,
                0,
            );

            model.add_constraint(
                ConstraintClass::SlotChoice,
                placement[g].iter().map(|&x| (x, 1)).chain([(active[g], -1)]),
                Comparison::Equal,
                0,
            );

            model.add_constraint(
                ConstraintClass::OverflowUsage,
                [(overflow[g], 1), (placement[g][overflow_pos], -1)],
                Comparison::Equal,
                0,
            );
        }

        for p in (0..slot_count).filter(|&p| p != overflow_pos) {
            model.add_constraint(
                ConstraintClass::Capacity,
                (0..groups).map(|g| (placement[g][p], 1)),
                Comparison::LessEq,
                params.max_groups_per_slot as i64,
            );
        }

        for i in 0..n {
            for p in (0..slot_count).filter(|&p| problem.is_busy_at(i, p)) {
                for g in 0..=i.min(groups - 1) {
                    model.add_constraint(
                        ConstraintClass::Conflict,
                        [(membership[i][g], 1), (placement[g][p], 1)],
                        Comparison::LessEq,
                        1,
                    );
                }
            }
        }

        let position: HashMap<&ParticipantId, usize> = problem
            .participants()
            .iter()
            .enumerate()
            .map(|(i, participant)| (participant.id(), i))
            .collect();
        for pre_group in problem.pre_groups() {
            let members: Vec<usize> = pre_group
                .members()
                .iter()
                .filter_map(|id| position.get(id).copied())
                .collect();
            let Some((&anchor, rest)) = members.split_first() else {
                continue;
            };
            for &other in rest {
                for g in 0..groups {
                    model.add_constraint(
                        ConstraintClass::CoGrouping,
                        [(membership[anchor][g], 1), (membership[other][g], -1)],
                        Comparison::Equal,
                        0,
                    );
                }
            }
        }

        for g in 1..groups {
            model.add_constraint(
                ConstraintClass::Symmetry,
                [(active[g], 1), (active[g - 1], -1)],
                Comparison::LessEq,
                0,
            );
        }
        for (i, row) in membership.iter().enumerate() {
            for &y in row.iter().skip(i + 1) {
                model.fix(y, false);
            }
        }

        // Group-major: open a group, pick its cheapest size, a regular slot,
        // then fill it in participant order.
        let sizes_by_cost = params.size_costs.sizes_by_cost();
        let mut order = Vec::with_capacity(model.variable_count());
        for g in 0..groups {
            order.push(active[g]);
            model.set_preferred(active[g], true);
            for k in sizes_by_cost {
                let s = size[g][size_position(k)];
                order.push(s);
                model.set_preferred(s, true);
            }
            for p in (0..slot_count).filter(|&p| p != overflow_pos) {
                order.push(placement[g][p]);
                model.set_preferred(placement[g][p], true);
            }
            order.push(placement[g][overflow_pos]);
            model.set_preferred(placement[g][overflow_pos], true);
            for row in membership.iter().skip(g) {
                order.push(row[g]);
                model.set_preferred(row[g], true);
            }
        }
        order.extend(overflow.iter().copied());
        model.set_branch_order(order);

        let regular_slots = slot_count - 1;
        let bound = objective_lower_bound(n, regular_slots, &params);
        model.set_objective_lower_bound(bound);

        let parts = (0..groups)
            .map(|g| PartVars {
                sizes: GroupSize::ALL
                    .iter()
                    .zip(size[g])
                    .map(|(&k, s)| (s, k.members(), params.size_costs.cost(k)))
                    .collect(),
                capped: (0..slot_count)
                    .filter(|&p| p != overflow_pos)
                    .map(|p| placement[g][p])
                    .collect(),
                overflow: overflow[g],
            })
            .collect();
        model.set_partition_bound(PartitionBound::new(
            membership.clone(),
            parts,
            regular_slots,
            params.max_groups_per_slot,
            params.overflow_cost_per_group,
        ));

        debug!(
            event = "model_built",
            participants = n,
            slots = slot_count,
            potential_groups = groups,
            variables = model.variable_count(),
            constraints = model.constraint_count(),
            conflict_constraints = model.constraint_count_of(ConstraintClass::Conflict),
            co_grouping_constraints = model.constraint_count_of(ConstraintClass::CoGrouping),
            lower_bound = bound,
        );

        Ok(GroupingModel {
            model,
            participants: problem.participants().iter().map(|p| p.id().clone()).collect(),
            membership,
            placement,
        })
    }
}

fn size_position(size: GroupSize) -> usize {
    match size {
        GroupSize::Pair => 0,
        GroupSize::Trio => 1,
        GroupSize::Quad => 2,
    }
}

/// Cheapest conceivable objective, ignoring conflicts and pre-groups.
///
/// For every feasible group count `K`, the cheapest size mix with `K` groups
/// covering `n` participants, plus the overflow cost of the groups that
/// cannot fit into `regular_slots` capped slots.
pub(crate) fn objective_lower_bound(
    n: usize,
    regular_slots: usize,
    params: &SolverParameters,
) -> u64 {
    let sizes = GroupSize::ALL.map(|k| (k.members(), params.size_costs.cost(k)));
    let regular_capacity = params.max_groups_per_slot.saturating_mul(regular_slots);
    let mixes = cheapest_mixes(&sizes, n);

    mixes
        .get(n)
        .into_iter()
        .flatten()
        .enumerate()
        .filter_map(|(k, mix)| {
            let overflow_groups = k.saturating_sub(regular_capacity) as u64;
            mix.map(|cost| {
                cost.saturating_add(overflow_groups.saturating_mul(params.overflow_cost_per_group))
            })
        })
        .min()
        .unwrap_or(0)
}

/// A built grouping model plus the variable layout needed to decode it.
#[derive(Debug, Clone)]
pub struct GroupingModel {
    model: BinaryModel,
    participants: Vec<ParticipantId>,
    membership: Vec<Vec<VarId>>,
    placement: Vec<Vec<VarId>>,
}

impl GroupingModel {
    pub fn model(&self) -> &BinaryModel {
        &self.model
    }

    pub fn potential_groups(&self) -> usize {
        self.placement.len()
    }

    /// Reads groups and their slots back from a model solution.
    ///
    /// Potential groups without members are dropped. A group with members
    /// but no slot means the backend broke the model.
    pub fn decode(
        &self,
        solution: &ModelSolution,
        problem: &SchedulingProblem,
    ) -> Result<Assignment, BackendError> {
        let mut assignment = Assignment::new(solution.objective());
        for (g, slots) in self.placement.iter().enumerate() {
            let members: Vec<ParticipantId> = self
                .membership
                .iter()
                .zip(&self.participants)
                .filter(|(row, _)| solution.value(row[g]))
                .map(|(_, id)| id.clone())
                .collect();
            if members.is_empty() {
                continue;
            }
            let slot_pos = slots
                .iter()
                .position(|&x| solution.value(x))
                .ok_or_else(|| {
                    BackendError::InvalidSolution(format!(
                        "group #{g} has {} members but no slot",
                        members.len()
                    ))
                })?;
            assignment.push(&problem.slots()[slot_pos], Group::new(members));
        }
        Ok(assignment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use groupmeet_core::{ConflictMatrix, Participant, PreGroup, SizeCostTable, Slot};

    fn roster(n: usize) -> Vec<Participant> {
        (0..n).map(|i| Participant::named(format!("P{i}"))).collect()
    }

    #[test]
    fn test_constraint_counts() {
        let problem = SchedulingProblem::new(roster(4), Slot::catalog(["S1", "S2"]))
            .with_conflicts(ConflictMatrix::new().with_busy("P0", 0))
            .with_pre_groups(vec![PreGroup::new(["P1", "P3"])]);
        let grouping = ModelBuilder::new(&problem, SolverParameters::default())
            .build()
            .unwrap();
        let model = grouping.model();

        assert_eq!(grouping.potential_groups(), 2);
        assert_eq!(model.constraint_count_of(ConstraintClass::Membership), 4);
        assert_eq!(model.constraint_count_of(ConstraintClass::GroupSize), 4);
        assert_eq!(model.constraint_count_of(ConstraintClass::SlotChoice), 2);
        assert_eq!(model.constraint_count_of(ConstraintClass::OverflowUsage), 2);
        assert_eq!(model.constraint_count_of(ConstraintClass::Capacity), 1);
        // P0 can only join group 0.
        assert_eq!(model.constraint_count_of(ConstraintClass::Conflict), 1);
        assert_eq!(model.constraint_count_of(ConstraintClass::CoGrouping), 2);
        assert_eq!(model.constraint_count_of(ConstraintClass::Symmetry), 1);
        // member[0][1] is the only relabeling fixing.
        assert_eq!(model.fixings().len(), 1);
        assert!(model.validate().is_ok());
    }

    #[test]
    fn test_build_rejects_invalid_input() {
        let problem = SchedulingProblem::new(roster(1), Slot::catalog(["S1"]));
        let err = ModelBuilder::new(&problem, SolverParameters::default())
            .build()
            .unwrap_err();
        assert_eq!(err, ValidationError::InsufficientParticipants { count: 1 });
    }

    #[test]
    fn test_lower_bound_single_overflow_slot() {
        // Six people, no capped slot: two trios (4) plus two overflow groups (4).
        let params = SolverParameters::default();
        assert_eq!(objective_lower_bound(6, 0, &params), 8);
    }

    #[test]
    fn test_lower_bound_prefers_pairs_when_they_fit() {
        let params = SolverParameters::default().with_max_groups_per_slot(1);
        // Two pairs, one of them in overflow: 2 + 2 beats one quad at 5.
        assert_eq!(objective_lower_bound(4, 1, &params), 4);

        let params = params.with_overflow_cost(10);
        assert_eq!(objective_lower_bound(4, 1, &params), 5);
    }

    #[test]
    fn test_lower_bound_with_flat_costs() {
        let params = SolverParameters::default()
            .with_size_costs(SizeCostTable::new(1, 1, 1))
            .with_overflow_cost(0);
        // Nine people need at least three groups.
        assert_eq!(objective_lower_bound(9, 3, &params), 3);
    }

    #[test]
    fn test_partition_bound_agrees_with_root_bound() {
        let problem = SchedulingProblem::new(roster(6), Slot::catalog(["S1"]));
        let grouping = ModelBuilder::new(&problem, SolverParameters::default())
            .build()
            .unwrap();
        let model = grouping.model();
        let free = vec![None; model.variable_count()];

        let partition = model.partition_bound().unwrap();
        assert_eq!(model.objective_lower_bound(), 8);
        assert_eq!(partition.evaluate(&free), 8);
        assert!(model.relaxed(ConstraintClass::Capacity).partition_bound().is_some());
        assert!(model.relaxed(ConstraintClass::Membership).partition_bound().is_none());
        assert!(model.feasibility_only().partition_bound().is_none());
    }
}
