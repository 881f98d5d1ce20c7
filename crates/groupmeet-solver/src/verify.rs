//! Independent check of a decoded assignment.

use std::collections::{HashMap, HashSet};

use groupmeet_core::{Assignment, BackendError, GroupSize, ParticipantId, SchedulingProblem};

use crate::problem::SolverParameters;

/// Recomputes the cost of an assignment from its groups.
///
/// Returns `None` if some group has an inadmissible size or the total
/// does not fit in a `u64`.
pub fn assignment_cost(assignment: &Assignment, params: &SolverParameters) -> Option<u64> {
    let mut total = 0u64;
    for (slot, group) in assignment.groups() {
        total = total.checked_add(params.size_costs.cost_for_members(group.len())?)?;
        if slot.is_overflow() {
            total = total.checked_add(params.overflow_cost_per_group)?;
        }
    }
    Some(total)
}

/// Checks every hard invariant and the reported cost.
///
/// A failure means the backend returned something the model forbids.
pub fn verify(
    assignment: &Assignment,
    problem: &SchedulingProblem,
    params: &SolverParameters,
) -> Result<(), BackendError> {
    let invalid = |msg: String| Err(BackendError::InvalidSolution(msg));

    let roster: HashSet<&ParticipantId> = problem.participants().iter().map(|p| p.id()).collect();
    let mut placed: HashMap<&ParticipantId, usize> = HashMap::new();

    for (position, (slot, group)) in assignment.groups().enumerate() {
        if GroupSize::from_members(group.len()).is_none() {
            return invalid(format!("group {group} has {} members", group.len()));
        }
        for member in group.members() {
            if !roster.contains(member) {
                return invalid(format!("group {group} contains unknown participant '{member}'"));
            }
            if placed.insert(member, position).is_some() {
                return invalid(format!("participant '{member}' is in more than one group"));
            }
            if problem.conflicts().is_busy(member, slot.index()) {
                return invalid(format!(
                    "participant '{member}' is busy in slot '{}'",
                    slot.label()
                ));
            }
        }
    }

    if let Some(missing) = problem
        .participants()
        .iter()
        .find(|p| !placed.contains_key(p.id()))
    {
        return invalid(format!("participant '{}' is not in any group", missing.id()));
    }

    for (index, pre_group) in problem.pre_groups().iter().enumerate() {
        let groups: HashSet<usize> = pre_group
            .members()
            .iter()
            .filter_map(|member| placed.get(member).copied())
            .collect();
        if groups.len() > 1 {
            return invalid(format!("pre-group #{index} is split across groups"));
        }
    }

    for entry in assignment.iter() {
        if !entry.slot.is_overflow() && entry.groups.len() > params.max_groups_per_slot {
            return invalid(format!(
                "slot '{}' holds {} groups, capacity is {}",
                entry.slot.label(),
                entry.groups.len(),
                params.max_groups_per_slot
            ));
        }
    }

    match assignment_cost(assignment, params) {
        Some(cost) if cost == assignment.cost() => Ok(()),
        Some(cost) => invalid(format!(
            "reported cost {} differs from recomputed cost {cost}",
            assignment.cost()
        )),
        None => invalid("assignment cost is undefined or overflows".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use groupmeet_core::{ConflictMatrix, Group, Participant, PreGroup, Slot};

    fn problem() -> SchedulingProblem {
        SchedulingProblem::new(
            ["A", "B", "C", "D"].map(Participant::named).to_vec(),
            Slot::catalog(["S1", "S2"]),
        )
        .with_conflicts(ConflictMatrix::new().with_busy("A", 0))
        .with_pre_groups(vec![PreGroup::new(["C", "D"])])
    }

    fn group(ids: &[&str]) -> Group {
        Group::new(ids.iter().map(|&id| ParticipantId::new(id)).collect())
    }

    fn params() -> SolverParameters {
        SolverParameters::default().with_max_groups_per_slot(1)
    }

    #[test]
    fn test_valid_assignment_passes() {
        let p = problem();
        let mut assignment = Assignment::new(1 + 1 + 2);
        assignment.push(&p.slots()[0], group(&["C", "D"]));
        assignment.push(&p.slots()[1], group(&["A", "B"]));
        assert_eq!(assignment_cost(&assignment, &params()), Some(4));
        assert_eq!(verify(&assignment, &p, &params()), Ok(()));
    }

    #[test]
    fn test_conflict_detected() {
        let p = problem();
        let mut assignment = Assignment::new(4);
        assignment.push(&p.slots()[0], group(&["A", "B"]));
        assignment.push(&p.slots()[1], group(&["C", "D"]));
        assert!(matches!(
            verify(&assignment, &p, &params()),
            Err(BackendError::InvalidSolution(msg)) if msg.contains("busy")
        ));
    }

    #[test]
    fn test_missing_participant_detected() {
        let p = problem();
        let mut assignment = Assignment::new(3);
        assignment.push(&p.slots()[1], group(&["A", "B", "C"]));
        assert!(verify(&assignment, &p, &params()).is_err());
    }

    #[test]
    fn test_split_pre_group_detected() {
        let p = problem();
        let mut assignment = Assignment::new(2 + 2 + 2);
        assignment.push(&p.slots()[1], group(&["A", "C"]));
        assignment.push(&p.slots()[1], group(&["B", "D"]));
        assert!(matches!(
            verify(&assignment, &p, &params()),
            Err(BackendError::InvalidSolution(msg)) if msg.contains("split")
        ));
    }

    #[test]
    fn test_capacity_and_cost_detected() {
        let free = SchedulingProblem::new(
            ["A", "B", "C", "D"].map(Participant::named).to_vec(),
            Slot::catalog(["S1", "S2"]),
        );
        let mut over = Assignment::new(2);
        over.push(&free.slots()[0], group(&["A", "B"]));
        over.push(&free.slots()[0], group(&["C", "D"]));
        assert!(matches!(
            verify(&over, &free, &params()),
            Err(BackendError::InvalidSolution(msg)) if msg.contains("capacity")
        ));
        assert_eq!(
            verify(&over, &free, &params().with_max_groups_per_slot(2)),
            Ok(())
        );

        let p = problem();

        let mut wrong_cost = Assignment::new(99);
        wrong_cost.push(&p.slots()[1], group(&["A", "B", "C", "D"]));
        assert!(matches!(
            verify(&wrong_cost, &p, &params()),
            Err(BackendError::InvalidSolution(msg)) if msg.contains("cost")
        ));
    }

    #[test]
    fn test_singleton_rejected() {
        let p = problem();
        let mut assignment = Assignment::new(0);
        assignment.push(&p.slots()[1], group(&["A"]));
        assert_eq!(assignment_cost(&assignment, &params()), None);
        assert!(verify(&assignment, &p, &params()).is_err());
    }

    #[test]
    fn test_cost_overflow_is_reported_not_wrapped() {
        let p = problem();
        let params = params().with_overflow_cost(u64::MAX);
        let mut assignment = Assignment::new(0);
        assignment.push(&p.slots()[1], group(&["A", "B"]));
        assignment.push(&p.slots()[1], group(&["C", "D"]));
        assert_eq!(assignment_cost(&assignment, &params), None);
        assert!(matches!(
            verify(&assignment, &p, &params),
            Err(BackendError::InvalidSolution(msg)) if msg.contains("overflows")
        ));
    }
}
