//! Independent check of the hard constraints of an assignment.
//!
//! Written without reference to the solver's own verification so tests can
//! cross-check it.

use std::collections::HashMap;

use groupmeet_core::{Assignment, ParticipantId, SchedulingProblem, SizeCostTable};

/// Lists every violated hard constraint; empty means the assignment is valid.
///
/// # Example
///
/// ```
/// use groupmeet_core::{Assignment, Group, ParticipantId, SchedulingProblem, Slot};
/// use groupmeet_test::{check_invariants, roster};
///
/// let problem = SchedulingProblem::new(roster(&["A", "B"]), Slot::catalog(["S1"]));
/// let mut assignment = Assignment::new(3);
/// assignment.push(
///     &problem.slots()[0],
///     Group::new(vec![ParticipantId::new("A"), ParticipantId::new("B")]),
/// );
/// assert!(check_invariants(&assignment, &problem, 1).is_empty());
/// ```
pub fn check_invariants(
    assignment: &Assignment,
    problem: &SchedulingProblem,
    max_groups_per_slot: usize,
) -> Vec<String> {
    let mut violations = Vec::new();
    let mut group_index: HashMap<&ParticipantId, usize> = HashMap::new();

    for (index, (slot, group)) in assignment.groups().enumerate() {
        if !(2..=4).contains(&group.len()) {
            violations.push(format!("group {group} has size {}", group.len()));
        }
        if !problem.slots().contains(slot) {
            violations.push(format!("group {group} uses unknown slot {slot}"));
        }
        for member in group.members() {
            if group_index.insert(member, index).is_some() {
                violations.push(format!("{member} appears in two groups"));
            }
            if problem.conflicts().is_busy(member, slot.index()) {
                violations.push(format!("{member} is busy in {slot}"));
            }
        }
    }

    for participant in problem.participants() {
        if !group_index.contains_key(participant.id()) {
            violations.push(format!("{} is not assigned", participant.id()));
        }
    }
    if group_index.len() != problem.participants().len() {
        violations.push(format!(
            "{} participants assigned, {} expected",
            group_index.len(),
            problem.participants().len()
        ));
    }

    for pre_group in problem.pre_groups() {
        let mut seen = pre_group
            .members()
            .iter()
            .map(|member| group_index.get(member).copied());
        if let Some(first) = seen.next() {
            if seen.any(|other| other != first) {
                violations.push(format!("pre-group {:?} is split", pre_group.members()));
            }
        }
    }

    for entry in assignment.iter() {
        if !entry.slot.is_overflow() && entry.groups.len() > max_groups_per_slot {
            violations.push(format!(
                "{} holds {} groups, capacity {max_groups_per_slot}",
                entry.slot,
                entry.groups.len()
            ));
        }
    }

    violations
}

/// Recomputes the objective of an assignment from its groups.
pub fn recompute_cost(
    assignment: &Assignment,
    size_costs: &SizeCostTable,
    overflow_cost_per_group: u64,
) -> Option<u64> {
    assignment.groups().try_fold(0u64, |total, (slot, group)| {
        let size = size_costs.cost_for_members(group.len())?;
        let overflow = if slot.is_overflow() {
            overflow_cost_per_group
        } else {
            0
        };
        Some(total + size + overflow)
    })
}
