//! Input checks run before any model is built.

use std::collections::{HashMap, HashSet};

use groupmeet_core::{GroupSize, ParticipantId, SchedulingProblem, ValidationError};

use crate::problem::SolverParameters;

/// Largest worst-case schedule cost accepted.
///
/// Every integer up to this value is exact as an `f64`, which keeps the
/// optimizer's objective and the reported cost in agreement.
pub const MAX_TOTAL_COST: u64 = 1 << 53;

/// Rejects inputs that cannot yield a valid model.
///
/// Checks run in a fixed order and the first failure is returned, so the
/// same input always reports the same error.
pub fn validate(
    problem: &SchedulingProblem,
    params: &SolverParameters,
) -> Result<(), ValidationError> {
    validate_participants(problem)?;

    if params.max_groups_per_slot == 0 {
        return Err(ValidationError::InvalidCapacity(params.max_groups_per_slot));
    }

    validate_slots(problem)?;
    validate_pre_groups(problem)?;
    validate_costs(problem, params)
}

fn validate_participants(problem: &SchedulingProblem) -> Result<(), ValidationError> {
    let participants = problem.participants();
    if participants.len() < GroupSize::MIN_MEMBERS {
        return Err(ValidationError::InsufficientParticipants {
            count: participants.len(),
        });
    }

    let mut seen = HashSet::with_capacity(participants.len());
    for participant in participants {
        if !seen.insert(participant.id()) {
            return Err(ValidationError::DuplicateParticipant(
                participant.id().clone(),
            ));
        }
    }
    Ok(())
}

fn validate_slots(problem: &SchedulingProblem) -> Result<(), ValidationError> {
    let mut seen = HashSet::with_capacity(problem.slots().len());
    for slot in problem.slots() {
        if !seen.insert(slot.index()) {
            return Err(ValidationError::DuplicateSlot(slot.index()));
        }
    }

    let overflow: Vec<usize> = problem
        .slots()
        .iter()
        .filter(|slot| slot.is_overflow())
        .map(|slot| slot.index())
        .collect();
    match overflow.len() {
        0 => Err(ValidationError::NoOverflowSlot),
        1 => Ok(()),
        _ => Err(ValidationError::MultipleOverflowSlots { indices: overflow }),
    }
}

fn validate_pre_groups(problem: &SchedulingProblem) -> Result<(), ValidationError> {
    let roster: HashSet<&ParticipantId> = problem.participants().iter().map(|p| p.id()).collect();
    let mut owner: HashMap<&ParticipantId, usize> = HashMap::new();

    for (index, pre_group) in problem.pre_groups().iter().enumerate() {
        if pre_group.is_empty() {
            return Err(ValidationError::EmptyPreGroup { index });
        }
        let mut listed = HashSet::with_capacity(pre_group.len());
        if let Some(member) = pre_group.members().iter().find(|m| !listed.insert(*m)) {
            return Err(ValidationError::DuplicateInPreGroup {
                index,
                participant: member.clone(),
            });
        }
        if pre_group.len() > GroupSize::MAX_MEMBERS {
            return Err(ValidationError::PreGroupTooLarge {
                index,
                size: pre_group.len(),
                max: GroupSize::MAX_MEMBERS,
            });
        }
        for member in pre_group.members() {
            if !roster.contains(member) {
                return Err(ValidationError::UnknownParticipantInPreGroup {
                    index,
                    participant: member.clone(),
                });
            }
            if let Some(&first) = owner.get(member) {
                return Err(ValidationError::PreGroupOverlap {
                    participant: member.clone(),
                    first,
                    second: index,
                });
            }
            owner.insert(member, index);
        }
    }
    Ok(())
}

/// Every group pays at most the dearest size plus the overflow penalty.
fn validate_costs(
    problem: &SchedulingProblem,
    params: &SolverParameters,
) -> Result<(), ValidationError> {
    let costs = &params.size_costs;
    let groups = problem.participants().len().div_ceil(GroupSize::MIN_MEMBERS) as u64;
    let worst = costs
        .pair
        .max(costs.trio)
        .max(costs.quad)
        .checked_add(params.overflow_cost_per_group)
        .and_then(|per_group| per_group.checked_mul(groups));
    match worst {
        Some(total) if total <= MAX_TOTAL_COST => Ok(()),
        _ => Err(ValidationError::CostTooLarge {
            limit: MAX_TOTAL_COST,
        }),
    }
}
