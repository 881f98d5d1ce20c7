//! Explains an infeasible verdict.
//!
//! Three checks, cheapest first:
//! 1. a pre-group (or a participant outside any pre-group) whose members
//!    share no free slot can never be placed;
//! 2. otherwise the model is re-solved without the capacity constraints as
//!    a pure feasibility question; a solution means capacity is to blame;
//! 3. infeasibility without capacity means the grouping itself is impossible.

use std::collections::HashSet;

use groupmeet_core::{BackendError, InfeasibilityCause, ParticipantId, SchedulingProblem};
use tracing::debug;

use crate::backend::{run_guarded, Backend, Verdict};
use crate::builder::GroupingModel;
use crate::model::ConstraintClass;
use crate::problem::SolverParameters;
use crate::stats::SearchStats;
use crate::termination::SearchLimits;

/// Returns the members of the first placement unit with no common free slot.
///
/// Units are the pre-groups in order, then every participant outside all
/// pre-groups in roster order.
pub fn find_unschedulable(problem: &SchedulingProblem) -> Option<Vec<ParticipantId>> {
    let grouped: HashSet<&ParticipantId> = problem
        .pre_groups()
        .iter()
        .flat_map(|pre_group| pre_group.members())
        .collect();

    let pre_group_units = problem
        .pre_groups()
        .iter()
        .map(|pre_group| pre_group.members().to_vec());
    let single_units = problem
        .participants()
        .iter()
        .filter(|p| !grouped.contains(p.id()))
        .map(|p| vec![p.id().clone()]);

    pre_group_units.chain(single_units).find(|members| {
        !problem.slots().iter().any(|slot| {
            members
                .iter()
                .all(|member| !problem.conflicts().is_busy(member, slot.index()))
        })
    })
}

/// Determines which constraint class makes the problem infeasible.
///
/// Backend runs spend from `limits`; their counters are added to `stats`.
pub fn diagnose(
    problem: &SchedulingProblem,
    params: &SolverParameters,
    grouping: &GroupingModel,
    backend: &dyn Backend,
    limits: &SearchLimits,
    stats: &mut SearchStats,
) -> Result<InfeasibilityCause, BackendError> {
    if let Some(members) = find_unschedulable(problem) {
        debug!(event = "diagnosis", cause = "unschedulable_members", units = members.len());
        return Ok(InfeasibilityCause::UnschedulableMembers { members });
    }

    if limits.is_exhausted() {
        debug!(event = "diagnosis", cause = "undetermined", reason = "budget spent");
        return Ok(InfeasibilityCause::Undetermined);
    }

    let uncapped = grouping
        .model()
        .relaxed(ConstraintClass::Capacity)
        .feasibility_only();
    let outcome = run_guarded(backend, &uncapped, limits)?;
    stats.merge(&outcome.stats);

    let cause = match outcome.verdict {
        Verdict::Optimal(_) | Verdict::LimitReached { incumbent: Some(_) } => {
            InfeasibilityCause::Capacity {
                max_groups_per_slot: params.max_groups_per_slot,
            }
        }
        Verdict::Infeasible => InfeasibilityCause::Grouping,
        Verdict::LimitReached { incumbent: None } => InfeasibilityCause::Undetermined,
    };
    debug!(
        event = "diagnosis",
        cause = %cause,
        nodes = outcome.stats.nodes_explored,
    );
    Ok(cause)
}
