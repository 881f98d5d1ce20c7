//! End-to-end tests for the reference scheduling rounds.

use groupmeet::prelude::*;
use groupmeet::{InfeasibilityCause, SearchLimits, ValidationError};
use groupmeet_test::{check_invariants, scenarios, Scenario};

fn solver_for(scenario: &Scenario) -> GroupAssignmentSolver {
    let config = SchedulerConfig::new().with_max_groups_per_slot(scenario.max_groups_per_slot);
    GroupAssignmentSolver::new(&config).with_limits(SearchLimits::seconds(10))
}

fn solve(scenario: &Scenario) -> Result<Assignment, SchedulingError> {
    solver_for(scenario).solve(&scenario.problem)
}

fn assert_valid(scenario: &Scenario, assignment: &Assignment) {
    let violations = check_invariants(assignment, &scenario.problem, scenario.max_groups_per_slot);
    assert!(violations.is_empty(), "{}: {violations:?}", scenario.name);
}

#[test]
fn test_single_overflow_slot_holds_everyone() {
    let scenario = scenarios::single_overflow_slot();
    let assignment = solve(&scenario).unwrap();
    assert_valid(&scenario, &assignment);

    assert_eq!(assignment.participant_count(), 6);
    assert_eq!(assignment.groups_in(0).len(), assignment.group_count());
    // Two trios beat three pairs once each group pays the overflow cost.
    assert_eq!(assignment.group_count(), 2);
    assert_eq!(assignment.cost(), 8);
}

#[test]
fn test_conflict_pushes_group_to_overflow() {
    let scenario = scenarios::conflict_forces_overflow();
    let assignment = solve(&scenario).unwrap();
    assert_valid(&scenario, &assignment);

    let (slot, group) = assignment.group_of(&"A".into()).unwrap();
    assert!(slot.is_overflow());
    assert_eq!(slot.label(), "S2");
    assert_eq!(group.len(), 2);
    assert_eq!(assignment.groups_in(0).len(), 1);
    assert_eq!(assignment.cost(), 4);
}

#[test]
fn test_mandatory_pair_stays_together() {
    let scenario = scenarios::mandatory_pair();
    let assignment = solve(&scenario).unwrap();
    assert_valid(&scenario, &assignment);

    let (_, group) = assignment.group_of(&"E".into()).unwrap();
    assert!(group.contains(&"F".into()));
    assert_eq!(assignment.participant_count(), 4);
}

#[test]
fn test_mandatory_pair_joins_quad_when_quads_are_cheap() {
    let scenario = scenarios::mandatory_pair();
    let params = SolverParameters::default().with_size_costs(SizeCostTable::new(3, 4, 1));
    let assignment = solver_for(&scenario)
        .with_parameters(params)
        .solve(&scenario.problem)
        .unwrap();
    assert_valid(&scenario, &assignment);

    assert_eq!(assignment.group_count(), 1);
    assert_eq!(assignment.cost(), 1 + 2);
}

#[test]
fn test_oversized_pre_group_never_reaches_the_backend() {
    let scenario = scenarios::oversized_pre_group();
    let err = solve(&scenario).unwrap_err();
    assert!(err.is_validation());
    assert!(matches!(
        err,
        SchedulingError::Validation(ValidationError::PreGroupTooLarge { size: 5, .. })
    ));
}

#[test]
fn test_fully_conflicted_pair_is_infeasible() {
    let scenario = scenarios::fully_conflicted();
    let err = solve(&scenario).unwrap_err();
    match err {
        SchedulingError::Infeasible {
            cause: InfeasibilityCause::UnschedulableMembers { members },
        } => assert!(!members.is_empty()),
        other => panic!("expected infeasibility, got {other:?}"),
    }
}

#[test]
fn test_too_few_participants() {
    for count in [0, 1] {
        let scenario = scenarios::too_few_participants(count);
        assert_eq!(
            solve(&scenario).unwrap_err(),
            SchedulingError::Validation(ValidationError::InsufficientParticipants { count })
        );
    }
}

#[test]
fn test_missing_overflow_slot_is_rejected() {
    let problem = SchedulingProblem::new(
        ["A", "B"].map(Participant::named).to_vec(),
        vec![Slot::new(0, "Thu AM"), Slot::new(1, "Thu PM")],
    );
    let err = GroupAssignmentSolver::default().solve(&problem).unwrap_err();
    assert_eq!(
        err,
        SchedulingError::Validation(ValidationError::NoOverflowSlot)
    );
}

#[test]
fn test_busy_week_respects_every_constraint() {
    let scenario = scenarios::busy_week();
    let assignment = solve(&scenario).unwrap();
    assert_valid(&scenario, &assignment);

    let (_, group) = assignment.group_of(&"B".into()).unwrap();
    assert!(group.contains(&"E".into()));
}

#[test]
fn test_lab_week_solves_within_default_limit() {
    let scenario = scenarios::lab_week();
    assert_eq!(scenario.problem.participants().len(), 22);
    assert_eq!(scenario.problem.slots().len(), 10);

    let config = SchedulerConfig::new().with_max_groups_per_slot(scenario.max_groups_per_slot);
    let solver = GroupAssignmentSolver::new(&config);
    assert_eq!(
        solver.limits().time_limit(),
        std::time::Duration::from_secs(groupmeet::DEFAULT_TIME_LIMIT_SECS)
    );

    let assignment = solver.solve(&scenario.problem).unwrap();
    assert_valid(&scenario, &assignment);

    // Eleven pairs in regular half-days, the cheapest cover of 22 people.
    assert_eq!(assignment.cost(), 11);
    assert_eq!(assignment.group_count(), 11);
    assert_eq!(assignment.overflow_group_count(), 0);
    let (_, group) = assignment.group_of(&"P4".into()).unwrap();
    assert!(group.contains(&"P15".into()));
}
