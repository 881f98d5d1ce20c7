use super::*;
use crate::model::{Comparison, ConstraintClass, VarId};

fn choose_model(costs: &[u64], choose: i64) -> (BinaryModel, Vec<VarId>) {
    let mut model = BinaryModel::new("choose");
    let vars: Vec<VarId> = costs
        .iter()
        .enumerate()
        .map(|(i, &cost)| model.add_variable(format!("x{i}"), cost))
        .collect();
    model.add_constraint(
        ConstraintClass::Membership,
        vars.iter().map(|&v| (v, 1)),
        Comparison::Equal,
        choose,
    );
    (model, vars)
}

fn optimal(outcome: BackendOutcome) -> ModelSolution {
    match outcome.verdict {
        Verdict::Optimal(solution) => solution,
        other => panic!("expected optimal verdict, got {other:?}"),
    }
}

#[test]
fn test_finds_cheapest_subset() {
    let (model, vars) = choose_model(&[4, 1, 3, 2, 6], 3);
    let outcome = BranchAndBound::new()
        .solve(&model, &SearchLimits::seconds(5))
        .unwrap();
    let solution = optimal(outcome);

    assert_eq!(solution.objective(), 6);
    assert!(solution.value(vars[1]));
    assert!(solution.value(vars[2]));
    assert!(solution.value(vars[3]));
    assert!(model.is_satisfied_by(solution.values()));
}

#[test]
fn test_proves_infeasibility() {
    let (mut model, vars) = choose_model(&[1, 1], 1);
    model.add_constraint(
        ConstraintClass::Capacity,
        [(vars[0], 1)],
        Comparison::LessEq,
        0,
    );
    model.add_constraint(
        ConstraintClass::Capacity,
        [(vars[1], 1)],
        Comparison::LessEq,
        0,
    );
    let outcome = BranchAndBound::new()
        .solve(&model, &SearchLimits::seconds(5))
        .unwrap();
    assert!(outcome.verdict.is_infeasible());
}

#[test]
fn test_conflicting_fixings_are_infeasible() {
    let (mut model, vars) = choose_model(&[1, 1, 1], 1);
    model.fix(vars[0], true);
    model.fix(vars[1], true);
    let outcome = BranchAndBound::new()
        .solve(&model, &SearchLimits::seconds(5))
        .unwrap();
    assert_eq!(outcome.verdict, Verdict::Infeasible);
}

#[test]
fn test_fixings_are_respected() {
    let (mut model, vars) = choose_model(&[1, 9, 1], 1);
    model.fix(vars[1], true);
    let solution = optimal(
        BranchAndBound::new()
            .solve(&model, &SearchLimits::seconds(5))
            .unwrap(),
    );
    assert_eq!(solution.objective(), 9);
}

#[test]
fn test_negative_coefficients_propagate() {
    // a - b = 0, a + c = 1, c costly: a and b must both be 1.
    let mut model = BinaryModel::new("linked");
    let a = model.add_variable("a", 1);
    let b = model.add_variable("b", 1);
    let c = model.add_variable("c", 5);
    model.add_constraint(
        ConstraintClass::GroupSize,
        [(a, 1), (b, -1)],
        Comparison::Equal,
        0,
    );
    model.add_constraint(
        ConstraintClass::Membership,
        [(a, 1), (c, 1)],
        Comparison::Equal,
        1,
    );
    let solution = optimal(
        BranchAndBound::new()
            .solve(&model, &SearchLimits::seconds(5))
            .unwrap(),
    );
    assert_eq!(solution.objective(), 2);
    assert!(solution.value(a) && solution.value(b) && !solution.value(c));
}

#[test]
fn test_zero_node_limit_reports_limit() {
    let (model, _) = choose_model(&[1, 2, 3], 1);
    let outcome = BranchAndBound::new()
        .solve(&model, &SearchLimits::seconds(5).with_node_limit(0))
        .unwrap();
    assert_eq!(outcome.verdict, Verdict::LimitReached { incumbent: None });
    assert_eq!(outcome.stats.nodes_explored, 0);
}

#[test]
fn test_lower_bound_stops_search_early() {
    let (mut model, _) = choose_model(&[1, 1, 1, 1, 1, 1, 1, 1], 4);
    let full = BranchAndBound::new()
        .solve(&model, &SearchLimits::seconds(5))
        .unwrap();

    model.set_objective_lower_bound(4);
    let bounded = BranchAndBound::new()
        .solve(&model, &SearchLimits::seconds(5))
        .unwrap();

    assert_eq!(optimal(full.clone()).objective(), 4);
    assert_eq!(optimal(bounded.clone()).objective(), 4);
    assert!(bounded.stats.nodes_explored < full.stats.nodes_explored);
}

#[test]
fn test_seeded_search_is_reproducible_and_optimal() {
    let (model, _) = choose_model(&[0, 0, 0, 0, 0, 0], 3);
    let first = optimal(
        BranchAndBound::with_seed(7)
            .solve(&model, &SearchLimits::seconds(5))
            .unwrap(),
    );
    let second = optimal(
        BranchAndBound::with_seed(7)
            .solve(&model, &SearchLimits::seconds(5))
            .unwrap(),
    );
    assert_eq!(first, second);
    assert_eq!(first.objective(), 0);
    assert!(model.is_satisfied_by(first.values()));
}

#[test]
fn test_malformed_model_is_rejected() {
    let (mut model, _) = choose_model(&[1], 1);
    let mut other = BinaryModel::new("other");
    other.add_variable("a", 0);
    let foreign = other.add_variable("b", 0);
    model.set_branch_order(vec![foreign]);

    let err = BranchAndBound::new()
        .solve(&model, &SearchLimits::seconds(5))
        .unwrap_err();
    assert!(matches!(err, groupmeet_core::BackendError::MalformedModel(_)));
}

#[test]
fn test_branch_order_prefers_given_values() {
    let (mut model, vars) = choose_model(&[0, 0, 0], 1);
    model.set_preferred(vars[2], true);
    model.set_branch_order(vec![vars[2], vars[0], vars[1]]);
    let solution = optimal(
        BranchAndBound::new()
            .solve(&model, &SearchLimits::seconds(5))
            .unwrap(),
    );
    assert!(solution.value(vars[2]));
}

#[test]
fn test_ilp_finds_cheapest_subset() {
    let (model, vars) = choose_model(&[4, 1, 3, 2, 6], 3);
    let outcome = GoodLpBackend::new()
        .solve(&model, &SearchLimits::seconds(5))
        .unwrap();
    assert_eq!(outcome.stats.incumbents_found, 1);
    let solution = optimal(outcome);

    assert_eq!(solution.objective(), 6);
    assert!(!solution.value(vars[0]) && !solution.value(vars[4]));
    assert!(model.is_satisfied_by(solution.values()));
}

#[test]
fn test_ilp_honors_fixings_and_linked_variables() {
    let (mut model, vars) = choose_model(&[1, 9, 1], 1);
    model.fix(vars[1], true);
    let solution = optimal(
        GoodLpBackend::new()
            .solve(&model, &SearchLimits::seconds(5))
            .unwrap(),
    );
    assert_eq!(solution.objective(), 9);

    let mut linked = BinaryModel::new("linked");
    let a = linked.add_variable("a", 1);
    let b = linked.add_variable("b", 1);
    let c = linked.add_variable("c", 5);
    linked.add_constraint(ConstraintClass::GroupSize, [(a, 1), (b, -1)], Comparison::Equal, 0);
    linked.add_constraint(ConstraintClass::Membership, [(a, 1), (c, 1)], Comparison::GreaterEq, 1);
    let solution = optimal(
        GoodLpBackend::new()
            .solve(&linked, &SearchLimits::seconds(5))
            .unwrap(),
    );
    assert_eq!(solution.objective(), 2);
    assert!(solution.value(a) && solution.value(b) && !solution.value(c));
}

#[test]
fn test_ilp_proves_infeasibility() {
    let (mut model, vars) = choose_model(&[1, 1], 1);
    model.add_constraint(ConstraintClass::Capacity, [(vars[0], 1)], Comparison::LessEq, 0);
    model.add_constraint(ConstraintClass::Capacity, [(vars[1], 1)], Comparison::LessEq, 0);
    let outcome = GoodLpBackend::new()
        .solve(&model, &SearchLimits::seconds(5))
        .unwrap();
    assert_eq!(outcome.verdict, Verdict::Infeasible);

    let (mut model, vars) = choose_model(&[1, 1, 1], 1);
    model.fix(vars[0], true);
    model.fix(vars[0], false);
    let outcome = GoodLpBackend::new()
        .solve(&model, &SearchLimits::seconds(5))
        .unwrap();
    assert_eq!(outcome.verdict, Verdict::Infeasible);
}

#[test]
fn test_ilp_stops_when_terminate_is_set() {
    let (model, _) = choose_model(&[1, 2, 3], 1);
    let flag = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(true));
    let outcome = GoodLpBackend::new()
        .solve(&model, &SearchLimits::seconds(5).with_terminate(flag))
        .unwrap();
    assert_eq!(outcome.verdict, Verdict::LimitReached { incumbent: None });
}

#[test]
fn test_overflowing_objective_is_malformed() {
    let (model, _) = choose_model(&[u64::MAX, 1], 1);
    let backends: [&dyn Backend; 2] = [&BranchAndBound::new(), &GoodLpBackend::new()];
    for backend in backends {
        let err = backend
            .solve(&model, &SearchLimits::seconds(5))
            .unwrap_err();
        assert!(
            matches!(err, groupmeet_core::BackendError::MalformedModel(_)),
            "{}: {err:?}",
            backend.name()
        );
    }
}
