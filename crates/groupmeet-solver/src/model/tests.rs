use super::*;

fn two_var_model() -> (BinaryModel, VarId, VarId) {
    let mut model = BinaryModel::new("test");
    let a = model.add_variable("a", 4);
    let b = model.add_variable("b", 1);
    model.add_constraint(
        ConstraintClass::Membership,
        [(a, 1), (b, 1)],
        Comparison::GreaterEq,
        1,
    );
    (model, a, b)
}

#[test]
fn test_objective_sums_costs_of_set_variables() {
    let (model, _, _) = two_var_model();
    assert_eq!(model.objective(&[true, true]), 5);
    assert_eq!(model.objective(&[false, false]), 0);
}

#[test]
fn test_satisfaction_checks_constraints_and_fixings() {
    let (mut model, a, _) = two_var_model();
    assert!(!model.is_satisfied_by(&[false, false]));
    assert!(model.is_satisfied_by(&[true, false]));

    model.fix(a, false);
    assert!(!model.is_satisfied_by(&[true, false]));
    assert!(model.is_satisfied_by(&[false, true]));
}

#[test]
fn test_wrong_length_assignment_is_violation() {
    let (model, _, _) = two_var_model();
    assert!(model.first_violation(&[true]).is_some());
}

#[test]
fn test_relaxed_drops_class_and_bound() {
    let (mut model, a, b) = two_var_model();
    model.add_constraint(
        ConstraintClass::Capacity,
        [(a, 1), (b, 1)],
        Comparison::LessEq,
        0,
    );
    model.set_objective_lower_bound(1);
    assert!(!model.is_satisfied_by(&[true, false]));

    let relaxed = model.relaxed(ConstraintClass::Capacity);
    assert_eq!(relaxed.constraint_count_of(ConstraintClass::Capacity), 0);
    assert_eq!(relaxed.constraint_count(), 1);
    assert_eq!(relaxed.objective_lower_bound(), 0);
    assert!(relaxed.is_satisfied_by(&[true, false]));
}

#[test]
fn test_feasibility_only_zeroes_costs() {
    let (model, _, _) = two_var_model();
    let feasibility = model.feasibility_only();
    assert_eq!(feasibility.objective(&[true, true]), 0);
    assert_eq!(feasibility.constraint_count(), model.constraint_count());
}

#[test]
fn test_validate_rejects_foreign_variable() {
    let (model, _, _) = two_var_model();
    assert!(model.validate().is_ok());

    let mut other = BinaryModel::new("other");
    for i in 0..5 {
        other.add_variable(format!("x{i}"), 0);
    }
    let foreign = VarId(4);

    let mut broken = model.clone();
    broken.add_constraint(
        ConstraintClass::Symmetry,
        [(foreign, 1)],
        Comparison::LessEq,
        1,
    );
    assert!(matches!(
        broken.validate(),
        Err(BackendError::MalformedModel(_))
    ));

    let mut broken = model;
    broken.set_branch_order(vec![foreign]);
    assert!(broken.validate().is_err());
}

#[test]
fn test_preferred_defaults_to_false() {
    let (mut model, a, b) = two_var_model();
    assert!(!model.variable(a).preferred());
    model.set_preferred(b, true);
    assert!(model.variable(b).preferred());
    assert_eq!(model.variable(b).name(), "b");
}
