//! Tests for scheduler configuration.

use super::*;

#[test]
fn test_toml_parsing() {
    let toml = r#"
        max_groups_per_slot = 3
        overflow_cost_per_group = 7
        random_seed = 42

        [size_costs]
        pair = 1
        trio = 0
        quad = 5

        [termination]
        seconds_spent_limit = 30
        node_count_limit = 1000

        [[slots]]
        label = "Thu AM"

        [[slots]]
        label = "Thu PM"
    "#;

    let config = SchedulerConfig::from_toml_str(toml).unwrap();
    assert_eq!(config.max_groups_per_slot, 3);
    assert_eq!(config.overflow_cost_per_group, 7);
    assert_eq!(config.random_seed, Some(42));
    assert_eq!(config.size_costs, SizeCostTable::new(1, 0, 5));
    assert_eq!(config.time_limit(), Some(Duration::from_secs(30)));
    assert_eq!(config.node_limit(), Some(1000));
    assert_eq!(config.slots.len(), 2);
}

#[test]
fn test_yaml_parsing() {
    let yaml = r#"
        max_groups_per_slot: 1
        random_seed: 42
        termination:
          millis_spent_limit: 250
        slots:
          - label: Thu AM
            day: Thu
            half: AM
          - label: Thu PM
            overflow: true
    "#;

    let config = SchedulerConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(config.max_groups_per_slot, 1);
    assert_eq!(config.random_seed, Some(42));
    assert_eq!(config.time_limit(), Some(Duration::from_millis(250)));
    assert_eq!(config.size_costs, SizeCostTable::default());

    let slots = config.slot_catalog();
    assert!(slots[1].is_overflow());
    assert_eq!(slots[0].period().map(|p| p.half.as_str()), Some("AM"));
}

#[test]
fn test_empty_document_uses_defaults() {
    let config = SchedulerConfig::from_toml_str("").unwrap();
    assert_eq!(config.max_groups_per_slot, DEFAULT_MAX_GROUPS_PER_SLOT);
    assert_eq!(config.overflow_cost_per_group, DEFAULT_OVERFLOW_COST_PER_GROUP);
    assert!(config.time_limit().is_none());
    assert!(config.slot_catalog().is_empty());
}

#[test]
fn test_zero_capacity_rejected() {
    let err = SchedulerConfig::from_toml_str("max_groups_per_slot = 0").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn test_two_overflow_slots_rejected() {
    let yaml = r#"
        slots:
          - label: A
            overflow: true
          - label: B
            overflow: true
    "#;
    let err = SchedulerConfig::from_yaml_str(yaml).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn test_missing_file_is_io_error() {
    let err = SchedulerConfig::load("/nonexistent/groupmeet.toml").unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

/// Writes `contents` to a fresh file under the temp directory.
fn temp_config(name: &str, contents: &str) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(format!("groupmeet-{}-{name}.toml", std::process::id()));
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_load_or_default_only_forgives_missing_file() {
    let missing = SchedulerConfig::load_or_default("/nonexistent/groupmeet.toml").unwrap();
    assert_eq!(missing.max_groups_per_slot, DEFAULT_MAX_GROUPS_PER_SLOT);

    let malformed = temp_config("malformed", "max_groups_per_slot = [");
    let err = SchedulerConfig::load_or_default(&malformed).unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)), "{err}");

    let invalid = temp_config("invalid", "max_groups_per_slot = 0");
    let err = SchedulerConfig::load_or_default(&invalid).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)), "{err}");

    let valid = temp_config("valid", "overflow_cost_per_group = 9");
    assert_eq!(
        SchedulerConfig::load_or_default(&valid)
            .unwrap()
            .overflow_cost_per_group,
        9
    );

    for path in [malformed, invalid, valid] {
        let _ = std::fs::remove_file(path);
    }
}

#[test]
fn test_backend_selection() {
    assert_eq!(SchedulerConfig::default().backend, BackendKind::Ilp);

    let config = SchedulerConfig::from_toml_str(r#"backend = "branch_and_bound""#).unwrap();
    assert_eq!(config.backend, BackendKind::BranchAndBound);

    let config = SchedulerConfig::from_yaml_str("backend: ilp").unwrap();
    assert_eq!(config.backend, BackendKind::Ilp);

    assert!(SchedulerConfig::from_toml_str(r#"backend = "simplex""#).is_err());
    assert_eq!(
        SchedulerConfig::new()
            .with_backend(BackendKind::BranchAndBound)
            .backend,
        BackendKind::BranchAndBound
    );
}

#[test]
fn test_builder() {
    let config = SchedulerConfig::new()
        .with_random_seed(123)
        .with_termination_seconds(60)
        .with_max_groups_per_slot(4)
        .with_overflow_cost(9)
        .with_size_costs(SizeCostTable::new(0, 1, 2));

    assert_eq!(config.random_seed, Some(123));
    assert_eq!(config.time_limit(), Some(Duration::from_secs(60)));
    assert_eq!(config.max_groups_per_slot, 4);
    assert_eq!(config.overflow_cost_per_group, 9);
    assert!(config.validate().is_ok());
}

#[test]
fn test_time_limit_sums_fields() {
    let termination = TerminationConfig {
        seconds_spent_limit: Some(1),
        minutes_spent_limit: Some(1),
        millis_spent_limit: Some(500),
        node_count_limit: None,
    };
    assert_eq!(termination.time_limit(), Some(Duration::from_millis(61_500)));
    assert!(TerminationConfig::default().time_limit().is_none());
}

#[test]
fn test_huge_time_limit_saturates() {
    let termination = TerminationConfig {
        seconds_spent_limit: Some(u64::MAX),
        minutes_spent_limit: Some(u64::MAX / 2),
        millis_spent_limit: Some(1),
        node_count_limit: None,
    };
    assert_eq!(termination.time_limit(), Some(Duration::from_millis(u64::MAX)));

    let termination = TerminationConfig {
        minutes_spent_limit: Some(u64::MAX / 60_000 + 1),
        ..TerminationConfig::default()
    };
    assert_eq!(termination.time_limit(), Some(Duration::from_millis(u64::MAX)));
}

#[test]
fn test_last_slot_becomes_overflow() {
    let config = SchedulerConfig::new()
        .with_slot(SlotConfig::new("Mon AM"))
        .with_slot(SlotConfig::new("Thu PM"));
    let slots = config.slot_catalog();
    assert!(!slots[0].is_overflow());
    assert!(slots[1].is_overflow());
    assert_eq!(slots[1].index(), 1);
}
