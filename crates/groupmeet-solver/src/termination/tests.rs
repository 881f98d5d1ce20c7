use super::*;
use groupmeet_config::TerminationConfig;

#[test]
fn test_default_time_limit() {
    let limits = SearchLimits::from_config(&SchedulerConfig::default());
    assert_eq!(limits.time_limit(), Duration::from_secs(DEFAULT_TIME_LIMIT_SECS));
    assert_eq!(limits.node_limit(), None);
}

#[test]
fn test_limits_from_config() {
    let config = SchedulerConfig::new().with_termination(TerminationConfig {
        millis_spent_limit: Some(1500),
        node_count_limit: Some(42),
        ..TerminationConfig::default()
    });
    let limits = SearchLimits::from_config(&config);
    assert_eq!(limits.time_limit(), Duration::from_millis(1500));
    assert_eq!(limits.node_limit(), Some(42));
}

#[test]
fn test_remaining_after_saturates() {
    let limits = SearchLimits::millis(100).with_node_limit(10);
    let rest = limits.remaining_after(Duration::from_millis(40), 4);
    assert_eq!(rest.time_limit(), Duration::from_millis(60));
    assert_eq!(rest.node_limit(), Some(6));

    let spent = limits.remaining_after(Duration::from_secs(1), 50);
    assert!(spent.is_exhausted());
    assert_eq!(spent.node_limit(), Some(0));
}

#[test]
fn test_terminate_flag() {
    let flag = Arc::new(AtomicBool::new(false));
    let limits = SearchLimits::seconds(5).with_terminate(flag.clone());
    assert!(!limits.is_terminate_requested());
    assert!(!limits.is_exhausted());

    flag.store(true, Ordering::SeqCst);
    assert!(limits.is_terminate_requested());
    assert!(limits.remaining_after(Duration::ZERO, 0).is_exhausted());
}

#[test]
fn test_time_limit_reached() {
    let limits = SearchLimits::new(Duration::ZERO);
    assert!(limits.is_time_limit_reached(Instant::now()));
    assert!(!SearchLimits::seconds(60).is_time_limit_reached(Instant::now()));
}
