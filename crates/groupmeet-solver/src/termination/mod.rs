//! Search budget shared by every backend call of one solve.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use groupmeet_config::SchedulerConfig;

/// Default time limit in seconds.
pub const DEFAULT_TIME_LIMIT_SECS: u64 = 30;

/// Time and node budget for a backend run.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use groupmeet_solver::termination::SearchLimits;
///
/// let limits = SearchLimits::new(Duration::from_secs(30)).with_node_limit(10_000);
/// assert!(!limits.is_node_limit_reached(9_999));
/// assert!(limits.is_node_limit_reached(10_000));
/// ```
#[derive(Debug, Clone)]
pub struct SearchLimits {
    time_limit: Duration,
    node_limit: Option<u64>,
    terminate: Option<Arc<AtomicBool>>,
}

impl SearchLimits {
    pub fn new(time_limit: Duration) -> Self {
        Self {
            time_limit,
            node_limit: None,
            terminate: None,
        }
    }

    pub fn millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    pub fn seconds(secs: u64) -> Self {
        Self::new(Duration::from_secs(secs))
    }

    /// Reads limits from configuration, falling back to the default time limit.
    pub fn from_config(config: &SchedulerConfig) -> Self {
        let time_limit = config
            .time_limit()
            .unwrap_or(Duration::from_secs(DEFAULT_TIME_LIMIT_SECS));
        Self {
            time_limit,
            node_limit: config.node_limit(),
            terminate: None,
        }
    }

    pub fn with_node_limit(mut self, nodes: u64) -> Self {
        self.node_limit = Some(nodes);
        self
    }

    /// Attaches an external flag that stops the search when set.
    pub fn with_terminate(mut self, flag: Arc<AtomicBool>) -> Self {
        self.terminate = Some(flag);
        self
    }

    pub fn time_limit(&self) -> Duration {
        self.time_limit
    }

    pub fn node_limit(&self) -> Option<u64> {
        self.node_limit
    }

    /// Returns the limits left after `elapsed` time and `nodes` nodes were spent.
    pub fn remaining_after(&self, elapsed: Duration, nodes: u64) -> SearchLimits {
        SearchLimits {
            time_limit: self.time_limit.saturating_sub(elapsed),
            node_limit: self.node_limit.map(|n| n.saturating_sub(nodes)),
            terminate: self.terminate.clone(),
        }
    }

    pub fn is_node_limit_reached(&self, nodes: u64) -> bool {
        self.node_limit.is_some_and(|limit| nodes >= limit)
    }

    pub fn is_time_limit_reached(&self, start: Instant) -> bool {
        start.elapsed() >= self.time_limit
    }

    pub fn is_terminate_requested(&self) -> bool {
        self.terminate
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }

    /// Returns true if the budget is already spent before any work starts.
    pub fn is_exhausted(&self) -> bool {
        self.time_limit.is_zero()
            || self.node_limit == Some(0)
            || self.is_terminate_requested()
    }
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self::seconds(DEFAULT_TIME_LIMIT_SECS)
    }
}

#[cfg(test)]
mod tests;
