//! Search statistics.
//!
//! Stack-allocated counters for backend runs.

use std::time::{Duration, Instant};

/// Counters of one or more backend runs.
///
/// # Example
///
/// ```
/// use groupmeet_solver::stats::SearchStats;
///
/// let mut stats = SearchStats::default();
/// stats.start();
/// stats.record_node();
/// stats.record_node();
/// stats.record_backtrack();
/// stats.record_incumbent(7);
/// stats.finish();
///
/// assert_eq!(stats.nodes_explored, 2);
/// assert_eq!(stats.backtracks, 1);
/// assert_eq!(stats.best_cost, Some(7));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SearchStats {
    start_time: Option<Instant>,
    finished_after: Option<Duration>,
    /// Search nodes entered.
    pub nodes_explored: u64,
    /// Branches abandoned after a conflict or a bound.
    pub backtracks: u64,
    /// Variables fixed by propagation.
    pub propagations: u64,
    /// Improving solutions found.
    pub incumbents_found: u64,
    /// Cost of the best solution found, if any.
    pub best_cost: Option<u64>,
}

impl SearchStats {
    /// Marks the start of a search.
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
        self.finished_after = None;
    }

    /// Freezes the elapsed time.
    pub fn finish(&mut self) {
        self.finished_after = Some(self.running_time());
    }

    fn running_time(&self) -> Duration {
        self.start_time.map(|t| t.elapsed()).unwrap_or_default()
    }

    /// Returns the elapsed time, frozen once `finish` was called.
    pub fn elapsed(&self) -> Duration {
        self.finished_after.unwrap_or_else(|| self.running_time())
    }

    pub fn record_node(&mut self) {
        self.nodes_explored += 1;
    }

    pub fn record_backtrack(&mut self) {
        self.backtracks += 1;
    }

    pub fn record_propagations(&mut self, count: u64) {
        self.propagations += count;
    }

    /// Records an improving solution.
    pub fn record_incumbent(&mut self, cost: u64) {
        self.incumbents_found += 1;
        self.best_cost = Some(cost);
    }

    /// Adds the counters of a later run, keeping this run's best cost.
    pub fn merge(&mut self, other: &SearchStats) {
        self.nodes_explored += other.nodes_explored;
        self.backtracks += other.backtracks;
        self.propagations += other.propagations;
        self.incumbents_found += other.incumbents_found;
        self.finished_after = Some(self.elapsed() + other.elapsed());
    }

    /// Returns the node rate.
    pub fn nodes_per_second(&self) -> u64 {
        let secs = self.elapsed().as_secs_f64();
        if secs > 0.0 {
            (self.nodes_explored as f64 / secs) as u64
        } else {
            0
        }
    }
}
