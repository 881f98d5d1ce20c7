//! Tunable parameters of the grouping model.

use groupmeet_config::{
    SchedulerConfig, DEFAULT_MAX_GROUPS_PER_SLOT, DEFAULT_OVERFLOW_COST_PER_GROUP,
};
use groupmeet_core::SizeCostTable;

/// Capacity and cost weights applied to one solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverParameters {
    /// Maximum groups in every slot except the overflow slot.
    pub max_groups_per_slot: usize,
    /// Cost incurred once per group of each size.
    pub size_costs: SizeCostTable,
    /// Cost incurred once per group placed into the overflow slot.
    pub overflow_cost_per_group: u64,
}

impl SolverParameters {
    pub fn new(
        max_groups_per_slot: usize,
        size_costs: SizeCostTable,
        overflow_cost_per_group: u64,
    ) -> Self {
        Self {
            max_groups_per_slot,
            size_costs,
            overflow_cost_per_group,
        }
    }

    pub fn from_config(config: &SchedulerConfig) -> Self {
        Self::new(
            config.max_groups_per_slot,
            config.size_costs,
            config.overflow_cost_per_group,
        )
    }

    pub fn with_max_groups_per_slot(mut self, max_groups: usize) -> Self {
        self.max_groups_per_slot = max_groups;
        self
    }

    pub fn with_size_costs(mut self, size_costs: SizeCostTable) -> Self {
        self.size_costs = size_costs;
        self
    }

    pub fn with_overflow_cost(mut self, cost: u64) -> Self {
        self.overflow_cost_per_group = cost;
        self
    }
}

impl Default for SolverParameters {
    fn default() -> Self {
        Self::new(
            DEFAULT_MAX_GROUPS_PER_SLOT,
            SizeCostTable::default(),
            DEFAULT_OVERFLOW_COST_PER_GROUP,
        )
    }
}
