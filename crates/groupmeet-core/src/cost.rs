//! Group size pricing.

use std::fmt;

/// An admissible group size.
///
/// Groups are never singletons and never larger than four.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GroupSize {
    Pair,
    Trio,
    Quad,
}

impl GroupSize {
    /// Every admissible size, smallest first.
    pub const ALL: [GroupSize; 3] = [GroupSize::Pair, GroupSize::Trio, GroupSize::Quad];

    /// Smallest admissible member count.
    pub const MIN_MEMBERS: usize = 2;

    /// Largest admissible member count.
    pub const MAX_MEMBERS: usize = 4;

    /// Returns the size for a member count, or `None` outside 2..=4.
    pub const fn from_members(members: usize) -> Option<Self> {
        match members {
            2 => Some(GroupSize::Pair),
            3 => Some(GroupSize::Trio),
            4 => Some(GroupSize::Quad),
            _ => None,
        }
    }

    /// Returns the member count.
    pub const fn members(self) -> usize {
        match self {
            GroupSize::Pair => 2,
            GroupSize::Trio => 3,
            GroupSize::Quad => 4,
        }
    }
}

impl fmt::Display for GroupSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.members())
    }
}

/// Cost incurred once per group of each size.
///
/// Costs are unsigned, so the objective is non-negative by construction.
///
/// # Examples
///
/// ```
/// use groupmeet_core::{GroupSize, SizeCostTable};
///
/// let table = SizeCostTable::new(1, 2, 5);
/// assert_eq!(table.cost(GroupSize::Trio), 2);
/// assert_eq!(table.cost_for_members(4), Some(5));
/// assert_eq!(table.cost_for_members(5), None);
/// assert_eq!(table.cheapest(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "snake_case"))]
pub struct SizeCostTable {
    pub pair: u64,
    pub trio: u64,
    pub quad: u64,
}

impl SizeCostTable {
    pub const fn new(pair: u64, trio: u64, quad: u64) -> Self {
        Self { pair, trio, quad }
    }

    /// Returns the cost of one group of the given size.
    pub const fn cost(&self, size: GroupSize) -> u64 {
        match size {
            GroupSize::Pair => self.pair,
            GroupSize::Trio => self.trio,
            GroupSize::Quad => self.quad,
        }
    }

    /// Returns the cost of a group with `members` members, if admissible.
    pub fn cost_for_members(&self, members: usize) -> Option<u64> {
        GroupSize::from_members(members).map(|size| self.cost(size))
    }

    /// Returns the cheapest per-group cost.
    pub fn cheapest(&self) -> u64 {
        self.pair.min(self.trio).min(self.quad)
    }

    /// Returns the sizes ordered by ascending cost, smaller size first on ties.
    pub fn sizes_by_cost(&self) -> [GroupSize; 3] {
        let mut sizes = GroupSize::ALL;
        sizes.sort_by_key(|&size| (self.cost(size), size));
        sizes
    }
}

impl Default for SizeCostTable {
    /// Smaller groups are cheaper: 1 for a pair, 2 for a trio, 5 for a quad.
    fn default() -> Self {
        Self::new(1, 2, 5)
    }
}
