//! Exhaustive optimum for tiny scheduling rounds.
//!
//! Enumerates every partition into blocks of 2 to 4 that keeps pre-groups
//! whole, and every slot choice per block under the capacity cap. Exponential;
//! meant for rounds of up to about eight participants.

use groupmeet_core::{SchedulingProblem, SizeCostTable};

struct Enumeration<'a> {
    problem: &'a SchedulingProblem,
    /// `pre_group[i]`: index of the pre-group holding participant `i`.
    pre_group: Vec<Option<usize>>,
    max_groups_per_slot: usize,
    size_costs: &'a SizeCostTable,
    overflow_cost_per_group: u64,
    assigned: Vec<bool>,
    slot_usage: Vec<usize>,
    best: Option<u64>,
}

/// Returns the minimum total cost, or `None` if no assignment exists.
///
/// # Example
///
/// ```
/// use groupmeet_core::{SchedulingProblem, SizeCostTable, Slot};
/// use groupmeet_test::{optimal_cost, roster};
///
/// let problem = SchedulingProblem::new(roster(&["A", "B", "C", "D"]), Slot::catalog(["S1", "S2"]));
/// // Two pairs in the capped slot.
/// assert_eq!(optimal_cost(&problem, 2, &SizeCostTable::default(), 2), Some(2));
/// ```
pub fn optimal_cost(
    problem: &SchedulingProblem,
    max_groups_per_slot: usize,
    size_costs: &SizeCostTable,
    overflow_cost_per_group: u64,
) -> Option<u64> {
    let n = problem.participants().len();
    let pre_group = problem
        .participants()
        .iter()
        .map(|p| {
            problem
                .pre_groups()
                .iter()
                .position(|pre_group| pre_group.contains(p.id()))
        })
        .collect();

    let mut enumeration = Enumeration {
        problem,
        pre_group,
        max_groups_per_slot,
        size_costs,
        overflow_cost_per_group,
        assigned: vec![false; n],
        slot_usage: vec![0; problem.slots().len()],
        best: None,
    };
    if n >= 2 {
        enumeration.extend(0);
    }
    enumeration.best
}

impl Enumeration<'_> {
    fn extend(&mut self, cost: u64) {
        let Some(first) = self.assigned.iter().position(|&done| !done) else {
            self.best = Some(self.best.map_or(cost, |best| best.min(cost)));
            return;
        };
        let rest: Vec<usize> = (first + 1..self.assigned.len())
            .filter(|&i| !self.assigned[i])
            .collect();

        let mut block = vec![first];
        self.choose_companions(&rest, 0, &mut block, cost);
    }

    fn choose_companions(&mut self, rest: &[usize], from: usize, block: &mut Vec<usize>, cost: u64) {
        if block.len() >= 2 {
            self.place_block(block, cost);
        }
        if block.len() == 4 {
            return;
        }
        for k in from..rest.len() {
            block.push(rest[k]);
            self.choose_companions(rest, k + 1, block, cost);
            block.pop();
        }
    }

    fn keeps_pre_groups_whole(&self, block: &[usize]) -> bool {
        block.iter().all(|&i| match self.pre_group[i] {
            None => true,
            Some(index) => self.problem.pre_groups()[index].members().iter().all(|member| {
                block
                    .iter()
                    .any(|&j| self.problem.participants()[j].id() == member)
            }),
        })
    }

    fn place_block(&mut self, block: &[usize], cost: u64) {
        if !self.keeps_pre_groups_whole(block) {
            return;
        }
        let Some(size_cost) = self.size_costs.cost_for_members(block.len()) else {
            return;
        };

        let problem = self.problem;
        for (pos, slot) in problem.slots().iter().enumerate() {
            let free = block.iter().all(|&i| !problem.is_busy_at(i, pos));
            if !free {
                continue;
            }
            if !slot.is_overflow() && self.slot_usage[pos] >= self.max_groups_per_slot {
                continue;
            }

            let overflow = if slot.is_overflow() {
                self.overflow_cost_per_group
            } else {
                0
            };
            for &i in block {
                self.assigned[i] = true;
            }
            self.slot_usage[pos] += 1;
            self.extend(cost + size_cost + overflow);
            self.slot_usage[pos] -= 1;
            for &i in block {
                self.assigned[i] = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenarios;

    fn default_optimum(scenario: &scenarios::Scenario) -> Option<u64> {
        optimal_cost(
            &scenario.problem,
            scenario.max_groups_per_slot,
            &SizeCostTable::default(),
            2,
        )
    }

    #[test]
    fn test_single_overflow_slot_optimum() {
        // Two trios in overflow: 2 + 2 + 2 + 2.
        assert_eq!(default_optimum(&scenarios::single_overflow_slot()), Some(8));
    }

    #[test]
    fn test_conflict_forces_overflow_optimum() {
        // A pair in S1 and A's pair in overflow.
        assert_eq!(default_optimum(&scenarios::conflict_forces_overflow()), Some(4));
    }

    #[test]
    fn test_fully_conflicted_is_infeasible() {
        assert_eq!(default_optimum(&scenarios::fully_conflicted()), None);
    }

    #[test]
    fn test_pre_groups_stay_whole() {
        // E and F together, G and H together, all in the only (overflow) slot.
        assert_eq!(default_optimum(&scenarios::mandatory_pair()), Some(6));
    }

    #[test]
    fn test_too_few_participants_is_infeasible() {
        assert_eq!(default_optimum(&scenarios::too_few_participants(1)), None);
    }
}
