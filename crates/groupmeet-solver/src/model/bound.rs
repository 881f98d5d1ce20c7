//! Completion bound for models that partition items into priced parts.

use super::VarId;

/// Cheapest total cost of covering `m` items with exactly `k` parts.
///
/// `sizes` lists `(members, cost)` for every admissible part size. Entry
/// `[m][k]` is `None` when no mix of sizes adds up to `m`.
///
/// ```
/// use groupmeet_solver::model::cheapest_mixes;
///
/// let mixes = cheapest_mixes(&[(2, 1), (3, 2), (4, 5)], 6);
/// assert_eq!(mixes[6][2], Some(4)); // two trios
/// assert_eq!(mixes[6][3], Some(3)); // three pairs
/// assert_eq!(mixes[5][1], None);
/// ```
pub fn cheapest_mixes(sizes: &[(usize, u64)], max_items: usize) -> Vec<Vec<Option<u64>>> {
    let smallest = sizes
        .iter()
        .map(|&(members, _)| members)
        .filter(|&members| members > 0)
        .min()
        .unwrap_or(1);
    let max_parts = max_items / smallest;

    let mut table = vec![vec![None; max_parts + 1]; max_items + 1];
    table[0][0] = Some(0);
    for k in 1..=max_parts {
        for m in 1..=max_items {
            table[m][k] = sizes
                .iter()
                .filter(|&&(members, _)| members > 0 && members <= m)
                .filter_map(|&(members, cost)| {
                    table[m - members][k - 1].map(|rest: u64| rest.saturating_add(cost))
                })
                .min();
        }
    }
    table
}

/// Variables describing one part of a partition.
#[derive(Debug, Clone)]
pub struct PartVars {
    /// `(indicator, members, cost)` for every admissible size.
    pub sizes: Vec<(VarId, usize, u64)>,
    /// One placement indicator per capped slot.
    pub capped: Vec<VarId>,
    /// Set when the part pays the overflow cost.
    pub overflow: VarId,
}

/// Lower bound on the objective of every completion of a partial assignment.
///
/// Describes a model in which item `i` joins part `j` iff `rows[i][j]` is 1,
/// a chosen size indicator fixes the exact member count of its part, and a
/// part pays its size cost plus the overflow cost when it takes no capped
/// slot. Parts with a chosen size are charged what they already pay. The
/// remaining items are covered by the cheapest mix of fresh parts, which
/// pay overflow once the capped places still free run out.
#[derive(Debug, Clone)]
pub struct PartitionBound {
    rows: Vec<Vec<VarId>>,
    parts: Vec<PartVars>,
    capped_slots: usize,
    capacity: Option<usize>,
    overflow_cost: u64,
    mixes: Vec<Vec<Option<u64>>>,
}

impl PartitionBound {
    /// All parts must share the same size list.
    pub fn new(
        rows: Vec<Vec<VarId>>,
        parts: Vec<PartVars>,
        capped_slots: usize,
        capacity: usize,
        overflow_cost: u64,
    ) -> Self {
        let sizes: Vec<(usize, u64)> = parts
            .first()
            .map(|part| part.sizes.iter().map(|&(_, members, cost)| (members, cost)).collect())
            .unwrap_or_default();
        let mixes = cheapest_mixes(&sizes, rows.len());
        Self {
            rows,
            parts,
            capped_slots,
            capacity: Some(capacity),
            overflow_cost,
            mixes,
        }
    }

    /// Same bound with unlimited room in every capped slot.
    pub fn uncapped(mut self) -> Self {
        self.capacity = None;
        self
    }

    /// Evaluates the bound; `None` marks a free variable.
    ///
    /// Falls back to the settled cost when the partial assignment admits no
    /// completion at all, leaving the proof of that to propagation.
    pub fn evaluate(&self, values: &[Option<bool>]) -> u64 {
        let is = |var: VarId, value: bool| values[var.index()] == Some(value);

        let mut settled = 0u64;
        let mut open_seats = 0usize;
        let mut capped_used = 0usize;
        let mut fresh_parts = 0usize;
        let mut in_fresh_parts = 0usize;

        for (j, part) in self.parts.iter().enumerate() {
            let members = self.rows.iter().filter(|row| is(row[j], true)).count();
            match part.sizes.iter().find(|&&(var, _, _)| is(var, true)) {
                Some(&(_, size, cost)) => {
                    settled = settled.saturating_add(cost);
                    if is(part.overflow, true) {
                        settled = settled.saturating_add(self.overflow_cost);
                    }
                    open_seats += size.saturating_sub(members);
                    capped_used += part.capped.iter().filter(|&&var| is(var, true)).count();
                }
                None => {
                    if part.sizes.iter().any(|&(var, _, _)| !is(var, false)) {
                        fresh_parts += 1;
                    }
                    in_fresh_parts += members;
                }
            }
        }

        let uncovered = self
            .rows
            .iter()
            .filter(|row| !row.iter().any(|&var| is(var, true)))
            .count();
        let Some(spare) = uncovered.checked_sub(open_seats) else {
            return settled;
        };
        let Some(mixes) = self.mixes.get(spare + in_fresh_parts) else {
            return settled;
        };

        let capped_free = match self.capacity {
            Some(capacity) => capacity
                .saturating_mul(self.capped_slots)
                .saturating_sub(capped_used),
            None => usize::MAX,
        };
        let fresh = mixes
            .iter()
            .take(fresh_parts + 1)
            .enumerate()
            .filter_map(|(k, mix)| {
                let overflowing = k.saturating_sub(capped_free) as u64;
                mix.map(|cost| cost.saturating_add(overflowing.saturating_mul(self.overflow_cost)))
            })
            .min();

        match fresh {
            Some(cost) => settled.saturating_add(cost),
            None => settled,
        }
    }
}
