//! Reference scheduling rounds.
//!
//! Each scenario pairs a problem with the capacity it is meant to be solved
//! under. Size and overflow costs are left to the caller.

use groupmeet_core::{ConflictMatrix, PreGroup, SchedulingProblem, Slot};

use crate::roster::{numbered_roster, roster};

/// A problem plus the per-slot capacity it is meant for.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: &'static str,
    pub problem: SchedulingProblem,
    pub max_groups_per_slot: usize,
}

impl Scenario {
    fn new(name: &'static str, problem: SchedulingProblem, max_groups_per_slot: usize) -> Self {
        Self {
            name,
            problem,
            max_groups_per_slot,
        }
    }
}

/// Six participants and a single slot, which is the overflow slot.
pub fn single_overflow_slot() -> Scenario {
    Scenario::new(
        "single_overflow_slot",
        SchedulingProblem::new(
            roster(&["A", "B", "C", "D", "E", "F"]),
            Slot::catalog(["Thu PM"]),
        ),
        2,
    )
}

/// `A` is busy in the capped slot `S1`, so A's group must use overflow `S2`.
pub fn conflict_forces_overflow() -> Scenario {
    Scenario::new(
        "conflict_forces_overflow",
        SchedulingProblem::new(roster(&["A", "B", "C", "D"]), Slot::catalog(["S1", "S2"]))
            .with_conflicts(ConflictMatrix::new().with_busy("A", 0)),
        1,
    )
}

/// `E` and `F` must share a group.
pub fn mandatory_pair() -> Scenario {
    Scenario::new(
        "mandatory_pair",
        SchedulingProblem::new(roster(&["E", "F", "G", "H"]), Slot::catalog(["Thu PM"]))
            .with_pre_groups(vec![PreGroup::new(["E", "F"])]),
        2,
    )
}

/// A pre-group of five, which no group can hold.
pub fn oversized_pre_group() -> Scenario {
    Scenario::new(
        "oversized_pre_group",
        SchedulingProblem::new(
            roster(&["I", "J", "K", "L", "M", "N"]),
            Slot::catalog(["Thu AM", "Thu PM"]),
        )
        .with_pre_groups(vec![PreGroup::new(["I", "J", "K", "L", "M"])]),
        2,
    )
}

/// Two participants busy in every slot, overflow included.
pub fn fully_conflicted() -> Scenario {
    let mut conflicts = ConflictMatrix::new();
    for name in ["A", "B"] {
        conflicts.mark_busy(name, 0);
        conflicts.mark_busy(name, 1);
    }
    Scenario::new(
        "fully_conflicted",
        SchedulingProblem::new(roster(&["A", "B"]), Slot::catalog(["S1", "S2"]))
            .with_conflicts(conflicts),
        2,
    )
}

/// Zero or one participant.
pub fn too_few_participants(count: usize) -> Scenario {
    let names = ["A"];
    Scenario::new(
        "too_few_participants",
        SchedulingProblem::new(
            roster(&names[..count.min(names.len())]),
            Slot::catalog(["S1", "S2"]),
        ),
        2,
    )
}

/// Seven participants over a week with scattered conflicts and a pre-group.
pub fn busy_week() -> Scenario {
    let slots = vec![
        Slot::new(0, "Mon PM").with_period("Mon", "PM"),
        Slot::new(1, "Wed AM").with_period("Wed", "AM"),
        Slot::new(2, "Thu AM").with_period("Thu", "AM"),
        Slot::overflow(3, "Thu PM").with_period("Thu", "PM"),
    ];
    let conflicts = ConflictMatrix::new()
        .with_busy("A", 0)
        .with_busy("A", 1)
        .with_busy("B", 2)
        .with_busy("C", 0)
        .with_busy("D", 1)
        .with_busy("D", 2)
        .with_busy("F", 3)
        .with_busy("G", 0);
    Scenario::new(
        "busy_week",
        SchedulingProblem::new(roster(&["A", "B", "C", "D", "E", "F", "G"]), slots)
            .with_conflicts(conflicts)
            .with_pre_groups(vec![PreGroup::new(["B", "E"])]),
        1,
    )
}

/// A lab of 22 people over a week of half-days, Friday afternoon being the
/// overflow slot.
///
/// `P{i}` is busy in the regular half-days `i % 9` and `(4 * i + 3) % 9`,
/// and two pairs are pre-grouped. Any two people share a free regular
/// half-day and capacity 2 leaves room for 18 groups, so eleven pairs fit
/// without overflow.
pub fn lab_week() -> Scenario {
    let labels = [
        "Mon AM", "Mon PM", "Tue AM", "Tue PM", "Wed AM", "Wed PM", "Thu AM", "Thu PM", "Fri AM",
        "Fri PM",
    ];
    let slots = Slot::catalog(labels);
    let regular = labels.len() - 1;

    let participants = numbered_roster(22);
    let mut conflicts = ConflictMatrix::new();
    for (i, participant) in participants.iter().enumerate() {
        conflicts.mark_busy(participant.id().clone(), i % regular);
        conflicts.mark_busy(participant.id().clone(), (4 * i + 3) % regular);
    }

    Scenario::new(
        "lab_week",
        SchedulingProblem::new(participants, slots)
            .with_conflicts(conflicts)
            .with_pre_groups(vec![PreGroup::new(["P0", "P11"]), PreGroup::new(["P4", "P15"])]),
        2,
    )
}

/// Every feasible scenario above small enough for exhaustive checks.
pub fn feasible() -> Vec<Scenario> {
    vec![
        single_overflow_slot(),
        conflict_forces_overflow(),
        mandatory_pair(),
        busy_week(),
    ]
}
