//! The four normalized inputs of one scheduling round.

use super::{ConflictMatrix, Participant, PreGroup, Slot};

/// Participants, slot catalog, conflicts and pre-groups of one round.
///
/// Built fresh right before a solve and discarded afterwards.
///
/// # Examples
///
/// ```
/// use groupmeet_core::{ConflictMatrix, Participant, PreGroup, SchedulingProblem, Slot};
///
/// let problem = SchedulingProblem::new(
///     ["A", "B", "C", "D"].map(Participant::named).to_vec(),
///     Slot::catalog(["Thu AM", "Thu PM"]),
/// )
/// .with_conflicts(ConflictMatrix::new().with_busy("A", 0))
/// .with_pre_groups(vec![PreGroup::new(["A", "B"])]);
///
/// assert_eq!(problem.participants().len(), 4);
/// assert_eq!(problem.overflow_position(), Some(1));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SchedulingProblem {
    participants: Vec<Participant>,
    slots: Vec<Slot>,
    conflicts: ConflictMatrix,
    pre_groups: Vec<PreGroup>,
}

impl SchedulingProblem {
    /// Creates a problem without conflicts or pre-groups.
    pub fn new(participants: Vec<Participant>, slots: Vec<Slot>) -> Self {
        Self {
            participants,
            slots,
            conflicts: ConflictMatrix::new(),
            pre_groups: Vec::new(),
        }
    }

    pub fn with_conflicts(mut self, conflicts: ConflictMatrix) -> Self {
        self.conflicts = conflicts;
        self
    }

    pub fn with_pre_groups(mut self, pre_groups: Vec<PreGroup>) -> Self {
        self.pre_groups = pre_groups;
        self
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn conflicts(&self) -> &ConflictMatrix {
        &self.conflicts
    }

    pub fn pre_groups(&self) -> &[PreGroup] {
        &self.pre_groups
    }

    /// Returns the position of the first overflow slot in the catalog.
    pub fn overflow_position(&self) -> Option<usize> {
        self.slots.iter().position(Slot::is_overflow)
    }

    /// Returns true if the participant at `participant` position is busy in
    /// the slot at `slot` position.
    pub fn is_busy_at(&self, participant: usize, slot: usize) -> bool {
        self.conflicts
            .is_busy(self.participants[participant].id(), self.slots[slot].index())
    }
}
