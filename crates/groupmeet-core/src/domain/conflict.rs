//! Participant/slot conflicts.

use std::collections::{BTreeSet, HashMap};

use super::{CourseSchedule, Participant, ParticipantId, Slot};

/// Total function `(participant, slot) → busy`.
///
/// Only busy pairs are stored; every pair not recorded is "not busy". Slots
/// are referenced by their stable index.
///
/// # Examples
///
/// ```
/// use groupmeet_core::{ConflictMatrix, ParticipantId};
///
/// let a = ParticipantId::new("a");
/// let mut conflicts = ConflictMatrix::new();
/// conflicts.mark_busy(a.clone(), 0);
///
/// assert!(conflicts.is_busy(&a, 0));
/// assert!(!conflicts.is_busy(&a, 1));
/// assert!(!conflicts.is_busy(&ParticipantId::new("b"), 0));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConflictMatrix {
    busy: HashMap<ParticipantId, BTreeSet<usize>>,
}

impl ConflictMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derives conflicts from a course timetable.
    ///
    /// A participant is busy in every slot whose half-day lists their display
    /// name. Slots without a period never conflict.
    pub fn from_course_schedule(
        schedule: &CourseSchedule,
        participants: &[Participant],
        slots: &[Slot],
    ) -> Self {
        let mut matrix = Self::new();
        for slot in slots {
            let Some(period) = slot.period() else {
                continue;
            };
            for participant in participants {
                if schedule.is_busy(&period.day, &period.half, participant.name()) {
                    matrix.mark_busy(participant.id().clone(), slot.index());
                }
            }
        }
        matrix
    }

    /// Records that `participant` is committed during slot `slot_index`.
    pub fn mark_busy(&mut self, participant: impl Into<ParticipantId>, slot_index: usize) {
        self.busy
            .entry(participant.into())
            .or_default()
            .insert(slot_index);
    }

    /// Builder-style variant of [`mark_busy`](Self::mark_busy).
    pub fn with_busy(mut self, participant: impl Into<ParticipantId>, slot_index: usize) -> Self {
        self.mark_busy(participant, slot_index);
        self
    }

    pub fn is_busy(&self, participant: &ParticipantId, slot_index: usize) -> bool {
        self.busy
            .get(participant)
            .is_some_and(|slots| slots.contains(&slot_index))
    }

    /// Returns the slot indices in which `participant` is busy, ascending.
    pub fn busy_slots(&self, participant: &ParticipantId) -> impl Iterator<Item = usize> + '_ {
        self.busy
            .get(participant)
            .into_iter()
            .flat_map(|slots| slots.iter().copied())
    }

    /// Returns the number of busy pairs.
    pub fn len(&self) -> usize {
        self.busy.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.busy.is_empty()
    }
}
