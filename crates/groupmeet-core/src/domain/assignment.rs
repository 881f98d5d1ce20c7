//! Solver output: groups keyed by slot.

use std::fmt;

use super::{ParticipantId, Slot};

/// Two to four participants presenting together.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Group {
    members: Vec<ParticipantId>,
}

impl Group {
    pub fn new(members: Vec<ParticipantId>) -> Self {
        Self { members }
    }

    pub fn members(&self) -> &[ParticipantId] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, participant: &ParticipantId) -> bool {
        self.members.contains(participant)
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, member) in self.members.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{member}")?;
        }
        f.write_str("]")
    }
}

/// The groups scheduled into one slot, in decoding order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SlotAssignment {
    pub slot: Slot,
    pub groups: Vec<Group>,
}

/// Mapping from slot to the ordered groups scheduled in it.
///
/// Only slots that received at least one group are present; they are kept
/// in slot index order. The total objective cost of the solve is carried along.
///
/// # Examples
///
/// ```
/// use groupmeet_core::{Assignment, Group, ParticipantId, Slot};
///
/// let slots = Slot::catalog(["Thu AM", "Thu PM"]);
/// let mut assignment = Assignment::new(3);
/// assignment.push(
///     &slots[1],
///     Group::new(vec![ParticipantId::new("a"), ParticipantId::new("b")]),
/// );
///
/// assert_eq!(assignment.group_count(), 1);
/// assert_eq!(assignment.groups_in(1).len(), 1);
/// assert!(assignment.groups_in(0).is_empty());
/// assert_eq!(assignment.overflow_group_count(), 1);
/// assert_eq!(assignment.cost(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Assignment {
    slots: Vec<SlotAssignment>,
    cost: u64,
}

impl Assignment {
    pub fn new(cost: u64) -> Self {
        Self {
            slots: Vec::new(),
            cost,
        }
    }

    /// Appends `group` to the group list of `slot`.
    ///
    /// Populated slots stay ordered by slot index.
    pub fn push(&mut self, slot: &Slot, group: Group) {
        match self
            .slots
            .binary_search_by_key(&slot.index(), |entry| entry.slot.index())
        {
            Ok(pos) => self.slots[pos].groups.push(group),
            Err(pos) => self.slots.insert(
                pos,
                SlotAssignment {
                    slot: slot.clone(),
                    groups: vec![group],
                },
            ),
        }
    }

    /// Iterates over the populated slots in slot index order.
    pub fn iter(&self) -> impl Iterator<Item = &SlotAssignment> {
        self.slots.iter()
    }

    /// Iterates over every group together with its slot.
    pub fn groups(&self) -> impl Iterator<Item = (&Slot, &Group)> {
        self.slots
            .iter()
            .flat_map(|entry| entry.groups.iter().map(move |group| (&entry.slot, group)))
    }

    /// Returns the groups scheduled in the slot with the given index.
    pub fn groups_in(&self, slot_index: usize) -> &[Group] {
        self.slots
            .iter()
            .find(|entry| entry.slot.index() == slot_index)
            .map(|entry| entry.groups.as_slice())
            .unwrap_or(&[])
    }

    /// Returns the group containing `participant` and the slot it meets in.
    pub fn group_of(&self, participant: &ParticipantId) -> Option<(&Slot, &Group)> {
        self.groups().find(|(_, group)| group.contains(participant))
    }

    pub fn group_count(&self) -> usize {
        self.slots.iter().map(|entry| entry.groups.len()).sum()
    }

    /// Returns the number of groups placed in the overflow slot.
    pub fn overflow_group_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|entry| entry.slot.is_overflow())
            .map(|entry| entry.groups.len())
            .sum()
    }

    /// Returns the number of participants across all groups.
    pub fn participant_count(&self) -> usize {
        self.groups().map(|(_, group)| group.len()).sum()
    }

    /// Returns the objective value of this assignment.
    pub fn cost(&self) -> u64 {
        self.cost
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.slots {
            writeln!(f, "{}:", entry.slot)?;
            for group in &entry.groups {
                writeln!(f, "  {group}")?;
            }
        }
        Ok(())
    }
}
