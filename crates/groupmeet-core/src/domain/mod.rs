//! Domain model for group-meeting assignment
//!
//! Inputs supplied by the surrounding automation:
//! - `Participant`: someone who must present in a group
//! - `Slot`: a candidate half-day period, one of which is the uncapped overflow slot
//! - `ConflictMatrix`: who is already committed during which slot
//! - `PreGroup`: participants who must end up in the same group
//!
//! Output produced by the solver:
//! - `Group`: two to four participants presenting together
//! - `Assignment`: groups keyed by the slot they were scheduled into

mod assignment;
mod conflict;
mod participant;
mod pre_group;
mod problem;
mod schedule;
mod slot;

pub use assignment::{Assignment, Group, SlotAssignment};
pub use conflict::ConflictMatrix;
pub use participant::{Participant, ParticipantId};
pub use pre_group::PreGroup;
pub use problem::SchedulingProblem;
pub use schedule::CourseSchedule;
pub use slot::{HalfDay, Slot};
