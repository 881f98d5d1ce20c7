//! groupmeet Core - Domain types and errors for group-meeting assignment
//!
//! This crate provides the fundamental abstractions for groupmeet:
//! - Participants, slots and the conflict matrix describing who is busy when
//! - Pre-groups that force participants to share a group
//! - Groups and the slot-keyed `Assignment` produced by the solver
//! - The size cost table that prices each group size
//! - The error taxonomy shared by validation, solving and decoding

pub mod cost;
pub mod domain;
pub mod error;

pub use cost::{GroupSize, SizeCostTable};
pub use domain::{
    Assignment, ConflictMatrix, CourseSchedule, Group, HalfDay, Participant, ParticipantId,
    PreGroup, SchedulingProblem, Slot, SlotAssignment,
};
pub use error::{
    BackendError, InfeasibilityCause, Result, SchedulingError, ValidationError,
};
