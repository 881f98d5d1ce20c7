//! Error types for groupmeet

use std::time::Duration;

use thiserror::Error;

use crate::domain::ParticipantId;

/// Input rejected before any model is built.
///
/// Always recoverable by fixing the input data; a validation failure never
/// reaches the optimization backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// No slot in the catalog is flagged as the overflow slot.
    #[error("no overflow slot: exactly one slot must be flagged as overflow")]
    NoOverflowSlot,

    /// More than one slot is flagged as the overflow slot.
    #[error("multiple overflow slots: {indices:?}")]
    MultipleOverflowSlots { indices: Vec<usize> },

    /// Fewer than two participants; no group can be formed.
    #[error("insufficient participants: {count} given, at least 2 required")]
    InsufficientParticipants { count: usize },

    /// The same participant id appears twice in the roster.
    #[error("duplicate participant '{0}'")]
    DuplicateParticipant(ParticipantId),

    /// The same slot index appears twice in the catalog.
    #[error("duplicate slot index {0}")]
    DuplicateSlot(usize),

    /// The per-slot capacity must be positive.
    #[error("invalid capacity {0}: max groups per slot must be positive")]
    InvalidCapacity(usize),

    /// A pre-group has no members.
    #[error("pre-group #{index} is empty")]
    EmptyPreGroup { index: usize },

    /// A pre-group is larger than the largest admissible group.
    #[error("pre-group #{index} has {size} members, at most {max} fit in one group")]
    PreGroupTooLarge { index: usize, size: usize, max: usize },

    /// The same participant is listed twice in one pre-group.
    #[error("pre-group #{index} lists participant '{participant}' more than once")]
    DuplicateInPreGroup {
        index: usize,
        participant: ParticipantId,
    },

    /// A participant is forced into two pre-groups.
    #[error("participant '{participant}' appears in pre-groups #{first} and #{second}")]
    PreGroupOverlap {
        participant: ParticipantId,
        first: usize,
        second: usize,
    },

    /// A pre-group references someone who is not on the roster.
    #[error("pre-group #{index} references unknown participant '{participant}'")]
    UnknownParticipantInPreGroup {
        index: usize,
        participant: ParticipantId,
    },

    /// The most expensive schedule could cost more than the solver can count.
    #[error("cost table too large: a worst-case schedule exceeds {limit}")]
    CostTooLarge { limit: u64 },
}

/// The constraint class that made a problem infeasible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InfeasibilityCause {
    /// These participants (a pre-group, or a single participant) share no slot
    /// in which all of them are free.
    UnschedulableMembers { members: Vec<ParticipantId> },

    /// A solution exists once the per-slot cap is lifted.
    Capacity { max_groups_per_slot: usize },

    /// No partition into groups of 2 to 4 satisfies co-grouping and conflicts,
    /// whatever the capacity.
    Grouping,

    /// The search budget ran out before the cause could be isolated.
    Undetermined,
}

impl std::fmt::Display for InfeasibilityCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InfeasibilityCause::UnschedulableMembers { members } => {
                let names: Vec<&str> = members.iter().map(ParticipantId::as_str).collect();
                write!(f, "no common free slot for [{}]", names.join(", "))
            }
            InfeasibilityCause::Capacity {
                max_groups_per_slot,
            } => write!(
                f,
                "capacity of {max_groups_per_slot} groups per slot is too tight"
            ),
            InfeasibilityCause::Grouping => {
                write!(f, "no grouping satisfies co-grouping and conflict constraints")
            }
            InfeasibilityCause::Undetermined => {
                write!(f, "cause could not be isolated within the search budget")
            }
        }
    }
}

/// Unexpected failure inside the optimization backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// The model handed to the backend is inconsistent.
    #[error("malformed model: {0}")]
    MalformedModel(String),

    /// The backend panicked while searching.
    #[error("backend panicked: {0}")]
    Panicked(String),

    /// The decoded assignment violates a hard invariant.
    #[error("backend returned an invalid solution: {0}")]
    InvalidSolution(String),

    /// The underlying optimizer failed without a verdict.
    #[error("backend failed: {0}")]
    Failed(String),
}

/// Main error type for groupmeet operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulingError {
    /// Inputs cannot yield a valid model.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The backend proved that no assignment satisfies the hard constraints.
    #[error("scheduling infeasible: {cause}")]
    Infeasible { cause: InfeasibilityCause },

    /// The search budget ran out before optimality or infeasibility was proven.
    #[error("scheduling timed out after {elapsed:?} ({nodes_explored} nodes)")]
    Timeout {
        elapsed: Duration,
        nodes_explored: u64,
        best_known_cost: Option<u64>,
    },

    /// The backend failed unexpectedly.
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),

    /// A configuration file exists but cannot drive a solve.
    #[error("configuration error: {0}")]
    Config(String),
}

impl SchedulingError {
    /// Returns true for errors caused by the input data rather than the search.
    pub fn is_validation(&self) -> bool {
        matches!(self, SchedulingError::Validation(_))
    }

    /// Returns true if retrying with a larger budget might succeed.
    pub fn is_timeout(&self) -> bool {
        matches!(self, SchedulingError::Timeout { .. })
    }
}

/// Result type alias for groupmeet operations
pub type Result<T> = std::result::Result<T, SchedulingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_converts_into_scheduling_error() {
        let err: SchedulingError = ValidationError::NoOverflowSlot.into();
        assert!(err.is_validation());
        assert!(!err.is_timeout());
        assert_eq!(
            err.to_string(),
            "validation error: no overflow slot: exactly one slot must be flagged as overflow"
        );
    }

    #[test]
    fn test_infeasibility_cause_display() {
        let cause = InfeasibilityCause::UnschedulableMembers {
            members: vec![ParticipantId::new("a"), ParticipantId::new("b")],
        };
        assert_eq!(cause.to_string(), "no common free slot for [a, b]");

        let err = SchedulingError::Infeasible {
            cause: InfeasibilityCause::Capacity {
                max_groups_per_slot: 2,
            },
        };
        assert_eq!(
            err.to_string(),
            "scheduling infeasible: capacity of 2 groups per slot is too tight"
        );
    }

    #[test]
    fn test_timeout_flag() {
        let err = SchedulingError::Timeout {
            elapsed: Duration::from_millis(5),
            nodes_explored: 10,
            best_known_cost: Some(3),
        };
        assert!(err.is_timeout());
    }
}
