//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error(
        "speaker_selection_method is set to '{0}'. It should be one of [auto, manual, random, round_robin] (case insensitive)"
    )]
    InvalidSelectionMethod(String),

    #[error(
        "Group chat is underpopulated with {0} participants. Add more participants or use direct communication instead"
    )]
    Underpopulated(usize),

    #[error("Participant not found: {0}")]
    ParticipantNotFound(String),

    #[error("No eligible speaker: {0}")]
    NoEligibleSpeaker(String),

    #[error("Operation cancelled")]
    Cancelled,
}

impl DomainError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DomainError::Cancelled)
    }

    /// Check if this error stems from an invalid chat configuration.
    ///
    /// Configuration errors are surfaced immediately and never retried.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            DomainError::InvalidSelectionMethod(_) | DomainError::Underpopulated(_)
        )
    }
}
