//! Application layer for roundtable
//!
//! This crate contains the port definitions for the external collaborators of a
//! group chat (participants, the reasoning backend, the human operator, the
//! termination predicate, the transcript logger) and the use cases that drive
//! a conversation: speaker selection and the round loop.
//! It depends only on the domain layer.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    decision_backend::{DecisionBackend, NoDecisionBackend},
    participant::{ChatParticipant, ReplyError},
    speaker_operator::{NoOperator, SpeakerOperator},
    termination::{NeverTerminate, TerminationMarker, TerminationPredicate},
};
pub use use_cases::run_group_chat::{
    ChatRoster, DEFAULT_MANAGER_NAME, GroupChatOutcome, RunGroupChatError, RunGroupChatUseCase,
    StopReason,
};
pub use use_cases::select_speaker::{MANUAL_SELECTION_ATTEMPTS, Selection, SpeakerSelector};
