//! Infrastructure layer for roundtable
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: configuration file loading, scripted
//! participants and moderator, the JSONL transcript logger, and versioned
//! persistence of conversation entities.

pub mod config;
pub mod logging;
pub mod participant;
pub mod persistence;

// Re-export commonly used types
pub use config::{
    ConfigLoader, FileChatConfig, FileConfig, FileLoggingConfig, FileModeratorConfig,
    FileParticipantConfig,
};
pub use logging::JsonlConversationLogger;
pub use participant::{InterruptSignal, ScriptedDecisionBackend, ScriptedParticipant};
pub use persistence::{Envelope, RegistryError, SerializableRegistry};
