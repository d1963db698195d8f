//! Domain layer for roundtable
//!
//! This crate contains the core conversation entities and the pure rules that
//! drive a multi-party group chat. It has no dependencies on infrastructure,
//! async runtimes, or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Group Chat
//!
//! A [`GroupChat`] is the conversation ledger: an ordered roster of participants
//! plus the append-only message history and the chat configuration.
//!
//! ## Speaker Selection
//!
//! Each round the next speaker is chosen under one of four policies
//! ([`SpeakerSelectionMethod`]). The policy dispatch itself lives in the
//! application layer; this crate provides the building blocks (repeat rules,
//! round-order lookup, moderator prompts and decision parsing).

pub mod config;
pub mod conversation;
pub mod core;
pub mod prompt;
pub mod selection;

// Re-export commonly used types
pub use config::validation::{ConfigIssue, ConfigIssueCode, Severity, validate_chat_config};
pub use conversation::{
    group_chat::{GroupChat, GroupChatConfig, GroupChatSnapshot},
    message::{ContentPart, FunctionCall, Message, MessageContent, Role},
    participant::{Participant, ParticipantProfile},
};
pub use core::error::DomainError;
pub use prompt::ModeratorPrompt;
pub use selection::{
    decision::{SpeakerDecision, parse_speaker_decision},
    is_degenerate_pair,
    mentions::count_mentions,
    method::SpeakerSelectionMethod,
    repeat::RepeatPolicy,
};
