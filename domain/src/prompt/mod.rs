//! Prompt domain
//!
//! Templates for the messages the chat manager writes itself: the roster
//! introduction and the moderator instructions used for automatic speaker
//! selection.

mod moderator;

pub use moderator::ModeratorPrompt;
