//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod run_group_chat;
pub mod select_speaker;
