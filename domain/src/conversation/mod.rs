//! Conversation domain
//!
//! - [`message`]: messages, roles and structured content
//! - [`participant`]: participant identity and function table
//! - [`group_chat`]: the ledger: roster, history and chat settings

pub mod group_chat;
pub mod message;
pub mod participant;
