//! Participant port
//!
//! A participant is created and owned by the caller; the group chat only holds
//! shared handles to it. Every participant can answer in two ways:
//!
//! - blocking: [`ChatParticipant::generate_reply`] on the caller's thread
//! - suspendable: [`ChatParticipant::a_generate_reply`], which may await an
//!   external backend
//!
//! Broadcasts follow the same split ([`ChatParticipant::receive`] /
//! [`ChatParticipant::a_receive`]). The async variants default to the blocking
//! ones so simple adapters only implement one side.

use async_trait::async_trait;
use roundtable_domain::{Message, Participant};
use thiserror::Error;

/// Errors raised while a participant produces a reply.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReplyError {
    /// Reply generation was interrupted by an external signal (e.g. Ctrl+C).
    ///
    /// The orchestrator hands the turn to the admin participant if there is one.
    #[error("Reply generation interrupted")]
    Interrupted,

    #[error("Reply generation failed: {0}")]
    Failed(String),
}

impl ReplyError {
    pub fn is_interrupted(&self) -> bool {
        matches!(self, ReplyError::Interrupted)
    }
}

/// A participant able to take part in a group chat.
#[async_trait]
pub trait ChatParticipant: Participant {
    /// Record a message broadcast by the chat manager `sender`.
    ///
    /// Broadcasts never request a reply. `silent` marks messages that should
    /// not be echoed to a human watching this participant.
    fn receive(&self, message: &Message, sender: &str, silent: bool);

    /// Produce the next turn given the conversation so far.
    ///
    /// `Ok(None)` means the participant has nothing to add, which ends the run.
    fn generate_reply(
        &self,
        messages: &[Message],
        sender: &str,
    ) -> Result<Option<Message>, ReplyError>;

    /// Suspendable variant of [`ChatParticipant::receive`].
    async fn a_receive(&self, message: &Message, sender: &str, silent: bool) {
        self.receive(message, sender, silent);
    }

    /// Suspendable variant of [`ChatParticipant::generate_reply`].
    async fn a_generate_reply(
        &self,
        messages: &[Message],
        sender: &str,
    ) -> Result<Option<Message>, ReplyError> {
        self.generate_reply(messages, sender)
    }
}
