//! Run Group Chat use case
//!
//! Drives one conversation over a [`GroupChat`] ledger:
//!
//! 1. Introduction - the roster is announced to everyone but the initiator
//!    (blocking mode only)
//! 2. Rounds, at most `max_round`:
//!    - stamp and append the pending message, then test termination
//!    - broadcast it to everyone but its sender
//!    - stop after the broadcast in the final round
//!    - select the next speaker (blocking mode also relays the directive)
//!    - ask the speaker for a reply; an interrupted speaker hands the turn to
//!      the admin participant
//!
//! The ledger is borrowed exclusively for the whole run, so it is never
//! aliased across suspension points.

use super::select_speaker::{Selection, SpeakerSelector};
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::participant::{ChatParticipant, ReplyError};
use crate::ports::termination::{NeverTerminate, TerminationPredicate};
use roundtable_domain::{DomainError, GroupChat, Message, Participant, Role};
use serde_json::json;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Name the orchestrator uses as sender of broadcasts and directives.
pub const DEFAULT_MANAGER_NAME: &str = "chat_manager";

/// Ledger holding reply-capable participants
pub type ChatRoster = GroupChat<dyn ChatParticipant>;

/// Errors that end a run abnormally
#[derive(Error, Debug)]
pub enum RunGroupChatError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("{0}")]
    Reply(#[from] ReplyError),

    #[error("Speaker '{speaker}' was interrupted and admin '{admin}' is not on the roster")]
    Interrupted { speaker: String, admin: String },

    #[error("Operation cancelled")]
    Cancelled,
}

impl RunGroupChatError {
    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            RunGroupChatError::Cancelled | RunGroupChatError::Domain(DomainError::Cancelled)
        )
    }

    /// Invalid selection method or roster size
    pub fn is_configuration(&self) -> bool {
        matches!(self, RunGroupChatError::Domain(e) if e.is_configuration())
    }
}

/// Why a run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The termination predicate matched a message
    Terminated,
    /// The final round was broadcast
    MaxRounds,
    /// The selected speaker had nothing to add
    NoReply,
}

impl StopReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            StopReason::Terminated => "terminated",
            StopReason::MaxRounds => "max_rounds",
            StopReason::NoReply => "no_reply",
        }
    }
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of a finished run.
///
/// `completed` is always true and `final_message` always `None`: the
/// conversation itself lives in the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupChatOutcome {
    pub completed: bool,
    pub final_message: Option<Message>,
    pub stop_reason: StopReason,
    /// Number of rounds that appended a message
    pub rounds: usize,
}

impl GroupChatOutcome {
    fn stopped(stop_reason: StopReason, rounds: usize) -> Self {
        Self {
            completed: true,
            final_message: None,
            stop_reason,
            rounds,
        }
    }
}

/// Use case running a group chat to completion
pub struct RunGroupChatUseCase {
    manager_name: String,
    selector: SpeakerSelector,
    termination: Arc<dyn TerminationPredicate>,
    logger: Arc<dyn ConversationLogger>,
    cancellation_token: Option<CancellationToken>,
}

impl Default for RunGroupChatUseCase {
    fn default() -> Self {
        Self::new(SpeakerSelector::new())
    }
}

impl RunGroupChatUseCase {
    pub fn new(selector: SpeakerSelector) -> Self {
        Self {
            manager_name: DEFAULT_MANAGER_NAME.to_string(),
            selector,
            termination: Arc::new(NeverTerminate),
            logger: Arc::new(NoConversationLogger),
            cancellation_token: None,
        }
    }

    pub fn with_manager_name(mut self, name: impl Into<String>) -> Self {
        self.manager_name = name.into();
        self
    }

    pub fn with_termination(mut self, termination: Arc<dyn TerminationPredicate>) -> Self {
        self.termination = termination;
        self
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Set cancellation token for the suspendable mode
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    pub fn manager_name(&self) -> &str {
        &self.manager_name
    }

    /// Run the conversation on the calling thread.
    ///
    /// `message` is the opening message and `sender` the participant (or
    /// outside party) that sent it.
    pub fn run_blocking(
        &self,
        chat: &mut ChatRoster,
        message: Message,
        sender: &str,
    ) -> Result<GroupChatOutcome, RunGroupChatError> {
        self.log_started(chat, sender, "blocking");

        let intro = Message::user(chat.intro_msg()).with_name(&self.manager_name);
        for (i, agent) in chat
            .agents()
            .iter()
            .filter(|a| a.name() != sender)
            .enumerate()
        {
            agent.receive(&intro, &self.manager_name, i > 0);
        }

        let mut message = message;
        let mut speaker_name = sender.to_string();

        for round in 1..=chat.max_round() {
            let message_sent = self.record(chat, message, &speaker_name, round);
            if let Some(stop) = self.stop_before_broadcast(&message_sent, round) {
                return Ok(self.finish(stop));
            }

            for agent in chat.agents().iter().filter(|a| a.name() != speaker_name) {
                agent.receive(&message_sent, &self.manager_name, true);
            }
            if round == chat.max_round() {
                return Ok(self.finish(GroupChatOutcome::stopped(StopReason::MaxRounds, round)));
            }

            let Selection { speaker, directive } = self.selector.select(&*chat, &speaker_name)?;
            self.log_selected(round, speaker.name(), directive.as_deref());

            if let Some(what) = directive {
                let directive = Message::user(what).with_name(&self.manager_name);
                for agent in chat.agents() {
                    agent.receive(&directive, &self.manager_name, agent.name() != speaker.name());
                }
                // The ledger keeps the manager's own view of what it said
                chat.append(directive.with_role(Role::Assistant));
            }

            let (speaker, reply) = match speaker.generate_reply(chat.messages(), &self.manager_name)
            {
                Err(ReplyError::Interrupted) => {
                    let admin = self.take_over(chat, speaker.name(), round)?;
                    let reply = admin.generate_reply(chat.messages(), &self.manager_name)?;
                    (admin, reply)
                }
                other => (speaker, other?),
            };

            let Some(reply) = reply else {
                debug!(speaker = speaker.name(), "Speaker has no reply");
                return Ok(self.finish(GroupChatOutcome::stopped(StopReason::NoReply, round)));
            };

            speaker_name = speaker.name().to_string();
            message = reply.into_received();
        }

        Ok(self.finish(GroupChatOutcome::stopped(StopReason::MaxRounds, 0)))
    }

    /// Run the conversation with suspendable broadcasts and replies.
    ///
    /// Unlike [`Self::run_blocking`] there is no introduction broadcast, and a
    /// directive returned by the selector is not relayed or recorded.
    pub async fn run(
        &self,
        chat: &mut ChatRoster,
        message: Message,
        sender: &str,
    ) -> Result<GroupChatOutcome, RunGroupChatError> {
        self.log_started(chat, sender, "suspendable");

        let mut message = message;
        let mut speaker_name = sender.to_string();

        for round in 1..=chat.max_round() {
            self.check_cancelled()?;

            let message_sent = self.record(chat, message, &speaker_name, round);
            if let Some(stop) = self.stop_before_broadcast(&message_sent, round) {
                return Ok(self.finish(stop));
            }

            for agent in chat.agents().iter().filter(|a| a.name() != speaker_name) {
                self.cancellable(agent.a_receive(&message_sent, &self.manager_name, true))
                    .await?;
            }
            if round == chat.max_round() {
                return Ok(self.finish(GroupChatOutcome::stopped(StopReason::MaxRounds, round)));
            }

            let Selection { speaker, directive } = self.selector.select(&*chat, &speaker_name)?;
            self.log_selected(round, speaker.name(), directive.as_deref());

            let reply = self
                .cancellable(speaker.a_generate_reply(chat.messages(), &self.manager_name))
                .await?;
            let (speaker, reply) = match reply {
                Err(ReplyError::Interrupted) => {
                    let admin = self.take_over(chat, speaker.name(), round)?;
                    let reply = self
                        .cancellable(admin.a_generate_reply(chat.messages(), &self.manager_name))
                        .await??;
                    (admin, reply)
                }
                other => (speaker, other?),
            };

            let Some(reply) = reply else {
                debug!(speaker = speaker.name(), "Speaker has no reply");
                return Ok(self.finish(GroupChatOutcome::stopped(StopReason::NoReply, round)));
            };

            speaker_name = speaker.name().to_string();
            message = reply.into_received();
        }

        Ok(self.finish(GroupChatOutcome::stopped(StopReason::MaxRounds, 0)))
    }

    /// Stamp the sender, append to the ledger and return the recorded message.
    fn record(
        &self,
        chat: &mut ChatRoster,
        mut message: Message,
        speaker_name: &str,
        round: usize,
    ) -> Message {
        if !message.is_function_result() {
            message.name = Some(speaker_name.to_string());
        }
        message.normalize();
        chat.append(message.clone());

        let mentions = chat.mentioned_agents(&message.content, chat.agents());
        self.logger.log(ConversationEvent::new(
            "message_appended",
            json!({
                "round": round,
                "name": message.name,
                "role": message.role.as_str(),
                "content": message.text(),
                "function_call": message.function_call.as_ref().map(|c| &c.name),
                "mentions": mentions,
            }),
        ));
        message
    }

    fn stop_before_broadcast(&self, message: &Message, round: usize) -> Option<GroupChatOutcome> {
        self.termination
            .is_termination_msg(message)
            .then(|| GroupChatOutcome::stopped(StopReason::Terminated, round))
    }

    /// Resolve the admin that takes over from an interrupted speaker.
    fn take_over(
        &self,
        chat: &ChatRoster,
        speaker: &str,
        round: usize,
    ) -> Result<Arc<dyn ChatParticipant>, RunGroupChatError> {
        let admin_name = chat.admin_name();
        let Ok(admin) = chat.agent_by_name(admin_name) else {
            warn!(speaker, admin = admin_name, "Interrupted with no admin to take over");
            return Err(RunGroupChatError::Interrupted {
                speaker: speaker.to_string(),
                admin: admin_name.to_string(),
            });
        };

        info!(speaker, admin = admin_name, "Speaker interrupted; admin takes over");
        self.logger.log(ConversationEvent::new(
            "speaker_interrupted",
            json!({ "round": round, "speaker": speaker, "admin": admin_name }),
        ));
        Ok(Arc::clone(admin))
    }

    fn check_cancelled(&self) -> Result<(), RunGroupChatError> {
        if let Some(token) = &self.cancellation_token
            && token.is_cancelled()
        {
            return Err(RunGroupChatError::Cancelled);
        }
        Ok(())
    }

    /// Await `future` unless the cancellation token fires first.
    async fn cancellable<F: Future>(&self, future: F) -> Result<F::Output, RunGroupChatError> {
        match &self.cancellation_token {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => Err(RunGroupChatError::Cancelled),
                output = future => Ok(output),
            },
            None => Ok(future.await),
        }
    }

    fn log_started(&self, chat: &ChatRoster, sender: &str, mode: &str) {
        info!(
            sender,
            participants = chat.agents().len(),
            max_round = chat.max_round(),
            "Starting group chat ({} mode)",
            mode
        );
        self.logger.log(ConversationEvent::new(
            "group_chat_started",
            json!({
                "mode": mode,
                "sender": sender,
                "manager": self.manager_name,
                "roster": chat.agent_names(),
                "max_round": chat.max_round(),
                "speaker_selection_method": chat.config().speaker_selection_method,
            }),
        ));
    }

    fn log_selected(&self, round: usize, speaker: &str, directive: Option<&str>) {
        debug!(round, speaker, "Next speaker");
        self.logger.log(ConversationEvent::new(
            "speaker_selected",
            json!({ "round": round, "speaker": speaker, "directive": directive }),
        ));
    }

    fn finish(&self, outcome: GroupChatOutcome) -> GroupChatOutcome {
        info!(
            rounds = outcome.rounds,
            "Group chat finished: {}", outcome.stop_reason
        );
        self.logger.log(ConversationEvent::new(
            "group_chat_finished",
            json!({
                "stop_reason": outcome.stop_reason.as_str(),
                "rounds": outcome.rounds,
            }),
        ));
        outcome
    }
}
