//! Select Speaker use case
//!
//! Chooses the next participant of a group chat, optionally together with a
//! directive the chat manager injects before that participant speaks.
//!
//! # Algorithm
//!
//! 1. Parse the configured selection method (case-insensitive)
//! 2. Resolve whether the last speaker may speak again
//! 3. Check the roster has at least two members
//! 4. Function-call routing: if the last message suggests a function call,
//!    restrict candidates to participants able to execute it (a single
//!    capable participant wins outright)
//! 5. Drop the last speaker from the candidates if repeats are disallowed
//! 6. Dispatch on the policy; `manual` falls through to `auto` when the
//!    operator skips, and `auto` falls back to round order whenever the
//!    backend gives no usable decision
//!
//! Only `random` is non-deterministic.

use crate::ports::decision_backend::{DecisionBackend, NoDecisionBackend};
use crate::ports::speaker_operator::{NoOperator, SpeakerOperator};
use rand::seq::SliceRandom;
use roundtable_domain::core::string::preview;
use roundtable_domain::{
    DomainError, GroupChat, Message, Participant, SpeakerSelectionMethod, is_degenerate_pair,
    parse_speaker_decision,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Number of answers the operator gets before manual selection gives up.
pub const MANUAL_SELECTION_ATTEMPTS: usize = 3;

/// Outcome of a speaker selection
pub struct Selection<P: ?Sized> {
    pub speaker: Arc<P>,
    /// Text the chat manager says to the speaker before its turn
    pub directive: Option<String>,
}

impl<P: ?Sized> Selection<P> {
    fn plain(speaker: Arc<P>) -> Self {
        Self {
            speaker,
            directive: None,
        }
    }
}

/// Use case choosing the next speaker of a group chat
pub struct SpeakerSelector {
    backend: Arc<dyn DecisionBackend>,
    operator: Arc<dyn SpeakerOperator>,
}

impl Default for SpeakerSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl SpeakerSelector {
    /// Selector without a reasoning backend or an operator.
    ///
    /// `auto` degrades to round order and `manual` to `auto`.
    pub fn new() -> Self {
        Self {
            backend: Arc::new(NoDecisionBackend),
            operator: Arc::new(NoOperator),
        }
    }

    pub fn with_backend(mut self, backend: Arc<dyn DecisionBackend>) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_operator(mut self, operator: Arc<dyn SpeakerOperator>) -> Self {
        self.operator = operator;
        self
    }

    /// Select the speaker following `last_speaker`.
    ///
    /// Never mutates the ledger.
    pub fn select<P>(
        &self,
        chat: &GroupChat<P>,
        last_speaker: &str,
    ) -> Result<Selection<P>, DomainError>
    where
        P: ?Sized + Participant,
    {
        let method = chat.config().selection_method()?;
        let allow_repeat = chat.config().allow_repeat_speaker.allows(last_speaker);

        let n_agents = chat.agents().len();
        if n_agents < 2 {
            return Err(DomainError::Underpopulated(n_agents));
        }
        if is_degenerate_pair(n_agents, method, allow_repeat) {
            warn!(
                "Group chat is underpopulated with {} participants. \
                 Consider speaker_selection_method = \"round_robin\" or allow_repeat_speaker = false, \
                 or use direct communication instead",
                n_agents
            );
        }

        let mut pool: Vec<Arc<P>> = chat.agents().to_vec();

        if chat.config().func_call_filter
            && let Some(call) = chat.last_message().and_then(|m| m.function_call.as_ref())
        {
            pool.retain(|a| a.can_execute_function(&call.name));
            if pool.len() == 1 {
                debug!(function = %call.name, speaker = pool[0].name(), "Routing function call");
                return Ok(Selection::plain(pool.remove(0)));
            }
            if pool.is_empty() {
                pool = chat
                    .agents()
                    .iter()
                    .filter(|a| a.has_functions())
                    .cloned()
                    .collect();
                match pool.len() {
                    0 => {
                        return Err(DomainError::NoEligibleSpeaker(format!(
                            "no participant can execute the function '{}'",
                            call.name
                        )));
                    }
                    1 => return Ok(Selection::plain(pool.remove(0))),
                    _ => {}
                }
            }
        }

        if !allow_repeat {
            pool.retain(|a| a.name() != last_speaker);
        }
        if pool.is_empty() {
            return Err(DomainError::NoEligibleSpeaker(format!(
                "every candidate besides '{}' was filtered out",
                last_speaker
            )));
        }

        match method {
            SpeakerSelectionMethod::Manual => {
                if let Some(speaker) = self.manual_select(&pool) {
                    return Ok(Selection::plain(speaker));
                }
            }
            SpeakerSelectionMethod::RoundRobin => {
                return Self::round_robin(chat, last_speaker, &pool);
            }
            SpeakerSelectionMethod::Random => {
                let speaker = pool
                    .choose(&mut rand::thread_rng())
                    .cloned()
                    .ok_or_else(|| DomainError::NoEligibleSpeaker("empty candidate pool".into()))?;
                return Ok(Selection::plain(speaker));
            }
            SpeakerSelectionMethod::Auto => {}
        }

        self.auto_select(chat, last_speaker, &pool, allow_repeat)
    }

    fn round_robin<P>(
        chat: &GroupChat<P>,
        last_speaker: &str,
        pool: &[Arc<P>],
    ) -> Result<Selection<P>, DomainError>
    where
        P: ?Sized + Participant,
    {
        chat.next_agent(last_speaker, pool)
            .map(Selection::plain)
            .ok_or_else(|| DomainError::NoEligibleSpeaker("empty candidate pool".into()))
    }

    /// Ask the operator for a 1-based index into `pool`.
    ///
    /// Returns `None` when the operator skips or runs out of attempts.
    fn manual_select<P>(&self, pool: &[Arc<P>]) -> Option<Arc<P>>
    where
        P: ?Sized + Participant,
    {
        self.operator
            .show("Please select the next speaker from the following list:");
        for (i, agent) in pool.iter().enumerate() {
            self.operator.show(&format!("{}: {}", i + 1, agent.name()));
        }

        for _ in 0..MANUAL_SELECTION_ATTEMPTS {
            let input = self.operator.read_line(
                "Enter the number of the next speaker (enter nothing or `q` to use auto selection): ",
            )?;
            let input = input.trim();
            if input.is_empty() || input == "q" {
                return None;
            }
            match input.parse::<usize>() {
                Ok(i) if (1..=pool.len()).contains(&i) => return Some(Arc::clone(&pool[i - 1])),
                _ => self.operator.show(&format!(
                    "Invalid input. Please enter a number between 1 and {}.",
                    pool.len()
                )),
            }
        }

        self.operator.show(&format!(
            "You have tried {} times. The next speaker will be selected automatically.",
            MANUAL_SELECTION_ATTEMPTS
        ));
        warn!("Manual speaker selection exhausted its attempts; selecting automatically");
        None
    }

    fn auto_select<P>(
        &self,
        chat: &GroupChat<P>,
        last_speaker: &str,
        pool: &[Arc<P>],
        allow_repeat: bool,
    ) -> Result<Selection<P>, DomainError>
    where
        P: ?Sized + Participant,
    {
        for agent in pool {
            if agent.description().trim().is_empty() {
                warn!(
                    "The participant '{}' has an empty description, and may not be selected reliably",
                    agent.name()
                );
            }
        }

        let system_prompt = chat.select_speaker_msg(pool);
        let excluded = (!allow_repeat).then_some(last_speaker);
        let mut context = chat.messages().to_vec();
        context.push(Message::system(chat.select_speaker_prompt(pool, excluded)));

        let Some(response) = self.backend.decide(&system_prompt, &context) else {
            debug!("No speaker decision available; using round order");
            return Self::round_robin(chat, last_speaker, pool);
        };

        let Some(decision) = parse_speaker_decision(&response) else {
            warn!("Failed to parse speaker decision: {}", preview(&response, 200));
            return Self::round_robin(chat, last_speaker, pool);
        };

        match pool.iter().find(|a| a.name() == decision.who) {
            Some(speaker) => {
                info!(speaker = %decision.who, "Moderator selected next speaker");
                debug!(why = %decision.why, "Moderator reasoning");
                Ok(Selection {
                    speaker: Arc::clone(speaker),
                    directive: Some(decision.what),
                })
            }
            None => {
                warn!(
                    "Moderator chose '{}', who is not an eligible participant; using round order",
                    decision.who
                );
                Self::round_robin(chat, last_speaker, pool)
            }
        }
    }
}
