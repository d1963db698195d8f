//! Group chat ledger (Entity)
//!
//! Holds the ordered roster, the append-only history and the chat settings.
//! It owns no behavior beyond storage and lookup: speaker selection and the
//! round loop live in the application layer and borrow the ledger.

use super::message::{Message, MessageContent};
use super::participant::Participant;
use crate::core::error::DomainError;
use crate::prompt::ModeratorPrompt;
use crate::selection::mentions::count_mentions;
use crate::selection::method::SpeakerSelectionMethod;
use crate::selection::repeat::RepeatPolicy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Settings of a group chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupChatConfig {
    /// Maximum number of rounds; the last round only broadcasts.
    pub max_round: usize,
    /// Participant that takes over when a speaker is interrupted.
    /// Resolved lazily, at interrupt time.
    pub admin_name: String,
    /// Route function-call suggestions to participants able to execute them.
    pub func_call_filter: bool,
    /// Raw policy name, validated (case-insensitively) on every selection.
    pub speaker_selection_method: String,
    pub allow_repeat_speaker: RepeatPolicy,
}

impl Default for GroupChatConfig {
    fn default() -> Self {
        Self {
            max_round: 10,
            admin_name: "Admin".to_string(),
            func_call_filter: true,
            speaker_selection_method: SpeakerSelectionMethod::default().to_string(),
            allow_repeat_speaker: RepeatPolicy::default(),
        }
    }
}

impl GroupChatConfig {
    pub fn with_max_round(mut self, max_round: usize) -> Self {
        self.max_round = max_round;
        self
    }

    pub fn with_admin_name(mut self, name: impl Into<String>) -> Self {
        self.admin_name = name.into();
        self
    }

    pub fn with_func_call_filter(mut self, enabled: bool) -> Self {
        self.func_call_filter = enabled;
        self
    }

    pub fn with_selection_method(mut self, method: impl Into<String>) -> Self {
        self.speaker_selection_method = method.into();
        self
    }

    pub fn with_repeat_policy(mut self, policy: RepeatPolicy) -> Self {
        self.allow_repeat_speaker = policy;
        self
    }

    /// Parse the configured selection method.
    pub fn selection_method(&self) -> Result<SpeakerSelectionMethod, DomainError> {
        self.speaker_selection_method.parse()
    }
}

/// Serializable view of a ledger: roster names, settings and history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupChatSnapshot {
    pub roster: Vec<String>,
    pub config: GroupChatConfig,
    pub messages: Vec<Message>,
}

/// The conversation ledger of one group chat.
///
/// Generic over the participant handle so the application layer can store
/// reply-capable participants while selection logic only sees [`Participant`].
pub struct GroupChat<P: ?Sized = dyn Participant> {
    agents: Vec<Arc<P>>,
    messages: Vec<Message>,
    config: GroupChatConfig,
}

impl<P: ?Sized + Participant> GroupChat<P> {
    pub fn new(agents: Vec<Arc<P>>, config: GroupChatConfig) -> Self {
        Self {
            agents,
            messages: Vec::new(),
            config,
        }
    }

    pub fn agents(&self) -> &[Arc<P>] {
        &self.agents
    }

    pub fn agent_names(&self) -> Vec<&str> {
        self.agents.iter().map(|a| a.name()).collect()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn config(&self) -> &GroupChatConfig {
        &self.config
    }

    pub fn max_round(&self) -> usize {
        self.config.max_round
    }

    pub fn admin_name(&self) -> &str {
        &self.config.admin_name
    }

    /// Clear the history, keeping roster and settings for the next conversation.
    pub fn reset(&mut self) {
        self.messages.clear();
    }

    /// Append a message, flattening structured content to plain text first.
    pub fn append(&mut self, mut message: Message) {
        message.normalize();
        self.messages.push(message);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.agents.iter().any(|a| a.name() == name)
    }

    /// Exact-match lookup by name.
    pub fn agent_by_name(&self, name: &str) -> Result<&Arc<P>, DomainError> {
        self.agents
            .iter()
            .find(|a| a.name() == name)
            .ok_or_else(|| DomainError::ParticipantNotFound(name.to_string()))
    }

    /// Participant following `current` in roster order, restricted to `pool`.
    ///
    /// With the full roster as pool this is a plain modulo step from the
    /// position of `current` (position 0 when `current` is not on the roster).
    /// With a filtered pool the roster is scanned forward starting right after
    /// `current` (or from the head) and the first pool member wins.
    pub fn next_agent(&self, current: &str, pool: &[Arc<P>]) -> Option<Arc<P>> {
        if pool.is_empty() || self.agents.is_empty() {
            return None;
        }
        let position = self.agents.iter().position(|a| a.name() == current);

        if self.is_full_roster(pool) {
            let offset = position.unwrap_or(0);
            return Some(Arc::clone(&pool[(offset + 1) % pool.len()]));
        }

        let n = self.agents.len();
        let start = position.map_or(0, |i| i + 1);
        (0..n)
            .map(|i| &self.agents[(start + i) % n])
            .find(|agent| pool.iter().any(|c| c.name() == agent.name()))
            .cloned()
    }

    fn is_full_roster(&self, pool: &[Arc<P>]) -> bool {
        pool.len() == self.agents.len()
            && pool
                .iter()
                .zip(&self.agents)
                .all(|(a, b)| a.name() == b.name())
    }

    /// One `name: description` line per participant of `pool`.
    pub fn participant_roles(&self, pool: &[Arc<P>]) -> String {
        pool.iter()
            .map(|a| format!("{}: {}", a.name(), a.description()).trim().to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Introduction broadcast at the start of a blocking run.
    pub fn intro_msg(&self) -> String {
        ModeratorPrompt::intro(&self.participant_roles(&self.agents))
    }

    /// System instruction for the moderator choosing among `pool`.
    pub fn select_speaker_msg(&self, pool: &[Arc<P>]) -> String {
        ModeratorPrompt::system(
            self.agents.len(),
            &self.participant_roles(pool),
            &Self::names_of(pool),
        )
    }

    /// Trailing instruction appended after the history for the moderator.
    pub fn select_speaker_prompt(&self, pool: &[Arc<P>], excluded: Option<&str>) -> String {
        ModeratorPrompt::floating(&Self::names_of(pool), excluded)
    }

    /// How many times each member of `pool` is mentioned in `content`.
    pub fn mentioned_agents(
        &self,
        content: &MessageContent,
        pool: &[Arc<P>],
    ) -> BTreeMap<String, usize> {
        count_mentions(&content.flatten(), pool.iter().map(|a| a.name()))
    }

    pub fn snapshot(&self) -> GroupChatSnapshot {
        GroupChatSnapshot {
            roster: self.agents.iter().map(|a| a.name().to_string()).collect(),
            config: self.config.clone(),
            messages: self.messages.clone(),
        }
    }

    fn names_of(pool: &[Arc<P>]) -> Vec<&str> {
        pool.iter().map(|a| a.name()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::message::ContentPart;
    use crate::conversation::participant::ParticipantProfile;

    fn roster(names: &[&str]) -> Vec<Arc<ParticipantProfile>> {
        names
            .iter()
            .map(|n| Arc::new(ParticipantProfile::new(*n, format!("{} role", n))))
            .collect()
    }

    fn chat(names: &[&str]) -> GroupChat<ParticipantProfile> {
        GroupChat::new(roster(names), GroupChatConfig::default())
    }

    fn subset(
        chat: &GroupChat<ParticipantProfile>,
        names: &[&str],
    ) -> Vec<Arc<ParticipantProfile>> {
        chat.agents()
            .iter()
            .filter(|a| names.contains(&a.name()))
            .cloned()
            .collect()
    }

    #[test]
    fn test_append_normalizes_content() {
        let mut chat = chat(&["A", "B"]);
        chat.append(Message::user(vec![
            ContentPart::Text {
                text: "see ".to_string(),
            },
            ContentPart::ImageUrl {
                url: "u".to_string(),
            },
        ]));
        assert_eq!(chat.messages()[0].content.as_text(), Some("see <image>"));
    }

    #[test]
    fn test_reset_keeps_roster_and_config() {
        let mut chat = GroupChat::new(
            roster(&["A", "B"]),
            GroupChatConfig::default()
                .with_max_round(3)
                .with_selection_method("round_robin"),
        );
        chat.append(Message::user("hello"));
        chat.reset();

        assert!(chat.messages().is_empty());
        assert_eq!(chat.agent_names(), vec!["A", "B"]);
        assert_eq!(chat.max_round(), 3);
        assert_eq!(chat.config().speaker_selection_method, "round_robin");
    }

    #[test]
    fn test_agent_by_name() {
        let chat = chat(&["A", "B"]);
        assert_eq!(chat.agent_by_name("B").unwrap().name(), "B");
        assert_eq!(
            chat.agent_by_name("Z").unwrap_err(),
            DomainError::ParticipantNotFound("Z".to_string())
        );
    }

    #[test]
    fn test_next_agent_full_roster_wraps() {
        let chat = chat(&["A", "B", "C"]);
        let pool = chat.agents().to_vec();
        assert_eq!(chat.next_agent("A", &pool).unwrap().name(), "B");
        assert_eq!(chat.next_agent("C", &pool).unwrap().name(), "A");
        // Unknown speaker behaves as if at position 0
        assert_eq!(chat.next_agent("Outsider", &pool).unwrap().name(), "B");
    }

    #[test]
    fn test_next_agent_subset_scans_forward() {
        let chat = chat(&["A", "B", "C", "D"]);
        let pool = subset(&chat, &["A", "C", "D"]);
        assert_eq!(chat.next_agent("B", &pool).unwrap().name(), "C");
        assert_eq!(chat.next_agent("D", &pool).unwrap().name(), "A");

        let pool = subset(&chat, &["B", "C", "D"]);
        assert_eq!(chat.next_agent("A", &pool).unwrap().name(), "B");
        assert_eq!(chat.next_agent("Outsider", &pool).unwrap().name(), "B");
    }

    #[test]
    fn test_next_agent_empty_pool() {
        let chat = chat(&["A", "B"]);
        assert!(chat.next_agent("A", &[]).is_none());
    }

    #[test]
    fn test_prompts_enumerate_pool_names() {
        let chat = chat(&["Admin", "Coder", "Reviewer"]);
        let pool = subset(&chat, &["Coder", "Reviewer"]);

        let system = chat.select_speaker_msg(&pool);
        assert!(system.contains("between 3 participants"));
        assert!(system.contains("Coder: Coder role"));
        assert!(!system.contains("Admin: Admin role"));
        assert!(system.contains(r#"["Coder", "Reviewer"]"#));

        let floating = chat.select_speaker_prompt(&pool, Some("Admin"));
        assert!(floating.contains("Don't ask Admin again"));
        assert!(floating.contains("Coder or Reviewer"));

        let intro = chat.intro_msg();
        assert!(intro.contains("Admin: Admin role"));
    }

    #[test]
    fn test_mentioned_agents() {
        let chat = chat(&["Coder", "Reviewer"]);
        let counts = chat.mentioned_agents(
            &MessageContent::from("Coder, please ask Reviewer. Coder again."),
            chat.agents(),
        );
        assert_eq!(counts.get("Coder"), Some(&2));
        assert_eq!(counts.get("Reviewer"), Some(&1));
    }

    #[test]
    fn test_snapshot() {
        let mut chat = chat(&["A", "B"]);
        chat.append(Message::user("hi").with_name("A"));
        let snapshot = chat.snapshot();
        assert_eq!(snapshot.roster, vec!["A", "B"]);
        assert_eq!(snapshot.messages.len(), 1);
    }
}
