//! Group chat configuration from TOML (`[chat]` section)
//!
//! ```toml
//! [chat]
//! max_round = 10
//! admin_name = "Admin"
//! func_call_filter = true
//! speaker_selection_method = "auto"   # auto | manual | random | round_robin
//! allow_repeat_speaker = true         # or a list of names
//! manager_name = "chat_manager"
//! termination_marker = "TERMINATE"
//! ```

use roundtable_application::DEFAULT_MANAGER_NAME;
use roundtable_domain::{GroupChatConfig, RepeatPolicy};
use serde::{Deserialize, Serialize};

/// Raw chat configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileChatConfig {
    pub max_round: usize,
    pub admin_name: String,
    pub func_call_filter: bool,
    /// Kept verbatim; validated by the selector on every selection
    pub speaker_selection_method: String,
    pub allow_repeat_speaker: RepeatPolicy,
    /// Sender name of broadcasts and directives
    pub manager_name: String,
    /// A message whose text ends with this marker ends the chat.
    /// Empty disables marker-based termination.
    pub termination_marker: String,
}

impl Default for FileChatConfig {
    fn default() -> Self {
        let chat = GroupChatConfig::default();
        Self {
            max_round: chat.max_round,
            admin_name: chat.admin_name,
            func_call_filter: chat.func_call_filter,
            speaker_selection_method: chat.speaker_selection_method,
            allow_repeat_speaker: chat.allow_repeat_speaker,
            manager_name: DEFAULT_MANAGER_NAME.to_string(),
            termination_marker: "TERMINATE".to_string(),
        }
    }
}

impl FileChatConfig {
    pub fn to_group_chat_config(&self) -> GroupChatConfig {
        GroupChatConfig::default()
            .with_max_round(self.max_round)
            .with_admin_name(&self.admin_name)
            .with_func_call_filter(self.func_call_filter)
            .with_selection_method(&self.speaker_selection_method)
            .with_repeat_policy(self.allow_repeat_speaker.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_domain_defaults() {
        let file = FileChatConfig::default();
        assert_eq!(file.to_group_chat_config(), GroupChatConfig::default());
        assert_eq!(file.termination_marker, "TERMINATE");
    }

    #[test]
    fn test_conversion_keeps_raw_method() {
        let file = FileChatConfig {
            speaker_selection_method: "MANUAL".to_string(),
            max_round: 3,
            ..Default::default()
        };
        let chat = file.to_group_chat_config();
        assert_eq!(chat.speaker_selection_method, "MANUAL");
        assert_eq!(chat.max_round, 3);
        assert!(chat.selection_method().is_ok());
    }
}
