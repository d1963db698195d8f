//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod chat;
mod logging;
mod moderator;
mod participants;

pub use chat::FileChatConfig;
pub use logging::FileLoggingConfig;
pub use moderator::FileModeratorConfig;
pub use participants::FileParticipantConfig;

use roundtable_domain::{ConfigIssue, validate_chat_config};
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Group chat settings
    pub chat: FileChatConfig,
    /// Roster, in speaking order
    pub participants: Vec<FileParticipantConfig>,
    /// Scripted moderator decisions for the `auto` policy
    pub moderator: FileModeratorConfig,
    /// Transcript logging
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Error-severity issues are raised again by the selector on the first
    /// selection; callers decide whether to stop earlier.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let roster: Vec<&str> = self.participants.iter().map(|p| p.name.as_str()).collect();
        validate_chat_config(&roster, &self.chat.to_group_chat_config())
    }
}
