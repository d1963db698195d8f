//! Static validation of a group chat setup.
//!
//! The selector validates the selection method and roster size lazily, on
//! every selection. This module reports the same problems (and a few more)
//! up front so a front end can show them before a run starts, without
//! refusing to run.
//!
//! # Examples
//!
//! ```
//! use roundtable_domain::GroupChatConfig;
//! use roundtable_domain::config::validation::{validate_chat_config, Severity};
//!
//! let issues = validate_chat_config(&["Admin", "Coder"], &GroupChatConfig::default());
//! assert!(issues.iter().all(|i| i.severity == Severity::Warning));
//! ```

use crate::conversation::group_chat::GroupChatConfig;
use crate::selection::is_degenerate_pair;
use crate::selection::method::SpeakerSelectionMethod;
use std::collections::BTreeSet;

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the first selection will fail.
    Error,
    /// Non-fatal: the chat works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// The selection method is not one of the four known policies.
    UnknownSelectionMethod { value: String },
    /// Fewer than two participants.
    Underpopulated { count: usize },
    /// Two participants share a name.
    DuplicateName { name: String },
    /// The admin is not on the roster, so interrupts cannot be redirected.
    AdminNotInRoster { admin: String },
    /// Two participants with a policy that lets one of them dominate.
    DegeneratePair,
    /// `max_round` is zero; nothing would be recorded.
    ZeroRounds,
}

/// A detected issue in the chat configuration.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    fn error(code: ConfigIssueCode, message: String) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message,
        }
    }

    fn warning(code: ConfigIssueCode, message: String) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message,
        }
    }

    /// Whether any issue in `issues` is fatal.
    pub fn has_errors(issues: &[ConfigIssue]) -> bool {
        issues.iter().any(|i| i.severity == Severity::Error)
    }
}

/// Check a roster and its settings, returning all detected issues.
pub fn validate_chat_config(roster: &[&str], config: &GroupChatConfig) -> Vec<ConfigIssue> {
    let mut issues = Vec::new();

    let method = match config.selection_method() {
        Ok(method) => Some(method),
        Err(_) => {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::UnknownSelectionMethod {
                    value: config.speaker_selection_method.clone(),
                },
                format!(
                    "speaker_selection_method: unknown value '{}', expected one of {:?}",
                    config.speaker_selection_method,
                    SpeakerSelectionMethod::ALL.map(|m| m.as_str())
                ),
            ));
            None
        }
    };

    if roster.len() < 2 {
        issues.push(ConfigIssue::error(
            ConfigIssueCode::Underpopulated {
                count: roster.len(),
            },
            format!(
                "group chat needs at least 2 participants, found {}",
                roster.len()
            ),
        ));
    }

    let mut seen = BTreeSet::new();
    for name in roster {
        if !seen.insert(*name) {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::DuplicateName {
                    name: name.to_string(),
                },
                format!("participant name '{}' is used more than once", name),
            ));
        }
    }

    if !roster.contains(&config.admin_name.as_str()) {
        issues.push(ConfigIssue::warning(
            ConfigIssueCode::AdminNotInRoster {
                admin: config.admin_name.clone(),
            },
            format!(
                "admin '{}' is not a participant; an interrupted speaker will abort the run",
                config.admin_name
            ),
        ));
    }

    if let Some(method) = method
        && roster.len() == 2
    {
        // With an allow-list the pair degenerates once either member may repeat.
        let allow_repeat = roster
            .iter()
            .any(|name| config.allow_repeat_speaker.allows(name));
        if is_degenerate_pair(roster.len(), method, allow_repeat) {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::DegeneratePair,
                "two participants with repeats allowed: consider round_robin or allow_repeat_speaker = false"
                    .to_string(),
            ));
        }
    }

    if config.max_round == 0 {
        issues.push(ConfigIssue::warning(
            ConfigIssueCode::ZeroRounds,
            "max_round is 0; the opening message will not be recorded".to_string(),
        ));
    }

    issues
}
