//! Participant identity
//!
//! The reply-generation capability of a participant is an application port
//! (`ChatParticipant`); the domain only needs what speaker selection reads:
//! the name, the role description, and the function table.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// An addressable actor in a group chat.
///
/// `name` must be unique within a roster.
pub trait Participant: Send + Sync {
    fn name(&self) -> &str;

    /// Human-readable role description, used to build moderator prompts.
    fn description(&self) -> &str;

    /// Whether the participant's function table contains `function_name`.
    fn can_execute_function(&self, function_name: &str) -> bool;

    /// Whether the participant's function table is non-empty.
    fn has_functions(&self) -> bool;
}

/// Plain identity record for a participant (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantProfile {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub functions: BTreeSet<String>,
}

impl ParticipantProfile {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            functions: BTreeSet::new(),
        }
    }

    pub fn with_function(mut self, name: impl Into<String>) -> Self {
        self.functions.insert(name.into());
        self
    }

    pub fn with_functions<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.functions.extend(names.into_iter().map(Into::into));
        self
    }
}

impl Participant for ParticipantProfile {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn can_execute_function(&self, function_name: &str) -> bool {
        self.functions.contains(function_name)
    }

    fn has_functions(&self) -> bool {
        !self.functions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_table_lookup() {
        let profile = ParticipantProfile::new("Coder", "Writes code")
            .with_functions(["run_tests", "lint"]);
        assert!(profile.can_execute_function("run_tests"));
        assert!(!profile.can_execute_function("deploy"));
        assert!(profile.has_functions());
        assert!(!ParticipantProfile::new("Critic", "").has_functions());
    }
}
