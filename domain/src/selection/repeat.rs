//! Repeat-speaker policy

use serde::{Deserialize, Serialize};

/// Whether the last speaker may be picked again.
///
/// Deserializes from either a boolean or a list of participant names:
///
/// ```toml
/// allow_repeat_speaker = false
/// allow_repeat_speaker = ["Coder"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RepeatPolicy {
    /// Applies uniformly to every participant
    Uniform(bool),
    /// Only the listed participants may speak twice in a row
    Only(Vec<String>),
}

impl Default for RepeatPolicy {
    fn default() -> Self {
        RepeatPolicy::Uniform(true)
    }
}

impl RepeatPolicy {
    pub fn only<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RepeatPolicy::Only(names.into_iter().map(Into::into).collect())
    }

    /// Effective repeat permission for `speaker`.
    pub fn allows(&self, speaker: &str) -> bool {
        match self {
            RepeatPolicy::Uniform(allowed) => *allowed,
            RepeatPolicy::Only(names) => names.iter().any(|n| n == speaker),
        }
    }
}

impl From<bool> for RepeatPolicy {
    fn from(allowed: bool) -> Self {
        RepeatPolicy::Uniform(allowed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform() {
        assert!(RepeatPolicy::Uniform(true).allows("A"));
        assert!(!RepeatPolicy::Uniform(false).allows("A"));
    }

    #[test]
    fn test_allow_list() {
        let policy = RepeatPolicy::only(["Coder"]);
        assert!(policy.allows("Coder"));
        assert!(!policy.allows("Reviewer"));
    }

    #[test]
    fn test_deserialize_both_shapes() {
        let policy: RepeatPolicy = serde_json::from_str("false").unwrap();
        assert_eq!(policy, RepeatPolicy::Uniform(false));

        let policy: RepeatPolicy = serde_json::from_str(r#"["A", "B"]"#).unwrap();
        assert_eq!(policy, RepeatPolicy::only(["A", "B"]));
    }
}
