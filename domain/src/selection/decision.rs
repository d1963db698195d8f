//! Moderator decision parsing
//!
//! The automatic policy asks a reasoning backend for a JSON object with three
//! fields. Anything that does not parse into that shape is treated as
//! malformed and the caller falls back to round-order selection.

use serde::{Deserialize, Serialize};

/// Structured speaker decision produced by the moderator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeakerDecision {
    /// Internal reasoning
    pub why: String,
    /// Name of the next speaker
    pub who: String,
    /// Directive addressed to the next speaker
    pub what: String,
}

/// Parse a moderator response into a [`SpeakerDecision`].
///
/// The whole response is tried first. If that fails, the span from the first
/// `{` to the last `}` is tried, which tolerates a fenced code block or a
/// sentence of preamble around the object.
///
/// # Examples
///
/// ```
/// use roundtable_domain::selection::decision::parse_speaker_decision;
///
/// let d = parse_speaker_decision(r#"{"why": "tests", "who": "Coder", "what": "Run them"}"#).unwrap();
/// assert_eq!(d.who, "Coder");
/// assert!(parse_speaker_decision("Coder should go next").is_none());
/// ```
pub fn parse_speaker_decision(response: &str) -> Option<SpeakerDecision> {
    if let Ok(decision) = serde_json::from_str::<SpeakerDecision>(response.trim()) {
        return Some(decision);
    }

    let start = response.find('{')?;
    let end = response.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&response[start..=end]).ok()
}
