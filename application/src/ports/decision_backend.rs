//! Reasoning backend port for automatic speaker selection.
//!
//! The backend receives the moderator instruction as system prompt plus the
//! full history followed by a trailing instruction message, and answers with
//! raw text that should parse as a `{"why", "who", "what"}` object.
//!
//! Timeouts and retries are the backend's business; the selector only
//! distinguishes "no decision" from "some text".

use roundtable_domain::Message;

/// Port for the reasoning backend consulted by the `auto` policy.
pub trait DecisionBackend: Send + Sync {
    /// Ask for a speaker decision.
    ///
    /// Returns `None` when no decision can be produced (no client configured,
    /// backend unreachable). The selector then falls back to round order.
    fn decide(&self, system_prompt: &str, messages: &[Message]) -> Option<String>;
}

/// Backend that never decides, so `auto` always degrades to round order.
pub struct NoDecisionBackend;

impl DecisionBackend for NoDecisionBackend {
    fn decide(&self, _system_prompt: &str, _messages: &[Message]) -> Option<String> {
        None
    }
}
