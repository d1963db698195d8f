//! Termination predicate port
//!
//! Decides whether a message ends the conversation. Supplied by the caller;
//! any `Fn(&Message) -> bool` closure qualifies.

use roundtable_domain::Message;

/// Port deciding whether a message ends the group chat.
pub trait TerminationPredicate: Send + Sync {
    fn is_termination_msg(&self, message: &Message) -> bool;
}

impl<F> TerminationPredicate for F
where
    F: Fn(&Message) -> bool + Send + Sync,
{
    fn is_termination_msg(&self, message: &Message) -> bool {
        self(message)
    }
}

/// Never ends the conversation; runs stop on max rounds or a missing reply.
pub struct NeverTerminate;

impl TerminationPredicate for NeverTerminate {
    fn is_termination_msg(&self, _message: &Message) -> bool {
        false
    }
}

/// Ends the conversation when a message's text ends with a marker such as
/// `TERMINATE` (trailing whitespace ignored).
pub struct TerminationMarker {
    marker: String,
}

impl TerminationMarker {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }
}

impl Default for TerminationMarker {
    fn default() -> Self {
        Self::new("TERMINATE")
    }
}

impl TerminationPredicate for TerminationMarker {
    fn is_termination_msg(&self, message: &Message) -> bool {
        !self.marker.is_empty() && message.text().trim_end().ends_with(&self.marker)
    }
}
