//! Decision backend replaying scripted moderator answers.

use super::lock_script;
use roundtable_application::DecisionBackend;
use roundtable_domain::Message;
use std::collections::VecDeque;
use std::sync::Mutex;
use tracing::debug;

/// Returns the configured decision texts in order, then no decision.
///
/// Once the script runs out, the `auto` policy falls back to round order.
pub struct ScriptedDecisionBackend {
    decisions: Mutex<VecDeque<String>>,
}

impl ScriptedDecisionBackend {
    pub fn new<I, S>(decisions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            decisions: Mutex::new(decisions.into_iter().map(Into::into).collect()),
        }
    }

    pub fn remaining(&self) -> usize {
        lock_script(&self.decisions, "moderator", "decisions").len()
    }
}

impl DecisionBackend for ScriptedDecisionBackend {
    fn decide(&self, _system_prompt: &str, messages: &[Message]) -> Option<String> {
        let decision = lock_script(&self.decisions, "moderator", "decisions").pop_front();
        debug!(
            history = messages.len(),
            scripted = decision.is_some(),
            "Moderator decision requested"
        );
        decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replays_in_order_then_gives_up() {
        let backend = ScriptedDecisionBackend::new(["first", "second"]);
        assert_eq!(backend.decide("", &[]).as_deref(), Some("first"));
        assert_eq!(backend.remaining(), 1);
        assert_eq!(backend.decide("", &[]).as_deref(), Some("second"));
        assert!(backend.decide("", &[]).is_none());
    }

    #[test]
    fn test_poisoned_script_keeps_its_decisions() {
        let backend = ScriptedDecisionBackend::new(["Coder", "Reviewer"]);
        std::thread::scope(|s| {
            let holder = s.spawn(|| {
                let _guard = backend.decisions.lock().unwrap();
                panic!("holder panicked");
            });
            assert!(holder.join().is_err());
        });
        assert!(backend.decisions.is_poisoned());

        assert_eq!(backend.remaining(), 2);
        assert_eq!(backend.decide("", &[]).as_deref(), Some("Coder"));
        assert_eq!(backend.remaining(), 1);
    }
}
