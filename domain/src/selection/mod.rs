//! Speaker selection rules
//!
//! Pure building blocks for choosing the next speaker. The policy dispatch
//! (which consults an operator or a reasoning backend) is an application use
//! case; everything here is deterministic and I/O free.

pub mod decision;
pub mod mentions;
pub mod method;
pub mod repeat;

pub use decision::{SpeakerDecision, parse_speaker_decision};
pub use mentions::count_mentions;
pub use method::SpeakerSelectionMethod;
pub use repeat::RepeatPolicy;

/// Whether a two-member roster is configured in a way that lets one member
/// dominate the conversation.
///
/// Round robin alternates by construction and disallowing repeats forces
/// alternation too; any other policy with repeats allowed is degenerate.
pub fn is_degenerate_pair(
    roster_size: usize,
    method: SpeakerSelectionMethod,
    allow_repeat: bool,
) -> bool {
    roster_size == 2 && method != SpeakerSelectionMethod::RoundRobin && allow_repeat
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_pair() {
        assert!(is_degenerate_pair(2, SpeakerSelectionMethod::Random, true));
        assert!(is_degenerate_pair(2, SpeakerSelectionMethod::Auto, true));
        assert!(!is_degenerate_pair(2, SpeakerSelectionMethod::RoundRobin, true));
        assert!(!is_degenerate_pair(2, SpeakerSelectionMethod::Random, false));
        assert!(!is_degenerate_pair(3, SpeakerSelectionMethod::Random, true));
    }
}
