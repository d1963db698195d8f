//! Operator port for manual speaker selection.
//!
//! # Architecture
//!
//! Following the Ports and Adapters pattern:
//! - **Port**: [`SpeakerOperator`] - defined here in application layer
//! - **Adapter**: `ConsoleOperator` - implemented in presentation layer
//!
//! # Flow
//!
//! ```text
//! Please select the next speaker from the following list:
//! 1: Coder
//! 2: Reviewer
//! Enter the number of the next speaker (enter nothing or `q` to use auto selection):
//! ```
//!
//! The selector owns the numbering and the retry budget; the operator only
//! shows lines and reads answers.

/// Port for a human operator choosing the next speaker.
pub trait SpeakerOperator: Send + Sync {
    /// Show one line of text to the operator.
    fn show(&self, line: &str);

    /// Ask a question and read one answer.
    ///
    /// `None` means no input is available (closed stdin, non-interactive
    /// session) and is treated like an explicit skip.
    fn read_line(&self, prompt: &str) -> Option<String>;
}

/// Operator that is never there; manual selection always falls through to
/// automatic selection.
pub struct NoOperator;

impl SpeakerOperator for NoOperator {
    fn show(&self, _line: &str) {}

    fn read_line(&self, _prompt: &str) -> Option<String> {
        None
    }
}
