//! Console output formatter for finished group chats

use colored::Colorize;
use roundtable_application::{GroupChatOutcome, StopReason};
use roundtable_domain::{GroupChatSnapshot, Message, Role};
use serde_json::json;

/// Formats group chat results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the full transcript followed by the outcome
    pub fn format(snapshot: &GroupChatSnapshot, outcome: &GroupChatOutcome) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Group Chat Transcript"));
        output.push('\n');

        output.push_str(&format!(
            "{} {}\n",
            "Participants:".cyan().bold(),
            snapshot.roster.join(", ")
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Selection:".cyan().bold(),
            snapshot.config.speaker_selection_method
        ));

        output.push_str(&Self::section_header("Messages"));
        for message in &snapshot.messages {
            output.push_str(&Self::format_message(message));
        }

        output.push_str(&Self::section_header("Outcome"));
        output.push_str(&Self::format_summary(outcome));
        output.push_str(&Self::footer());

        output
    }

    /// One-line description of how the chat ended
    pub fn format_summary(outcome: &GroupChatOutcome) -> String {
        let reason = match outcome.stop_reason {
            StopReason::Terminated => "termination message received".green(),
            StopReason::MaxRounds => "round limit reached".yellow(),
            StopReason::NoReply => "speaker had no reply".yellow(),
        };
        format!(
            "{} {} after {} round(s)\n",
            "Finished:".bold(),
            reason,
            outcome.rounds
        )
    }

    /// Format outcome and ledger as JSON
    pub fn format_json(snapshot: &GroupChatSnapshot, outcome: &GroupChatOutcome) -> String {
        let value = json!({
            "completed": outcome.completed,
            "final_message": outcome.final_message,
            "stop_reason": outcome.stop_reason.as_str(),
            "rounds": outcome.rounds,
            "chat": snapshot,
        });
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format a single ledger entry
    pub fn format_message(message: &Message) -> String {
        let sender = message.name.as_deref().unwrap_or("?");
        let label = match message.role {
            Role::Function => format!("── {} (function result) ──", sender).magenta().bold(),
            Role::Assistant => format!("── {} ──", sender).blue().bold(),
            Role::System => format!("── {} (system) ──", sender).dimmed(),
            Role::User => format!("── {} ──", sender).yellow().bold(),
        };

        let mut output = format!("\n{}\n", label);
        let text = message.text();
        if !text.is_empty() {
            output.push_str(&Self::indent(&text, "  "));
            output.push('\n');
        }
        if let Some(call) = &message.function_call {
            output.push_str(&format!(
                "  {} {}({})\n",
                "suggests".dimmed(),
                call.name.cyan(),
                call.arguments
            ));
        }
        output
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roundtable_domain::{FunctionCall, GroupChatConfig};

    fn sample() -> (GroupChatSnapshot, GroupChatOutcome) {
        let snapshot = GroupChatSnapshot {
            roster: vec!["Admin".to_string(), "Coder".to_string()],
            config: GroupChatConfig::default(),
            messages: vec![
                Message::user("Write a parser").with_name("Admin"),
                Message::user("")
                    .with_name("Coder")
                    .with_function_call(FunctionCall::new("run_tests", "{}")),
                Message::function("run_tests", "3 passed"),
            ],
        };
        let outcome = GroupChatOutcome {
            completed: true,
            final_message: None,
            stop_reason: StopReason::MaxRounds,
            rounds: 3,
        };
        (snapshot, outcome)
    }

    #[test]
    fn test_transcript_lists_every_message() {
        colored::control::set_override(false);
        let (snapshot, outcome) = sample();
        let output = ConsoleFormatter::format(&snapshot, &outcome);

        assert!(output.contains("Participants: Admin, Coder"));
        assert!(output.contains("── Admin ──\n  Write a parser"));
        assert!(output.contains("suggests run_tests({})"));
        assert!(output.contains("── run_tests (function result) ──"));
        assert!(output.contains("round limit reached after 3 round(s)"));
    }

    #[test]
    fn test_json_output() {
        let (snapshot, outcome) = sample();
        let value: serde_json::Value =
            serde_json::from_str(&ConsoleFormatter::format_json(&snapshot, &outcome)).unwrap();

        assert_eq!(value["completed"], true);
        assert!(value["final_message"].is_null());
        assert_eq!(value["stop_reason"], "max_rounds");
        assert_eq!(value["chat"]["messages"].as_array().unwrap().len(), 3);
        assert_eq!(value["chat"]["roster"][1], "Coder");
    }

    #[test]
    fn test_indent() {
        assert_eq!(ConsoleFormatter::indent("a\nb", "> "), "> a\n> b");
    }
}
