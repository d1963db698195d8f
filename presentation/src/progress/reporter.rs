//! Live progress output while a group chat runs

use colored::Colorize;
use roundtable_application::{ConversationEvent, ConversationLogger};
use roundtable_domain::core::string::preview;
use std::sync::Arc;

const PREVIEW_CHARS: usize = 120;

/// Prints each conversation event as a short line, then forwards the event
/// to an optional inner logger (e.g. the JSONL transcript).
pub struct LiveTranscript {
    inner: Option<Arc<dyn ConversationLogger>>,
}

impl LiveTranscript {
    pub fn new() -> Self {
        Self { inner: None }
    }

    pub fn forwarding_to(inner: Arc<dyn ConversationLogger>) -> Self {
        Self { inner: Some(inner) }
    }

    /// Render an event as a progress line, if it has one.
    pub fn render(event: &ConversationEvent) -> Option<String> {
        let payload = &event.payload;
        let text = |key: &str| payload[key].as_str().unwrap_or_default().to_string();

        match event.event_type {
            "group_chat_started" => Some(format!(
                "{} {} ({} mode)",
                "->".cyan(),
                "Group chat started".bold(),
                text("mode")
            )),
            "message_appended" => {
                let content = match payload["function_call"].as_str() {
                    Some(function) => format!("calls {}", function),
                    None => preview(&text("content"), PREVIEW_CHARS),
                };
                Some(format!(
                    "  [{}] {}: {}",
                    payload["round"],
                    text("name").yellow(),
                    content
                ))
            }
            "speaker_selected" => {
                let mut line = format!("  {} {}", "next:".dimmed(), text("speaker").green());
                if let Some(directive) = payload["directive"].as_str() {
                    line.push_str(&format!(" \"{}\"", preview(directive, PREVIEW_CHARS)));
                }
                Some(line)
            }
            "speaker_interrupted" => Some(format!(
                "  {} {} interrupted, {} takes over",
                "!".red().bold(),
                text("speaker"),
                text("admin")
            )),
            "group_chat_finished" => Some(format!(
                "{} finished ({}) after {} round(s)",
                "->".cyan(),
                text("stop_reason"),
                payload["rounds"]
            )),
            _ => None,
        }
    }
}

impl Default for LiveTranscript {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationLogger for LiveTranscript {
    fn log(&self, event: ConversationEvent) {
        if let Some(line) = Self::render(&event) {
            println!("{}", line);
        }
        if let Some(inner) = &self.inner {
            inner.log(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Collect(Mutex<Vec<&'static str>>);

    impl ConversationLogger for Collect {
        fn log(&self, event: ConversationEvent) {
            self.0.lock().unwrap().push(event.event_type);
        }
    }

    #[test]
    fn test_render_message_and_selection() {
        colored::control::set_override(false);

        let line = LiveTranscript::render(&ConversationEvent::new(
            "message_appended",
            json!({"round": 2, "name": "Coder", "content": "Here   is\nthe patch", "function_call": null}),
        ))
        .unwrap();
        assert_eq!(line, "  [2] Coder: Here is the patch");

        let line = LiveTranscript::render(&ConversationEvent::new(
            "speaker_selected",
            json!({"round": 2, "speaker": "Reviewer", "directive": "Please review"}),
        ))
        .unwrap();
        assert_eq!(line, "  next: Reviewer \"Please review\"");

        assert!(LiveTranscript::render(&ConversationEvent::new("other", json!({}))).is_none());
    }

    #[test]
    fn test_forwards_every_event() {
        let inner = Arc::new(Collect::default());
        let live = LiveTranscript::forwarding_to(inner.clone());
        live.log(ConversationEvent::new("other", json!({})));
        live.log(ConversationEvent::new(
            "group_chat_finished",
            json!({"stop_reason": "no_reply", "rounds": 1}),
        ));
        assert_eq!(*inner.0.lock().unwrap(), vec!["other", "group_chat_finished"]);
    }
}
