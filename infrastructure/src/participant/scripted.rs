//! Participant replaying a fixed list of replies.
//!
//! Each scripted line becomes one reply:
//!
//! | Line | Reply |
//! |------|-------|
//! | `call:<function> <arguments>` | empty message suggesting a function call |
//! | `result:<function> <output>` | function result message |
//! | `!interrupt` | the turn is interrupted (admin takes over) |
//! | anything else | plain text |
//!
//! When the script is exhausted the participant has no reply, which ends
//! the chat.

use super::interrupt::InterruptSignal;
use super::lock_script;
use crate::config::FileParticipantConfig;
use async_trait::async_trait;
use roundtable_application::{ChatParticipant, ReplyError};
use roundtable_domain::{FunctionCall, Message, Participant, ParticipantProfile};
use std::collections::VecDeque;
use std::sync::Mutex;
use tracing::debug;

const INTERRUPT_LINE: &str = "!interrupt";

/// A participant whose replies are scripted in advance
pub struct ScriptedParticipant {
    profile: ParticipantProfile,
    replies: Mutex<VecDeque<String>>,
    inbox: Mutex<Vec<Message>>,
    interrupt: Option<InterruptSignal>,
}

impl ScriptedParticipant {
    pub fn new<I, S>(profile: ParticipantProfile, replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            profile,
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            inbox: Mutex::new(Vec::new()),
            interrupt: None,
        }
    }

    pub fn from_config(config: &FileParticipantConfig) -> Self {
        Self::new(config.to_profile(), config.replies.iter().cloned())
    }

    /// Interrupt the next reply whenever `signal` is raised.
    pub fn with_interrupt(mut self, signal: InterruptSignal) -> Self {
        self.interrupt = Some(signal);
        self
    }

    /// Messages broadcast to this participant so far
    pub fn inbox(&self) -> Vec<Message> {
        lock_script(&self.inbox, self.name(), "inbox").clone()
    }

    /// Number of scripted replies not yet used
    pub fn remaining(&self) -> usize {
        lock_script(&self.replies, self.name(), "replies").len()
    }

    fn to_message(line: &str) -> Message {
        if let Some(rest) = line.strip_prefix("call:") {
            let (name, arguments) = split_command(rest);
            return Message::assistant("").with_function_call(FunctionCall::new(name, arguments));
        }
        if let Some(rest) = line.strip_prefix("result:") {
            let (name, output) = split_command(rest);
            return Message::function(name, output);
        }
        Message::assistant(line)
    }
}

fn split_command(rest: &str) -> (&str, &str) {
    let rest = rest.trim();
    match rest.split_once(char::is_whitespace) {
        Some((name, tail)) => (name, tail.trim()),
        None => (rest, ""),
    }
}

impl Participant for ScriptedParticipant {
    fn name(&self) -> &str {
        self.profile.name()
    }

    fn description(&self) -> &str {
        self.profile.description()
    }

    fn can_execute_function(&self, function_name: &str) -> bool {
        self.profile.can_execute_function(function_name)
    }

    fn has_functions(&self) -> bool {
        self.profile.has_functions()
    }
}

#[async_trait]
impl ChatParticipant for ScriptedParticipant {
    fn receive(&self, message: &Message, sender: &str, silent: bool) {
        debug!(
            participant = self.name(),
            sender, silent, "Received broadcast"
        );
        lock_script(&self.inbox, self.name(), "inbox").push(message.clone());
    }

    fn generate_reply(
        &self,
        messages: &[Message],
        _sender: &str,
    ) -> Result<Option<Message>, ReplyError> {
        if self.interrupt.as_ref().is_some_and(InterruptSignal::take) {
            return Err(ReplyError::Interrupted);
        }

        let line = self
            .replies
            .lock()
            .map_err(|_| ReplyError::Failed(format!("reply script of {} is poisoned", self.name())))?
            .pop_front();

        let Some(line) = line else {
            debug!(participant = self.name(), "Script exhausted");
            return Ok(None);
        };
        if line.trim() == INTERRUPT_LINE {
            return Err(ReplyError::Interrupted);
        }

        debug!(
            participant = self.name(),
            history = messages.len(),
            "Scripted reply"
        );
        Ok(Some(Self::to_message(&line)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roundtable_domain::Role;

    fn coder(replies: &[&str]) -> ScriptedParticipant {
        ScriptedParticipant::new(
            ParticipantProfile::new("Coder", "Writes code").with_function("run_tests"),
            replies.iter().copied(),
        )
    }

    #[test]
    fn test_plain_replies_then_none() {
        let participant = coder(&["first", "second"]);
        let first = participant.generate_reply(&[], "chat_manager").unwrap().unwrap();
        assert_eq!(first.role, Role::Assistant);
        assert_eq!(first.text(), "first");
        assert_eq!(participant.remaining(), 1);

        participant.generate_reply(&[], "chat_manager").unwrap();
        assert!(participant.generate_reply(&[], "chat_manager").unwrap().is_none());
    }

    #[test]
    fn test_function_call_and_result_lines() {
        let participant = coder(&[r#"call:run_tests {"target": "all"}"#, "result:run_tests 3 passed"]);

        let call = participant.generate_reply(&[], "m").unwrap().unwrap();
        let function_call = call.function_call.as_ref().unwrap();
        assert_eq!(function_call.name, "run_tests");
        assert_eq!(function_call.arguments, r#"{"target": "all"}"#);
        assert_eq!(call.text(), "");

        let result = participant.generate_reply(&[], "m").unwrap().unwrap();
        assert_eq!(result.role, Role::Function);
        assert_eq!(result.name.as_deref(), Some("run_tests"));
        assert_eq!(result.text(), "3 passed");
    }

    #[test]
    fn test_call_without_arguments() {
        let participant = coder(&["call:lint"]);
        let call = participant.generate_reply(&[], "m").unwrap().unwrap();
        assert_eq!(call.function_call.unwrap(), FunctionCall::new("lint", ""));
    }

    #[test]
    fn test_interrupt_line() {
        let participant = coder(&["!interrupt", "back"]);
        assert_eq!(
            participant.generate_reply(&[], "m").unwrap_err(),
            ReplyError::Interrupted
        );
        assert_eq!(
            participant.generate_reply(&[], "m").unwrap().unwrap().text(),
            "back"
        );
    }

    #[test]
    fn test_interrupt_signal_is_one_shot() {
        let signal = InterruptSignal::new();
        let participant = coder(&["hello"]).with_interrupt(signal.clone());

        signal.raise();
        assert!(participant.generate_reply(&[], "m").unwrap_err().is_interrupted());
        // The scripted line was not consumed
        assert_eq!(participant.remaining(), 1);
        assert_eq!(
            participant.generate_reply(&[], "m").unwrap().unwrap().text(),
            "hello"
        );
    }

    #[test]
    fn test_receive_fills_inbox() {
        let participant = coder(&[]);
        participant.receive(&Message::user("hi").with_name("Admin"), "chat_manager", true);
        assert_eq!(participant.inbox().len(), 1);
        assert!(participant.can_execute_function("run_tests"));
        assert!(participant.has_functions());
    }

    #[test]
    fn test_poisoned_locks_still_report_state() {
        let participant = coder(&["one", "two"]);
        participant.receive(&Message::user("hi"), "chat_manager", true);
        std::thread::scope(|s| {
            let replies = s.spawn(|| {
                let _guard = participant.replies.lock().unwrap();
                panic!("holder panicked");
            });
            let inbox = s.spawn(|| {
                let _guard = participant.inbox.lock().unwrap();
                panic!("holder panicked");
            });
            assert!(replies.join().is_err());
            assert!(inbox.join().is_err());
        });
        assert!(participant.replies.is_poisoned());
        assert!(participant.inbox.is_poisoned());

        assert_eq!(participant.remaining(), 2);
        participant.receive(&Message::user("again"), "chat_manager", true);
        let inbox = participant.inbox();
        assert_eq!(inbox.len(), 2);
        assert_eq!(inbox[1].text(), "again");
    }

    #[tokio::test]
    async fn test_async_reply_uses_script() {
        let participant = coder(&["async hello"]);
        let reply = participant.a_generate_reply(&[], "m").await.unwrap().unwrap();
        assert_eq!(reply.text(), "async hello");
    }

    #[test]
    fn test_from_config() {
        let config = FileParticipantConfig {
            name: "Reviewer".to_string(),
            description: "Reviews code".to_string(),
            functions: vec![],
            replies: vec!["LGTM".to_string()],
        };
        let participant = ScriptedParticipant::from_config(&config);
        assert_eq!(participant.name(), "Reviewer");
        assert_eq!(participant.description(), "Reviews code");
        assert!(!participant.has_functions());
        assert_eq!(participant.remaining(), 1);
    }
}
