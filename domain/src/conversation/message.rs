//! Conversation message entities

use serde::{Deserialize, Serialize};

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Function,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Function => "function",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A request from a participant to invoke a named function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    /// Raw argument payload, usually a JSON object rendered as text
    #[serde(default)]
    pub arguments: String,
}

impl FunctionCall {
    pub fn new(name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: arguments.into(),
        }
    }
}

/// One segment of a multi-part message payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { url: String },
}

/// Message payload, either plain text or a sequence of parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

impl MessageContent {
    /// Placeholder used for non-textual segments when flattening.
    pub const IMAGE_PLACEHOLDER: &'static str = "<image>";

    /// Flatten the payload into a single string.
    ///
    /// Text segments are concatenated in order; every image segment is
    /// rendered as [`Self::IMAGE_PLACEHOLDER`].
    pub fn flatten(&self) -> String {
        match self {
            MessageContent::Text(text) => text.clone(),
            MessageContent::Parts(parts) => parts
                .iter()
                .map(|part| match part {
                    ContentPart::Text { text } => text.as_str(),
                    ContentPart::ImageUrl { .. } => Self::IMAGE_PLACEHOLDER,
                })
                .collect(),
        }
    }

    /// Borrow the text if the payload is already flat.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MessageContent::Text(text) => Some(text),
            MessageContent::Parts(_) => None,
        }
    }
}

impl Default for MessageContent {
    fn default() -> Self {
        MessageContent::Text(String::new())
    }
}

impl From<&str> for MessageContent {
    fn from(s: &str) -> Self {
        MessageContent::Text(s.to_string())
    }
}

impl From<String> for MessageContent {
    fn from(s: String) -> Self {
        MessageContent::Text(s)
    }
}

impl From<Vec<ContentPart>> for MessageContent {
    fn from(parts: Vec<ContentPart>) -> Self {
        MessageContent::Parts(parts)
    }
}

/// A message exchanged in a group chat (Entity)
///
/// `name` is the sender identity. The orchestrator stamps it on every message
/// it appends to the ledger unless the role is [`Role::Function`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub content: MessageContent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_call: Option<FunctionCall>,
}

impl Message {
    pub fn new(role: Role, content: impl Into<MessageContent>) -> Self {
        Self {
            role,
            name: None,
            content: content.into(),
            function_call: None,
        }
    }

    pub fn system(content: impl Into<MessageContent>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<MessageContent>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<MessageContent>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// A function result message, named after the function that produced it.
    pub fn function(function_name: impl Into<String>, content: impl Into<MessageContent>) -> Self {
        Self {
            name: Some(function_name.into()),
            ..Self::new(Role::Function, content)
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    pub fn with_function_call(mut self, call: FunctionCall) -> Self {
        self.function_call = Some(call);
        self
    }

    /// Flattened text of the payload.
    pub fn text(&self) -> String {
        self.content.flatten()
    }

    pub fn is_function_result(&self) -> bool {
        self.role == Role::Function
    }

    /// Replace a multi-part payload with its flattened text.
    pub fn normalize(&mut self) {
        if self.content.as_text().is_none() {
            self.content = MessageContent::Text(self.content.flatten());
        }
    }

    /// The message as recorded by the party that received it.
    ///
    /// Whatever role the author used, the receiver files it as a `user` turn;
    /// function results keep their role.
    pub fn into_received(mut self) -> Self {
        if self.role != Role::Function {
            self.role = Role::User;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_parts() {
        let content = MessageContent::Parts(vec![
            ContentPart::Text {
                text: "Look at ".to_string(),
            },
            ContentPart::ImageUrl {
                url: "https://example.com/a.png".to_string(),
            },
            ContentPart::Text {
                text: " please".to_string(),
            },
        ]);
        assert_eq!(content.flatten(), "Look at <image> please");
    }

    #[test]
    fn test_normalize_keeps_text() {
        let mut msg = Message::user("plain");
        msg.normalize();
        assert_eq!(msg.content, MessageContent::Text("plain".to_string()));
    }

    #[test]
    fn test_normalize_flattens_parts() {
        let mut msg = Message::user(vec![ContentPart::ImageUrl {
            url: "x".to_string(),
        }]);
        msg.normalize();
        assert_eq!(msg.content.as_text(), Some("<image>"));
    }

    #[test]
    fn test_into_received_rewrites_role() {
        let msg = Message::assistant("done").into_received();
        assert_eq!(msg.role, Role::User);

        let msg = Message::function("run_tests", "ok").into_received();
        assert_eq!(msg.role, Role::Function);
    }

    #[test]
    fn test_serde_shape() {
        let msg = Message::assistant("hi")
            .with_name("Coder")
            .with_function_call(FunctionCall::new("run_tests", "{}"));
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["name"], "Coder");
        assert_eq!(json["content"], "hi");
        assert_eq!(json["function_call"]["name"], "run_tests");

        let parsed: Message = serde_json::from_value(serde_json::json!({
            "role": "user",
            "content": [{"type": "text", "text": "a"}, {"type": "image_url", "url": "u"}]
        }))
        .unwrap();
        assert_eq!(parsed.text(), "a<image>");
        assert!(parsed.name.is_none());
    }
}
