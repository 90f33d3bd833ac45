//! Message entities

use serde::{Deserialize, Serialize};

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A message in a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    /// Milliseconds since the Unix epoch, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: None,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn with_timestamp(mut self, millis: i64) -> Self {
        self.timestamp = Some(millis);
        self
    }
}

/// Split a message history into the question being asked and its prior context.
///
/// The question is the content of the last `user` message (empty when there is
/// none). The prior context is every message except the final one.
pub fn split_question(messages: &[Message]) -> (&str, &[Message]) {
    let question = messages
        .iter()
        .rev()
        .find(|m| m.role == Role::User)
        .map(|m| m.content.as_str())
        .unwrap_or("");
    let history = match messages.split_last() {
        Some((_, rest)) => rest,
        None => &[],
    };
    (question, history)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&Message::assistant("hi")).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"hi"}"#);
    }

    #[test]
    fn test_timestamp_roundtrip() {
        let msg = Message::user("hi").with_timestamp(1_700_000_000_000);
        let json = serde_json::to_string(&msg).unwrap();
        let parsed: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.timestamp, Some(1_700_000_000_000));
    }

    #[test]
    fn test_split_question_last_user_message() {
        let messages = vec![
            Message::user("What is Rust?"),
            Message::assistant("A systems language."),
            Message::user("Is it fast?"),
        ];
        let (question, history) = split_question(&messages);
        assert_eq!(question, "Is it fast?");
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].content, "A systems language.");
    }

    #[test]
    fn test_split_question_trailing_assistant() {
        // History still drops only the final message, whatever its role
        let messages = vec![Message::user("Q"), Message::assistant("A")];
        let (question, history) = split_question(&messages);
        assert_eq!(question, "Q");
        assert_eq!(history, &[Message::user("Q")]);
    }

    #[test]
    fn test_split_question_empty() {
        let (question, history) = split_question(&[]);
        assert_eq!(question, "");
        assert!(history.is_empty());
    }
}
