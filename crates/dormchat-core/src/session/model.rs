//! Session domain model.
//!
//! This module contains the core `Session` entity and the lightweight
//! `SessionSummary` used for sidebar rendering.

use super::message::{ConversationMessage, MessageRole};
use serde::{Deserialize, Serialize};

/// A named, ordered conversation owned by the session store.
///
/// Messages are append-only: they are never reordered or deleted
/// individually, only whole-session deletion is supported. `updated_at`
/// advances monotonically on every append.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Unique session identifier (UUID or server-assigned key)
    pub id: String,
    /// Human-readable session title
    pub title: String,
    /// Conversation history, in append order
    #[serde(default)]
    pub messages: Vec<ConversationMessage>,
    /// Timestamp when the session was created (ISO 8601 format)
    pub created_at: String,
    /// Timestamp when the session was last updated (ISO 8601 format)
    pub updated_at: String,
}

impl Session {
    /// Creates an empty session stamped with the current time.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: id.into(),
            title: title.into(),
            messages: Vec::new(),
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Appends a message and advances `updated_at`.
    pub fn append(&mut self, role: MessageRole, content: impl Into<String>) {
        let message = ConversationMessage::new(role, content);
        self.updated_at = message.timestamp.clone();
        self.messages.push(message);
    }

    /// Number of messages with role `user`.
    pub fn user_message_count(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| m.role == MessageRole::User)
            .count()
    }
}

/// A sidebar row: session metadata without the message bodies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Unique session identifier
    pub id: String,
    /// Human-readable session title
    pub title: String,
    /// Timestamp of the last append (ISO 8601 format)
    pub updated_at: String,
    /// Number of messages in the session
    pub message_count: usize,
}

impl From<&Session> for SessionSummary {
    fn from(session: &Session) -> Self {
        Self {
            id: session.id.clone(),
            title: session.title.clone(),
            updated_at: session.updated_at.clone(),
            message_count: session.messages.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_advances_updated_at() {
        let mut session = Session::new("s-1", "New Chat");
        let before = session.updated_at.clone();
        session.append(MessageRole::User, "hello");
        assert_eq!(session.messages.len(), 1);
        assert!(session.updated_at >= before);
        assert_eq!(session.updated_at, session.messages[0].timestamp);
    }

    #[test]
    fn summary_reflects_message_count() {
        let mut session = Session::new("s-1", "New Chat");
        session.append(MessageRole::User, "q");
        session.append(MessageRole::Assistant, "a");
        let summary = SessionSummary::from(&session);
        assert_eq!(summary.message_count, 2);
        assert_eq!(summary.id, "s-1");
        assert_eq!(summary.updated_at, session.updated_at);
    }

    #[test]
    fn user_message_count_ignores_assistant_turns() {
        let mut session = Session::new("s-1", "New Chat");
        session.append(MessageRole::Assistant, "greeting");
        session.append(MessageRole::User, "q");
        assert_eq!(session.user_message_count(), 1);
    }
}
