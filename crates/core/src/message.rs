//! Chat message and conversation domain types.
//!
//! A visitor sends a message → the gateway records it → the responder
//! produces a reply → the gateway records that too. Messages are immutable
//! once created; the conversation that holds them belongs to the caller,
//! never to the responder.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a conversation (session).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationId(pub String);

impl ConversationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Default for ConversationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a bot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BotId(pub String);

impl BotId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Default for BotId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for BotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who sent a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The website visitor
    User,
    /// The support bot
    Bot,
}

/// A single turn in a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Unique message ID
    pub id: String,

    /// Who sent this message
    pub role: Role,

    /// The text content
    pub content: String,

    /// When the message was created
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create a new visitor message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create a new bot reply.
    pub fn bot(content: impl Into<String>) -> Self {
        Self::new(Role::Bot, content)
    }
}

/// An ordered transcript of chat messages with one bot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    /// Unique conversation ID
    pub id: ConversationId,

    /// The bot this conversation is with
    pub bot_id: BotId,

    /// Ordered messages, oldest first
    pub messages: Vec<ChatMessage>,

    /// When this conversation was created
    pub created_at: DateTime<Utc>,

    /// When the last message was added
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Create a new empty conversation with the given bot.
    pub fn new(bot_id: BotId) -> Self {
        Self::with_id(ConversationId::new(), bot_id)
    }

    /// Create a new empty conversation under a caller-chosen ID.
    pub fn with_id(id: ConversationId, bot_id: BotId) -> Self {
        let now = Utc::now();
        Self {
            id,
            bot_id,
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Append a message to the conversation.
    pub fn push(&mut self, message: ChatMessage) {
        self.updated_at = Utc::now();
        self.messages.push(message);
    }

    /// Drop the oldest messages so that at most `max` remain.
    pub fn truncate_front(&mut self, max: usize) {
        if self.messages.len() > max {
            let excess = self.messages.len() - max;
            self.messages.drain(..excess);
        }
    }

    /// The most recent message, if any.
    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_user_and_bot_messages() {
        let user = ChatMessage::user("Do you ship to Canada?");
        assert_eq!(user.role, Role::User);
        assert_eq!(user.content, "Do you ship to Canada?");

        let bot = ChatMessage::bot("Based on the website content: We ship worldwide");
        assert_eq!(bot.role, Role::Bot);
        assert_ne!(user.id, bot.id);
    }

    #[test]
    fn conversation_tracks_updates() {
        let mut conv = Conversation::new(BotId::new());
        let created = conv.created_at;

        conv.push(ChatMessage::user("First message"));
        assert_eq!(conv.messages.len(), 1);
        assert!(conv.updated_at >= created);
        assert_eq!(conv.last().map(|m| m.role), Some(Role::User));
    }

    #[test]
    fn truncate_front_keeps_newest() {
        let mut conv = Conversation::new(BotId::from("bot-1"));
        for i in 0..5 {
            conv.push(ChatMessage::user(format!("msg {i}")));
        }
        conv.truncate_front(2);
        let contents: Vec<&str> = conv.messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["msg 3", "msg 4"]);
    }

    #[test]
    fn role_serializes_lowercase() {
        let msg = ChatMessage::bot("hi there");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "bot");
        assert_eq!(json["content"], "hi there");
    }
}
