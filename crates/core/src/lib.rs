//! # SiteChat Core
//!
//! Domain types and error definitions shared by every SiteChat crate.
//! This crate has **no framework dependencies**: the knowledge store, the
//! HTTP gateway and the CLI all build on the types defined here.

pub mod error;
pub mod message;

// Re-export key types at crate root for ergonomics
pub use error::{Error, KnowledgeError, Result};
pub use message::{BotId, ChatMessage, Conversation, ConversationId, Role};
