//! Error types for the SiteChat domain.
//!
//! Uses `thiserror` for ergonomic error definitions. The responder itself is
//! total and never produces one of these; they come from ingestion and the
//! bot registry. Configuration failures are `sitechat_config::ConfigError`.

use std::path::PathBuf;
use thiserror::Error;

/// The top-level error type for all SiteChat operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Knowledge error: {0}")]
    Knowledge(#[from] KnowledgeError),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum KnowledgeError {
    #[error("Failed to read knowledge file {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("Bot not found: {0}")]
    BotNotFound(String),

    #[error("Conversation not found: {0}")]
    ConversationNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
