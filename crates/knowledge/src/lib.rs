//! Knowledge store and keyword-overlap responder for SiteChat.
//!
//! - [`KnowledgeStore`]: snippets + source label, replaced wholesale,
//!   published as immutable [`KnowledgeSnapshot`]s.
//! - [`structured_view`]: display-only grouping of snippets into sections.
//! - [`respond`]: the pure reply function; [`Responder`] wraps it for async
//!   callers.
//! - [`ingest`]: loading snippets from plain-text files.

pub mod ingest;
pub mod responder;
pub mod store;
pub mod structure;
pub mod tokenizer;

pub use ingest::{load_snippets, parse_snippets};
pub use responder::{Responder, ScoredSnippet, respond, score_snippets};
pub use store::{KnowledgeSnapshot, KnowledgeStore};
pub use structure::{Section, structured_view};
pub use tokenizer::{STOP_WORDS, tokenize};
