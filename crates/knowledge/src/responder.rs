//! Keyword-overlap responder.
//!
//! [`respond`] is a pure function of the message, the snippets and the
//! source label. [`Responder`] is a thin async adapter for HTTP handlers and
//! the CLI: it snapshots a [`KnowledgeStore`], optionally waits to simulate
//! latency, and delegates.

use std::sync::Arc;
use std::time::Duration;

use crate::store::KnowledgeStore;
use crate::tokenizer::tokenize;

/// Returned when there is nothing to answer from.
pub const NO_KNOWLEDGE_REPLY: &str =
    "I don't have any information to work with yet. Please try scraping the website again.";

/// Prefix for answers taken from a snippet.
pub const ANSWER_PREFIX: &str = "Based on the website content: ";

fn greeting(label: Option<&str>) -> String {
    format!(
        "Hello! I'm your support bot for {}. How can I help you today?",
        label.unwrap_or("this website")
    )
}

fn self_identification(label: Option<&str>) -> String {
    format!(
        "I'm a support chatbot trained on content from {}. I answer questions using the information found there.",
        label.unwrap_or("the website you provided")
    )
}

fn ask_for_specifics(label: Option<&str>) -> String {
    format!(
        "I need more specific information to help you. What would you like to know about {}?",
        label.unwrap_or("this website")
    )
}

fn not_found(label: Option<&str>) -> String {
    format!(
        "I couldn't find specific information about that on {}. Could you try rephrasing your question?",
        label.unwrap_or("the website")
    )
}

/// A snippet together with its keyword-overlap score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredSnippet<'a> {
    pub index: usize,
    pub snippet: &'a str,
    pub score: usize,
}

/// Score every snippet and return those with a positive score, best first.
///
/// A snippet's score is the number of tokens found anywhere in it
/// (case-insensitive substring match); a token counts once no matter how
/// often it occurs. Ties keep their original order.
pub fn score_snippets<'a>(tokens: &[String], snippets: &'a [String]) -> Vec<ScoredSnippet<'a>> {
    let mut scored: Vec<ScoredSnippet<'a>> = snippets
        .iter()
        .enumerate()
        .filter_map(|(index, snippet)| {
            let haystack = snippet.to_lowercase();
            let score = tokens
                .iter()
                .filter(|t| haystack.contains(t.as_str()))
                .count();
            (score > 0).then_some(ScoredSnippet {
                index,
                snippet: snippet.as_str(),
                score,
            })
        })
        .collect();

    // `sort_by` is stable.
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored
}

/// Produce a reply to `message` from `snippets`.
///
/// Greeting and self-identification checks run first and use plain
/// substring matching on the lower-cased message. That means any word
/// containing "hi" ("this", "Ohio", "shipping") is answered with the
/// greeting. Callers relying on exact replies should be aware of it.
///
/// Total over all inputs: never panics, never errors.
pub fn respond(message: &str, snippets: &[String], source_label: Option<&str>) -> String {
    let lower = message.to_lowercase();

    if lower.contains("hello") || lower.contains("hi") {
        return greeting(source_label);
    }

    if lower.contains("who are you") || lower.contains("what are you") {
        return self_identification(source_label);
    }

    if snippets.is_empty() {
        return NO_KNOWLEDGE_REPLY.to_string();
    }

    let tokens = tokenize(&lower);
    if tokens.is_empty() {
        return ask_for_specifics(source_label);
    }

    match score_snippets(&tokens, snippets).first() {
        Some(best) => format!("{ANSWER_PREFIX}{}", best.snippet),
        None => not_found(source_label),
    }
}

/// Async adapter over [`respond`] bound to one knowledge store.
#[derive(Debug, Clone)]
pub struct Responder {
    store: Arc<KnowledgeStore>,
    delay: Duration,
}

impl Responder {
    pub fn new(store: Arc<KnowledgeStore>) -> Self {
        Self {
            store,
            delay: Duration::ZERO,
        }
    }

    /// Wait this long before each reply, to mimic network latency.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn store(&self) -> &Arc<KnowledgeStore> {
        &self.store
    }

    /// Reply to a message using the store's content at call time.
    pub async fn reply(&self, message: &str) -> String {
        let snapshot = self.store.snapshot();

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let reply = respond(message, &snapshot.snippets, snapshot.source_label.as_deref());
        tracing::debug!(
            message_len = message.len(),
            snippets = snapshot.snippets.len(),
            answered = reply.starts_with(ANSWER_PREFIX),
            "Reply generated"
        );
        reply
    }
}
