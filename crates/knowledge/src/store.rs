//! Knowledge store: the snippets a bot answers from.
//!
//! Content is only ever replaced wholesale. Each replace builds a new
//! immutable [`KnowledgeSnapshot`] and swaps it in, so a reader holding a
//! snapshot never sees a half-written sequence.

use std::sync::{Arc, RwLock};

use crate::structure::{Section, structured_view};

/// An immutable view of the store at one point in time.
#[derive(Debug, Default)]
pub struct KnowledgeSnapshot {
    pub snippets: Arc<[String]>,
    pub source_label: Option<String>,
    pub sections: Vec<Section>,
}

impl KnowledgeSnapshot {
    fn build(snippets: Vec<String>, source_label: Option<String>) -> Self {
        let sections = structured_view(&snippets, source_label.as_deref());
        Self {
            snippets: snippets.into(),
            source_label,
            sections,
        }
    }
}

/// Holds the current snippets and source label.
///
/// Thread-safe via `std::sync::RwLock` (non-async, held only for the
/// pointer swap or clone).
#[derive(Debug, Default)]
pub struct KnowledgeStore {
    current: RwLock<Arc<KnowledgeSnapshot>>,
}

impl KnowledgeStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with snippets.
    pub fn with_snippets<I, S>(snippets: I, source_label: Option<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let store = Self::new();
        store.replace(snippets, source_label);
        store
    }

    /// Replace all content. Never merges with what was there before.
    pub fn replace<I, S>(&self, snippets: I, source_label: Option<String>)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let snippets: Vec<String> = snippets.into_iter().map(Into::into).collect();
        let count = snippets.len();
        let next = Arc::new(KnowledgeSnapshot::build(snippets, source_label));
        let sections = next.sections.len();

        *self.current.write().unwrap_or_else(|e| e.into_inner()) = next;
        tracing::debug!(snippets = count, sections, "Knowledge replaced");
    }

    /// A consistent snapshot of snippets, label and sections.
    pub fn snapshot(&self) -> Arc<KnowledgeSnapshot> {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// The raw snippets, for scoring.
    pub fn current(&self) -> Arc<[String]> {
        self.snapshot().snippets.clone()
    }

    pub fn source_label(&self) -> Option<String> {
        self.snapshot().source_label.clone()
    }

    /// The structured view of the current snippets.
    pub fn structured_view(&self) -> Vec<Section> {
        self.snapshot().sections.clone()
    }

    pub fn len(&self) -> usize {
        self.snapshot().snippets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
