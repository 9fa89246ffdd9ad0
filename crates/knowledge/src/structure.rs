//! Structured view: a display-only grouping of snippets into titled sections.
//!
//! Scraped content arrives as a flat list where a page heading looks like
//! `"Pricing - https://example.com/pricing"` and the lines after it are the
//! page body. The view is always re-derived from the snippets and never
//! stored on its own.

use serde::{Deserialize, Serialize};

/// Title used for snippets that do not sit under any page heading.
pub const FALLBACK_TITLE: &str = "Website Content";

/// Separator between a page title and its URL in a heading snippet.
const TITLE_SEPARATOR: &str = " - http";

/// One titled section of the structured view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub url: String,
    pub title: String,
    pub content: String,
}

/// Split a heading snippet into `(title, url)`, if it is one.
fn parse_heading(snippet: &str) -> Option<(&str, &str)> {
    let idx = snippet.find(TITLE_SEPARATOR)?;
    let title = snippet[..idx].trim();
    if title.is_empty() {
        return None;
    }
    // Skip " - " and keep the URL, which starts at "http".
    let url = snippet[idx + 3..].trim();
    Some((title, url))
}

struct PendingSection<'a> {
    title: &'a str,
    url: &'a str,
    body: Vec<&'a str>,
}

impl PendingSection<'_> {
    fn finish(self) -> Section {
        Section {
            url: self.url.to_string(),
            title: self.title.to_string(),
            content: self.body.join("\n"),
        }
    }
}

/// Group snippets into sections.
///
/// Each heading snippet starts a new section and collects the lines after it
/// until the next heading. Lines before the first heading, or all lines when
/// there is no heading at all, go into a leading section titled
/// [`FALLBACK_TITLE`] whose url is the source label. No snippets, no sections.
pub fn structured_view(snippets: &[String], source_label: Option<&str>) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut leading: Vec<&str> = Vec::new();
    let mut current: Option<PendingSection<'_>> = None;

    for snippet in snippets {
        if let Some((title, url)) = parse_heading(snippet) {
            if let Some(done) = current.take() {
                sections.push(done.finish());
            }
            current = Some(PendingSection {
                title,
                url,
                body: Vec::new(),
            });
        } else if let Some(section) = current.as_mut() {
            section.body.push(snippet);
        } else {
            leading.push(snippet);
        }
    }

    if let Some(done) = current.take() {
        sections.push(done.finish());
    }

    if !leading.is_empty() {
        sections.insert(
            0,
            Section {
                url: source_label.unwrap_or_default().to_string(),
                title: FALLBACK_TITLE.to_string(),
                content: leading.join("\n"),
            },
        );
    }

    sections
}
