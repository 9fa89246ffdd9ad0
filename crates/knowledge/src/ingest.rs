//! Loading knowledge snippets from plain-text files.
//!
//! One snippet per non-blank line; surrounding whitespace is trimmed.

use std::path::Path;

use sitechat_core::KnowledgeError;

/// Split text into snippets, one per non-blank line.
pub fn parse_snippets(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// Read a UTF-8 file and split it into snippets.
pub fn load_snippets(path: &Path) -> Result<Vec<String>, KnowledgeError> {
    let text = std::fs::read_to_string(path).map_err(|e| KnowledgeError::Read {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let snippets = parse_snippets(&text);
    tracing::info!(path = %path.display(), snippets = snippets.len(), "Knowledge file loaded");
    Ok(snippets)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_are_skipped() {
        let text = "Pricing - https://acme.com/pricing\n\n  Our pricing is $29/month  \r\n\t\nWe offer 24/7 support\n";
        assert_eq!(
            parse_snippets(text),
            vec![
                "Pricing - https://acme.com/pricing",
                "Our pricing is $29/month",
                "We offer 24/7 support",
            ]
        );
    }

    #[test]
    fn empty_text_has_no_snippets() {
        assert!(parse_snippets("").is_empty());
        assert!(parse_snippets("\n \n").is_empty());
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("site.txt");
        std::fs::write(&path, "First line\nSecond line\n").unwrap();

        let snippets = load_snippets(&path).unwrap();
        assert_eq!(snippets, vec!["First line", "Second line"]);
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = load_snippets(Path::new("/nonexistent/site.txt")).unwrap_err();
        match err {
            KnowledgeError::Read { path, .. } => {
                assert_eq!(path, Path::new("/nonexistent/site.txt"))
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
