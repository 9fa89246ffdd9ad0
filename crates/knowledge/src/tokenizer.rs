//! Keyword extraction for the responder.

/// Common English words that carry no topical signal.
pub const STOP_WORDS: &[&str] = &[
    "the", "and", "is", "in", "it", "to", "of", "for", "with", "on", "at", "from", "by", "about",
    "as", "an", "are", "be", "been", "being", "was", "were", "will", "would", "should", "can",
    "could", "may", "might", "must", "shall", "that", "this", "these", "those", "then", "than",
    "there", "their", "they", "them", "what", "when", "where", "which", "who", "whom", "whose",
    "how", "why",
];

/// Characters treated as word separators in addition to whitespace.
const PUNCTUATION: &[char] = &['.', ',', '?', '!', ';', ':', '(', ')', '"', '\'', '-'];

/// Tokens must be longer than this many characters.
const MIN_TOKEN_LEN: usize = 2;

/// Split a message into distinct lower-case keywords.
///
/// Tokens keep the order in which they first appear. Short tokens and stop
/// words are dropped, and repeated words count once.
pub fn tokenize(message: &str) -> Vec<String> {
    let cleaned: String = message
        .to_lowercase()
        .chars()
        .map(|c| if PUNCTUATION.contains(&c) { ' ' } else { c })
        .collect();

    let mut tokens: Vec<String> = Vec::new();
    for word in cleaned.split_whitespace() {
        if word.chars().count() <= MIN_TOKEN_LEN || STOP_WORDS.contains(&word) {
            continue;
        }
        if !tokens.iter().any(|t| t == word) {
            tokens.push(word.to_string());
        }
    }
    tokens
}
