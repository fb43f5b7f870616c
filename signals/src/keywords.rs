use once_cell::sync::Lazy;
use regex::Regex;

static TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-z0-9]+(?:[-+][a-z0-9]+)*").expect("valid token regex"));

const STOPWORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "if", "then", "else", "when", "while", "for", "to", "of",
    "in", "on", "at", "by", "from", "is", "are", "was", "were", "be", "been", "being", "as", "with",
    "without", "into", "about", "over", "under", "between", "this", "that", "these", "those", "it",
    "its", "they", "them", "their", "you", "your", "we", "our", "i", "me", "my", "can", "could",
    "should", "would", "may", "might", "will", "just", "only", "also", "very", "more", "most",
    "less", "few", "than", "too", "not", "no", "yes", "do", "does", "did", "done", "have", "has",
    "had",
];

const MIN_KEYWORD_LEN: usize = 3;

/// Lowercases and splits into word tokens.
///
/// Hyphen- and plus-joined words stay intact (`end-to-end`, `c++` is not a
/// token but `c+d` is).
pub fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    TOKEN_RE
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Returns up to `k` keywords ranked by frequency, then by token length.
///
/// Tokens shorter than 3 characters and stopwords are skipped. Ties keep
/// first-occurrence order.
pub fn extract_keywords(text: &str, k: usize) -> Vec<String> {
    let mut freq: Vec<(String, usize)> = Vec::new();
    for tok in tokenize(text) {
        if tok.chars().count() < MIN_KEYWORD_LEN || STOPWORDS.contains(&tok.as_str()) {
            continue;
        }
        match freq.iter_mut().find(|(w, _)| *w == tok) {
            Some((_, n)) => *n += 1,
            None => freq.push((tok, 1)),
        }
    }
    freq.sort_by(|a, b| (b.1, b.0.len()).cmp(&(a.1, a.0.len())));
    freq.into_iter().take(k).map(|(w, _)| w).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_keeps_joined_words() {
        assert_eq!(
            tokenize("End-to-end AI, 10x growth!"),
            vec!["end-to-end", "ai", "10x", "growth"]
        );
    }

    #[test]
    fn keywords_rank_by_frequency_then_length() {
        let kw = extract_keywords("rust rust cargo crates crates crates api", 3);
        assert_eq!(kw, vec!["crates", "rust", "cargo"]);
    }

    #[test]
    fn keywords_skip_stopwords_and_short_tokens() {
        let kw = extract_keywords("the and of is to go up database", 6);
        assert_eq!(kw, vec!["database"]);
    }

    #[test]
    fn keywords_ties_keep_first_occurrence() {
        let kw = extract_keywords("alpha bravo delta", 3);
        assert_eq!(kw, vec!["alpha", "bravo", "delta"]);
    }

    #[test]
    fn keywords_empty_text() {
        assert!(extract_keywords("", 6).is_empty());
    }
}
