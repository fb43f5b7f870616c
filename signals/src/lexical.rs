use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::keywords::tokenize;

const BUZZWORDS: &[&str] = &[
    "synergy", "leverage", "scalable", "disrupt", "disruption", "ai", "ml", "deep learning",
    "blockchain", "growth hacking", "10x", "impact", "visionary", "thought leader", "innovative",
    "cutting-edge", "end-to-end", "stakeholder", "alignment", "strategic", "value-add", "paradigm",
    "robust", "seamless", "world-class", "best-in-class", "genai", "llm", "agentic",
    "transformative",
];

const HEDGES: &[&str] = &[
    "maybe", "probably", "possibly", "somewhat", "kind of", "sort of", "i think", "i guess",
    "perhaps",
];

const ABSOLUTES: &[&str] = &[
    "always", "never", "guaranteed", "everyone", "no one", "undeniable", "proven", "certainly",
    "definitely",
];

static BUZZWORD_RES: Lazy<Vec<Regex>> = Lazy::new(|| phrase_patterns(BUZZWORDS));
static HEDGE_RES: Lazy<Vec<Regex>> = Lazy::new(|| phrase_patterns(HEDGES));
static ABSOLUTE_RES: Lazy<Vec<Regex>> = Lazy::new(|| phrase_patterns(ABSOLUTES));

static METRIC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:\b\d+(?:\.\d+)?\b)|(?:%|\$|₹)|(?:\bq[1-4]\b)|(?:\b20\d{2}\b)")
        .expect("valid metric regex")
});

static SENTENCE_SPLIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+").expect("valid sentence regex"));

fn phrase_patterns(phrases: &[&str]) -> Vec<Regex> {
    phrases
        .iter()
        .map(|p| Regex::new(&format!(r"\b{}\b", regex::escape(p))).expect("escaped phrase is a valid regex"))
        .collect()
}

/// Surface-level counts for one text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LexicalSignals {
    /// Heuristic surface score in `[0, 100]`. Higher means more specific,
    /// less inflated language. Not a verdict.
    pub score: u32,
    pub word_count: usize,
    pub sentence_count: usize,
    pub metric_hits: usize,
    pub buzzword_hits: usize,
    pub hedge_hits: usize,
    pub absolute_hits: usize,
    pub buzzword_per_100_words: f64,
}

/// Counts words, sentences, metrics and phrase-category hits in `text`.
pub fn lexical_signals(text: &str) -> LexicalSignals {
    let lower = text.to_lowercase();
    let word_count = tokenize(text).len();
    let sentence_count = SENTENCE_SPLIT_RE
        .split(text)
        .filter(|s| !s.trim().is_empty())
        .count()
        .max(1);

    let buzzword_hits = count_phrases(&lower, &BUZZWORD_RES);
    let hedge_hits = count_phrases(&lower, &HEDGE_RES);
    let absolute_hits = count_phrases(&lower, &ABSOLUTE_RES);
    let metric_hits = METRIC_RE.find_iter(text).count();

    let buzzword_per_100_words = if word_count > 0 {
        buzzword_hits as f64 / word_count as f64 * 100.0
    } else {
        0.0
    };

    let mut score = 60.0;
    score += (metric_hits as f64 * 2.0).min(20.0);
    score -= (buzzword_per_100_words * 2.0).min(30.0);
    score -= (absolute_hits as f64 * 2.0).min(15.0);
    score -= (hedge_hits as f64).min(10.0);
    let score = score.round_ties_even().clamp(0.0, 100.0) as u32;

    LexicalSignals {
        score,
        word_count,
        sentence_count,
        metric_hits,
        buzzword_hits,
        hedge_hits,
        absolute_hits,
        buzzword_per_100_words: (buzzword_per_100_words * 10.0).round() / 10.0,
    }
}

fn count_phrases(lower: &str, patterns: &[Regex]) -> usize {
    patterns.iter().map(|re| re.find_iter(lower).count()).sum()
}
