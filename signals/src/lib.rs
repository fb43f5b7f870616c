//! Hand-computed, non-semantic signals.
//!
//! - [`lexical_signals`]: word and phrase-category counts for a text, plus a
//!   heuristic surface score. Not a verdict on the text.
//! - [`extract_keywords`]: frequency-ranked content words, used for cluster
//!   labels and per-text keyword lists.
//! - [`reason_tags`]: short human-readable explanations built from the
//!   lexical signals.
//! - [`prosody`]: energy, zero-crossing rate, pause ratio and pitch for a
//!   mono audio segment.

mod keywords;
mod lexical;
mod prosody;
mod reasons;

pub use keywords::{extract_keywords, tokenize};
pub use lexical::{lexical_signals, LexicalSignals};
pub use prosody::{prosody, Prosody, ProsodyConfig};
pub use reasons::reason_tags;
